//! Integration tests for the jsonviz library API.

use jsonviz::layout::LayoutEngine;
use jsonviz::resolver::resolve_node;
use jsonviz::{
    CompileOptions, Config, Graph, GraphSession, JsonVizError, LayoutConfig, ResolveError, compile, compile_str,
    inspect, resolve, trace,
};
use serde_json::{Value, json};
use std::collections::HashSet;

fn fixtures() -> Vec<Value> {
    vec![
        json!({}),
        json!([]),
        json!(42),
        json!("just a string"),
        json!({"name": "Acme", "tags": ["a", "b", "c"]}),
        json!([[1, 2], [], [{"x": null}], {"y": true}]),
        json!({
            "varieties": [
                {"name": "Granny Smith", "characteristics": {"season": ["Sep", "Oct", "Nov"]}},
                {"name": "Fuji", "characteristics": {}}
            ],
            "meta": {"count": 2, "sources": [{"url": "https://example.com"}]}
        }),
    ]
}

fn compiled(value: &Value) -> Graph {
    compile(value, &CompileOptions::default()).unwrap()
}

#[test]
fn test_root_always_present_and_ids_unique() {
    for value in fixtures() {
        let graph = compiled(&value);
        assert!(graph.node_count() >= 1, "no root for {}", value);
        assert_eq!(graph.nodes[0].label, "Root");

        let node_ids: HashSet<_> = graph.nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(node_ids.len(), graph.node_count(), "duplicate node id in {}", value);
        let edge_ids: HashSet<_> = graph.edges.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(edge_ids.len(), graph.edge_count(), "duplicate edge id in {}", value);
    }
}

#[test]
fn test_edges_form_a_forest() {
    for value in fixtures() {
        let graph = compiled(&value);

        let mut targets = HashSet::new();
        for edge in &graph.edges {
            assert!(targets.insert(edge.target.as_str()), "two parents for {}", edge.target);
            assert!(graph.node(&edge.source).is_some());
            assert!(graph.node(&edge.target).is_some());
        }
        assert!(graph.stats().is_forest);
    }
}

#[test]
fn test_plain_labels_resolve_to_their_values() {
    let json = json!({
        "company": {
            "office": {"city": "Oslo", "floors": [1, 2]},
            "meta": {"founded": 1999}
        }
    });
    let graph = compiled(&json);

    let expected = [
        ("company", &json["company"]),
        ("office", &json["company"]["office"]),
        ("meta", &json["company"]["meta"]),
    ];
    for (label, value) in expected {
        assert!(graph.nodes.iter().any(|n| n.label == label), "no node labeled {}", label);
        assert_eq!(&resolve(&json, label).unwrap().value, value);
    }
}

#[test]
fn test_every_breadcrumb_resolves_to_its_node_value() {
    for value in fixtures() {
        let graph = compiled(&value);
        for node in &graph.nodes {
            let by_path = resolve_node(&value, node).unwrap();
            let by_breadcrumb = resolve(&value, &node.breadcrumb()).unwrap();
            assert_eq!(by_path.value, by_breadcrumb.value, "mismatch at {}", node.breadcrumb());
        }
    }
}

#[test]
fn test_compile_is_idempotent() {
    for value in fixtures() {
        let first = compiled(&value);
        let second = compiled(&value);
        assert_eq!(first, second);

        let shape = |g: &Graph| -> Vec<(String, usize)> {
            g.nodes.iter().map(|n| (n.label.clone(), n.properties.len())).collect()
        };
        assert_eq!(shape(&first), shape(&second));
    }
}

#[test]
fn test_compiled_nodes_do_not_overlap() {
    let json = json!({
        "a": {"x": 1},
        "b": [1, 2, 3, 4],
        "c": {"d": {"e": [true, false]}},
        "f": [{"g": 1}, {"h": 2}]
    });
    let graph = compiled(&json);
    let engine = LayoutEngine::new(LayoutConfig::default());

    for (i, a) in graph.nodes.iter().enumerate() {
        for b in &graph.nodes[i + 1..] {
            assert!(
                !engine.overlaps(a.position, b.position),
                "{} overlaps {}",
                a.label,
                b.label
            );
        }
    }
}

#[test]
fn test_double_collapse_restores_hidden_flags() {
    let json = json!({"outer": {"inner": {"leaf": [1, 2]}}, "side": [3]});
    let mut session = GraphSession::new(compiled(&json));
    let before: Vec<bool> = session.graph().nodes.iter().map(|n| n.hidden).collect();

    let outer = session
        .graph()
        .nodes
        .iter()
        .find(|n| n.label == "outer")
        .map(|n| n.id.clone())
        .unwrap();
    let inner = session
        .graph()
        .nodes
        .iter()
        .find(|n| n.label == "inner")
        .map(|n| n.id.clone())
        .unwrap();

    // Inner collapse survives an outer collapse and expand
    session.toggle_node_collapse(&inner).unwrap();
    let with_inner: Vec<bool> = session.graph().nodes.iter().map(|n| n.hidden).collect();
    session.toggle_node_collapse(&outer).unwrap();
    session.toggle_node_collapse(&outer).unwrap();
    let after: Vec<bool> = session.graph().nodes.iter().map(|n| n.hidden).collect();
    assert_eq!(after, with_inner);

    session.toggle_node_collapse(&inner).unwrap();
    let restored: Vec<bool> = session.graph().nodes.iter().map(|n| n.hidden).collect();
    assert_eq!(restored, before);
}

#[test]
fn test_property_collapse_uses_edge_annotation() {
    let json = json!({"tags": ["a", "b"], "owner": {"name": "Ada"}});
    let mut session = GraphSession::new(compiled(&json));

    let change = session.toggle_property_collapse("node-0", "tags").unwrap();
    assert!(change.collapsed);
    assert_eq!(change.nodes.len(), 2);
    assert!(!session.graph().nodes.iter().any(|n| n.label == "owner" && n.hidden));

    // A scalar row has nothing under it
    assert!(session.toggle_property_collapse("node-3", "name").is_none());
}

#[test]
fn test_compile_str_rejects_invalid_json() {
    let result = compile_str("{\"a\": ", &Config::default());
    assert!(matches!(result, Err(JsonVizError::Policy(_))));
}

#[test]
fn test_inspect_reports_typed_miss() {
    let text = r#"{"employees": [{"name": "Ada"}]}"#;

    assert_eq!(inspect(text, "employees > 0 > name").unwrap().value, json!("Ada"));
    match inspect(text, "employees > 3") {
        Err(JsonVizError::Resolve(ResolveError::IndexOutOfRange { index: 3, len: 1 })) => {}
        other => panic!("Expected IndexOutOfRange, got: {:?}", other),
    }
}

#[test]
fn test_trace_walks_to_root() {
    let text = r#"{"a": [{"b": {"c": 1}}]}"#;
    let (graph, result) = trace(text, "node-2", &Config::default()).unwrap();

    assert_eq!(result.node.label, "b");
    assert_eq!(result.path_labels(&graph), vec!["Root", "a 0", "b"]);
    assert_eq!(result.trace.path_edges.len(), 2);
    assert_eq!(result.node.breadcrumb(), "Root > a > 0 > b");
}

#[test]
fn test_overlapping_toggles_leave_nothing_hidden() {
    let json = json!({"owner": {"pets": ["cat", "dog"]}, "tags": ["x", "y"], "n": 1});
    let mut session = GraphSession::new(compiled(&json));

    session.toggle_property_collapse("node-1", "pets").unwrap();
    session.toggle_node_collapse("node-0").unwrap();
    session.toggle_node_collapse("node-1").unwrap();
    session.toggle_property_collapse("node-1", "pets").unwrap();
    session.toggle_node_collapse("node-0").unwrap();
    assert!(session.graph().node("node-2").unwrap().hidden);

    session.toggle_node_collapse("node-1").unwrap();
    assert!(!session.is_collapsed("node-0") && !session.is_collapsed("node-1"));
    assert!(!session.is_property_collapsed("node-1", "pets"));
    assert!(session.graph().nodes.iter().all(|n| !n.hidden));
    assert!(session.graph().edges.iter().all(|e| !e.hidden));
}
