/// Hands out node and edge ids for one compilation run.
///
/// The allocator is owned by the builder and threaded through the whole
/// recursion, so two runs never share a counter and every id inside a run is
/// distinct.
#[derive(Debug, Default)]
pub struct IdAllocator {
    next_node: usize,
    next_edge: usize,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node_id(&mut self) -> String {
        let id = format!("node-{}", self.next_node);
        self.next_node += 1;
        id
    }

    /// Edge ids embed both endpoints plus a sequence number, so the same
    /// pair can never produce the same id twice.
    pub fn edge_id(&mut self, source: &str, target: &str) -> String {
        let id = format!("e-{}-{}-{}", source, target, self.next_edge);
        self.next_edge += 1;
        id
    }

    pub fn nodes_issued(&self) -> usize {
        self.next_node
    }
}
