use super::AppState;
use crate::api::compile_source;
use crate::interaction::{CollapseChange, Highlight};
use crate::model::Graph;
use crate::resolver::{self, Resolved};
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post, put},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

fn no_graph() -> ApiError {
    api_error(StatusCode::NOT_FOUND, "No graph has been compiled yet")
}

#[derive(Debug, Serialize)]
pub struct GraphResponse {
    pub generation: u64,
    pub graph: Graph,
    /// Set when the newest compile failed and `graph` is the previous one.
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct InspectQuery {
    pub label: String,
}

#[derive(Debug, Serialize)]
pub struct HoverResponse {
    pub highlight: Option<Highlight>,
}

#[derive(Debug, Deserialize)]
pub struct DragRequest {
    pub dragging: bool,
}

pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any);

    Router::new()
        .route("/api/source", put(put_source))
        .route("/api/compile", post(post_compile))
        .route("/api/graph", get(get_graph))
        .route("/api/inspect", get(get_inspect))
        .route("/api/nodes/{id}/hover", post(post_hover))
        .route("/api/hover", delete(delete_hover))
        .route("/api/nodes/{id}/collapse", post(post_collapse))
        .route("/api/nodes/{id}/properties/{key}/collapse", post(post_property_collapse))
        .route("/api/drag", put(put_drag))
        .layer(cors)
        .with_state(state)
}

/// Queue new source text for debounced compilation.
async fn put_source(State(state): State<Arc<AppState>>, body: String) -> Result<StatusCode, ApiError> {
    if state.worker.submit(body) {
        Ok(StatusCode::ACCEPTED)
    } else {
        Err(api_error(StatusCode::SERVICE_UNAVAILABLE, "Compile worker is not running"))
    }
}

/// Compile right away without touching the live session.
async fn post_compile(State(state): State<Arc<AppState>>, body: String) -> Result<Json<Graph>, ApiError> {
    let options = state.options.clone();
    let limits = state.limits;
    let result = tokio::task::spawn_blocking(move || compile_source(&body, &options, &limits))
        .await
        .map_err(|e| api_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    result
        .map(Json)
        .map_err(|e| api_error(StatusCode::UNPROCESSABLE_ENTITY, e.to_string()))
}

async fn get_graph(State(state): State<Arc<AppState>>) -> Result<Json<GraphResponse>, ApiError> {
    let current = state.current.lock().await;
    match &current.session {
        Some(session) => Ok(Json(GraphResponse {
            generation: current.generation,
            graph: session.graph().clone(),
            error: current.error.clone(),
        })),
        None => match &current.error {
            Some(e) => Err(api_error(StatusCode::UNPROCESSABLE_ENTITY, e.clone())),
            None => Err(no_graph()),
        },
    }
}

/// Resolve a label against the source of the graph on screen.
async fn get_inspect(
    State(state): State<Arc<AppState>>,
    Query(query): Query<InspectQuery>,
) -> Result<Json<Resolved>, ApiError> {
    let source = state
        .current
        .lock()
        .await
        .source
        .clone()
        .ok_or_else(no_graph)?;

    resolver::resolve_text(&source, &query.label)
        .map(Json)
        .map_err(|e| api_error(StatusCode::NOT_FOUND, e.to_string()))
}

async fn post_hover(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<HoverResponse>, ApiError> {
    let mut current = state.current.lock().await;
    let session = current.session.as_mut().ok_or_else(no_graph)?;
    let highlight = session.hover_enter(&id).cloned();
    Ok(Json(HoverResponse { highlight }))
}

async fn delete_hover(State(state): State<Arc<AppState>>) -> StatusCode {
    if let Some(session) = state.current.lock().await.session.as_mut() {
        session.hover_leave();
    }
    StatusCode::NO_CONTENT
}

async fn post_collapse(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<CollapseChange>, ApiError> {
    let mut current = state.current.lock().await;
    let session = current.session.as_mut().ok_or_else(no_graph)?;
    session
        .toggle_node_collapse(&id)
        .map(Json)
        .ok_or_else(|| api_error(StatusCode::NOT_FOUND, format!("No node with id '{}'", id)))
}

async fn post_property_collapse(
    State(state): State<Arc<AppState>>,
    Path((id, key)): Path<(String, String)>,
) -> Result<Json<CollapseChange>, ApiError> {
    let mut current = state.current.lock().await;
    let session = current.session.as_mut().ok_or_else(no_graph)?;
    session
        .toggle_property_collapse(&id, &key)
        .map(Json)
        .ok_or_else(|| {
            api_error(
                StatusCode::NOT_FOUND,
                format!("Property '{}' of node '{}' has nothing to collapse", key, id),
            )
        })
}

async fn put_drag(State(state): State<Arc<AppState>>, Json(request): Json<DragRequest>) -> StatusCode {
    if let Some(session) = state.current.lock().await.session.as_mut() {
        session.set_dragging(request.dragging);
    }
    StatusCode::NO_CONTENT
}
