//! HTTP surface for an interactive renderer.
//!
//! Source edits go through the debounced [`CompileWorker`]. Every published
//! graph replaces the interaction session, keeping only the drag flag; hover
//! and collapse requests then mutate that session under a single lock.

mod routes;

pub use routes::{DragRequest, ErrorResponse, GraphResponse, HoverResponse, InspectQuery, router};

use crate::compiler::CompileOptions;
use crate::fs::FileSystem;
use crate::interaction::GraphSession;
use crate::policy::InputLimits;
use crate::style;
use crate::worker::{CompileOutcome, CompileWorker};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Application state shared across handlers
pub struct AppState {
    pub worker: CompileWorker,
    pub options: CompileOptions,
    pub limits: InputLimits,
    current: Mutex<Current>,
}

/// The graph currently on screen and the text it was compiled from.
#[derive(Default)]
struct Current {
    generation: u64,
    source: Option<Arc<String>>,
    session: Option<GraphSession>,
    /// Error from the newest compile, if it failed. The last good graph stays.
    error: Option<String>,
}

impl AppState {
    pub fn new(worker: CompileWorker, options: CompileOptions, limits: InputLimits) -> Self {
        Self {
            worker,
            options,
            limits,
            current: Mutex::new(Current::default()),
        }
    }

    /// Install a worker result. Outcomes older than the current generation
    /// are dropped. Returns whether anything changed.
    pub async fn apply_outcome(&self, outcome: &CompileOutcome) -> bool {
        let mut current = self.current.lock().await;
        if outcome.generation <= current.generation {
            return false;
        }
        current.generation = outcome.generation;

        match &outcome.result {
            Ok(graph) => {
                let dragging = current.session.as_ref().is_some_and(GraphSession::is_dragging);
                let mut session = GraphSession::new(graph.clone());
                session.set_dragging(dragging);
                current.session = Some(session);
                current.source = Some(Arc::clone(&outcome.source));
                current.error = None;
            }
            Err(e) => current.error = Some(e.to_string()),
        }
        true
    }

    pub async fn generation(&self) -> u64 {
        self.current.lock().await.generation
    }
}

/// Copy every published worker outcome into `state` until the worker stops.
pub async fn follow_worker(state: Arc<AppState>) {
    let mut rx = state.worker.subscribe();
    while rx.changed().await.is_ok() {
        let outcome = rx.borrow_and_update().clone();
        if let Some(outcome) = outcome {
            if state.apply_outcome(&outcome).await {
                debug!(generation = outcome.generation, "session replaced");
            }
        }
    }
}

/// Poll `path` and submit its contents whenever the modification time moves.
pub async fn watch_file(path: PathBuf, fs: Arc<dyn FileSystem>, worker: CompileWorker, interval: Duration) {
    let mut last_modified: Option<SystemTime> = None;
    let mut ticker = tokio::time::interval(interval);

    loop {
        ticker.tick().await;

        let modified = match fs.modified(&path) {
            Ok(m) => m,
            Err(e) => {
                debug!(path = %path.display(), error = %e, "watched file unavailable");
                continue;
            }
        };
        if last_modified == Some(modified) {
            continue;
        }
        last_modified = Some(modified);

        match fs.read_to_string(&path) {
            Ok(text) => {
                info!(path = %path.display(), "file changed, recompiling");
                if !worker.submit(text) {
                    break;
                }
            }
            Err(e) => warn!(path = %path.display(), error = %e, "failed to read watched file"),
        }
    }
}

/// Start the HTTP server
pub async fn serve(state: Arc<AppState>, port: u16, open_browser: bool) -> Result<(), Box<dyn std::error::Error>> {
    tokio::spawn(follow_worker(Arc::clone(&state)));

    let app = router(state);

    let addr = format!("127.0.0.1:{}", port);
    let url = format!("http://{}/api/graph", addr);

    style::status(&format!("Serving graph at {}", style::url(&url)));
    style::hint("Press Ctrl+C to stop");

    if open_browser {
        if let Err(e) = open::that(&url) {
            style::warning(&format!("Could not open browser: {}", e));
        }
    }

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
