//! Debounced background compilation.
//!
//! Edits arrive faster than compiles should run. The worker keeps only the
//! newest submitted text, waits for a quiet period, then compiles on a
//! blocking thread and publishes the complete result in one message. One
//! task owns the whole pipeline, so results are never reordered.

use crate::api::{JsonVizError, compile_source};
use crate::compiler::CompileOptions;
use crate::model::Graph;
use crate::policy::InputLimits;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

/// The result of compiling one submitted text.
#[derive(Debug)]
pub struct CompileOutcome {
    /// Increases by one per compile; later outcomes always have larger values.
    pub generation: u64,
    pub source: Arc<String>,
    pub result: Result<Graph, JsonVizError>,
    pub elapsed: Duration,
}

#[derive(Clone)]
pub struct CompileWorker {
    input: mpsc::UnboundedSender<String>,
    output: watch::Receiver<Option<Arc<CompileOutcome>>>,
}

impl CompileWorker {
    /// Start the worker task. Must be called from inside a tokio runtime.
    pub fn spawn(options: CompileOptions, limits: InputLimits, debounce: Duration) -> Self {
        let (input, rx) = mpsc::unbounded_channel();
        let (tx, output) = watch::channel(None);
        tokio::spawn(run(rx, tx, options, limits, debounce));
        Self { input, output }
    }

    /// Queue `text`, replacing anything not yet compiled. Returns `false`
    /// once the worker has shut down.
    pub fn submit(&self, text: impl Into<String>) -> bool {
        self.input.send(text.into()).is_ok()
    }

    pub fn latest(&self) -> Option<Arc<CompileOutcome>> {
        self.output.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<Arc<CompileOutcome>>> {
        self.output.clone()
    }
}

async fn run(
    mut rx: mpsc::UnboundedReceiver<String>,
    tx: watch::Sender<Option<Arc<CompileOutcome>>>,
    options: CompileOptions,
    limits: InputLimits,
    debounce: Duration,
) {
    let mut generation = 0u64;
    let mut closed = false;

    while !closed {
        let Some(mut pending) = rx.recv().await else {
            break;
        };

        // Restart the quiet period on every new submission
        loop {
            tokio::select! {
                next = rx.recv() => match next {
                    Some(text) => pending = text,
                    None => {
                        closed = true;
                        break;
                    }
                },
                _ = tokio::time::sleep(debounce) => break,
            }
        }

        generation += 1;
        let source = Arc::new(pending);
        let started = Instant::now();
        let text = Arc::clone(&source);
        let options = options.clone();
        let result = match tokio::task::spawn_blocking(move || compile_source(&text, &options, &limits)).await {
            Ok(result) => result,
            Err(e) => {
                warn!(error = %e, "compile task failed");
                Err(JsonVizError::Worker(e.to_string()))
            }
        };

        match &result {
            Ok(graph) => debug!(generation, nodes = graph.node_count(), "published graph"),
            Err(e) => info!(generation, error = %e, "published compile failure"),
        }

        tx.send_replace(Some(Arc::new(CompileOutcome {
            generation,
            source,
            result,
            elapsed: started.elapsed(),
        })));
    }

    debug!("compile worker stopped");
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn next_outcome(
        rx: &mut watch::Receiver<Option<Arc<CompileOutcome>>>,
    ) -> Arc<CompileOutcome> {
        tokio::time::timeout(Duration::from_secs(5), rx.changed())
            .await
            .expect("worker timed out")
            .expect("worker stopped");
        rx.borrow().clone().expect("outcome published")
    }

    #[tokio::test]
    async fn test_burst_compiles_only_last_text() {
        let worker = CompileWorker::spawn(
            CompileOptions::default(),
            InputLimits::free(),
            Duration::from_millis(20),
        );
        let mut rx = worker.subscribe();

        assert!(worker.submit(r#"{"a": 1}"#));
        assert!(worker.submit(r#"{"a": [1, 2]}"#));
        assert!(worker.submit(r#"{"b": [1, 2, 3]}"#));

        let outcome = next_outcome(&mut rx).await;
        assert_eq!(outcome.generation, 1);
        assert_eq!(outcome.source.as_str(), r#"{"b": [1, 2, 3]}"#);
        assert_eq!(outcome.result.as_ref().unwrap().node_count(), 4);
    }

    #[tokio::test]
    async fn test_generations_increase_and_failures_are_published() {
        let worker = CompileWorker::spawn(
            CompileOptions::default(),
            InputLimits::free(),
            Duration::from_millis(5),
        );
        let mut rx = worker.subscribe();

        worker.submit("[1]");
        let first = next_outcome(&mut rx).await;

        worker.submit("{broken");
        let second = next_outcome(&mut rx).await;

        assert!(second.generation > first.generation);
        assert!(first.result.is_ok());
        assert!(second.result.is_err());
        assert_eq!(worker.latest().unwrap().generation, second.generation);
    }
}
