use std::sync::Arc;

use tokio::runtime::{Builder, Handle, Runtime};
use tokio::sync::mpsc::{
    UnboundedReceiver, UnboundedSender, error::TryRecvError, unbounded_channel,
};
use tokio::task::JoinHandle;

use crate::error::{AppError, AppResult};
use crate::overlay::{QueryStatus, SearchPage};

use super::provider::SearchProvider;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryEvent {
    Completed {
        generation: u64,
        page: SearchPage,
    },
    Failed {
        generation: u64,
        status: QueryStatus,
        message: String,
    },
}

struct QueryJob {
    generation: u64,
    query: String,
    start_index: u64,
}

enum WorkerRequest {
    Query(QueryJob),
    Shutdown,
}

/// Runs provider queries off the UI thread. Each submission is tagged with
/// an incrementing generation; completions are drained non-blockingly by
/// the caller, which decides whether a generation is still current.
///
/// There is no cancellation of a job the worker already started. Jobs that
/// are still queued when a newer one arrives are superseded and never run.
pub struct QueryEngine {
    core: Option<EngineCore>,
    next_generation: u64,
}

struct EngineCore {
    request_tx: UnboundedSender<WorkerRequest>,
    event_rx: UnboundedReceiver<QueryEvent>,
    _runtime: QueryWorkerRuntime,
    worker: Option<JoinHandle<()>>,
}

struct QueryWorkerRuntime {
    _owned: Option<Runtime>,
    handle: Handle,
}

impl QueryWorkerRuntime {
    fn new() -> Self {
        if let Ok(handle) = Handle::try_current() {
            return Self {
                _owned: None,
                handle,
            };
        }

        let runtime = Builder::new_multi_thread()
            .enable_all()
            .thread_name("usearch-query")
            .build()
            .expect("query runtime should initialize");
        let handle = runtime.handle().clone();
        Self {
            _owned: Some(runtime),
            handle,
        }
    }

    fn spawn_blocking<F>(&self, task: F) -> JoinHandle<()>
    where
        F: FnOnce() + Send + 'static,
    {
        self.handle.spawn_blocking(task)
    }
}

impl QueryEngine {
    pub fn with_provider(provider: Arc<dyn SearchProvider>, per_page: usize) -> Self {
        let (request_tx, request_rx) = unbounded_channel();
        let (event_tx, event_rx) = unbounded_channel();
        let runtime = QueryWorkerRuntime::new();
        let per_page = per_page.max(1);
        let worker =
            runtime.spawn_blocking(move || worker_main(request_rx, event_tx, provider, per_page));

        Self {
            core: Some(EngineCore {
                request_tx,
                event_rx,
                _runtime: runtime,
                worker: Some(worker),
            }),
            next_generation: 0,
        }
    }

    /// An engine with no query capability: `submit` always fails and
    /// `has_provider` reports false.
    pub fn without_provider() -> Self {
        Self {
            core: None,
            next_generation: 0,
        }
    }

    pub fn has_provider(&self) -> bool {
        self.core.is_some()
    }

    pub fn submit(&mut self, query: impl Into<String>, start_index: u64) -> AppResult<u64> {
        let Some(core) = self.core.as_ref() else {
            return Err(AppError::unsupported("no query capability is configured"));
        };

        self.next_generation = self.next_generation.saturating_add(1);
        let generation = self.next_generation;
        let job = QueryJob {
            generation,
            query: query.into(),
            start_index,
        };

        core.request_tx
            .send(WorkerRequest::Query(job))
            .map_err(|_| AppError::unsupported("query worker is not available"))?;

        Ok(generation)
    }

    pub fn drain_events(&mut self) -> Vec<QueryEvent> {
        let Some(core) = self.core.as_mut() else {
            return Vec::new();
        };

        let mut drained = Vec::new();
        loop {
            match core.event_rx.try_recv() {
                Ok(event) => drained.push(event),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => break,
            }
        }

        drained
    }
}

impl Drop for EngineCore {
    fn drop(&mut self) {
        let _ = self.request_tx.send(WorkerRequest::Shutdown);
        if let Some(worker) = self.worker.take() {
            worker.abort();
        }
    }
}

fn worker_main(
    mut request_rx: UnboundedReceiver<WorkerRequest>,
    event_tx: UnboundedSender<QueryEvent>,
    provider: Arc<dyn SearchProvider>,
    per_page: usize,
) {
    loop {
        let job = match request_rx.blocking_recv() {
            Some(WorkerRequest::Query(job)) => job,
            Some(WorkerRequest::Shutdown) | None => break,
        };
        let Some(job) = drain_to_latest(&mut request_rx, job) else {
            break;
        };

        let event = match provider.execute(&job.query, job.start_index, per_page) {
            Ok(page) => QueryEvent::Completed {
                generation: job.generation,
                page,
            },
            Err(failure) => QueryEvent::Failed {
                generation: job.generation,
                status: failure.status,
                message: failure.message,
            },
        };
        if event_tx.send(event).is_err() {
            break;
        }
    }
}

/// Collapses the queue down to the newest pending query.
fn drain_to_latest(
    request_rx: &mut UnboundedReceiver<WorkerRequest>,
    newest: QueryJob,
) -> Option<QueryJob> {
    let mut newest = newest;
    loop {
        match request_rx.try_recv() {
            Ok(WorkerRequest::Query(job)) => newest = job,
            Ok(WorkerRequest::Shutdown) => return None,
            Err(TryRecvError::Empty) => return Some(newest),
            Err(TryRecvError::Disconnected) => return None,
        }
    }
}
