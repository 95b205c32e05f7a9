// src/system/dispatch.rs

use crate::system::executor::{ExecutionError, ExecutionGateway, ExecutionReport, ExecutionRequest};
use std::collections::HashSet;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tokio::runtime::{Builder, Runtime};
use tokio::sync::mpsc;
use uuid::Uuid;

/// Errors from the dispatcher itself. Failures of a run travel inside its event.
#[derive(Error, Debug)]
pub enum DispatchError {
    /// The tokio runtime could not be built.
    #[error("Failed to start the execution runtime: {0}")]
    Runtime(#[source] io::Error),
    /// The Ctrl+C handler could not be installed.
    #[error("Failed to listen for Ctrl+C: {0}")]
    Signal(#[source] io::Error),
    /// A request for the same file has not reported back yet.
    #[error("An execution for '{path}' is already running.")]
    AlreadyRunning {
        /// The file of the rejected request.
        path: String,
    },
    /// Waited with nothing in flight.
    #[error("No execution is running.")]
    Idle,
    /// Ctrl+C arrived while waiting.
    #[error("Interrupted while waiting for the execution to finish.")]
    Interrupted,
    /// Every sender is gone.
    #[error("The execution worker stopped without reporting a result.")]
    ChannelClosed,
}

/// The outcome of one request, delivered back to the caller.
#[derive(Debug)]
pub struct ExecutionEvent {
    /// The request as submitted.
    pub request: ExecutionRequest,
    /// What the gateway returned for it.
    pub result: Result<ExecutionReport, ExecutionError>,
}

/// Runs requests on background worker threads and hands their results back as events.
///
/// Each request is a detached job. There is no queue and no retry, and a running child
/// process is never killed. Only one request per file may be in flight at a time.
pub struct ExecutionDispatcher {
    runtime: Runtime,
    gateway: Arc<dyn ExecutionGateway>,
    events_tx: mpsc::UnboundedSender<ExecutionEvent>,
    events_rx: mpsc::UnboundedReceiver<ExecutionEvent>,
    in_flight: HashSet<PathBuf>,
}

impl fmt::Debug for ExecutionDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecutionDispatcher")
            .field("in_flight", &self.in_flight)
            .finish_non_exhaustive()
    }
}

impl ExecutionDispatcher {
    /// Starts a one-worker runtime that hands requests to `gateway`.
    pub fn new(gateway: Arc<dyn ExecutionGateway>) -> Result<Self, DispatchError> {
        let runtime = Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("tgr-exec")
            .enable_all()
            .build()
            .map_err(DispatchError::Runtime)?;
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Ok(Self {
            runtime,
            gateway,
            events_tx,
            events_rx,
            in_flight: HashSet::new(),
        })
    }

    /// Starts `request` in the background and returns its id.
    pub fn submit(&mut self, request: ExecutionRequest) -> Result<Uuid, DispatchError> {
        if !self.in_flight.insert(request.file_path.clone()) {
            return Err(DispatchError::AlreadyRunning {
                path: request.file_path.display().to_string(),
            });
        }

        let id = request.id;
        let gateway = Arc::clone(&self.gateway);
        let events_tx = self.events_tx.clone();
        log::debug!("Dispatching execution {} for '{}'", id, request.file_path.display());

        self.runtime.spawn_blocking(move || {
            let result = gateway.execute(&request);
            // The receiver only goes away with the dispatcher itself.
            let _ = events_tx.send(ExecutionEvent { request, result });
        });
        Ok(id)
    }

    /// Blocks until the next execution finishes, or until Ctrl+C is pressed.
    pub fn wait_next(&mut self) -> Result<ExecutionEvent, DispatchError> {
        if self.in_flight.is_empty() {
            return Err(DispatchError::Idle);
        }

        let events_rx = &mut self.events_rx;
        let event = self.runtime.block_on(async move {
            tokio::select! {
                event = events_rx.recv() => event.ok_or(DispatchError::ChannelClosed),
                signal = tokio::signal::ctrl_c() => match signal {
                    Ok(()) => Err(DispatchError::Interrupted),
                    Err(e) => Err(DispatchError::Signal(e)),
                },
            }
        })?;

        self.in_flight.remove(&event.request.file_path);
        Ok(event)
    }

    /// Returns a finished execution if one is ready, without blocking.
    pub fn try_next(&mut self) -> Option<ExecutionEvent> {
        let event = self.events_rx.try_recv().ok()?;
        self.in_flight.remove(&event.request.file_path);
        Some(event)
    }

    /// Number of submitted requests whose event has not been collected yet.
    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    /// Whether a request for `path` was submitted and its event not yet collected.
    pub fn is_running(&self, path: &Path) -> bool {
        self.in_flight.contains(path)
    }
}
