use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::task::JoinHandle;

use crate::kernel::component::Lifecycle;
use crate::kernel::error::{Error, Result};
use crate::kernel::shutdown::within;

pub type QueueHandler = Arc<dyn Fn(Value) -> Result<()> + Send + Sync>;

/// Background job queue. Jobs are addressed by name and carry a JSON
/// payload; a handler registered under that name processes them.
pub trait Queue: Lifecycle {
    /// Enqueue a job and return its id.
    fn dispatch(&self, job: &str, payload: Value) -> Result<u64>;

    /// Register the handler for `job`, replacing any previous one.
    fn register_handler(&self, job: &str, handler: QueueHandler);
}

struct QueuedJob {
    id: u64,
    name: String,
    payload: Value,
}

type Handlers = Arc<RwLock<HashMap<String, QueueHandler>>>;

/// Bounded in-process queue drained by a single worker task.
///
/// Jobs dispatched before [`Lifecycle::start`] are buffered. Stopping closes
/// the queue and waits for the buffered jobs to finish, up to the drain
/// timeout.
pub struct MemoryQueue {
    sender: Mutex<Option<mpsc::Sender<QueuedJob>>>,
    receiver: Mutex<Option<mpsc::Receiver<QueuedJob>>>,
    handlers: Handlers,
    worker: Mutex<Option<JoinHandle<()>>>,
    next_id: AtomicU64,
    processed: Arc<AtomicU64>,
    drain_timeout: Duration,
}

impl MemoryQueue {
    pub fn new(capacity: usize, drain_timeout: Duration) -> Self {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        Self {
            sender: Mutex::new(Some(sender)),
            receiver: Mutex::new(Some(receiver)),
            handlers: Arc::new(RwLock::new(HashMap::new())),
            worker: Mutex::new(None),
            next_id: AtomicU64::new(1),
            processed: Arc::new(AtomicU64::new(0)),
            drain_timeout,
        }
    }

    /// Jobs taken off the queue so far, whether they succeeded or not.
    pub fn processed(&self) -> u64 {
        self.processed.load(Ordering::SeqCst)
    }

    async fn work(
        mut receiver: mpsc::Receiver<QueuedJob>,
        handlers: Handlers,
        processed: Arc<AtomicU64>,
    ) {
        while let Some(job) = receiver.recv().await {
            let handler = handlers
                .read()
                .unwrap_or_else(PoisonError::into_inner)
                .get(&job.name)
                .cloned();
            match handler {
                None => log::warn!(
                    "No handler for queued job '{}' (#{}); dropped",
                    job.name,
                    job.id
                ),
                Some(handler) => {
                    let payload = job.payload;
                    match tokio::task::spawn_blocking(move || handler(payload)).await {
                        Ok(Ok(())) => log::debug!("Queued job '{}' (#{}) done", job.name, job.id),
                        Ok(Err(e)) => {
                            log::error!("Queued job '{}' (#{}) failed: {}", job.name, job.id, e)
                        }
                        Err(e) => {
                            log::error!("Queued job '{}' (#{}) panicked: {}", job.name, job.id, e)
                        }
                    }
                }
            }
            processed.fetch_add(1, Ordering::SeqCst);
        }
        log::debug!("Queue worker exiting");
    }
}

impl Queue for MemoryQueue {
    fn dispatch(&self, job: &str, payload: Value) -> Result<u64> {
        let sender = self.sender.lock().unwrap_or_else(PoisonError::into_inner);
        let sender = sender
            .as_ref()
            .ok_or_else(|| Error::service("queue", "queue is closed"))?;

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let queued = QueuedJob {
            id,
            name: job.to_string(),
            payload,
        };
        match sender.try_send(queued) {
            Ok(()) => {
                log::debug!("Dispatched job '{}' (#{})", job, id);
                Ok(id)
            }
            Err(TrySendError::Full(_)) => Err(Error::service("queue", "queue is full")),
            Err(TrySendError::Closed(_)) => Err(Error::service("queue", "queue is closed")),
        }
    }

    fn register_handler(&self, job: &str, handler: QueueHandler) {
        log::debug!("Queue handler registered: {}", job);
        self.handlers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(job.to_string(), handler);
    }
}

#[async_trait]
impl Lifecycle for MemoryQueue {
    fn name(&self) -> &str {
        "memory-queue"
    }

    async fn start(&self) -> Result<()> {
        let receiver = self
            .receiver
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
            .ok_or_else(|| Error::service("queue", "worker already started"))?;

        let handle = tokio::spawn(Self::work(
            receiver,
            self.handlers.clone(),
            self.processed.clone(),
        ));
        *self.worker.lock().unwrap_or_else(PoisonError::into_inner) = Some(handle);
        log::info!("Queue worker started");
        Ok(())
    }

    async fn stop(&self) -> Result<()> {
        // Dropping the only sender lets the worker finish once the buffer is
        // empty.
        self.sender
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        let worker = self
            .worker
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        let Some(worker) = worker else {
            return Ok(());
        };

        let abort = worker.abort_handle();
        let drained = within("queue drain", self.drain_timeout, async move {
            if let Err(e) = worker.await {
                log::error!("Queue worker ended abnormally: {}", e);
            }
            Ok(())
        })
        .await;
        match &drained {
            Ok(()) => log::info!("Queue worker stopped ({} job(s) processed)", self.processed()),
            Err(_) => abort.abort(),
        }
        drained
    }
}
