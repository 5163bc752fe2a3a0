//! Background calculation worker
//!
//! One dedicated thread drains a job queue in FIFO order so heavy grids never
//! block the caller's event loop. Each posted message gets its own reply
//! stream; the stream ends once the worker has emitted every reply for it.

use std::panic::{self, AssertUnwindSafe};
use std::thread;

use serde_json::Value;
use tokio::sync::mpsc;
use tracing::{debug, error, info};

use crate::dispatch::handle_value;
use crate::error::{Result, WorkerError};
use crate::protocol::Reply;

const THREAD_NAME: &str = "lighting-worker";

/// Turns one message into its replies
type Handler = fn(Value) -> Vec<Reply>;

struct Job {
    id: u64,
    message: Value,
    replies: mpsc::UnboundedSender<Reply>,
}

enum Command {
    Run(Job),
    Stop,
}

/// Owns the worker thread; jobs are posted through [`WorkerHandle`]s
pub struct LightingWorker {
    handle: WorkerHandle,
    thread: Option<thread::JoinHandle<()>>,
}

/// Cheap, clonable sender side of a [`LightingWorker`]
#[derive(Clone)]
pub struct WorkerHandle {
    jobs: mpsc::UnboundedSender<Command>,
    next_id: std::sync::Arc<std::sync::atomic::AtomicU64>,
}

/// Replies for one posted message, in emission order
pub struct ReplyStream {
    job_id: u64,
    replies: mpsc::UnboundedReceiver<Reply>,
}

impl LightingWorker {
    /// Start the worker thread
    pub fn spawn() -> Result<Self> {
        Self::spawn_with(handle_value)
    }

    fn spawn_with(handler: Handler) -> Result<Self> {
        let (jobs_tx, jobs_rx) = mpsc::unbounded_channel::<Command>();
        let thread = thread::Builder::new()
            .name(THREAD_NAME.to_string())
            .spawn(move || run(jobs_rx, handler))?;

        info!("Lighting worker started");
        Ok(Self {
            handle: WorkerHandle {
                jobs: jobs_tx,
                next_id: Default::default(),
            },
            thread: Some(thread),
        })
    }

    pub fn handle(&self) -> WorkerHandle {
        self.handle.clone()
    }

    /// Post a message through the owned handle
    pub fn post(&self, message: Value) -> Result<ReplyStream> {
        self.handle.post(message)
    }

    /// Drain jobs queued so far, then stop the thread. Handles still held
    /// elsewhere get [`WorkerError::WorkerClosed`] afterwards.
    pub fn shutdown(mut self) {
        let Some(thread) = self.thread.take() else {
            return;
        };
        if self.handle.jobs.send(Command::Stop).is_err() {
            debug!("Lighting worker already stopped");
        }
        if thread.join().is_err() {
            error!("Lighting worker thread panicked during shutdown");
        }
        info!("Lighting worker stopped");
    }
}

impl WorkerHandle {
    /// Queue a `{type, data}` message. Fails only when the worker is gone.
    pub fn post(&self, message: Value) -> Result<ReplyStream> {
        let id = self
            .next_id
            .fetch_add(1, std::sync::atomic::Ordering::Relaxed);
        let (replies_tx, replies_rx) = mpsc::unbounded_channel();
        self.jobs
            .send(Command::Run(Job {
                id,
                message,
                replies: replies_tx,
            }))
            .map_err(|_| WorkerError::WorkerClosed)?;
        Ok(ReplyStream {
            job_id: id,
            replies: replies_rx,
        })
    }

    pub fn is_closed(&self) -> bool {
        self.jobs.is_closed()
    }
}

impl ReplyStream {
    pub fn job_id(&self) -> u64 {
        self.job_id
    }

    /// Next reply, or `None` once the job is complete
    pub async fn next(&mut self) -> Option<Reply> {
        self.replies.recv().await
    }

    /// Every reply for the job
    pub async fn collect(mut self) -> Vec<Reply> {
        let mut out = Vec::new();
        while let Some(reply) = self.replies.recv().await {
            out.push(reply);
        }
        out
    }

    /// Blocking variant of [`collect`](Self::collect) for synchronous hosts.
    /// Must not be called from inside an async runtime.
    pub fn blocking_collect(mut self) -> Vec<Reply> {
        let mut out = Vec::new();
        while let Some(reply) = self.replies.blocking_recv() {
            out.push(reply);
        }
        out
    }
}

fn run(mut jobs: mpsc::UnboundedReceiver<Command>, handler: Handler) {
    while let Some(command) = jobs.blocking_recv() {
        let job = match command {
            Command::Run(job) => job,
            Command::Stop => break,
        };
        debug!("Job {} started", job.id);
        let message = job.message;
        let replies = panic::catch_unwind(AssertUnwindSafe(move || handler(message)))
            .unwrap_or_else(|cause| {
                let detail = cause
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| cause.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".to_string());
                error!("Job {} panicked: {}", job.id, detail);
                vec![Reply::internal(format!("calculation panicked: {}", detail))]
            });

        for reply in replies {
            if job.replies.send(reply).is_err() {
                debug!("Job {} receiver dropped, discarding replies", job.id);
                break;
            }
        }
        debug!("Job {} complete", job.id);
        // dropping job.replies ends the stream
    }
    debug!("Worker thread exiting");
}
