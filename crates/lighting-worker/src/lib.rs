//! Lighting Worker
//!
//! Message-driven front end for the photometrics calculators. Hosts post
//! `{type, data}` messages and receive `{type, ...}` replies:
//!
//! - `calculate` → `heatmap`, `metrics`, `spectrum` (in that order)
//! - `optimize` → `optimized`
//! - anything malformed or unknown → exactly one `error`
//!
//! The same dispatcher backs the in-process worker thread, the
//! `lighting-calc` CLI and the WASM export.

pub mod dispatch;
pub mod error;
pub mod protocol;
pub mod report;

#[cfg(not(target_arch = "wasm32"))]
pub mod worker;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use dispatch::{handle, handle_request, handle_value};
pub use error::{ErrorCode, Result, WorkerError};
pub use protocol::{merge_options, CalculateRequest, Envelope, MetricsReport, Reply, Request};
pub use report::render_summary;

#[cfg(not(target_arch = "wasm32"))]
pub use worker::{LightingWorker, ReplyStream, WorkerHandle};
