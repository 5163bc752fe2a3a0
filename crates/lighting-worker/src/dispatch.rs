//! Stateless message dispatch
//!
//! `handle(message) -> [reply...]` is the whole worker contract. Every
//! message gets at least one reply: results in a fixed order, or exactly one
//! `error`. Nothing is kept between calls.

use photometrics::{
    compute_heatmap, compute_metrics, compute_spectrum, light_sources, optimize_layout,
    LayoutRequest,
};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::{Result, WorkerError};
use crate::protocol::{CalculateRequest, Envelope, MetricsReport, Reply, Request};

/// Handle a JSON-encoded `{type, data}` message
pub fn handle(message: &str) -> Vec<Reply> {
    match serde_json::from_str::<Envelope>(message) {
        Ok(envelope) => handle_envelope(envelope),
        Err(e) => reject(WorkerError::from(e)),
    }
}

/// Handle an already-parsed `{type, data}` message
pub fn handle_value(message: Value) -> Vec<Reply> {
    match serde_json::from_value::<Envelope>(message) {
        Ok(envelope) => handle_envelope(envelope),
        Err(e) => reject(WorkerError::from(e)),
    }
}

fn handle_envelope(envelope: Envelope) -> Vec<Reply> {
    match Request::from_envelope(envelope) {
        Ok(request) => handle_request(&request),
        Err(e) => reject(e),
    }
}

/// Run a typed request
pub fn handle_request(request: &Request) -> Vec<Reply> {
    let result = match request {
        Request::Calculate(req) => calculate(req),
        Request::Optimize(req) => optimize(req),
    };

    match result {
        Ok(replies) => {
            info!("{} job finished with {} replies", request.kind(), replies.len());
            replies
        }
        Err(e) => reject(e),
    }
}

fn reject(err: WorkerError) -> Vec<Reply> {
    warn!("Rejecting message: {} ({:?})", err, err.code());
    vec![Reply::error(&err)]
}

/// Heatmap, metrics and spectrum, all computed before any reply is released
fn calculate(req: &CalculateRequest) -> Result<Vec<Reply>> {
    let stopwatch = Stopwatch::start();

    req.room.validate()?;
    req.options.validate()?;
    let sources = light_sources(&req.fixtures, &req.room)?;
    debug!(
        "Calculating {} sources in {:?} room {:?}",
        sources.len(),
        req.room.unit,
        req.room.dimensions
    );

    let heatmap = compute_heatmap(&sources, &req.room, &req.options)?;
    let metrics = compute_metrics(&sources, &req.room, &req.options)?;
    let spectrum = compute_spectrum(&sources);

    let calculation_time = stopwatch.elapsed_ms();

    Ok(vec![
        Reply::Heatmap { data: heatmap },
        Reply::Metrics {
            data: MetricsReport {
                metrics,
                calculation_time,
            },
        },
        Reply::Spectrum { data: spectrum },
    ])
}

fn optimize(req: &LayoutRequest) -> Result<Vec<Reply>> {
    let positions = optimize_layout(req)?;
    Ok(vec![Reply::Optimized { data: positions }])
}

/// Elapsed wall time, in a form that also works inside a browser worker
struct Stopwatch {
    #[cfg(not(all(target_arch = "wasm32", feature = "wasm")))]
    started: std::time::Instant,
    #[cfg(all(target_arch = "wasm32", feature = "wasm"))]
    started_ms: f64,
}

impl Stopwatch {
    #[cfg(not(all(target_arch = "wasm32", feature = "wasm")))]
    fn start() -> Self {
        Self {
            started: std::time::Instant::now(),
        }
    }

    #[cfg(not(all(target_arch = "wasm32", feature = "wasm")))]
    fn elapsed_ms(&self) -> f64 {
        self.started.elapsed().as_secs_f64() * 1000.0
    }

    #[cfg(all(target_arch = "wasm32", feature = "wasm"))]
    fn start() -> Self {
        Self {
            started_ms: js_sys::Date::now(),
        }
    }

    #[cfg(all(target_arch = "wasm32", feature = "wasm"))]
    fn elapsed_ms(&self) -> f64 {
        js_sys::Date::now() - self.started_ms
    }
}
