//! Host ↔ worker message protocol
//!
//! Host → worker:
//!
//! | type | data |
//! |------|------|
//! | `calculate` | `{ fixtures, room, options? }` |
//! | `optimize` | `{ room, targetPPFD, fixtureModel: { ppf }, ceilingOffset? }` |
//!
//! Worker → host, zero or more per request: `heatmap`, `metrics`,
//! `spectrum`, `optimized`, `error`.

use photometrics::{
    CalculatorConfig, Fixture, FixturePosition, HeatmapPoint, LayoutRequest, PowerMetrics, Room,
    SpectrumPoint,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{ErrorCode, Result, WorkerError};

/// Raw `{type, data}` message before the operation is resolved
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub data: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculateRequest {
    pub fixtures: Vec<Fixture>,
    pub room: Room,
    #[serde(default)]
    pub options: CalculatorConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum Request {
    Calculate(CalculateRequest),
    Optimize(LayoutRequest),
}

impl Request {
    /// Resolve an envelope into a typed request
    pub fn from_envelope(envelope: Envelope) -> Result<Self> {
        match envelope.kind.as_str() {
            "calculate" => Ok(Self::Calculate(serde_json::from_value(envelope.data)?)),
            "optimize" => Ok(Self::Optimize(serde_json::from_value(envelope.data)?)),
            other => Err(WorkerError::UnsupportedOperation(other.to_string())),
        }
    }

    pub fn from_value(message: Value) -> Result<Self> {
        Self::from_envelope(serde_json::from_value(message)?)
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Calculate(_) => "calculate",
            Self::Optimize(_) => "optimize",
        }
    }

    /// The `{type, data}` form posted to a worker
    pub fn to_message(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }
}

/// Metrics reply payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsReport {
    #[serde(flatten)]
    pub metrics: PowerMetrics,
    /// Wall time of the whole calculation (ms)
    pub calculation_time: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Reply {
    Heatmap { data: Vec<HeatmapPoint> },
    Metrics { data: MetricsReport },
    Spectrum { data: Vec<SpectrumPoint> },
    Optimized { data: Vec<FixturePosition> },
    Error { error: String, code: ErrorCode },
}

impl Reply {
    pub fn error(err: &WorkerError) -> Self {
        Self::Error {
            error: err.to_string(),
            code: err.code(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Error {
            error: message.into(),
            code: ErrorCode::Internal,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Heatmap { .. } => "heatmap",
            Self::Metrics { .. } => "metrics",
            Self::Spectrum { .. } => "spectrum",
            Self::Optimized { .. } => "optimized",
            Self::Error { .. } => "error",
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }
}

/// Merge option overrides into a `calculate` message's `data.options`;
/// other message types are left untouched
pub fn merge_options(message: &mut Value, overrides: Map<String, Value>) {
    if overrides.is_empty() || message.get("type").and_then(Value::as_str) != Some("calculate") {
        return;
    }
    let Some(data) = message.get_mut("data").and_then(Value::as_object_mut) else {
        return;
    };
    let options = data
        .entry("options")
        .or_insert_with(|| Value::Object(Map::new()));
    if !options.is_object() {
        *options = Value::Object(Map::new());
    }
    if let Some(options) = options.as_object_mut() {
        options.extend(overrides);
    }
}
