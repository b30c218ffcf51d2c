//! Evaluation Context

use serde::Serialize;
use serde_json::Value as JsonValue;

/// Evaluation context passed to plugins
#[derive(Debug, Default)]
pub struct EvalContext {
    pub tracing: bool,
    pub trace: Vec<TraceStep>,
}

/// Single function call in an evaluation trace
#[derive(Debug, Clone, Serialize)]
pub struct TraceStep {
    pub function: String,
    pub args: Vec<JsonValue>,
    pub result: JsonValue,
    pub ok: bool,
}

impl EvalContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tracing(mut self, enabled: bool) -> Self {
        self.tracing = enabled;
        self
    }

    pub fn record_trace(&mut self, function: &str, args: &[JsonValue], result: JsonValue, ok: bool) {
        if self.tracing {
            self.trace.push(TraceStep {
                function: function.to_string(),
                args: args.to_vec(),
                result,
                ok,
            });
        }
    }

    /// Take the recorded steps, leaving the trace empty
    pub fn take_trace(&mut self) -> Vec<TraceStep> {
        std::mem::take(&mut self.trace)
    }
}
