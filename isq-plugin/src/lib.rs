//! ISQ Plugin System
//!
//! Provides the traits for exposing quantity operations by name to outer
//! surfaces (tool servers, scripting front-ends).

mod traits;
mod registry;
mod context;

pub use traits::{FunctionPlugin, FunctionMeta, ArgMeta};
pub use registry::PluginRegistry;
pub use context::{EvalContext, TraceStep};

/// Re-export core types for plugin authors
pub mod prelude {
    pub use crate::{
        FunctionPlugin, FunctionMeta, ArgMeta,
        PluginRegistry, EvalContext, TraceStep,
    };
    pub use isq_core::prelude::*;
    pub use serde_json::{json, Value as JsonValue};
}
