//! ISQ Core - Fundamental types
//!
//! This crate provides the types shared by every ISQ crate:
//! - `IsqError`: Structured errors with machine-readable codes
//! - `Severity`, `ErrorContext`: error metadata

mod error;

pub use error::{IsqError, ErrorContext, Severity, codes};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{IsqError, Severity};
    pub use crate::error::codes;
}
