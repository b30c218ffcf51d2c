//! ISQ Units - Dimensional analysis over the International System of Quantities
//!
//! Quantities are (magnitude, unit) pairs. Every unit carries a dimension
//! vector over the seven ISQ base quantities and a scale factor to the
//! coherent SI unit of that dimension, so arithmetic can check and derive
//! dimensions exactly while magnitudes stay plain `f64`.
//!
//! Components:
//! - `DimensionVector`: integer exponents over length, mass, time, current,
//!   temperature, amount of substance and luminous intensity
//! - `UnitRegistry`: sealed symbol → unit table, optionally process-wide
//! - `Quantity`: magnitude, unit and standard uncertainty
//! - Quantity algebra: add, subtract, multiply, divide, power, sqrt, exp,
//!   reciprocal, compare
//!
//! ```
//! use isq_units::{DimensionVector, Quantity};
//!
//! let side = Quantity::of(3.0, "m").unwrap();
//! let area = side.multiply(&Quantity::of(4.0, "m").unwrap()).unwrap();
//! assert_eq!(area.magnitude(), 12.0);
//! assert_eq!(area.dimension(), DimensionVector::AREA);
//! assert_eq!(area.to_string(), "12 m²");
//! ```

mod dimension;
mod unit;
mod error;
mod registry;
mod quantity;
mod algebra;
mod functions;
pub mod config;
pub mod si;

pub use dimension::{BaseQuantity, DimensionVector, BASE_COUNT};
pub use unit::{Unit, UnitKind};
pub use error::QuantityError;
pub use registry::{UnitRegistry, UnitRegistryBuilder};
pub use quantity::Quantity;
pub use config::{RegistryConfig, UnitDefinition};

use isq_plugin::PluginRegistry;

/// Load unit functions into registry
pub fn load_units_library(registry: PluginRegistry) -> PluginRegistry {
    registry
        // Construction and conversion
        .with_function(functions::QuantityFn)
        .with_function(functions::Convert)
        .with_function(functions::ToBase)

        // Algebra
        .with_function(functions::Add)
        .with_function(functions::Subtract)
        .with_function(functions::Multiply)
        .with_function(functions::Divide)
        .with_function(functions::Power)
        .with_function(functions::Sqrt)
        .with_function(functions::Recip)
        .with_function(functions::DivideBy)
        .with_function(functions::Exp)
        .with_function(functions::Compare)

        // Inspection
        .with_function(functions::Dimensions)
        .with_function(functions::Compatible)
        .with_function(functions::Units)
}
