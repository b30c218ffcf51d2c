//! Quantity type - a magnitude with an associated unit

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;
use crate::{DimensionVector, QuantityError, Unit, UnitRegistry};

/// A physical quantity: a magnitude, its unit, and an absolute standard
/// uncertainty expressed in the same unit.
#[derive(Debug, Clone)]
pub struct Quantity {
    pub(crate) magnitude: f64,
    pub(crate) unit: Arc<Unit>,
    pub(crate) uncertainty: f64,
}

impl Quantity {
    pub fn new(magnitude: f64, unit: Arc<Unit>) -> Self {
        Quantity { magnitude, unit, uncertainty: 0.0 }
    }

    /// Quantity in a unit of the global registry
    pub fn of(magnitude: f64, symbol: &str) -> Result<Self, QuantityError> {
        UnitRegistry::global().quantity(magnitude, symbol)
    }

    /// Create a dimensionless quantity (pure number)
    pub fn dimensionless(value: f64) -> Self {
        Quantity::new(value, Arc::new(Unit::coherent(DimensionVector::DIMENSIONLESS)))
    }

    /// Same quantity with a standard uncertainty (stored as absolute value)
    pub fn with_uncertainty(mut self, uncertainty: f64) -> Self {
        self.uncertainty = uncertainty.abs();
        self
    }

    pub fn magnitude(&self) -> f64 {
        self.magnitude
    }

    pub fn unit(&self) -> &Arc<Unit> {
        &self.unit
    }

    pub fn symbol(&self) -> &str {
        self.unit.symbol()
    }

    pub fn dimension(&self) -> DimensionVector {
        self.unit.dimension()
    }

    pub fn uncertainty(&self) -> f64 {
        self.uncertainty
    }

    /// Uncertainty relative to the magnitude
    pub fn relative_uncertainty(&self) -> f64 {
        if self.uncertainty == 0.0 {
            0.0
        } else {
            self.uncertainty / self.magnitude.abs()
        }
    }

    pub fn is_dimensionless(&self) -> bool {
        self.dimension().is_dimensionless()
    }

    /// Check if two quantities have compatible dimensions
    pub fn is_compatible(&self, other: &Quantity) -> bool {
        self.unit.is_compatible(&other.unit)
    }

    /// Convert to a unit of the global registry
    pub fn convert_to(&self, symbol: &str) -> Result<Quantity, QuantityError> {
        UnitRegistry::global().convert(self, symbol)
    }

    /// Convert to another unit of the same dimension
    pub fn convert_to_unit(&self, target: &Arc<Unit>) -> Result<Quantity, QuantityError> {
        let factor = self.unit.conversion_factor(target)?;
        Ok(Quantity {
            magnitude: self.magnitude * factor,
            unit: Arc::clone(target),
            uncertainty: self.uncertainty * factor,
        })
    }

    /// Magnitude in coherent SI units
    pub fn base_magnitude(&self) -> f64 {
        self.unit.to_base(self.magnitude)
    }

    /// Express in the coherent base-unit combination of this dimension
    pub fn to_base_units(&self) -> Quantity {
        Quantity {
            magnitude: self.base_magnitude(),
            unit: Arc::new(Unit::coherent(self.dimension())),
            uncertainty: self.unit.to_base(self.uncertainty),
        }
    }

    /// Magnitude in a unit of the global registry, for feeding plain formulas
    pub fn value_in(&self, symbol: &str) -> Result<f64, QuantityError> {
        Ok(self.convert_to(symbol)?.magnitude)
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = if self.uncertainty > 0.0 && self.uncertainty.is_finite() {
            concise(self.magnitude, self.uncertainty)
        } else {
            format!("{}", self.magnitude)
        };

        if self.unit.symbol().is_empty() {
            write!(f, "{}", value)
        } else {
            write!(f, "{} {}", value, self.unit.symbol())
        }
    }
}

/// Concise notation: the uncertainty's two leading digits in parentheses,
/// aligned with the last printed digits of the value (`1.000(10)`).
fn concise(value: f64, uncertainty: f64) -> String {
    let exponent = uncertainty.log10().floor() as i32;
    let mut decimals = (1 - exponent).max(0);
    let mut digits = (uncertainty * 10f64.powi(decimals)).round();
    // Rounding 99.5.. up to 100 moves the leading digit one place left
    if digits >= 100.0 && decimals > 0 {
        decimals -= 1;
        digits = (uncertainty * 10f64.powi(decimals)).round();
    }
    format!("{:.*}({})", decimals as usize, value, digits)
}

impl PartialEq for Quantity {
    fn eq(&self, other: &Self) -> bool {
        matches!(self.compare(other), Ok(Ordering::Equal))
    }
}

impl PartialOrd for Quantity {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.compare(other).ok()
    }
}
