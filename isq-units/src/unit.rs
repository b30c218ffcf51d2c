//! Unit representation with scale factors

use std::fmt;
use serde::{Serialize, Deserialize};
use crate::{DimensionVector, QuantityError};

/// How a unit came to exist
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitKind {
    /// Registered base unit of one ISQ base quantity
    Base,
    /// Registered derived or named unit
    Derived,
    /// Base-unit combination synthesized for an arithmetic result
    Coherent,
}

/// A physical unit: a dimension and a scale factor to the coherent SI unit
/// of that dimension (`value_si = value * scale`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    symbol: String,
    name: String,
    dimension: DimensionVector,
    scale: f64,
    kind: UnitKind,
}

impl Unit {
    pub(crate) fn base(symbol: &str, name: &str, dimension: DimensionVector) -> Self {
        Unit {
            symbol: symbol.to_string(),
            name: name.to_string(),
            dimension,
            scale: 1.0,
            kind: UnitKind::Base,
        }
    }

    pub(crate) fn derived(
        symbol: &str,
        name: &str,
        dimension: DimensionVector,
        scale: f64,
    ) -> Result<Self, QuantityError> {
        if !scale.is_finite() || scale <= 0.0 {
            return Err(QuantityError::InvalidScale {
                symbol: symbol.to_string(),
                scale,
            });
        }
        Ok(Unit {
            symbol: symbol.to_string(),
            name: name.to_string(),
            dimension,
            scale,
            kind: UnitKind::Derived,
        })
    }

    /// The canonical base-unit combination for a dimension, e.g. `m²` or
    /// `m·kg·s⁻²`. Dimensionless gets an empty symbol.
    pub fn coherent(dimension: DimensionVector) -> Self {
        let symbol = dimension.components()
            .map(|(base, exp)| {
                if exp == 1 {
                    base.si_unit_symbol().to_string()
                } else {
                    format!("{}{}", base.si_unit_symbol(), superscript(exp))
                }
            })
            .collect::<Vec<_>>()
            .join("·");

        let name = match dimension.name() {
            Some(n) => format!("coherent unit of {}", n),
            None => format!("coherent unit of {}", dimension),
        };

        Unit {
            symbol,
            name,
            dimension,
            scale: 1.0,
            kind: UnitKind::Coherent,
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dimension(&self) -> DimensionVector {
        self.dimension
    }

    /// How many coherent SI units one of this unit equals
    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn kind(&self) -> UnitKind {
        self.kind
    }

    /// Scale factor exactly 1 relative to the SI base-unit combination
    pub fn is_coherent(&self) -> bool {
        self.scale == 1.0
    }

    /// Check if two units are dimensionally compatible (can be converted)
    pub fn is_compatible(&self, other: &Unit) -> bool {
        self.dimension.equals(&other.dimension)
    }

    /// Convert a magnitude in this unit to coherent SI units
    pub fn to_base(&self, value: f64) -> f64 {
        value * self.scale
    }

    /// Factor that turns a magnitude in this unit into one in `target`
    pub fn conversion_factor(&self, target: &Unit) -> Result<f64, QuantityError> {
        if !self.is_compatible(target) {
            return Err(QuantityError::incompatible(self, target));
        }
        Ok(self.scale / target.scale)
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol)
    }
}

/// Render an integer exponent with Unicode superscript digits
pub(crate) fn superscript(exp: i32) -> String {
    exp.to_string()
        .chars()
        .map(|c| match c {
            '-' => '⁻',
            '0' => '⁰',
            '1' => '¹',
            '2' => '²',
            '3' => '³',
            '4' => '⁴',
            '5' => '⁵',
            '6' => '⁶',
            '7' => '⁷',
            '8' => '⁸',
            '9' => '⁹',
            other => other,
        })
        .collect()
}
