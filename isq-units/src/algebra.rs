//! Quantity algebra
//!
//! Every operation is pure and returns a fresh quantity. Sums and
//! differences stay in the left operand's unit; products, quotients, powers
//! and roots are reduced to coherent base units first, so no derived-unit
//! lookup is ever needed. Standard uncertainties propagate to first order.

use std::cmp::Ordering;
use std::ops::{Mul, Neg};
use std::sync::Arc;
use crate::{DimensionVector, Quantity, QuantityError, Unit};

impl Quantity {
    /// Sum in `self`'s unit; dimensions must match
    pub fn add(&self, other: &Quantity) -> Result<Quantity, QuantityError> {
        let other = other.convert_to_unit(&self.unit)?;
        Ok(Quantity {
            magnitude: self.magnitude + other.magnitude,
            unit: Arc::clone(&self.unit),
            uncertainty: self.uncertainty.hypot(other.uncertainty),
        })
    }

    /// Difference in `self`'s unit; dimensions must match
    pub fn subtract(&self, other: &Quantity) -> Result<Quantity, QuantityError> {
        let other = other.convert_to_unit(&self.unit)?;
        Ok(Quantity {
            magnitude: self.magnitude - other.magnitude,
            unit: Arc::clone(&self.unit),
            uncertainty: self.uncertainty.hypot(other.uncertainty),
        })
    }

    /// Product in coherent base units
    pub fn multiply(&self, other: &Quantity) -> Result<Quantity, QuantityError> {
        let dimension = self.dimension().add(&other.dimension())?;
        let (a, ua) = self.base_parts();
        let (b, ub) = other.base_parts();
        Ok(coherent(a * b, (ua * b).hypot(a * ub), dimension))
    }

    /// Quotient in coherent base units
    pub fn divide(&self, other: &Quantity) -> Result<Quantity, QuantityError> {
        if other.magnitude == 0.0 {
            return Err(QuantityError::DivisionByZero);
        }
        let dimension = self.dimension().sub(&other.dimension())?;
        let (a, ua) = self.base_parts();
        let (b, ub) = other.base_parts();
        Ok(coherent(
            a / b,
            (ua / b).hypot(a * ub / (b * b)),
            dimension,
        ))
    }

    /// Reciprocal in coherent base units
    pub fn recip(&self) -> Result<Quantity, QuantityError> {
        Quantity::dimensionless(1.0).divide(self)
    }

    /// Divide by a plain number, keeping the unit
    pub fn divide_by(&self, divisor: f64) -> Result<Quantity, QuantityError> {
        if divisor == 0.0 {
            return Err(QuantityError::DivisionByZero);
        }
        Ok(Quantity {
            magnitude: self.magnitude / divisor,
            unit: Arc::clone(&self.unit),
            uncertainty: self.uncertainty / divisor.abs(),
        })
    }

    /// Integer power in coherent base units
    pub fn power(&self, n: i32) -> Result<Quantity, QuantityError> {
        if n == 0 {
            return Ok(Quantity::dimensionless(1.0));
        }
        let dimension = self.dimension().scale(n)?;
        let (a, ua) = self.base_parts();
        if a == 0.0 {
            if n < 0 {
                return Err(QuantityError::DivisionByZero);
            }
            // d(a^n)/da vanishes at zero except for n = 1
            let uncertainty = if n == 1 { ua } else { 0.0 };
            return Ok(coherent(0.0, uncertainty, dimension));
        }
        let result = a.powi(n);
        let uncertainty = if ua == 0.0 {
            0.0
        } else {
            result.abs() * f64::from(n).abs() * ua / a.abs()
        };
        Ok(coherent(result, uncertainty, dimension))
    }

    /// Square root; every dimension exponent must be even
    ///
    /// At an exact zero the first-order uncertainty is unbounded, so the
    /// root of the uncertainty itself is reported instead.
    pub fn sqrt(&self) -> Result<Quantity, QuantityError> {
        let dimension = self.dimension()
            .halve()
            .ok_or(QuantityError::OddExponent(self.dimension()))?;
        let (a, ua) = self.base_parts();
        if a < 0.0 {
            return Err(QuantityError::NegativeRoot);
        }
        let root = a.sqrt();
        let uncertainty = if ua == 0.0 {
            0.0
        } else if root == 0.0 {
            ua.sqrt()
        } else {
            0.5 * ua / root
        };
        Ok(coherent(root, uncertainty, dimension))
    }

    /// Natural exponential of a dimensionless quantity
    pub fn exp(&self) -> Result<Quantity, QuantityError> {
        if !self.is_dimensionless() {
            return Err(QuantityError::NotDimensionless(self.dimension()));
        }
        let (x, ux) = self.base_parts();
        let value = x.exp();
        Ok(coherent(value, value * ux, DimensionVector::DIMENSIONLESS))
    }

    /// Order `self` against `other` after converting `other` to `self`'s
    /// unit. Exact comparison, no tolerance.
    pub fn compare(&self, other: &Quantity) -> Result<Ordering, QuantityError> {
        let other = other.convert_to_unit(&self.unit)?;
        self.magnitude
            .partial_cmp(&other.magnitude)
            .ok_or(QuantityError::NotComparable)
    }

    pub fn negate(&self) -> Quantity {
        Quantity {
            magnitude: -self.magnitude,
            unit: Arc::clone(&self.unit),
            uncertainty: self.uncertainty,
        }
    }

    /// Multiply by a plain number, keeping the unit
    pub fn scale_by(&self, factor: f64) -> Quantity {
        Quantity {
            magnitude: self.magnitude * factor,
            unit: Arc::clone(&self.unit),
            uncertainty: self.uncertainty * factor.abs(),
        }
    }

    fn base_parts(&self) -> (f64, f64) {
        (self.unit.to_base(self.magnitude), self.unit.to_base(self.uncertainty))
    }
}

fn coherent(magnitude: f64, uncertainty: f64, dimension: DimensionVector) -> Quantity {
    Quantity {
        magnitude,
        unit: Arc::new(Unit::coherent(dimension)),
        uncertainty,
    }
}

impl Neg for Quantity {
    type Output = Quantity;

    fn neg(self) -> Quantity {
        self.negate()
    }
}

impl Neg for &Quantity {
    type Output = Quantity;

    fn neg(self) -> Quantity {
        self.negate()
    }
}

impl Mul<f64> for Quantity {
    type Output = Quantity;

    fn mul(self, factor: f64) -> Quantity {
        self.scale_by(factor)
    }
}

impl Mul<f64> for &Quantity {
    type Output = Quantity;

    fn mul(self, factor: f64) -> Quantity {
        self.scale_by(factor)
    }
}
