//! Errors raised by the quantity core

use isq_core::IsqError;
use thiserror::Error;
use crate::{BaseQuantity, DimensionVector, Unit};

/// Error type for registry and quantity operations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QuantityError {
    #[error("unknown unit: {0}")]
    UnknownUnit(String),

    #[error("unit already registered: {0}")]
    DuplicateUnit(String),

    #[error("a base unit for {0} is already registered")]
    DuplicateBaseUnit(BaseQuantity),

    #[error("incompatible dimensions: {left} ({left_dimension}) and {right} ({right_dimension})")]
    IncompatibleDimensions {
        left: String,
        right: String,
        left_dimension: DimensionVector,
        right_dimension: DimensionVector,
    },

    #[error("division by zero")]
    DivisionByZero,

    #[error("invalid scale factor {scale} for unit {symbol}: must be finite and positive")]
    InvalidScale { symbol: String, scale: f64 },

    #[error("square root of {0} would need fractional exponents")]
    OddExponent(DimensionVector),

    #[error("square root of a negative magnitude")]
    NegativeRoot,

    #[error("dimension exponent out of range")]
    ExponentOverflow,

    #[error("expected a dimensionless quantity, got dimension {0}")]
    NotDimensionless(DimensionVector),

    #[error("magnitudes are not comparable")]
    NotComparable,

    #[error("a global unit registry is already installed")]
    RegistryAlreadyInstalled,

    #[error("configuration error: {0}")]
    Config(String),
}

impl QuantityError {
    pub(crate) fn incompatible(left: &Unit, right: &Unit) -> Self {
        QuantityError::IncompatibleDimensions {
            left: left.symbol().to_string(),
            right: right.symbol().to_string(),
            left_dimension: left.dimension(),
            right_dimension: right.dimension(),
        }
    }
}

impl From<QuantityError> for IsqError {
    fn from(err: QuantityError) -> Self {
        match err {
            QuantityError::UnknownUnit(ref s) => IsqError::unknown_unit(s),
            QuantityError::DuplicateUnit(ref s) => IsqError::duplicate_unit(s),
            QuantityError::DuplicateBaseUnit(_) => IsqError::duplicate_unit(&err.to_string()),
            QuantityError::IncompatibleDimensions { .. } => IsqError::incompatible_dimensions(err.to_string()),
            QuantityError::DivisionByZero => IsqError::div_zero(),
            QuantityError::InvalidScale { .. } => IsqError::invalid_scale(err.to_string()),
            QuantityError::NotDimensionless(_) => IsqError::incompatible_dimensions(err.to_string()),
            QuantityError::OddExponent(_)
            | QuantityError::ExponentOverflow
            | QuantityError::NegativeRoot
            | QuantityError::NotComparable => IsqError::domain_error(err.to_string()),
            QuantityError::RegistryAlreadyInstalled => IsqError::internal(err.to_string()),
            QuantityError::Config(ref s) => IsqError::config_error(s.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use isq_core::codes;

    #[test]
    fn test_incompatible_message() {
        let err = QuantityError::IncompatibleDimensions {
            left: "m".to_string(),
            right: "kg".to_string(),
            left_dimension: DimensionVector::LENGTH,
            right_dimension: DimensionVector::MASS,
        };
        assert_eq!(err.to_string(), "incompatible dimensions: m (L) and kg (M)");
    }

    #[test]
    fn test_into_structured_error() {
        let err: IsqError = QuantityError::UnknownUnit("banana".to_string()).into();
        assert_eq!(err.code, codes::UNKNOWN_UNIT);
        assert!(err.message.contains("banana"));

        let err: IsqError = QuantityError::DivisionByZero.into();
        assert_eq!(err.code, codes::DIV_ZERO);

        let err: IsqError = QuantityError::OddExponent(DimensionVector::LENGTH).into();
        assert_eq!(err.code, codes::DOMAIN_ERROR);

        let err: IsqError = QuantityError::ExponentOverflow.into();
        assert_eq!(err.code, codes::DOMAIN_ERROR);

        let err: IsqError = QuantityError::NotDimensionless(DimensionVector::TIME).into();
        assert_eq!(err.code, codes::INCOMPATIBLE_DIMENSIONS);
        assert!(err.message.contains("T"));

        let err: IsqError = QuantityError::DuplicateBaseUnit(BaseQuantity::Mass).into();
        assert_eq!(err.code, codes::DUPLICATE_UNIT);
        assert!(err.message.contains("mass"));
    }
}
