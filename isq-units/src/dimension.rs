//! Dimensional analysis types
//!
//! Each physical quantity has dimensions represented as a 7-element vector
//! of integer exponents over the ISQ base quantities:
//! [length, mass, time, current, temperature, amount, luminous intensity]

use std::fmt;
use serde::{Serialize, Deserialize};
use crate::QuantityError;

/// Number of ISQ base quantities
pub const BASE_COUNT: usize = 7;

/// The seven ISQ base quantities, in canonical vector order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BaseQuantity {
    Length,
    Mass,
    Time,
    ElectricCurrent,
    ThermodynamicTemperature,
    AmountOfSubstance,
    LuminousIntensity,
}

impl BaseQuantity {
    pub const ALL: [BaseQuantity; BASE_COUNT] = [
        BaseQuantity::Length,
        BaseQuantity::Mass,
        BaseQuantity::Time,
        BaseQuantity::ElectricCurrent,
        BaseQuantity::ThermodynamicTemperature,
        BaseQuantity::AmountOfSubstance,
        BaseQuantity::LuminousIntensity,
    ];

    /// Slot of this quantity in a `DimensionVector`
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Dimension symbol (display only)
    pub const fn symbol(self) -> &'static str {
        match self {
            BaseQuantity::Length => "L",
            BaseQuantity::Mass => "M",
            BaseQuantity::Time => "T",
            BaseQuantity::ElectricCurrent => "I",
            BaseQuantity::ThermodynamicTemperature => "Θ",
            BaseQuantity::AmountOfSubstance => "N",
            BaseQuantity::LuminousIntensity => "J",
        }
    }

    /// Symbol of the coherent SI base unit
    pub const fn si_unit_symbol(self) -> &'static str {
        match self {
            BaseQuantity::Length => "m",
            BaseQuantity::Mass => "kg",
            BaseQuantity::Time => "s",
            BaseQuantity::ElectricCurrent => "A",
            BaseQuantity::ThermodynamicTemperature => "K",
            BaseQuantity::AmountOfSubstance => "mol",
            BaseQuantity::LuminousIntensity => "cd",
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            BaseQuantity::Length => "length",
            BaseQuantity::Mass => "mass",
            BaseQuantity::Time => "time",
            BaseQuantity::ElectricCurrent => "electric current",
            BaseQuantity::ThermodynamicTemperature => "thermodynamic temperature",
            BaseQuantity::AmountOfSubstance => "amount of substance",
            BaseQuantity::LuminousIntensity => "luminous intensity",
        }
    }
}

impl fmt::Display for BaseQuantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Represents the dimensions of a physical quantity
/// as exponents of the 7 ISQ base quantities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DimensionVector {
    exponents: [i32; BASE_COUNT],
}

impl DimensionVector {
    /// Dimensionless quantity (all exponents zero)
    pub const DIMENSIONLESS: DimensionVector = DimensionVector::new([0, 0, 0, 0, 0, 0, 0]);

    pub const LENGTH: DimensionVector = DimensionVector::new([1, 0, 0, 0, 0, 0, 0]);
    pub const MASS: DimensionVector = DimensionVector::new([0, 1, 0, 0, 0, 0, 0]);
    pub const TIME: DimensionVector = DimensionVector::new([0, 0, 1, 0, 0, 0, 0]);
    pub const CURRENT: DimensionVector = DimensionVector::new([0, 0, 0, 1, 0, 0, 0]);
    pub const TEMPERATURE: DimensionVector = DimensionVector::new([0, 0, 0, 0, 1, 0, 0]);
    pub const AMOUNT: DimensionVector = DimensionVector::new([0, 0, 0, 0, 0, 1, 0]);
    pub const LUMINOUS_INTENSITY: DimensionVector = DimensionVector::new([0, 0, 0, 0, 0, 0, 1]);

    /// Area [L^2]
    pub const AREA: DimensionVector = DimensionVector::new([2, 0, 0, 0, 0, 0, 0]);
    /// Volume [L^3]
    pub const VOLUME: DimensionVector = DimensionVector::new([3, 0, 0, 0, 0, 0, 0]);
    /// Frequency [T^-1]
    pub const FREQUENCY: DimensionVector = DimensionVector::new([0, 0, -1, 0, 0, 0, 0]);
    /// Velocity [L T^-1]
    pub const VELOCITY: DimensionVector = DimensionVector::new([1, 0, -1, 0, 0, 0, 0]);
    /// Acceleration [L T^-2]
    pub const ACCELERATION: DimensionVector = DimensionVector::new([1, 0, -2, 0, 0, 0, 0]);
    /// Force [M L T^-2]
    pub const FORCE: DimensionVector = DimensionVector::new([1, 1, -2, 0, 0, 0, 0]);
    /// Pressure [M L^-1 T^-2]
    pub const PRESSURE: DimensionVector = DimensionVector::new([-1, 1, -2, 0, 0, 0, 0]);
    /// Energy [M L^2 T^-2]
    pub const ENERGY: DimensionVector = DimensionVector::new([2, 1, -2, 0, 0, 0, 0]);
    /// Power [M L^2 T^-3]
    pub const POWER: DimensionVector = DimensionVector::new([2, 1, -3, 0, 0, 0, 0]);
    /// Electric charge [I T]
    pub const CHARGE: DimensionVector = DimensionVector::new([0, 0, 1, 1, 0, 0, 0]);
    /// Voltage [M L^2 T^-3 I^-1]
    pub const VOLTAGE: DimensionVector = DimensionVector::new([2, 1, -3, -1, 0, 0, 0]);
    /// Resistance [M L^2 T^-3 I^-2]
    pub const RESISTANCE: DimensionVector = DimensionVector::new([2, 1, -3, -2, 0, 0, 0]);

    /// Create a dimension from explicit exponents in canonical order
    pub const fn new(exponents: [i32; BASE_COUNT]) -> Self {
        DimensionVector { exponents }
    }

    /// Unit vector for a single base quantity
    pub fn of(base: BaseQuantity) -> Self {
        let mut exponents = [0i32; BASE_COUNT];
        exponents[base.index()] = 1;
        DimensionVector { exponents }
    }

    pub fn exponents(&self) -> [i32; BASE_COUNT] {
        self.exponents
    }

    pub fn exponent(&self, base: BaseQuantity) -> i32 {
        self.exponents[base.index()]
    }

    pub fn is_dimensionless(&self) -> bool {
        self.exponents.iter().all(|&e| e == 0)
    }

    /// Exact element-wise equality
    pub fn equals(&self, other: &DimensionVector) -> bool {
        self.exponents == other.exponents
    }

    /// Element-wise sum (dimension of a product)
    pub fn add(&self, other: &DimensionVector) -> Result<DimensionVector, QuantityError> {
        let mut result = [0i32; BASE_COUNT];
        for i in 0..BASE_COUNT {
            result[i] = self.exponents[i]
                .checked_add(other.exponents[i])
                .ok_or(QuantityError::ExponentOverflow)?;
        }
        Ok(DimensionVector { exponents: result })
    }

    /// Element-wise difference (dimension of a quotient)
    pub fn sub(&self, other: &DimensionVector) -> Result<DimensionVector, QuantityError> {
        self.add(&other.negate()?)
    }

    /// Element-wise negation (dimension of a reciprocal)
    pub fn negate(&self) -> Result<DimensionVector, QuantityError> {
        self.scale(-1)
    }

    /// Multiply every exponent by `n` (dimension of a power)
    pub fn scale(&self, n: i32) -> Result<DimensionVector, QuantityError> {
        let mut result = [0i32; BASE_COUNT];
        for i in 0..BASE_COUNT {
            result[i] = self.exponents[i]
                .checked_mul(n)
                .ok_or(QuantityError::ExponentOverflow)?;
        }
        Ok(DimensionVector { exponents: result })
    }

    /// Halve every exponent, or `None` if any exponent is odd
    pub fn halve(&self) -> Option<DimensionVector> {
        if self.exponents.iter().any(|e| e % 2 != 0) {
            return None;
        }
        let mut result = [0i32; BASE_COUNT];
        for i in 0..BASE_COUNT {
            result[i] = self.exponents[i] / 2;
        }
        Some(DimensionVector { exponents: result })
    }

    /// Non-zero exponents paired with their base quantity
    pub fn components(&self) -> impl Iterator<Item = (BaseQuantity, i32)> + '_ {
        BaseQuantity::ALL.iter()
            .map(move |&b| (b, self.exponent(b)))
            .filter(|&(_, e)| e != 0)
    }

    /// Get the dimension name if it matches a common dimension
    pub fn name(&self) -> Option<&'static str> {
        match self.exponents {
            [0, 0, 0, 0, 0, 0, 0] => Some("dimensionless"),
            [1, 0, 0, 0, 0, 0, 0] => Some("length"),
            [0, 1, 0, 0, 0, 0, 0] => Some("mass"),
            [0, 0, 1, 0, 0, 0, 0] => Some("time"),
            [0, 0, 0, 1, 0, 0, 0] => Some("electric current"),
            [0, 0, 0, 0, 1, 0, 0] => Some("thermodynamic temperature"),
            [0, 0, 0, 0, 0, 1, 0] => Some("amount of substance"),
            [0, 0, 0, 0, 0, 0, 1] => Some("luminous intensity"),
            [2, 0, 0, 0, 0, 0, 0] => Some("area"),
            [3, 0, 0, 0, 0, 0, 0] => Some("volume"),
            [0, 0, -1, 0, 0, 0, 0] => Some("frequency"),
            [1, 0, -1, 0, 0, 0, 0] => Some("velocity"),
            [1, 0, -2, 0, 0, 0, 0] => Some("acceleration"),
            [1, 1, -2, 0, 0, 0, 0] => Some("force"),
            [-1, 1, -2, 0, 0, 0, 0] => Some("pressure"),
            [2, 1, -2, 0, 0, 0, 0] => Some("energy"),
            [2, 1, -3, 0, 0, 0, 0] => Some("power"),
            [0, 0, 1, 1, 0, 0, 0] => Some("electric charge"),
            [2, 1, -3, -1, 0, 0, 0] => Some("voltage"),
            [2, 1, -3, -2, 0, 0, 0] => Some("resistance"),
            [-3, 1, 0, 0, 0, 0, 0] => Some("density"),
            _ => None,
        }
    }
}

impl fmt::Display for DimensionVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.components()
            .map(|(base, exp)| {
                if exp == 1 {
                    base.symbol().to_string()
                } else {
                    format!("{}^{}", base.symbol(), exp)
                }
            })
            .collect();

        if parts.is_empty() {
            write!(f, "1")
        } else {
            write!(f, "{}", parts.join(" "))
        }
    }
}

impl Default for DimensionVector {
    fn default() -> Self {
        Self::DIMENSIONLESS
    }
}

impl From<BaseQuantity> for DimensionVector {
    fn from(base: BaseQuantity) -> Self {
        DimensionVector::of(base)
    }
}
