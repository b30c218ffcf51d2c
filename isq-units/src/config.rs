//! Registry configuration
//!
//! A registry can be bootstrapped from JSON: optionally start from the
//! standard SI table, then register each listed unit in order.
//!
//! ```json
//! {
//!   "include_si": true,
//!   "units": [
//!     { "symbol": "ftn", "name": "fortnight", "dimension": { "time": 1 },
//!       "scale": 1209600, "aliases": ["fortnights"] }
//!   ]
//! }
//! ```

use std::collections::BTreeMap;
use std::path::Path;
use serde::{Serialize, Deserialize};
use tracing::{debug, info};
use crate::dimension::BASE_COUNT;
use crate::{si, BaseQuantity, DimensionVector, QuantityError, UnitRegistry, UnitRegistryBuilder};

fn default_true() -> bool {
    true
}

fn default_scale() -> f64 {
    1.0
}

/// Registry bootstrap configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegistryConfig {
    /// Start from the standard SI table
    #[serde(default = "default_true")]
    pub include_si: bool,

    #[serde(default)]
    pub units: Vec<UnitDefinition>,
}

/// One unit to register
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UnitDefinition {
    pub symbol: String,
    pub name: String,

    /// Registers a base unit of this base quantity when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base: Option<BaseQuantity>,

    /// Exponent per base quantity; missing entries are zero
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub dimension: BTreeMap<BaseQuantity, i32>,

    #[serde(default = "default_scale")]
    pub scale: f64,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
}

impl UnitDefinition {
    pub fn dimension_vector(&self) -> DimensionVector {
        let mut exponents = [0i32; BASE_COUNT];
        for (base, exp) in &self.dimension {
            exponents[base.index()] = *exp;
        }
        DimensionVector::new(exponents)
    }

    fn register(&self, builder: &mut UnitRegistryBuilder) -> Result<(), QuantityError> {
        match self.base {
            Some(base) => {
                if !self.dimension.is_empty() || self.scale != 1.0 {
                    return Err(QuantityError::Config(format!(
                        "base unit {} may not declare a dimension or scale",
                        self.symbol
                    )));
                }
                builder.register_base_unit(base, &self.symbol, &self.name)?;
            }
            None => {
                builder.register_derived_unit(
                    &self.symbol,
                    &self.name,
                    self.dimension_vector(),
                    self.scale,
                )?;
            }
        }
        for alias in &self.aliases {
            builder.register_alias(alias, &self.symbol)?;
        }
        Ok(())
    }
}

impl Default for RegistryConfig {
    fn default() -> Self {
        RegistryConfig {
            include_si: true,
            units: Vec::new(),
        }
    }
}

impl RegistryConfig {
    pub fn from_json_str(json: &str) -> Result<Self, QuantityError> {
        serde_json::from_str(json).map_err(|e| QuantityError::Config(e.to_string()))
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, QuantityError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| QuantityError::Config(format!("cannot read {}: {}", path.display(), e)))?;
        debug!(path = %path.display(), bytes = text.len(), "loaded registry config");
        Self::from_json_str(&text)
    }

    /// Builder with every configured unit registered, not yet sealed
    pub fn builder(&self) -> Result<UnitRegistryBuilder, QuantityError> {
        let mut builder = if self.include_si {
            si::standard_builder()?
        } else {
            UnitRegistry::builder()
        };
        for unit in &self.units {
            unit.register(&mut builder)?;
        }
        info!(include_si = self.include_si, configured = self.units.len(), "registry configured");
        Ok(builder)
    }

    pub fn build(&self) -> Result<UnitRegistry, QuantityError> {
        Ok(self.builder()?.seal())
    }
}
