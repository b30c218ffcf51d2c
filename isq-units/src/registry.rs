//! Unit registry
//!
//! Units are registered into a [`UnitRegistryBuilder`] and then sealed into
//! an immutable [`UnitRegistry`]. One sealed registry can be installed as the
//! process-wide registry; after that it is only ever read.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};
use tracing::{debug, info};
use crate::dimension::BASE_COUNT;
use crate::{si, BaseQuantity, DimensionVector, Quantity, QuantityError, Unit, UnitKind};

static GLOBAL: OnceLock<UnitRegistry> = OnceLock::new();

/// Registration phase of a unit registry
#[derive(Debug, Default)]
pub struct UnitRegistryBuilder {
    units: HashMap<String, Arc<Unit>>,
    aliases: HashMap<String, String>,
    base_units: [Option<Arc<Unit>>; BASE_COUNT],
}

impl UnitRegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the base unit of one base quantity (scale 1)
    pub fn register_base_unit(
        &mut self,
        base: BaseQuantity,
        symbol: &str,
        name: &str,
    ) -> Result<&mut Self, QuantityError> {
        self.ensure_free(symbol)?;
        if self.base_units[base.index()].is_some() {
            return Err(QuantityError::DuplicateBaseUnit(base));
        }

        let unit = Arc::new(Unit::base(symbol, name, DimensionVector::of(base)));
        debug!(symbol, %base, "registered base unit");
        self.base_units[base.index()] = Some(Arc::clone(&unit));
        self.units.insert(symbol.to_string(), unit);
        Ok(self)
    }

    /// Register a derived unit with its dimension and scale to coherent SI
    pub fn register_derived_unit(
        &mut self,
        symbol: &str,
        name: &str,
        dimension: DimensionVector,
        scale: f64,
    ) -> Result<&mut Self, QuantityError> {
        self.ensure_free(symbol)?;
        let unit = Unit::derived(symbol, name, dimension, scale)?;
        debug!(symbol, %dimension, scale, "registered derived unit");
        self.units.insert(symbol.to_string(), Arc::new(unit));
        Ok(self)
    }

    /// Register an additional lookup name for an existing unit
    pub fn register_alias(&mut self, alias: &str, symbol: &str) -> Result<&mut Self, QuantityError> {
        if !self.units.contains_key(symbol) {
            return Err(QuantityError::UnknownUnit(symbol.to_string()));
        }
        self.ensure_free(alias)?;
        self.aliases.insert(alias.to_string(), symbol.to_string());
        Ok(self)
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.units.contains_key(symbol) || self.aliases.contains_key(symbol)
    }

    fn ensure_free(&self, symbol: &str) -> Result<(), QuantityError> {
        if self.contains(symbol) {
            return Err(QuantityError::DuplicateUnit(symbol.to_string()));
        }
        Ok(())
    }

    /// Finish registration; the result is read-only
    pub fn seal(self) -> UnitRegistry {
        info!(units = self.units.len(), aliases = self.aliases.len(), "unit registry sealed");
        UnitRegistry {
            units: self.units,
            aliases: self.aliases,
            base_units: self.base_units,
        }
    }
}

/// Sealed, read-only registry of units keyed by symbol
#[derive(Debug)]
pub struct UnitRegistry {
    units: HashMap<String, Arc<Unit>>,
    aliases: HashMap<String, String>,
    base_units: [Option<Arc<Unit>>; BASE_COUNT],
}

impl UnitRegistry {
    pub fn builder() -> UnitRegistryBuilder {
        UnitRegistryBuilder::new()
    }

    /// Install `registry` as the process-wide registry. Fails if one is
    /// already installed, including the SI default installed by `global()`.
    pub fn install(registry: UnitRegistry) -> Result<&'static UnitRegistry, QuantityError> {
        let mut installed = false;
        let global = GLOBAL.get_or_init(|| {
            installed = true;
            registry
        });
        if installed {
            info!(units = global.len(), "installed global unit registry");
            Ok(global)
        } else {
            Err(QuantityError::RegistryAlreadyInstalled)
        }
    }

    /// The process-wide registry, defaulting to the standard SI table
    pub fn global() -> &'static UnitRegistry {
        GLOBAL.get_or_init(|| {
            info!("no unit registry installed, using the standard SI table");
            si::standard_registry()
        })
    }

    pub fn is_installed() -> bool {
        GLOBAL.get().is_some()
    }

    /// Get a unit by symbol or alias
    pub fn get(&self, symbol: &str) -> Option<&Arc<Unit>> {
        if let Some(unit) = self.units.get(symbol) {
            return Some(unit);
        }
        self.aliases.get(symbol).and_then(|canonical| self.units.get(canonical))
    }

    pub fn lookup(&self, symbol: &str) -> Result<Arc<Unit>, QuantityError> {
        self.get(symbol)
            .cloned()
            .ok_or_else(|| QuantityError::UnknownUnit(symbol.to_string()))
    }

    /// Registered base unit of a base quantity, if any
    pub fn base_unit(&self, base: BaseQuantity) -> Option<&Arc<Unit>> {
        self.base_units[base.index()].as_ref()
    }

    /// Construct a quantity in a unit of this registry
    pub fn quantity(&self, magnitude: f64, symbol: &str) -> Result<Quantity, QuantityError> {
        Ok(Quantity::new(magnitude, self.lookup(symbol)?))
    }

    /// Express `quantity` in the unit named `symbol`
    pub fn convert(&self, quantity: &Quantity, symbol: &str) -> Result<Quantity, QuantityError> {
        quantity.convert_to_unit(&self.lookup(symbol)?)
    }

    /// The registered unit of scale 1 for `dimension`, when exactly one
    /// exists (`N` for force; none for dimensionless, where `1`, `rad` and
    /// `sr` all qualify)
    pub fn coherent_unit(&self, dimension: DimensionVector) -> Option<&Arc<Unit>> {
        let mut candidates = self.units.values()
            .filter(|u| u.dimension() == dimension && u.is_coherent());
        let first = candidates.next()?;
        candidates.next().is_none().then_some(first)
    }

    /// Relabel a quantity held in a synthesized base-unit combination with
    /// the registry's named coherent unit. The magnitude is unchanged.
    pub fn with_named_unit(&self, quantity: Quantity) -> Quantity {
        if quantity.unit.kind() != UnitKind::Coherent {
            return quantity;
        }
        match self.coherent_unit(quantity.dimension()) {
            Some(named) => Quantity {
                unit: Arc::clone(named),
                ..quantity
            },
            None => quantity,
        }
    }

    pub fn units(&self) -> impl Iterator<Item = &Arc<Unit>> {
        self.units.values()
    }

    /// Units of one dimension, smallest scale first
    pub fn by_dimension(&self, dimension: DimensionVector) -> Vec<&Arc<Unit>> {
        let mut units: Vec<&Arc<Unit>> = self.units.values()
            .filter(|u| u.dimension() == dimension)
            .collect();
        units.sort_by(|a, b| a.scale().total_cmp(&b.scale()).then_with(|| a.symbol().cmp(b.symbol())));
        units
    }

    /// Sorted unit symbols (aliases excluded)
    pub fn symbols(&self) -> Vec<&str> {
        let mut symbols: Vec<&str> = self.units.keys().map(|s| s.as_str()).collect();
        symbols.sort_unstable();
        symbols
    }

    /// Aliases pointing at `symbol`, sorted
    pub fn aliases_of(&self, symbol: &str) -> Vec<&str> {
        let mut aliases: Vec<&str> = self.aliases.iter()
            .filter(|(_, target)| target.as_str() == symbol)
            .map(|(alias, _)| alias.as_str())
            .collect();
        aliases.sort_unstable();
        aliases
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_registry() -> UnitRegistry {
        let mut builder = UnitRegistry::builder();
        builder
            .register_base_unit(BaseQuantity::Length, "m", "metre").unwrap()
            .register_base_unit(BaseQuantity::Time, "s", "second").unwrap()
            .register_derived_unit("km", "kilometre", DimensionVector::LENGTH, 1000.0).unwrap()
            .register_alias("metre", "m").unwrap();
        builder.seal()
    }

    #[test]
    fn test_lookup() {
        let reg = small_registry();
        let m = reg.lookup("m").unwrap();
        assert_eq!(m.scale(), 1.0);
        assert_eq!(m.dimension(), DimensionVector::LENGTH);
        assert_eq!(reg.lookup("km").unwrap().scale(), 1000.0);
        assert_eq!(reg.len(), 3);
    }

    #[test]
    fn test_alias_lookup() {
        let reg = small_registry();
        assert_eq!(reg.lookup("metre").unwrap().symbol(), "m");
        assert_eq!(reg.aliases_of("m"), vec!["metre"]);
        assert!(reg.aliases_of("km").is_empty());
    }

    #[test]
    fn test_unknown_unit() {
        let reg = small_registry();
        assert_eq!(
            reg.lookup("banana").unwrap_err(),
            QuantityError::UnknownUnit("banana".to_string())
        );
    }

    #[test]
    fn test_duplicate_symbol_rejected() {
        let mut builder = UnitRegistry::builder();
        builder.register_base_unit(BaseQuantity::Length, "m", "metre").unwrap();

        let err = builder
            .register_derived_unit("m", "minute", DimensionVector::TIME, 60.0)
            .unwrap_err();
        assert_eq!(err, QuantityError::DuplicateUnit("m".to_string()));
    }

    #[test]
    fn test_duplicate_base_quantity_rejected() {
        let mut builder = UnitRegistry::builder();
        builder.register_base_unit(BaseQuantity::Mass, "kg", "kilogram").unwrap();
        let err = builder.register_base_unit(BaseQuantity::Mass, "lbm", "pound mass").unwrap_err();
        assert_eq!(err, QuantityError::DuplicateBaseUnit(BaseQuantity::Mass));
    }

    #[test]
    fn test_alias_rules() {
        let mut builder = UnitRegistry::builder();
        builder.register_base_unit(BaseQuantity::Length, "m", "metre").unwrap();
        builder.register_alias("metre", "m").unwrap();

        assert!(matches!(builder.register_alias("metre", "m"), Err(QuantityError::DuplicateUnit(_))));
        assert!(matches!(builder.register_alias("m", "m"), Err(QuantityError::DuplicateUnit(_))));
        assert!(matches!(builder.register_alias("sec", "s"), Err(QuantityError::UnknownUnit(_))));
        // An alias also blocks a later unit symbol
        assert!(matches!(
            builder.register_derived_unit("metre", "x", DimensionVector::LENGTH, 1.0),
            Err(QuantityError::DuplicateUnit(_))
        ));
    }

    #[test]
    fn test_base_unit_slot() {
        let reg = small_registry();
        assert_eq!(reg.base_unit(BaseQuantity::Length).unwrap().symbol(), "m");
        assert!(reg.base_unit(BaseQuantity::Mass).is_none());
    }

    #[test]
    fn test_by_dimension_sorted() {
        let reg = small_registry();
        let lengths: Vec<&str> = reg.by_dimension(DimensionVector::LENGTH)
            .iter()
            .map(|u| u.symbol())
            .collect();
        assert_eq!(lengths, vec!["m", "km"]);
        assert_eq!(reg.symbols(), vec!["km", "m", "s"]);
    }

    #[test]
    fn test_quantity_and_convert() {
        let reg = small_registry();
        let q = reg.quantity(2.0, "km").unwrap();
        let m = reg.convert(&q, "m").unwrap();
        assert_eq!(m.magnitude(), 2000.0);
        assert!(matches!(reg.convert(&q, "s"), Err(QuantityError::IncompatibleDimensions { .. })));
    }

    #[test]
    fn test_coherent_unit() {
        let reg = si::standard_registry();
        assert_eq!(reg.coherent_unit(DimensionVector::FORCE).unwrap().symbol(), "N");
        assert_eq!(reg.coherent_unit(DimensionVector::LENGTH).unwrap().symbol(), "m");
        assert!(reg.coherent_unit(DimensionVector::DIMENSIONLESS).is_none());
        assert!(reg.coherent_unit(DimensionVector::new([3, 0, 1, 0, 0, 0, 0])).is_none());
        assert!(small_registry().coherent_unit(DimensionVector::FORCE).is_none());
    }

    #[test]
    fn test_with_named_unit() {
        let reg = si::standard_registry();
        let per_second_squared = reg.quantity(1.0, "s").unwrap().power(-2).unwrap();
        let force = reg.quantity(2.0, "kg").unwrap()
            .multiply(&reg.quantity(3.0, "m").unwrap())
            .and_then(|q| q.multiply(&per_second_squared))
            .unwrap()
            .with_uncertainty(0.5);
        assert_eq!(force.symbol(), "m·kg·s⁻²");

        let named = reg.with_named_unit(force);
        assert_eq!(named.symbol(), "N");
        assert_eq!(named.magnitude(), 6.0);
        assert_eq!(named.uncertainty(), 0.5);

        let power = reg.with_named_unit(
            reg.quantity(10.0, "kJ").unwrap().divide(&reg.quantity(2.0, "s").unwrap()).unwrap()
        );
        assert_eq!(power.symbol(), "W");
        assert_eq!(power.magnitude(), 5000.0);

        // Registered units are never relabelled
        let km = reg.with_named_unit(reg.quantity(1.0, "km").unwrap());
        assert_eq!(km.symbol(), "km");

        let ratio = reg.with_named_unit(Quantity::dimensionless(0.5));
        assert_eq!(ratio.symbol(), "");
    }

    #[test]
    fn test_install_after_global_is_rejected() {
        let _ = UnitRegistry::global();
        assert!(UnitRegistry::is_installed());
        assert_eq!(
            UnitRegistry::install(small_registry()).unwrap_err(),
            QuantityError::RegistryAlreadyInstalled
        );
    }

    #[test]
    fn test_sealed_registry_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<UnitRegistry>();
        assert_send_sync::<Quantity>();
    }
}
