//! Standard SI unit table
//!
//! The seven base units, the coherent named derived units, and a selection
//! of prefixed and customary units, each with its exact (or conventional)
//! scale to coherent SI.

use crate::{BaseQuantity, DimensionVector as D, QuantityError, UnitRegistry, UnitRegistryBuilder};

const fn dim(exponents: [i32; 7]) -> D {
    D::new(exponents)
}

const DENSITY: D = dim([-3, 1, 0, 0, 0, 0, 0]);
const CAPACITANCE: D = dim([-2, -1, 4, 2, 0, 0, 0]);
const CONDUCTANCE: D = dim([-2, -1, 3, 2, 0, 0, 0]);
const MAGNETIC_FLUX: D = dim([2, 1, -2, -1, 0, 0, 0]);
const FLUX_DENSITY: D = dim([0, 1, -2, -1, 0, 0, 0]);
const INDUCTANCE: D = dim([2, 1, -2, -2, 0, 0, 0]);
const ILLUMINANCE: D = dim([-2, 0, 0, 0, 0, 0, 1]);
const ABSORBED_DOSE: D = dim([2, 0, -2, 0, 0, 0, 0]);
const CATALYTIC_ACTIVITY: D = dim([0, 0, -1, 0, 0, 1, 0]);

/// Build the standard registry
pub fn standard_registry() -> UnitRegistry {
    // The table is static data; a failure here is a bug in the table itself
    standard_builder()
        .expect("standard SI unit table is consistent")
        .seal()
}

/// Builder preloaded with the standard table, for extension before sealing
pub fn standard_builder() -> Result<UnitRegistryBuilder, QuantityError> {
    let mut b = UnitRegistry::builder();
    register_base_units(&mut b)?;
    register_length_units(&mut b)?;
    register_mass_units(&mut b)?;
    register_time_units(&mut b)?;
    register_other_base_multiples(&mut b)?;
    register_dimensionless_units(&mut b)?;
    register_geometric_units(&mut b)?;
    register_mechanical_units(&mut b)?;
    register_electromagnetic_units(&mut b)?;
    register_photometric_and_chemical_units(&mut b)?;
    Ok(b)
}

fn register_base_units(b: &mut UnitRegistryBuilder) -> Result<(), QuantityError> {
    b.register_base_unit(BaseQuantity::Length, "m", "metre")?
        .register_base_unit(BaseQuantity::Mass, "kg", "kilogram")?
        .register_base_unit(BaseQuantity::Time, "s", "second")?
        .register_base_unit(BaseQuantity::ElectricCurrent, "A", "ampere")?
        .register_base_unit(BaseQuantity::ThermodynamicTemperature, "K", "kelvin")?
        .register_base_unit(BaseQuantity::AmountOfSubstance, "mol", "mole")?
        .register_base_unit(BaseQuantity::LuminousIntensity, "cd", "candela")?;

    b.register_alias("metre", "m")?
        .register_alias("meter", "m")?
        .register_alias("kilogram", "kg")?
        .register_alias("second", "s")?
        .register_alias("sec", "s")?
        .register_alias("ampere", "A")?
        .register_alias("kelvin", "K")?
        .register_alias("mole", "mol")?
        .register_alias("candela", "cd")?;
    Ok(())
}

fn register_length_units(b: &mut UnitRegistryBuilder) -> Result<(), QuantityError> {
    // SI multiples
    b.register_derived_unit("km", "kilometre", D::LENGTH, 1e3)?
        .register_derived_unit("cm", "centimetre", D::LENGTH, 1e-2)?
        .register_derived_unit("mm", "millimetre", D::LENGTH, 1e-3)?
        .register_derived_unit("µm", "micrometre", D::LENGTH, 1e-6)?
        .register_derived_unit("nm", "nanometre", D::LENGTH, 1e-9)?;

    // Imperial/US
    b.register_derived_unit("in", "inch", D::LENGTH, 0.0254)?
        .register_derived_unit("ft", "foot", D::LENGTH, 0.3048)?
        .register_derived_unit("yd", "yard", D::LENGTH, 0.9144)?
        .register_derived_unit("mi", "mile", D::LENGTH, 1609.344)?
        .register_derived_unit("nmi", "nautical mile", D::LENGTH, 1852.0)?;

    // Astronomical
    b.register_derived_unit("au", "astronomical unit", D::LENGTH, 149_597_870_700.0)?;

    b.register_alias("kilometre", "km")?
        .register_alias("kilometer", "km")?
        .register_alias("um", "µm")?
        .register_alias("μm", "µm")?
        .register_alias("micron", "µm")?
        .register_alias("inch", "in")?
        .register_alias("foot", "ft")?
        .register_alias("feet", "ft")?
        .register_alias("mile", "mi")?;
    Ok(())
}

fn register_mass_units(b: &mut UnitRegistryBuilder) -> Result<(), QuantityError> {
    b.register_derived_unit("g", "gram", D::MASS, 1e-3)?
        .register_derived_unit("mg", "milligram", D::MASS, 1e-6)?
        .register_derived_unit("t", "tonne", D::MASS, 1e3)?
        .register_derived_unit("lb", "pound", D::MASS, 0.453_592_37)?
        .register_derived_unit("oz", "ounce", D::MASS, 0.028_349_523_125)?;

    b.register_alias("gram", "g")?
        .register_alias("tonne", "t")?
        .register_alias("pound", "lb")?
        .register_alias("lbs", "lb")?;
    Ok(())
}

fn register_time_units(b: &mut UnitRegistryBuilder) -> Result<(), QuantityError> {
    b.register_derived_unit("ms", "millisecond", D::TIME, 1e-3)?
        .register_derived_unit("µs", "microsecond", D::TIME, 1e-6)?
        .register_derived_unit("ns", "nanosecond", D::TIME, 1e-9)?
        .register_derived_unit("min", "minute", D::TIME, 60.0)?
        .register_derived_unit("h", "hour", D::TIME, 3600.0)?
        .register_derived_unit("d", "day", D::TIME, 86_400.0)?
        .register_derived_unit("wk", "week", D::TIME, 604_800.0)?
        // Julian year
        .register_derived_unit("yr", "year", D::TIME, 31_557_600.0)?;

    b.register_alias("us", "µs")?
        .register_alias("minute", "min")?
        .register_alias("hour", "h")?
        .register_alias("day", "d")?
        .register_alias("year", "yr")?;
    Ok(())
}

fn register_other_base_multiples(b: &mut UnitRegistryBuilder) -> Result<(), QuantityError> {
    b.register_derived_unit("mA", "milliampere", D::CURRENT, 1e-3)?
        .register_derived_unit("kA", "kiloampere", D::CURRENT, 1e3)?
        .register_derived_unit("mK", "millikelvin", D::TEMPERATURE, 1e-3)?
        .register_derived_unit("mmol", "millimole", D::AMOUNT, 1e-3)?
        .register_derived_unit("kmol", "kilomole", D::AMOUNT, 1e3)?;
    Ok(())
}

/// Counts, ratios and plane/solid angles share the all-zero dimension
fn register_dimensionless_units(b: &mut UnitRegistryBuilder) -> Result<(), QuantityError> {
    b.register_derived_unit("1", "one", D::DIMENSIONLESS, 1.0)?
        .register_derived_unit("%", "percent", D::DIMENSIONLESS, 1e-2)?
        .register_derived_unit("rad", "radian", D::DIMENSIONLESS, 1.0)?
        .register_derived_unit("sr", "steradian", D::DIMENSIONLESS, 1.0)?
        .register_derived_unit("deg", "degree", D::DIMENSIONLESS, std::f64::consts::PI / 180.0)?;

    b.register_alias("radian", "rad")?
        .register_alias("degree", "deg")?
        .register_alias("°", "deg")?;
    Ok(())
}

fn register_geometric_units(b: &mut UnitRegistryBuilder) -> Result<(), QuantityError> {
    b.register_derived_unit("m²", "square metre", D::AREA, 1.0)?
        .register_derived_unit("km²", "square kilometre", D::AREA, 1e6)?
        .register_derived_unit("ha", "hectare", D::AREA, 1e4)?
        .register_derived_unit("m³", "cubic metre", D::VOLUME, 1.0)?
        .register_derived_unit("L", "litre", D::VOLUME, 1e-3)?
        .register_derived_unit("mL", "millilitre", D::VOLUME, 1e-6)?;

    b.register_alias("m2", "m²")?
        .register_alias("m3", "m³")?
        .register_alias("l", "L")?
        .register_alias("litre", "L")?
        .register_alias("liter", "L")?;
    Ok(())
}

fn register_mechanical_units(b: &mut UnitRegistryBuilder) -> Result<(), QuantityError> {
    b.register_derived_unit("Hz", "hertz", D::FREQUENCY, 1.0)?
        .register_derived_unit("km/h", "kilometre per hour", D::VELOCITY, 1000.0 / 3600.0)?
        .register_derived_unit("m/s", "metre per second", D::VELOCITY, 1.0)?
        .register_derived_unit("kg/m³", "kilogram per cubic metre", DENSITY, 1.0)?
        .register_derived_unit("N", "newton", D::FORCE, 1.0)?
        .register_derived_unit("kN", "kilonewton", D::FORCE, 1e3)?
        .register_derived_unit("Pa", "pascal", D::PRESSURE, 1.0)?
        .register_derived_unit("kPa", "kilopascal", D::PRESSURE, 1e3)?
        .register_derived_unit("bar", "bar", D::PRESSURE, 1e5)?
        .register_derived_unit("atm", "standard atmosphere", D::PRESSURE, 101_325.0)?
        .register_derived_unit("J", "joule", D::ENERGY, 1.0)?
        .register_derived_unit("kJ", "kilojoule", D::ENERGY, 1e3)?
        .register_derived_unit("kWh", "kilowatt hour", D::ENERGY, 3.6e6)?
        .register_derived_unit("cal", "calorie", D::ENERGY, 4.184)?
        .register_derived_unit("eV", "electronvolt", D::ENERGY, 1.602_176_634e-19)?
        .register_derived_unit("W", "watt", D::POWER, 1.0)?
        .register_derived_unit("kW", "kilowatt", D::POWER, 1e3)?
        // Mechanical horsepower
        .register_derived_unit("hp", "horsepower", D::POWER, 745.699_871_582_270_2)?;

    b.register_alias("kph", "km/h")?
        .register_alias("newton", "N")?
        .register_alias("pascal", "Pa")?
        .register_alias("joule", "J")?
        .register_alias("watt", "W")?;
    Ok(())
}

fn register_electromagnetic_units(b: &mut UnitRegistryBuilder) -> Result<(), QuantityError> {
    b.register_derived_unit("C", "coulomb", D::CHARGE, 1.0)?
        .register_derived_unit("V", "volt", D::VOLTAGE, 1.0)?
        .register_derived_unit("Ω", "ohm", D::RESISTANCE, 1.0)?
        .register_derived_unit("S", "siemens", CONDUCTANCE, 1.0)?
        .register_derived_unit("F", "farad", CAPACITANCE, 1.0)?
        .register_derived_unit("Wb", "weber", MAGNETIC_FLUX, 1.0)?
        .register_derived_unit("T", "tesla", FLUX_DENSITY, 1.0)?
        .register_derived_unit("H", "henry", INDUCTANCE, 1.0)?;

    b.register_alias("ohm", "Ω")?
        .register_alias("volt", "V")?;
    Ok(())
}

fn register_photometric_and_chemical_units(b: &mut UnitRegistryBuilder) -> Result<(), QuantityError> {
    // Lumen is cd·sr; the steradian is dimensionless
    b.register_derived_unit("lm", "lumen", D::LUMINOUS_INTENSITY, 1.0)?
        .register_derived_unit("lx", "lux", ILLUMINANCE, 1.0)?
        .register_derived_unit("Gy", "gray", ABSORBED_DOSE, 1.0)?
        .register_derived_unit("Sv", "sievert", ABSORBED_DOSE, 1.0)?
        .register_derived_unit("kat", "katal", CATALYTIC_ACTIVITY, 1.0)?;
    Ok(())
}
