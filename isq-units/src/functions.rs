//! Quantity functions exposed through the plugin registry
//!
//! A quantity argument is a JSON object `{"value": 2.5, "unit": "km"}` with an
//! optional `"uncertainty"`. Quantity results use the same shape plus the
//! dimension and a display string.

use std::cmp::Ordering;
use isq_plugin::prelude::*;
use crate::{Quantity, UnitRegistry};

fn type_name(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "Null",
        JsonValue::Bool(_) => "Bool",
        JsonValue::Number(_) => "Number",
        JsonValue::String(_) => "Text",
        JsonValue::Array(_) => "List",
        JsonValue::Object(_) => "Object",
    }
}

fn arg_text<'a>(func: &str, name: &str, value: &'a JsonValue) -> Result<&'a str, IsqError> {
    value.as_str()
        .ok_or_else(|| IsqError::arg_type(func, name, "Text", type_name(value)))
}

fn arg_number(func: &str, name: &str, value: &JsonValue) -> Result<f64, IsqError> {
    value.as_f64()
        .ok_or_else(|| IsqError::arg_type(func, name, "Number", type_name(value)))
}

fn arg_integer(func: &str, name: &str, value: &JsonValue) -> Result<i32, IsqError> {
    value.as_i64()
        .and_then(|n| i32::try_from(n).ok())
        .ok_or_else(|| IsqError::arg_type(func, name, "Integer", type_name(value)))
}

fn arg_quantity(func: &str, name: &str, value: &JsonValue) -> Result<Quantity, IsqError> {
    let expected = "Quantity {value, unit}";
    let obj = value.as_object()
        .ok_or_else(|| IsqError::arg_type(func, name, expected, type_name(value)))?;
    let magnitude = obj.get("value")
        .and_then(JsonValue::as_f64)
        .ok_or_else(|| IsqError::arg_type(func, name, expected, "Object without numeric 'value'"))?;
    let symbol = obj.get("unit")
        .and_then(JsonValue::as_str)
        .ok_or_else(|| IsqError::arg_type(func, name, expected, "Object without text 'unit'"))?;

    let mut quantity = UnitRegistry::global()
        .quantity(magnitude, symbol)
        .map_err(|e| IsqError::from(e).with_note(format!("in argument '{}'", name)))?;
    if let Some(u) = obj.get("uncertainty") {
        quantity = quantity.with_uncertainty(arg_number(func, "uncertainty", u)?);
    }
    Ok(quantity)
}

/// Algebra results in a synthesized base-unit combination are shown in the
/// registry's named coherent unit where there is exactly one (`N`, `W`, ...)
fn named(q: Quantity) -> Quantity {
    UnitRegistry::global().with_named_unit(q)
}

fn quantity_json(q: &Quantity) -> JsonValue {
    let mut obj = json!({
        "value": q.magnitude(),
        "unit": q.symbol(),
        "dimension": q.dimension().to_string(),
        "display": q.to_string(),
    });
    if q.uncertainty() > 0.0 {
        obj["uncertainty"] = json!(q.uncertainty());
    }
    obj
}

// ============ quantity ============

pub struct QuantityFn;

static QUANTITY_ARGS: [ArgMeta; 3] = [
    ArgMeta::required("value", "Number", "Magnitude"),
    ArgMeta::required("unit", "Text", "Registered unit symbol or alias"),
    ArgMeta::optional("uncertainty", "Number", "Standard uncertainty in the same unit", "0"),
];

static QUANTITY_EXAMPLES: [&str; 2] = [
    "quantity(5, \"km\") → 5 km",
    "quantity(1, \"m\", 0.01) → 1.000(10) m",
];

static QUANTITY_RELATED: [&str; 2] = ["convert", "dimensions"];

impl FunctionPlugin for QuantityFn {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "quantity",
            description: "Create a quantity from a magnitude and a unit symbol",
            usage: "quantity(value, unit, [uncertainty])",
            args: &QUANTITY_ARGS,
            returns: "Quantity",
            examples: &QUANTITY_EXAMPLES,
            category: "construction",
            related: &QUANTITY_RELATED,
        }
    }

    fn call(&self, args: &[JsonValue], _ctx: &EvalContext) -> Result<JsonValue, IsqError> {
        let value = arg_number("quantity", "value", &args[0])?;
        let unit = arg_text("quantity", "unit", &args[1])?;
        let mut q = UnitRegistry::global().quantity(value, unit)?;
        if let Some(u) = args.get(2) {
            q = q.with_uncertainty(arg_number("quantity", "uncertainty", u)?);
        }
        Ok(quantity_json(&q))
    }
}

// ============ convert ============

pub struct Convert;

static CONVERT_ARGS: [ArgMeta; 2] = [
    ArgMeta::required("quantity", "Quantity", "Quantity to convert"),
    ArgMeta::required("to_unit", "Text", "Target unit (e.g., \"m\")"),
];

static CONVERT_EXAMPLES: [&str; 2] = [
    "convert({value: 2, unit: \"km\"}, \"m\") → 2000 m",
    "convert({value: 1, unit: \"kWh\"}, \"kJ\") → 3600 kJ",
];

static CONVERT_RELATED: [&str; 2] = ["to_base", "compatible"];

impl FunctionPlugin for Convert {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "convert",
            description: "Express a quantity in another unit of the same dimension",
            usage: "convert(quantity, to_unit)",
            args: &CONVERT_ARGS,
            returns: "Quantity",
            examples: &CONVERT_EXAMPLES,
            category: "conversion",
            related: &CONVERT_RELATED,
        }
    }

    fn call(&self, args: &[JsonValue], _ctx: &EvalContext) -> Result<JsonValue, IsqError> {
        let q = arg_quantity("convert", "quantity", &args[0])?;
        let to = arg_text("convert", "to_unit", &args[1])?;
        Ok(quantity_json(&UnitRegistry::global().convert(&q, to)?))
    }
}

// ============ to_base ============

pub struct ToBase;

static TO_BASE_ARGS: [ArgMeta; 1] = [
    ArgMeta::required("quantity", "Quantity", "Quantity to reduce"),
];

static TO_BASE_EXAMPLES: [&str; 2] = [
    "to_base({value: 3, unit: \"L\"}) → 0.003 m³",
    "to_base({value: 1, unit: \"N\"}) → 1 m·kg·s⁻²",
];

static TO_BASE_RELATED: [&str; 1] = ["convert"];

impl FunctionPlugin for ToBase {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "to_base",
            description: "Express a quantity in coherent SI base units",
            usage: "to_base(quantity)",
            args: &TO_BASE_ARGS,
            returns: "Quantity",
            examples: &TO_BASE_EXAMPLES,
            category: "conversion",
            related: &TO_BASE_RELATED,
        }
    }

    fn call(&self, args: &[JsonValue], _ctx: &EvalContext) -> Result<JsonValue, IsqError> {
        let q = arg_quantity("to_base", "quantity", &args[0])?;
        Ok(quantity_json(&q.to_base_units()))
    }
}

// ============ add / subtract / multiply / divide ============

static BINARY_ARGS: [ArgMeta; 2] = [
    ArgMeta::required("a", "Quantity", "Left operand"),
    ArgMeta::required("b", "Quantity", "Right operand"),
];

static ALGEBRA_RELATED: [&str; 6] = ["add", "subtract", "multiply", "divide", "power", "sqrt"];

pub struct Add;

impl FunctionPlugin for Add {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "add",
            description: "Sum of two quantities of the same dimension, in the unit of a",
            usage: "add(a, b)",
            args: &BINARY_ARGS,
            returns: "Quantity",
            examples: &["add({value: 1, unit: \"km\"}, {value: 500, unit: \"m\"}) → 1.5 km"],
            category: "algebra",
            related: &ALGEBRA_RELATED,
        }
    }

    fn call(&self, args: &[JsonValue], _ctx: &EvalContext) -> Result<JsonValue, IsqError> {
        let a = arg_quantity("add", "a", &args[0])?;
        let b = arg_quantity("add", "b", &args[1])?;
        Ok(quantity_json(&a.add(&b)?))
    }
}

pub struct Subtract;

impl FunctionPlugin for Subtract {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "subtract",
            description: "Difference of two quantities of the same dimension, in the unit of a",
            usage: "subtract(a, b)",
            args: &BINARY_ARGS,
            returns: "Quantity",
            examples: &["subtract({value: 2, unit: \"h\"}, {value: 30, unit: \"min\"}) → 1.5 h"],
            category: "algebra",
            related: &ALGEBRA_RELATED,
        }
    }

    fn call(&self, args: &[JsonValue], _ctx: &EvalContext) -> Result<JsonValue, IsqError> {
        let a = arg_quantity("subtract", "a", &args[0])?;
        let b = arg_quantity("subtract", "b", &args[1])?;
        Ok(quantity_json(&a.subtract(&b)?))
    }
}

pub struct Multiply;

impl FunctionPlugin for Multiply {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "multiply",
            description: "Product of two quantities in coherent SI units",
            usage: "multiply(a, b)",
            args: &BINARY_ARGS,
            returns: "Quantity",
            examples: &[
                "multiply({value: 3, unit: \"m\"}, {value: 4, unit: \"m\"}) → 12 m²",
                "multiply({value: 2, unit: \"N\"}, {value: 3, unit: \"m\"}) → 6 J",
            ],
            category: "algebra",
            related: &ALGEBRA_RELATED,
        }
    }

    fn call(&self, args: &[JsonValue], _ctx: &EvalContext) -> Result<JsonValue, IsqError> {
        let a = arg_quantity("multiply", "a", &args[0])?;
        let b = arg_quantity("multiply", "b", &args[1])?;
        Ok(quantity_json(&named(a.multiply(&b)?)))
    }
}

pub struct Divide;

impl FunctionPlugin for Divide {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "divide",
            description: "Quotient of two quantities in coherent SI units",
            usage: "divide(a, b)",
            args: &BINARY_ARGS,
            returns: "Quantity",
            examples: &["divide({value: 100, unit: \"m\"}, {value: 10, unit: \"s\"}) → 10 m/s"],
            category: "algebra",
            related: &ALGEBRA_RELATED,
        }
    }

    fn call(&self, args: &[JsonValue], _ctx: &EvalContext) -> Result<JsonValue, IsqError> {
        let a = arg_quantity("divide", "a", &args[0])?;
        let b = arg_quantity("divide", "b", &args[1])?;
        Ok(quantity_json(&named(a.divide(&b)?)))
    }
}

// ============ power ============

pub struct Power;

static POWER_ARGS: [ArgMeta; 2] = [
    ArgMeta::required("quantity", "Quantity", "Base"),
    ArgMeta::required("n", "Integer", "Integer exponent"),
];

impl FunctionPlugin for Power {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "power",
            description: "Raise a quantity to an integer power",
            usage: "power(quantity, n)",
            args: &POWER_ARGS,
            returns: "Quantity",
            examples: &["power({value: 5, unit: \"m\"}, 3) → 125 m³"],
            category: "algebra",
            related: &ALGEBRA_RELATED,
        }
    }

    fn call(&self, args: &[JsonValue], _ctx: &EvalContext) -> Result<JsonValue, IsqError> {
        let q = arg_quantity("power", "quantity", &args[0])?;
        let n = arg_integer("power", "n", &args[1])?;
        Ok(quantity_json(&named(q.power(n)?)))
    }
}

// ============ sqrt ============

pub struct Sqrt;

static SQRT_ARGS: [ArgMeta; 1] = [
    ArgMeta::required("quantity", "Quantity", "Quantity with even dimension exponents"),
];

impl FunctionPlugin for Sqrt {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "sqrt",
            description: "Square root of a quantity whose dimension exponents are all even",
            usage: "sqrt(quantity)",
            args: &SQRT_ARGS,
            returns: "Quantity",
            examples: &["sqrt({value: 16, unit: \"m²\"}) → 4 m"],
            category: "algebra",
            related: &ALGEBRA_RELATED,
        }
    }

    fn call(&self, args: &[JsonValue], _ctx: &EvalContext) -> Result<JsonValue, IsqError> {
        let q = arg_quantity("sqrt", "quantity", &args[0])?;
        Ok(quantity_json(&named(q.sqrt()?)))
    }
}

// ============ recip ============

pub struct Recip;

static RECIP_ARGS: [ArgMeta; 1] = [
    ArgMeta::required("quantity", "Quantity", "Nonzero quantity"),
];

impl FunctionPlugin for Recip {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "recip",
            description: "Reciprocal of a quantity in coherent SI units",
            usage: "recip(quantity)",
            args: &RECIP_ARGS,
            returns: "Quantity",
            examples: &["recip({value: 4, unit: \"ms\"}) → 250 Hz"],
            category: "algebra",
            related: &["divide", "power"],
        }
    }

    fn call(&self, args: &[JsonValue], _ctx: &EvalContext) -> Result<JsonValue, IsqError> {
        let q = arg_quantity("recip", "quantity", &args[0])?;
        Ok(quantity_json(&named(q.recip()?)))
    }
}

// ============ divide_by ============

pub struct DivideBy;

static DIVIDE_BY_ARGS: [ArgMeta; 2] = [
    ArgMeta::required("quantity", "Quantity", "Dividend"),
    ArgMeta::required("divisor", "Number", "Nonzero plain number"),
];

impl FunctionPlugin for DivideBy {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "divide_by",
            description: "Divide a quantity by a plain number, keeping its unit",
            usage: "divide_by(quantity, divisor)",
            args: &DIVIDE_BY_ARGS,
            returns: "Quantity",
            examples: &["divide_by({value: 3, unit: \"km\"}, 2) → 1.5 km"],
            category: "algebra",
            related: &["divide", "multiply"],
        }
    }

    fn call(&self, args: &[JsonValue], _ctx: &EvalContext) -> Result<JsonValue, IsqError> {
        let q = arg_quantity("divide_by", "quantity", &args[0])?;
        let divisor = arg_number("divide_by", "divisor", &args[1])?;
        Ok(quantity_json(&q.divide_by(divisor)?))
    }
}

// ============ exp ============

pub struct Exp;

static EXP_ARGS: [ArgMeta; 1] = [
    ArgMeta::required("quantity", "Quantity", "Dimensionless quantity"),
];

static EXP_EXAMPLES: [&str; 2] = [
    "exp({value: 1, unit: \"1\"}) → 2.718281828459045",
    "exp({value: 50, unit: \"%\"}) → 1.6487212707001282",
];

impl FunctionPlugin for Exp {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "exp",
            description: "Natural exponential of a dimensionless quantity",
            usage: "exp(quantity)",
            args: &EXP_ARGS,
            returns: "Quantity",
            examples: &EXP_EXAMPLES,
            category: "algebra",
            related: &["power", "dimensions"],
        }
    }

    fn call(&self, args: &[JsonValue], _ctx: &EvalContext) -> Result<JsonValue, IsqError> {
        let q = arg_quantity("exp", "quantity", &args[0])?;
        Ok(quantity_json(&q.exp()?))
    }
}

// ============ compare ============

pub struct Compare;

impl FunctionPlugin for Compare {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "compare",
            description: "Order two quantities of the same dimension (exact, no tolerance)",
            usage: "compare(a, b)",
            args: &BINARY_ARGS,
            returns: "Text (less, equal, greater)",
            examples: &["compare({value: 1, unit: \"km\"}, {value: 999, unit: \"m\"}) → greater"],
            category: "algebra",
            related: &["compatible"],
        }
    }

    fn call(&self, args: &[JsonValue], _ctx: &EvalContext) -> Result<JsonValue, IsqError> {
        let a = arg_quantity("compare", "a", &args[0])?;
        let b = arg_quantity("compare", "b", &args[1])?;
        let ordering = match a.compare(&b)? {
            Ordering::Less => "less",
            Ordering::Equal => "equal",
            Ordering::Greater => "greater",
        };
        Ok(json!(ordering))
    }
}

// ============ dimensions ============

pub struct Dimensions;

static DIMENSIONS_ARGS: [ArgMeta; 1] = [
    ArgMeta::required("unit", "Text", "Unit symbol or alias"),
];

static DIMENSIONS_EXAMPLES: [&str; 2] = [
    "dimensions(\"N\") → L M T^-2",
    "dimensions(\"rad\") → 1",
];

impl FunctionPlugin for Dimensions {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "dimensions",
            description: "Dimension vector, scale and name of a unit",
            usage: "dimensions(unit)",
            args: &DIMENSIONS_ARGS,
            returns: "Object",
            examples: &DIMENSIONS_EXAMPLES,
            category: "inspection",
            related: &["compatible", "units"],
        }
    }

    fn call(&self, args: &[JsonValue], _ctx: &EvalContext) -> Result<JsonValue, IsqError> {
        let symbol = arg_text("dimensions", "unit", &args[0])?;
        let unit = UnitRegistry::global().lookup(symbol)?;
        let dimension = unit.dimension();
        Ok(json!({
            "unit": unit.symbol(),
            "name": unit.name(),
            "dimension": dimension.to_string(),
            "exponents": dimension.exponents(),
            "quantity": dimension.name(),
            "scale": unit.scale(),
            "kind": unit.kind(),
        }))
    }
}

// ============ compatible ============

pub struct Compatible;

static COMPATIBLE_ARGS: [ArgMeta; 2] = [
    ArgMeta::required("unit1", "Text", "First unit"),
    ArgMeta::required("unit2", "Text", "Second unit"),
];

static COMPATIBLE_EXAMPLES: [&str; 2] = [
    "compatible(\"km\", \"mi\") → true",
    "compatible(\"m\", \"s\") → false",
];

impl FunctionPlugin for Compatible {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "compatible",
            description: "Check if two units are dimensionally compatible",
            usage: "compatible(unit1, unit2)",
            args: &COMPATIBLE_ARGS,
            returns: "Bool",
            examples: &COMPATIBLE_EXAMPLES,
            category: "inspection",
            related: &["dimensions", "convert"],
        }
    }

    fn call(&self, args: &[JsonValue], _ctx: &EvalContext) -> Result<JsonValue, IsqError> {
        let reg = UnitRegistry::global();
        let unit1 = reg.lookup(arg_text("compatible", "unit1", &args[0])?)?;
        let unit2 = reg.lookup(arg_text("compatible", "unit2", &args[1])?)?;
        Ok(json!(unit1.is_compatible(&unit2)))
    }
}

// ============ units ============

pub struct Units;

static UNITS_ARGS: [ArgMeta; 1] = [
    ArgMeta::optional("like", "Text", "Only list units compatible with this one", "all units"),
];

impl FunctionPlugin for Units {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "units",
            description: "List registered units, optionally only those compatible with a given unit",
            usage: "units([like])",
            args: &UNITS_ARGS,
            returns: "List",
            examples: &["units(\"km\") → [nm, µm, mm, cm, in, ft, yd, m, km, mi, nmi, au]"],
            category: "inspection",
            related: &["dimensions"],
        }
    }

    fn call(&self, args: &[JsonValue], _ctx: &EvalContext) -> Result<JsonValue, IsqError> {
        let reg = UnitRegistry::global();
        let listed: Vec<JsonValue> = match args.first() {
            Some(like) => {
                let unit = reg.lookup(arg_text("units", "like", like)?)?;
                reg.by_dimension(unit.dimension())
                    .into_iter()
                    .map(|u| json!({ "unit": u.symbol(), "name": u.name(), "scale": u.scale() }))
                    .collect()
            }
            None => reg.symbols()
                .into_iter()
                .map(|s| json!(s))
                .collect(),
        };
        Ok(JsonValue::Array(listed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use isq_core::codes;

    fn eval_ctx() -> EvalContext {
        EvalContext::new()
    }

    fn qty(value: f64, unit: &str) -> JsonValue {
        json!({ "value": value, "unit": unit })
    }

    #[test]
    fn test_quantity() {
        let result = QuantityFn.call(&[json!(5), json!("km")], &eval_ctx()).unwrap();
        assert_eq!(result["value"], 5.0);
        assert_eq!(result["unit"], "km");
        assert_eq!(result["dimension"], "L");
        assert!(result.get("uncertainty").is_none());

        let result = QuantityFn.call(&[json!(1), json!("m"), json!(0.01)], &eval_ctx()).unwrap();
        assert_eq!(result["display"], "1.000(10) m");
    }

    #[test]
    fn test_quantity_unknown_unit() {
        let err = QuantityFn.call(&[json!(1), json!("banana")], &eval_ctx()).unwrap_err();
        assert_eq!(err.code, codes::UNKNOWN_UNIT);
    }

    #[test]
    fn test_convert() {
        let result = Convert.call(&[qty(2.0, "km"), json!("m")], &eval_ctx()).unwrap();
        assert_eq!(result["value"], 2000.0);
        assert_eq!(result["unit"], "m");

        let err = Convert.call(&[qty(2.0, "km"), json!("kg")], &eval_ctx()).unwrap_err();
        assert_eq!(err.code, codes::INCOMPATIBLE_DIMENSIONS);
    }

    #[test]
    fn test_bad_quantity_argument() {
        let err = Convert.call(&[json!("2 km"), json!("m")], &eval_ctx()).unwrap_err();
        assert_eq!(err.code, codes::ARG_TYPE);
        let err = Convert.call(&[json!({ "value": 2 }), json!("m")], &eval_ctx()).unwrap_err();
        assert_eq!(err.code, codes::ARG_TYPE);
    }

    #[test]
    fn test_bad_unit_names_argument() {
        let err = Add.call(&[qty(1.0, "m"), qty(2.0, "furlongs")], &eval_ctx()).unwrap_err();
        assert_eq!(err.code, codes::UNKNOWN_UNIT);
        assert_eq!(err.context.unwrap().notes, vec!["in argument 'b'".to_string()]);
    }

    #[test]
    fn test_to_base() {
        let result = ToBase.call(&[qty(1.0, "N")], &eval_ctx()).unwrap();
        assert_eq!(result["value"], 1.0);
        assert_eq!(result["unit"], "m·kg·s⁻²");
    }

    #[test]
    fn test_algebra_functions() {
        let ctx = eval_ctx();
        let area = Multiply.call(&[qty(3.0, "m"), qty(4.0, "m")], &ctx).unwrap();
        assert_eq!(area["value"], 12.0);
        assert_eq!(area["unit"], "m²");
        assert_eq!(area["dimension"], "L^2");

        let err = Add.call(&[qty(5.0, "m"), qty(3.0, "kg")], &ctx).unwrap_err();
        assert_eq!(err.code, codes::INCOMPATIBLE_DIMENSIONS);

        let err = Divide.call(&[qty(10.0, "m"), qty(0.0, "s")], &ctx).unwrap_err();
        assert_eq!(err.code, codes::DIV_ZERO);

        let diff = Subtract.call(&[qty(1.0, "m"), qty(1.0, "m")], &ctx).unwrap();
        assert_eq!(diff["value"], 0.0);

        let cube = Power.call(&[qty(2.0, "m"), json!(3)], &ctx).unwrap();
        assert_eq!(cube["value"], 8.0);

        let err = Power.call(&[qty(2.0, "m"), json!(1.5)], &ctx).unwrap_err();
        assert_eq!(err.code, codes::ARG_TYPE);

        let err = Sqrt.call(&[qty(2.0, "m")], &ctx).unwrap_err();
        assert_eq!(err.code, codes::DOMAIN_ERROR);
    }

    #[test]
    fn test_named_coherent_results() {
        let ctx = eval_ctx();
        let work = Multiply.call(&[qty(2.0, "N"), qty(3.0, "m")], &ctx).unwrap();
        assert_eq!(work["unit"], "J");
        assert_eq!(work["display"], "6 J");

        let speed = Divide.call(&[qty(100.0, "m"), qty(10.0, "s")], &ctx).unwrap();
        assert_eq!(speed["unit"], "m/s");

        let watts = Divide.call(&[qty(1.0, "kJ"), qty(4.0, "s")], &ctx).unwrap();
        assert_eq!(watts["unit"], "W");
        assert_eq!(watts["value"], 250.0);

        let pressure = Divide.call(&[qty(10.0, "N"), qty(2.0, "m²")], &ctx).unwrap();
        assert_eq!(pressure["unit"], "Pa");

        // No single named unit for L^3 T
        let odd = Multiply.call(&[qty(2.0, "m³"), qty(3.0, "s")], &ctx).unwrap();
        assert_eq!(odd["unit"], "m³·s");

        let ratio = Divide.call(&[qty(3.0, "m"), qty(1.0, "m")], &ctx).unwrap();
        assert_eq!(ratio["unit"], "");
    }

    #[test]
    fn test_extreme_power_is_an_error() {
        let ctx = eval_ctx();
        let err = Power.call(&[qty(2.0, "m²"), json!(i32::MIN)], &ctx).unwrap_err();
        assert_eq!(err.code, codes::DOMAIN_ERROR);
        let err = Power.call(&[qty(2.0, "m²"), json!(i32::MAX)], &ctx).unwrap_err();
        assert_eq!(err.code, codes::DOMAIN_ERROR);

        let tiny = Power.call(&[qty(2.0, "m"), json!(i32::MIN)], &ctx).unwrap();
        assert_eq!(tiny["value"], 0.0);

        let err = Power.call(&[qty(2.0, "m"), json!(i64::from(i32::MAX) + 1)], &ctx).unwrap_err();
        assert_eq!(err.code, codes::ARG_TYPE);
    }

    #[test]
    fn test_recip() {
        let ctx = eval_ctx();
        let f = Recip.call(&[qty(4.0, "ms")], &ctx).unwrap();
        assert_eq!(f["unit"], "Hz");
        assert!((f["value"].as_f64().unwrap() - 250.0).abs() < 1e-9);

        let err = Recip.call(&[qty(0.0, "s")], &ctx).unwrap_err();
        assert_eq!(err.code, codes::DIV_ZERO);
    }

    #[test]
    fn test_divide_by() {
        let ctx = eval_ctx();
        let q = json!({ "value": 3.0, "unit": "km", "uncertainty": 0.2 });
        let half = DivideBy.call(&[q, json!(2)], &ctx).unwrap();
        assert_eq!(half["value"], 1.5);
        assert_eq!(half["unit"], "km");
        assert_eq!(half["uncertainty"], 0.1);

        let err = DivideBy.call(&[qty(3.0, "km"), json!(0)], &ctx).unwrap_err();
        assert_eq!(err.code, codes::DIV_ZERO);
        let err = DivideBy.call(&[qty(3.0, "km"), json!("2")], &ctx).unwrap_err();
        assert_eq!(err.code, codes::ARG_TYPE);
    }

    #[test]
    fn test_exp() {
        let ctx = eval_ctx();
        let e = Exp.call(&[qty(1.0, "1")], &ctx).unwrap();
        assert!((e["value"].as_f64().unwrap() - std::f64::consts::E).abs() < 1e-12);
        assert_eq!(e["dimension"], "1");

        let growth = Exp.call(&[qty(50.0, "%")], &ctx).unwrap();
        assert!((growth["value"].as_f64().unwrap() - 0.5f64.exp()).abs() < 1e-12);

        let err = Exp.call(&[qty(2.0, "m")], &ctx).unwrap_err();
        assert_eq!(err.code, codes::INCOMPATIBLE_DIMENSIONS);
    }

    #[test]
    fn test_uncertainty_argument() {
        let a = json!({ "value": 1.0, "unit": "m", "uncertainty": 0.03 });
        let b = json!({ "value": 1.0, "unit": "m", "uncertainty": 0.04 });
        let sum = Add.call(&[a, b], &eval_ctx()).unwrap();
        let u = sum["uncertainty"].as_f64().unwrap();
        assert!((u - 0.05).abs() < 1e-12);
    }

    #[test]
    fn test_compare() {
        let result = Compare.call(&[qty(1.0, "km"), qty(999.0, "m")], &eval_ctx()).unwrap();
        assert_eq!(result, "greater");
        let result = Compare.call(&[qty(60.0, "s"), qty(1.0, "min")], &eval_ctx()).unwrap();
        assert_eq!(result, "equal");
    }

    #[test]
    fn test_dimensions() {
        let result = Dimensions.call(&[json!("N")], &eval_ctx()).unwrap();
        assert_eq!(result["dimension"], "L M T^-2");
        assert_eq!(result["quantity"], "force");
        assert_eq!(result["kind"], "derived");
        assert_eq!(result["exponents"], json!([1, 1, -2, 0, 0, 0, 0]));
    }

    #[test]
    fn test_compatible() {
        let result = Compatible.call(&[json!("km"), json!("mi")], &eval_ctx()).unwrap();
        assert_eq!(result, true);
        let result = Compatible.call(&[json!("m"), json!("s")], &eval_ctx()).unwrap();
        assert_eq!(result, false);
    }

    #[test]
    fn test_units() {
        let all = Units.call(&[], &eval_ctx()).unwrap();
        assert!(all.as_array().unwrap().contains(&json!("kg")));

        let lengths = Units.call(&[json!("km")], &eval_ctx()).unwrap();
        let symbols: Vec<&str> = lengths.as_array().unwrap()
            .iter()
            .map(|u| u["unit"].as_str().unwrap())
            .collect();
        assert_eq!(symbols.first(), Some(&"nm"));
        assert!(symbols.contains(&"mi"));
        assert!(!symbols.contains(&"kg"));
    }

    #[test]
    fn test_library_registration() {
        let registry = crate::load_units_library(PluginRegistry::new());
        assert_eq!(registry.function_names().len(), 16);
        let mut ctx = EvalContext::new();
        let result = registry.call_function("convert", &[qty(1.0, "kWh"), json!("kJ")], &mut ctx).unwrap();
        assert!((result["value"].as_f64().unwrap() - 3600.0).abs() < 1e-9);
    }
}
