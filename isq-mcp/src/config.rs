//! Server configuration from the environment
//!
//! - `ISQ_UNITS_PATH`: JSON registry config (see `isq_units::RegistryConfig`)
//! - `ISQ_INCLUDE_SI`: `true`/`false`, overrides `include_si` from the file
//! - `ISQ_TRACE`: `true` to attach the plugin call trace to every tool result
//! - `RUST_LOG`: log filter, default `info`

use std::env;
use std::path::PathBuf;
use isq_units::{QuantityError, RegistryConfig, UnitRegistry};
use tracing::info;

pub const UNITS_PATH_VAR: &str = "ISQ_UNITS_PATH";
pub const INCLUDE_SI_VAR: &str = "ISQ_INCLUDE_SI";
pub const TRACE_VAR: &str = "ISQ_TRACE";
pub const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ServerConfig {
    pub units_path: Option<PathBuf>,
    pub include_si: Option<bool>,
    pub trace: bool,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, QuantityError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Read settings through `lookup`; empty values count as unset
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, QuantityError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let flag = |key: &str| -> Result<Option<bool>, QuantityError> {
            match get(key) {
                Some(v) => parse_bool(&v)
                    .map(Some)
                    .ok_or_else(|| QuantityError::Config(format!("{} must be true or false, got '{}'", key, v))),
                None => Ok(None),
            }
        };

        Ok(ServerConfig {
            units_path: get(UNITS_PATH_VAR).map(PathBuf::from),
            include_si: flag(INCLUDE_SI_VAR)?,
            trace: flag(TRACE_VAR)?.unwrap_or(false),
        })
    }

    pub fn registry_config(&self) -> Result<RegistryConfig, QuantityError> {
        let mut cfg = match &self.units_path {
            Some(path) => RegistryConfig::from_path(path)?,
            None => RegistryConfig::default(),
        };
        if let Some(include_si) = self.include_si {
            cfg.include_si = include_si;
        }
        Ok(cfg)
    }

    /// Build the configured registry and make it the process-wide one
    pub fn install_registry(&self) -> Result<&'static UnitRegistry, QuantityError> {
        let registry = self.registry_config()?.build()?;
        info!(
            path = ?self.units_path,
            units = registry.len(),
            "unit registry ready"
        );
        UnitRegistry::install(registry)
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars.iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_empty_environment() {
        let cfg = ServerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(cfg, ServerConfig::default());
        assert!(cfg.registry_config().unwrap().include_si);
    }

    #[test]
    fn test_include_si_override() {
        let cfg = ServerConfig::from_lookup(lookup(&[(INCLUDE_SI_VAR, "false")])).unwrap();
        assert_eq!(cfg.include_si, Some(false));
        let registry = cfg.registry_config().unwrap().build().unwrap();
        assert!(registry.is_empty());

        let cfg = ServerConfig::from_lookup(lookup(&[(INCLUDE_SI_VAR, " ")])).unwrap();
        assert_eq!(cfg.include_si, None);
    }

    #[test]
    fn test_bad_include_si() {
        let err = ServerConfig::from_lookup(lookup(&[(INCLUDE_SI_VAR, "maybe")])).unwrap_err();
        assert!(matches!(err, QuantityError::Config(_)));
    }

    #[test]
    fn test_trace_flag() {
        assert!(!ServerConfig::from_lookup(lookup(&[])).unwrap().trace);
        let cfg = ServerConfig::from_lookup(lookup(&[(TRACE_VAR, "on")])).unwrap();
        assert!(cfg.trace);
        assert_eq!(cfg.include_si, None);

        let err = ServerConfig::from_lookup(lookup(&[(TRACE_VAR, "verbose")])).unwrap_err();
        assert!(matches!(err, QuantityError::Config(msg) if msg.contains(TRACE_VAR)));
    }

    #[test]
    fn test_units_file() {
        let path = env::temp_dir().join(format!("isq-mcp-units-{}.json", std::process::id()));
        std::fs::write(&path, r#"{ "units": [
            { "symbol": "ftn", "name": "fortnight", "dimension": { "time": 1 }, "scale": 1209600 }
        ] }"#).unwrap();

        let cfg = ServerConfig::from_lookup(lookup(&[(UNITS_PATH_VAR, path.to_str().unwrap())])).unwrap();
        let registry = cfg.registry_config().unwrap().build().unwrap();
        assert!(registry.lookup("ftn").is_ok());
        assert!(registry.lookup("km").is_ok());

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_missing_units_file() {
        let cfg = ServerConfig::from_lookup(lookup(&[(UNITS_PATH_VAR, "/nonexistent/units.json")])).unwrap();
        assert!(matches!(cfg.registry_config(), Err(QuantityError::Config(_))));
    }
}
