//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::{BusConfig, BusFile};
use std::collections::BTreeSet;
use std::path::Path;

/// File name looked up by [`load_buses`] inside a harness directory.
pub const BUSES_FILE: &str = "buses.toml";

/// Loads and validates `<dir>/buses.toml`.
pub fn load_buses(dir: &Path) -> Result<BusFile, ConfigError> {
    let content = std::fs::read_to_string(dir.join(BUSES_FILE))?;
    load_buses_from_str(&content)
}

/// Parses and validates bus definitions from a string.
///
/// Useful for testing without filesystem dependencies.
pub fn load_buses_from_str(content: &str) -> Result<BusFile, ConfigError> {
    let file: BusFile =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    for (key, bus) in &file.buses {
        validate_bus(key, bus)?;
    }
    Ok(file)
}

/// Rejects empty names and attributes declared twice.
fn validate_bus(key: &str, bus: &BusConfig) -> Result<(), ConfigError> {
    let mut seen = BTreeSet::new();
    for (attr, signal) in bus.signals.pairs().chain(bus.optional_signals.pairs()) {
        if attr.is_empty() || signal.is_empty() {
            return Err(ConfigError::ValidationError(format!(
                "bus '{key}': empty signal name"
            )));
        }
        if !seen.insert(attr) {
            return Err(ConfigError::ValidationError(format!(
                "bus '{key}': attribute '{attr}' declared more than once"
            )));
        }
    }
    Ok(())
}
