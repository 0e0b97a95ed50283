//! Bus resolution: merging file defaults into one bus definition.

use crate::error::ConfigError;
use crate::types::{BusConfig, BusFile, SignalSet, DEFAULT_SEPARATOR};

/// A bus definition with every setting decided.
///
/// Per-bus settings override `[defaults]`, which override built-in defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedBus {
    /// The key the bus was declared under.
    pub key: String,
    /// Bus name prefix, if any.
    pub name: Option<String>,
    /// Mandatory signals.
    pub signals: SignalSet,
    /// Optional signals.
    pub optional_signals: SignalSet,
    /// Separator between bus name and signal name.
    pub separator: String,
    /// Case-insensitive name resolution.
    pub case_insensitive: bool,
    /// Element index applied to every signal.
    pub array_index: Option<usize>,
    /// Allow the exhaustive scan when case-insensitive.
    pub scan_fallback: bool,
}

/// Resolves the bus declared under `key`.
pub fn resolve_bus(file: &BusFile, key: &str) -> Result<ResolvedBus, ConfigError> {
    let bus = file
        .buses
        .get(key)
        .ok_or_else(|| ConfigError::UnknownBus(key.to_string()))?;
    Ok(merge(file, key, bus))
}

/// Resolves every bus in the file, ordered by key.
pub fn resolve_all(file: &BusFile) -> Vec<ResolvedBus> {
    file.buses
        .iter()
        .map(|(key, bus)| merge(file, key, bus))
        .collect()
}

fn merge(file: &BusFile, key: &str, bus: &BusConfig) -> ResolvedBus {
    let defaults = &file.defaults;
    ResolvedBus {
        key: key.to_string(),
        name: bus.name.clone(),
        signals: bus.signals.clone(),
        optional_signals: bus.optional_signals.clone(),
        separator: bus
            .separator
            .clone()
            .or_else(|| defaults.separator.clone())
            .unwrap_or_else(|| DEFAULT_SEPARATOR.to_string()),
        case_insensitive: bus
            .case_insensitive
            .or(defaults.case_insensitive)
            .unwrap_or(true),
        array_index: bus.array_index,
        scan_fallback: bus.scan_fallback.or(defaults.scan_fallback).unwrap_or(true),
    }
}
