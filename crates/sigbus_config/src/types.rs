//! Configuration types deserialized from `buses.toml`.

use serde::Deserialize;
use std::collections::BTreeMap;

/// Separator placed between a bus name and a signal name unless configured.
pub const DEFAULT_SEPARATOR: &str = "_";

/// The top-level contents of a `buses.toml` file.
#[derive(Debug, Default, Deserialize)]
pub struct BusFile {
    /// Settings every bus inherits unless it overrides them.
    #[serde(default)]
    pub defaults: BusDefaults,
    /// Bus definitions keyed by harness-side identifier.
    #[serde(default)]
    pub buses: BTreeMap<String, BusConfig>,
}

/// File-wide resolution settings.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct BusDefaults {
    /// Separator between bus name and signal name.
    pub separator: Option<String>,
    /// Whether signal names resolve case-insensitively.
    pub case_insensitive: Option<bool>,
    /// Whether case-insensitive resolution may scan every signal name.
    pub scan_fallback: Option<bool>,
}

/// One bus definition.
#[derive(Debug, Clone, Deserialize)]
pub struct BusConfig {
    /// Bus name prefix; omit for a nameless bus.
    #[serde(default)]
    pub name: Option<String>,
    /// Signals that must exist on the entity.
    pub signals: SignalSet,
    /// Signals that are bound only when present.
    #[serde(default)]
    pub optional_signals: SignalSet,
    /// Overrides [`BusDefaults::separator`].
    pub separator: Option<String>,
    /// Overrides [`BusDefaults::case_insensitive`].
    pub case_insensitive: Option<bool>,
    /// Element index applied to every resolved signal.
    pub array_index: Option<usize>,
    /// Overrides [`BusDefaults::scan_fallback`].
    pub scan_fallback: Option<bool>,
}

/// The signals of a bus, as attribute name / signal name pairs.
///
/// In TOML either a list, where each attribute is named like its signal,
/// or a table mapping attribute names to signal names.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum SignalSet {
    /// Attribute name and signal name are the same.
    List(Vec<String>),
    /// Attribute name to signal name.
    Map(BTreeMap<String, String>),
}

impl SignalSet {
    /// Iterates over `(attribute, signal)` pairs.
    pub fn pairs(&self) -> Box<dyn Iterator<Item = (&str, &str)> + '_> {
        match self {
            SignalSet::List(names) => Box::new(names.iter().map(|n| (n.as_str(), n.as_str()))),
            SignalSet::Map(map) => Box::new(map.iter().map(|(a, s)| (a.as_str(), s.as_str()))),
        }
    }

    /// Number of signals in the set.
    pub fn len(&self) -> usize {
        match self {
            SignalSet::List(names) => names.len(),
            SignalSet::Map(map) => map.len(),
        }
    }

    /// Returns true if the set has no signals.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for SignalSet {
    fn default() -> Self {
        SignalSet::List(Vec::new())
    }
}

impl<S: Into<String>> From<Vec<S>> for SignalSet {
    fn from(names: Vec<S>) -> Self {
        SignalSet::List(names.into_iter().map(Into::into).collect())
    }
}

impl<S: Into<String>, const N: usize> From<[S; N]> for SignalSet {
    fn from(names: [S; N]) -> Self {
        SignalSet::List(names.into_iter().map(Into::into).collect())
    }
}

impl<A: Into<String>, S: Into<String>> FromIterator<(A, S)> for SignalSet {
    fn from_iter<I: IntoIterator<Item = (A, S)>>(iter: I) -> Self {
        SignalSet::Map(
            iter.into_iter()
                .map(|(a, s)| (a.into(), s.into()))
                .collect(),
        )
    }
}
