//! Read-only snapshots of bus values.

use std::collections::btree_map;
use std::collections::BTreeMap;

use serde::Serialize;
use sigbus_sim::SimValue;

use crate::error::BusError;

/// Values of every bus signal at the moment [`Bus::capture`](crate::Bus::capture)
/// was called.
///
/// A capture has no mutating methods; reading a name that was not on the bus
/// is an error naming that signal.
///
/// ```compile_fail
/// # use sigbus_bus::Capture;
/// fn overwrite(cap: &mut Capture) {
///     cap.values.insert("data".into(), 5i64.into());
/// }
/// ```
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Capture {
    values: BTreeMap<String, SimValue>,
}

impl Capture {
    pub(crate) fn from_values(values: BTreeMap<String, SimValue>) -> Self {
        Self { values }
    }

    /// Reads the captured value of `name`.
    pub fn get(&self, name: &str) -> Result<&SimValue, BusError> {
        self.values
            .get(name)
            .ok_or_else(|| BusError::NotInCapture(name.to_string()))
    }

    /// Returns true if `name` was captured.
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Number of captured signals.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if the bus had no signals.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Captured attribute names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Iterates over `(name, value)` pairs, sorted by name.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            inner: self.values.iter(),
        }
    }
}

/// Iterator over a [`Capture`].
#[derive(Debug)]
pub struct Iter<'a> {
    inner: btree_map::Iter<'a, String, SimValue>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a str, &'a SimValue);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, v)| (k.as_str(), v))
    }
}

impl<'a> IntoIterator for &'a Capture {
    type Item = (&'a str, &'a SimValue);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Iter<'a> {
        self.iter()
    }
}
