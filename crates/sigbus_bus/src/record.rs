//! Records that a bus drives from or samples into.

use std::collections::{BTreeMap, HashMap};

use sigbus_sim::SimValue;

use crate::capture::Capture;

/// An object with named fields matching (some of) a bus's attributes.
pub trait BusRecord {
    /// Returns the field named `name`, if the record has one.
    fn field(&self, name: &str) -> Option<&SimValue>;

    /// Returns the field named `name` for writing, if the record has one.
    fn field_mut(&mut self, name: &str) -> Option<&mut SimValue>;

    /// Type name reported in strict-mode errors.
    fn record_type(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// A named record of signal values, e.g. one beat of a stream.
#[derive(Clone, Debug, PartialEq)]
pub struct Transaction {
    kind: String,
    fields: BTreeMap<String, SimValue>,
}

impl Transaction {
    /// Creates an empty record; `kind` is its reported type name.
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Builds a record holding every value of a capture.
    pub fn from_capture(kind: impl Into<String>, capture: &Capture) -> Self {
        let mut record = Self::new(kind);
        for (name, value) in capture {
            record.set(name, value.clone());
        }
        record
    }

    /// Adds a field, builder style.
    pub fn with(mut self, name: &str, value: impl Into<SimValue>) -> Self {
        self.set(name, value);
        self
    }

    /// Sets a field, returning the previous value.
    pub fn set(&mut self, name: &str, value: impl Into<SimValue>) -> Option<SimValue> {
        self.fields.insert(name.to_string(), value.into())
    }

    /// Reads a field.
    pub fn get(&self, name: &str) -> Option<&SimValue> {
        self.fields.get(name)
    }

    /// Removes a field.
    pub fn remove(&mut self, name: &str) -> Option<SimValue> {
        self.fields.remove(name)
    }

    /// The record's type name.
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Iterates over fields in name order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &SimValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl BusRecord for Transaction {
    fn field(&self, name: &str) -> Option<&SimValue> {
        self.fields.get(name)
    }

    fn field_mut(&mut self, name: &str) -> Option<&mut SimValue> {
        self.fields.get_mut(name)
    }

    fn record_type(&self) -> &str {
        &self.kind
    }
}

impl BusRecord for BTreeMap<String, SimValue> {
    fn field(&self, name: &str) -> Option<&SimValue> {
        self.get(name)
    }

    fn field_mut(&mut self, name: &str) -> Option<&mut SimValue> {
        self.get_mut(name)
    }

    fn record_type(&self) -> &str {
        "BTreeMap"
    }
}

impl BusRecord for HashMap<String, SimValue> {
    fn field(&self, name: &str) -> Option<&SimValue> {
        self.get(name)
    }

    fn field_mut(&mut self, name: &str) -> Option<&mut SimValue> {
        self.get_mut(name)
    }

    fn record_type(&self) -> &str {
        "HashMap"
    }
}
