//! The seam between harness code and a simulator backend.
//!
//! A simulator exposes its design hierarchy as [`Entity`] values whose
//! signals are reached through [`SignalHandle`]s. Handles are cheap clones of
//! simulator-owned state: writing through any clone is visible through all
//! of them.

use std::fmt;

use crate::error::SimError;
use crate::value::SimValue;

/// A reference to one simulator signal.
pub trait SignalHandle: Clone + fmt::Debug {
    /// The signal's name within its entity.
    fn name(&self) -> &str;

    /// Reads the current value.
    fn value(&self) -> SimValue;

    /// Writes a new value.
    fn set_value(&self, value: SimValue) -> Result<(), SimError>;

    /// Returns a handle to element `index` of an array signal.
    fn element(&self, index: usize) -> Result<Self, SimError>;

    /// Reads the value as a bit-string, if the signal has one.
    fn binstr(&self) -> Option<String> {
        self.value().binstr()
    }

    /// Writes a bit-string into a logic signal, keeping its width.
    fn set_binstr(&self, binstr: &str) -> Result<(), SimError> {
        match self.value() {
            SimValue::Logic(mut v) => {
                v.assign_binstr(binstr)?;
                self.set_value(SimValue::Logic(v))
            }
            other => Err(SimError::TypeMismatch {
                signal: self.name().to_string(),
                expected: other.kind(),
                found: "logic",
            }),
        }
    }

    /// Writes `value` and returns the token recording the assignment.
    fn assign(&self, value: SimValue) -> Result<AssignmentResult<Self, SimValue>, SimError> {
        self.set_value(value.clone())?;
        Ok(AssignmentResult::new(self.clone(), value))
    }
}

/// A design entity that owns named signals.
pub trait Entity {
    /// The handle type this backend hands out.
    type Handle: SignalHandle;

    /// The entity's name, used in log fields and error messages.
    fn name(&self) -> &str;

    /// Identifies the simulator backend (e.g. `"verilator"`).
    fn simulator(&self) -> &str;

    /// Looks up a signal by its exact name.
    fn lookup(&self, name: &str) -> Option<Self::Handle>;

    /// Returns a snapshot of every signal name on the entity.
    fn signal_names(&self) -> Vec<String>;
}

impl<E: Entity + ?Sized> Entity for &E {
    type Handle = E::Handle;

    fn name(&self) -> &str {
        (**self).name()
    }

    fn simulator(&self) -> &str {
        (**self).simulator()
    }

    fn lookup(&self, name: &str) -> Option<Self::Handle> {
        (**self).lookup(name)
    }

    fn signal_names(&self) -> Vec<String> {
        (**self).signal_names()
    }
}

/// Token returned by an assignment: the target and the value written to it.
///
/// The write has already been applied to the simulator when the token
/// exists; the token only records it.
#[derive(Clone, Debug, PartialEq)]
#[must_use]
pub struct AssignmentResult<T, V> {
    target: T,
    value: V,
}

impl<T, V> AssignmentResult<T, V> {
    /// Records an assignment of `value` to `target`.
    pub fn new(target: T, value: V) -> Self {
        Self { target, value }
    }

    /// The assigned object.
    pub fn target(&self) -> &T {
        &self.target
    }

    /// The value that was assigned.
    pub fn value(&self) -> &V {
        &self.value
    }

    /// Splits the token into target and value.
    pub fn into_parts(self) -> (T, V) {
        (self.target, self.value)
    }
}
