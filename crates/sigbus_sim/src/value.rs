//! Values carried across the handle seam and per-signal state.
//!
//! [`SimValue`] is what a harness reads from and writes to a signal. Writes
//! are coerced against the signal's current value by [`SimSignalState::write`]
//! so a logic signal keeps its width and an integer signal stays an integer.

use std::fmt;

use serde::{Deserialize, Serialize};
use sigbus_common::{Logic, LogicVec};

use crate::error::SimError;

/// A signal value as seen by a test harness.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum SimValue {
    /// A 4-state vector; the only bit-string capable kind.
    Logic(LogicVec),
    /// A plain integer.
    Integer(i64),
    /// A real number.
    Real(f64),
    /// A string.
    Str(String),
    /// Element values of an array signal.
    Array(Vec<SimValue>),
}

impl SimValue {
    /// Short name of the value kind, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            SimValue::Logic(_) => "logic",
            SimValue::Integer(_) => "integer",
            SimValue::Real(_) => "real",
            SimValue::Str(_) => "string",
            SimValue::Array(_) => "array",
        }
    }

    /// Returns the vector if this is a logic value.
    pub fn as_logic(&self) -> Option<&LogicVec> {
        match self {
            SimValue::Logic(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the bit-string form, if this value has one.
    pub fn binstr(&self) -> Option<String> {
        self.as_logic().map(LogicVec::binstr)
    }

    /// Interprets the value as an unsigned integer when it is fully resolved.
    pub fn to_u64(&self) -> Option<u64> {
        match self {
            SimValue::Logic(v) => v.to_u64(),
            SimValue::Integer(i) => u64::try_from(*i).ok(),
            _ => None,
        }
    }
}

impl From<LogicVec> for SimValue {
    fn from(v: LogicVec) -> Self {
        SimValue::Logic(v)
    }
}

impl From<i64> for SimValue {
    fn from(v: i64) -> Self {
        SimValue::Integer(v)
    }
}

impl From<bool> for SimValue {
    fn from(v: bool) -> Self {
        SimValue::Logic(LogicVec::filled(1, Logic::from(v)))
    }
}

impl From<f64> for SimValue {
    fn from(v: f64) -> Self {
        SimValue::Real(v)
    }
}

impl From<&str> for SimValue {
    fn from(v: &str) -> Self {
        SimValue::Str(v.to_string())
    }
}

impl From<String> for SimValue {
    fn from(v: String) -> Self {
        SimValue::Str(v)
    }
}

impl fmt::Display for SimValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimValue::Logic(v) => write!(f, "{v}"),
            SimValue::Integer(i) => write!(f, "{i}"),
            SimValue::Real(r) => write!(f, "{r}"),
            SimValue::Str(s) => write!(f, "{s:?}"),
            SimValue::Array(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
        }
    }
}

/// Runtime state of one scalar signal.
#[derive(Clone, Debug)]
pub struct SimSignalState {
    /// Current signal value.
    pub value: SimValue,
    /// Number of successful writes.
    pub writes: u64,
}

impl SimSignalState {
    /// Creates a signal state initialized to the given value.
    pub fn new(init_value: SimValue) -> Self {
        Self {
            value: init_value,
            writes: 0,
        }
    }

    /// Creates a logic signal initialized to all-X.
    pub fn new_unknown(width: u32) -> Self {
        Self::new(SimValue::Logic(LogicVec::filled(width, Logic::X)))
    }

    /// Writes `value`, coerced to the kind the signal already holds.
    ///
    /// `name` is only used for error reporting.
    pub fn write(&mut self, name: &str, value: SimValue) -> Result<(), SimError> {
        let next = coerce(name, &self.value, value)?;
        self.value = next;
        self.writes += 1;
        Ok(())
    }
}

/// Converts `value` into the kind of `current`.
fn coerce(name: &str, current: &SimValue, value: SimValue) -> Result<SimValue, SimError> {
    let mismatch = |found: &SimValue| SimError::TypeMismatch {
        signal: name.to_string(),
        expected: current.kind(),
        found: found.kind(),
    };
    match (current, value) {
        (SimValue::Logic(cur), SimValue::Logic(v)) => {
            if v.width() != cur.width() {
                return Err(SimError::WidthMismatch {
                    signal: name.to_string(),
                    expected: cur.width(),
                    actual: v.width(),
                });
            }
            Ok(SimValue::Logic(v))
        }
        (SimValue::Logic(cur), SimValue::Integer(i)) => {
            int_to_logic(name, i, cur.width()).map(SimValue::Logic)
        }
        (SimValue::Integer(_), SimValue::Integer(i)) => Ok(SimValue::Integer(i)),
        (SimValue::Integer(_), SimValue::Logic(v)) => v
            .to_u64()
            .and_then(|u| i64::try_from(u).ok())
            .map(SimValue::Integer)
            .ok_or_else(|| mismatch(&SimValue::Logic(v))),
        (SimValue::Real(_), SimValue::Real(r)) => Ok(SimValue::Real(r)),
        (SimValue::Real(_), SimValue::Integer(i)) => Ok(SimValue::Real(i as f64)),
        (SimValue::Str(_), SimValue::Str(s)) => Ok(SimValue::Str(s)),
        (_, other) => Err(mismatch(&other)),
    }
}

/// Encodes `value` as a two's complement vector of `width` bits.
///
/// Accepts anything representable either unsigned or signed in `width` bits.
fn int_to_logic(name: &str, value: i64, width: u32) -> Result<LogicVec, SimError> {
    let overflow = || SimError::ValueOverflow {
        signal: name.to_string(),
        value,
        width,
    };
    if width == 0 {
        return if value == 0 {
            Ok(LogicVec::new(0))
        } else {
            Err(overflow())
        };
    }
    if width < 64 {
        let v = i128::from(value);
        let max_unsigned = (1i128 << width) - 1;
        let min_signed = -(1i128 << (width - 1));
        if v > max_unsigned || v < min_signed {
            return Err(overflow());
        }
    }
    let mut vec = LogicVec::from_u64(value as u64, width);
    if value < 0 {
        for i in 64..width {
            vec.set(i, Logic::One);
        }
    }
    Ok(vec)
}
