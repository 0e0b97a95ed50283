//! In-memory simulator backend.
//!
//! [`MemEntity`] holds signals directly in process memory. It has no notion
//! of time: a write is visible to every handle clone immediately. Harnesses
//! use it to exercise bus logic without a real simulator attached.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use sigbus_common::{Logic, LogicVec};

use crate::error::SimError;
use crate::handle::{Entity, SignalHandle};
use crate::value::{SimSignalState, SimValue};

/// Simulator name reported by [`MemEntity`] unless overridden.
pub const MEM_SIMULATOR: &str = "sigbus-mem";

/// A signal node: a scalar with state, or an array of element handles.
enum MemNode {
    Scalar(RefCell<SimSignalState>),
    Array(Vec<MemHandle>),
}

struct MemSignal {
    name: String,
    node: MemNode,
}

/// Handle to a signal of a [`MemEntity`].
#[derive(Clone)]
pub struct MemHandle {
    inner: Rc<MemSignal>,
}

impl MemHandle {
    /// Creates a detached scalar signal.
    pub fn scalar(name: impl Into<String>, init: SimValue) -> Self {
        Self {
            inner: Rc::new(MemSignal {
                name: name.into(),
                node: MemNode::Scalar(RefCell::new(SimSignalState::new(init))),
            }),
        }
    }

    /// Creates a detached array of `len` logic elements, each all-X.
    ///
    /// Elements are named `name[i]`.
    pub fn logic_array(name: impl Into<String>, width: u32, len: usize) -> Self {
        let name = name.into();
        let elements = (0..len)
            .map(|i| Self {
                inner: Rc::new(MemSignal {
                    name: format!("{name}[{i}]"),
                    node: MemNode::Scalar(RefCell::new(SimSignalState::new_unknown(width))),
                }),
            })
            .collect();
        Self {
            inner: Rc::new(MemSignal {
                name,
                node: MemNode::Array(elements),
            }),
        }
    }

    /// Number of successful writes to this signal.
    ///
    /// For arrays, the sum over all elements.
    pub fn write_count(&self) -> u64 {
        match &self.inner.node {
            MemNode::Scalar(state) => state.borrow().writes,
            MemNode::Array(elements) => elements.iter().map(MemHandle::write_count).sum(),
        }
    }

    /// Returns true if both handles refer to the same signal.
    pub fn same_signal(&self, other: &MemHandle) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl SignalHandle for MemHandle {
    fn name(&self) -> &str {
        &self.inner.name
    }

    fn value(&self) -> SimValue {
        match &self.inner.node {
            MemNode::Scalar(state) => state.borrow().value.clone(),
            MemNode::Array(elements) => {
                SimValue::Array(elements.iter().map(SignalHandle::value).collect())
            }
        }
    }

    fn set_value(&self, value: SimValue) -> Result<(), SimError> {
        match &self.inner.node {
            MemNode::Scalar(state) => state.borrow_mut().write(&self.inner.name, value),
            MemNode::Array(elements) => match value {
                SimValue::Array(items) if items.len() == elements.len() => {
                    for (element, item) in elements.iter().zip(items) {
                        element.set_value(item)?;
                    }
                    Ok(())
                }
                SimValue::Array(items) => Err(SimError::LengthMismatch {
                    signal: self.inner.name.clone(),
                    expected: elements.len(),
                    actual: items.len(),
                }),
                other => Err(SimError::TypeMismatch {
                    signal: self.inner.name.clone(),
                    expected: "array",
                    found: other.kind(),
                }),
            },
        }
    }

    fn element(&self, index: usize) -> Result<Self, SimError> {
        match &self.inner.node {
            MemNode::Array(elements) => {
                elements
                    .get(index)
                    .cloned()
                    .ok_or_else(|| SimError::IndexOutOfRange {
                        signal: self.inner.name.clone(),
                        index,
                        len: elements.len(),
                    })
            }
            MemNode::Scalar(_) => Err(SimError::NotAnArray {
                signal: self.inner.name.clone(),
            }),
        }
    }
}

impl fmt::Debug for MemHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MemHandle({} = {})", self.inner.name, self.value())
    }
}

/// An entity whose signals live in memory.
///
/// Cloning a `MemEntity` shares its signals.
#[derive(Clone, Debug)]
pub struct MemEntity {
    name: String,
    simulator: String,
    signals: BTreeMap<String, MemHandle>,
}

impl MemEntity {
    /// Creates an empty entity.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            simulator: MEM_SIMULATOR.to_string(),
            signals: BTreeMap::new(),
        }
    }

    /// Overrides the reported simulator name.
    pub fn with_simulator(mut self, simulator: impl Into<String>) -> Self {
        self.simulator = simulator.into();
        self
    }

    /// Adds a logic signal of `width` bits, initialized to all-X.
    pub fn add_logic(&mut self, name: &str, width: u32) -> MemHandle {
        self.add_signal(name, SimValue::Logic(LogicVec::filled(width, Logic::X)))
    }

    /// Adds a scalar signal with an initial value.
    pub fn add_signal(&mut self, name: &str, init: SimValue) -> MemHandle {
        self.insert(MemHandle::scalar(name, init))
    }

    /// Adds an array of `len` logic elements of `width` bits.
    pub fn add_logic_array(&mut self, name: &str, width: u32, len: usize) -> MemHandle {
        self.insert(MemHandle::logic_array(name, width, len))
    }

    fn insert(&mut self, handle: MemHandle) -> MemHandle {
        let _ = self
            .signals
            .insert(handle.name().to_string(), handle.clone());
        handle
    }
}

impl Entity for MemEntity {
    type Handle = MemHandle;

    fn name(&self) -> &str {
        &self.name
    }

    fn simulator(&self) -> &str {
        &self.simulator
    }

    fn lookup(&self, name: &str) -> Option<MemHandle> {
        self.signals.get(name).cloned()
    }

    fn signal_names(&self) -> Vec<String> {
        self.signals.keys().cloned().collect()
    }
}
