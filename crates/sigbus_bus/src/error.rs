//! Error types for bus construction and batch operations.

use std::fmt;

use sigbus_sim::SimError;

/// The batch operation that found a record field missing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BusAction {
    /// Writing record fields into signals.
    Drive,
    /// Reading signals into record fields.
    Sample,
}

impl fmt::Display for BusAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BusAction::Drive => write!(f, "drive onto"),
            BusAction::Sample => write!(f, "sample from"),
        }
    }
}

/// Errors raised by [`Bus`](crate::Bus) and [`Capture`](crate::Capture).
#[derive(Debug, thiserror::Error)]
pub enum BusError {
    /// A mandatory signal could not be resolved on the entity.
    #[error("no signal named '{name}' on entity '{entity}'")]
    SignalNotFound {
        /// The entity that was searched.
        entity: String,
        /// The composed signal name, exactly as looked up.
        name: String,
    },

    /// A strict drive or sample met a record without a bus attribute.
    #[error("Unable to {action} {entity}.{bus} because {record_type} is missing attribute {attribute}")]
    MissingAttribute {
        /// Which operation failed.
        action: BusAction,
        /// The entity owning the bus.
        entity: String,
        /// The bus name, or `(unnamed)`.
        bus: String,
        /// The record's type name.
        record_type: String,
        /// The attribute the record lacks.
        attribute: String,
    },

    /// A capture was read with a name that is not on the bus.
    #[error("signal {0} not present in bus")]
    NotInCapture(String),

    /// The handle layer rejected a read, write, or index.
    #[error(transparent)]
    Sim(#[from] SimError),
}
