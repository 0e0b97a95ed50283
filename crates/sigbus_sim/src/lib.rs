//! Signal-handle layer for sigbus test harnesses.
//!
//! This crate defines the seam between harness code and a simulator: an
//! [`Entity`] exposes named signals, each reached through a [`SignalHandle`]
//! that reads and writes [`SimValue`]s. Simulation itself (scheduling, time,
//! delta cycles) belongs to the backend behind these traits.
//!
//! # Modules
//!
//! - `error` — Handle-layer error types
//! - `value` — Signal values and per-signal state with write coercion
//! - `handle` — The `Entity` / `SignalHandle` traits and the assignment token
//! - `memory` — In-memory backend for running harnesses without a simulator
//!
//! # Usage
//!
//! ```
//! use sigbus_sim::{Entity, MemEntity, SignalHandle, SimValue};
//!
//! let mut dut = MemEntity::new("dut");
//! dut.add_logic("data", 8);
//! let data = dut.lookup("data").unwrap();
//! data.set_value(SimValue::Integer(0x3C)).unwrap();
//! assert_eq!(data.binstr().as_deref(), Some("00111100"));
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod handle;
pub mod memory;
pub mod value;

pub use error::SimError;
pub use handle::{AssignmentResult, Entity, SignalHandle};
pub use memory::{MemEntity, MemHandle, MEM_SIMULATOR};
pub use value::{SimSignalState, SimValue};
