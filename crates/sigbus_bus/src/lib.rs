//! Signal buses for HDL test harnesses.
//!
//! A [`Bus`] groups related signals of one design entity, such as the
//! `valid`/`ready`/`data` wires of a stream interface, so a harness can
//! drive, sample, and capture them as a unit. The bus only resolves names
//! and reads or writes handles; timing and scheduling belong to the
//! simulator behind [`sigbus_sim::Entity`].
//!
//! # Usage
//!
//! ```
//! use sigbus_bus::{Bus, BusOptions, Transaction};
//! use sigbus_config::SignalSet;
//! use sigbus_sim::{MemEntity, SimValue};
//!
//! let mut dut = MemEntity::new("dut");
//! dut.add_logic("stream_in_valid", 1);
//! dut.add_logic("stream_in_data", 8);
//!
//! let bus = Bus::new(
//!     &dut,
//!     Some("stream_in"),
//!     ["valid", "data"],
//!     SignalSet::default(),
//!     BusOptions::default(),
//! )?;
//! bus.drive(&Transaction::new("Beat").with("valid", true).with("data", 0x42i64), true)?;
//! assert_eq!(bus.capture().get("data")?.to_u64(), Some(0x42));
//! # Ok::<(), sigbus_bus::BusError>(())
//! ```
//!
//! # Modules
//!
//! - `bus` — Bus construction and the drive/sample/capture/assign operations
//! - `resolve` — Case-insensitive signal name resolution
//! - `record` — The `BusRecord` trait and the `Transaction` record
//! - `capture` — Read-only value snapshots
//! - `error` — Bus error types

#![warn(missing_docs)]

pub mod bus;
pub mod capture;
pub mod error;
pub mod record;
pub mod resolve;

pub use bus::{Bus, BusOptions};
pub use capture::Capture;
pub use error::{BusAction, BusError};
pub use record::{BusRecord, Transaction};
pub use resolve::{
    probe_case_variants, resolve_case_insensitive, scan_case_folded, MatchKind, Resolved,
};
