//! Parsing and validation of `buses.toml` bus definitions.
//!
//! A harness describes its buses once in TOML and resolves each definition
//! into a [`ResolvedBus`], with `[defaults]` merged into every bus.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod resolve;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_buses, load_buses_from_str, BUSES_FILE};
pub use resolve::{resolve_all, resolve_bus, ResolvedBus};
pub use types::*;
