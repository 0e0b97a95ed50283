//! Shared value types used across the sigbus workspace.
//!
//! This crate provides 4-state logic values and packed logic vectors, the
//! representation behind every bit-string read from or written to a signal.

#![warn(missing_docs)]

pub mod logic;
pub mod logic_vec;

pub use logic::Logic;
pub use logic_vec::{BinstrError, LogicVec};
