//! Error types for the signal-handle layer.
//!
//! Every failed read, write, or index operation on a handle is reported as a
//! variant of [`SimError`].

use sigbus_common::BinstrError;

/// Errors raised by signal handles and entities.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    /// An array element index was past the end of the array.
    #[error("index {index} out of range for '{signal}' with {len} elements")]
    IndexOutOfRange {
        /// The array signal name.
        signal: String,
        /// The requested element.
        index: usize,
        /// Number of elements in the array.
        len: usize,
    },

    /// Indexing was attempted on a scalar signal.
    #[error("signal '{signal}' is not an array")]
    NotAnArray {
        /// The scalar signal name.
        signal: String,
    },

    /// A logic vector of the wrong width was written.
    #[error("width mismatch on '{signal}': expected {expected} bits, got {actual}")]
    WidthMismatch {
        /// The target signal name.
        signal: String,
        /// The signal's width.
        expected: u32,
        /// The width of the written value.
        actual: u32,
    },

    /// An array write supplied the wrong number of elements.
    #[error("length mismatch on '{signal}': expected {expected} elements, got {actual}")]
    LengthMismatch {
        /// The array signal name.
        signal: String,
        /// Number of elements in the array.
        expected: usize,
        /// Number of elements written.
        actual: usize,
    },

    /// An integer does not fit the signal's width.
    #[error("value {value} does not fit in {width} bits of '{signal}'")]
    ValueOverflow {
        /// The target signal name.
        signal: String,
        /// The rejected value.
        value: i64,
        /// The signal's width.
        width: u32,
    },

    /// A value of an incompatible kind was written.
    #[error("cannot write {found} value to {expected} signal '{signal}'")]
    TypeMismatch {
        /// The target signal name.
        signal: String,
        /// The kind of value the signal holds.
        expected: &'static str,
        /// The kind of value that was written.
        found: &'static str,
    },

    /// A bit-string could not be parsed.
    #[error(transparent)]
    InvalidBinstr(#[from] BinstrError),
}
