//! FILENAME: value-format/src/lib.rs
//! Value formatting for pivot output.
//!
//! Raw values become display strings, HTML fragments, numbers, or typed
//! spreadsheet cells through an ordered first-match-wins chain of
//! formatters with a guaranteed debug fallback.
//!
//! Layers:
//! - `chain`: The chain contract and the four conversion operations
//! - `formatters`: The built-in formatter set
//! - `number`: Numeric display helpers (general format, separators)

pub mod chain;
pub mod formatters;
pub mod number;

pub use chain::*;
pub use formatters::*;
