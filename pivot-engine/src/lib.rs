//! FILENAME: pivot-engine/src/lib.rs
//! Pivot construction engine.
//!
//! Re-projects the N-dimensional result tree onto a 2-D grid given an
//! assignment of dimensions to the row and column axes. Depends on
//! `result-model` for the tree and the wrapper factory; rendering is a
//! separate crate that consumes the `Table` produced here.
//!
//! Layers:
//! - `definition`: The pivot request (what the caller ASKS for)
//! - `table`: Format-agnostic grid model (what we PRODUCE)
//! - `engine`: The block-building algorithm (HOW we project)
//! - `error`: Failure taxonomy

pub mod definition;
pub mod engine;
pub mod error;
pub mod table;

pub use definition::*;
pub use engine::{pivot_table, PivotBuilder};
pub use error::PivotError;
pub use table::*;
