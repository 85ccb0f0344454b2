//! FILENAME: result-model/src/lib.rs
//! Shared result-tree model for the pivot subsystem.
//!
//! This crate is the read-only view over an already-computed aggregate
//! result. The aggregation layer (query execution) is out of scope; it
//! hands us a finished tree and we expose it to the pivot, render, and
//! chart engines.
//!
//! Layers:
//! - `value`: Raw dimension/measure values (what a cell HOLDS)
//! - `tree`: The hierarchical result, one nesting level per dimension
//! - `wrapper`: Pass-scoped memoized wrappers for labels/members/values

pub mod value;
pub mod tree;
pub mod wrapper;

pub use value::*;
pub use tree::*;
pub use wrapper::*;
