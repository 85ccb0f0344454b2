//! FILENAME: chart-engine/src/lib.rs
//! Chart projection over the aggregate result tree.
//!
//! Projects a one- or two-dimensional result into a renderer-neutral
//! chart description: x-axis labels, one or more datasets, and a stable
//! color per dataset. The projection never invents data; a result that
//! cannot be charted is rejected, never drawn wrong.
//!
//! Layers:
//! - `chart`: The output types and chart-level errors
//! - `builder`: The projection from tree to chart
//! - `color`: Deterministic dataset color assignment

pub mod builder;
pub mod chart;
pub mod color;

pub use builder::{build_chart, ChartBuilder};
pub use chart::{Chart, ChartError, ChartKind, Dataset};
pub use color::{Color, ColorDispenser};
