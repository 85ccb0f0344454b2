//! FILENAME: chart-engine/src/chart.rs
//! Chart output types.
//!
//! A `Chart` is renderer-neutral: labels, datasets, and axis titles,
//! ready for any drawing layer. The kind stored on a built chart is
//! always concrete; `Auto` exists only as caller input.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use value_format::FormatError;
use crate::color::Color;

/// Requested chart shape. `Auto` resolves from the result's dimension
/// count at build time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChartKind {
    Auto,
    Bar,
    GroupedBar,
    StackedBar,
}

/// One series of y-values, aligned with the chart's label list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub label: String,
    pub data: Vec<f64>,
    pub color: Color,
}

/// A complete chart description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chart {
    /// Concrete kind; never `Auto`.
    pub kind: ChartKind,

    /// X-axis category labels, in result order.
    pub labels: Vec<String>,

    /// Every dataset has exactly `labels.len()` values.
    pub datasets: Vec<Dataset>,

    pub x_title: String,
    pub y_title: String,
}

/// Failures of one chart build. A result that cannot be charted is
/// rejected whole; no partial chart is ever produced.
#[derive(Error, Debug)]
pub enum ChartError {
    /// The result's shape does not fit the requested chart
    /// (no data, no numeric measure, too many dimensions).
    #[error("unsupported data: {0}")]
    UnsupportedData(String),

    /// A measure value could not be converted to a number.
    #[error(transparent)]
    Format(#[from] FormatError),
}
