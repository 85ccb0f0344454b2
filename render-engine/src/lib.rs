//! FILENAME: render-engine/src/lib.rs
//! Rendering over the pivoted table model.
//!
//! A single traversal order, many output formats: the walker in `renderer`
//! drives a `RenderBackend` through the table exactly once per render.
//! Backends:
//! - `html`: an HTML `<table>` fragment with row/col-span attributes
//! - `spreadsheet`: a positioned sheet document with typed cells
//!
//! Rendering never mutates the table; rendering the same table twice
//! through fresh backends produces identical output.

pub mod html;
pub mod renderer;
pub mod spreadsheet;

pub use html::HtmlBackend;
pub use renderer::{render_table, RenderBackend, SectionKind};
pub use spreadsheet::{SheetCell, SheetDocument, SpreadsheetBackend};
