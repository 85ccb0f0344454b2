//! FILENAME: render-engine/src/spreadsheet.rs
//! Spreadsheet backend.
//!
//! Renders the table into a positioned sheet document: every model cell
//! becomes a typed sheet cell anchored at its expanded grid position,
//! with merge extents carried as spans. Positions are resolved with the
//! same occupancy walk the table validator uses, so a table that
//! validated always lays out without collisions.

use serde::{Deserialize, Serialize};
use pivot_engine::table::{Cell, Table};
use result_model::{LabelWrapper, MemberWrapper, ValueWrapper};
use value_format::{CellDataType, FormatterChain};
use crate::renderer::{RenderBackend, SectionKind};

// ============================================================================
// DOCUMENT TYPES
// ============================================================================

/// One positioned, typed cell of the output sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SheetCell {
    /// Zero-based grid position.
    pub row: u32,
    pub col: u32,

    pub content: String,
    pub data_type: CellDataType,

    /// Number format code; None = General.
    pub format_code: Option<String>,

    /// Merge extent, 1 = unmerged.
    pub row_span: u16,
    pub col_span: u16,
}

/// A complete sheet ready for a writer layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SheetDocument {
    pub name: String,
    pub cells: Vec<SheetCell>,

    /// Suggested width per column, in characters.
    pub column_widths: Vec<f64>,

    /// Filter range over the used area (A1 notation), when the sheet has
    /// a header row to filter on.
    pub auto_filter: Option<String>,
}

/// A1-style reference for a zero-based (row, col) position.
fn cell_reference(row: u32, col: u32) -> String {
    let mut letters = String::new();
    let mut c = col;
    loop {
        letters.insert(0, (b'A' + (c % 26) as u8) as char);
        if c < 26 {
            break;
        }
        c = c / 26 - 1;
    }
    format!("{}{}", letters, row + 1)
}

// ============================================================================
// BACKEND
// ============================================================================

/// Accumulates sheet cells during one render.
pub struct SpreadsheetBackend {
    chain: FormatterChain,
    sheet_name: String,
    cells: Vec<SheetCell>,

    /// Occupancy per column: rows still covered by an earlier row_span.
    pending: Vec<u16>,
    row: u32,
    col: usize,
    has_header: bool,
}

impl SpreadsheetBackend {
    pub fn new(chain: FormatterChain, sheet_name: impl Into<String>) -> Self {
        SpreadsheetBackend {
            chain,
            sheet_name: sheet_name.into(),
            cells: Vec::new(),
            pending: Vec::new(),
            row: 0,
            col: 0,
            has_header: false,
        }
    }

    /// Places one cell at the next free grid position.
    fn place(&mut self, cell: &Cell, content: String, data_type: CellDataType, format_code: Option<String>) {
        while self.col < self.pending.len() && self.pending[self.col] > 0 {
            self.col += 1;
        }
        let span = cell.col_span as usize;
        for c in self.col..(self.col + span).min(self.pending.len()) {
            self.pending[c] = cell.row_span;
        }
        self.cells.push(SheetCell {
            row: self.row,
            col: self.col as u32,
            content,
            data_type,
            format_code,
            row_span: cell.row_span,
            col_span: cell.col_span,
        });
        self.col += span;
    }
}

impl Default for SpreadsheetBackend {
    fn default() -> Self {
        SpreadsheetBackend::new(FormatterChain::standard(), "Pivot")
    }
}

impl RenderBackend for SpreadsheetBackend {
    type Output = SheetDocument;

    fn begin_table(&mut self, table: &Table) {
        self.pending = vec![0; table.total_cols()];
    }

    fn begin_section(&mut self, kind: SectionKind) {
        if kind == SectionKind::Header {
            self.has_header = true;
        }
    }

    fn begin_row(&mut self) {
        self.col = 0;
    }

    fn label_cell(&mut self, cell: &Cell, label: &LabelWrapper) {
        self.place(cell, label.text.clone(), CellDataType::Text, None);
    }

    fn member_cell(&mut self, cell: &Cell, member: &MemberWrapper) {
        let formatted = self.chain.to_cell(&member.member);
        self.place(cell, formatted.content, formatted.data_type, formatted.format_code);
    }

    fn value_cell(&mut self, cell: &Cell, value: &ValueWrapper) {
        let formatted = self.chain.to_cell(&value.value);
        // A unit becomes part of the number format, not the content.
        let format_code = match (&value.unit, formatted.format_code) {
            (Some(unit), _) => Some(format!("#,##0.00 \"{}\"", unit)),
            (None, code) => code,
        };
        self.place(cell, formatted.content, formatted.data_type, format_code);
    }

    fn end_row(&mut self) {
        for p in self.pending.iter_mut() {
            if *p > 0 {
                *p -= 1;
            }
        }
        self.row += 1;
    }

    fn end_section(&mut self, _kind: SectionKind) {}

    fn finish(self, table: &Table) -> SheetDocument {
        let total_cols = table.total_cols();

        // Width per column from the widest content anchored there.
        let mut column_widths = vec![8.0_f64; total_cols];
        for cell in &self.cells {
            if cell.col_span == 1 {
                let width = (cell.content.chars().count() as f64 + 2.0).min(50.0);
                let col = cell.col as usize;
                if col < total_cols && width > column_widths[col] {
                    column_widths[col] = width;
                }
            }
        }

        let auto_filter = if self.has_header && self.row > 0 && total_cols > 0 {
            Some(format!(
                "A1:{}",
                cell_reference(self.row - 1, total_cols as u32 - 1)
            ))
        } else {
            None
        };

        SheetDocument {
            name: self.sheet_name,
            cells: self.cells,
            column_widths,
            auto_filter,
        }
    }
}
