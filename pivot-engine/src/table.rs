//! FILENAME: pivot-engine/src/table.rs
//! Table Model - The format-agnostic grid.
//!
//! `Table -> {Header, Body, Footer} -> Row -> Cell`. Cells carry a shared
//! wrapper as content plus row/col-span metadata. The model is built once
//! per pivot request, traversed read-only by a renderer, then discarded.
//!
//! Cell content holds `Rc` wrappers from the pass-scoped `WrapperFactory`,
//! so the model is single-threaded by design (see the concurrency notes
//! in the engine module).

use std::rc::Rc;
use result_model::{LabelWrapper, MemberWrapper, ValueWrapper};
use crate::error::PivotError;

// ============================================================================
// CELLS
// ============================================================================

/// The role of a cell within its section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellKind {
    Header,
    Data,
    Footer,
}

/// Content payload of a cell.
#[derive(Debug, Clone)]
pub enum CellContent {
    /// A dimension or measure label.
    Label(Rc<LabelWrapper>),
    /// A raw dimension member.
    Member(Rc<MemberWrapper>),
    /// A measure value.
    Value(Rc<ValueWrapper>),
}

/// A single grid cell with span metadata.
#[derive(Debug, Clone)]
pub struct Cell {
    pub kind: CellKind,
    pub content: CellContent,
    pub row_span: u16,
    pub col_span: u16,
}

impl Cell {
    pub fn header(content: CellContent) -> Self {
        Cell {
            kind: CellKind::Header,
            content,
            row_span: 1,
            col_span: 1,
        }
    }

    pub fn data(content: CellContent) -> Self {
        Cell {
            kind: CellKind::Data,
            content,
            row_span: 1,
            col_span: 1,
        }
    }

    pub fn footer(content: CellContent) -> Self {
        Cell {
            kind: CellKind::Footer,
            content,
            row_span: 1,
            col_span: 1,
        }
    }

    pub fn with_row_span(mut self, span: u16) -> Self {
        self.row_span = span.max(1);
        self
    }

    pub fn with_col_span(mut self, span: u16) -> Self {
        self.col_span = span.max(1);
        self
    }
}

// ============================================================================
// ROWS AND SECTIONS
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct Row {
    pub cells: Vec<Cell>,
}

impl Row {
    pub fn new() -> Self {
        Row::default()
    }

    pub fn push(&mut self, cell: Cell) {
        self.cells.push(cell);
    }
}

#[derive(Debug, Clone, Default)]
pub struct Section {
    pub rows: Vec<Row>,
}

impl Section {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ============================================================================
// TABLE
// ============================================================================

/// The complete pivoted grid.
#[derive(Debug, Clone)]
pub struct Table {
    pub header: Section,
    pub body: Section,
    pub footer: Section,

    /// Leading columns occupied by row-axis member cells.
    pub row_label_cols: usize,

    /// Data columns (distinct column-path count).
    pub leaf_cols: usize,
}

impl Table {
    /// Assembles a table and checks the span-tiling invariant: once spans
    /// are expanded, every row of every section covers exactly the
    /// table's column count.
    pub fn new(
        header: Section,
        body: Section,
        footer: Section,
        row_label_cols: usize,
        leaf_cols: usize,
    ) -> Result<Self, PivotError> {
        let table = Table {
            header,
            body,
            footer,
            row_label_cols,
            leaf_cols,
        };
        table.validate()?;
        Ok(table)
    }

    pub fn total_cols(&self) -> usize {
        self.row_label_cols + self.leaf_cols
    }

    /// Checks that each section tiles the grid exactly.
    pub fn validate(&self) -> Result<(), PivotError> {
        validate_section(&self.header, self.total_cols(), "header")?;
        validate_section(&self.body, self.total_cols(), "body")?;
        validate_section(&self.footer, self.total_cols(), "footer")?;
        Ok(())
    }
}

/// Expands spans row by row and verifies each grid row of the section is
/// covered exactly once across the declared column count.
fn validate_section(section: &Section, total_cols: usize, name: &str) -> Result<(), PivotError> {
    // pending[c] = how many rows (including the current one) column c is
    // still occupied by an earlier cell's row_span. Decremented once per
    // processed row.
    let mut pending: Vec<u16> = vec![0; total_cols];

    for (row_idx, row) in section.rows.iter().enumerate() {
        let mut col = 0usize;
        for cell in &row.cells {
            // Skip columns still covered from above.
            while col < total_cols && pending[col] > 0 {
                col += 1;
            }
            let span = cell.col_span as usize;
            if col + span > total_cols {
                return Err(PivotError::UnsupportedData(format!(
                    "{} row {} overflows the column layout ({} columns)",
                    name, row_idx, total_cols
                )));
            }
            for c in col..col + span {
                if pending[c] > 0 {
                    return Err(PivotError::UnsupportedData(format!(
                        "{} row {} overlaps a spanned cell at column {}",
                        name, row_idx, c
                    )));
                }
                pending[c] = cell.row_span;
            }
            col += span;
        }
        // The remainder of the grid row must be covered from above.
        while col < total_cols {
            if pending[col] == 0 {
                return Err(PivotError::UnsupportedData(format!(
                    "{} row {} leaves column {} uncovered",
                    name, row_idx, col
                )));
            }
            col += 1;
        }
        for p in pending.iter_mut() {
            if *p > 0 {
                *p -= 1;
            }
        }
    }

    // No cell may span past the section's last row.
    if pending.iter().any(|&p| p > 0) {
        return Err(PivotError::UnsupportedData(format!(
            "{} section has a row span past its last row",
            name
        )));
    }

    Ok(())
}
