//! FILENAME: render-engine/src/renderer.rs
//! The render traversal.
//!
//! The table model has a closed set of node kinds, so traversal lives
//! here once and backends only implement the per-kind hooks. The walker
//! visits header, body, footer in order, skipping empty sections, and
//! dispatches each cell by its content variant.

use pivot_engine::table::{Cell, CellContent, Section, Table};
use result_model::{LabelWrapper, MemberWrapper, ValueWrapper};

/// Which part of the table a row belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    Header,
    Body,
    Footer,
}

/// Output-format hooks, called by `render_table` in document order.
///
/// A backend is consumed by one render; state accumulated across hooks
/// becomes the output in `finish`.
pub trait RenderBackend {
    type Output;

    fn begin_table(&mut self, table: &Table);
    fn begin_section(&mut self, kind: SectionKind);
    fn begin_row(&mut self);
    fn label_cell(&mut self, cell: &Cell, label: &LabelWrapper);
    fn member_cell(&mut self, cell: &Cell, member: &MemberWrapper);
    fn value_cell(&mut self, cell: &Cell, value: &ValueWrapper);
    fn end_row(&mut self);
    fn end_section(&mut self, kind: SectionKind);
    fn finish(self, table: &Table) -> Self::Output;
}

/// Drives one backend through one table.
pub fn render_table<B: RenderBackend>(table: &Table, mut backend: B) -> B::Output {
    backend.begin_table(table);

    let sections: [(SectionKind, &Section); 3] = [
        (SectionKind::Header, &table.header),
        (SectionKind::Body, &table.body),
        (SectionKind::Footer, &table.footer),
    ];

    for (kind, section) in sections {
        // Empty sections leave no trace in the output.
        if section.is_empty() {
            continue;
        }
        backend.begin_section(kind);
        for row in &section.rows {
            backend.begin_row();
            for cell in &row.cells {
                match &cell.content {
                    CellContent::Label(label) => backend.label_cell(cell, label),
                    CellContent::Member(member) => backend.member_cell(cell, member),
                    CellContent::Value(value) => backend.value_cell(cell, value),
                }
            }
            backend.end_row();
        }
        backend.end_section(kind);
    }

    backend.finish(table)
}
