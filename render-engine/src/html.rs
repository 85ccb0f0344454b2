//! FILENAME: render-engine/src/html.rs
//! HTML table backend.
//!
//! Produces a `<table>` fragment: `thead`/`tbody`/`tfoot` per section,
//! `th` for header cells, `td` for data and footer cells, with
//! rowspan/colspan attributes mirroring the model's spans. All content
//! goes through the formatter chain's HTML conversion, so it is escaped.

use pivot_engine::table::{Cell, CellKind, Table};
use result_model::{LabelWrapper, MemberWrapper, ValueWrapper};
use value_format::{escape_html, FormatterChain};
use crate::renderer::{RenderBackend, SectionKind};

pub struct HtmlBackend {
    chain: FormatterChain,
    out: String,
}

impl HtmlBackend {
    pub fn new(chain: FormatterChain) -> Self {
        HtmlBackend {
            chain,
            out: String::new(),
        }
    }

    fn open_cell(&mut self, cell: &Cell, class: &str) {
        let tag = match cell.kind {
            CellKind::Header => "th",
            CellKind::Data | CellKind::Footer => "td",
        };
        self.out.push('<');
        self.out.push_str(tag);
        self.out.push_str(" class=\"");
        self.out.push_str(class);
        self.out.push('"');
        if cell.row_span > 1 {
            self.out.push_str(&format!(" rowspan=\"{}\"", cell.row_span));
        }
        if cell.col_span > 1 {
            self.out.push_str(&format!(" colspan=\"{}\"", cell.col_span));
        }
        self.out.push('>');
    }

    fn close_cell(&mut self, cell: &Cell) {
        self.out.push_str(match cell.kind {
            CellKind::Header => "</th>",
            CellKind::Data | CellKind::Footer => "</td>",
        });
    }
}

impl Default for HtmlBackend {
    fn default() -> Self {
        HtmlBackend::new(FormatterChain::standard())
    }
}

impl RenderBackend for HtmlBackend {
    type Output = String;

    fn begin_table(&mut self, _table: &Table) {
        self.out.push_str("<table class=\"pivot-table\">");
    }

    fn begin_section(&mut self, kind: SectionKind) {
        self.out.push_str(match kind {
            SectionKind::Header => "<thead>",
            SectionKind::Body => "<tbody>",
            SectionKind::Footer => "<tfoot>",
        });
    }

    fn begin_row(&mut self) {
        self.out.push_str("<tr>");
    }

    fn label_cell(&mut self, cell: &Cell, label: &LabelWrapper) {
        self.open_cell(cell, "label");
        let escaped = escape_html(&label.text);
        self.out.push_str(&escaped);
        self.close_cell(cell);
    }

    fn member_cell(&mut self, cell: &Cell, member: &MemberWrapper) {
        self.open_cell(cell, "member");
        let html = self.chain.to_html(&member.member);
        self.out.push_str(&html);
        self.close_cell(cell);
    }

    fn value_cell(&mut self, cell: &Cell, value: &ValueWrapper) {
        self.open_cell(cell, "value");
        let html = self.chain.to_html(&value.value);
        self.out.push_str(&html);
        if let Some(unit) = &value.unit {
            self.out.push(' ');
            let escaped = escape_html(unit);
            self.out.push_str(&escaped);
        }
        self.close_cell(cell);
    }

    fn end_row(&mut self) {
        self.out.push_str("</tr>");
    }

    fn end_section(&mut self, kind: SectionKind) {
        self.out.push_str(match kind {
            SectionKind::Header => "</thead>",
            SectionKind::Body => "</tbody>",
            SectionKind::Footer => "</tfoot>",
        });
    }

    fn finish(mut self, _table: &Table) -> String {
        self.out.push_str("</table>");
        self.out
    }
}
