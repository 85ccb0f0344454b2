//! FILENAME: value-format/src/formatters.rs
//! The built-in formatter set.
//!
//! Each formatter handles exactly one value kind and passes on everything
//! else; the chain order decides priority. `DebugFormatter` answers every
//! value for textual contexts and is the mandatory last handler.

use result_model::Value;
use crate::chain::{
    escape_html, CellDataType, FormatContext, Formatted, FormattedCell, ValueFormatter,
};
use crate::number::{add_thousands_separator, format_general};

// ============================================================================
// EMPTY
// ============================================================================

/// Renders empty values as "(blank)". Never answers numeric contexts.
pub struct EmptyFormatter;

impl ValueFormatter for EmptyFormatter {
    fn try_format(&self, value: &Value, context: FormatContext) -> Option<Formatted> {
        if !value.is_empty() {
            return None;
        }
        match context {
            FormatContext::Text => Some(Formatted::Text("(blank)".to_string())),
            FormatContext::Html => Some(Formatted::Html("(blank)".to_string())),
            FormatContext::Cell => Some(Formatted::Cell(FormattedCell::text(""))),
            FormatContext::Number => None,
        }
    }
}

// ============================================================================
// BOOLEAN
// ============================================================================

pub struct BooleanFormatter;

impl ValueFormatter for BooleanFormatter {
    fn try_format(&self, value: &Value, context: FormatContext) -> Option<Formatted> {
        let Value::Boolean(b) = value else {
            return None;
        };
        let text = if *b { "TRUE" } else { "FALSE" };
        match context {
            FormatContext::Text => Some(Formatted::Text(text.to_string())),
            FormatContext::Html => Some(Formatted::Html(text.to_string())),
            FormatContext::Number => None,
            FormatContext::Cell => Some(Formatted::Cell(FormattedCell {
                content: text.to_string(),
                data_type: CellDataType::Boolean,
                format_code: None,
            })),
        }
    }
}

// ============================================================================
// NUMBER
// ============================================================================

/// Formats numbers with a thousands separator for display and carries an
/// optional spreadsheet format code into cell output.
pub struct NumberFormatter {
    pub format_code: Option<String>,
}

impl Default for NumberFormatter {
    fn default() -> Self {
        NumberFormatter { format_code: None }
    }
}

impl NumberFormatter {
    pub fn with_format_code(code: impl Into<String>) -> Self {
        NumberFormatter {
            format_code: Some(code.into()),
        }
    }

    fn display(n: f64) -> String {
        let general = format_general(n);
        // Scientific notation takes no separator.
        if general.contains('e') {
            general
        } else {
            add_thousands_separator(&general)
        }
    }
}

impl ValueFormatter for NumberFormatter {
    fn try_format(&self, value: &Value, context: FormatContext) -> Option<Formatted> {
        let n = value.as_number()?;
        match context {
            FormatContext::Text => Some(Formatted::Text(Self::display(n))),
            FormatContext::Html => Some(Formatted::Html(Self::display(n))),
            FormatContext::Number => Some(Formatted::Number(n)),
            FormatContext::Cell => Some(Formatted::Cell(FormattedCell {
                content: Self::display(n),
                data_type: CellDataType::Number,
                format_code: self.format_code.clone(),
            })),
        }
    }
}

// ============================================================================
// TEXT
// ============================================================================

pub struct TextFormatter;

impl ValueFormatter for TextFormatter {
    fn try_format(&self, value: &Value, context: FormatContext) -> Option<Formatted> {
        let Value::Text(s) = value else {
            return None;
        };
        match context {
            FormatContext::Text => Some(Formatted::Text(s.clone())),
            FormatContext::Html => Some(Formatted::Html(escape_html(s))),
            FormatContext::Number => None,
            FormatContext::Cell => Some(Formatted::Cell(FormattedCell::text(s.clone()))),
        }
    }
}

// ============================================================================
// DEBUG FALLBACK
// ============================================================================

/// Last-resort handler: a debug-type string for any value. Guarantees that
/// text, HTML, and cell conversion never fail. Numeric contexts stay
/// unanswered so a miss surfaces as an error instead of a silent zero.
pub struct DebugFormatter;

impl ValueFormatter for DebugFormatter {
    fn try_format(&self, value: &Value, context: FormatContext) -> Option<Formatted> {
        match context {
            FormatContext::Text => Some(Formatted::Text(format!("{:?}", value))),
            FormatContext::Html => Some(Formatted::Html(escape_html(&format!("{:?}", value)))),
            FormatContext::Cell => Some(Formatted::Cell(FormattedCell::text(format!(
                "{:?}",
                value
            )))),
            FormatContext::Number => None,
        }
    }
}
