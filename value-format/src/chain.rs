//! FILENAME: value-format/src/chain.rs
//! The formatter chain.
//!
//! An ordered list of formatters is consulted first-match-wins; the last
//! handler is always a debug fallback, so text, HTML, and cell conversion
//! cannot fail. Numeric conversion has no safe fallback (a silent 0 would
//! corrupt chart data) and surfaces a `FormatError` instead.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use result_model::Value;
use crate::formatters::{
    BooleanFormatter, DebugFormatter, EmptyFormatter, NumberFormatter, TextFormatter,
};

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Error, Debug)]
pub enum FormatError {
    #[error("cannot convert value to a number: {0}")]
    NumberConversion(String),
}

// ============================================================================
// CONVERSION TARGETS
// ============================================================================

/// The conversion a caller is asking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatContext {
    Text,
    Html,
    Number,
    Cell,
}

/// Data type of a formatted spreadsheet cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellDataType {
    Text,
    Number,
    Boolean,
}

/// A typed cell: display content plus spreadsheet metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormattedCell {
    pub content: String,
    pub data_type: CellDataType,

    /// Spreadsheet number format code (e.g. "#,##0.00"); None = General.
    pub format_code: Option<String>,
}

impl FormattedCell {
    pub fn text(content: impl Into<String>) -> Self {
        FormattedCell {
            content: content.into(),
            data_type: CellDataType::Text,
            format_code: None,
        }
    }
}

/// The result of one formatter answering one context.
#[derive(Debug, Clone)]
pub enum Formatted {
    Text(String),
    Html(String),
    Number(f64),
    Cell(FormattedCell),
}

// ============================================================================
// CHAIN
// ============================================================================

/// Capability interface: a formatter may answer a (value, context) pair
/// or pass by returning None.
pub trait ValueFormatter {
    fn try_format(&self, value: &Value, context: FormatContext) -> Option<Formatted>;
}

/// Ordered first-match-wins dispatch over registered formatters.
/// Priority is the explicit registration order, fallback always last.
pub struct FormatterChain {
    handlers: Vec<Box<dyn ValueFormatter>>,
}

impl FormatterChain {
    /// Builds a chain from specific formatters; the debug fallback is
    /// appended automatically.
    pub fn new(mut handlers: Vec<Box<dyn ValueFormatter>>) -> Self {
        handlers.push(Box::new(DebugFormatter));
        FormatterChain { handlers }
    }

    /// The standard chain: empty, boolean, number, text, then fallback.
    pub fn standard() -> Self {
        FormatterChain::new(vec![
            Box::new(EmptyFormatter),
            Box::new(BooleanFormatter),
            Box::new(NumberFormatter::default()),
            Box::new(TextFormatter),
        ])
    }

    fn resolve(&self, value: &Value, context: FormatContext) -> Option<Formatted> {
        for handler in &self.handlers {
            if let Some(formatted) = handler.try_format(value, context) {
                return Some(formatted);
            }
        }
        None
    }

    /// Display string; always succeeds.
    pub fn to_text(&self, value: &Value) -> String {
        match self.resolve(value, FormatContext::Text) {
            Some(Formatted::Text(s)) => s,
            _ => format!("{:?}", value),
        }
    }

    /// HTML fragment (escaped); always succeeds.
    pub fn to_html(&self, value: &Value) -> String {
        match self.resolve(value, FormatContext::Html) {
            Some(Formatted::Html(s)) => s,
            _ => escape_html(&format!("{:?}", value)),
        }
    }

    /// Numeric conversion; errors when no formatter can produce a number.
    pub fn to_number(&self, value: &Value) -> Result<f64, FormatError> {
        match self.resolve(value, FormatContext::Number) {
            Some(Formatted::Number(n)) => Ok(n),
            _ => Err(FormatError::NumberConversion(format!("{:?}", value))),
        }
    }

    /// Typed spreadsheet cell; always succeeds.
    pub fn to_cell(&self, value: &Value) -> FormattedCell {
        match self.resolve(value, FormatContext::Cell) {
            Some(Formatted::Cell(c)) => c,
            _ => FormattedCell::text(format!("{:?}", value)),
        }
    }
}

impl Default for FormatterChain {
    fn default() -> Self {
        FormatterChain::standard()
    }
}

/// Escapes text for inclusion in an HTML fragment.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_conversion_always_succeeds() {
        let chain = FormatterChain::standard();
        assert_eq!(chain.to_text(&Value::number(1234.5)), "1,234.5");
        assert_eq!(chain.to_text(&Value::text("North")), "North");
        assert_eq!(chain.to_text(&Value::Boolean(true)), "TRUE");
        assert_eq!(chain.to_text(&Value::Empty), "(blank)");
    }

    #[test]
    fn test_number_conversion_errors_on_non_numeric() {
        let chain = FormatterChain::standard();
        assert_eq!(chain.to_number(&Value::number(2.5)).unwrap(), 2.5);
        assert!(chain.to_number(&Value::text("North")).is_err());
        assert!(chain.to_number(&Value::Empty).is_err());
    }

    #[test]
    fn test_html_is_escaped() {
        let chain = FormatterChain::standard();
        assert_eq!(chain.to_html(&Value::text("a<b & c")), "a&lt;b &amp; c");
    }

    #[test]
    fn test_cell_conversion() {
        let chain = FormatterChain::standard();

        let cell = chain.to_cell(&Value::number(7.0));
        assert_eq!(cell.data_type, CellDataType::Number);
        assert_eq!(cell.content, "7");

        let cell = chain.to_cell(&Value::text("Q1"));
        assert_eq!(cell.data_type, CellDataType::Text);
    }

    #[test]
    fn test_first_match_wins_order() {
        // A chain with only the text formatter leaves numbers to the
        // debug fallback.
        let chain = FormatterChain::new(vec![Box::new(TextFormatter)]);
        let rendered = chain.to_text(&Value::number(5.0));
        assert!(rendered.contains("Number"), "fallback output: {rendered}");
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("x > 1 \"y\""), "x &gt; 1 &quot;y&quot;");
    }
}
