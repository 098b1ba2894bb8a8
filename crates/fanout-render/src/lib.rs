//! Rendering of aggregated user content
//!
//! Two shapes are handled:
//! - a result with a user: profile, posts, per-post comments, and a
//!   trailing note when the result is partial
//! - a result without a user: a single error line
//!
//! Comment lists are never assumed present; a post without one renders an
//! empty list.

#![warn(unreachable_pub)]

mod html;
mod text;

pub use html::{escape, format_html};
pub use text::format_text;

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    /// Indented terminal report
    #[default]
    Text,
    /// HTML fragment
    Html,
}

impl std::str::FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(Format::Text),
            "html" => Ok(Format::Html),
            other => Err(format!("unknown format: {other}")),
        }
    }
}

/// Render `result` in `format`
#[must_use]
pub fn render(result: &fanout_core::AggregationResult, format: Format) -> String {
    match format {
        Format::Text => format_text(result),
        Format::Html => format_html(result),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_parses() {
        assert_eq!("HTML".parse::<Format>(), Ok(Format::Html));
        assert_eq!("text".parse::<Format>(), Ok(Format::Text));
        assert!("pdf".parse::<Format>().is_err());
    }
}
