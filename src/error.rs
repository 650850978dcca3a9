//! Error types for parsing and compiling declarations

use ariadne::{Color, Config, IndexType, Label, Report, ReportKind, Source};
use chumsky::error::{Rich, RichPattern, RichReason};
use thiserror::Error;

use crate::builder::BuildError;
use crate::template::lexer::Token;

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

/// A declaration that does not have the `{{Name|...}}` shape
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("syntax error at {span:?} near \"{fragment}\": {message}")]
pub struct SyntaxError {
    /// Offending byte range
    pub span: Span,
    /// Source text under `span`
    pub fragment: String,
    pub message: String,
    pub expected: Vec<String>,
}

impl SyntaxError {
    pub fn new(source: &str, span: Span, message: impl Into<String>) -> Self {
        let fragment = source.get(span.clone()).unwrap_or_default().to_string();
        Self {
            span,
            fragment,
            message: message.into(),
            expected: Vec::new(),
        }
    }

    pub fn with_expected(mut self, expected: Vec<String>) -> Self {
        self.expected = expected;
        self
    }

    /// Build from a chumsky error, looking up the offending text in `source`
    pub(crate) fn from_rich(err: Rich<'_, Token>, source: &str) -> Self {
        let message = match err.reason() {
            RichReason::ExpectedFound { .. } => match err.found() {
                Some(Token::Open) => "nested templates are not supported".to_string(),
                Some(Token::LoneOpen) | Some(Token::LoneClose) => "unmatched brace".to_string(),
                Some(tok) => format!("unexpected {}", tok.describe()),
                None => "unexpected end of input".to_string(),
            },
            RichReason::Custom(msg) => msg.to_string(),
            #[allow(unreachable_patterns)]
            _ => "malformed declaration".to_string(),
        };

        let expected: Vec<String> = err
            .expected()
            .filter_map(|e| match e {
                RichPattern::Token(tok) => Some(tok.describe()),
                RichPattern::Label(label) => Some(label.to_string()),
                RichPattern::EndOfInput => Some("end of input".to_string()),
                _ => None,
            })
            .collect();

        let span = err.span().into_range();
        Self::new(source, span, message).with_expected(expected)
    }

    /// Format the error with source context using ariadne
    pub fn report(&self, source: &str, origin: &str) -> String {
        let expected_str = if self.expected.is_empty() {
            String::new()
        } else {
            format!("\nExpected: {}", self.expected.join(", "))
        };

        let mut buf = Vec::new();
        // spans are byte offsets into `source`
        let written = Report::build(ReportKind::Error, origin, self.span.start)
            .with_config(Config::default().with_index_type(IndexType::Byte))
            .with_message(&self.message)
            .with_label(
                Label::new((origin, self.span.clone()))
                    .with_message(format!("{}{}", self.message, expected_str))
                    .with_color(Color::Red),
            )
            .finish()
            .write((origin, Source::from(source)), &mut buf);

        match written {
            Ok(()) => String::from_utf8_lossy(&buf).into_owned(),
            Err(_) => self.to_string(),
        }
    }
}

/// Per-declaration failure of the parse + build pipeline
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    #[error(transparent)]
    Build(#[from] BuildError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fragment_taken_from_source() {
        let err = SyntaxError::new("{{A|=x}}", 4..5, "empty key");
        assert_eq!(err.fragment, "=");
    }

    #[test]
    fn test_out_of_range_span_has_empty_fragment() {
        let err = SyntaxError::new("{{A", 3..3, "missing '}}'");
        assert_eq!(err.fragment, "");
    }

    #[test]
    fn test_report_locates_byte_spans_after_non_ascii() {
        let source = "{{ï|=x}}";
        let span = source.find('=').unwrap()..source.find('=').unwrap() + 2;
        let err = SyntaxError::new(source, span, "parameter with an empty key");
        assert_eq!(err.fragment, "=x");
        // column 5 counts characters: `{{ï|` precedes the `=`
        let report = err.report(source, "P30");
        assert!(report.contains("P30:1:5"), "{}", report);
    }

    #[test]
    fn test_report_mentions_message_and_origin() {
        let source = "{{A|=x}}";
        let err = SyntaxError::new(source, 4..5, "parameter with an empty key")
            .with_expected(vec!["text".to_string()]);
        let report = err.report(source, "P30");
        assert!(report.contains("parameter with an empty key"));
        assert!(report.contains("P30"));
        assert!(report.contains("Expected: text"));
    }
}
