//! Diagnostic formatting for parse failures
//!
//! Provides user-friendly error reports over source text, using ariadne for
//! the formatting. Schema construction errors live in `schema`; this module
//! only covers the textual front-end.

use ariadne::{Color, Label, Report, ReportKind, Source};
use chumsky::prelude::Simple;
use std::fmt;
use std::ops::Range;

use crate::lexer::Token;

/// A lexer or parser failure, with enough structure for a source-anchored
/// report
#[derive(Clone, Debug)]
pub enum ParseError {
    Lex(Vec<Simple<char>>),
    Parse(Vec<Simple<Token>>),
}

impl ParseError {
    /// Render the failure as ariadne reports against the offending source
    pub fn format(&self, source: &str) -> String {
        match self {
            ParseError::Lex(errors) => format_reports(
                source,
                "Lexical error",
                errors.iter().map(|e| (e.span(), describe_char_error(e))),
            ),
            ParseError::Parse(errors) => format_reports(
                source,
                "Parse error",
                errors.iter().map(|e| (e.span(), describe_token_error(e))),
            ),
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::Lex(errors) => write!(f, "{} lexical error(s)", errors.len()),
            ParseError::Parse(errors) => write!(f, "{} parse error(s)", errors.len()),
        }
    }
}

impl std::error::Error for ParseError {}

fn format_reports(
    source: &str,
    message: &str,
    errors: impl Iterator<Item = (Range<usize>, String)>,
) -> String {
    let mut output = Vec::new();

    for (span, label) in errors {
        let report = Report::build(ReportKind::Error, (), span.start)
            .with_message(message)
            .with_label(
                Label::new(span)
                    .with_message(label)
                    .with_color(Color::Red),
            );

        report
            .finish()
            .write(Source::from(source), &mut output)
            .expect("failed to write error report");
    }

    String::from_utf8(output).unwrap_or_else(|_| "error formatting failed".to_string())
}

/// Format a single lexer error into a readable message
fn describe_char_error(error: &Simple<char>) -> String {
    let found = error
        .found()
        .map(|c| format!("'{}'", c))
        .unwrap_or_else(|| "end of input".to_string());

    let expected: Vec<String> = error
        .expected()
        .filter_map(|opt| opt.as_ref())
        .map(|c| format!("'{}'", c))
        .collect();

    if expected.is_empty() {
        format!("unexpected character {}", found)
    } else {
        format!("unexpected {}, expected {}", found, expected.join(" or "))
    }
}

/// Format a single parser error into a readable message
fn describe_token_error(error: &Simple<Token>) -> String {
    use chumsky::error::SimpleReason;

    if let SimpleReason::Custom(msg) = error.reason() {
        return msg.clone();
    }

    let found = error
        .found()
        .map(|t| format!("'{}'", t))
        .unwrap_or_else(|| "end of input".to_string());

    let expected: Vec<String> = error
        .expected()
        .filter_map(|opt| opt.as_ref())
        .map(|t| format!("'{}'", t))
        .collect();

    if expected.is_empty() {
        format!("unexpected token {}", found)
    } else {
        format!(
            "unexpected {}, expected one of: {}",
            found,
            expected.join(", ")
        )
    }
}
