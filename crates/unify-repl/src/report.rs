//! Render parse errors as ariadne reports on stderr

use anyhow::{anyhow, Result};
use ariadne::{Color, Label, Report, ReportKind, Source};
use datalog_parser::{ParseError, SrcId};

/// Print every error against `text`, then fail with a one-line summary
pub fn parse_or_report<T>(result: Result<T, Vec<ParseError>>, src: SrcId, text: &str) -> Result<T> {
    let errors = match result {
        Ok(value) => return Ok(value),
        Err(errors) => errors,
    };

    for error in &errors {
        let kind = match error {
            ParseError::Lex(_) => "lex error",
            ParseError::Parse(_) => "syntax error",
        };
        let span = error.span();
        Report::build(ReportKind::Error, src, span.start())
            .with_message(kind)
            .with_label(
                Label::new(span)
                    .with_message(error.to_string())
                    .with_color(Color::Red),
            )
            .finish()
            .eprint((src, Source::from(text)))?;
    }

    Err(anyhow!("{} error(s) while parsing {}", errors.len(), src))
}
