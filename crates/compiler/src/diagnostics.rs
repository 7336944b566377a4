// Copyright (C) 2025 Ryan Daum <ryan.daum@gmail.com> This program is free
// software: you can redistribute it and/or modify it under the terms of the GNU
// General Public License as published by the Free Software Foundation, version
// 3.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.
//

//! Helpers to turn [`SyntaxError`]s into user-facing diagnostics.

use std::{
    io::{self, Write},
    ops::Range,
};

use ariadne::{CharSet, Config, Label, Report, ReportKind, Source};
use bolt_common::{SyntaxError, SyntaxErrorKind};
use itertools::Itertools;

/// Verbosity levels for rendering diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticVerbosity {
    /// Single-line summary only.
    Summary,
    /// Summary with source context showing error location.
    SourceContext,
    /// Source context plus textual notes (expected tokens, hints).
    Detailed,
}

/// Rendering options for syntax error diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiagnosticRenderOptions {
    pub verbosity: DiagnosticVerbosity,
    pub use_graphics: bool,
    pub use_color: bool,
}

impl Default for DiagnosticRenderOptions {
    fn default() -> Self {
        Self {
            verbosity: DiagnosticVerbosity::Summary,
            use_graphics: false,
            use_color: false,
        }
    }
}

/// Emit a syntax error directly to stderr, with the offending range highlighted.
pub fn emit_syntax_error(error: &SyntaxError, source: &str, source_name: &str, use_color: bool) {
    let span = clamp(error.span.range(), source.len());
    let report = Report::build(ReportKind::Error, source_name, span.start)
        .with_config(
            Config::default()
                .with_color(use_color)
                .with_char_set(CharSet::Unicode),
        )
        .with_message(error.to_string())
        .with_label(Label::new((source_name, span)).with_message("parser stopped here"))
        .finish();

    let mut stderr = io::stderr().lock();
    let _ = report.write((source_name, Source::from(source)), &mut stderr);

    let help = help_lines(error);
    if !help.is_empty() {
        let _ = writeln!(&mut stderr);
        for line in help {
            let _ = writeln!(&mut stderr, "{line}");
        }
    }
    let _ = stderr.flush();
}

/// Render a syntax error into lines of text according to `options`.
pub fn format_syntax_error(
    error: &SyntaxError,
    source: Option<&str>,
    options: DiagnosticRenderOptions,
) -> Vec<String> {
    let location = error.location();
    let summary = format!(
        "Failure to parse program @ {}/{}: {}",
        location.lineno, location.colno, error
    );
    let mut lines = vec![summary];

    if options.verbosity == DiagnosticVerbosity::Summary {
        return lines;
    }

    if let Some(text) = source {
        if options.use_graphics {
            let span = clamp(error.span.range(), text.len());
            lines.push(render_report(text, &error.to_string(), span, options.use_color));
        } else {
            lines.extend(render_plain_context(text, error));
        }
    }

    if options.verbosity == DiagnosticVerbosity::Detailed {
        lines.extend(help_lines(error));
    }
    lines
}

fn help_lines(error: &SyntaxError) -> Vec<String> {
    let mut lines = vec![];
    let expected = match &error.kind {
        SyntaxErrorKind::UnexpectedToken { expected, .. }
        | SyntaxErrorKind::UnexpectedEof { expected } => expected.as_slice(),
        _ => &[],
    };
    let quoted = expected
        .iter()
        .unique()
        .map(|token| format!("`{token}`"))
        .collect_vec();
    match quoted.len() {
        0 => {}
        1 => lines.push(format!("help: expected token {}", quoted[0])),
        _ => lines.push(format!("help: expected one of {}", format_list(&quoted))),
    }
    for note in error.notes.iter().unique() {
        lines.push(format!("help: {note}"));
    }
    lines
}

fn render_plain_context(text: &str, error: &SyntaxError) -> Vec<String> {
    let location = error.location();
    let Some(line) = text.lines().nth(location.lineno.saturating_sub(1)) else {
        return vec![];
    };
    let trimmed = line.trim_end();

    let mut lines = vec![format!(
        "   line {} column {}:",
        location.lineno, location.colno
    )];

    let start_col = location.colno.saturating_sub(1);
    let marker = " ⚠ ";
    let marked_line = match trimmed.get(..start_col) {
        Some(head) if start_col < trimmed.len() => {
            format!("{}{}{}", head, marker, &trimmed[start_col..])
        }
        _ => format!("{trimmed}{marker}"),
    };

    lines.push(format!("   {marked_line}"));
    lines
}

fn render_report(program_text: &str, summary: &str, span: Range<usize>, use_color: bool) -> String {
    let report = Report::build(ReportKind::Error, (), span.start)
        .with_config(
            Config::default()
                .with_color(use_color)
                .with_char_set(CharSet::Unicode),
        )
        .with_message(summary.to_string())
        .with_label(Label::new(span).with_message("parser stopped here"))
        .finish();

    let mut buffer = Vec::new();
    if report.write(Source::from(program_text), &mut buffer).is_err() {
        return String::new();
    }
    String::from_utf8_lossy(&buffer).into_owned()
}

/// Keep the label inside the source; errors at end of file point one past the last byte.
fn clamp(span: Range<usize>, len: usize) -> Range<usize> {
    let start = span.start.min(len);
    start..span.end.clamp(start, len)
}

fn format_list(values: &[String]) -> String {
    match values {
        [] => String::new(),
        [first] => first.to_string(),
        [first, second] => format!("{first} or {second}"),
        [rest @ .., last] => format!("{}, or {}", rest.join(", "), last),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ParseOptions, parse_source};
    use pretty_assertions::assert_eq;

    fn error_for(source: &str) -> SyntaxError {
        match parse_source(source, &ParseOptions::default()) {
            Ok(node) => panic!("expected a syntax error, got {node:?}"),
            Err(e) => e,
        }
    }

    #[test]
    fn test_summary_only() {
        let err = error_for("say hello\nbreak\n");
        let lines = format_syntax_error(&err, None, DiagnosticRenderOptions::default());
        assert_eq!(
            lines,
            vec!["Failure to parse program @ 2/1: Can only use 'break' in loops.".to_string()]
        );
    }

    #[test]
    fn test_plain_context_marker() {
        let source = "x = 1\nx = y\n";
        let err = error_for(source);
        let lines = format_syntax_error(
            &err,
            Some(source),
            DiagnosticRenderOptions {
                verbosity: DiagnosticVerbosity::SourceContext,
                ..Default::default()
            },
        );
        assert_eq!(
            lines,
            vec![
                "Failure to parse program @ 2/5: Identifier 'y' is not defined.".to_string(),
                "   line 2 column 5:".to_string(),
                "   x =  ⚠ y".to_string(),
            ]
        );
    }

    #[test]
    fn test_detailed_includes_notes() {
        let source = "a = 1\ndef f():\n    a = 2\n    global a\n";
        let err = error_for(source);
        let lines = format_syntax_error(
            &err,
            Some(source),
            DiagnosticRenderOptions {
                verbosity: DiagnosticVerbosity::Detailed,
                ..Default::default()
            },
        );
        assert_eq!(
            lines.first().map(String::as_str),
            Some("Failure to parse program @ 4/12: Can't make local identifier global.")
        );
        assert!(lines.iter().all(|l| !l.starts_with("help: expected")));
    }

    #[test]
    fn test_graphical_report_mentions_label() {
        let source = "return 1\n";
        let err = error_for(source);
        let lines = format_syntax_error(
            &err,
            Some(source),
            DiagnosticRenderOptions {
                verbosity: DiagnosticVerbosity::SourceContext,
                use_graphics: true,
                use_color: false,
            },
        );
        assert_eq!(lines.len(), 2);
        assert!(lines[1].contains("parser stopped here"));
    }

    #[test]
    fn test_expected_tokens_help() {
        let err = SyntaxError::new(SyntaxErrorKind::UnexpectedEof {
            expected: vec!["colon".into(), "brace ')'".into(), "colon".into()],
        });
        assert_eq!(
            help_lines(&err),
            vec!["help: expected one of `colon` or `brace ')'`".to_string()]
        );
    }
}
