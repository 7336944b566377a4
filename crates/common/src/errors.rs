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

//! The error model shared by the token stream and every parser built on top of it.

use crate::location::{SourceLocation, Span};
use crate::suggest::did_you_mean;
use crate::tokenstream::Token;
use std::collections::BTreeSet;
use thiserror::Error;

pub type ParseResult<T> = Result<T, SyntaxError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyntaxErrorKind {
    #[error("{0}")]
    Invalid(String),
    #[error("Expected {} but got {token}.", describe_expected(.expected))]
    UnexpectedToken { token: Token, expected: Vec<String> },
    #[error("Expected {} but reached end of file.", describe_expected(.expected))]
    UnexpectedEof { expected: Vec<String> },
    #[error("Identifier '{name}' is not defined.{}", did_you_mean(.name, .identifiers))]
    UndefinedIdentifier {
        name: String,
        identifiers: BTreeSet<String>,
    },
    #[error("Invalid pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },
}

fn describe_expected(expected: &[String]) -> String {
    match expected {
        [] => "something else".to_string(),
        [single] => single.clone(),
        [head @ .., last] => format!("{} or {}", head.join(", "), last),
    }
}

/// A syntax error with the range it applies to.
///
/// `notes` carry hints rendered after the message. `alternatives` holds the failures of the
/// other branches that were tried when the error came out of a choice between alternatives;
/// handlers use them to pick a more helpful error after the fact.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}")]
pub struct SyntaxError {
    pub kind: SyntaxErrorKind,
    pub span: Span,
    pub notes: Vec<String>,
    pub alternatives: Vec<SyntaxError>,
}

impl SyntaxError {
    pub fn new(kind: SyntaxErrorKind) -> Self {
        Self {
            kind,
            span: Span::default(),
            notes: vec![],
            alternatives: vec![],
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self::new(SyntaxErrorKind::Invalid(message.into()))
    }

    pub fn undefined_identifier<'a, I>(token: &Token, identifiers: I) -> Self
    where
        I: IntoIterator<Item = &'a String>,
    {
        Self::new(SyntaxErrorKind::UndefinedIdentifier {
            name: token.value.clone(),
            identifiers: identifiers.into_iter().cloned().collect(),
        })
        .at(token.span())
    }

    pub fn unexpected(token: &Token, expected: Vec<String>) -> Self {
        let kind = if token.is_eof() {
            SyntaxErrorKind::UnexpectedEof { expected }
        } else {
            SyntaxErrorKind::UnexpectedToken {
                token: token.clone(),
                expected,
            }
        };
        Self::new(kind).at(token.span())
    }

    pub fn at(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn location(&self) -> SourceLocation {
        self.span.location
    }

    pub fn end_location(&self) -> SourceLocation {
        self.span.end_location
    }

    /// Whether the error only says that the next token wasn't one of the expected ones.
    pub fn is_token_mismatch(&self) -> bool {
        matches!(
            self.kind,
            SyntaxErrorKind::UnexpectedToken { .. } | SyntaxErrorKind::UnexpectedEof { .. }
        )
    }

    /// Whether this failure is more telling than `other`: it got further, or it stopped at
    /// the same place after recognizing its input where `other` hit an unexpected token.
    pub fn outranks(&self, other: &SyntaxError) -> bool {
        let (pos, other_pos) = (self.location().pos, other.location().pos);
        pos > other_pos
            || (pos == other_pos && other.is_token_mismatch() && !self.is_token_mismatch())
    }

    pub fn is_undefined_identifier(&self) -> bool {
        matches!(self.kind, SyntaxErrorKind::UndefinedIdentifier { .. })
    }

    /// The alternatives that failed because of an undefined identifier.
    pub fn undefined_alternatives(&self) -> impl Iterator<Item = &SyntaxError> {
        self.alternatives
            .iter()
            .filter(|alt| alt.is_undefined_identifier())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::SourceLocation;

    fn token(kind: &'static str, value: &str) -> Token {
        Token {
            kind,
            value: value.to_string(),
            location: SourceLocation::new(4, 1, 5),
            end_location: SourceLocation::new(4 + value.len(), 1, 5 + value.len()),
        }
    }

    #[test]
    fn test_undefined_identifier_message() {
        let names: Vec<String> = vec!["foo".into(), "food".into(), "bar".into()];
        let err = SyntaxError::undefined_identifier(&token("identifier", "fooo"), &names);
        assert_eq!(
            err.to_string(),
            "Identifier 'fooo' is not defined. Did you mean 'foo' or 'food'?"
        );
        assert_eq!(err.location().pos, 4);

        let err = SyntaxError::undefined_identifier(&token("identifier", "x"), &names);
        assert_eq!(err.to_string(), "Identifier 'x' is not defined.");
    }

    #[test]
    fn test_unexpected_messages() {
        let err = SyntaxError::unexpected(
            &token("number", "1"),
            vec!["identifier".into(), "brace ')'".into()],
        );
        assert_eq!(err.to_string(), "Expected identifier or brace ')' but got number '1'.");

        let err = SyntaxError::unexpected(&token("eof", ""), vec!["colon".into()]);
        assert_eq!(err.to_string(), "Expected colon but reached end of file.");
    }
}
