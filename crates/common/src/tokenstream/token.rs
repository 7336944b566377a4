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

use crate::location::{SourceLocation, Span};
use std::fmt::Display;

/// A lexed token: the name of the rule that produced it, the matched text and its range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: &'static str,
    pub value: String,
    pub location: SourceLocation,
    pub end_location: SourceLocation,
}

impl Token {
    pub fn span(&self) -> Span {
        Span::new(self.location, self.end_location)
    }

    pub fn matches(&self, pattern: TokenPattern) -> bool {
        self.kind == pattern.kind && pattern.value.is_none_or(|value| self.value == value)
    }

    pub fn matches_any(&self, patterns: &[TokenPattern]) -> bool {
        patterns.iter().any(|p| self.matches(*p))
    }

    pub fn is_eof(&self) -> bool {
        self.kind == EOF
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            EOF => write!(f, "end of file"),
            NEWLINE => write!(f, "newline"),
            _ => write!(f, "{} '{}'", self.kind, self.value),
        }
    }
}

pub const EOF: &str = "eof";
pub const NEWLINE: &str = "newline";
pub const WHITESPACE: &str = "whitespace";
pub const INVALID: &str = "invalid";

/// What a caller is looking for: a token kind, optionally with an exact value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenPattern<'a> {
    pub kind: &'a str,
    pub value: Option<&'a str>,
}

impl<'a> TokenPattern<'a> {
    pub const fn kind(kind: &'a str) -> Self {
        Self { kind, value: None }
    }

    pub const fn exact(kind: &'a str, value: &'a str) -> Self {
        Self {
            kind,
            value: Some(value),
        }
    }
}

impl<'a> From<&'a str> for TokenPattern<'a> {
    fn from(kind: &'a str) -> Self {
        Self::kind(kind)
    }
}

impl<'a> From<(&'a str, &'a str)> for TokenPattern<'a> {
    fn from((kind, value): (&'a str, &'a str)) -> Self {
        Self::exact(kind, value)
    }
}

impl Display for TokenPattern<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.value {
            Some(value) => write!(f, "{} '{}'", self.kind, value),
            None => write!(f, "{}", self.kind),
        }
    }
}
