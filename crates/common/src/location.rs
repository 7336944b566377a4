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

//! Positions inside a source buffer.

use serde::Serialize;
use std::fmt::Display;

/// A point in the source: byte offset plus 1-based line and column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct SourceLocation {
    pub pos: usize,
    pub lineno: usize,
    pub colno: usize,
}

impl SourceLocation {
    pub fn new(pos: usize, lineno: usize, colno: usize) -> Self {
        Self { pos, lineno, colno }
    }

    /// Shift the location horizontally, staying on the same line.
    pub fn with_horizontal_offset(self, offset: isize) -> Self {
        Self {
            pos: self.pos.saturating_add_signed(offset),
            lineno: self.lineno,
            colno: self.colno.saturating_add_signed(offset),
        }
    }
}

impl Display for SourceLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.lineno, self.colno)
    }
}

/// The range a node or token covers, end exclusive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Span {
    pub location: SourceLocation,
    pub end_location: SourceLocation,
}

impl Span {
    pub fn new(location: SourceLocation, end_location: SourceLocation) -> Self {
        Self {
            location,
            end_location,
        }
    }

    /// Span from the start of `self` to the end of `other`.
    pub fn to(self, other: Span) -> Self {
        Self {
            location: self.location,
            end_location: other.end_location,
        }
    }

    pub fn range(&self) -> std::ops::Range<usize> {
        self.location.pos..self.end_location.pos.max(self.location.pos)
    }
}

/// Shared source text with precomputed line starts so that offsets can be turned into
/// line/column pairs cheaply.
#[derive(Debug)]
pub struct SourceText {
    text: String,
    line_starts: Vec<usize>,
}

impl SourceText {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let line_starts = std::iter::once(0)
            .chain(text.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Self { text, line_starts }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn location(&self, pos: usize) -> SourceLocation {
        let pos = pos.min(self.text.len());
        let line = match self.line_starts.binary_search(&pos) {
            Ok(line) => line,
            Err(line) => line - 1,
        };
        let colno = self.text[self.line_starts[line]..pos].chars().count() + 1;
        SourceLocation::new(pos, line + 1, colno)
    }

    /// The full text of the line containing `pos`, without its terminator.
    pub fn line_at(&self, pos: usize) -> &str {
        let location = self.location(pos);
        let start = self.line_starts[location.lineno - 1];
        let end = self.text[start..]
            .find('\n')
            .map(|i| start + i)
            .unwrap_or(self.text.len());
        &self.text[start..end]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locations() {
        let source = SourceText::new("ab\ncd\n\nef");
        assert_eq!(source.location(0), SourceLocation::new(0, 1, 1));
        assert_eq!(source.location(1), SourceLocation::new(1, 1, 2));
        assert_eq!(source.location(3), SourceLocation::new(3, 2, 1));
        assert_eq!(source.location(6), SourceLocation::new(6, 3, 1));
        assert_eq!(source.location(8), SourceLocation::new(8, 4, 2));
        assert_eq!(source.line_at(4), "cd");
        assert_eq!(source.line_at(6), "");
    }

    #[test]
    fn test_span_join() {
        let a = Span::new(SourceLocation::new(0, 1, 1), SourceLocation::new(2, 1, 3));
        let b = Span::new(SourceLocation::new(5, 1, 6), SourceLocation::new(9, 1, 10));
        assert_eq!(a.to(b).range(), 0..9);
    }
}
