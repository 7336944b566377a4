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

//! Parser composition.
//!
//! Every grammar element is a [`Parser`] registered under a name in [`Parsers`]. Parsers
//! compose by wrapping each other or by delegating to a name, which is resolved through the
//! registry carried by the stream at parse time. That is what allows mutually recursive
//! grammar rules without any parser owning another.

pub mod function;
pub mod imports;
pub mod interpolation;
pub mod literal;
pub mod lookup;
pub mod lowering;
pub mod operators;
pub mod patterns;
pub mod primary;
pub mod registry;
pub mod scope_managers;
pub mod statement;

use crate::ast::Node;
use crate::stream::Stream;
use bolt_common::{ParseResult, SyntaxError};
use std::collections::HashMap;
use std::fmt::Debug;
use std::rc::Rc;

pub trait Parser {
    fn parse(&self, stream: &mut Stream) -> ParseResult<Node>;
}

impl<F> Parser for F
where
    F: Fn(&mut Stream) -> ParseResult<Node>,
{
    fn parse(&self, stream: &mut Stream) -> ParseResult<Node> {
        self(stream)
    }
}

pub type ParserRef = Rc<dyn Parser>;

/// The named parser registry.
#[derive(Clone, Default)]
pub struct Parsers {
    table: HashMap<String, ParserRef>,
}

impl Parsers {
    pub fn get(&self, name: &str) -> Option<&ParserRef> {
        self.table.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.table.contains_key(name)
    }

    pub fn insert(&mut self, name: impl Into<String>, parser: impl Parser + 'static) {
        self.table.insert(name.into(), Rc::new(parser));
    }

    pub fn insert_ref(&mut self, name: impl Into<String>, parser: ParserRef) {
        self.table.insert(name.into(), parser);
    }

    /// Add every entry of `other`, replacing existing entries of the same name.
    pub fn extend(&mut self, other: Parsers) {
        self.table.extend(other.table);
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.table.keys().map(String::as_str)
    }
}

impl Debug for Parsers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<_> = self.names().collect();
        names.sort_unstable();
        f.debug_struct("Parsers").field("names", &names).finish()
    }
}

/// Invoke the parser registered under `name`.
pub fn delegate(name: &str, stream: &mut Stream) -> ParseResult<Node> {
    let Some(parser) = stream.data.parsers.get(name).cloned() else {
        return Err(
            SyntaxError::invalid(format!("No parser registered under '{name}'."))
                .at(stream.peek().span()),
        );
    };
    parser.parse(stream)
}

/// A parser that forwards to a registry entry by name.
#[derive(Debug, Clone, Copy)]
pub struct Delegate(pub &'static str);

impl Parser for Delegate {
    fn parse(&self, stream: &mut Stream) -> ParseResult<Node> {
        delegate(self.0, stream)
    }
}

/// Ordered choice between parsers.
pub struct AlternativeParser {
    parsers: Vec<ParserRef>,
}

impl AlternativeParser {
    pub fn new(parsers: Vec<ParserRef>) -> Self {
        Self { parsers }
    }
}

impl Parser for AlternativeParser {
    fn parse(&self, stream: &mut Stream) -> ParseResult<Node> {
        let options: Vec<usize> = (0..self.parsers.len()).collect();
        stream.choose(&options, |stream, index| self.parsers[index].parse(stream))
    }
}
