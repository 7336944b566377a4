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

use crate::ast::{Ast, Node};
use crate::parsers::statement::check_final_expression;
use crate::parsers::{Parser, ParserRef, delegate};
use crate::stream::Stream;
use bolt_common::{ParseResult, Span};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Branch {
    Interpolation,
    Original,
}

/// Lets an expression stand in for a primitive argument of the host grammar.
///
/// The interpolated value is a primary expression over an identifier (`name`,
/// `obj.attr[0]`, `f(x)`). It may be preceded by a `prefix`, such as the `~` of a relative
/// coordinate, and must be preceded by an `unpack` marker when one is configured. With
/// `fallback` the host parser gets the first try.
pub struct InterpolationParser {
    converter: &'static str,
    parser: ParserRef,
    prefix: Option<&'static str>,
    unpack: Option<&'static str>,
    fallback: bool,
    final_: bool,
}

impl InterpolationParser {
    pub fn new(converter: &'static str, parser: ParserRef) -> Self {
        Self {
            converter,
            parser,
            prefix: None,
            unpack: None,
            fallback: false,
            final_: false,
        }
    }

    pub fn prefix(mut self, pattern: &'static str) -> Self {
        self.prefix = Some(pattern);
        self
    }

    pub fn unpack(mut self, pattern: &'static str) -> Self {
        self.unpack = Some(pattern);
        self
    }

    pub fn fallback(mut self) -> Self {
        self.fallback = true;
        self
    }

    /// The interpolated value must end the line.
    pub fn final_(mut self) -> Self {
        self.final_ = true;
        self
    }

    fn parse_interpolation(&self, stream: &mut Stream) -> ParseResult<Node> {
        let (prefix, unpack) = stream.syntax(
            &[("prefix", self.prefix), ("unpack", self.unpack)],
            |stream| {
                let prefix = stream.get("prefix");
                let unpack = match self.unpack {
                    Some(_) => Some(stream.expect("unpack")?),
                    None => None,
                };
                Ok((prefix, unpack))
            },
        )?;

        let value = delegate("bolt:interpolation", stream)?;
        if self.final_ {
            check_final_expression(stream)?;
        }

        let start = prefix.as_ref().map_or(value.span.location, |p| p.location);
        let span = Span::new(start, value.span.end_location);
        Ok(Node::new(
            Ast::Interpolation {
                prefix: prefix.map(|token| token.value),
                unpack: unpack.map(|token| token.value),
                converter: self.converter.to_string(),
                value: value.boxed(),
            },
            span,
        ))
    }
}

impl Parser for InterpolationParser {
    fn parse(&self, stream: &mut Stream) -> ParseResult<Node> {
        let order = if self.fallback {
            [Branch::Original, Branch::Interpolation]
        } else {
            [Branch::Interpolation, Branch::Original]
        };
        stream.choose(&order, |stream, branch| match branch {
            Branch::Interpolation => self.parse_interpolation(stream),
            Branch::Original => self.parser.parse(stream),
        })
    }
}
