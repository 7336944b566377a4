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

//! Subscript arguments: a single expression or a `start:stop:step` slice.

use crate::ast::{Ast, Node};
use crate::parsers::{Parser, ParserRef};
use crate::stream::{Stream, provide};
use bolt_common::{ParseResult, Span, TokenPattern};

const SEPARATOR: [TokenPattern<'static>; 2] = [
    TokenPattern::kind("comma"),
    TokenPattern::exact("bracket", "]"),
];

pub struct LookupParser {
    parser: ParserRef,
}

impl LookupParser {
    pub fn new(parser: ParserRef) -> Self {
        Self { parser }
    }
}

impl Parser for LookupParser {
    fn parse(&self, stream: &mut Stream) -> ParseResult<Node> {
        provide(
            stream,
            |context| context.bolt_lookup = true,
            |stream| {
                stream.syntax(
                    &[
                        ("colon", Some(":")),
                        ("comma", Some(",")),
                        ("bracket", Some(r"\]")),
                    ],
                    |stream| self.parse_slice(stream),
                )
            },
        )
    }
}

impl LookupParser {
    fn parse_slice(&self, stream: &mut Stream) -> ParseResult<Node> {
        let (start, location) = match stream.get("colon") {
            Some(colon) => (None, colon.location),
            None => {
                let start = self.parser.parse(stream)?;
                if stream.get("colon").is_none() {
                    return Ok(start);
                }
                let location = start.span.location;
                (Some(start), location)
            }
        };

        let mut stop = None;
        let mut step = None;

        let mut second_colon = stream.get("colon");
        if second_colon.is_none() && !stream.peek_is(&SEPARATOR) {
            stop = Some(self.parser.parse(stream)?);
            second_colon = stream.get("colon");
        }
        if second_colon.is_some() && !stream.peek_is(&SEPARATOR) {
            step = Some(self.parser.parse(stream)?);
        }

        Ok(Node::new(
            Ast::Slice {
                start: start.map(Box::new),
                stop: stop.map(Box::new),
                step: step.map(Box::new),
            },
            Span::new(location, stream.location()),
        ))
    }
}
