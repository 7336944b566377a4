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

//! Binary and unary operator layers of the expression grammar.

use crate::ast::{Ast, BinaryOp, Node, UnaryOp};
use crate::parsers::patterns::normalize_whitespace;
use crate::parsers::{Parser, ParserRef};
use crate::stream::Stream;
use bolt_common::{ParseResult, SyntaxError, Token};
use std::str::FromStr;

const OPERATOR: &str = "operator";

fn operator<T: FromStr>(token: &Token) -> ParseResult<T> {
    let spelling = normalize_whitespace(&token.value);
    T::from_str(&spelling).map_err(|_| {
        SyntaxError::invalid(format!("Unknown operator '{spelling}'.")).at(token.span())
    })
}

/// One precedence level of binary operators.
pub struct BinaryParser {
    pattern: String,
    parser: ParserRef,
    right_associative: bool,
}

impl BinaryParser {
    pub fn new(operators: &[&str], parser: ParserRef) -> Self {
        Self {
            pattern: operators.join("|"),
            parser,
            right_associative: false,
        }
    }

    pub fn right_associative(mut self) -> Self {
        self.right_associative = true;
        self
    }
}

impl Parser for BinaryParser {
    fn parse(&self, stream: &mut Stream) -> ParseResult<Node> {
        let (first, rest) = stream.syntax(&[(OPERATOR, Some(self.pattern.as_str()))], |stream| {
            let first = self.parser.parse(stream)?;
            let mut rest: Vec<(BinaryOp, Node)> = vec![];
            while let Some(token) = stream.get(OPERATOR) {
                let op = operator(&token)?;
                rest.push((op, self.parser.parse(stream)?));
            }
            Ok((first, rest))
        })?;

        if !self.right_associative {
            return Ok(rest.into_iter().fold(first, |left, (op, right)| {
                binary(op, left, right)
            }));
        }

        // a ** b ** c groups as a ** (b ** c): fold from the right, pairing each operand with
        // the operator that precedes it.
        let mut rest = rest.into_iter().rev();
        let Some((mut op, mut right)) = rest.next() else {
            return Ok(first);
        };
        for (previous_op, left) in rest {
            right = binary(op, left, right);
            op = previous_op;
        }
        Ok(binary(op, first, right))
    }
}

fn binary(operator: BinaryOp, left: Node, right: Node) -> Node {
    let span = left.span.to(right.span);
    Node::new(
        Ast::Binary {
            operator,
            left: left.boxed(),
            right: right.boxed(),
        },
        span,
    )
}

/// Prefix operators; they nest, so `not not x` is two unary nodes.
pub struct UnaryParser {
    pattern: String,
    parser: ParserRef,
}

impl UnaryParser {
    pub fn new(operators: &[&str], parser: ParserRef) -> Self {
        Self {
            pattern: operators.join("|"),
            parser,
        }
    }
}

impl Parser for UnaryParser {
    fn parse(&self, stream: &mut Stream) -> ParseResult<Node> {
        stream.syntax(&[(OPERATOR, Some(self.pattern.as_str()))], |stream| {
            let Some(token) = stream.get(OPERATOR) else {
                return self.parser.parse(stream);
            };
            let op: UnaryOp = operator(&token)?;
            let value = self.parse(stream)?;
            let span = token.span().to(value.span);
            Ok(Node::new(
                Ast::Unary {
                    operator: op,
                    value: value.boxed(),
                },
                span,
            ))
        })
    }
}
