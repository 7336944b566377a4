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

//! Sequences of commands: the top level of a file and indented blocks.

use crate::ast::{Ast, Node};
use crate::parsers::{Parser, delegate};
use crate::stream::Stream;
use bolt_common::tokenstream::NEWLINE;
use bolt_common::{ParseResult, Span, SyntaxError, Token, TokenPattern};

/// Width of the indentation at the cursor, which must be at the start of a line.
fn line_indent(stream: &Stream) -> usize {
    let rest = &stream.source().as_str()[stream.position()..];
    rest.len() - rest.trim_start_matches([' ', '\t']).len()
}

fn peek_line_end(stream: &mut Stream) -> ParseResult<Token> {
    stream.intercept(NEWLINE, |stream| Ok(stream.peek()))
}

fn consume_newline(stream: &mut Stream) -> ParseResult<Token> {
    stream.intercept(NEWLINE, |stream| stream.expect(NEWLINE))
}

fn unexpected_indent(stream: &Stream) -> SyntaxError {
    SyntaxError::invalid("Unexpected indent.").at(stream.peek().span())
}

/// Every command of the file.
pub struct RootParser;

impl Parser for RootParser {
    fn parse(&self, stream: &mut Stream) -> ParseResult<Node> {
        let mut commands: Vec<Node> = vec![];
        loop {
            stream.skip_blank_lines();
            if stream.peek().is_eof() {
                break;
            }
            if line_indent(stream) > stream.indentation_level() {
                return Err(unexpected_indent(stream));
            }

            commands.push(delegate("command", stream)?);

            if peek_line_end(stream)?.is_eof() {
                break;
            }
            consume_newline(stream)?;
        }

        let span = match (commands.first(), commands.last()) {
            (Some(first), Some(last)) => first.span.to(last.span),
            _ => Span::new(stream.location(), stream.location()),
        };
        Ok(Node::new(Ast::Root { commands }, span))
    }
}

/// A block introduced by `:`, either indented on the following lines or, when
/// `inline_blocks` is set, a single command on the same line.
///
/// The stream is left at the end of the last command of the block so that the enclosing
/// command sees the end of its line.
pub struct NestedRootParser {
    inline_blocks: bool,
}

impl NestedRootParser {
    pub fn new(inline_blocks: bool) -> Self {
        Self { inline_blocks }
    }
}

impl Parser for NestedRootParser {
    fn parse(&self, stream: &mut Stream) -> ParseResult<Node> {
        let colon = stream.syntax(&[("colon", Some(":"))], |stream| stream.expect("colon"))?;

        let next = peek_line_end(stream)?;
        if !next.matches(TokenPattern::kind(NEWLINE)) {
            if self.inline_blocks && !next.is_eof() {
                let command = delegate("command", stream)?;
                let span = colon.span().to(command.span);
                return Ok(Node::new(
                    Ast::Root {
                        commands: vec![command],
                    },
                    span,
                ));
            }
            return Err(SyntaxError::invalid("Expected non-empty block.").at(next.span()));
        }

        consume_newline(stream)?;
        stream.skip_blank_lines();

        let level = line_indent(stream);
        if stream.peek().is_eof() || level <= stream.indentation_level() {
            return Err(SyntaxError::invalid("Expected non-empty block.").at(colon.span()));
        }

        let (commands, end) = stream.indented(level, |stream| {
            let mut commands = vec![];
            loop {
                commands.push(delegate("command", stream)?);
                let end = stream.mark();

                if peek_line_end(stream)?.is_eof() {
                    return Ok((commands, end));
                }
                consume_newline(stream)?;
                stream.skip_blank_lines();
                if stream.peek().is_eof() {
                    return Ok((commands, end));
                }

                let indent = line_indent(stream);
                if indent < level {
                    return Ok((commands, end));
                }
                if indent > level {
                    return Err(unexpected_indent(stream));
                }
            }
        })?;

        stream.reset(end);
        Ok(Node::new(
            Ast::Root { commands },
            Span::new(colon.location, stream.location()),
        ))
    }
}
