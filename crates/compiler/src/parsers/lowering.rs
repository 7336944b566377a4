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
use crate::parsers::{Parser, ParserRef};
use crate::stream::Stream;
use bolt_common::{ParseResult, Span, SyntaxError};
use tracing::debug;

const IF: &str = "if:condition:body";
const ELIF: &str = "elif:condition:body";
const ELSE: &str = "else:body";

/// Rewrites `elif` chains of a parsed root into nested `else` blocks.
///
/// `if a: x` / `elif b: y` / `else: z` becomes `if a: x` / `else: (if b: y / else: z)`.
/// Roots that are already in that form come out unchanged.
pub struct IfElseLoweringParser {
    parser: ParserRef,
}

impl IfElseLoweringParser {
    pub fn new(parser: ParserRef) -> Self {
        Self { parser }
    }
}

impl Parser for IfElseLoweringParser {
    fn parse(&self, stream: &mut Stream) -> ParseResult<Node> {
        match self.parser.parse(stream)? {
            Node {
                node: Ast::Root { commands },
                span,
            } => Ok(Node::new(
                Ast::Root {
                    commands: lower_commands(commands)?,
                },
                span,
            )),
            other => Ok(other),
        }
    }
}

fn lower_commands(commands: Vec<Node>) -> ParseResult<Vec<Node>> {
    let mut result = Vec::with_capacity(commands.len());
    let mut previous: Option<String> = None;
    let mut commands = commands.into_iter().peekable();

    while let Some(command) = commands.next() {
        let identifier = command.command_identifier().unwrap_or_default().to_string();

        if (identifier == ELIF || identifier == ELSE)
            && !matches!(previous.as_deref(), Some(IF | ELIF))
        {
            return Err(
                SyntaxError::invalid("Conditional branch must be part of an if statement.")
                    .at(branch_span(&command)),
            );
        }

        if identifier != ELIF {
            previous = Some(identifier);
            result.push(command);
            continue;
        }

        let mut chain = vec![command];
        while let Some(next) = commands.next_if(|c| c.command_identifier() == Some(ELIF)) {
            chain.push(next);
        }
        let mut last = commands.next_if(|c| c.command_identifier() == Some(ELSE));
        debug!(
            branches = chain.len(),
            has_else = last.is_some(),
            "lowering elif chain"
        );

        for branch in chain.into_iter().rev() {
            let branch = match branch.node {
                Ast::Command { arguments, .. } => Node::new(
                    Ast::Command {
                        identifier: IF.to_string(),
                        arguments,
                    },
                    branch.span,
                ),
                other => Node::new(other, branch.span),
            };
            let mut inner = vec![branch];
            inner.extend(last.take());
            let span = inner[0].span.to(inner[inner.len() - 1].span);
            let root = Node::new(Ast::Root { commands: inner }, span);
            last = Some(Node::new(
                Ast::Command {
                    identifier: ELSE.to_string(),
                    arguments: vec![root],
                },
                span,
            ));
        }

        result.extend(last);
        previous = Some(ELSE.to_string());
    }

    Ok(result)
}

/// From the start of the command to the start of its body.
fn branch_span(command: &Node) -> Span {
    match &command.node {
        Ast::Command { arguments, .. } => match arguments.last() {
            Some(body) => Span::new(command.span.location, body.span.location),
            None => command.span,
        },
        _ => command.span,
    }
}
