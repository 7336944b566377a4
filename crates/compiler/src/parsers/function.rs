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

//! Function definitions.
//!
//! The body of a function is not parsed where it appears. `bolt:function_root` skips over it
//! and keeps a copy of the stream positioned at the body; once the enclosing root is
//! complete, [`FunctionRootBacktracker`] parses the copy with every name of the enclosing
//! root in scope.

use crate::ast::{Ast, DeferredBody, Node};
use crate::parsers::patterns::{IDENTIFIER_PATTERN, PLAIN_ASSIGNMENT_PATTERN};
use crate::parsers::{Parser, ParserRef, delegate};
use crate::scope::Storage;
use crate::stream::{Stream, with_identifiers};
use bolt_common::tokenstream::NEWLINE;
use bolt_common::{ParseResult, Span, TokenPattern};
use std::collections::HashSet;
use std::rc::Rc;
use tracing::debug;

const DEF: &str = "def:function:body";

/// `name(a, b=default, ...)`. Defaults see the names defined so far, the function itself and
/// the arguments before them.
pub fn parse_function_signature(stream: &mut Stream) -> ParseResult<Node> {
    let mut scoped_identifiers = stream.data.scope.identifiers.clone();

    let (name, names, arguments) = stream.syntax(
        &[
            ("comma", Some(",")),
            ("equal", Some(PLAIN_ASSIGNMENT_PATTERN)),
            ("brace", Some(r"\(|\)")),
            ("identifier", Some(IDENTIFIER_PATTERN.as_str())),
        ],
        |stream| {
            let name = stream.expect("identifier")?;
            stream.expect(("brace", "("))?;
            scoped_identifiers.insert(name.value.clone());

            let close = TokenPattern::exact("brace", ")");
            let (names, arguments) = stream.ignore(NEWLINE, |stream| {
                let mut names: Vec<String> = vec![];
                let mut arguments = vec![];

                while !stream.at_close(close)? {
                    let argument = stream.expect("identifier")?;

                    let default = match stream.get("equal") {
                        Some(_) => {
                            let visible = scoped_identifiers
                                .iter()
                                .chain(names.iter())
                                .cloned()
                                .collect();
                            let default = with_identifiers(stream, visible, |stream| {
                                delegate("bolt:expression", stream)
                            })?;
                            Some(default.boxed())
                        }
                        None => None,
                    };

                    arguments.push(Node::new(
                        Ast::SignatureArgument {
                            name: argument.value.clone(),
                            default,
                        },
                        Span::new(argument.location, stream.location()),
                    ));
                    names.push(argument.value);

                    if stream.get("comma").is_none() {
                        stream.expect(close)?;
                        break;
                    }
                }
                Ok((names, arguments))
            })?;
            Ok((name, names, arguments))
        },
    )?;

    let scope = stream.data.scope_mut();
    scope.identifiers.insert(name.value.clone());
    scope.pending_identifiers.extend(names);

    Ok(Node::new(
        Ast::FunctionSignature {
            name: name.value,
            arguments,
        },
        Span::new(name.location, stream.location()),
    ))
}

/// Skip the body of a function, returning a deferred copy of the stream that starts where
/// the body does.
pub fn parse_function_root(stream: &mut Stream) -> ParseResult<Node> {
    let mut body = stream.clone();
    body.data.scope = Rc::new(stream.data.scope.function_scope());

    let first = stream.syntax(&[("statement", Some(r"[^\s#].*"))], |stream| {
        let first = stream.expect("statement")?;
        while stream.consume_line_continuation() {
            stream.expect("statement")?;
        }
        Ok(first)
    })?;

    stream.data.scope_mut().pending_identifiers.clear();

    Ok(Node::new(
        Ast::FunctionRoot {
            body: DeferredBody::new(body),
        },
        Span::new(first.location, stream.location()),
    ))
}

/// Parses the deferred bodies of the functions defined by a root, once the root is done.
pub struct FunctionRootBacktracker {
    parser: ParserRef,
}

impl FunctionRootBacktracker {
    pub fn new(parser: ParserRef) -> Self {
        Self { parser }
    }
}

impl Parser for FunctionRootBacktracker {
    fn parse(&self, stream: &mut Stream) -> ParseResult<Node> {
        let node = self.parser.parse(stream)?;
        let (commands, span) = match node {
            Node {
                node: Ast::Root { commands },
                span,
            } => (commands, span),
            other => return Ok(other),
        };

        let identifiers = &stream.data.scope.identifiers;
        let commands = commands
            .into_iter()
            .map(|command| {
                if command.command_identifier() == Some(DEF) {
                    parse_function_body(identifiers, command)
                } else {
                    Ok(command)
                }
            })
            .collect::<ParseResult<Vec<_>>>()?;

        Ok(Node::new(Ast::Root { commands }, span))
    }
}

fn parse_function_body(identifiers: &HashSet<String>, mut command: Node) -> ParseResult<Node> {
    let Ast::Command { arguments, .. } = &mut command.node else {
        return Ok(command);
    };
    let Some(Node {
        node: Ast::FunctionRoot { body },
        ..
    }) = arguments.last()
    else {
        return Ok(command);
    };

    let mut body = body.stream.as_ref().clone();
    body.data
        .scope_mut()
        .identifiers
        .extend(identifiers.iter().cloned());
    body.data.context.function = true;
    body.data.context.in_loop = false;

    if let Some(Node {
        node: Ast::FunctionSignature { name, arguments: parameters },
        ..
    }) = arguments.first()
    {
        debug!(function = %name, "parsing deferred function body");
        for parameter in parameters {
            if let Ast::SignatureArgument { name, .. } = &parameter.node {
                body.data
                    .scope_mut()
                    .identifiers_storage
                    .insert(name.clone(), Storage::Local);
            }
        }
    }

    let root = delegate("nested_root", &mut body)?;
    if let Some(last) = arguments.last_mut() {
        *last = root;
    }
    Ok(command)
}
