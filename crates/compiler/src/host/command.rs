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

//! The command grammar of the host language.
//!
//! A command is a sequence of elements: literal words, arguments parsed by a named parser
//! (`command:argument:<parser>`), and nested subcommands. Its identifier joins the names of
//! its elements with colons, e.g. `scoreboard:players:set:targets:objective:score`.
//! Subcommand chains such as `global a, b` parse their tail in a named scope whose
//! identifiers continue the parent's path (`global:name:subcommand`).

use crate::ast::{Ast, Node};
use crate::parsers::{Parser, delegate};
use crate::stream::{Stream, provide};
use bolt_common::tokenstream::{EOF, NEWLINE};
use bolt_common::{ParseResult, Span, SyntaxError, TokenPattern};
use itertools::Itertools;
use std::collections::HashMap;
use tracing::trace;

/// The scope of commands that can start a line.
pub const ROOT_SCOPE: &str = "";

const WORD_PATTERN: &str = r"[a-zA-Z_][a-zA-Z0-9_]*\b";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Element {
    Literal(&'static str),
    Argument {
        name: &'static str,
        parser: &'static str,
    },
    /// A command from `scope`, or any command when `scope` is [`ROOT_SCOPE`].
    Subcommand { scope: &'static str },
}

impl Element {
    fn name(&self) -> &'static str {
        match self {
            Element::Literal(word) => word,
            Element::Argument { name, .. } => name,
            Element::Subcommand { .. } => "subcommand",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Prototype {
    pub identifier: String,
    /// Path consumed by the parent command, for prototypes of a subcommand scope.
    pub path: Vec<&'static str>,
    pub elements: Vec<Element>,
}

impl Prototype {
    fn leading_literal(&self) -> Option<&'static str> {
        match self.elements.first() {
            Some(Element::Literal(word)) => Some(word),
            _ => None,
        }
    }
}

#[derive(Debug, Default)]
pub struct CommandTree {
    scopes: HashMap<&'static str, Vec<Prototype>>,
}

impl CommandTree {
    /// Register a command. `scope` is the path of the parent command for subcommand scopes.
    pub fn add(&mut self, scope: &'static str, elements: Vec<Element>) {
        let path: Vec<&'static str> = if scope.is_empty() {
            vec![]
        } else {
            scope.split(':').collect()
        };
        let identifier = path
            .iter()
            .copied()
            .chain(elements.iter().map(Element::name))
            .join(":");
        self.scopes.entry(scope).or_default().push(Prototype {
            identifier,
            path,
            elements,
        });
    }

    pub fn prototypes(&self, scope: &str) -> &[Prototype] {
        self.scopes.get(scope).map(Vec::as_slice).unwrap_or_default()
    }

    /// The prototypes worth trying at the cursor: those introduced by the word that follows,
    /// or the ones that start with an argument when no literal matches.
    fn candidates(&self, stream: &mut Stream, scope: &str) -> ParseResult<Vec<&Prototype>> {
        let prototypes = self.prototypes(scope);
        let word = stream.syntax(&[("word", Some(WORD_PATTERN))], |stream| {
            Ok(stream.peek())
        })?;

        let literal: Vec<&Prototype> = prototypes
            .iter()
            .filter(|p| word.kind == "word" && p.leading_literal() == Some(word.value.as_str()))
            .collect();
        if !literal.is_empty() {
            return Ok(literal);
        }
        Ok(prototypes
            .iter()
            .filter(|p| p.leading_literal().is_none())
            .collect())
    }

    pub fn parse_scope(&self, stream: &mut Stream, scope: &str) -> ParseResult<Node> {
        let candidates = self.candidates(stream, scope)?;
        if candidates.is_empty() {
            let token = stream.peek();
            return Err(SyntaxError::unexpected(&token, vec!["command".to_string()]));
        }
        trace!(scope, candidates = candidates.len(), "parsing command");
        stream.choose(&candidates, |stream, prototype| {
            self.parse_prototype(stream, prototype)
        })
    }

    fn parse_prototype(&self, stream: &mut Stream, prototype: &Prototype) -> ParseResult<Node> {
        let start = stream.peek().location;
        let mut path = prototype.path.clone();
        let mut arguments = vec![];

        for element in &prototype.elements {
            path.push(element.name());
            match *element {
                Element::Literal(word) => {
                    let pattern = format!(r"{word}\b");
                    stream.syntax(&[("literal", Some(pattern.as_str()))], |stream| {
                        stream.expect(TokenPattern::exact("literal", word))
                    })?;
                }
                Element::Argument { parser, .. } => {
                    let name = format!("command:argument:{parser}");
                    let scope = path.clone();
                    arguments.push(provide(
                        stream,
                        |context| context.command_scope = scope,
                        |stream| delegate(&name, stream),
                    )?);
                }
                Element::Subcommand { scope } => {
                    let command_scope = path.clone();
                    arguments.push(provide(
                        stream,
                        |context| context.command_scope = command_scope,
                        |stream| {
                            if scope == ROOT_SCOPE {
                                delegate("command", stream)
                            } else {
                                self.parse_scope(stream, scope)
                            }
                        },
                    )?);
                }
            }
        }

        let end = stream.intercept(NEWLINE, |stream| Ok(stream.peek()))?;
        if !end.matches_any(&[TokenPattern::kind(NEWLINE), TokenPattern::kind(EOF)]) {
            return Err(SyntaxError::unexpected(&end, vec![NEWLINE.to_string()]));
        }

        Ok(Node::new(
            Ast::Command {
                identifier: prototype.identifier.clone(),
                arguments,
            },
            Span::new(start, stream.location()),
        ))
    }
}

/// Parses one command of the root scope of `tree`.
pub struct CommandParser {
    tree: &'static CommandTree,
}

impl CommandParser {
    pub fn new(tree: &'static CommandTree) -> Self {
        Self { tree }
    }
}

impl Parser for CommandParser {
    fn parse(&self, stream: &mut Stream) -> ParseResult<Node> {
        self.tree.parse_scope(stream, ROOT_SCOPE)
    }
}
