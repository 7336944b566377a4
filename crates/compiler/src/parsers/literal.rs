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

//! Atoms: identifiers and literals, plus the small parsers for the items that appear inside
//! literal and call brackets.

use crate::ast::{Ast, Node, UnpackKind, Value};
use crate::database::CompilationDatabase;
use crate::parsers::patterns::{
    FALSE_PATTERN, IDENTIFIER_PATTERN, NULL_PATTERN, NUMBER_PATTERN, RESOURCE_LOCATION_PATTERN,
    STRING_PATTERN, TRUE_PATTERN,
};
use crate::parsers::{Parser, ParserRef, delegate};
use crate::stream::Stream;
use crate::unquote::unquote_string;
use bolt_common::tokenstream::NEWLINE;
use bolt_common::{ParseResult, Span, SyntaxError, TokenPattern};
use std::rc::Rc;

/// An identifier that must already be readable.
pub fn parse_identifier(stream: &mut Stream) -> ParseResult<Node> {
    let token = stream.syntax(
        &[
            ("true", Some(TRUE_PATTERN)),
            ("false", Some(FALSE_PATTERN)),
            ("null", Some(NULL_PATTERN)),
            ("identifier", Some(IDENTIFIER_PATTERN.as_str())),
        ],
        |stream| stream.expect("identifier"),
    )?;

    if !stream.data.scope.is_defined(&token.value) {
        return Err(SyntaxError::undefined_identifier(
            &token,
            &stream.data.scope.identifiers,
        ));
    }

    Ok(Node::new(
        Ast::Identifier {
            value: token.value.clone(),
        },
        token.span(),
    ))
}

const LITERAL_START: [TokenPattern<'static>; 8] = [
    TokenPattern::exact("curly", "{"),
    TokenPattern::exact("bracket", "["),
    TokenPattern::kind("true"),
    TokenPattern::kind("false"),
    TokenPattern::kind("null"),
    TokenPattern::kind("string"),
    TokenPattern::kind("resource"),
    TokenPattern::kind("number"),
];

pub struct LiteralParser {
    database: Rc<CompilationDatabase>,
}

impl LiteralParser {
    pub fn new(database: Rc<CompilationDatabase>) -> Self {
        Self { database }
    }
}

impl Parser for LiteralParser {
    fn parse(&self, stream: &mut Stream) -> ParseResult<Node> {
        let context = &stream.data.context;
        let resource = (!context.bolt_lookup && !context.bolt_format_string)
            .then_some(RESOURCE_LOCATION_PATTERN);

        stream.syntax(
            &[
                ("curly", Some(r"\{|\}")),
                ("bracket", Some(r"\[|\]")),
                ("comma", Some(",")),
                ("true", Some(TRUE_PATTERN)),
                ("false", Some(FALSE_PATTERN)),
                ("null", Some(NULL_PATTERN)),
                ("string", Some(STRING_PATTERN)),
                ("resource", resource),
                ("number", Some(NUMBER_PATTERN)),
            ],
            |stream| {
                let (index, token) = stream.expect_any(&LITERAL_START)?;
                let value = match index {
                    0 => return parse_items(stream, token.span(), ("curly", "}"), "bolt:dict_item"),
                    1 => {
                        return parse_items(stream, token.span(), ("bracket", "]"), "bolt:list_item");
                    }
                    2 => Value::Bool(true),
                    3 => Value::Bool(false),
                    4 => Value::Null,
                    5 => Value::String(unquote_string(&token)?),
                    6 if token.value.starts_with("./") || token.value.starts_with("../") => {
                        Value::String(
                            self.database
                                .resolve_relative_location(&token.value, token.span())?,
                        )
                    }
                    6 => Value::String(token.value.clone()),
                    _ => Value::from_number(&token.value).ok_or_else(|| {
                        SyntaxError::invalid(format!("Invalid number '{}'.", token.value))
                            .at(token.span())
                    })?,
                };
                Ok(Node::new(Ast::Value { value }, token.span()))
            },
        )
    }
}

/// The comma separated items of a dict or list literal, up to `close`.
fn parse_items(
    stream: &mut Stream,
    open: Span,
    close: (&'static str, &'static str),
    item_parser: &str,
) -> ParseResult<Node> {
    let close = TokenPattern::from(close);
    let items = stream.ignore(NEWLINE, |stream| {
        let mut items = vec![];
        while !stream.at_close(close)? {
            items.push(delegate(item_parser, stream)?);
            if stream.get("comma").is_none() {
                stream.expect(close)?;
                break;
            }
        }
        Ok(items)
    })?;

    let span = Span::new(open.location, stream.location());
    let node = if close.kind == "curly" {
        Ast::Dict { items }
    } else {
        Ast::List { items }
    };
    Ok(Node::new(node, span))
}

/// `key: value` inside a dict literal. A bare name before the colon is a string key unless
/// it is a readable identifier.
pub fn parse_dict_item(stream: &mut Stream) -> ParseResult<Node> {
    stream.syntax(
        &[
            ("colon", Some(":")),
            ("identifier", Some(IDENTIFIER_PATTERN.as_str())),
        ],
        |stream| {
            let bare = stream.attempt(|stream| {
                let identifier = stream.expect("identifier")?;
                stream.expect("colon")?;
                Ok(identifier)
            });

            let key = match bare {
                Some(identifier) => {
                    let node = if stream.data.scope.is_defined(&identifier.value) {
                        Ast::Identifier {
                            value: identifier.value.clone(),
                        }
                    } else {
                        Ast::Value {
                            value: Value::String(identifier.value.clone()),
                        }
                    };
                    Node::new(node, identifier.span())
                }
                None => {
                    let key = delegate("bolt:expression", stream)?;
                    stream.expect("colon")?;
                    key
                }
            };

            let value = delegate("bolt:expression", stream)?;
            let span = key.span.to(value.span);
            Ok(Node::new(
                Ast::DictItem {
                    key: key.boxed(),
                    value: value.boxed(),
                },
                span,
            ))
        },
    )
}

/// `*value` or `**value`.
pub struct UnpackParser {
    parser: ParserRef,
}

impl UnpackParser {
    pub fn new(parser: ParserRef) -> Self {
        Self { parser }
    }
}

impl Parser for UnpackParser {
    fn parse(&self, stream: &mut Stream) -> ParseResult<Node> {
        let prefix = stream.syntax(&[("prefix", Some(r"\*\*|\*"))], |stream| {
            stream.expect("prefix")
        })?;
        let value = self.parser.parse(stream)?;
        let kind = if prefix.value == "**" {
            UnpackKind::Dict
        } else {
            UnpackKind::List
        };
        let span = prefix.span().to(value.span);
        Ok(Node::new(
            Ast::Unpack {
                kind,
                value: value.boxed(),
            },
            span,
        ))
    }
}

/// Only let through the unpacking of the given kind.
pub struct UnpackConstraint {
    kind: UnpackKind,
    parser: ParserRef,
}

impl UnpackConstraint {
    pub fn new(kind: UnpackKind, parser: ParserRef) -> Self {
        Self { kind, parser }
    }
}

impl Parser for UnpackConstraint {
    fn parse(&self, stream: &mut Stream) -> ParseResult<Node> {
        let node = self.parser.parse(stream)?;
        if let Ast::Unpack { kind, .. } = &node.node
            && *kind != self.kind
        {
            let name = match kind {
                UnpackKind::List => "List",
                UnpackKind::Dict => "Dict",
            };
            return Err(
                SyntaxError::invalid(format!("{name} unpacking not allowed.")).at(node.span)
            );
        }
        Ok(node)
    }
}

/// `name=value` call arguments.
pub struct KeywordParser {
    parser: ParserRef,
}

impl KeywordParser {
    pub fn new(parser: ParserRef) -> Self {
        Self { parser }
    }
}

impl Parser for KeywordParser {
    fn parse(&self, stream: &mut Stream) -> ParseResult<Node> {
        let name = stream.syntax(
            &[
                ("name", Some(IDENTIFIER_PATTERN.as_str())),
                ("equal", Some(r"=(?!=)")),
            ],
            |stream| {
                let name = stream.expect("name")?;
                stream.expect("equal")?;
                Ok(name)
            },
        )?;
        let value = self.parser.parse(stream)?;
        let span = name.span().to(value.span);
        Ok(Node::new(
            Ast::Keyword {
                name: name.value,
                value: value.boxed(),
            },
            span,
        ))
    }
}
