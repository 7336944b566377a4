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

//! Primary expressions: parenthesised groups and tuples, format strings, and the chain of
//! attribute access, calls and subscripts that can follow any atom.

use crate::ast::{Ast, Node, UnpackKind, Value};
use crate::parsers::patterns::{IDENTIFIER_PATTERN, STRING_PATTERN};
use crate::parsers::{Parser, ParserRef, delegate};
use crate::stream::{Stream, provide};
use crate::unquote::unquote_string;
use bolt_common::tokenstream::NEWLINE;
use bolt_common::{ParseResult, Span, SyntaxError, Token, TokenPattern};

const GROUP_OPEN: [TokenPattern<'static>; 2] = [
    TokenPattern::exact("brace", "("),
    TokenPattern::kind("format_string"),
];

const POSTFIX_OPEN: [TokenPattern<'static>; 3] = [
    TokenPattern::kind("dot"),
    TokenPattern::exact("brace", "("),
    TokenPattern::exact("bracket", "["),
];

const FORMAT_STRING_PARTS: [TokenPattern<'static>; 4] = [
    TokenPattern::kind("escape"),
    TokenPattern::kind("double_brace"),
    TokenPattern::exact("brace", "{"),
    TokenPattern::kind("text"),
];

pub struct PrimaryParser {
    parser: ParserRef,
}

impl PrimaryParser {
    pub fn new(parser: ParserRef) -> Self {
        Self { parser }
    }
}

impl Parser for PrimaryParser {
    fn parse(&self, stream: &mut Stream) -> ParseResult<Node> {
        let node = stream.syntax(
            &[
                ("brace", Some(r"\(|\)")),
                ("comma", Some(",")),
                ("format_string", Some(r#"f['"]"#)),
            ],
            |stream| match stream.get_any(&GROUP_OPEN) {
                Some((0, open)) => parse_group(stream, &open),
                Some((_, opener)) => parse_format_string(stream, &opener),
                None => self.parser.parse(stream),
            },
        )?;

        stream.syntax(
            &[
                ("dot", Some(r"\.")),
                ("comma", Some(",")),
                ("brace", Some(r"\(|\)")),
                ("bracket", Some(r"\[|\]")),
                ("identifier", Some(IDENTIFIER_PATTERN.as_str())),
                ("string", Some(STRING_PATTERN)),
                ("number", Some(r"(?:0|[1-9][0-9]*)")),
            ],
            |stream| {
                let mut node = node;
                while let Some((index, _)) = stream.get_any(&POSTFIX_OPEN) {
                    node = match index {
                        0 => parse_dot(stream, node)?,
                        1 => parse_call(stream, node)?,
                        _ => parse_subscript(stream, node)?,
                    };
                }
                Ok(node)
            },
        )
    }
}

/// `( ... )`: a single expression without a trailing comma is returned as is, anything else
/// is a tuple.
fn parse_group(stream: &mut Stream, open: &Token) -> ParseResult<Node> {
    let close = TokenPattern::exact("brace", ")");
    stream.ignore(NEWLINE, |stream| {
        let mut items = vec![];
        let mut trailing_comma = false;
        while !stream.at_close(close)? {
            items.push(delegate("bolt:expression", stream)?);
            trailing_comma = stream.get("comma").is_some();
            if !trailing_comma {
                stream.expect(close)?;
                break;
            }
        }

        if items.len() == 1 && !trailing_comma {
            return Ok(items.remove(0));
        }
        Ok(Node::new(
            Ast::Tuple { items },
            Span::new(open.location, stream.location()),
        ))
    })
}

/// `f"text {expr:spec} {{literal}}"`. The template keeps the placeholders, including their
/// format spec, and goes through the same unquoting as plain strings.
fn parse_format_string(stream: &mut Stream, opener: &Token) -> ParseResult<Node> {
    let quote = &opener.value[1..];
    provide(
        stream,
        |context| context.bolt_format_string = true,
        |stream| {
            stream.syntax(
                &[
                    ("escape", Some(r"\\.")),
                    ("double_brace", Some(r"\{\{|\}\}")),
                    ("brace", Some(r"\{|\}")),
                    ("quote", Some(quote)),
                    ("text", Some(r"[^\\]+?")),
                ],
                |stream| {
                    let mut fmt = quote.to_string();
                    let mut values = vec![];

                    while let Some((index, token)) = stream.get_any(&FORMAT_STRING_PARTS) {
                        if index != 2 {
                            fmt.push_str(&token.value);
                            continue;
                        }
                        fmt.push('{');
                        values.push(stream.syntax(&[("text", None)], |stream| {
                            delegate("bolt:expression", stream)
                        })?);
                        stream.syntax(
                            &[("spec", Some(r"[:!][^\}]+")), ("double_brace", None)],
                            |stream| {
                                if let Some(spec) = stream.get("spec") {
                                    fmt.push_str(&spec.value);
                                }
                                stream.expect(("brace", "}"))
                            },
                        )?;
                        fmt.push('}');
                    }

                    let end_quote = stream.expect("quote")?;
                    fmt.push_str(&end_quote.value);

                    let template = Token {
                        kind: "format_string",
                        value: fmt,
                        location: opener.location.with_horizontal_offset(1),
                        end_location: end_quote.end_location,
                    };
                    let fmt = unquote_string(&template)?;

                    Ok(Node::new(
                        Ast::FormatString { fmt, values },
                        opener.span().to(end_quote.span()),
                    ))
                },
            )
        },
    )
}

/// `.name`, or `.0` / `."key"` as a shorthand subscript.
fn parse_dot(stream: &mut Stream, node: Node) -> ParseResult<Node> {
    let (index, token) = stream.expect_any(&[
        TokenPattern::kind("identifier"),
        TokenPattern::kind("string"),
        TokenPattern::kind("number"),
    ])?;

    let span = node.span.to(token.span());
    if index == 0 {
        return Ok(Node::new(
            Ast::Attribute {
                value: node.boxed(),
                name: token.value,
            },
            span,
        ));
    }

    let value = if index == 1 {
        Value::String(unquote_string(&token)?)
    } else {
        let number = token.value.parse::<i64>().map_err(|_| {
            SyntaxError::invalid(format!("Invalid index '{}'.", token.value)).at(token.span())
        })?;
        Value::Int(number)
    };
    Ok(Node::new(
        Ast::Lookup {
            value: node.boxed(),
            arguments: vec![Node::new(Ast::Value { value }, token.span())],
        },
        span,
    ))
}

fn parse_call(stream: &mut Stream, node: Node) -> ParseResult<Node> {
    let arguments = parse_arguments(
        stream,
        TokenPattern::exact("brace", ")"),
        "bolt:call_argument",
    )?;
    let span = Span::new(node.span.location, stream.location());
    Ok(Node::new(
        Ast::Call {
            value: node.boxed(),
            arguments,
        },
        span,
    ))
}

fn parse_subscript(stream: &mut Stream, node: Node) -> ParseResult<Node> {
    let mut arguments = parse_arguments(
        stream,
        TokenPattern::exact("bracket", "]"),
        "bolt:lookup_argument",
    )?;
    if arguments.is_empty() {
        let slice = Ast::Slice {
            start: None,
            stop: None,
            step: None,
        };
        arguments.push(Node::new(
            slice,
            Span::new(node.span.end_location, stream.location()),
        ));
    }
    let span = Span::new(node.span.location, stream.location());
    Ok(Node::new(
        Ast::Lookup {
            value: node.boxed(),
            arguments,
        },
        span,
    ))
}

/// Comma separated arguments up to `close`. Once a keyword argument or a dict unpacking
/// appears, positional arguments and list unpacking are rejected.
fn parse_arguments(
    stream: &mut Stream,
    close: TokenPattern<'static>,
    argument_parser: &str,
) -> ParseResult<Vec<Node>> {
    stream.ignore(NEWLINE, |stream| {
        let mut arguments = vec![];
        let mut allow_positional = true;

        while !stream.at_close(close)? {
            let argument = delegate(argument_parser, stream)?;

            match &argument.node {
                Ast::Keyword { .. }
                | Ast::Unpack {
                    kind: UnpackKind::Dict,
                    ..
                } => allow_positional = false,
                Ast::Unpack { .. } if !allow_positional => {
                    return Err(SyntaxError::invalid(
                        "List unpacking not allowed after keyword arguments.",
                    )
                    .at(argument.span));
                }
                _ if !allow_positional => {
                    return Err(SyntaxError::invalid(
                        "Positional argument not allowed after keyword arguments.",
                    )
                    .at(argument.span));
                }
                _ => {}
            }

            arguments.push(argument);

            if stream.get("comma").is_none() {
                stream.expect(close)?;
                break;
            }
        }
        Ok(arguments)
    })
}
