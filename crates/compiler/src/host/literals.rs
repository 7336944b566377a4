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

//! Primitive argument parsers of the host grammar.

use crate::ast::{Ast, Node, Value};
use crate::database::CompilationDatabase;
use crate::parsers::{Delegate, Parser, Parsers, delegate};
use crate::stream::Stream;
use bolt_common::{ParseResult, Span, SyntaxError, Token};
use std::rc::Rc;

/// A single token argument.
pub struct PatternParser {
    kind: &'static str,
    pattern: &'static str,
    convert: fn(&'static str, &Token) -> ParseResult<Ast>,
}

impl PatternParser {
    pub const fn new(
        kind: &'static str,
        pattern: &'static str,
        convert: fn(&'static str, &Token) -> ParseResult<Ast>,
    ) -> Self {
        Self {
            kind,
            pattern,
            convert,
        }
    }
}

impl Parser for PatternParser {
    fn parse(&self, stream: &mut Stream) -> ParseResult<Node> {
        let token = stream.syntax(&[(self.kind, Some(self.pattern))], |stream| {
            stream.expect(self.kind)
        })?;
        let node = (self.convert)(self.kind, &token)?;
        Ok(Node::new(node, token.span()))
    }
}

fn host_literal(kind: &'static str, token: &Token) -> ParseResult<Ast> {
    Ok(Ast::HostLiteral {
        parser: kind.to_string(),
        text: token.value.clone(),
    })
}

fn number(_: &'static str, token: &Token) -> ParseResult<Ast> {
    let value = Value::from_number(&token.value).ok_or_else(|| {
        SyntaxError::invalid(format!("Invalid number '{}'.", token.value)).at(token.span())
    })?;
    Ok(Ast::Value { value })
}

fn boolean(_: &'static str, token: &Token) -> ParseResult<Ast> {
    Ok(Ast::Value {
        value: Value::Bool(token.value == "true"),
    })
}

/// Whitespace separated components, each parsed by `component`.
pub struct VectorParser {
    size: usize,
    component: &'static str,
}

impl VectorParser {
    pub fn new(size: usize, component: &'static str) -> Self {
        Self { size, component }
    }
}

impl Parser for VectorParser {
    fn parse(&self, stream: &mut Stream) -> ParseResult<Node> {
        let mut components = Vec::with_capacity(self.size);
        for _ in 0..self.size {
            components.push(delegate(self.component, stream)?);
        }
        let span = match (components.first(), components.last()) {
            (Some(first), Some(last)) => first.span.to(last.span),
            _ => Span::new(stream.location(), stream.location()),
        };
        Ok(Node::new(Ast::Vector { components }, span))
    }
}

/// `namespace:path`, a bare path, a `#tag`, or a `./` / `../` path relative to the unit being
/// parsed.
pub struct ResourceLocationParser {
    database: Rc<CompilationDatabase>,
}

impl ResourceLocationParser {
    pub fn new(database: Rc<CompilationDatabase>) -> Self {
        Self { database }
    }
}

const RESOURCE_LOCATION_OR_TAG: &str =
    r"#?(?:\.\./|\./|[0-9a-z_\-\.]+:)?[0-9a-z_\-\./]+";

impl Parser for ResourceLocationParser {
    fn parse(&self, stream: &mut Stream) -> ParseResult<Node> {
        let token = stream.syntax(
            &[("resource_location", Some(RESOURCE_LOCATION_OR_TAG))],
            |stream| stream.expect("resource_location"),
        )?;

        let (is_tag, value) = match token.value.strip_prefix('#') {
            Some(value) => (true, value),
            None => (false, token.value.as_str()),
        };
        let node = if value.starts_with("./") || value.starts_with("../") {
            let resolved = self
                .database
                .resolve_relative_location(value, token.span())?;
            Ast::resource_location(&resolved, is_tag)
        } else {
            Ast::resource_location(value, is_tag)
        };
        Ok(Node::new(node, token.span()))
    }
}

/// Every primitive argument parser, registered under its name and as a command argument.
pub fn register(parsers: &mut Parsers, database: Rc<CompilationDatabase>) {
    let patterns = [
        PatternParser::new("bool", r"\b(?:true|false)\b", boolean),
        PatternParser::new("numeric", r"-?(?:\d+(?:\.\d+)?|\.\d+)\b", number),
        PatternParser::new("coordinate", r"[~^]-?(?:\d*\.)?\d+|[~^]|-?(?:\d*\.)?\d+", host_literal),
        PatternParser::new("word", r"[a-zA-Z0-9_\.\+\-]+", host_literal),
        PatternParser::new("greedy", r"\S.*", host_literal),
        PatternParser::new("message", r"\S.*", host_literal),
        PatternParser::new(
            "entity",
            r"@[aeprs](?:\[[^\]\n]*\])?|[a-zA-Z0-9_\.\-]+",
            host_literal,
        ),
        PatternParser::new("objective", r"[a-zA-Z0-9_\.\+\-]+", host_literal),
    ];

    let mut names = vec![];
    for parser in patterns {
        names.push(parser.kind);
        parsers.insert(parser.kind, parser);
    }
    parsers.insert("vec3", VectorParser::new(3, "coordinate"));
    parsers.insert(
        "resource_location_or_tag",
        ResourceLocationParser::new(database),
    );
    names.extend(["vec3", "resource_location_or_tag", "nested_root"]);

    for name in names {
        parsers.insert(format!("command:argument:{name}"), Delegate(name));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bolt_common::SourceLocation;

    fn token(value: &str) -> Token {
        Token {
            kind: "numeric",
            value: value.to_string(),
            location: SourceLocation::new(0, 1, 1),
            end_location: SourceLocation::new(value.len(), 1, value.len() + 1),
        }
    }

    #[test]
    fn test_number() {
        assert_eq!(
            number("numeric", &token("-3")).unwrap(),
            Ast::Value {
                value: Value::Int(-3)
            }
        );
        assert_eq!(
            number("numeric", &token("2.5")).unwrap(),
            Ast::Value {
                value: Value::Float(2.5)
            }
        );
    }

    #[test]
    fn test_host_literal() {
        assert_eq!(
            host_literal("entity", &token("@s")).unwrap(),
            Ast::HostLiteral {
                parser: "entity".into(),
                text: "@s".into()
            }
        );
    }
}
