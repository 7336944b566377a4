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

//! Imports, and the `global` / `nonlocal` declarations.

use crate::ast::{Ast, Node};
use crate::parsers::patterns::{IDENTIFIER_PATTERN, is_module_path};
use crate::parsers::{Parser, ParserRef, delegate};
use crate::scope::Storage;
use crate::stream::Stream;
use bolt_common::{ParseResult, SyntaxError};

/// Only dotted module names and namespaced locations can be imported.
pub struct ImportLocationConstraint {
    parser: ParserRef,
}

impl ImportLocationConstraint {
    pub fn new(parser: ParserRef) -> Self {
        Self { parser }
    }
}

impl Parser for ImportLocationConstraint {
    fn parse(&self, stream: &mut Stream) -> ParseResult<Node> {
        let node = self.parser.parse(stream)?;
        if let Ast::ResourceLocation {
            namespace,
            path,
            is_tag,
        } = &node.node
            && (*is_tag || (namespace.is_none() && !is_module_path(path)))
        {
            return Err(SyntaxError::invalid(format!(
                "Invalid module location '{}'.",
                location_value(namespace.as_deref(), path, *is_tag)
            ))
            .at(node.span));
        }
        Ok(node)
    }
}

fn location_value(namespace: Option<&str>, path: &str, is_tag: bool) -> String {
    let tag = if is_tag { "#" } else { "" };
    match namespace {
        Some(namespace) => format!("{tag}{namespace}:{path}"),
        None => format!("{tag}{path}"),
    }
}

/// Binds the names introduced by `import` and `from ... import` commands.
pub struct ImportStatementHandler {
    parser: ParserRef,
}

impl ImportStatementHandler {
    pub fn new(parser: ParserRef) -> Self {
        Self { parser }
    }
}

impl Parser for ImportStatementHandler {
    fn parse(&self, stream: &mut Stream) -> ParseResult<Node> {
        let node = self.parser.parse(stream)?;
        let Ast::Command {
            identifier,
            arguments,
        } = &node.node
        else {
            return Ok(node);
        };
        let scope = stream.data.scope_mut();

        match identifier.as_str() {
            "import:module" => {
                if let Some(Node {
                    node:
                        Ast::ResourceLocation {
                            namespace, path, ..
                        },
                    span,
                }) = arguments.first()
                {
                    if let Some(namespace) = namespace {
                        return Err(SyntaxError::invalid(format!(
                            "Can't import '{namespace}:{path}' without alias."
                        ))
                        .at(*span));
                    }
                    let root = path.split('.').next().unwrap_or(path);
                    scope.identifiers.insert(root.to_string());
                }
            }
            "import:module:as:alias" => {
                if let Some(Node {
                    node: Ast::ImportedIdentifier { value },
                    ..
                }) = arguments.get(1)
                {
                    scope.bind_local(value);
                }
            }
            "from:module:import:subcommand" => {
                let mut subcommand = arguments.get(1);
                while let Some(Node {
                    node:
                        Ast::Command {
                            identifier,
                            arguments,
                        },
                    ..
                }) = subcommand
                {
                    if let Some(Node {
                        node: Ast::ImportedIdentifier { value },
                        ..
                    }) = arguments.first()
                    {
                        scope.bind_local(value);
                    }
                    subcommand = match identifier.as_str() {
                        "from:module:import:name:subcommand" => arguments.get(1),
                        _ => None,
                    };
                }
            }
            _ => {}
        }

        Ok(node)
    }
}

/// One name of an import list, with its trailing comma.
pub fn parse_import_name(stream: &mut Stream) -> ParseResult<Node> {
    stream.syntax(
        &[
            ("name", Some(IDENTIFIER_PATTERN.as_str())),
            ("comma", Some(",")),
        ],
        |stream| {
            let token = stream.expect("name")?;
            stream.get("comma");
            Ok(Node::new(
                Ast::ImportedIdentifier {
                    value: token.value.clone(),
                },
                token.span(),
            ))
        },
    )
}

/// Records the storage declared by `global` and `nonlocal` commands.
pub struct GlobalNonlocalHandler {
    parser: ParserRef,
}

impl GlobalNonlocalHandler {
    pub fn new(parser: ParserRef) -> Self {
        Self { parser }
    }
}

impl Parser for GlobalNonlocalHandler {
    fn parse(&self, stream: &mut Stream) -> ParseResult<Node> {
        let node = self.parser.parse(stream)?;
        let (storage, chain) = match node.command_identifier() {
            Some("global:subcommand") => (Storage::Global, "global:name:subcommand"),
            Some("nonlocal:subcommand") => (Storage::Nonlocal, "nonlocal:name:subcommand"),
            _ => return Ok(node),
        };

        let mut subcommand = match &node.node {
            Ast::Command { arguments, .. } => arguments.first(),
            _ => None,
        };
        while let Some(Node {
            node:
                Ast::Command {
                    identifier,
                    arguments,
                },
            ..
        }) = subcommand
        {
            if let Some(Node {
                node: Ast::Identifier { value },
                span,
            }) = arguments.first()
            {
                let existing = *stream
                    .data
                    .scope_mut()
                    .identifiers_storage
                    .entry(value.clone())
                    .or_insert(storage);
                if existing != storage {
                    return Err(SyntaxError::invalid(format!(
                        "Can't make {existing} identifier {storage}."
                    ))
                    .at(*span));
                }
            }
            subcommand = if identifier == chain {
                arguments.get(1)
            } else {
                None
            };
        }

        Ok(node)
    }
}

/// One name of a `global` or `nonlocal` list, with its trailing comma.
pub fn parse_name_list(stream: &mut Stream) -> ParseResult<Node> {
    let node = delegate("bolt:identifier", stream)?;
    stream.syntax(&[("comma", Some(","))], |stream| {
        stream.get("comma");
        Ok(())
    })?;
    Ok(node)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_value() {
        assert_eq!(location_value(Some("demo"), "foo", true), "#demo:foo");
        assert_eq!(location_value(None, "a.b", false), "a.b");
    }
}
