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

//! Helpers for tests that parse whole units and pick the result apart.

use crate::ast::{Ast, Node};
use crate::{ParseOptions, parse_source};
use bolt_common::SyntaxError;

/// Parse with the default options and the given names predefined.
pub fn parse_with_builtins(source: &str, builtins: &[&str]) -> Result<Node, SyntaxError> {
    let options = ParseOptions {
        builtins: builtins.iter().map(|name| name.to_string()).collect(),
        ..Default::default()
    };
    parse_source(source, &options)
}

/// Parse with default options, panicking with the rendered error on failure.
pub fn parse_ok(source: &str) -> Node {
    match parse_source(source, &ParseOptions::default()) {
        Ok(node) => node,
        Err(e) => panic!("failed to parse {source:?}: {e} at {}", e.location()),
    }
}

/// The error `source` fails with, given the predefined `builtins`.
pub fn parse_error(source: &str, builtins: &[&str]) -> SyntaxError {
    match parse_with_builtins(source, builtins) {
        Ok(node) => panic!("expected {source:?} to fail, got {node:#?}"),
        Err(e) => e,
    }
}

/// The identifiers of the top level commands of a root.
pub fn command_identifiers(root: &Node) -> Vec<&str> {
    root.commands()
        .iter()
        .filter_map(Node::command_identifier)
        .collect()
}

/// The arguments of a command node.
pub fn arguments(command: &Node) -> &[Node] {
    match &command.node {
        Ast::Command { arguments, .. } => arguments,
        _ => &[],
    }
}

/// The node of the first statement command of a root.
pub fn first_statement(root: &Node) -> &Ast {
    let statement = root
        .commands()
        .iter()
        .find(|command| command.command_identifier() == Some("statement"))
        .and_then(|command| arguments(command).first());
    match statement {
        Some(node) => &node.node,
        None => panic!("no statement in {root:#?}"),
    }
}
