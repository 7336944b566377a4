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

//! The parsing core of the bolt scripting dialect.
//!
//! Bolt statements live inside a line-oriented host command grammar. Both grammars are
//! assembled at runtime into one registry of named parsers, which drives a lazily lexed
//! token stream. Parsing a source file produces a [`Node`] tree with every `elif` chain
//! lowered and every function body parsed.

pub mod ast;
pub mod database;
pub mod diagnostics;
pub mod host;
pub mod parsers;
pub mod scope;
pub mod stream;
pub mod testing;
pub mod unquote;

#[cfg(test)]
mod parse_tests;

pub use crate::ast::{AssignOp, Ast, BinaryOp, Node, UnaryOp, UnpackKind, Value};
pub use crate::database::CompilationDatabase;
pub use crate::diagnostics::{
    DiagnosticRenderOptions, DiagnosticVerbosity, emit_syntax_error, format_syntax_error,
};
pub use crate::parsers::registry::{build_parsers, get_bolt_parsers};
pub use crate::scope::{Scope, Storage};
pub use bolt_common::{ParseResult, SourceLocation, Span, SyntaxError, SyntaxErrorKind};

use crate::parsers::delegate;
use crate::stream::{ParseData, Stream};
use serde::{Deserialize, Serialize};
use std::rc::Rc;
use tracing::debug;

/// Options for parsing a single unit of source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    /// Resource location of the unit, used to resolve `./` and `../` locations.
    pub resource_location: Option<String>,
    /// Names readable before the first statement.
    pub builtins: Vec<String>,
    /// Whether primitive command arguments may be replaced by expressions.
    pub interpolation: bool,
    /// Whether a block may consist of a single command on the line of its `:`.
    pub inline_blocks: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            resource_location: None,
            builtins: vec![],
            interpolation: true,
            inline_blocks: true,
        }
    }
}

/// Parse `source` into a root node.
pub fn parse_source(source: &str, options: &ParseOptions) -> ParseResult<Node> {
    parse_with_scope(source, options).map(|(node, _)| node)
}

/// Parse `source`, also returning the scope tables as they stand at the end of the unit.
pub fn parse_with_scope(source: &str, options: &ParseOptions) -> ParseResult<(Node, Scope)> {
    let parsers = Rc::new(build_parsers(options));
    let scope = Scope::with_identifiers(options.builtins.iter().cloned());
    let mut stream = Stream::new(source, ParseData::new(parsers, scope));

    debug!(
        bytes = source.len(),
        resource_location = ?options.resource_location,
        "parsing unit"
    );
    let node = delegate("root", &mut stream)?;
    Ok((node, Rc::unwrap_or_clone(stream.data.scope)))
}
