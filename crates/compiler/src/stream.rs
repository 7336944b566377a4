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

//! The token stream specialised for bolt: parser registry, scope tables and the context
//! flags that parsers hand down to the parsers they call.

use crate::parsers::Parsers;
use crate::scope::Scope;
use bolt_common::{ParseResult, TokenStream};
use std::fmt::Debug;
use std::rc::Rc;

pub type Stream = TokenStream<ParseData>;

/// Flags set by a parser for the duration of the parsers it calls.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Context {
    /// Inside a loop body; `break` and `continue` are allowed.
    pub in_loop: bool,
    /// Inside a function body; `return`, `yield`, `global` and `nonlocal` are allowed.
    pub function: bool,
    /// Parsing a subscript; bare resource locations are disabled.
    pub bolt_lookup: bool,
    /// Parsing a format string; bare resource locations are disabled.
    pub bolt_format_string: bool,
    /// Element names of the command being parsed, up to the current argument.
    pub command_scope: Vec<&'static str>,
}

/// What the bolt parsers carry on the stream. Cloned on every checkpoint, so the scope
/// tables are shared until an alternative writes to them.
#[derive(Clone)]
pub struct ParseData {
    pub parsers: Rc<Parsers>,
    pub scope: Rc<Scope>,
    pub context: Context,
}

impl ParseData {
    pub fn new(parsers: Rc<Parsers>, scope: Scope) -> Self {
        Self {
            parsers,
            scope: Rc::new(scope),
            context: Context::default(),
        }
    }

    /// Write access to the scope tables, unsharing them from any checkpoint first.
    pub fn scope_mut(&mut self) -> &mut Scope {
        Rc::make_mut(&mut self.scope)
    }
}

impl Debug for ParseData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParseData")
            .field("scope", &self.scope)
            .field("context", &self.context)
            .finish_non_exhaustive()
    }
}

/// Run `f` with context flags adjusted by `set`, restoring them afterwards.
pub fn provide<T>(
    stream: &mut Stream,
    set: impl FnOnce(&mut Context),
    f: impl FnOnce(&mut Stream) -> ParseResult<T>,
) -> ParseResult<T> {
    let saved = stream.data.context.clone();
    set(&mut stream.data.context);
    let result = f(stream);
    stream.data.context = saved;
    result
}

/// Run `f` with a different set of readable identifiers, restoring the current set
/// afterwards.
pub fn with_identifiers<T>(
    stream: &mut Stream,
    identifiers: std::collections::HashSet<String>,
    f: impl FnOnce(&mut Stream) -> ParseResult<T>,
) -> ParseResult<T> {
    let saved = std::mem::replace(&mut stream.data.scope_mut().identifiers, identifiers);
    let result = f(stream);
    stream.data.scope_mut().identifiers = saved;
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stream() -> Stream {
        Stream::new(
            "x",
            ParseData::new(Rc::new(Parsers::default()), Scope::with_identifiers(["a"])),
        )
    }

    #[test]
    fn test_checkpoints_share_scope_until_written() {
        let mut stream = stream();
        let checkpoint = stream.checkpoint();
        assert_eq!(Rc::strong_count(&stream.data.scope), 2);

        stream.data.scope_mut().bind_local("b");
        assert_eq!(Rc::strong_count(&stream.data.scope), 1);

        stream.rollback(checkpoint);
        assert!(stream.data.scope.is_defined("a"));
        assert!(!stream.data.scope.is_defined("b"));
    }

    #[test]
    fn test_with_identifiers_restores_the_readable_names() {
        let mut stream = stream();
        let inner = with_identifiers(&mut stream, ["z".to_string()].into(), |stream| {
            Ok(stream.data.scope.sorted_identifiers().join(","))
        })
        .unwrap();
        assert_eq!(inner, "z");
        assert_eq!(stream.data.scope.sorted_identifiers(), vec!["a"]);
    }
}
