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

//! Wrappers that maintain the scope tables and enforce where commands may appear.

use crate::ast::Node;
use crate::parsers::{Parser, ParserRef};
use crate::scope::Mask;
use crate::stream::{Stream, provide};
use bolt_common::{ParseResult, SyntaxError};
use tracing::debug;

/// Scoping for the parts of a conditional chain.
///
/// With `mask`, names introduced since the branch point are hidden while the inner parser
/// runs so that sibling branches can't see each other's bindings. `update_before` and
/// `update_after` move the branch point to the current scope before or after the inner
/// parser runs.
pub struct BranchScopeManager {
    parser: ParserRef,
    mask: bool,
    update_before: bool,
    update_after: bool,
}

impl BranchScopeManager {
    pub fn new(parser: ParserRef) -> Self {
        Self {
            parser,
            mask: false,
            update_before: false,
            update_after: false,
        }
    }

    pub fn mask(mut self) -> Self {
        self.mask = true;
        self
    }

    pub fn update_before(mut self) -> Self {
        self.update_before = true;
        self
    }

    pub fn update_after(mut self) -> Self {
        self.update_after = true;
        self
    }
}

impl Parser for BranchScopeManager {
    fn parse(&self, stream: &mut Stream) -> ParseResult<Node> {
        let mask = if self.mask {
            stream.data.scope_mut().mask_branch()
        } else {
            Mask::default()
        };

        let mut branch_scope = stream.data.scope.branch_scope.clone();
        if self.update_before {
            branch_scope = Some(stream.data.scope.identifiers.clone());
        }

        let result = self.parser.parse(stream);

        if self.update_after {
            branch_scope = Some(stream.data.scope.identifiers.clone());
        }
        let scope = stream.data.scope_mut();
        scope.unmask(mask);
        scope.branch_scope = branch_scope;

        result
    }
}

/// Commit whatever the previous statement left pending before parsing on.
pub struct FlushPendingIdentifiersParser {
    parser: ParserRef,
}

impl FlushPendingIdentifiersParser {
    pub fn new(parser: ParserRef) -> Self {
        Self { parser }
    }
}

impl Parser for FlushPendingIdentifiersParser {
    fn parse(&self, stream: &mut Stream) -> ParseResult<Node> {
        if stream.data.scope.has_pending() {
            stream.data.scope_mut().flush_pending();
        }
        self.parser.parse(stream)
    }
}

/// Rejects `break` and `continue` outside of loop bodies.
pub struct BreakContinueConstraint {
    parser: ParserRef,
    allowed_scopes: Vec<&'static [&'static str]>,
}

impl BreakContinueConstraint {
    pub fn new(parser: ParserRef, allowed_scopes: Vec<&'static [&'static str]>) -> Self {
        Self {
            parser,
            allowed_scopes,
        }
    }
}

impl Parser for BreakContinueConstraint {
    fn parse(&self, stream: &mut Stream) -> ParseResult<Node> {
        let in_loop = stream.data.context.in_loop
            || self
                .allowed_scopes
                .iter()
                .any(|scope| *scope == stream.data.context.command_scope.as_slice());

        let node = provide(
            stream,
            |context| context.in_loop = in_loop,
            |stream| self.parser.parse(stream),
        )?;

        if !in_loop
            && let Some(command) = node.commands().iter().find(|command| {
                matches!(command.command_identifier(), Some("break" | "continue"))
            })
        {
            let name = command.command_identifier().unwrap_or_default();
            return Err(
                SyntaxError::invalid(format!("Can only use '{name}' in loops.")).at(command.span),
            );
        }
        Ok(node)
    }
}

/// Rejects commands that only make sense inside a function body.
pub struct FunctionConstraint {
    parser: ParserRef,
    command_identifiers: &'static [&'static str],
}

impl FunctionConstraint {
    pub fn new(parser: ParserRef, command_identifiers: &'static [&'static str]) -> Self {
        Self {
            parser,
            command_identifiers,
        }
    }
}

impl Parser for FunctionConstraint {
    fn parse(&self, stream: &mut Stream) -> ParseResult<Node> {
        let node = self.parser.parse(stream)?;
        if stream.data.context.function {
            return Ok(node);
        }

        for command in node.commands() {
            let Some(identifier) = command.command_identifier() else {
                continue;
            };
            if self.command_identifiers.contains(&identifier) {
                let name = identifier.split(':').next().unwrap_or(identifier);
                return Err(SyntaxError::invalid(format!(
                    "Can only use '{name}' in functions."
                ))
                .at(command.span));
            }
        }
        Ok(node)
    }
}

/// `execute if` is reserved for the host grammar's own condition syntax.
pub struct ExecuteIfConditionConstraint {
    parser: ParserRef,
}

impl ExecuteIfConditionConstraint {
    pub fn new(parser: ParserRef) -> Self {
        Self { parser }
    }
}

impl Parser for ExecuteIfConditionConstraint {
    fn parse(&self, stream: &mut Stream) -> ParseResult<Node> {
        let node = self.parser.parse(stream)?;
        if node.command_identifier() == Some("execute:if:condition:body") {
            return Err(
                SyntaxError::invalid("Can't inline conditions as execute subcommands.")
                    .at(node.span),
            );
        }
        Ok(node)
    }
}

/// When a command fails with a generic error right after an alternative stumbled on an
/// undefined identifier, report the undefined identifier instead.
pub struct UndefinedIdentifierErrorHandler {
    parser: ParserRef,
}

impl UndefinedIdentifierErrorHandler {
    pub fn new(parser: ParserRef) -> Self {
        Self { parser }
    }
}

impl Parser for UndefinedIdentifierErrorHandler {
    fn parse(&self, stream: &mut Stream) -> ParseResult<Node> {
        let error = match self.parser.parse(stream) {
            Err(error) if !error.is_undefined_identifier() => error,
            result => return result,
        };

        let position = error.location().pos;
        let promoted = error
            .undefined_alternatives()
            .find(|alternative| alternative.end_location().pos + 1 >= position)
            .cloned();

        match promoted {
            Some(alternative) => {
                debug!(
                    error = %error,
                    promoted = %alternative,
                    "reporting undefined identifier instead"
                );
                Err(alternative.with_note(error.to_string()))
            }
            None => Err(error),
        }
    }
}
