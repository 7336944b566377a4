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

//! Statements and the targets they assign to.

use crate::ast::{AssignOp, Ast, Node};
use crate::parsers::patterns::{ASSIGNMENT_PATTERN, IDENTIFIER_PATTERN, PLAIN_ASSIGNMENT_PATTERN};
use crate::parsers::{Parser, delegate};
use crate::scope::Storage;
use crate::stream::Stream;
use bolt_common::tokenstream::{EOF, NEWLINE};
use bolt_common::{ParseResult, Span, SyntaxError, TokenPattern};
use std::str::FromStr;

const LINE_END: [TokenPattern<'static>; 2] = [TokenPattern::kind(NEWLINE), TokenPattern::kind(EOF)];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StatementForm {
    AugmentedAssignment,
    Assignment,
    Expression,
}

impl StatementForm {
    fn parser(self) -> &'static str {
        match self {
            StatementForm::AugmentedAssignment => "bolt:augmented_assignment_target",
            StatementForm::Assignment => "bolt:assignment_target",
            StatementForm::Expression => "bolt:expression",
        }
    }

    fn assignment_pattern(self) -> &'static str {
        match self {
            StatementForm::Assignment => PLAIN_ASSIGNMENT_PATTERN,
            _ => ASSIGNMENT_PATTERN,
        }
    }
}

/// An assignment, an augmented assignment, or a bare expression, alone on its line.
pub fn parse_statement(stream: &mut Stream) -> ParseResult<Node> {
    stream.choose(
        &[
            StatementForm::AugmentedAssignment,
            StatementForm::Assignment,
            StatementForm::Expression,
        ],
        |stream, form| {
            if stream.data.scope.has_pending() {
                stream.data.scope_mut().clear_pending();
            }
            let node = delegate(form.parser(), stream)?;
            let node = parse_assignment(stream, node, form)?;
            check_final_expression(stream)?;
            Ok(node)
        },
    )
}

fn parse_assignment(stream: &mut Stream, node: Node, form: StatementForm) -> ParseResult<Node> {
    let pattern = form.assignment_pattern();

    if node.is_target() {
        let operator = stream.syntax(&[("assignment", Some(pattern))], |stream| {
            stream.expect("assignment")
        })?;
        let value = parse_assigned_value(stream)?;
        stream.data.scope_mut().flush_pending();
        return assignment(&operator.value, node, value, operator.span());
    }

    if !matches!(node.node, Ast::Attribute { .. } | Ast::Lookup { .. }) {
        return Ok(node);
    }
    let Some(operator) = stream.syntax(&[("assignment", Some(pattern))], |stream| {
        Ok(stream.get("assignment"))
    })?
    else {
        return Ok(node);
    };

    let value = delegate("bolt:expression", stream)?;
    let span = node.span;
    let target = match node.node {
        Ast::Attribute { value, name } => Ast::TargetAttribute { name, value },
        Ast::Lookup { value, arguments } => Ast::TargetItem { value, arguments },
        other => other,
    };
    assignment(&operator.value, Node::new(target, span), value, operator.span())
}

fn assignment(operator: &str, target: Node, value: Node, operator_span: Span) -> ParseResult<Node> {
    let operator = AssignOp::from_str(operator).map_err(|_| {
        SyntaxError::invalid(format!("Unknown operator '{operator}'.")).at(operator_span)
    })?;
    let span = target.span.to(value.span);
    Ok(Node::new(
        Ast::Assignment {
            operator,
            target: target.boxed(),
            value: value.boxed(),
        },
        span,
    ))
}

/// The right-hand side of an assignment. A comma separated list without brackets is a
/// tuple, so that `a, b = 1, 2` reads naturally.
fn parse_assigned_value(stream: &mut Stream) -> ParseResult<Node> {
    let first = delegate("bolt:expression", stream)?;
    stream.syntax(&[("comma", Some(","))], |stream| {
        if !stream.peek_is(&[TokenPattern::kind("comma")]) {
            return Ok(first);
        }
        let location = first.span.location;
        let mut items = vec![first];
        while stream.get("comma").is_some() {
            if stream.peek_is(&LINE_END) {
                break;
            }
            items.push(delegate("bolt:expression", stream)?);
        }
        Ok(Node::new(
            Ast::Tuple { items },
            Span::new(location, stream.location()),
        ))
    })
}

/// Fail unless the rest of the line is empty. The stream position is left unchanged.
pub fn check_final_expression(stream: &mut Stream) -> ParseResult<()> {
    let mark = stream.mark();
    if stream.consume_line_continuation() {
        let token = stream.peek();
        stream.reset(mark);
        return Err(
            SyntaxError::invalid("Invalid indent following final expression.").at(token.span()),
        );
    }

    let token = stream.intercept(NEWLINE, |stream| Ok(stream.peek()))?;
    if !token.matches_any(&LINE_END) {
        return Err(
            SyntaxError::invalid("Trailing input following final expression.").at(token.span()),
        );
    }
    Ok(())
}

/// Names on the left of an assignment.
///
/// Plain assignment accepts new names, which become pending locals of the statement, and
/// comma separated lists of them. Augmented assignment only accepts names that are already
/// writable here.
#[derive(Debug, Clone, Copy, Default)]
pub struct AssignmentTargetParser {
    pub allow_undefined_identifiers: bool,
    pub allow_multiple: bool,
}

impl Parser for AssignmentTargetParser {
    fn parse(&self, stream: &mut Stream) -> ParseResult<Node> {
        let mut targets = stream.syntax(
            &[
                ("identifier", Some(IDENTIFIER_PATTERN.as_str())),
                ("comma", Some(",")),
            ],
            |stream| {
                let mut targets = vec![];
                loop {
                    let token = stream.expect("identifier")?;
                    let scope = &stream.data.scope;
                    let is_defined = scope.is_defined(&token.value);
                    let with_storage = scope.storage(&token.value).is_some();
                    let rebind = is_defined && with_storage;

                    if self.allow_undefined_identifiers {
                        let scope = stream.data.scope_mut();
                        scope.pending_identifiers.insert(token.value.clone());
                        if !with_storage {
                            scope
                                .pending_identifiers_storage
                                .insert(token.value.clone(), Storage::Local);
                        }
                    } else if !rebind {
                        let mut error = SyntaxError::undefined_identifier(
                            &token,
                            scope.identifiers_storage.keys(),
                        );
                        if is_defined {
                            error = error.with_note(format!(
                                "Use 'global {name}' or 'nonlocal {name}' to mutate the variable defined in outer scope.",
                                name = token.value
                            ));
                        }
                        return Err(error);
                    }

                    targets.push(Node::new(
                        Ast::TargetIdentifier {
                            value: token.value.clone(),
                            rebind,
                        },
                        token.span(),
                    ));

                    if !self.allow_multiple || stream.get("comma").is_none() {
                        return Ok(targets);
                    }
                }
            },
        )?;

        if targets.len() == 1 {
            return Ok(targets.remove(0));
        }
        let span = targets[0].span.to(targets[targets.len() - 1].span);
        Ok(Node::new(Ast::TargetUnpack { targets }, span))
    }
}

/// The operand of `del`.
pub fn parse_del_target(stream: &mut Stream) -> ParseResult<Node> {
    let node = delegate("bolt:expression", stream)?;
    let span = node.span;
    let target = match node.node {
        Ast::Identifier { value } => Ast::TargetIdentifier {
            value,
            rebind: false,
        },
        Ast::Attribute { value, name } => Ast::TargetAttribute { name, value },
        Ast::Lookup { value, arguments } => Ast::TargetItem { value, arguments },
        _ => {
            return Err(SyntaxError::invalid(
                "Can only delete variables, attributes, or subscripted items.",
            )
            .at(span));
        }
    };
    Ok(Node::new(target, span))
}
