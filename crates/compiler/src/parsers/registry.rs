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

//! Wiring of every dialect parser under its registry name.

use crate::ParseOptions;
use crate::ast::UnpackKind;
use crate::database::CompilationDatabase;
use crate::host::get_host_parsers;
use crate::parsers::function::{
    FunctionRootBacktracker, parse_function_root, parse_function_signature,
};
use crate::parsers::imports::{
    GlobalNonlocalHandler, ImportLocationConstraint, ImportStatementHandler, parse_import_name,
    parse_name_list,
};
use crate::parsers::interpolation::InterpolationParser;
use crate::parsers::literal::{
    KeywordParser, LiteralParser, UnpackConstraint, UnpackParser, parse_dict_item,
    parse_identifier,
};
use crate::parsers::lookup::LookupParser;
use crate::parsers::lowering::IfElseLoweringParser;
use crate::parsers::operators::{BinaryParser, UnaryParser};
use crate::parsers::primary::PrimaryParser;
use crate::parsers::scope_managers::{
    BranchScopeManager, BreakContinueConstraint, ExecuteIfConditionConstraint,
    FlushPendingIdentifiersParser, FunctionConstraint, UndefinedIdentifierErrorHandler,
};
use crate::parsers::statement::{AssignmentTargetParser, parse_del_target, parse_statement};
use crate::parsers::{AlternativeParser, Delegate, Parser, ParserRef, Parsers};
use std::rc::Rc;

/// Dialect parsers that command arguments can refer to.
const ARGUMENT_PARSERS: &[&str] = &[
    "bolt:if_block",
    "bolt:elif_condition",
    "bolt:elif_block",
    "bolt:else_block",
    "bolt:statement",
    "bolt:assignment_target",
    "bolt:import",
    "bolt:import_name",
    "bolt:global_name",
    "bolt:nonlocal_name",
    "bolt:expression",
    "bolt:function_signature",
    "bolt:function_root",
    "bolt:del_target",
];

const LOOP_SCOPES: &[&[&str]] = &[
    &["while", "condition", "body"],
    &["for", "target", "in", "iterable", "body"],
];

const FUNCTION_COMMANDS: &[&str] = &[
    "return",
    "return:value",
    "yield",
    "yield:value",
    "yield:from:value",
    "global:subcommand",
    "nonlocal:subcommand",
];

/// Host parsers that accept an interpolated expression.
const INTERPOLATED: &[&str] = &[
    "bool",
    "numeric",
    "coordinate",
    "time",
    "word",
    "phrase",
    "greedy",
    "json",
    "json_object_entry",
    "json_array_element",
    "json_object",
    "nbt",
    "nbt_compound_entry",
    "nbt_list_or_array_element",
    "nbt_compound",
    "nbt_path",
    "range",
    "resource_location_or_tag",
    "item_slot",
    "objective",
    "objective_criteria",
    "scoreboard_slot",
    "swizzle",
    "team",
    "color",
    "sort_order",
    "gamemode",
    "message",
    "block_pos",
    "column_pos",
    "rotation",
    "vec2",
    "vec3",
    "entity",
    "score_holder",
];

fn rc(parser: impl Parser + 'static) -> ParserRef {
    Rc::new(parser)
}

fn interpolate(name: &'static str, host: ParserRef) -> Option<InterpolationParser> {
    let parser = match name {
        "bool" | "time" | "range" | "item_slot" | "scoreboard_slot" | "swizzle"
        | "sort_order" | "gamemode" => InterpolationParser::new(name, host).fallback(),
        "numeric" => InterpolationParser::new(name, host).prefix("-").fallback(),
        "coordinate" => InterpolationParser::new(name, host)
            .prefix("[~^]-?|-")
            .fallback(),
        "json_object_entry" => InterpolationParser::new("json", host).unpack(r"\*\*"),
        "json_array_element" => InterpolationParser::new("json", host).unpack(r"\*"),
        "nbt_compound_entry" => InterpolationParser::new("nbt", host).unpack(r"\*\*"),
        "nbt_list_or_array_element" => InterpolationParser::new("nbt", host).unpack(r"\*"),
        "resource_location_or_tag" => {
            InterpolationParser::new("resource_location", host).prefix("#")
        }
        "message" => InterpolationParser::new(name, host).final_(),
        "block_pos" => InterpolationParser::new("vec3", host).fallback(),
        "column_pos" | "rotation" => InterpolationParser::new("vec2", host).fallback(),
        "vec2" | "vec3" => InterpolationParser::new(name, host).fallback(),
        "score_holder" => InterpolationParser::new("entity", host),
        "word" | "phrase" | "greedy" | "json" | "json_object" | "nbt" | "nbt_compound"
        | "nbt_path" | "objective" | "objective_criteria" | "team" | "color" | "entity" => {
            InterpolationParser::new(name, host)
        }
        _ => return None,
    };
    Some(parser)
}

/// The wrappers shared by `root` and `nested_root`.
pub fn create_bolt_root_parser(parser: ParserRef) -> ParserRef {
    rc(FunctionRootBacktracker::new(rc(
        FlushPendingIdentifiersParser::new(rc(FunctionConstraint::new(
            rc(BreakContinueConstraint::new(
                rc(IfElseLoweringParser::new(parser)),
                LOOP_SCOPES.to_vec(),
            )),
            FUNCTION_COMMANDS,
        ))),
    )))
}

fn binary(operators: &[&str], operand: &'static str) -> BinaryParser {
    BinaryParser::new(operators, rc(Delegate(operand)))
}

/// The dialect parsers layered over the `host` parsers. Entries that wrap a host parser
/// are only created when the host provides it.
pub fn get_bolt_parsers(
    host: &Parsers,
    database: Rc<CompilationDatabase>,
    interpolation: bool,
) -> Parsers {
    let mut parsers = Parsers::default();

    // Commands.
    for name in ["root", "nested_root"] {
        if let Some(parser) = host.get(name) {
            parsers.insert_ref(name, create_bolt_root_parser(parser.clone()));
        }
    }
    if let Some(command) = host.get("command") {
        parsers.insert(
            "command",
            UndefinedIdentifierErrorHandler::new(rc(ImportStatementHandler::new(rc(
                GlobalNonlocalHandler::new(rc(ExecuteIfConditionConstraint::new(
                    command.clone(),
                ))),
            )))),
        );
    }
    for &name in ARGUMENT_PARSERS {
        parsers.insert(format!("command:argument:{name}"), Delegate(name));
    }

    // Blocks and statements.
    parsers.insert(
        "bolt:if_block",
        BranchScopeManager::new(rc(Delegate("nested_root"))).update_before(),
    );
    parsers.insert(
        "bolt:elif_condition",
        BranchScopeManager::new(rc(Delegate("bolt:expression")))
            .mask()
            .update_after(),
    );
    parsers.insert(
        "bolt:elif_block",
        BranchScopeManager::new(rc(Delegate("nested_root"))).mask(),
    );
    parsers.insert(
        "bolt:else_block",
        BranchScopeManager::new(rc(Delegate("nested_root"))).mask(),
    );
    parsers.insert("bolt:statement", parse_statement);
    parsers.insert(
        "bolt:assignment_target",
        AssignmentTargetParser {
            allow_undefined_identifiers: true,
            allow_multiple: true,
        },
    );
    parsers.insert(
        "bolt:augmented_assignment_target",
        AssignmentTargetParser::default(),
    );
    parsers.insert("bolt:function_signature", parse_function_signature);
    parsers.insert("bolt:function_root", parse_function_root);
    parsers.insert("bolt:del_target", parse_del_target);
    parsers.insert(
        "bolt:interpolation",
        PrimaryParser::new(rc(Delegate("bolt:identifier"))),
    );
    parsers.insert("bolt:identifier", parse_identifier);
    if let Some(location) = host.get("resource_location_or_tag") {
        parsers.insert("bolt:import", ImportLocationConstraint::new(location.clone()));
    }
    parsers.insert("bolt:import_name", parse_import_name);
    parsers.insert("bolt:global_name", parse_name_list);
    parsers.insert("bolt:nonlocal_name", parse_name_list);

    // Expressions, loosest first.
    parsers.insert("bolt:expression", Delegate("bolt:disjunction"));
    parsers.insert("bolt:disjunction", binary(&[r"\bor\b"], "bolt:conjunction"));
    parsers.insert("bolt:conjunction", binary(&[r"\band\b"], "bolt:inversion"));
    parsers.insert(
        "bolt:inversion",
        UnaryParser::new(&[r"\bnot\b"], rc(Delegate("bolt:comparison"))),
    );
    parsers.insert(
        "bolt:comparison",
        binary(
            &[
                "==",
                "!=",
                "<=",
                "<",
                ">=",
                ">",
                r"\bnot\s+in\b",
                r"\bin\b",
                r"\bis\s+not\b",
                r"\bis\b",
            ],
            "bolt:bitwise_or",
        ),
    );
    parsers.insert("bolt:bitwise_or", binary(&[r"\|(?!=)"], "bolt:bitwise_xor"));
    parsers.insert("bolt:bitwise_xor", binary(&[r"\^(?!=)"], "bolt:bitwise_and"));
    parsers.insert("bolt:bitwise_and", binary(&[r"&(?!=)"], "bolt:shift_expr"));
    parsers.insert(
        "bolt:shift_expr",
        binary(&[r"<<(?!=)", r">>(?!=)"], "bolt:sum"),
    );
    parsers.insert("bolt:sum", binary(&[r"\+(?!=)", r"-(?!=)"], "bolt:term"));
    parsers.insert(
        "bolt:term",
        binary(
            &[r"\*(?!=)", r"//(?!=)", r"/(?!=)", r"%(?!=)"],
            "bolt:factor",
        ),
    );
    parsers.insert(
        "bolt:factor",
        UnaryParser::new(&[r"\+", "-"], rc(Delegate("bolt:power"))),
    );
    parsers.insert(
        "bolt:power",
        binary(&[r"\*\*(?!=)"], "bolt:primary").right_associative(),
    );

    // Operands.
    parsers.insert(
        "bolt:lookup_argument",
        LookupParser::new(rc(Delegate("bolt:expression"))),
    );
    parsers.insert(
        "bolt:call_argument",
        AlternativeParser::new(vec![
            rc(KeywordParser::new(rc(Delegate("bolt:expression")))),
            rc(UnpackParser::new(rc(Delegate("bolt:expression")))),
            rc(Delegate("bolt:expression")),
        ]),
    );
    parsers.insert("bolt:primary", PrimaryParser::new(rc(Delegate("bolt:atom"))));
    parsers.insert(
        "bolt:atom",
        AlternativeParser::new(vec![
            rc(Delegate("bolt:identifier")),
            rc(Delegate("bolt:literal")),
        ]),
    );
    parsers.insert(
        "bolt:list_item",
        AlternativeParser::new(vec![
            rc(UnpackConstraint::new(
                UnpackKind::List,
                rc(UnpackParser::new(rc(Delegate("bolt:expression")))),
            )),
            rc(Delegate("bolt:expression")),
        ]),
    );
    parsers.insert(
        "bolt:dict_item",
        AlternativeParser::new(vec![
            rc(UnpackConstraint::new(
                UnpackKind::Dict,
                rc(UnpackParser::new(rc(Delegate("bolt:expression")))),
            )),
            rc(parse_dict_item),
        ]),
    );
    parsers.insert("bolt:literal", LiteralParser::new(database));

    // Interpolation.
    if interpolation {
        for &name in INTERPOLATED {
            if let Some(parser) = host
                .get(name)
                .and_then(|host| interpolate(name, host.clone()))
            {
                parsers.insert(name, parser);
            }
        }
    }

    parsers
}

/// The complete registry: the host grammar with the dialect layered over it.
pub fn build_parsers(options: &ParseOptions) -> Parsers {
    let database = Rc::new(CompilationDatabase::new(options.resource_location.clone()));
    let mut parsers = get_host_parsers(database.clone(), options.inline_blocks);
    let bolt = get_bolt_parsers(&parsers, database, options.interpolation);
    parsers.extend(bolt);
    parsers
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_names() {
        let parsers = build_parsers(&ParseOptions::default());
        for name in [
            "root",
            "nested_root",
            "command",
            "bolt:expression",
            "bolt:power",
            "command:argument:bolt:statement",
            "command:argument:numeric",
        ] {
            assert!(parsers.contains(name), "missing {name}");
        }
        // Only host parsers that exist get an interpolating wrapper.
        assert!(!parsers.contains("nbt_path"));
    }

    #[test]
    fn test_interpolation_table() {
        assert!(interpolate("message", rc(Delegate("message"))).is_some());
        assert!(interpolate("statement", rc(Delegate("statement"))).is_none());
    }
}
