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

//! The commands understood by the host grammar, dialect commands included.

use crate::host::command::{CommandTree, Element, ROOT_SCOPE};
use Element::{Argument, Literal, Subcommand};
use lazy_static::lazy_static;

lazy_static! {
    pub static ref COMMAND_TREE: CommandTree = mk_command_tree();
}

const fn arg(name: &'static str, parser: &'static str) -> Element {
    Argument { name, parser }
}

const fn sub(scope: &'static str) -> Element {
    Subcommand { scope }
}

fn mk_command_tree() -> CommandTree {
    let mut tree = CommandTree::default();

    // Host commands.
    tree.add(ROOT_SCOPE, vec![Literal("say"), arg("message", "message")]);
    tree.add(
        ROOT_SCOPE,
        vec![Literal("function"), arg("name", "resource_location_or_tag")],
    );
    tree.add(
        ROOT_SCOPE,
        vec![
            Literal("tp"),
            arg("target", "entity"),
            arg("destination", "vec3"),
        ],
    );
    tree.add(
        ROOT_SCOPE,
        vec![
            Literal("scoreboard"),
            Literal("players"),
            Literal("set"),
            arg("targets", "entity"),
            arg("objective", "objective"),
            arg("score", "numeric"),
        ],
    );
    tree.add(
        ROOT_SCOPE,
        vec![Literal("execute"), Literal("run"), sub(ROOT_SCOPE)],
    );
    tree.add(
        ROOT_SCOPE,
        vec![
            Literal("execute"),
            Literal("if"),
            arg("condition", "bolt:expression"),
            arg("body", "nested_root"),
        ],
    );

    // Control flow.
    tree.add(
        ROOT_SCOPE,
        vec![
            Literal("if"),
            arg("condition", "bolt:expression"),
            arg("body", "bolt:if_block"),
        ],
    );
    tree.add(
        ROOT_SCOPE,
        vec![
            Literal("elif"),
            arg("condition", "bolt:elif_condition"),
            arg("body", "bolt:elif_block"),
        ],
    );
    tree.add(
        ROOT_SCOPE,
        vec![Literal("else"), arg("body", "bolt:else_block")],
    );
    tree.add(
        ROOT_SCOPE,
        vec![
            Literal("while"),
            arg("condition", "bolt:expression"),
            arg("body", "nested_root"),
        ],
    );
    tree.add(
        ROOT_SCOPE,
        vec![
            Literal("for"),
            arg("target", "bolt:assignment_target"),
            Literal("in"),
            arg("iterable", "bolt:expression"),
            arg("body", "nested_root"),
        ],
    );
    tree.add(ROOT_SCOPE, vec![Literal("break")]);
    tree.add(ROOT_SCOPE, vec![Literal("continue")]);

    // Functions.
    tree.add(
        ROOT_SCOPE,
        vec![
            Literal("def"),
            arg("function", "bolt:function_signature"),
            arg("body", "bolt:function_root"),
        ],
    );
    tree.add(ROOT_SCOPE, vec![Literal("return")]);
    tree.add(
        ROOT_SCOPE,
        vec![Literal("return"), arg("value", "bolt:expression")],
    );
    tree.add(ROOT_SCOPE, vec![Literal("yield")]);
    tree.add(
        ROOT_SCOPE,
        vec![Literal("yield"), arg("value", "bolt:expression")],
    );
    tree.add(
        ROOT_SCOPE,
        vec![
            Literal("yield"),
            Literal("from"),
            arg("value", "bolt:expression"),
        ],
    );

    // Names.
    tree.add(
        ROOT_SCOPE,
        vec![Literal("del"), arg("target", "bolt:del_target")],
    );
    tree.add(
        ROOT_SCOPE,
        vec![Literal("import"), arg("module", "bolt:import")],
    );
    tree.add(
        ROOT_SCOPE,
        vec![
            Literal("import"),
            arg("module", "bolt:import"),
            Literal("as"),
            arg("alias", "bolt:import_name"),
        ],
    );
    tree.add(
        ROOT_SCOPE,
        vec![
            Literal("from"),
            arg("module", "bolt:import"),
            Literal("import"),
            sub("from:module:import"),
        ],
    );
    tree.add(
        "from:module:import",
        vec![arg("name", "bolt:import_name")],
    );
    tree.add(
        "from:module:import",
        vec![arg("name", "bolt:import_name"), sub("from:module:import")],
    );
    for storage in ["global", "nonlocal"] {
        let parser = if storage == "global" {
            "bolt:global_name"
        } else {
            "bolt:nonlocal_name"
        };
        tree.add(ROOT_SCOPE, vec![Literal(storage), sub(storage)]);
        tree.add(storage, vec![arg("name", parser)]);
        tree.add(storage, vec![arg("name", parser), sub(storage)]);
    }

    // Anything else is a statement.
    tree.add(ROOT_SCOPE, vec![arg("statement", "bolt:statement")]);

    tree
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_identifiers() {
        let identifiers: Vec<&str> = COMMAND_TREE
            .prototypes("global")
            .iter()
            .map(|p| p.identifier.as_str())
            .collect();
        assert_eq!(identifiers, vec!["global:name", "global:name:subcommand"]);

        assert!(
            COMMAND_TREE
                .prototypes(ROOT_SCOPE)
                .iter()
                .any(|p| p.identifier == "for:target:in:iterable:body")
        );
        assert!(
            COMMAND_TREE
                .prototypes(ROOT_SCOPE)
                .iter()
                .any(|p| p.identifier == "statement")
        );
    }
}
