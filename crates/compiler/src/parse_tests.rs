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

use crate::ast::{AssignOp, Ast, BinaryOp, Node, Value};
use crate::scope::Storage;
use crate::testing::{
    arguments, command_identifiers, first_statement, parse_error, parse_ok, parse_with_builtins,
};
use crate::{ParseOptions, parse_source, parse_with_scope};
use itertools::Itertools;
use pretty_assertions::assert_eq;
use test_case::test_case;
use unindent::unindent;

/// Compact prefix rendering of an expression, for shape assertions.
fn render(node: &Node) -> String {
    match &node.node {
        Ast::Identifier { value } => value.clone(),
        Ast::Value { value } => value.to_string(),
        Ast::Binary {
            operator,
            left,
            right,
        } => format!("({operator} {} {})", render(left), render(right)),
        Ast::Unary { operator, value } => format!("({operator} {})", render(value)),
        Ast::Tuple { items } => format!("(tuple {})", items.iter().map(render).join(" ")),
        Ast::Call { value, arguments } => format!(
            "(call {} {})",
            render(value),
            arguments.iter().map(render).join(" ")
        ),
        Ast::Attribute { value, name } => format!("(. {} {name})", render(value)),
        Ast::Lookup { value, arguments } => format!(
            "([] {} {})",
            render(value),
            arguments.iter().map(render).join(" ")
        ),
        Ast::Slice { start, stop, step } => {
            let part = |p: &Option<Box<Node>>| p.as_deref().map_or("_".to_string(), render);
            format!("(slice {} {} {})", part(start), part(stop), part(step))
        }
        Ast::Keyword { name, value } => format!("({name}= {})", render(value)),
        Ast::Unpack { kind, value } => format!("(unpack-{kind} {})", render(value)),
        Ast::TargetIdentifier { value, .. } => value.clone(),
        Ast::TargetUnpack { targets } => {
            format!("(targets {})", targets.iter().map(render).join(" "))
        }
        Ast::Assignment {
            operator,
            target,
            value,
        } => format!("({operator} {} {})", render(target), render(value)),
        other => format!("{other:?}"),
    }
}

fn statement(source: &str, builtins: &[&str]) -> String {
    let root = match parse_with_builtins(source, builtins) {
        Ok(root) => root,
        Err(e) => panic!("failed to parse {source:?}: {e}"),
    };
    let command = &root.commands()[0];
    assert_eq!(command.command_identifier(), Some("statement"));
    render(&arguments(command)[0])
}

#[test]
fn test_assignment_scenario() {
    let (root, scope) = parse_with_scope("x = 1 + 2 * 3", &ParseOptions::default()).unwrap();
    let Ast::Assignment {
        operator,
        target,
        value,
    } = first_statement(&root)
    else {
        panic!("expected an assignment in {root:#?}");
    };
    assert_eq!(*operator, AssignOp::Assign);
    assert_eq!(
        target.node,
        Ast::TargetIdentifier {
            value: "x".into(),
            rebind: false
        }
    );
    assert_eq!(render(value), "(+ 1 (* 2 3))");

    assert!(scope.is_defined("x"));
    assert_eq!(scope.storage("x"), Some(Storage::Local));
    assert!(scope.pending_identifiers.is_empty());
    assert!(scope.pending_identifiers_storage.is_empty());
}

#[test]
fn test_chained_assignment_is_rejected() {
    let error = parse_error("a = b = c = 0", &["a", "b", "c"]);
    assert_eq!(error.to_string(), "Trailing input following final expression.");
    assert_eq!(error.location().colno, 7);

    let root = parse_ok("a = 0\na += 1");
    let Ast::Assignment {
        operator, target, ..
    } = &arguments(&root.commands()[1])[0].node
    else {
        panic!("expected an augmented assignment");
    };
    assert_eq!(*operator, AssignOp::Add);
    assert_eq!(
        target.node,
        Ast::TargetIdentifier {
            value: "a".into(),
            rebind: true
        }
    );
}

#[test]
fn test_augmented_assignment_of_undefined_name() {
    let error = parse_error("x += 1", &[]);
    assert_eq!(error.to_string(), "Identifier 'x' is not defined.");
    assert_eq!(error.location().pos, 0);

    let error = parse_error("counter = 0\ncountr += 1", &[]);
    assert_eq!(
        error.to_string(),
        "Identifier 'countr' is not defined. Did you mean 'counter'?"
    );
}

#[test]
fn test_augmented_assignment_needs_storage() {
    let error = parse_error("value += 1", &["value"]);
    assert!(error.is_undefined_identifier());
    assert!(error.notes.iter().any(|note| note.contains("'global value'")));
}

#[test]
fn test_unpacking_assignment() {
    assert_eq!(
        statement("a, b = 1, 2", &[]),
        "(= (targets a b) (tuple 1 2))"
    );
    let (_, scope) = parse_with_scope("a, b = 1, 2", &ParseOptions::default()).unwrap();
    assert_eq!(scope.sorted_identifiers(), vec!["a", "b"]);
}

#[test]
fn test_attribute_and_item_targets() {
    let root = parse_with_builtins("obj.value = 1\nobj[0] += 2", &["obj"]).unwrap();
    let targets = root
        .commands()
        .iter()
        .map(|command| match &arguments(command)[0].node {
            Ast::Assignment { target, .. } => match &target.node {
                Ast::TargetAttribute { name, .. } => format!("attribute {name}"),
                Ast::TargetItem { arguments, .. } => format!("item {}", render(&arguments[0])),
                other => format!("{other:?}"),
            },
            other => format!("{other:?}"),
        })
        .collect_vec();
    assert_eq!(targets, vec!["attribute value", "item 0"]);
}

#[test_case("a + b * c", "(+ a (* b c))"; "product binds tighter")]
#[test_case("a - b - c", "(- (- a b) c)"; "left associative")]
#[test_case("a ** b ** c", "(** a (** b c))"; "power is right associative")]
#[test_case("-a ** 2", "(- (** a 2))"; "power binds tighter than negation")]
#[test_case("a or b and c", "(or a (and b c))"; "and binds tighter than or")]
#[test_case("not a in b", "(not (in a b))"; "not wraps comparison")]
#[test_case("a not in b", "(not in a b)"; "not in")]
#[test_case("a is not b", "(is not a b)"; "is not")]
#[test_case("a | b & c", "(| a (& b c))"; "bitwise levels")]
#[test_case("a << 1 + 2", "(<< a (+ 1 2))"; "shift below sum")]
#[test_case("(a + b) * c", "(* (+ a b) c)"; "parentheses")]
#[test_case("a // b % c", "(% (// a b) c)"; "term level")]
#[test_case("a < b == c", "(== (< a b) c)"; "comparisons fold left")]
fn test_precedence(source: &str, expected: &str) {
    assert_eq!(statement(source, &["a", "b", "c"]), expected);
}

#[test_case("(a,)", "(tuple a)"; "one element tuple")]
#[test_case("(a)", "a"; "parenthesised")]
#[test_case("()", "(tuple )"; "empty tuple")]
#[test_case("a.b.c", "(. (. a b) c)"; "attribute chain")]
#[test_case("a.0", "([] a 0)"; "dotted index")]
#[test_case("a[1:2]", "([] a (slice 1 2 _))"; "slice")]
#[test_case("a[::2]", "([] a (slice _ _ 2))"; "step only")]
#[test_case("a[:]", "([] a (slice _ _ _))"; "full slice")]
#[test_case("a[]", "([] a (slice _ _ _))"; "empty subscript")]
#[test_case("a[1, b:]", "([] a 1 (slice b _ _))"; "several subscripts")]
#[test_case("f(a, *b, k=1, **c)", "(call f a (unpack-list b) (k= 1) (unpack-dict c))"; "call arguments")]
fn test_primary(source: &str, expected: &str) {
    assert_eq!(statement(source, &["a", "b", "c", "f"]), expected);
}

#[test_case("f(k=1, a)", "Positional argument not allowed after keyword arguments."; "positional after keyword")]
#[test_case("f(**c, a)", "Positional argument not allowed after keyword arguments."; "positional after dict unpacking")]
#[test_case("f(k=1, *b)", "List unpacking not allowed after keyword arguments."; "list unpacking after keyword")]
fn test_argument_ordering(source: &str, message: &str) {
    let error = parse_error(source, &["a", "b", "c", "f"]);
    assert_eq!(error.to_string(), message);
}

#[test]
fn test_literals() {
    let root = parse_with_builtins(r#"x = [1, "two", True, None, 2.5, *a]"#, &["a"]).unwrap();
    let Ast::Assignment { value, .. } = first_statement(&root) else {
        panic!("expected an assignment");
    };
    let Ast::List { items } = &value.node else {
        panic!("expected a list, got {value:?}");
    };
    assert_eq!(
        items.iter().map(render).collect_vec(),
        vec!["1", "\"two\"", "true", "null", "2.5", "(unpack-list a)"]
    );

    let error = parse_error("x = [**a]", &["a"]);
    assert_eq!(error.to_string(), "Dict unpacking not allowed.");
}

#[test]
fn test_dict_keys() {
    let root = parse_with_builtins(r#"x = {name: 1, "quoted": 2, key: 3, **extra}"#, &["key", "extra"])
        .unwrap();
    let Ast::Assignment { value, .. } = first_statement(&root) else {
        panic!("expected an assignment");
    };
    let Ast::Dict { items } = &value.node else {
        panic!("expected a dict, got {value:?}");
    };
    let keys = items
        .iter()
        .map(|item| match &item.node {
            Ast::DictItem { key, .. } => render(key),
            other => render(&Node::new(other.clone(), item.span)),
        })
        .collect_vec();
    assert_eq!(keys, vec!["\"name\"", "\"quoted\"", "key", "(unpack-dict extra)"]);
}

#[test]
fn test_format_strings() {
    let root = parse_with_builtins(r#"x = f"a{b}c {b!r:>3} {{b}}""#, &["b"]).unwrap();
    let Ast::Assignment { value, .. } = first_statement(&root) else {
        panic!("expected an assignment");
    };
    let Ast::FormatString { fmt, values } = &value.node else {
        panic!("expected a format string, got {value:?}");
    };
    assert_eq!(fmt, "a{}c {!r:>3} {{b}}");
    assert_eq!(values.iter().map(render).collect_vec(), vec!["b", "b"]);

    let root = parse_with_builtins(r#"x = f'{b + 1}'"#, &["b"]).unwrap();
    let Ast::Assignment { value, .. } = first_statement(&root) else {
        panic!("expected an assignment");
    };
    let Ast::FormatString { fmt, values } = &value.node else {
        panic!("expected a format string, got {value:?}");
    };
    assert_eq!(fmt, "{}");
    assert_eq!(render(&values[0]), "(+ b 1)");
}

#[test]
fn test_relative_locations() {
    let options = ParseOptions {
        resource_location: Some("demo:utils/math".into()),
        ..Default::default()
    };
    let root = parse_source("x = ./helpers\nfunction ../main", &options).unwrap();
    assert_eq!(
        render(&Node::new(first_statement(&root).clone(), root.span)),
        "(= x \"demo:utils/helpers\")"
    );
    assert_eq!(
        arguments(&root.commands()[1])[0].node,
        Ast::ResourceLocation {
            namespace: Some("demo".into()),
            path: "main".into(),
            is_tag: false
        }
    );

    // Without a location for the unit there is nothing to resolve against.
    let error = parse_source("x = ./helpers", &ParseOptions::default()).unwrap_err();
    assert_eq!(error.to_string(), "Couldn't resolve relative location.");
}

#[test]
fn test_statement_line_end() {
    let error = parse_error("x = 1 2", &[]);
    assert_eq!(error.to_string(), "Trailing input following final expression.");

    let error = parse_error("x = 1\n    + 2", &[]);
    assert_eq!(error.to_string(), "Invalid indent following final expression.");
}

#[test_case("x = 99999999999999999999", "Invalid number '99999999999999999999'."; "integer overflow")]
#[test_case(r#"x = "\ud83d""#, "Invalid escape sequence '\\ud83d': unpaired surrogate."; "lone surrogate")]
#[test_case(r#"x = "\q""#, "Invalid escape sequence '\\q'."; "unknown escape")]
fn test_bad_literals_are_reported(source: &str, message: &str) {
    let error = parse_error(source, &[]);
    assert_eq!(error.to_string(), message);
    assert_eq!(error.location().pos, 4);
}

#[test]
fn test_unicode_whitespace_is_reported() {
    let error = parse_error("x = 1\n\u{a0}\n", &[]);
    assert_eq!(
        error.to_string(),
        "Expected identifier but got invalid '\u{a0}'."
    );
}

#[test]
fn test_conditional_chain_is_lowered() {
    let source = unindent(
        "
        if cond:
          y = 1
        elif other: y = 2
        else: y = 3
        ",
    );
    let root = parse_with_builtins(&source, &["cond", "other"]).unwrap();
    assert_eq!(command_identifiers(&root), vec!["if:condition:body", "else:body"]);

    let nested = &arguments(&root.commands()[1])[0];
    assert_eq!(
        command_identifiers(nested),
        vec!["if:condition:body", "else:body"]
    );
    let Ast::Command { arguments: branch, .. } = &nested.commands()[0].node else {
        panic!("expected the lowered elif");
    };
    assert_eq!(render(&branch[0]), "other");
}

#[test]
fn test_lowering_is_idempotent_on_nested_else() {
    let source = unindent(
        "
        if a:
            say one
        else:
            if b:
                say two
            else:
                say three
        ",
    );
    let nested = parse_with_builtins(&source, &["a", "b"]).unwrap();

    let flat = unindent(
        "
        if a:
            say one
        elif b:
            say two
        else:
            say three
        ",
    );
    let lowered = parse_with_builtins(&flat, &["a", "b"]).unwrap();

    let shape = |root: &Node| -> Vec<Vec<String>> {
        root.commands()
            .iter()
            .map(|command| {
                arguments(command)
                    .iter()
                    .flat_map(|argument| command_identifiers(argument))
                    .map(str::to_string)
                    .collect()
            })
            .collect()
    };
    assert_eq!(command_identifiers(&nested), command_identifiers(&lowered));
    assert_eq!(shape(&nested), shape(&lowered));
}

#[test_case("say hi\nelif a:\n    say x"; "rogue elif")]
#[test_case("else:\n    say x"; "rogue else")]
#[test_case("if a:\n    say x\nelse:\n    say y\nelse:\n    say z"; "second else")]
fn test_rogue_branches(source: &str) {
    let error = parse_error(source, &["a"]);
    assert_eq!(
        error.to_string(),
        "Conditional branch must be part of an if statement."
    );
}

#[test]
fn test_sibling_branches_are_masked() {
    let source = unindent(
        "
        if cond:
            y = 1
        else:
            z = y
        ",
    );
    let error = parse_error(&source, &["cond"]);
    assert_eq!(error.to_string(), "Identifier 'y' is not defined.");
    assert_eq!(error.location().lineno, 4);

    let source = unindent(
        "
        if cond:
            y = 1
        elif y:
            say hi
        ",
    );
    let error = parse_error(&source, &["cond"]);
    assert_eq!(error.to_string(), "Identifier 'y' is not defined.");
    assert_eq!(error.location().lineno, 3);

    let source = unindent(
        "
        if cond:
            y = 1
        say done
        x = y
        ",
    );
    assert!(parse_with_builtins(&source, &["cond"]).is_ok());
}

#[test_case("if 1:\n    a = 1\nelif a:\n    say hi\n", "a", 3; "elif condition")]
#[test_case("if 1:\n    say hi\nelif 2:\n    b = 1\nelse:\n    x = b\n", "b", 6; "else body")]
fn test_branches_are_masked_without_builtins(source: &str, name: &str, lineno: usize) {
    let error = parse_source(source, &ParseOptions::default()).unwrap_err();
    assert_eq!(
        error.to_string(),
        format!("Identifier '{name}' is not defined.")
    );
    assert_eq!(error.location().lineno, lineno);
}

#[test]
fn test_function_definition() {
    let source = "def f(a, b=a+1):\n  return a + b";
    let (root, scope) = parse_with_scope(source, &ParseOptions::default()).unwrap();
    assert!(scope.is_defined("f"));
    assert!(!scope.is_defined("a"));
    assert!(scope.pending_identifiers.is_empty());

    let command = &root.commands()[0];
    assert_eq!(command.command_identifier(), Some("def:function:body"));
    let [signature, body] = arguments(command) else {
        panic!("expected a signature and a body");
    };

    let Ast::FunctionSignature { name, arguments: parameters } = &signature.node else {
        panic!("expected a signature, got {signature:?}");
    };
    assert_eq!(name, "f");
    let defaults = parameters
        .iter()
        .map(|parameter| match &parameter.node {
            Ast::SignatureArgument { name, default } => {
                format!("{name}={}", default.as_deref().map_or("_".to_string(), render))
            }
            other => format!("{other:?}"),
        })
        .collect_vec();
    assert_eq!(defaults, vec!["a=_", "b=(+ a 1)"]);

    assert_eq!(command_identifiers(body), vec!["return:value"]);
    assert_eq!(render(&arguments(&body.commands()[0])[0]), "(+ a b)");
}

#[test]
fn test_function_body_sees_later_definitions() {
    let source = unindent(
        "
        def f():
            return g() + later
        def g():
            return 1
        later = 2
        ",
    );
    let root = parse_ok(&source);
    assert_eq!(
        command_identifiers(&root),
        vec!["def:function:body", "def:function:body", "statement"]
    );

    let error = parse_error("def f():\n    return missing\n", &[]);
    assert_eq!(error.to_string(), "Identifier 'missing' is not defined.");
}

#[test]
fn test_function_default_scope() {
    let error = parse_error("def f(a=b, b=1):\n    return a", &[]);
    assert_eq!(error.to_string(), "Identifier 'b' is not defined.");

    assert!(parse_with_builtins("def f(n=f):\n    return n", &[]).is_ok());
}

#[test]
fn test_nonlocal_rebinding() {
    let source = unindent(
        "
        def outer():
            x = 1
            def inner():
                nonlocal x
                x = 2
            return inner
        ",
    );
    let root = parse_ok(&source);
    let body = &arguments(&root.commands()[0])[1];
    let inner_body = &arguments(&body.commands()[1])[1];
    let Ast::Assignment { target, .. } = &arguments(&inner_body.commands()[1])[0].node else {
        panic!("expected an assignment");
    };
    assert_eq!(
        target.node,
        Ast::TargetIdentifier {
            value: "x".into(),
            rebind: true
        }
    );
}

#[test_case("break", "Can only use 'break' in loops."; "break at top level")]
#[test_case("continue", "Can only use 'continue' in loops."; "continue at top level")]
#[test_case("def f():\n    break", "Can only use 'break' in loops."; "break in function")]
#[test_case("while a:\n    def f():\n        continue", "Can only use 'continue' in loops."; "loop does not reach into functions")]
#[test_case("return 1", "Can only use 'return' in functions."; "return at top level")]
#[test_case("yield", "Can only use 'yield' in functions."; "yield at top level")]
#[test_case("global a", "Can only use 'global' in functions."; "global at top level")]
fn test_placement_constraints(source: &str, message: &str) {
    assert_eq!(parse_error(source, &["a"]).to_string(), message);
}

#[test]
fn test_loops() {
    let source = unindent(
        "
        for item in items:
            if item:
                break
            total = item
        while total:
            continue
        ",
    );
    let (root, scope) = parse_with_scope(
        &source,
        &ParseOptions {
            builtins: vec!["items".into()],
            ..Default::default()
        },
    )
    .unwrap();
    assert_eq!(
        command_identifiers(&root),
        vec!["for:target:in:iterable:body", "while:condition:body"]
    );
    assert!(scope.is_defined("item"));
    assert_eq!(scope.storage("total"), Some(Storage::Local));
}

#[test]
fn test_generators() {
    let source = unindent(
        "
        def gen(values):
            yield
            yield 1
            yield from values
        ",
    );
    let root = parse_ok(&source);
    let body = &arguments(&root.commands()[0])[1];
    assert_eq!(
        command_identifiers(body),
        vec!["yield", "yield:value", "yield:from:value"]
    );
}

#[test]
fn test_del_targets() {
    let root = parse_with_builtins("del a\ndel a.b\ndel a[0]", &["a"]).unwrap();
    let targets = root
        .commands()
        .iter()
        .map(|command| match &arguments(command)[0].node {
            Ast::TargetIdentifier { .. } => "identifier",
            Ast::TargetAttribute { .. } => "attribute",
            Ast::TargetItem { .. } => "item",
            _ => "other",
        })
        .collect_vec();
    assert_eq!(targets, vec!["identifier", "attribute", "item"]);

    for source in ["del a + 1", "del f(a)", "del 1"] {
        assert_eq!(
            parse_error(source, &["a", "f"]).to_string(),
            "Can only delete variables, attributes, or subscripted items."
        );
    }
}

#[test]
fn test_from_import() {
    let (root, scope) =
        parse_with_scope("from foo.bar import baz, qux", &ParseOptions::default()).unwrap();
    assert_eq!(
        command_identifiers(&root),
        vec!["from:module:import:subcommand"]
    );
    assert!(scope.is_defined("baz") && scope.is_defined("qux"));
    assert_eq!(scope.storage("baz"), Some(Storage::Local));
    assert_eq!(scope.storage("qux"), Some(Storage::Local));
    assert!(!scope.is_defined("foo"));
}

#[test]
fn test_imports() {
    let (_, scope) = parse_with_scope(
        "import math.vector\nimport demo:utils as utils",
        &ParseOptions::default(),
    )
    .unwrap();
    assert!(scope.is_defined("math"));
    assert_eq!(scope.storage("math"), None);
    assert_eq!(scope.storage("utils"), Some(Storage::Local));

    assert_eq!(
        parse_error("import demo:utils", &[]).to_string(),
        "Can't import 'demo:utils' without alias."
    );
    assert_eq!(
        parse_error("import #demo:tag", &[]).to_string(),
        "Invalid module location '#demo:tag'."
    );
}

#[test]
fn test_global_conflict() {
    let source = unindent(
        "
        counter = 0
        def bump():
            global counter
            counter += 1
        def broken():
            counter = 1
            nonlocal counter
        ",
    );
    let error = parse_error(&source, &[]);
    assert_eq!(error.to_string(), "Can't make local identifier nonlocal.");
    assert_eq!(error.location().lineno, 7);
}

#[test]
fn test_interpolated_arguments() {
    let source = unindent(
        "
        say hello world
        say greeting
        scoreboard players set @s points score
        scoreboard players set @s points -score
        scoreboard players set @s points 3
        ",
    );
    let root = parse_with_builtins(&source, &["greeting", "score"]).unwrap();
    let last_arguments = root
        .commands()
        .iter()
        .map(|command| {
            let argument = &arguments(command)[arguments(command).len() - 1];
            match &argument.node {
                Ast::Interpolation {
                    prefix,
                    converter,
                    value,
                    ..
                } => format!(
                    "{converter}:{}{}",
                    prefix.as_deref().unwrap_or(""),
                    render(value)
                ),
                Ast::HostLiteral { text, .. } => text.clone(),
                other => render(&Node::new(other.clone(), argument.span)),
            }
        })
        .collect_vec();
    assert_eq!(
        last_arguments,
        vec![
            "hello world",
            "message:greeting",
            "numeric:score",
            "numeric:-score",
            "3"
        ]
    );
}

#[test]
fn test_interpolation_can_be_disabled() {
    let options = ParseOptions {
        builtins: vec!["greeting".into()],
        interpolation: false,
        ..Default::default()
    };
    let root = parse_source("say greeting", &options).unwrap();
    assert_eq!(
        arguments(&root.commands()[0])[0].node,
        Ast::HostLiteral {
            parser: "message".into(),
            text: "greeting".into()
        }
    );
}

#[test]
fn test_execute_subcommands() {
    let root = parse_ok("execute run say hi");
    assert_eq!(command_identifiers(&root), vec!["execute:run:subcommand"]);
    assert_eq!(
        arguments(&root.commands()[0])[0].command_identifier(),
        Some("say:message")
    );

    let error = parse_error("execute if cond:\n    say hi", &["cond"]);
    assert_eq!(
        error.to_string(),
        "Can't inline conditions as execute subcommands."
    );
}

#[test]
fn test_blocks() {
    assert_eq!(
        parse_error("say a\n    say b", &[]).to_string(),
        "Unexpected indent."
    );
    assert_eq!(
        parse_error("while a:\n", &["a"]).to_string(),
        "Expected non-empty block."
    );
    assert_eq!(
        parse_error("while a:\n    say b\n        say c", &["a"]).to_string(),
        "Unexpected indent."
    );

    let source = unindent(
        "
        # comment

        while a:

            say b
            # inside

            say c
        say d
        ",
    );
    let root = parse_with_builtins(&source, &["a"]).unwrap();
    assert_eq!(
        command_identifiers(&root),
        vec!["while:condition:body", "say:message"]
    );
    let body = &arguments(&root.commands()[0])[1];
    assert_eq!(body.commands().len(), 2);
}

#[test]
fn test_inline_blocks_can_be_disabled() {
    let options = ParseOptions {
        builtins: vec!["a".into()],
        inline_blocks: false,
        ..Default::default()
    };
    let error = parse_source("while a: say b", &options).unwrap_err();
    assert_eq!(error.to_string(), "Expected non-empty block.");
}

#[test]
fn test_identifier_reads() {
    assert_eq!(
        parse_error("value = 1\nx = valeu", &[]).to_string(),
        "Identifier 'valeu' is not defined. Did you mean 'value'?"
    );
    assert!(parse_with_builtins("x = print", &["print"]).is_ok());
    assert_eq!(
        parse_error("x = x", &[]).to_string(),
        "Identifier 'x' is not defined."
    );
}

#[test]
fn test_values() {
    assert_eq!(
        statement("x = -1.5e3", &[]),
        format!("(= x (- {}))", Value::Float(1500.0))
    );
    assert_eq!(statement("x = a >> 2", &["a"]), format!("(= x ({} a 2))", BinaryOp::Shr));
}
