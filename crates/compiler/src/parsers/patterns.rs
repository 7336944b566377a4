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

//! Lexer patterns shared by the dialect parsers.

use bolt_common::tokenstream::rules::{compile, full_match};
use itertools::Itertools;
use lazy_static::lazy_static;

/// Reserved words that can never be identifiers.
pub const KEYWORDS: &[&str] = &[
    "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class",
    "continue", "def", "del", "elif", "else", "except", "finally", "for", "from", "global",
    "if", "import", "in", "is", "lambda", "nonlocal", "not", "or", "pass", "raise", "return",
    "try", "while", "with", "yield",
];

pub const TRUE_PATTERN: &str = r"\b[tT]rue\b";
pub const FALSE_PATTERN: &str = r"\b[fF]alse\b";
pub const NULL_PATTERN: &str = r"\b(?:null|None)\b";
pub const STRING_PATTERN: &str = r#""(?:\\.|[^\\\n])*?"|'(?:\\.|[^\\\n])*?'"#;
pub const NUMBER_PATTERN: &str = r"(?:0|[1-9]\d*)(?:\.\d+)?(?:[eE][+-]?\d+)?\b";
pub const RESOURCE_LOCATION_PATTERN: &str = r"(?:\.\./|\./|[0-9a-z_\-\.]+:)[0-9a-z_./-]+";

/// Every assignment operator.
pub const ASSIGNMENT_PATTERN: &str = r"=(?!=)|\+=|-=|\*=|//=|/=|%=|&=|\|=|\^=|<<=|>>=|\*\*=";
/// Plain assignment only.
pub const PLAIN_ASSIGNMENT_PATTERN: &str = r"=(?!=)";

lazy_static! {
    pub static ref KEYWORD_PATTERN: String =
        KEYWORDS.iter().map(|kw| format!(r"\b{kw}\b")).join("|");
    pub static ref IDENTIFIER_PATTERN: String =
        format!(r"(?!_mecha_|{})[a-zA-Z_][a-zA-Z0-9_]*\b", *KEYWORD_PATTERN);
    static ref IMPORT_PATTERN: String = format!(
        r"{identifier}(?:\.{identifier})*",
        identifier = *IDENTIFIER_PATTERN
    );
}

/// Whether `path` is a dotted module name such as `a.b.c`.
pub fn is_module_path(path: &str) -> bool {
    compile(&IMPORT_PATTERN)
        .map(|regex| full_match(&regex, path))
        .unwrap_or(false)
}

/// Collapse runs of whitespace inside an operator such as `not   in`.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use bolt_common::tokenstream::rules::match_at;
    use test_case::test_case;

    #[test_case("foo", Some(3); "plain name")]
    #[test_case("_private2 x", Some(9); "underscore and digits")]
    #[test_case("if", None; "keyword")]
    #[test_case("None", None; "capitalised keyword")]
    #[test_case("iffy", Some(4); "keyword prefix")]
    #[test_case("_mecha_internal", None; "reserved prefix")]
    #[test_case("9lives", None; "leading digit")]
    fn test_identifier_pattern(text: &str, expected: Option<usize>) {
        let regex = compile(&IDENTIFIER_PATTERN).unwrap();
        assert_eq!(match_at(&regex, text, 0), expected);
    }

    #[test_case("a.b.c", true; "dotted")]
    #[test_case("a", true; "single")]
    #[test_case("demo:foo", false; "namespaced")]
    #[test_case("a..b", false; "empty segment")]
    #[test_case("import.x", false; "keyword segment")]
    fn test_module_path(path: &str, expected: bool) {
        assert_eq!(is_module_path(path), expected);
    }

    #[test]
    fn test_literal_patterns() {
        let number = compile(NUMBER_PATTERN).unwrap();
        assert_eq!(match_at(&number, "1.5e-3 ", 0), Some(6));
        assert_eq!(match_at(&number, "012", 0), None);

        let string = compile(STRING_PATTERN).unwrap();
        assert_eq!(match_at(&string, r#""a\"b" tail"#, 0), Some(6));
        assert_eq!(match_at(&string, "'it''s'", 0), Some(4));

        let resource = compile(RESOURCE_LOCATION_PATTERN).unwrap();
        assert_eq!(match_at(&resource, "demo:foo/bar", 0), Some(12));
        assert_eq!(match_at(&resource, "../up", 0), Some(5));
        assert_eq!(match_at(&resource, "foo", 0), None);
    }

    #[test]
    fn test_normalize_whitespace() {
        assert_eq!(normalize_whitespace("not \t in"), "not in");
        assert_eq!(normalize_whitespace("is  not"), "is not");
    }
}
