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

//! What the parser knows about the compilation unit it is working on.

use bolt_common::{ParseResult, Span, SyntaxError};
use serde::{Deserialize, Serialize};

const DEFAULT_NAMESPACE: &str = "minecraft";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompilationDatabase {
    /// Resource location of the unit being parsed, such as `demo:utils/math`.
    pub resource_location: Option<String>,
}

impl CompilationDatabase {
    pub fn new(resource_location: Option<String>) -> Self {
        Self { resource_location }
    }

    /// Resolve a `./` or `../` path against the directory of the current unit, returning a
    /// full `namespace:path` location.
    pub fn resolve_relative_location(&self, relative: &str, span: Span) -> ParseResult<String> {
        let Some(current) = &self.resource_location else {
            return Err(SyntaxError::invalid("Couldn't resolve relative location.").at(span));
        };

        let (namespace, path) = current
            .split_once(':')
            .unwrap_or((DEFAULT_NAMESPACE, current.as_str()));

        let mut segments: Vec<&str> = path.split('/').collect();
        segments.pop();

        for part in relative.split('/') {
            match part {
                "" | "." => {}
                ".." => {
                    if segments.pop().is_none() {
                        return Err(SyntaxError::invalid(format!(
                            "Couldn't resolve relative path '{relative}'."
                        ))
                        .at(span));
                    }
                }
                segment => segments.push(segment),
            }
        }

        Ok(format!("{namespace}:{}", segments.join("/")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("./helpers", "demo:utils/helpers"; "sibling")]
    #[test_case("../main", "demo:main"; "parent")]
    #[test_case("./nested/./deep", "demo:utils/nested/deep"; "nested")]
    fn test_resolve(relative: &str, expected: &str) {
        let database = CompilationDatabase::new(Some("demo:utils/math".into()));
        assert_eq!(
            database
                .resolve_relative_location(relative, Span::default())
                .unwrap(),
            expected
        );
    }

    #[test]
    fn test_resolve_errors() {
        let err = CompilationDatabase::default()
            .resolve_relative_location("./x", Span::default())
            .unwrap_err();
        assert_eq!(err.to_string(), "Couldn't resolve relative location.");

        let database = CompilationDatabase::new(Some("demo:main".into()));
        let err = database
            .resolve_relative_location("../../x", Span::default())
            .unwrap_err();
        assert_eq!(err.to_string(), "Couldn't resolve relative path '../../x'.");
    }
}
