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

//! Compiled lexer rules.
//!
//! Rule patterns are Perl-flavoured and rely on look-ahead and word boundaries, so they are
//! compiled with oniguruma. Compilation happens once per distinct pattern for the life of the
//! process.

use crate::errors::{SyntaxError, SyntaxErrorKind};
use lazy_static::lazy_static;
use onig::{Regex, RegexOptions, SearchOptions, Syntax};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

lazy_static! {
    static ref RULE_CACHE: Mutex<HashMap<String, Arc<Regex>>> = Default::default();
}

/// Compile `pattern`, reusing a previously compiled copy when there is one.
pub fn compile(pattern: &str) -> Result<Arc<Regex>, SyntaxError> {
    let mut cache = RULE_CACHE
        .lock()
        .map_err(|_| SyntaxError::invalid("Lexer rule cache is poisoned."))?;
    if let Some(regex) = cache.get(pattern) {
        return Ok(regex.clone());
    }
    let regex = Regex::with_options(pattern, RegexOptions::REGEX_OPTION_NONE, Syntax::perl())
        .map_err(|e| {
            SyntaxError::new(SyntaxErrorKind::InvalidPattern {
                pattern: pattern.to_string(),
                message: e.to_string(),
            })
        })?;
    let regex = Arc::new(regex);
    cache.insert(pattern.to_string(), regex.clone());
    Ok(regex)
}

/// Length of the match of `regex` anchored at byte offset `at` of `text`, if any.
///
/// The whole text is handed to the engine so that look-behind and `\b` see the characters
/// before `at`.
pub fn match_at(regex: &Regex, text: &str, at: usize) -> Option<usize> {
    regex.match_with_options(text, at, SearchOptions::SEARCH_OPTION_NONE, None)
}

/// True when `regex` matches the entirety of `text`.
pub fn full_match(regex: &Regex, text: &str) -> bool {
    match_at(regex, text, 0) == Some(text.len())
}

/// A named lexer rule.
#[derive(Clone)]
pub struct Rule {
    pub name: &'static str,
    pub pattern: String,
    pub regex: Arc<Regex>,
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule")
            .field("name", &self.name)
            .field("pattern", &self.pattern)
            .finish()
    }
}

/// The ordered set of active rules. Earlier rules win.
#[derive(Clone, Debug, Default)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    /// Layer `overrides` on top of this rule set.
    ///
    /// Overriding rules come first, in the order given, ahead of every inherited rule. A
    /// `None` pattern removes the rule of that name.
    pub fn extend(&self, overrides: &[(&'static str, Option<&str>)]) -> Result<Self, SyntaxError> {
        let mut rules = Vec::with_capacity(self.rules.len() + overrides.len());
        for (name, pattern) in overrides {
            if let Some(pattern) = pattern {
                rules.push(Rule {
                    name: *name,
                    pattern: pattern.to_string(),
                    regex: compile(pattern)?,
                });
            }
        }
        rules.extend(
            self.rules
                .iter()
                .filter(|rule| !overrides.iter().any(|(name, _)| *name == rule.name))
                .cloned(),
        );
        Ok(Self { rules })
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.rules.iter().any(|rule| rule.name == name)
    }
}
