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

//! Fuzzy "did you mean" suggestions for misspelled identifiers.

use itertools::Itertools;
use strsim::normalized_damerau_levenshtein;

/// Maximum number of suggestions offered for a single name.
pub const MAX_SUGGESTIONS: usize = 3;
/// Minimum similarity (0.0 - 1.0) for a candidate to count as a close match.
pub const SUGGESTION_CUTOFF: f64 = 0.6;

/// Return up to [`MAX_SUGGESTIONS`] candidates close to `word`, best match first.
pub fn close_matches<'a, I>(word: &str, candidates: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a String>,
{
    candidates
        .into_iter()
        .map(|candidate| (normalized_damerau_levenshtein(word, candidate), candidate))
        .filter(|(score, _)| *score >= SUGGESTION_CUTOFF)
        .sorted_by(|(a, x), (b, y)| b.total_cmp(a).then_with(|| x.cmp(y)))
        .take(MAX_SUGGESTIONS)
        .map(|(_, candidate)| candidate.clone())
        .collect()
}

/// Join quoted suggestions as `'a', 'b' or 'c'`.
pub fn format_suggestions(matches: &[String]) -> String {
    let quoted: Vec<String> = matches.iter().map(|m| format!("'{m}'")).collect();
    match quoted.as_slice() {
        [] => String::new(),
        [single] => single.clone(),
        [head @ .., before_last, last] => {
            let mut parts: Vec<String> = head.to_vec();
            parts.push(format!("{before_last} or {last}"));
            parts.join(", ")
        }
    }
}

/// The " Did you mean ...?" suffix appended to undefined identifier messages, or an empty
/// string when nothing is close enough.
pub fn did_you_mean<'a, I>(word: &str, candidates: I) -> String
where
    I: IntoIterator<Item = &'a String>,
{
    let matches = close_matches(word, candidates);
    if matches.is_empty() {
        return String::new();
    }
    format!(" Did you mean {}?", format_suggestions(&matches))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_format_suggestions() {
        assert_eq!(format_suggestions(&names(&["a"])), "'a'");
        assert_eq!(format_suggestions(&names(&["a", "b"])), "'a' or 'b'");
        assert_eq!(format_suggestions(&names(&["a", "b", "c"])), "'a', 'b' or 'c'");
    }

    #[test]
    fn test_close_matches_ranked() {
        let candidates = names(&["value", "values", "valve", "unrelated"]);
        let matches = close_matches("valeu", &candidates);
        assert_eq!(matches.first().map(String::as_str), Some("value"));
        assert!(!matches.contains(&"unrelated".to_string()));
        assert!(matches.len() <= MAX_SUGGESTIONS);
    }

    #[test]
    fn test_no_suggestion_for_distant_names() {
        let candidates = names(&["alpha", "beta"]);
        assert_eq!(did_you_mean("x", &candidates), "");
        assert_eq!(did_you_mean("alpah", &candidates), " Did you mean 'alpha'?");
    }
}
