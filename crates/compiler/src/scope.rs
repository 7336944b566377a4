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

//! Identifier visibility tracked while parsing.
//!
//! The tables are carried by the stream and snapshotted with it, so a failed alternative
//! leaves no trace and a deferred function body sees the scope as it was when it was
//! captured.

use serde::Serialize;
use std::collections::{HashMap, HashSet};
use strum::Display;

/// How assignments to a name inside a function are stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Storage {
    Local,
    Global,
    Nonlocal,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scope {
    /// Names readable at the current position.
    pub identifiers: HashSet<String>,
    /// Names bound by the statement being parsed, not yet readable.
    pub pending_identifiers: HashSet<String>,
    /// Storage class of names that may be written. Names readable through a closure have
    /// no entry.
    pub identifiers_storage: HashMap<String, Storage>,
    pub pending_identifiers_storage: HashMap<String, Storage>,
    /// Names visible where the current conditional chain started, if there is one.
    pub branch_scope: Option<HashSet<String>>,
}

impl Scope {
    pub fn with_identifiers<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            identifiers: names.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    pub fn is_defined(&self, name: &str) -> bool {
        self.identifiers.contains(name)
    }

    pub fn storage(&self, name: &str) -> Option<Storage> {
        self.identifiers_storage.get(name).copied()
    }

    pub fn has_pending(&self) -> bool {
        !self.pending_identifiers.is_empty() || !self.pending_identifiers_storage.is_empty()
    }

    pub fn clear_pending(&mut self) {
        self.pending_identifiers.clear();
        self.pending_identifiers_storage.clear();
    }

    /// Commit the names bound by the statement that just finished.
    pub fn flush_pending(&mut self) {
        self.identifiers.extend(self.pending_identifiers.drain());
        self.identifiers_storage
            .extend(self.pending_identifiers_storage.drain());
    }

    /// Declare `name` as a local binding unless it already has a storage class.
    pub fn bind_local(&mut self, name: &str) {
        self.identifiers.insert(name.to_string());
        self.identifiers_storage
            .entry(name.to_string())
            .or_insert(Storage::Local);
    }

    /// The scope a function body starts from: everything readable here, including the
    /// names pending for the signature, and nothing writable.
    pub fn function_scope(&self) -> Scope {
        Scope {
            identifiers: self
                .identifiers
                .union(&self.pending_identifiers)
                .cloned()
                .collect(),
            ..Default::default()
        }
    }

    /// Hide the names introduced since the branch point, returning what was hidden.
    pub fn mask_branch(&mut self) -> Mask {
        let Some(branch_scope) = &self.branch_scope else {
            return Mask::default();
        };
        let identifiers: HashSet<String> = self
            .identifiers
            .difference(branch_scope)
            .cloned()
            .collect();
        let storage: HashMap<String, Storage> = identifiers
            .iter()
            .filter_map(|name| {
                self.identifiers_storage
                    .remove(name)
                    .map(|storage| (name.clone(), storage))
            })
            .collect();
        self.identifiers.retain(|name| !identifiers.contains(name));
        Mask {
            identifiers,
            storage,
        }
    }

    pub fn unmask(&mut self, mask: Mask) {
        self.identifiers.extend(mask.identifiers);
        self.identifiers_storage.extend(mask.storage);
    }

    /// Sorted readable names, for display.
    pub fn sorted_identifiers(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.identifiers.iter().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

/// Names hidden from a sibling branch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Mask {
    identifiers: HashSet<String>,
    storage: HashMap<String, Storage>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flush_pending() {
        let mut scope = Scope::with_identifiers(["print"]);
        scope.pending_identifiers.insert("x".into());
        scope
            .pending_identifiers_storage
            .insert("x".into(), Storage::Local);
        scope.flush_pending();
        assert!(scope.is_defined("x"));
        assert_eq!(scope.storage("x"), Some(Storage::Local));
        assert!(scope.pending_identifiers.is_empty());
        assert!(scope.pending_identifiers_storage.is_empty());
    }

    #[test]
    fn test_mask_and_unmask() {
        let mut scope = Scope::with_identifiers(["a"]);
        scope.branch_scope = Some(scope.identifiers.clone());
        scope.bind_local("b");

        let mask = scope.mask_branch();
        assert!(!scope.is_defined("b"));
        assert_eq!(scope.storage("b"), None);
        assert!(scope.is_defined("a"));

        scope.unmask(mask);
        assert!(scope.is_defined("b"));
        assert_eq!(scope.storage("b"), Some(Storage::Local));
    }

    #[test]
    fn test_no_branch_point_masks_nothing() {
        let mut scope = Scope::with_identifiers(["a", "b"]);
        let mask = scope.mask_branch();
        assert_eq!(mask, Mask::default());
        assert_eq!(scope.sorted_identifiers(), vec!["a", "b"]);
    }

    #[test]
    fn test_empty_branch_point_masks_everything_since() {
        let mut scope = Scope {
            branch_scope: Some(HashSet::new()),
            ..Default::default()
        };
        scope.bind_local("a");

        let mask = scope.mask_branch();
        assert!(!scope.is_defined("a"));
        assert_eq!(scope.storage("a"), None);

        scope.unmask(mask);
        assert!(scope.is_defined("a"));
    }

    #[test]
    fn test_function_scope() {
        let mut scope = Scope::with_identifiers(["f"]);
        scope.bind_local("f");
        scope.pending_identifiers.insert("arg".into());
        scope.branch_scope = Some(HashSet::new());
        let inner = scope.function_scope();
        assert!(inner.is_defined("f") && inner.is_defined("arg"));
        assert!(inner.identifiers_storage.is_empty());
        assert_eq!(inner.branch_scope, None);
    }
}
