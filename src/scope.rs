// src/scope.rs

use crate::ignore::{self, IgnoreRule};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Ignore file picked up at the project root
pub const IGNORE_FILE: &str = ".gitignore";
/// Standing exclude source, always loaded when present and scoped to root
pub const GIT_EXCLUDE: &str = ".git/info/exclude";

/// A base directory (root-relative, `""` for the root itself) plus the
/// ordered rules that govern it and everything beneath it.
#[derive(Debug)]
pub struct IgnoreScope {
    pub base: String,
    pub rules: Vec<IgnoreRule>,
}

impl IgnoreScope {
    /// `rel_path` relative to this scope's base, or None when the scope
    /// does not govern the path.
    fn localize<'a>(&self, rel_path: &'a str) -> Option<&'a str> {
        if self.base.is_empty() {
            return Some(rel_path);
        }
        if rel_path == self.base {
            return Some("");
        }
        rel_path
            .strip_prefix(self.base.as_str())
            .and_then(|rest| rest.strip_prefix('/'))
    }
}

/// All ignore scopes of one run, compiled once and read-only afterwards.
#[derive(Debug, Default)]
pub struct ScopeSet {
    scopes: BTreeMap<String, IgnoreScope>,
}

impl ScopeSet {
    /// Collect ignore sources: the root ignore file, then the explicitly
    /// named extra files (each scoped to its own parent directory), then
    /// the version-control exclude file. Sources sharing a base directory
    /// concatenate in that order, preserving last-match-wins. A source
    /// that does not exist is silently skipped.
    pub fn build(root: &Path, extra_sources: &[String]) -> ScopeSet {
        let mut set = ScopeSet::default();

        set.add_source("", &root.join(IGNORE_FILE));
        for rel in extra_sources {
            let rel = rel.trim_matches('/').replace('\\', "/");
            if rel == GIT_EXCLUDE {
                // Standing source, loaded below at root scope.
                continue;
            }
            let base = match rel.rfind('/') {
                Some(idx) => &rel[..idx],
                None => "",
            };
            set.add_source(base, &root.join(&rel));
        }
        set.add_source("", &root.join(GIT_EXCLUDE));

        set
    }

    fn add_source(&mut self, base: &str, path: &Path) {
        let Ok(text) = fs::read_to_string(path) else {
            return;
        };
        let rules = ignore::compile(text.lines());
        self.scopes
            .entry(base.to_string())
            .or_insert_with(|| IgnoreScope {
                base: base.to_string(),
                rules: Vec::new(),
            })
            .rules
            .extend(rules);
    }

    /// Every scope whose base directory is an ancestor of (or equal to)
    /// `rel_path`.
    pub fn applicable<'a>(&'a self, rel_path: &'a str) -> impl Iterator<Item = &'a IgnoreScope> {
        self.scopes
            .values()
            .filter(move |scope| scope.localize(rel_path).is_some())
    }

    /// A path is ignored when any applicable scope's final matching rule
    /// excludes it. There is no cross-scope negation: a deeper scope
    /// cannot re-include what a shallower one excluded.
    pub fn is_ignored(&self, rel_path: &str, is_dir: bool) -> bool {
        for scope in self.applicable(rel_path) {
            if let Some(local) = scope.localize(rel_path) {
                if ignore::matches(&scope.rules, local, is_dir) {
                    return true;
                }
            }
        }
        false
    }
}
