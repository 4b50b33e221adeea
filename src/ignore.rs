// src/ignore.rs

use globset::{GlobBuilder, GlobMatcher};

/// One compiled ignore pattern. Polarity, directory restriction and
/// anchoring are stripped off the raw line; the remainder is compiled to a
/// glob where `*` and `?` stay inside one path segment and `**` crosses
/// segment boundaries.
#[derive(Debug, Clone)]
pub struct IgnoreRule {
    pub raw: String,
    /// `!`-prefixed: a match re-includes instead of excluding
    pub negated: bool,
    /// Trailing `/`: the pattern only names directories
    pub dir_only: bool,
    /// Leading `/`: match from the scope base instead of at any depth
    pub anchored: bool,
    matcher: GlobMatcher,
}

impl IgnoreRule {
    /// Whether this rule's pattern matches `rel_path` (relative to the
    /// scope base, forward slashes). Directory-only rules also match any
    /// path strictly below a matching directory.
    fn hit(&self, rel_path: &str, is_dir: bool) -> bool {
        if (is_dir || !self.dir_only) && self.matcher.is_match(rel_path) {
            return true;
        }
        if self.dir_only {
            let mut pos = 0;
            while let Some(i) = rel_path[pos..].find('/') {
                let end = pos + i;
                if self.matcher.is_match(&rel_path[..end]) {
                    return true;
                }
                pos = end + 1;
            }
        }
        false
    }
}

/// Compile ignore-file lines into rules, in order. Blank lines and `#`
/// comments are skipped; a line globset cannot compile is dropped rather
/// than aborting the run.
pub fn compile<I, S>(lines: I) -> Vec<IgnoreRule>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    lines
        .into_iter()
        .filter_map(|line| compile_line(line.as_ref()))
        .collect()
}

fn compile_line(line: &str) -> Option<IgnoreRule> {
    let raw = line.trim();
    if raw.is_empty() || raw.starts_with('#') {
        return None;
    }

    let mut pattern = raw;
    let negated = match pattern.strip_prefix('!') {
        Some(rest) => {
            pattern = rest;
            true
        }
        None => false,
    };
    let dir_only = match pattern.strip_suffix('/') {
        Some(rest) => {
            pattern = rest;
            true
        }
        None => false,
    };
    let anchored = match pattern.strip_prefix('/') {
        Some(rest) => {
            pattern = rest;
            true
        }
        None => false,
    };
    if pattern.is_empty() {
        return None;
    }

    // Unanchored patterns match at any depth below the scope base.
    let glob = if anchored {
        pattern.to_string()
    } else {
        format!("**/{pattern}")
    };
    let matcher = GlobBuilder::new(&glob)
        .literal_separator(true)
        .build()
        .ok()?
        .compile_matcher();

    Some(IgnoreRule {
        raw: raw.to_string(),
        negated,
        dir_only,
        anchored,
        matcher,
    })
}

/// Evaluate every rule in declaration order and keep the verdict of the
/// last one that matches: `Some(true)` excluded, `Some(false)` re-included,
/// `None` untouched by this rule list.
pub fn evaluate(rules: &[IgnoreRule], rel_path: &str, is_dir: bool) -> Option<bool> {
    let mut verdict = None;
    for rule in rules {
        if rule.hit(rel_path, is_dir) {
            verdict = Some(!rule.negated);
        }
    }
    verdict
}

/// Convenience wrapper: is `rel_path` excluded by this rule list?
pub fn matches(rules: &[IgnoreRule], rel_path: &str, is_dir: bool) -> bool {
    evaluate(rules, rel_path, is_dir) == Some(true)
}
