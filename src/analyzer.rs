// src/analyzer.rs

use crate::error::{AtlasError, Result};
use crate::model::{ChangeKind, CommitRecord, FileChange};
use chrono::{DateTime, TimeZone, Utc};
use git2::{BranchType, Delta, DiffFindOptions, DiffOptions, Repository, Sort};
use indicatif::ProgressBar;
use std::path::Path;

/// Configuration of the commit-stream boundary
#[derive(Debug, Clone)]
pub struct StreamOptions {
    /// Local branch whose history is mined
    pub branch: String,
    /// Lower bound on author time; older commits are never diffed
    pub since: Option<DateTime<Utc>>,
    /// Run rename detection on each commit's diff
    pub track_renames: bool,
}

impl Default for StreamOptions {
    fn default() -> Self {
        StreamOptions {
            branch: "main".to_string(),
            since: None,
            track_renames: true,
        }
    }
}

/// Walk the named branch oldest to newest and yield one record per commit
/// with its per-file deltas. A repository that cannot be opened or a
/// branch that does not exist is fatal.
pub fn collect_commits(repo_path: &Path, options: &StreamOptions) -> Result<Vec<CommitRecord>> {
    let repo = Repository::open(repo_path)?;

    let branch = repo
        .find_branch(&options.branch, BranchType::Local)
        .map_err(|_| AtlasError::BranchNotFound(options.branch.clone()))?;
    let tip = branch.get().peel_to_commit()?;

    // 1. Collect the branch's commits and order them chronologically.
    let mut revwalk = repo.revwalk()?;
    revwalk.push(tip.id())?;
    revwalk.set_sorting(Sort::TIME)?;
    let mut oids = Vec::new();
    for oid in revwalk {
        oids.push(oid?);
    }
    oids.reverse(); // Walk from the first commit to the last

    let bar = ProgressBar::new(oids.len() as u64);
    bar.set_message("Mining commits");

    // 2. Diff each commit against its first parent and classify deltas.
    let mut records = Vec::new();
    for oid in oids {
        let commit = repo.find_commit(oid)?;
        let author_date = timestamp(commit.author().when().seconds());

        // The --since cutoff filters at the source: skipped commits are
        // never diffed.
        if let Some(cutoff) = options.since {
            if author_date < cutoff {
                bar.inc(1);
                continue;
            }
        }

        let parent_tree = match commit.parent(0) {
            Ok(parent) => Some(parent.tree()?),
            Err(_) => None,
        };
        let current_tree = commit.tree()?;

        let mut diff_opts = DiffOptions::new();
        diff_opts.include_untracked(false);
        diff_opts.ignore_filemode(true);
        let mut diff = repo.diff_tree_to_tree(
            parent_tree.as_ref(),
            Some(&current_tree),
            Some(&mut diff_opts),
        )?;
        if options.track_renames {
            let mut find_opts = DiffFindOptions::new();
            find_opts.renames(true);
            diff.find_similar(Some(&mut find_opts))?;
        }

        let mut changes = Vec::new();
        for delta in diff.deltas() {
            let kind = classify(delta.status());
            let old_path = delta
                .old_file()
                .path()
                .and_then(|p| p.to_str())
                .map(String::from);
            let new_path = delta
                .new_file()
                .path()
                .and_then(|p| p.to_str())
                .map(String::from);
            let (old_path, new_path) = contract_paths(kind, old_path, new_path);
            changes.push(FileChange {
                kind,
                old_path,
                new_path,
            });
        }

        records.push(CommitRecord {
            id: oid.to_string(),
            message: commit.message().unwrap_or_default().to_string(),
            author_date,
            commit_date: timestamp(commit.time().seconds()),
            changes,
        });
        bar.inc(1);
    }
    bar.finish_with_message("Commit mining complete");

    Ok(records)
}

fn classify(status: Delta) -> ChangeKind {
    match status {
        Delta::Added => ChangeKind::Added,
        Delta::Modified => ChangeKind::Modified,
        Delta::Deleted => ChangeKind::Deleted,
        Delta::Renamed => ChangeKind::Renamed,
        _ => ChangeKind::Other,
    }
}

/// libgit2 fills both sides of a delta with the same path for adds,
/// deletes and edits; reduce that to the stream contract, where a prior
/// path exists only for deletes and renames and a new path for everything
/// except deletes.
fn contract_paths(
    kind: ChangeKind,
    old_path: Option<String>,
    new_path: Option<String>,
) -> (Option<String>, Option<String>) {
    match kind {
        ChangeKind::Deleted => (old_path, None),
        ChangeKind::Renamed => (old_path, new_path),
        _ => (None, new_path),
    }
}

fn timestamp(seconds: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(seconds, 0)
        .single()
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contract_paths_strips_redundant_sides() {
        let (old, new) = contract_paths(
            ChangeKind::Added,
            Some("a.ts".into()),
            Some("a.ts".into()),
        );
        assert_eq!(old, None);
        assert_eq!(new.as_deref(), Some("a.ts"));

        let (old, new) = contract_paths(
            ChangeKind::Deleted,
            Some("gone.ts".into()),
            Some("gone.ts".into()),
        );
        assert_eq!(old.as_deref(), Some("gone.ts"));
        assert_eq!(new, None);

        let (old, new) = contract_paths(
            ChangeKind::Renamed,
            Some("a.ts".into()),
            Some("b.ts".into()),
        );
        assert_eq!(old.as_deref(), Some("a.ts"));
        assert_eq!(new.as_deref(), Some("b.ts"));
    }

    #[test]
    fn unknown_delta_statuses_map_to_other() {
        assert_eq!(classify(Delta::Copied), ChangeKind::Other);
        assert_eq!(classify(Delta::Typechange), ChangeKind::Other);
        assert_eq!(classify(Delta::Renamed), ChangeKind::Renamed);
    }
}
