// src/model.rs

use chrono::{DateTime, FixedOffset, SecondsFormat, Utc};
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;

/// Classification of a commit's effect on one file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Added,
    Modified,
    Deleted,
    Renamed,
    Other,
}

/// One per-file delta inside a commit, as produced by the commit-stream
/// provider. `old_path` is set for deletes and renames, `new_path` for
/// everything except deletes.
#[derive(Debug, Clone)]
pub struct FileChange {
    pub kind: ChangeKind,
    pub old_path: Option<String>,
    pub new_path: Option<String>,
}

/// One commit as yielded by the stream, oldest first
#[derive(Debug, Clone)]
pub struct CommitRecord {
    /// Full hex id; truncation happens at aggregation time
    pub id: String,
    pub message: String,
    pub author_date: DateTime<Utc>,
    pub commit_date: DateTime<Utc>,
    pub changes: Vec<FileChange>,
}

/// One commit's effect on one file, rendered in the reporting timezone
#[derive(Debug, Clone, Serialize)]
pub struct ChangeEvent {
    pub commit_hash: String,
    pub commit_message: String,
    #[serde(serialize_with = "iso8601")]
    pub author_date: DateTime<FixedOffset>,
    #[serde(serialize_with = "iso8601")]
    pub commit_date: DateTime<FixedOffset>,
    pub change: ChangeKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub old_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_path: Option<String>,
}

/// Per-path change timeline, keyed by the file's current (or last-known)
/// relative path. BTreeMap keeps the output order deterministic.
pub type FileHistories = BTreeMap<String, Vec<ChangeEvent>>;

/// A node of the project tree. Children are sorted by name.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TreeNode {
    File {
        name: String,
        path: String,
    },
    Directory {
        name: String,
        path: String,
        children: Vec<TreeNode>,
    },
}

impl TreeNode {
    pub fn path(&self) -> &str {
        match self {
            TreeNode::File { path, .. } => path,
            TreeNode::Directory { path, .. } => path,
        }
    }
}

/// Flat listing of one visited directory: its relative path (trailing
/// slash, `./` for the root) and its immediate non-ignored children,
/// subdirectories marked with a trailing slash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirectoryEntry {
    pub relative_path: String,
    pub children: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FileMetadata {
    pub language: String,
}

/// One entry of the `files` array: a path that appeared in the analyzed
/// history, whether or not it still exists in the working tree.
#[derive(Debug, Clone, Serialize)]
pub struct FileRecord {
    pub relative_path: String,
    #[serde(rename = "type")]
    pub kind: &'static str,
    #[serde(serialize_with = "iso8601_opt")]
    pub created_at: Option<DateTime<FixedOffset>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<FileMetadata>,
    pub git_history: Vec<ChangeEvent>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProjectRoot {
    pub name: String,
    pub root_path: String,
    pub structure: Vec<TreeNode>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProjectTree {
    pub root: ProjectRoot,
}

/// The complete snapshot document
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub project_tree: ProjectTree,
    pub files: Vec<FileRecord>,
    pub directories: Vec<DirectoryEntry>,
}

fn iso8601<S>(dt: &DateTime<FixedOffset>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&dt.to_rfc3339_opts(SecondsFormat::Secs, true))
}

fn iso8601_opt<S>(dt: &Option<DateTime<FixedOffset>>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match dt {
        Some(dt) => iso8601(dt, serializer),
        None => serializer.serialize_none(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn change_kind_serializes_lowercase() {
        let json = serde_json::to_string(&ChangeKind::Renamed).unwrap();
        assert_eq!(json, "\"renamed\"");
    }

    #[test]
    fn tree_node_is_tagged_by_type() {
        let node = TreeNode::Directory {
            name: "src".into(),
            path: "src".into(),
            children: vec![TreeNode::File {
                name: "main.ts".into(),
                path: "src/main.ts".into(),
            }],
        };
        let value = serde_json::to_value(&node).unwrap();
        assert_eq!(value["type"], "directory");
        assert_eq!(value["children"][0]["type"], "file");
        assert_eq!(value["children"][0]["path"], "src/main.ts");
    }

    #[test]
    fn timestamps_render_z_for_utc() {
        let utc = FixedOffset::east_opt(0).unwrap();
        let event = ChangeEvent {
            commit_hash: "abcd1234".into(),
            commit_message: "init".into(),
            author_date: utc.timestamp_opt(1_700_000_000, 0).unwrap(),
            commit_date: utc.timestamp_opt(1_700_000_000, 0).unwrap(),
            change: ChangeKind::Added,
            old_path: None,
            new_path: Some("a.ts".into()),
        };
        let value = serde_json::to_value(&event).unwrap();
        let rendered = value["author_date"].as_str().unwrap();
        assert!(rendered.ends_with('Z'), "got {rendered}");
        assert!(value.get("old_path").is_none());
    }

    #[test]
    fn timestamps_render_fixed_offset() {
        let jst = FixedOffset::east_opt(9 * 3600).unwrap();
        let event = ChangeEvent {
            commit_hash: "abcd1234".into(),
            commit_message: "init".into(),
            author_date: jst.timestamp_opt(1_700_000_000, 0).unwrap(),
            commit_date: jst.timestamp_opt(1_700_000_000, 0).unwrap(),
            change: ChangeKind::Modified,
            old_path: None,
            new_path: Some("a.ts".into()),
        };
        let value = serde_json::to_value(&event).unwrap();
        assert!(value["author_date"].as_str().unwrap().ends_with("+09:00"));
    }
}
