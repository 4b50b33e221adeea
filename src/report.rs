// src/report.rs

use crate::error::{AtlasError, Result};
use crate::model::{
    DirectoryEntry, FileHistories, FileMetadata, FileRecord, ProjectRoot, ProjectTree, Report,
    TreeNode,
};
use std::path::Path;

/// Suffix-based language tag. Unknown and absent suffixes yield no tag,
/// never an error.
pub fn language_for(path: &str) -> Option<&'static str> {
    let ext = Path::new(path).extension()?.to_str()?;
    let language = match ext {
        "js" => "JavaScript",
        "jsx" => "JavaScript (React)",
        "ts" => "TypeScript",
        "tsx" => "TypeScript (React)",
        "html" => "HTML",
        "css" => "CSS",
        "md" => "Markdown",
        "json" => "JSON",
        "rs" => "Rust",
        "py" => "Python",
        "toml" => "TOML",
        "yml" | "yaml" => "YAML",
        _ => return None,
    };
    Some(language)
}

/// Join the tree, the flat directory index and the per-file histories into
/// one snapshot. No cross-validation happens between tree and history: a
/// deleted file keeps its history without a tree entry, and a file outside
/// the mined window sits in the tree with no `files` record.
pub fn assemble(
    root_name: &str,
    tree: TreeNode,
    directories: Vec<DirectoryEntry>,
    histories: FileHistories,
    classifier: impl Fn(&str) -> Option<&'static str>,
) -> Report {
    let files = histories
        .into_iter()
        .map(|(path, history)| {
            let created_at = history.first().map(|event| event.author_date);
            let metadata = classifier(&path).map(|language| FileMetadata {
                language: language.to_string(),
            });
            FileRecord {
                relative_path: path,
                kind: "file",
                created_at,
                metadata,
                git_history: history,
            }
        })
        .collect();

    let structure = match tree {
        TreeNode::Directory { children, .. } => children,
        file @ TreeNode::File { .. } => vec![file],
    };

    Report {
        project_tree: ProjectTree {
            root: ProjectRoot {
                name: root_name.to_string(),
                root_path: ".".to_string(),
                structure,
            },
        },
        files,
        directories,
    }
}

/// Every visible file path in tree order (depth-first, sorted siblings).
pub fn visible_files(tree: &TreeNode) -> Vec<String> {
    fn collect(node: &TreeNode, out: &mut Vec<String>) {
        match node {
            TreeNode::File { path, .. } => out.push(path.clone()),
            TreeNode::Directory { children, .. } => {
                for child in children {
                    collect(child, out);
                }
            }
        }
    }
    let mut out = Vec::new();
    collect(tree, &mut out);
    out
}

/// One-column CSV of the visible file list, forward-slash paths.
pub fn write_file_list(path: &Path, files: &[String]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(["relative_path"])?;
    for file in files {
        writer.write_record([file.as_str()])?;
    }
    writer
        .flush()
        .map_err(|e| AtlasError::io(path.display().to_string(), e))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ChangeEvent, ChangeKind};
    use chrono::{FixedOffset, TimeZone};

    fn event(seconds: i64, kind: ChangeKind, path: &str) -> ChangeEvent {
        let utc = FixedOffset::east_opt(0).unwrap();
        ChangeEvent {
            commit_hash: "abcd1234".into(),
            commit_message: "msg".into(),
            author_date: utc.timestamp_opt(seconds, 0).unwrap(),
            commit_date: utc.timestamp_opt(seconds, 0).unwrap(),
            change: kind,
            old_path: None,
            new_path: Some(path.to_string()),
        }
    }

    fn empty_tree() -> TreeNode {
        TreeNode::Directory {
            name: "project".into(),
            path: ".".into(),
            children: Vec::new(),
        }
    }

    #[test]
    fn created_at_is_the_first_events_author_date() {
        let mut histories = FileHistories::new();
        histories.insert(
            "src/app.ts".into(),
            vec![
                event(1000, ChangeKind::Added, "src/app.ts"),
                event(2000, ChangeKind::Modified, "src/app.ts"),
            ],
        );
        let report = assemble("project", empty_tree(), Vec::new(), histories, language_for);
        let record = &report.files[0];
        assert_eq!(record.created_at.unwrap().timestamp(), 1000);
        assert_eq!(record.git_history.len(), 2);
        assert_eq!(record.kind, "file");
    }

    #[test]
    fn language_tag_is_attached_when_known() {
        let mut histories = FileHistories::new();
        histories.insert(
            "src/app.tsx".into(),
            vec![event(1000, ChangeKind::Added, "src/app.tsx")],
        );
        histories.insert(
            "LICENSE".into(),
            vec![event(1000, ChangeKind::Added, "LICENSE")],
        );
        histories.insert(
            "data.xyz".into(),
            vec![event(1000, ChangeKind::Added, "data.xyz")],
        );
        let report = assemble("project", empty_tree(), Vec::new(), histories, language_for);

        let by_path = |p: &str| {
            report
                .files
                .iter()
                .find(|f| f.relative_path == p)
                .unwrap()
        };
        assert_eq!(
            by_path("src/app.tsx").metadata.as_ref().unwrap().language,
            "TypeScript (React)"
        );
        assert!(by_path("LICENSE").metadata.is_none());
        assert!(by_path("data.xyz").metadata.is_none());
    }

    #[test]
    fn files_are_emitted_in_sorted_path_order() {
        let mut histories = FileHistories::new();
        for path in ["z.ts", "a.ts", "m/t.ts"] {
            histories.insert(path.into(), vec![event(1000, ChangeKind::Added, path)]);
        }
        let report = assemble("project", empty_tree(), Vec::new(), histories, language_for);
        let order: Vec<&str> = report
            .files
            .iter()
            .map(|f| f.relative_path.as_str())
            .collect();
        assert_eq!(order, vec!["a.ts", "m/t.ts", "z.ts"]);
    }

    #[test]
    fn history_only_files_need_no_tree_entry() {
        let mut histories = FileHistories::new();
        histories.insert(
            "deleted.ts".into(),
            vec![event(1000, ChangeKind::Deleted, "deleted.ts")],
        );
        let report = assemble("project", empty_tree(), Vec::new(), histories, language_for);
        assert_eq!(report.files.len(), 1);
        assert!(report.project_tree.root.structure.is_empty());
    }

    #[test]
    fn visible_files_flattens_in_tree_order() {
        let tree = TreeNode::Directory {
            name: "project".into(),
            path: ".".into(),
            children: vec![
                TreeNode::File {
                    name: "a.txt".into(),
                    path: "a.txt".into(),
                },
                TreeNode::Directory {
                    name: "sub".into(),
                    path: "sub".into(),
                    children: vec![TreeNode::File {
                        name: "b.txt".into(),
                        path: "sub/b.txt".into(),
                    }],
                },
            ],
        };
        assert_eq!(visible_files(&tree), vec!["a.txt", "sub/b.txt"]);
    }
}
