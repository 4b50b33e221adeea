// src/walker.rs

use crate::error::{AtlasError, Result};
use crate::model::{DirectoryEntry, TreeNode};
use crate::scope::ScopeSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Version-control metadata directories, excluded independently of any
/// ignore rule.
const VCS_DIRS: &[&str] = &[".git"];

/// One visibility decision of the depth-first walk. Ignored entries are
/// never emitted, and ignored directories are never descended into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalkEvent {
    EnterDir { name: String, rel: String },
    File { name: String, rel: String },
    LeaveDir,
}

struct Child {
    name: String,
    rel: String,
    path: PathBuf,
    is_dir: bool,
}

/// Lazy depth-first traversal of the visible tree, children in sorted-name
/// order. Finite and restartable: construct a fresh `Walk` per invocation.
pub struct Walk<'a> {
    scopes: &'a ScopeSet,
    stack: Vec<std::vec::IntoIter<Child>>,
}

impl<'a> Walk<'a> {
    /// An unreadable root is fatal; everything below it is best-effort.
    pub fn new(root: &Path, scopes: &'a ScopeSet) -> Result<Walk<'a>> {
        let children = list_children(root, "", scopes)
            .map_err(|e| AtlasError::io(root.display().to_string(), e))?;
        Ok(Walk {
            scopes,
            stack: vec![children.into_iter()],
        })
    }
}

impl Iterator for Walk<'_> {
    type Item = WalkEvent;

    fn next(&mut self) -> Option<WalkEvent> {
        let frame = self.stack.last_mut()?;
        match frame.next() {
            Some(child) if child.is_dir => {
                // A subdirectory that vanished mid-walk is listed as empty.
                let children =
                    list_children(&child.path, &child.rel, self.scopes).unwrap_or_default();
                self.stack.push(children.into_iter());
                Some(WalkEvent::EnterDir {
                    name: child.name,
                    rel: child.rel,
                })
            }
            Some(child) => Some(WalkEvent::File {
                name: child.name,
                rel: child.rel,
            }),
            None => {
                self.stack.pop();
                if self.stack.is_empty() {
                    None
                } else {
                    Some(WalkEvent::LeaveDir)
                }
            }
        }
    }
}

fn list_children(dir: &Path, rel_base: &str, scopes: &ScopeSet) -> io::Result<Vec<Child>> {
    let mut children = Vec::new();
    for entry in fs::read_dir(dir)? {
        // Entries that vanish between listing and stat are treated as
        // already excluded.
        let Ok(entry) = entry else { continue };
        let Ok(file_type) = entry.file_type() else { continue };
        let is_dir = file_type.is_dir();

        let name = entry.file_name().to_string_lossy().into_owned();
        if is_dir && VCS_DIRS.contains(&name.as_str()) {
            continue;
        }
        let rel = if rel_base.is_empty() {
            name.clone()
        } else {
            format!("{rel_base}/{name}")
        };
        if scopes.is_ignored(&rel, is_dir) {
            continue;
        }
        children.push(Child {
            name,
            rel,
            path: entry.path(),
            is_dir,
        });
    }
    children.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(children)
}

/// Walk the tree once, building the nested structure and the flat
/// per-directory listing from the same sequence of visibility decisions.
pub fn index(
    root: &Path,
    root_name: &str,
    scopes: &ScopeSet,
) -> Result<(TreeNode, Vec<DirectoryEntry>)> {
    let mut builder = TreeBuilder::new(root_name);
    for event in Walk::new(root, scopes)? {
        builder.push(event);
    }
    Ok(builder.finish())
}

/// Explicit accumulator threaded through the walk: a stack of open
/// directories for the tree, and the pre-order listing for the flat index.
struct TreeBuilder {
    open_dirs: Vec<(String, String, Vec<TreeNode>)>,
    directories: Vec<DirectoryEntry>,
    open_entries: Vec<usize>,
}

impl TreeBuilder {
    fn new(root_name: &str) -> TreeBuilder {
        TreeBuilder {
            open_dirs: vec![(root_name.to_string(), String::new(), Vec::new())],
            directories: vec![DirectoryEntry {
                relative_path: "./".to_string(),
                children: Vec::new(),
            }],
            open_entries: vec![0],
        }
    }

    fn push(&mut self, event: WalkEvent) {
        match event {
            WalkEvent::EnterDir { name, rel } => {
                let current = *self.open_entries.last().unwrap();
                self.directories[current].children.push(format!("{rel}/"));
                self.directories.push(DirectoryEntry {
                    relative_path: format!("{rel}/"),
                    children: Vec::new(),
                });
                self.open_entries.push(self.directories.len() - 1);
                self.open_dirs.push((name, rel, Vec::new()));
            }
            WalkEvent::File { name, rel } => {
                let current = *self.open_entries.last().unwrap();
                self.directories[current].children.push(rel.clone());
                let (_, _, siblings) = self.open_dirs.last_mut().unwrap();
                siblings.push(TreeNode::File { name, path: rel });
            }
            WalkEvent::LeaveDir => {
                let (name, rel, children) = self.open_dirs.pop().unwrap();
                self.open_entries.pop();
                let (_, _, siblings) = self.open_dirs.last_mut().unwrap();
                siblings.push(TreeNode::Directory {
                    name,
                    path: rel,
                    children,
                });
            }
        }
    }

    fn finish(mut self) -> (TreeNode, Vec<DirectoryEntry>) {
        let (name, _, children) = self.open_dirs.pop().unwrap();
        let root = TreeNode::Directory {
            name,
            path: ".".to_string(),
            children,
        };
        (root, self.directories)
    }
}
