// src/history.rs

use crate::model::{ChangeEvent, CommitRecord, FileHistories};
use chrono::FixedOffset;

/// Rendering knobs for the aggregation fold
#[derive(Debug, Clone)]
pub struct HistoryOptions {
    /// Commit ids are truncated to this many hex digits in the output
    pub hash_len: usize,
    /// Fixed reporting timezone for both timestamps
    pub timezone: FixedOffset,
}

impl Default for HistoryOptions {
    fn default() -> Self {
        HistoryOptions {
            hash_len: 8,
            timezone: FixedOffset::east_opt(0).unwrap(),
        }
    }
}

/// Fold a chronologically ordered commit stream into one timeline per
/// path. Each entry is keyed by its new path when present, otherwise its
/// prior path (deletions carry no new path); entries with neither path
/// are skipped. A rename yields exactly one event, keyed by the new path;
/// no synthetic deletion of the old path is inserted.
pub fn aggregate(records: &[CommitRecord], options: &HistoryOptions) -> FileHistories {
    let mut histories = FileHistories::new();

    for record in records {
        for change in &record.changes {
            let Some(key) = change.new_path.as_deref().or(change.old_path.as_deref()) else {
                continue;
            };
            let event = ChangeEvent {
                commit_hash: record.id.chars().take(options.hash_len).collect(),
                commit_message: record.message.trim().to_string(),
                author_date: record.author_date.with_timezone(&options.timezone),
                commit_date: record.commit_date.with_timezone(&options.timezone),
                change: change.kind,
                old_path: change.old_path.clone(),
                new_path: change.new_path.clone(),
            };
            histories.entry(key.to_string()).or_default().push(event);
        }
    }

    // The stream is already chronological; the stable sort is a safety
    // net for same-instant commits, preserving stream order on ties.
    for events in histories.values_mut() {
        events.sort_by(|a, b| a.author_date.cmp(&b.author_date));
    }

    histories
}
