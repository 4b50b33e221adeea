// src/cli.rs

use crate::error::{AtlasError, Result};
use chrono::{DateTime, NaiveDate, Utc};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the root of the git project to index
    pub repo: PathBuf,

    /// Branch whose history is mined
    #[arg(long, default_value = "main")]
    pub branch: String,

    /// Path of the JSON snapshot to write
    #[arg(short, long, default_value = "git_summary.json")]
    pub output: PathBuf,

    /// Extra ignore file (root-relative); applies to its own directory.
    /// May be given multiple times.
    #[arg(long = "ignore-file", value_name = "REL_PATH")]
    pub ignore_files: Vec<String>,

    /// Only mine commits authored at or after this time
    /// (YYYY-MM-DD or RFC 3339)
    #[arg(long)]
    pub since: Option<String>,

    /// Reporting timezone as minutes east of UTC
    #[arg(long, default_value_t = 0)]
    pub utc_offset: i32,

    /// Length commit ids are truncated to in the output
    #[arg(long, default_value_t = 8)]
    pub hash_length: usize,

    /// Disable rename detection in the commit stream
    #[arg(long)]
    pub no_renames: bool,

    /// Also write the flat list of visible files as CSV
    #[arg(long, value_name = "PATH")]
    pub file_list: Option<PathBuf>,
}

/// `--since` accepts a bare date (midnight UTC) or a full RFC 3339
/// timestamp.
pub fn parse_since(value: &str) -> Result<DateTime<Utc>> {
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return Ok(midnight.and_utc());
        }
    }
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| AtlasError::InvalidSince(value.to_string()))
}
