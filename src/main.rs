// src/main.rs

use chrono::FixedOffset;
use clap::Parser;
use git_atlas::cli::{self, Args};
use git_atlas::error::{AtlasError, Result};
use git_atlas::{analyzer, history, report, scope, walker};
use std::fs;
use std::time::Instant;

fn main() {
    let args = Args::parse();
    let start_time = Instant::now();

    match run(&args) {
        Ok(()) => println!("Total time: {:.2?}", start_time.elapsed()),
        Err(e) => {
            eprintln!("Error indexing repository: {}", e);
            std::process::exit(1);
        }
    }
}

fn run(args: &Args) -> Result<()> {
    let root = fs::canonicalize(&args.repo)
        .map_err(|e| AtlasError::io(args.repo.display().to_string(), e))?;
    let root_name = root
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "project".to_string());
    println!("Analyzing repository: {} (branch: {})", root_name, args.branch);

    let since = args.since.as_deref().map(cli::parse_since).transpose()?;
    let timezone = args
        .utc_offset
        .checked_mul(60)
        .and_then(FixedOffset::east_opt)
        .ok_or(AtlasError::InvalidOffset(args.utc_offset))?;

    let scopes = scope::ScopeSet::build(&root, &args.ignore_files);
    let stream_options = analyzer::StreamOptions {
        branch: args.branch.clone(),
        since,
        track_renames: !args.no_renames,
    };

    // The tree walk and the commit mine share no mutable state; run them
    // as the two independent passes.
    let (walk_result, mine_result) = rayon::join(
        || walker::index(&root, &root_name, &scopes),
        || analyzer::collect_commits(&root, &stream_options),
    );
    let (tree, directories) = walk_result?;
    let records = mine_result?;

    let history_options = history::HistoryOptions {
        hash_len: args.hash_length,
        timezone,
    };
    let histories = history::aggregate(&records, &history_options);
    println!(
        "Mined {} commits touching {} paths.",
        records.len(),
        histories.len()
    );

    let visible = report::visible_files(&tree);
    let snapshot = report::assemble(&root_name, tree, directories, histories, report::language_for);
    let json = serde_json::to_string_pretty(&snapshot)?;
    fs::write(&args.output, json)
        .map_err(|e| AtlasError::io(args.output.display().to_string(), e))?;
    println!("JSON summary created: {}", args.output.display());

    if let Some(file_list) = &args.file_list {
        report::write_file_list(file_list, &visible)?;
        println!("{} files exported to {}", visible.len(), file_list.display());
    }

    Ok(())
}
