// Declare modules
pub mod classifier;
pub mod cli;
pub mod config;
pub mod error;
pub mod formatter;
pub mod ignore_rules;
pub mod models;
pub mod scanner;
pub mod stats;

use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::path::{Path, PathBuf};

use self::classifier::OUTPUT_FILE;
use self::cli::Cli;
use self::config::resolve_config;
use self::error::SummarizeError;
use self::formatter::{ContentRules, OutputGenerator};
use self::ignore_rules::{discover_gitignore, IgnoreMatcher};
use self::models::RuntimeConfig;
use self::scanner::Scanner;
use self::stats::DocumentStats;

/// Debug output with `--verbose`, warnings and errors otherwise.
pub fn setup_logging(verbose: bool) {
    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };
    let _ = env_logger::Builder::new()
        .filter_level(level)
        .format_timestamp(None)
        .try_init();
    log::debug!("Logger initialized with level: {:?}", level);
}

/// Initializes components and orchestrates data flow.
pub fn run() -> Result<()> {
    // 1. Parse Args
    let args = Cli::parse();
    setup_logging(args.verbose);

    // 2. Resolve Configuration (rejects conflicting display modes)
    let config = resolve_config(args)?;

    // 3. Pick the ignore file
    let ignore = match resolve_gitignore(&config) {
        Some(path) => Some(IgnoreMatcher::compile(&path)?),
        None => None,
    };

    // 4. Build the document
    let document = summarize(&config, ignore.as_ref())?;

    // 5. Write it next to the summarized files
    let output_path = Path::new(&config.directory).join(OUTPUT_FILE);
    fs::write(&output_path, &document).map_err(SummarizeError::OutputWrite)?;

    // 6. Report
    print!("{}", DocumentStats::measure(&document, config.encoding));
    println!();
    let shown = fs::canonicalize(&output_path).unwrap_or(output_path);
    println!("{}", shown.display());

    Ok(())
}

/// Explicit `--gitignore` wins; discovery runs only when asked for.
fn resolve_gitignore(config: &RuntimeConfig) -> Option<PathBuf> {
    if let Some(path) = &config.gitignore {
        if path.is_file() {
            return Some(path.clone());
        }
        log::warn!(
            "Gitignore file {} not found, continuing without ignore rules",
            path.display()
        );
        return None;
    }

    if !config.auto_gitignore {
        return None;
    }
    let found = discover_gitignore(Path::new(&config.directory))?;
    log::info!("Using auto-discovered .gitignore: {}", found.display());
    Some(found)
}

/// Header, tree view, then file sections.
pub fn summarize(config: &RuntimeConfig, ignore: Option<&IgnoreMatcher>) -> Result<String> {
    let open = || {
        Scanner::new(&config.directory)
            .with_context(|| format!("Cannot summarize {}", config.directory))
            .map(|scanner| scanner.ignore(ignore))
    };

    let tree = OutputGenerator::generate_tree(open()?.max_depth(config.depth.tree));
    let content = OutputGenerator::generate_content(
        open()?.max_depth(config.depth.file),
        ContentRules {
            filter: &config.filter,
            mode: config.mode,
            max_lines: config.max_lines,
        },
    );

    Ok(OutputGenerator::format_full_output(
        &config.display_root(),
        &tree,
        &content,
    ))
}
