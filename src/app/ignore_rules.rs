use crate::app::scanner::Scanner;
use anyhow::{Context, Result};
use ignore::gitignore::{Gitignore, GitignoreBuilder};
use std::fs;
use std::path::{Path, PathBuf};

const GITIGNORE: &str = ".gitignore";

/// Patterns compiled from a single gitignore-style file, anchored at the
/// directory containing that file.
#[derive(Debug)]
pub struct IgnoreMatcher {
    base: PathBuf,
    gitignore: Gitignore,
}

impl IgnoreMatcher {
    pub fn compile(ignore_file: &Path) -> Result<Self> {
        let ignore_file = fs::canonicalize(ignore_file)
            .with_context(|| format!("Failed to resolve ignore file {}", ignore_file.display()))?;
        let base = ignore_file
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("/"));

        let mut builder = GitignoreBuilder::new(&base);
        // Bad lines are reported but do not discard the rest of the file.
        if let Some(err) = builder.add(&ignore_file) {
            log::warn!("Problem in {}: {}", ignore_file.display(), err);
        }
        let gitignore = builder
            .build()
            .with_context(|| format!("Failed to compile {}", ignore_file.display()))?;

        log::debug!(
            "Compiled {} ignore patterns from {}",
            gitignore.num_ignores() + gitignore.num_whitelists(),
            ignore_file.display()
        );
        Ok(Self { base, gitignore })
    }

    /// `path` must be absolute. Paths outside the ignore file's directory
    /// never match.
    pub fn matches(&self, path: &Path, is_dir: bool) -> bool {
        if !path.starts_with(&self.base) {
            return false;
        }
        self.gitignore
            .matched_path_or_any_parents(path, is_dir)
            .is_ignore()
    }
}

/// Finds the nearest `.gitignore`: the start directory itself, then its
/// ancestors, then anything below it in filesystem order.
pub fn discover_gitignore(start: &Path) -> Option<PathBuf> {
    let start = fs::canonicalize(start).unwrap_or_else(|_| start.to_path_buf());

    let here = start.join(GITIGNORE);
    if here.is_file() {
        log::info!("Found .gitignore in current directory: {}", here.display());
        return Some(here);
    }

    for ancestor in start.ancestors().skip(1) {
        let candidate = ancestor.join(GITIGNORE);
        if candidate.is_file() {
            log::info!("Found .gitignore in parent directory: {}", candidate.display());
            return Some(candidate);
        }
    }

    // The first match depends on directory enumeration order.
    if let Ok(scanner) = Scanner::new(&start) {
        for listing in scanner.skip(1) {
            if let Some(found) = listing
                .files
                .into_iter()
                .find(|file| file.file_name().is_some_and(|name| name == GITIGNORE))
            {
                log::info!("Found .gitignore in child directory: {}", found.display());
                return Some(found);
            }
        }
    }

    log::info!("No .gitignore file found.");
    None
}
