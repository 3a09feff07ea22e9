use crate::app::classifier::within_depth;
use crate::app::ignore_rules::IgnoreMatcher;
use crate::app::models::DirListing;
use anyhow::{bail, Context, Result};
use pathdiff::diff_paths;
use std::fs;
use std::path::{Path, PathBuf};

/// Top-down, depth-first walk yielding one `DirListing` per directory, in the
/// order the filesystem reports entries. Ignored entries and directories past
/// the depth limit are pruned before descent, so their subtrees are never read.
pub struct Scanner<'a> {
    root: PathBuf,
    root_abs: PathBuf,
    ignore: Option<&'a IgnoreMatcher>,
    max_depth: Option<usize>,
    pending: Vec<PathBuf>,
}

impl<'a> Scanner<'a> {
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let root_abs = fs::canonicalize(&root)
            .with_context(|| format!("Failed to resolve directory {}", root.display()))?;
        if !root_abs.is_dir() {
            bail!("Not a directory: {}", root.display());
        }

        Ok(Self {
            pending: vec![root.clone()],
            root,
            root_abs,
            ignore: None,
            max_depth: None,
        })
    }

    pub fn ignore(mut self, matcher: Option<&'a IgnoreMatcher>) -> Self {
        self.ignore = matcher;
        self
    }

    pub fn max_depth(mut self, max_depth: Option<usize>) -> Self {
        self.max_depth = max_depth;
        self
    }

    fn level_of(&self, dir: &Path) -> usize {
        diff_paths(dir, &self.root).map_or(1, |relative| relative.components().count() + 1)
    }

    fn is_ignored(&self, path: &Path, is_dir: bool) -> bool {
        let Some(matcher) = self.ignore else {
            return false;
        };
        match diff_paths(path, &self.root) {
            Some(relative) => matcher.matches(&self.root_abs.join(relative), is_dir),
            None => false,
        }
    }

    fn list(&self, dir: &Path) -> Result<(Vec<PathBuf>, Vec<PathBuf>)> {
        let mut dirs = Vec::new();
        let mut files = Vec::new();

        for entry in fs::read_dir(dir)? {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    log::warn!("Error reading entry in {}: {}", dir.display(), err);
                    continue;
                }
            };

            let name = entry.file_name();
            if name == ".git" {
                continue;
            }

            let path = dir.join(&name);
            let file_type = entry.file_type()?;
            let is_symlink = file_type.is_symlink();
            let is_dir = if is_symlink { path.is_dir() } else { file_type.is_dir() };

            if self.is_ignored(&path, is_dir) {
                log::debug!("Ignored by gitignore: {}", path.display());
                continue;
            }

            if !is_dir {
                files.push(path);
            } else if is_symlink {
                log::debug!("Not following symlinked directory {}", path.display());
            } else {
                dirs.push(path);
            }
        }

        Ok((dirs, files))
    }
}

impl Iterator for Scanner<'_> {
    type Item = DirListing;

    fn next(&mut self) -> Option<DirListing> {
        while let Some(dir) = self.pending.pop() {
            let level = self.level_of(&dir);
            let (mut dirs, files) = match self.list(&dir) {
                Ok(listing) => listing,
                Err(err) => {
                    log::warn!("Error walking {}: {}", dir.display(), err);
                    continue;
                }
            };

            if within_depth(level + 1, self.max_depth) {
                self.pending.extend(dirs.iter().rev().cloned());
            } else if !dirs.is_empty() {
                log::debug!("Depth limit reached, not descending below {}", dir.display());
                dirs.clear();
            }

            return Some(DirListing {
                path: dir,
                level,
                dirs,
                files,
            });
        }
        None
    }
}
