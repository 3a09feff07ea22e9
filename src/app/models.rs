use crate::app::error::SummarizeError;
use crate::app::stats::TokenEncoding;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Represents the final configuration after merging presets and CLI args.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub directory: String,
    pub gitignore: Option<PathBuf>,
    pub auto_gitignore: bool,
    pub filter: ExtensionFilter,
    pub mode: DisplayMode,
    pub max_lines: Option<usize>,
    pub depth: DepthLimits,
    pub encoding: TokenEncoding,
}

impl RuntimeConfig {
    /// Directory argument with `\` separators turned into `/`.
    pub fn display_root(&self) -> String {
        self.directory.replace('\\', "/")
    }
}

/// How container/deployment files are treated by the content pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayMode {
    #[default]
    Normal,
    ShowDocker,
    ShowOnlyDocker,
}

impl DisplayMode {
    pub fn from_flags(show_docker: bool, show_only_docker: bool) -> Result<Self, SummarizeError> {
        match (show_docker, show_only_docker) {
            (true, true) => Err(SummarizeError::DisplayModeConflict),
            (true, false) => Ok(DisplayMode::ShowDocker),
            (false, true) => Ok(DisplayMode::ShowOnlyDocker),
            (false, false) => Ok(DisplayMode::Normal),
        }
    }
}

/// Lower-cased, dot-prefixed extension sets. Exclusion always wins.
#[derive(Debug, Clone, Default)]
pub struct ExtensionFilter {
    pub include: HashSet<String>,
    pub exclude: HashSet<String>,
}

impl ExtensionFilter {
    pub fn new(include: &[String], exclude: &[String]) -> Self {
        Self {
            include: normalize_extensions(include),
            exclude: normalize_extensions(exclude),
        }
    }

    pub fn allows(&self, extension: &str) -> bool {
        if !self.include.is_empty() && !self.include.contains(extension) {
            return false;
        }
        !self.exclude.contains(extension)
    }
}

fn normalize_extensions(raw: &[String]) -> HashSet<String> {
    raw.iter()
        .map(|ext| ext.trim().trim_start_matches('.').to_lowercase())
        .filter(|ext| !ext.is_empty())
        .map(|ext| format!(".{}", ext))
        .collect()
}

/// Lower-cased extension of a file name including the leading dot, or an
/// empty string. Dotfiles such as `.env` have no extension.
pub fn extension_of(file_name: &str) -> String {
    Path::new(file_name)
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy().to_lowercase()))
        .unwrap_or_default()
}

/// Maximum nesting level emitted by each pass (root = 1, `None` = unlimited).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DepthLimits {
    pub tree: Option<usize>,
    pub file: Option<usize>,
}

impl DepthLimits {
    /// The pass-specific limits override the general one.
    pub fn resolve(max: Option<usize>, tree: Option<usize>, file: Option<usize>) -> Self {
        Self {
            tree: tree.or(max),
            file: file.or(max),
        }
    }
}

/// One directory visited by the scanner, with the entries that survived
/// pruning.
#[derive(Debug)]
pub struct DirListing {
    pub path: PathBuf,
    pub level: usize,
    pub dirs: Vec<PathBuf>,
    pub files: Vec<PathBuf>,
}

impl DirListing {
    /// Name used on the directory's tree line.
    pub fn display_name(&self) -> String {
        match self.path.file_name() {
            Some(name) => name.to_string_lossy().into_owned(),
            None => self.path.to_string_lossy().replace('\\', "/"),
        }
    }
}
