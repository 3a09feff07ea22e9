use crate::app::models::{extension_of, DisplayMode, ExtensionFilter};

/// Name of the generated document. Never listed or inlined, so repeated runs
/// over the same tree stay stable.
pub const OUTPUT_FILE: &str = "Context_for_ChatGPT.md";

/// Suffixes hidden from the content pass in normal mode: env files, licenses,
/// ignore specs, packaging scripts, package markers and our own CLI test file.
const NOISE_SUFFIXES: &[&str] = &[
    ".env",
    "license",
    "gitignore",
    "setup.py",
    "__init__.py",
    "summarize_cli.rs",
];

/// Substrings marking container build files.
const CONTAINER_MARKERS: &[&str] = &["docker"];

/// Substrings kept by the docker-only mode.
const DEPLOYMENT_MARKERS: &[&str] = &["docker", "requirements.txt"];

/// Decides whether a file's contents are inlined into the document.
pub fn should_include_in_content(
    file_name: &str,
    filter: &ExtensionFilter,
    mode: DisplayMode,
) -> bool {
    if !filter.allows(&extension_of(file_name)) {
        return false;
    }

    let lowered = file_name.to_lowercase();
    let keep = match mode {
        DisplayMode::Normal => {
            !NOISE_SUFFIXES.iter().any(|suffix| lowered.ends_with(suffix))
                && !CONTAINER_MARKERS.iter().any(|marker| lowered.contains(marker))
        }
        DisplayMode::ShowOnlyDocker => {
            DEPLOYMENT_MARKERS.iter().any(|marker| lowered.contains(marker))
        }
        DisplayMode::ShowDocker => true,
    };

    keep && file_name != OUTPUT_FILE
}

/// `level` is 1 for the traversal root.
pub fn within_depth(level: usize, max_depth: Option<usize>) -> bool {
    max_depth.map_or(true, |max| level <= max)
}
