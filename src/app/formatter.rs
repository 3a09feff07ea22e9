use crate::app::classifier::{should_include_in_content, OUTPUT_FILE};
use crate::app::models::{DisplayMode, ExtensionFilter};
use crate::app::scanner::Scanner;
use std::fs;

const INDENT: &str = "    ";

/// Rules the content pass applies to each file the scanner yields.
#[derive(Debug, Clone, Copy)]
pub struct ContentRules<'a> {
    pub filter: &'a ExtensionFilter,
    pub mode: DisplayMode,
    pub max_lines: Option<usize>,
}

pub struct OutputGenerator;

impl OutputGenerator {
    pub fn generate_tree(scanner: Scanner<'_>) -> String {
        let mut output = String::new();

        for listing in scanner {
            let indent = INDENT.repeat(listing.level.saturating_sub(1));
            output.push_str(&format!("{}{}/\n", indent, listing.display_name()));

            for file in &listing.files {
                let name = file.file_name().unwrap_or_default().to_string_lossy();
                if name == OUTPUT_FILE {
                    continue;
                }
                output.push_str(&format!("{}{}{}\n", indent, INDENT, name));
            }
        }

        output
    }

    pub fn generate_content(scanner: Scanner<'_>, rules: ContentRules<'_>) -> String {
        let mut output = String::new();

        for listing in scanner {
            for file in &listing.files {
                let name = file.file_name().unwrap_or_default().to_string_lossy();
                if !should_include_in_content(&name, rules.filter, rules.mode) {
                    log::debug!("Not inlining {}", file.display());
                    continue;
                }

                let display_path = file.to_string_lossy().replace('\\', "/");
                let bytes = match fs::read(file) {
                    Ok(bytes) => bytes,
                    Err(e) => {
                        log::warn!("Skipping file {}: {}", display_path, e);
                        continue;
                    }
                };
                let Ok(text) = String::from_utf8(bytes) else {
                    log::warn!(
                        "Skipping file {}: unable to decode with UTF-8 encoding.",
                        display_path
                    );
                    continue;
                };

                let body = strip_blank_lines(&truncate_lines(&text, rules.max_lines));
                output.push_str(&format!("## {}\n\n```\n{}\n```\n\n", display_path, body));
            }
        }

        output
    }

    pub fn format_full_output(root: &str, tree: &str, content: &str) -> String {
        let mut out = format!("# Summary of directory: {}\n\n", root);
        out.push_str("```\n");
        out.push_str(tree);
        out.push_str("\n```\n\n");
        out.push_str(content);
        out
    }
}

/// Keeps the first `max_lines` physical lines.
pub fn truncate_lines(text: &str, max_lines: Option<usize>) -> String {
    match max_lines {
        Some(max) => text.split_inclusive('\n').take(max).collect(),
        None => text.to_string(),
    }
}

/// Drops every empty or whitespace-only line. Not reversible.
pub fn strip_blank_lines(text: &str) -> String {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn default_rules(filter: &ExtensionFilter) -> ContentRules<'_> {
        ContentRules {
            filter,
            mode: DisplayMode::Normal,
            max_lines: None,
        }
    }

    #[test]
    fn strips_blank_and_whitespace_lines() {
        let text = "a\n\n   \n\tb\n\t\n c \n\n";
        assert_eq!(strip_blank_lines(text), "a\n\tb\n c ");
        assert_eq!(strip_blank_lines("\r\nx\r\n\r\n"), "x");
        assert_eq!(strip_blank_lines(""), "");
    }

    #[test]
    fn stripping_is_idempotent() {
        let text = "one\n\n two\n  \nthree\n";
        let once = strip_blank_lines(text);
        assert_eq!(strip_blank_lines(&once), once);
    }

    #[test]
    fn truncation_counts_physical_lines() {
        let text = "1\n\n3\n4\n5\n";
        assert_eq!(truncate_lines(text, Some(3)), "1\n\n3\n");
        assert_eq!(strip_blank_lines(&truncate_lines(text, Some(3))), "1\n3");
        assert_eq!(truncate_lines(text, Some(10)), text);
        assert_eq!(truncate_lines(text, None), text);
    }

    #[test]
    fn full_output_layout() {
        let out = OutputGenerator::format_full_output("proj", "proj/\n    a.py\n", "## x\n");
        assert_eq!(
            out,
            "# Summary of directory: proj\n\n```\nproj/\n    a.py\n\n```\n\n## x\n"
        );
    }

    #[test]
    fn tree_indents_by_level_and_skips_output_file() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("proj");
        fs::create_dir_all(root.join("src")).unwrap();
        fs::write(root.join("src/lib.rs"), "").unwrap();
        fs::write(root.join(OUTPUT_FILE), "old").unwrap();

        let tree = OutputGenerator::generate_tree(Scanner::new(&root).unwrap());
        assert_eq!(tree, "proj/\n    src/\n        lib.rs\n");
    }

    #[test]
    fn content_sections_use_root_joined_paths() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.py"), "import os\n\n\nprint(os)\n").unwrap();

        let filter = ExtensionFilter::default();
        let content =
            OutputGenerator::generate_content(Scanner::new(dir.path()).unwrap(), default_rules(&filter));
        let heading = format!("## {}/a.py", dir.path().to_string_lossy().replace('\\', "/"));
        assert_eq!(content, format!("{}\n\n```\nimport os\nprint(os)\n```\n\n", heading));
    }

    #[test]
    fn undecodable_files_are_skipped() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("blob.bin"), [0xff, 0xfe, 0x00, 0x81]).unwrap();
        fs::write(dir.path().join("ok.txt"), "fine").unwrap();

        let filter = ExtensionFilter::default();
        let content =
            OutputGenerator::generate_content(Scanner::new(dir.path()).unwrap(), default_rules(&filter));
        assert!(content.contains("ok.txt"));
        assert!(content.contains("fine"));
        assert!(!content.contains("blob.bin"));
    }

    #[test]
    fn max_lines_applies_before_stripping() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("notes.txt"), "l1\n\nl3\nl4\nl5\n").unwrap();

        let filter = ExtensionFilter::default();
        let rules = ContentRules {
            max_lines: Some(3),
            ..default_rules(&filter)
        };
        let content = OutputGenerator::generate_content(Scanner::new(dir.path()).unwrap(), rules);
        assert!(content.contains("```\nl1\nl3\n```"));
        assert!(!content.contains("l4"));
    }
}
