use crate::app::stats::TokenEncoding;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Summarize a directory tree into one Markdown document for LLM prompts"
)]
pub struct Cli {
    /// Path to the directory to summarize
    pub directory: String,

    /// Path to the gitignore file (disables auto-discovery)
    #[arg(long)]
    pub gitignore: Option<PathBuf>,

    /// Search for the nearest .gitignore (current, parent, then child directories)
    #[arg(long)]
    pub auto_gitignore: bool,

    /// Comma-separated list of file extensions to include
    #[arg(long, value_delimiter = ',')]
    pub include: Vec<String>,

    /// Comma-separated list of file extensions to exclude
    #[arg(long, value_delimiter = ',')]
    pub exclude: Vec<String>,

    /// Include docker files
    #[arg(short = 'd', long, alias = "show_docker")]
    pub show_docker: bool,

    /// Show only docker files
    #[arg(short = 'o', long, alias = "show_only_docker")]
    pub show_only_docker: bool,

    /// Maximum number of lines to include from each file
    #[arg(short = 'n', long)]
    pub max_lines: Option<usize>,

    /// Tiktoken encoding used for the token estimate [default: cl100k_base]
    #[arg(long, value_enum)]
    pub encoding: Option<TokenEncoding>,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Maximum depth for both the tree and file contents (root = 1)
    #[arg(long, value_parser = parse_depth)]
    pub max_depth: Option<usize>,

    /// Maximum depth for the tree view (overrides --max-depth)
    #[arg(long, value_parser = parse_depth)]
    pub tree_depth: Option<usize>,

    /// Maximum depth for file contents (overrides --max-depth)
    #[arg(long, value_parser = parse_depth)]
    pub file_depth: Option<usize>,

    /// Use a named preset from ~/.config/dirsummary/presets.toml
    #[arg(long)]
    pub preset: Option<String>,
}

fn parse_depth(raw: &str) -> Result<usize, String> {
    match raw.parse::<usize>() {
        Ok(0) => Err("depth starts at 1 (the root directory)".to_string()),
        Ok(depth) => Ok(depth),
        Err(e) => Err(e.to_string()),
    }
}
