use crate::app::cli::Cli;
use crate::app::models::{DepthLimits, DisplayMode, ExtensionFilter, RuntimeConfig};
use crate::app::stats::TokenEncoding;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Deserialize, Debug)]
struct PresetsFile {
    #[serde(flatten)]
    presets: HashMap<String, PresetConfig>,
}

#[derive(Deserialize, Debug, Clone, Default)]
struct PresetConfig {
    include: Option<Vec<String>>,
    exclude: Option<Vec<String>>,
    max_lines: Option<usize>,
    max_depth: Option<usize>,
    tree_depth: Option<usize>,
    file_depth: Option<usize>,
    auto_gitignore: Option<bool>,
    encoding: Option<TokenEncoding>,
}

fn presets_path() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".config").join("dirsummary").join("presets.toml"))
}

fn load_presets_file(config_path: &Path) -> Result<HashMap<String, PresetConfig>> {
    if !config_path.exists() {
        return Ok(HashMap::new());
    }

    let content = fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read config at {:?}", config_path))?;

    parse_presets(&content)
}

fn parse_presets(content: &str) -> Result<HashMap<String, PresetConfig>> {
    let parsed: PresetsFile = toml::from_str(content).context("Failed to parse presets.toml")?;
    Ok(parsed.presets)
}

fn merge_vecs(preset_vec: Option<Vec<String>>, cli_vec: Vec<String>) -> Vec<String> {
    let mut combined = preset_vec.unwrap_or_default();
    combined.extend(cli_vec);
    // Deduplicate while keeping order
    let mut seen = std::collections::HashSet::new();
    combined.retain(|item| seen.insert(item.clone()));
    combined
}

/// Folds CLI arguments over the selected preset. Conflicting display flags
/// are rejected before anything else is read.
pub fn resolve_config(cli: Cli) -> Result<RuntimeConfig> {
    let mode = DisplayMode::from_flags(cli.show_docker, cli.show_only_docker)?;
    let presets = load_presets_file(&presets_path()?)?;
    build_config(cli, mode, &presets)
}

fn build_config(
    cli: Cli,
    mode: DisplayMode,
    presets: &HashMap<String, PresetConfig>,
) -> Result<RuntimeConfig> {
    // Preset to use: CLI flag > name of the summarized directory > None
    let project_name = fs::canonicalize(&cli.directory)
        .ok()
        .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()));
    let preset = match (cli.preset.as_deref(), project_name.as_deref()) {
        (Some(name), _) => presets.get(name).cloned().unwrap_or_else(|| {
            log::warn!("Preset '{}' not found, using command-line options only", name);
            PresetConfig::default()
        }),
        (None, Some(name)) => presets.get(name).cloned().unwrap_or_default(),
        (None, None) => PresetConfig::default(),
    };

    let include = merge_vecs(preset.include, cli.include);
    let exclude = merge_vecs(preset.exclude, cli.exclude);

    let config = RuntimeConfig {
        directory: cli.directory,
        gitignore: cli.gitignore,
        auto_gitignore: cli.auto_gitignore || preset.auto_gitignore.unwrap_or(false),
        filter: ExtensionFilter::new(&include, &exclude),
        mode,
        max_lines: cli.max_lines.or(preset.max_lines),
        depth: DepthLimits::resolve(
            cli.max_depth.or(preset.max_depth),
            cli.tree_depth.or(preset.tree_depth),
            cli.file_depth.or(preset.file_depth),
        ),
        encoding: cli.encoding.or(preset.encoding).unwrap_or_default(),
    };

    log::debug!("Resolved configuration: {:?}", config);
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::error::SummarizeError;
    use clap::Parser;
    use tempfile::tempdir;

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("dirsummary").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn docker_conflict_is_rejected_first() {
        let err = resolve_config(cli(&["does-not-exist", "-d", "-o"])).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SummarizeError>(),
            Some(SummarizeError::DisplayModeConflict)
        ));
    }

    #[test]
    fn parses_presets() {
        let presets = parse_presets(
            r#"
            [web]
            include = ["ts", "tsx"]
            max_lines = 50
            encoding = "o200k_base"

            [tools]
            auto_gitignore = true
            "#,
        )
        .unwrap();

        assert_eq!(presets.len(), 2);
        let web = &presets["web"];
        assert_eq!(web.include.as_deref(), Some(&["ts".to_string(), "tsx".to_string()][..]));
        assert_eq!(web.max_lines, Some(50));
        assert_eq!(web.encoding, Some(TokenEncoding::O200kBase));
        assert_eq!(presets["tools"].auto_gitignore, Some(true));
    }

    #[test]
    fn malformed_presets_are_an_error() {
        assert!(parse_presets("[web]\nmax_lines = \"many\"\n").is_err());
    }

    #[test]
    fn missing_presets_file_is_empty() {
        let dir = tempdir().unwrap();
        assert!(load_presets_file(&dir.path().join("presets.toml")).unwrap().is_empty());
    }

    #[test]
    fn cli_values_override_preset_scalars_and_extend_lists() {
        let presets = parse_presets(
            r#"
            [web]
            include = ["ts", "py"]
            max_lines = 50
            max_depth = 4
            encoding = "p50k_base"
            "#,
        )
        .unwrap();

        let args = cli(&[".", "--preset", "web", "--include", "py,rs", "-n", "7", "--file-depth", "2"]);
        let config = build_config(args, DisplayMode::Normal, &presets).unwrap();

        assert_eq!(config.max_lines, Some(7));
        assert_eq!(config.depth, DepthLimits { tree: Some(4), file: Some(2) });
        assert_eq!(config.encoding, TokenEncoding::P50kBase);
        assert_eq!(config.filter.include.len(), 3);
        assert!(config.filter.include.contains(".rs"));
    }

    #[test]
    fn preset_selected_by_directory_name() {
        let dir = tempdir().unwrap();
        let project = dir.path().join("shop");
        fs::create_dir(&project).unwrap();
        let presets = parse_presets("[shop]\nexclude = [\"lock\"]\nauto_gitignore = true\n").unwrap();

        let args = cli(&[project.to_str().unwrap()]);
        let config = build_config(args, DisplayMode::Normal, &presets).unwrap();

        assert!(config.auto_gitignore);
        assert!(config.filter.exclude.contains(".lock"));
    }

    #[test]
    fn unknown_preset_falls_back_to_cli() {
        let args = cli(&[".", "--preset", "missing", "--tree-depth", "3"]);
        let config = build_config(args, DisplayMode::ShowDocker, &HashMap::new()).unwrap();
        assert_eq!(config.depth.tree, Some(3));
        assert_eq!(config.depth.file, None);
        assert_eq!(config.mode, DisplayMode::ShowDocker);
        assert_eq!(config.encoding, TokenEncoding::Cl100kBase);
    }
}
