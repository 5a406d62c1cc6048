//! Configuration management using the `config` crate for hierarchical discovery and merging.
//!
//! ## Configuration Sources (in precedence order, highest to lowest):
//! 1. **CLI flags** - Highest precedence (clap also reads `SENTINEL_PACKS_*` for its own flags)
//! 2. **Environment variables** - `SENTINEL_PACKS_<SECTION>__<KEY>`, e.g. `SENTINEL_PACKS_GENERAL__AUTHOR`
//! 3. **Config files** - Lowest precedence
//!
//! ## Config File Discovery (in merge order, later overrides earlier):
//! 1. `~/.config/sentinel-packs/config.toml` (user config directory)
//! 2. `sentinel-packs.toml` in the git repository root (walking up from current directory)
//! 3. `./sentinel-packs.toml` in current directory
//! 4. Explicit `--config` path (if provided and exists - overrides all above)
//!
//! ## Usage:
//! ```no_run
//! use sentinel_packs::cli::{args, config};
//!
//! let args = args::parse();
//! let file_config = config::load(&args)?;
//! let merged = config::merge_config(&args, file_config)?;
//! # Ok::<(), anyhow::Error>(())
//! ```

use crate::MergedConfig;
use crate::cli::args::Args;
use crate::generator::DEFAULT_AUTHOR;
use crate::output::get_formatter;
use crate::utils::error::PackError;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File name looked up in the git root and the current directory.
pub const CONFIG_FILE_NAME: &str = "sentinel-packs.toml";

pub const DEFAULT_INPUT: &str = "Sentinel-Queries";
pub const DEFAULT_OUTPUT: &str = "generated-packs";
pub const DEFAULT_FORMAT: &str = "yaml";
pub const DEFAULT_EXTENSION: &str = "kql";
pub const DEFAULT_ROOT_LABEL: &str = "root";

/// Root configuration structure loaded from config files.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub exclude: ExcludeConfig,
}

/// General settings. Unset values fall back to the built-in defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneralConfig {
    pub input: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub format: Option<String>,
    pub author: Option<String>,
    pub extension: Option<String>,
    pub root_label: Option<String>,
}

/// Folder exclusion by substring of the folder's relative path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExcludeConfig {
    #[serde(default = "default_excluded_folders")]
    pub folders: Vec<String>,
}

impl Default for ExcludeConfig {
    fn default() -> Self {
        Self {
            folders: default_excluded_folders(),
        }
    }
}

const GENERAL_KEYS: [&str; 6] = [
    "input",
    "output",
    "format",
    "author",
    "extension",
    "root_label",
];
const EXCLUDE_KEYS: [&str; 1] = ["folders"];

fn default_excluded_folders() -> Vec<String> {
    vec![
        "Diagrams".to_string(),
        "Workbooks".to_string(),
        ".git".to_string(),
    ]
}

fn discover_config_paths(explicit_path: &Path) -> Vec<PathBuf> {
    let mut paths = Vec::new();

    // User config (lowest precedence)
    if let Some(user_config) = get_user_config_path() {
        paths.push(user_config);
    }

    // Git root config
    match find_git_root(Path::new(".")) {
        Ok(Some(git_root)) => {
            let git_config = git_root.join(CONFIG_FILE_NAME);
            if git_config.exists() {
                paths.push(git_config);
            }
        }
        Ok(None) => {}
        Err(e) => tracing::warn!("Skipping git root config: {}", e),
    }

    // Current directory config
    let current_dir_config = PathBuf::from(CONFIG_FILE_NAME);
    if current_dir_config.exists() && !paths.contains(&current_dir_config) {
        paths.push(current_dir_config);
    }

    // Explicit --config path (highest precedence)
    if explicit_path != Path::new(CONFIG_FILE_NAME) {
        if explicit_path.exists() {
            paths.push(explicit_path.to_path_buf());
        } else {
            tracing::warn!("Config file not found: {}", explicit_path.display());
        }
    }

    paths
}

/// Working directory of the repository containing `start`, if any.
///
/// Not being inside a repository is not an error; a repository that cannot
/// be opened is.
fn find_git_root(start: &Path) -> Result<Option<PathBuf>, PackError> {
    match git2::Repository::discover(start) {
        Ok(repo) => Ok(repo.workdir().map(Path::to_path_buf)),
        Err(e) if e.code() == git2::ErrorCode::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Parse a config file as TOML and warn about keys that would be ignored.
fn check_config_file(path: &Path) -> Result<(), PackError> {
    let text = std::fs::read_to_string(path)?;
    let table: toml::Table = toml::from_str(&text)?;

    for key in unknown_config_keys(&table) {
        tracing::warn!("Unknown config key '{}' in {}", key, path.display());
    }
    Ok(())
}

/// Dotted keys in `table` that no config field reads.
fn unknown_config_keys(table: &toml::Table) -> Vec<String> {
    let mut unknown = Vec::new();

    for (section, value) in table {
        let known: &[&str] = match section.as_str() {
            "general" => &GENERAL_KEYS,
            "exclude" => &EXCLUDE_KEYS,
            _ => {
                unknown.push(section.clone());
                continue;
            }
        };

        match value.as_table() {
            Some(entries) => unknown.extend(
                entries
                    .keys()
                    .filter(|key| !known.contains(&key.as_str()))
                    .map(|key| format!("{section}.{key}")),
            ),
            None => unknown.push(section.clone()),
        }
    }

    unknown
}

fn get_user_config_path() -> Option<PathBuf> {
    dirs::config_dir()
        .map(|config_dir| config_dir.join("sentinel-packs").join("config.toml"))
        .filter(|path| path.exists())
}

/// Load configuration from discovered config files and environment variables.
pub fn load(args: &Args) -> Result<Config> {
    let mut builder = config::Config::builder();

    for config_path in discover_config_paths(&args.config) {
        tracing::debug!("Loading config file: {}", config_path.display());
        check_config_file(&config_path)
            .with_context(|| format!("Failed to load config file {}", config_path.display()))?;
        builder = builder.add_source(config::File::from(config_path));
    }

    builder = builder.add_source(
        config::Environment::with_prefix("SENTINEL_PACKS")
            .prefix_separator("_")
            .separator("__")
            .list_separator(",")
            .with_list_parse_key("exclude.folders")
            .try_parsing(true),
    );

    let settings = builder.build().context("Failed to build configuration")?;

    settings
        .try_deserialize()
        .context("Failed to deserialize configuration")
}

/// Merge CLI arguments over the loaded configuration.
///
/// A CLI value wins when given; otherwise the config value, otherwise the
/// built-in default. `--exclude` replaces the configured folder list.
pub fn merge_config(args: &Args, config: Config) -> Result<MergedConfig> {
    let general = config.general;

    let format = match args.format {
        Some(format) => format.as_str().to_string(),
        None => general
            .format
            .unwrap_or_else(|| DEFAULT_FORMAT.to_string())
            .to_lowercase(),
    };
    // Reject unknown formats from config files before any work starts
    get_formatter(&format)?;

    let extension = args
        .extension
        .clone()
        .or(general.extension)
        .unwrap_or_else(|| DEFAULT_EXTENSION.to_string())
        .trim_start_matches('.')
        .to_string();
    if extension.is_empty() {
        return Err(PackError::Config(
            "query file extension must not be empty".to_string(),
        )
        .into());
    }

    let exclude = if args.exclude.is_empty() {
        config.exclude.folders
    } else {
        args.exclude.clone()
    };

    Ok(MergedConfig {
        input: args
            .input
            .clone()
            .or(general.input)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_INPUT)),
        output: args
            .output
            .clone()
            .or(general.output)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT)),
        format,
        author: args
            .author
            .clone()
            .or(general.author)
            .unwrap_or_else(|| DEFAULT_AUTHOR.to_string()),
        extension,
        root_label: args
            .root_label
            .clone()
            .or(general.root_label)
            .unwrap_or_else(|| DEFAULT_ROOT_LABEL.to_string()),
        exclude,
        dry_run: args.dry_run,
        validate_only: args.validate_only,
        verbose: args.verbose,
        quiet: args.quiet,
    })
}
