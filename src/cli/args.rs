use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum PackFormat {
    Yaml,
    Json,
}

/// CLI argument parsing with environment variable support.
///
/// Environment variables follow the pattern `SENTINEL_PACKS_*` and are overridden by CLI flags.
/// Example: `SENTINEL_PACKS_FORMAT=json` is overridden by `--format yaml`.
///
/// Options left unset fall back to the config file, then to built-in defaults.
#[derive(Parser, Debug, Default)]
#[command(name = "sentinel-packs")]
#[command(about = "Generate KQL query packs from a folder tree of .kql query files")]
#[command(version)]
pub struct Args {
    /// Query corpus to scan [default: Sentinel-Queries]
    #[arg(env = "SENTINEL_PACKS_INPUT")]
    pub input: Option<PathBuf>,

    /// Directory the packs are written to [default: generated-packs]
    #[arg(env = "SENTINEL_PACKS_OUTPUT")]
    pub output: Option<PathBuf>,

    /// Pack file format [default: yaml]
    #[arg(short, long, env = "SENTINEL_PACKS_FORMAT")]
    pub format: Option<PackFormat>,

    /// Author recorded in every pack
    #[arg(long, env = "SENTINEL_PACKS_AUTHOR")]
    pub author: Option<String>,

    /// Query file extension [default: kql]
    #[arg(long, env = "SENTINEL_PACKS_EXTENSION")]
    pub extension: Option<String>,

    /// Pack name used for queries directly under the input root [default: root]
    #[arg(long)]
    pub root_label: Option<String>,

    /// Skip folders whose path contains this text (repeatable)
    #[arg(long)]
    pub exclude: Vec<String>,

    /// Config file path
    #[arg(
        short,
        long,
        default_value = "sentinel-packs.toml",
        env = "SENTINEL_PACKS_CONFIG"
    )]
    pub config: PathBuf,

    /// Show the packs that would be generated without writing them
    #[arg(long, env = "SENTINEL_PACKS_DRY_RUN")]
    pub dry_run: bool,

    /// Parse and validate every pack without writing
    #[arg(long)]
    pub validate_only: bool,

    /// Increase verbosity (-v, -vv)
    #[arg(short, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short)]
    pub quiet: bool,
}

impl PackFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            PackFormat::Yaml => "yaml",
            PackFormat::Json => "json",
        }
    }
}

pub fn parse() -> Args {
    Args::parse()
}
