// Runtime configuration: where the corpus lives and how to normalize it

use crate::metadata::{CitationPolicy, NormalizeOptions, DEFAULT_MIN_YEAR};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

pub const METADATA_FILE: &str = "metadata.json";
pub const MENTIONS_FILE: &str = "mentions.json";
pub const ENTITIES_FILE: &str = "entities.json";

/// Command-line arguments for caselaw-tools
#[derive(Parser, Debug)]
#[command(name = "caselaw-tools")]
#[command(about = "Browse forensic tool mentions in scraped case law")]
#[command(version)]
pub struct Cli {
    #[command(flatten)]
    pub data: DataArgs,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Interactive terminal viewer (default)
    View,
    /// Print case counts; with --tool, also years and courts for that tool
    Summary {
        #[arg(short, long)]
        tool: Option<String>,
    },
}

#[derive(Args, Debug, Clone)]
pub struct DataArgs {
    /// Directory holding metadata.json and mentions.json
    #[arg(short, long, default_value = ".", env = "CASELAW_DATA_DIR")]
    pub data_dir: PathBuf,

    /// Metadata file (relative to data dir unless absolute)
    #[arg(long, default_value = METADATA_FILE)]
    pub metadata: PathBuf,

    /// Mentions file (relative to data dir unless absolute)
    #[arg(long, default_value = MENTIONS_FILE)]
    pub mentions: PathBuf,

    /// Named-entity file; required when given, otherwise used if present
    #[arg(long)]
    pub entities: Option<PathBuf>,

    /// Drop cases decided before this year
    #[arg(long, default_value_t = DEFAULT_MIN_YEAR, env = "CASELAW_MIN_YEAR")]
    pub min_year: i32,

    /// Skip cases with unreadable citations instead of failing
    #[arg(long)]
    pub lenient: bool,
}

/// Resolved file locations plus normalizer settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub metadata_path: PathBuf,
    pub mentions_path: PathBuf,
    pub entities_path: PathBuf,
    /// Whether a missing entities file is an error
    pub entities_required: bool,
    pub normalize: NormalizeOptions,
}

impl Config {
    /// Defaults for a data directory: standard file names, 2006 cutoff, strict citations
    pub fn for_data_dir(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        Self {
            metadata_path: dir.join(METADATA_FILE),
            mentions_path: dir.join(MENTIONS_FILE),
            entities_path: dir.join(ENTITIES_FILE),
            entities_required: false,
            normalize: NormalizeOptions::default(),
        }
    }
}

impl From<&DataArgs> for Config {
    fn from(args: &DataArgs) -> Self {
        // join() keeps absolute paths as they are
        let dir = &args.data_dir;
        let (entities_path, entities_required) = match &args.entities {
            Some(path) => (dir.join(path), true),
            None => (dir.join(ENTITIES_FILE), false),
        };

        Self {
            metadata_path: dir.join(&args.metadata),
            mentions_path: dir.join(&args.mentions),
            entities_path,
            entities_required,
            normalize: NormalizeOptions {
                min_year: args.min_year,
                policy: if args.lenient {
                    CitationPolicy::Lenient
                } else {
                    CitationPolicy::Strict
                },
            },
        }
    }
}
