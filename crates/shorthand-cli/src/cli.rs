use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "shorthand", about = "Browse shorthand words vocabulary groups", version)]
pub struct Cli {
    /// Emit JSON instead of human-readable text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Base URL of the word-group bucket.
    #[arg(long, global = true, env = "SHORTHAND_BASE_URL")]
    pub base_url: Option<String>,

    /// Directory holding cached group documents.
    #[arg(long, global = true, env = "SHORTHAND_CACHE_DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Also write logs to a daily file in the application cache directory.
    #[arg(long, global = true)]
    pub log_file: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the available word groups.
    Groups,
    /// Load a group and show its summary card.
    Show {
        /// Group id, e.g. out_001.
        group: String,
    },
    /// Show one word of a group in detail.
    Word {
        /// Group id, e.g. out_001.
        group: String,
        /// English spelling (case-insensitive).
        english: String,
    },
    /// Show the mind-map grid of a group.
    MindMap {
        /// Group id, e.g. out_001.
        group: String,
    },
    /// Print the URL of a group's mind-map image.
    ImageUrl {
        /// Group id, e.g. out_001.
        group: String,
    },
    /// Discover groups and load them page by page.
    Browse {
        /// Number of pages to load.
        #[arg(short, long, default_value_t = 1)]
        pages: usize,
    },
    /// Show connectivity and what is cached locally.
    Status,
    /// Manage the local cache.
    #[command(subcommand)]
    Cache(CacheCommand),
    /// Inspect or change the configuration file.
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Subcommand, Debug)]
pub enum CacheCommand {
    /// Delete every cached group.
    Clear,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Print the effective configuration.
    Show,
    /// Persist a new bucket base URL.
    SetBaseUrl {
        /// New base URL.
        url: String,
    },
}
