use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Path to a config.toml (defaults to the per-user config file)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Fetch, summarize and archive an article
    Add {
        url: String,

        /// Category for the article (defaults to the configured one, "General")
        #[arg(long)]
        category: Option<String>,
    },

    /// List archived articles
    List,

    /// Open the archived copy of an article
    Read {
        id: i64,

        /// Print the artifact path instead of opening a browser
        #[arg(long)]
        no_open: bool,
    },

    /// Render the archived copy of an article again
    Rerender { id: i64 },

    /// List categories with their article counts
    Categories,

    /// Serve the HTTP API and web UI
    Serve {
        /// Listen address, e.g. 127.0.0.1:8000
        #[arg(long)]
        addr: Option<String>,
    },
}
