//! CLI argument definitions using clap

use clap::{Parser, Subcommand};
use tutorial_cli::DEFAULT_BASE_URL;
use uuid::Uuid;

/// Command-line client for the tutorial catalogue API
#[derive(Parser, Debug)]
#[command(name = "tutorial")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// API base URL, including the `/api` prefix
    #[arg(long, global = true, env = "TUTORIAL_API_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Log requests and responses to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List tutorials, optionally filtered by title
    List {
        /// Case-insensitive title substring
        #[arg(short, long)]
        title: Option<String>,
    },

    /// List published tutorials
    Published,

    /// Show one tutorial
    Get {
        id: Uuid,
    },

    /// Create a tutorial
    Create {
        #[arg(short, long)]
        title: String,
        #[arg(short, long)]
        description: Option<String>,
        #[arg(short, long)]
        published: bool,
    },

    /// Update the given fields of a tutorial
    Update {
        id: Uuid,
        #[arg(short, long)]
        title: Option<String>,
        #[arg(short, long)]
        description: Option<String>,
        #[arg(short, long)]
        published: Option<bool>,
    },

    /// Delete one tutorial
    Delete {
        id: Uuid,
    },

    /// Delete every tutorial
    DeleteAll,

    /// Fetch the server welcome message
    Ping,
}
