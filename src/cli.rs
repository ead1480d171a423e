use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "subsift")]
#[command(author, version, about = "Pair videos with subtitles and work out what they are")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the content fingerprint and MD5 checksum of a file
    Hash {
        #[arg(required = true)]
        file: PathBuf,
    },

    /// Print the comparison key of one or more file names
    Normalize {
        #[arg(required = true)]
        names: Vec<String>,
    },

    /// Check whether a video and a subtitle belong together
    Match {
        #[arg(required = true)]
        video: String,

        #[arg(required = true)]
        subtitle: String,
    },

    /// Detect a subtitle's language and flags from its name
    Detect {
        #[arg(required = true)]
        subtitle: String,
    },

    /// Resolve the identity of a video file
    Identify {
        #[arg(required = true)]
        video: PathBuf,

        /// Also describe this subtitle file
        #[arg(long)]
        subtitle: Option<PathBuf>,

        /// Skip network lookups (NFO and hashing only)
        #[arg(long)]
        offline: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Pair and resolve every video under a directory
    Scan {
        #[arg(required = true)]
        dir: PathBuf,

        /// Only look at the top level of DIR
        #[arg(long)]
        no_recursive: bool,

        /// Skip network lookups (NFO and hashing only)
        #[arg(long)]
        offline: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Validate configuration file
    Validate {
        /// Config file to validate (uses default if not specified)
        config: Option<PathBuf>,
    },

    /// Display version information
    Version,
}
