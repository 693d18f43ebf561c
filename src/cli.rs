use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "wordsuggest")]
#[command(about = "wordsuggest - Prefix-based word suggestions ranked by frequency.")]
#[command(version = env!("VERSION"))]
pub struct Cli {
    /// Path to one or more config files (merged in order).
    #[arg(long, default_value = "config.toml", action = clap::ArgAction::Append)]
    pub config: Vec<PathBuf>,

    /// Path to the word,frequency CSV file. Overrides `app.data_file` in the config.
    #[arg(long)]
    pub data: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate a sample config file.
    NewConfig {
        /// Output path for config file.
        #[arg(short, long, default_value = "config.toml")]
        path: PathBuf,
    },

    /// Load the data file and print the word tree, one node per line.
    Dump {
        /// Only print the subtree under this prefix.
        #[arg(long, default_value = "")]
        prefix: String,
    },
}
