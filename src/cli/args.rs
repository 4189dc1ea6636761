//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

/// Settings page registry: resolves contributed preference pages into a page tree
#[derive(Parser, Debug)]
#[command(name = "prefreg")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Config file, layered over the global config
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve contributions and print the page tree
    Tree {
        /// Manifest directory (default: from settings)
        #[arg(short, long, value_hint = ValueHint::DirPath)]
        manifest_dir: Option<PathBuf>,
        /// Show stored values under each page
        #[arg(long)]
        values: bool,
    },

    /// List page contributions in resolved order
    List {
        /// Manifest directory (default: from settings)
        #[arg(short, long, value_hint = ValueHint::DirPath)]
        manifest_dir: Option<PathBuf>,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective configuration
    Show,
    /// Show global config file location
    Path,
    /// Print a commented config template
    Template,
}
