//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

/// Build family trees from `Parent: Child, Child` files and find common ancestors
#[derive(Parser, Debug)]
#[command(name = "famtree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Directory offered for tree file selection (default: data, from config)
    #[arg(short = 'd', long, global = true, value_hint = ValueHint::DirPath)]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the family tree
    Show {
        /// Tree file (interactive selection if omitted)
        #[arg(value_hint = ValueHint::FilePath)]
        file: Option<PathBuf>,
        /// Indented listing instead of box drawing
        #[arg(long)]
        plain: bool,
    },

    /// Find the most recent common ancestor of two individuals
    Mrca {
        /// First individual
        first: String,
        /// Second individual
        second: String,
        /// Tree file (interactive selection if omitted)
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        file: Option<PathBuf>,
    },

    /// List the ancestors of an individual, nearest first
    Ancestors {
        /// Individual
        name: String,
        /// Tree file (interactive selection if omitted)
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        file: Option<PathBuf>,
    },

    /// List tree files in the data directory
    List {
        /// Directory (default: data directory)
        #[arg(value_hint = ValueHint::DirPath)]
        dir: Option<PathBuf>,
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
    /// Show effective settings
    Show,
    /// Show config file locations
    Path,
    /// Print a commented config template
    Template,
}
