//! CLI argument definitions.

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

use crate::pages::PageKind;

/// Top-level CLI parser for `gitree`.
#[derive(Debug, Parser)]
#[command(name = "gitree", version, about = "Browse a git repository's commit graph")]
pub struct Cli {
    /// Repository (or any directory inside it) to operate on.
    #[arg(long, global = true, value_name = "DIR")]
    pub repo: Option<PathBuf>,

    /// Settings file; defaults to `.gitree.yaml` in the repository directory.
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase diagnostic output on stderr (repeatable).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// The command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print refs and history as JSON.
    Graph {
        /// Indent the JSON.
        #[arg(long)]
        pretty: bool,
    },
    /// Print one commit with its changed files as JSON.
    Show {
        /// Commit hash or revision.
        hash: String,
    },
    /// Print HEAD, branches, tags and remote branches.
    Refs,
    /// List stash entries.
    Stashes,
    /// Print the HTML document for a page.
    Html {
        /// Page to render.
        #[arg(long, value_enum, default_value_t = PageKind::Graph)]
        page: PageKind,
    },
    /// Answer page messages read as JSON lines on stdin.
    Serve {
        /// Page to serve.
        #[arg(long, value_enum, default_value_t = PageKind::Graph)]
        page: PageKind,
    },
    /// Print the effective settings as YAML.
    Settings,
}
