//! CLI argument definitions for the bone mirror command-line interface.
//!
//! All `#[derive(Parser)]` and `#[derive(Subcommand)]` types are defined here,
//! keeping `main.rs` focused on dispatch logic.

use bonemirror_core::MirrorPlane;
use clap::{Args, Parser, Subcommand};

/// Bone Mirror - bind-pose driven skeletal pose mirroring
#[derive(Parser)]
#[command(name = "bonemirror")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub(crate) struct Cli {
    /// Log rule construction and skipped entries to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Inputs shared by every command.
#[derive(Args)]
pub(crate) struct InputArgs {
    /// Path to the skeleton JSON document
    #[arg(short, long)]
    pub skeleton: String,

    /// Path to a configuration file (JSON or YAML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Mirror plane override (xz, yz, xy)
    #[arg(short, long)]
    pub plane: Option<MirrorPlane>,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Show the bone and curve pairs resolved for a skeleton
    Pairs {
        #[command(flatten)]
        input: InputArgs,

        /// Output machine-readable JSON (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Show the flip rule of every mirrored bone
    Rules {
        #[command(flatten)]
        input: InputArgs,

        /// Output machine-readable JSON (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Mirror a pose document
    Mirror {
        #[command(flatten)]
        input: InputArgs,

        /// Path to the pose JSON document
        #[arg(long)]
        pose: String,

        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<String>,

        /// Pretty-print the output JSON
        #[arg(long)]
        pretty: bool,
    },
}
