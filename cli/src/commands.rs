//! Command-line argument definitions

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Invite response coordinator: turns independent member accept/decline
/// responses into one authoritative team registration decision.
#[derive(Parser, Debug)]
#[command(name = "teamvote", version, about)]
pub struct Cli {
    /// Increase log verbosity (-v: info, -vv: debug, -vvv: trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Explicit config file path
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Ignore all config files and use built-in defaults
    #[arg(long, global = true)]
    pub no_config: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create an invite session and send a response link to every member
    Create {
        /// Caller-supplied unique session id (e.g. the registration id)
        #[arg(long)]
        invite: String,

        /// Team the invitation is for
        #[arg(long)]
        team: String,

        /// Tournament slot being offered
        #[arg(long)]
        tournament: String,

        /// Roster member identities (email addresses), at least one
        #[arg(required = true)]
        members: Vec<String>,
    },

    /// Record one member's response and report the session outcome
    Respond {
        /// Session id from the response link
        #[arg(long)]
        invite: String,

        /// Responding member identity
        #[arg(long)]
        member: String,

        /// accept or decline
        value: String,
    },

    /// Show the durable view of a session
    Status {
        /// Session id
        #[arg(long)]
        invite: String,

        /// Print as JSON instead of the human-readable view
        #[arg(long)]
        json: bool,
    },

    /// Print the config file locations being consulted
    ConfigSources,
}
