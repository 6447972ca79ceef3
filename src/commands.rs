//! CLI command definitions
//!
//! Defines the clap commands for the harness CLI.

use clap::{Args, Subcommand};
use std::path::PathBuf;

/// Options shared by every command
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// WebSocket endpoint (overrides config and suite file)
    #[arg(long, global = true)]
    pub url: Option<String>,

    /// REST API base URL (overrides config)
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Directory relative artifact paths resolve against
    #[arg(long, global = true)]
    pub artifact_root: Option<PathBuf>,

    /// Configuration file (default: platform config dir)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Bearer token for authenticated API calls
    #[arg(long, global = true, env = "HARNESS_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Echo full frames and enable debug logging
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Also write logs to the harness log file
    #[arg(long, global = true)]
    pub log_file: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a suite file, or the built-in audio suite when none is given
    Run {
        /// YAML suite file
        suite: Option<PathBuf>,
    },

    /// Run a single built-in scenario
    Quick {
        /// Scenario name: tts, sfx or multi-step
        name: String,
    },

    /// Send one message as an ad hoc scenario
    Send {
        /// The instruction to send
        message: String,

        /// File the backend should produce
        #[arg(long)]
        expect: Option<PathBuf>,

        /// Send as a {type, content, session_id} envelope instead of plain text
        #[arg(long)]
        envelope: bool,

        /// Session correlation token
        #[arg(long)]
        session: Option<String>,

        /// Scenario ceiling in seconds
        #[arg(long)]
        timeout: Option<u64>,

        /// Frame cap
        #[arg(long)]
        max_frames: Option<usize>,
    },

    /// List the built-in scenarios
    List,

    /// Call the backend's REST API
    #[command(subcommand)]
    Api(ApiCommands),
}

#[derive(Subcommand)]
pub enum ApiCommands {
    /// Show API health status
    Status,

    /// Register a new account
    Register {
        email: String,
        username: String,
        password: String,
    },

    /// Log in and print the token
    Login { email: String, password: String },

    /// Verify the current token
    Verify,

    /// Upload a file
    Upload {
        file: PathBuf,

        /// Attach the upload to a chat session
        #[arg(long)]
        session: Option<String>,
    },

    /// Show admin statistics
    Stats,

    /// List users
    Users {
        #[arg(long, default_value = "1")]
        page: u32,

        #[arg(long, default_value = "20")]
        limit: u32,

        #[arg(long)]
        search: Option<String>,
    },

    /// Email whitelist management
    #[command(subcommand)]
    Whitelist(WhitelistCommands),
}

#[derive(Subcommand)]
pub enum WhitelistCommands {
    /// Show whether the whitelist is enforced
    Status,
    /// Enforce the whitelist
    Enable,
    /// Stop enforcing the whitelist
    Disable,
    /// List whitelisted emails
    List,
    /// Add an email
    Add { email: String },
    /// Remove an email by ID
    Remove { id: i64 },
}
