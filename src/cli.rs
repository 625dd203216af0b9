//! CLI definitions for mylist-register.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// mylist-register CLI.
#[derive(Parser)]
#[command(name = "mylist-register")]
#[command(about = "Register video lists into a playlist through headless browser sessions")]
#[command(version)]
pub(crate) struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.toml", global = true)]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Serve invocations over HTTP (default)
    Serve {
        /// Server host, overrides the configuration
        #[arg(long)]
        host: Option<String>,

        /// Server port, overrides the configuration
        #[arg(long)]
        port: Option<u16>,
    },

    /// Register the list from the environment in one run
    Batch {
        /// Playlist title, generated when absent
        #[arg(long)]
        title: Option<String>,
    },

    /// Encrypt a password with the configured shared secret
    Encrypt {
        /// Plaintext password
        #[arg(env = "MYLIST_PLAINTEXT_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Validate the configuration file and print warnings
    Check,
}
