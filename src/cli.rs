//! Command-line interface definition for Shopchat
//!
//! This module defines the CLI structure using clap's derive API,
//! providing commands for interactive chat, catalog lookups, and the
//! evaluation dashboard.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Shopchat - conversational product recommendation client
///
/// Chat with the recommendation backend, look up products, and run
/// background evaluation jobs from the terminal.
#[derive(Parser, Debug, Clone)]
#[command(name = "shopchat")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/config.yaml")]
    pub config: String,

    /// Backend base URL (overrides the config file)
    #[arg(long, env = "SHOPCHAT_BASE_URL")]
    pub base_url: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for Shopchat
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start an interactive chat session with the recommendation agent
    Chat {
        /// Override how many products to request per turn (2-24)
        #[arg(long)]
        top_k: Option<u32>,

        /// Attach an image before the first turn
        #[arg(long)]
        attach: Option<PathBuf>,
    },

    /// Show catalog metadata (brands, categories, price range)
    Meta,

    /// Check backend connectivity
    Health,

    /// Show details for one product
    Product {
        /// Product identifier
        id: String,
    },

    /// Show products similar to one product
    Similar {
        /// Product identifier
        id: String,

        /// How many similar products to fetch
        #[arg(long, default_value_t = 6)]
        top_k: u32,
    },

    /// Evaluation dashboard commands
    Eval {
        /// Evaluation subcommand
        #[command(subcommand)]
        command: EvalCommand,
    },
}

/// Evaluation dashboard subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum EvalCommand {
    /// Submit an evaluation job and poll it to completion
    Run {
        /// Evaluation mode: quick, all, retrieval, intent, filters,
        /// diversity, or performance
        #[arg(short, long, default_value = "quick")]
        mode: String,
    },

    /// Show the latest evaluation summary
    Summary,

    /// Show past evaluation runs
    History,
}

impl Cli {
    /// Parse command line arguments
    ///
    /// # Returns
    ///
    /// Returns the parsed CLI structure
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
