//! Shopchat - conversational product recommendation client
//!
//! Main entry point: initializes tracing, loads configuration, and
//! dispatches to the command handlers.

use anyhow::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use shopchat::cli::{Cli, Commands, EvalCommand};
use shopchat::commands;
use shopchat::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse_args();

    init_tracing(cli.verbose);

    let config = Config::load(&cli.config, &cli)?;
    config.validate()?;

    match cli.command {
        Commands::Chat { top_k, attach } => {
            tracing::info!("Starting interactive chat session");
            commands::chat::run_chat(config, top_k, attach).await?;
        }
        Commands::Meta => {
            commands::products::show_meta(config).await?;
        }
        Commands::Health => {
            commands::products::check_health(config).await?;
        }
        Commands::Product { id } => {
            commands::products::show_product(config, &id).await?;
        }
        Commands::Similar { id, top_k } => {
            commands::products::show_similar(config, &id, top_k).await?;
        }
        Commands::Eval { command } => match command {
            EvalCommand::Run { mode } => {
                tracing::info!("Starting evaluation run (mode={})", mode);
                commands::eval::run_eval(config, &mode).await?;
            }
            EvalCommand::Summary => {
                commands::eval::show_summary(config).await?;
            }
            EvalCommand::History => {
                commands::eval::show_history(config).await?;
            }
        },
    }

    Ok(())
}

/// Initialize the tracing subscriber
///
/// Honors `RUST_LOG` when set; otherwise defaults to info (or debug with
/// `--verbose`) for this crate only.
fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "shopchat=debug"
    } else {
        "shopchat=info"
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();
}
