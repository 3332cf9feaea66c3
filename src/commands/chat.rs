//! Interactive chat session handler
//!
//! Runs a readline loop over a `ChatSession`: slash commands manage
//! filters, attachments, regeneration, and resets; everything else is sent
//! to the recommendation agent. Replies render with their product tables.

use crate::api::BackendClient;
use crate::commands::products::product_table;
use crate::commands::special_commands::{parse_special_command, print_help, SpecialCommand};
use crate::config::Config;
use crate::error::Result;
use crate::session::{ChatSession, Role};

use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::path::PathBuf;

/// Start an interactive chat session
///
/// # Arguments
///
/// * `config` - Global configuration (consumed)
/// * `top_k` - Optional per-turn product count override
/// * `attach` - Optional image to attach before the first turn
pub async fn run_chat(config: Config, top_k: Option<u32>, attach: Option<PathBuf>) -> Result<()> {
    let client = BackendClient::new(&config.backend)?;
    let mut session = ChatSession::new(&config.chat, &config.backend);
    if let Some(top_k) = top_k {
        session.set_top_k(top_k.clamp(2, 24));
    }

    // Filter options are a nicety; a missing backend at startup only
    // degrades the panel, the chat itself can still be attempted.
    match client.meta().await {
        Ok(meta) => {
            println!("{}", "Connected.".green());
            println!("  brands:     {}", meta.brands.join(", "));
            println!("  categories: {}", meta.categories.join(", "));
        }
        Err(e) => {
            tracing::warn!("Could not load catalog metadata: {:#}", e);
            println!(
                "{}",
                "Filter options unavailable (backend metadata unreachable).".yellow()
            );
        }
    }

    if let Some(path) = attach {
        match session.attachment_mut().accept_file(&path).await {
            Ok(()) => println!("Attached {}", path.display()),
            Err(e) => println!("{}", format!("Could not attach {}: {}", path.display(), e).red()),
        }
    }

    println!("{}", session.conversation().last().content.cyan());
    println!("Type '/help' for commands.\n");

    let mut rl = DefaultEditor::new()?;

    loop {
        match rl.readline("you> ") {
            Ok(line) => {
                let trimmed = line.trim();
                // An empty line still sends when filters or an attachment
                // are pending for the next turn
                if trimmed.is_empty()
                    && session.filters().is_empty()
                    && session.attachment().pending().is_none()
                {
                    continue;
                }
                rl.add_history_entry(trimmed)?;

                match parse_special_command(trimmed) {
                    Ok(SpecialCommand::SetFilter(key, value)) => {
                        match session.filters_mut().set(key, &value) {
                            Ok(()) => print_filters(&session),
                            Err(msg) => println!("{}", msg.red()),
                        }
                        continue;
                    }
                    Ok(SpecialCommand::RemoveFilter(key)) => {
                        session.filters_mut().remove(key);
                        print_filters(&session);
                        continue;
                    }
                    Ok(SpecialCommand::ShowFilters) => {
                        print_filters(&session);
                        continue;
                    }
                    Ok(SpecialCommand::ClearFilters) => {
                        session.filters_mut().clear();
                        println!("Filters cleared.");
                        continue;
                    }
                    Ok(SpecialCommand::Attach(path)) => {
                        match session.attachment_mut().accept_file(&path).await {
                            Ok(()) => {
                                let pending = session.attachment().pending().unwrap();
                                println!("Attached {} ({})", path.display(), pending.media_type);
                            }
                            Err(e) => println!("{}", format!("{:#}", e).red()),
                        }
                        continue;
                    }
                    Ok(SpecialCommand::Detach) => {
                        session.attachment_mut().remove();
                        println!("Attachment removed.");
                        continue;
                    }
                    Ok(SpecialCommand::Regenerate) => {
                        if session.regenerate(&client).await {
                            print_last_reply(&session);
                        } else {
                            println!("Nothing to regenerate.");
                        }
                        continue;
                    }
                    Ok(SpecialCommand::Reset) => {
                        session.reset();
                        println!("{}", session.conversation().last().content.cyan());
                        continue;
                    }
                    Ok(SpecialCommand::Help) => {
                        print_help();
                        continue;
                    }
                    Ok(SpecialCommand::Exit) => break,
                    Ok(SpecialCommand::None) => {}
                    Err(e) => {
                        println!("{}", e.to_string().red());
                        continue;
                    }
                }

                if session.send(&client, trimmed).await {
                    print_last_reply(&session);
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        }
    }

    println!("Bye!");
    Ok(())
}

/// Prints the most recent assistant reply with its products
fn print_last_reply(session: &ChatSession) {
    let turn = session.conversation().last();
    if turn.role != Role::Assistant {
        return;
    }
    println!("\n{}", turn.content.cyan());
    if !turn.products.is_empty() {
        product_table(&turn.products).printstd();
    }
    println!();
}

/// Prints the active filter chips
fn print_filters(session: &ChatSession) {
    let chips = session.filters().chips();
    if chips.is_empty() {
        println!("No active filters.");
        return;
    }
    let rendered: Vec<String> = chips
        .iter()
        .map(|(key, value)| format!("{}={}", key, value))
        .collect();
    println!("Filters (next turn only): {}", rendered.join("  "));
}
