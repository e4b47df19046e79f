use anyhow::Result;
use std::io::{self, Write};
use tokio::io::{AsyncBufReadExt, BufReader};

use super::output;
use crate::core::analysis::{AnalysisOptions, Platform};
use crate::core::session::ListQuery;

pub async fn run(app: super::App, quiet: bool) -> Result<()> {
    let super::App {
        orchestrator,
        config,
        notices,
    } = app;

    println!("\x1b[1msynsight\x1b[0m v{}", env!("CARGO_PKG_VERSION"));
    println!("API: \x1b[36m{}\x1b[0m", config.api_url);
    println!("Type \x1b[33m/help\x1b[0m for commands, \x1b[33mCtrl-D\x1b[0m to exit.\n");

    output::spawn_notice_printer(notices);
    if !quiet {
        output::spawn_progress_printer(
            orchestrator.subscribe_progress(),
            orchestrator.step_labels().to_vec(),
        );
    }

    let ctx = Context {
        orchestrator: orchestrator.as_ref(),
        page_size: config.page_size,
    };
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let platform = ctx.orchestrator.options().await.platform;
        eprint!("\x1b[32;1msynsight\x1b[0m\x1b[90m({platform})\x1b[0m\x1b[32;1m>\x1b[0m ");
        io::stderr().flush().ok();

        let input = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => {
                // EOF (Ctrl-D)
                println!("\nGoodbye!");
                break;
            }
            Err(e) => {
                eprintln!("Input error: {e}");
                break;
            }
        };

        let input = input.trim();
        if input.is_empty() {
            continue;
        }

        if input.starts_with('/') {
            if !handle_command(input, &ctx).await {
                break;
            }
            continue;
        }

        if let Some(outcome) = ctx.orchestrator.submit_query(input).await {
            output::render_outcome(&outcome);
        }
        println!();
    }

    Ok(())
}

struct Context<'a> {
    orchestrator: &'a crate::orchestrator::SessionOrchestrator,
    page_size: u32,
}

impl Context<'_> {
    /// Expand a short id against the listed sessions. Unknown or ambiguous
    /// prefixes are passed through unchanged.
    async fn resolve_id(&self, prefix: &str) -> String {
        let entries = self.orchestrator.catalog().entries().await;
        let mut matches = entries.iter().filter(|s| s.id.starts_with(prefix));
        match (matches.next(), matches.next()) {
            (Some(only), None) => only.id.clone(),
            _ => prefix.to_string(),
        }
    }
}

/// Returns `false` when the REPL should exit. Gateway failures have already
/// been reported through the notifier.
async fn handle_command(input: &str, ctx: &Context<'_>) -> bool {
    let mut parts = input.splitn(3, char::is_whitespace);
    let command = parts.next().unwrap_or_default();
    let arg = parts.next().map(str::trim).filter(|s| !s.is_empty());
    let rest = parts.next().map(str::trim).filter(|s| !s.is_empty());
    let catalog = ctx.orchestrator.catalog();

    match (command, arg) {
        ("/help" | "/h", _) => print_help(),
        ("/exit" | "/quit" | "/q", _) => {
            println!("Goodbye!");
            return false;
        }
        ("/new" | "/n", _) => {
            ctx.orchestrator.start_new().await;
            println!("Started a new session.");
        }
        ("/list" | "/ls", filter) => {
            let query = ListQuery {
                limit: ctx.page_size,
                archived: filter == Some("archived"),
                ..Default::default()
            };
            if let Ok(sessions) = catalog.list(query).await {
                let current = ctx.orchestrator.current_session_id().await;
                output::render_sessions(&sessions, current.as_deref());
                if let Some(p) = catalog.pagination().await {
                    if p.pages > 1 {
                        println!("\x1b[90mpage {} of {} ({} total)\x1b[0m", p.page, p.pages, p.total);
                    }
                }
            }
        }
        ("/load", Some(id)) => {
            let id = ctx.resolve_id(id).await;
            if ctx.orchestrator.load(&id).await.is_ok() {
                let messages = ctx.orchestrator.messages().await;
                println!("Loaded session {} ({} messages).", output::short_id(&id), messages.len());
            }
        }
        ("/rename", Some(id)) => match rest {
            Some(title) => {
                let id = ctx.resolve_id(id).await;
                if catalog.rename(&id, title).await.is_ok() {
                    println!("Renamed to \"{title}\".");
                }
            }
            None => eprintln!("Usage: /rename <id> <title>"),
        },
        ("/archive", Some(id)) => {
            let id = ctx.resolve_id(id).await;
            let _ = catalog.archive(&id).await;
        }
        ("/pin", Some(id)) => {
            let id = ctx.resolve_id(id).await;
            let pinned = catalog.get(&id).await.is_some_and(|s| s.pinned);
            if catalog.set_pinned(&id, !pinned).await.is_ok() {
                println!("{}", if pinned { "Unpinned." } else { "Pinned." });
            }
        }
        ("/delete", Some(id)) => {
            let id = ctx.resolve_id(id).await;
            if catalog.delete(&id).await.is_ok() {
                println!("Session deleted.");
            }
        }
        ("/clear", Some(id)) => {
            let id = ctx.resolve_id(id).await;
            if catalog.clear_messages(&id).await.is_ok() {
                println!("Session cleared.");
            }
        }
        ("/clear", None) => match ctx.orchestrator.current_session_id().await {
            Some(id) => {
                if catalog.clear_messages(&id).await.is_ok() {
                    println!("Session cleared.");
                }
            }
            None => println!("No active session."),
        },
        ("/platform", None) => {
            println!("Platform: {}", ctx.orchestrator.options().await.platform);
        }
        ("/platform", Some(name)) => match name.parse::<Platform>() {
            Ok(platform) => {
                let options = AnalysisOptions {
                    platform,
                    ..ctx.orchestrator.options().await
                };
                ctx.orchestrator.set_options(options).await;
                println!("Platform set to {platform}.");
            }
            Err(e) => eprintln!("{e}"),
        },
        ("/load" | "/rename" | "/archive" | "/pin" | "/delete", None) => {
            eprintln!("Usage: {command} <id>");
        }
        _ => {
            eprintln!("Unknown command: {input}. Type /help for available commands.");
        }
    }
    true
}

fn print_help() {
    println!("\x1b[1mCommands:\x1b[0m");
    println!("  /new                  Start a new session");
    println!("  /list [archived]      List sessions");
    println!("  /load <id>            Open a session");
    println!("  /rename <id> <title>  Rename a session");
    println!("  /archive <id>         Archive or unarchive a session");
    println!("  /pin <id>             Pin or unpin a session");
    println!("  /delete <id>          Delete a session");
    println!("  /clear [id]           Clear a session's messages");
    println!("  /platform [name]      Show or set the platform (all, twitter, reddit, bluesky)");
    println!("  /help                 Show this help");
    println!("  /quit                 Exit");
    println!("Anything else is sent as a query.");
}
