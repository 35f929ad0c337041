// SPDX-FileCopyrightText: 2026 Folio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `folio shell` command implementation.
//!
//! Launches an interactive assistant REPL with colored prompt and
//! streaming output. Model load progress is printed line by line until
//! the session is Ready; each reply streams to stdout as it is
//! generated.

use std::sync::Arc;

use colored::Colorize;
use folio_chat::{ChatSnapshot, ConversationController, ModelSession, SessionPhase, prompt};
use folio_config::FolioConfig;
use folio_core::{FolioError, GenerationEngine};
use folio_engine::LocalEngine;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tokio::sync::watch;

/// Runs the `folio shell` interactive REPL.
///
/// Initializes the engine and session, waits for Ready while printing
/// progress milestones, then reads user lines and streams replies.
pub async fn run_shell(config: FolioConfig) -> Result<(), FolioError> {
    let engine: Arc<dyn GenerationEngine> = Arc::new(LocalEngine::new(&config.engine)?);
    let session = Arc::new(ModelSession::new(engine, config.assistant.clone()));

    let persona = prompt::load_persona(&config.assistant).await?;
    let greeting = format!(
        "Hi! I'm {}'s portfolio assistant. Ask me anything about their work.",
        config.assistant.owner_name
    );
    let mut controller = ConversationController::new(
        session.clone(),
        persona,
        config.assistant.retrieval_top_n,
        Some(greeting),
    );

    // Print load progress until the session leaves Loading.
    let mut phase_rx = session.subscribe();
    let progress = tokio::spawn(async move {
        loop {
            let phase = phase_rx.borrow_and_update().clone();
            match phase {
                SessionPhase::Loading(text) => eprintln!("{}", text.dimmed()),
                SessionPhase::Ready | SessionPhase::Failed(_) => break,
                SessionPhase::Uninitialized => {}
            }
            if phase_rx.changed().await.is_err() {
                break;
            }
        }
    });

    controller.open().await;
    let _ = progress.await;

    if let SessionPhase::Failed(error) = session.phase() {
        eprintln!("{}: {error}", "error".red());
        eprintln!(
            "The model cache may be corrupted. Run {} and start the shell again.",
            "folio reset-cache".yellow()
        );
        return Err(FolioError::engine(error));
    }

    let mut rl = DefaultEditor::new()
        .map_err(|e| FolioError::Internal(format!("failed to initialize readline: {e}")))?;

    println!("{}", "folio shell".bold().green());
    if let Some(welcome) = controller.transcript().first() {
        println!("{}", welcome.content_str().cyan());
    }
    println!("Type {} to exit.\n", "/quit".yellow());

    let prompt_text = format!("{}> ", "you".green());
    loop {
        match rl.readline(&prompt_text) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed == "/quit" || trimmed == "/exit" {
                    break;
                }
                if trimmed.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(&line);

                let printer = tokio::spawn(stream_reply(controller.subscribe()));
                match controller.send(trimmed).await {
                    Ok(()) => {
                        let _ = printer.await;
                    }
                    Err(e) => {
                        printer.abort();
                        eprintln!("{}: {e}", "error".red());
                    }
                }
                println!();
            }
            Err(ReadlineError::Interrupted) => {
                // Ctrl+C
                break;
            }
            Err(ReadlineError::Eof) => {
                // Ctrl+D
                break;
            }
            Err(e) => {
                eprintln!("{}: {e}", "error".red());
                break;
            }
        }
    }

    println!("{}", "goodbye".dimmed());
    Ok(())
}

/// Prints one streaming reply: the suffix of each cumulative increment as
/// it arrives, so text appears exactly once. Any messages appended after
/// the reply (the failure notice) are printed afterwards.
async fn stream_reply(mut rx: watch::Receiver<ChatSnapshot>) {
    let mut reply_index: Option<usize> = None;
    let mut printed = 0usize;
    loop {
        if rx.changed().await.is_err() {
            break;
        }
        let snapshot: ChatSnapshot = rx.borrow_and_update().clone();
        if snapshot.generating {
            // While generating, the streaming reply is the last element.
            let index = snapshot.messages.len() - 1;
            reply_index = Some(index);
            print_suffix(snapshot.messages[index].content_str(), &mut printed);
        } else if let Some(index) = reply_index {
            if let Some(reply) = snapshot.messages.get(index) {
                print_suffix(reply.content_str(), &mut printed);
            }
            for extra in &snapshot.messages[index + 1..] {
                eprintln!("\n{}", extra.content_str().red());
            }
            break;
        }
    }
}

fn print_suffix(text: &str, printed: &mut usize) {
    if text.len() > *printed {
        print!("{}", &text[*printed..]);
        let _ = std::io::Write::flush(&mut std::io::stdout());
        *printed = text.len();
    }
}
