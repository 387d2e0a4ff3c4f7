//! Command handlers
//!
//! This module implements the handlers for all in-band commands:
//! - memories: list stored facts and assign session aliases
//! - forget: delete one fact by its listed alias
//! - search: show facts relevant to a query
//! - add: store a fact directly
//! - stats: session and store status
//! - export / import: snapshot facts to a file and back
//! - clear: delete every stored fact, after confirmation
//! - chat: the retrieve, generate, persist turn
//!
//! Every handler validates its argument, calls one gateway, prints a
//! deterministic summary, and returns any failure to the REPL loop, which
//! prints it as a one-line warning and keeps going.

use anyhow::{anyhow, Context, Result};
use chrono::Utc;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::llm::Message;
use crate::memory::Fact;
use crate::session::transfer::{self, ExportDocument};
use crate::session::Session;

/// Print the session banner shown once at startup
pub fn print_banner(session: &Session, fact_count: usize) {
    println!();
    println!("=============================================");
    println!("  Personalized {} tutor", session.language());
    println!("  Memory backend: {}", session.store().name());
    if fact_count == 0 {
        println!("  Fresh knowledge base (first run)");
    } else {
        println!("  Facts on record: {}", fact_count);
    }
    println!("  Type /help for commands, exit to quit");
    println!("=============================================");
    println!();
}

/// Print the command reference
pub fn print_help() {
    println!();
    println!("Commands:");
    println!("  /memories          List stored facts with their numbers");
    println!("  /forget <number>   Delete the fact listed under a number");
    println!("  /search <query>    Show facts relevant to a query");
    println!("  /add <fact>        Store a fact directly");
    println!("  /stats             Session and store status");
    println!("  /export            Snapshot all facts to a JSON file");
    println!("  /import <file>     Re-add facts from a snapshot");
    println!("  /clear             Delete every stored fact");
    println!("  /help              Show this list");
    println!("  exit | quit        End the session");
    println!();
    println!("Anything else is a chat turn: relevant facts are recalled,");
    println!("the tutor replies, and the turn is remembered.");
    println!();
}

/// Prompt on stdout and read one trimmed line from stdin
pub fn prompt_line(prompt: &str) -> Result<String> {
    print!("{prompt}");
    io::stdout().flush().context("Failed to flush stdout")?;

    let mut answer = String::new();
    io::stdin()
        .read_line(&mut answer)
        .context("Failed to read input")?;
    Ok(answer.trim().to_string())
}

/// True for the answers accepted as "go ahead" on import
pub fn is_affirmative(answer: &str) -> bool {
    answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes")
}

/// Handle one chat turn: retrieve, generate, print, persist.
///
/// The turn is persisted only after the reply printed; a turn whose
/// generation failed is never remembered.
pub async fn handle_chat(session: &Session, text: &str) -> Result<()> {
    let relevant = session
        .store()
        .search(session.user_id(), text)
        .await
        .context("Could not search memory")?;

    tracing::debug!("Retrieved {} facts for context", relevant.len());
    let context_block = relevant
        .iter()
        .map(|fact| fact.text.as_str())
        .collect::<Vec<_>>()
        .join("\n");

    let system = format!(
        "You are a {} tutor. Personalize your teaching using what you know about the student:\n{}",
        session.language(),
        context_block
    );
    let messages = [Message::system(system), Message::user(text)];

    let reply = session.provider().generate(&messages).await?;
    println!("\nAI: {}\n", reply);

    session
        .store()
        .add(session.user_id(), text)
        .await
        .context("Reply shown, but saving this turn to memory failed")?;
    Ok(())
}

/// List all facts, numbered, and rebuild the alias table in that order
pub async fn handle_memories(session: &mut Session) -> Result<()> {
    let facts = session
        .store()
        .list_all(session.user_id())
        .await
        .context("Could not list memories")?;

    println!();
    println!("Knowledge base:");
    if facts.is_empty() {
        println!("(empty)");
    } else {
        for (i, fact) in facts.iter().enumerate() {
            println!("{}. {}", i + 1, fact.text);
        }
    }
    println!();

    session.aliases_mut().rebuild(&facts);
    Ok(())
}

/// Delete the fact behind a listed alias.
///
/// Rebuilds the table lazily when no listing populated it yet, and
/// invalidates the whole table after a successful delete so stale
/// numbers cannot hit the wrong fact.
pub async fn handle_forget(session: &mut Session, raw_alias: &str) -> Result<()> {
    if raw_alias.is_empty() {
        return Err(anyhow!("Usage: /forget <number>"));
    }
    let alias: u32 = raw_alias
        .parse()
        .map_err(|_| anyhow!("Usage: /forget <number>"))?;

    if session.aliases().is_empty() {
        let facts = session
            .store()
            .list_all(session.user_id())
            .await
            .context("Could not list memories")?;
        session.aliases_mut().rebuild(&facts);
    }

    let Some(fact_id) = session.aliases().resolve(alias).map(str::to_string) else {
        return Err(anyhow!(
            "No memory is listed under {alias}. Run /memories to see current numbering."
        ));
    };

    session
        .store()
        .delete(session.user_id(), &fact_id)
        .await
        .context("Could not delete memory")?;

    session.aliases_mut().invalidate();
    println!("✓ Forgot memory {}.", alias);
    Ok(())
}

/// Show facts relevant to a query, without assigning aliases.
///
/// Results are bulleted, not numbered: only /memories hands out
/// forgettable numbers.
pub async fn handle_search(session: &Session, query: &str) -> Result<()> {
    if query.is_empty() {
        return Err(anyhow!("Usage: /search <query>"));
    }

    let facts = session
        .store()
        .search(session.user_id(), query)
        .await
        .context("Could not search memory")?;

    if facts.is_empty() {
        println!("No relevant memories found.");
        return Ok(());
    }

    println!();
    println!("Relevant memories:");
    for fact in &facts {
        println!("  - {}", fact.text);
    }
    println!();
    Ok(())
}

/// Store a fact directly, bypassing the chat loop
pub async fn handle_add(session: &Session, text: &str) -> Result<()> {
    if text.is_empty() {
        return Err(anyhow!("Usage: /add <fact>"));
    }

    session
        .store()
        .add(session.user_id(), text)
        .await
        .context("Could not save fact")?;

    println!("✓ Remembered: \"{}\"", text);
    Ok(())
}

/// Print session identity and the current stored-fact count
pub async fn handle_stats(session: &Session) -> Result<()> {
    let facts = session
        .store()
        .list_all(session.user_id())
        .await
        .context("Could not reach the memory store")?;

    println!();
    println!("Session status:");
    println!("  User:     {}", session.user_id());
    println!("  Language: {}", session.language());
    println!("  Store:    {}", session.store().name());
    println!("  Model:    {}", session.model());
    println!("  Facts:    {}", facts.len());
    println!();
    Ok(())
}

/// Snapshot every fact into `dir`.
///
/// Returns `None` when there is nothing to export.
pub async fn export_to_dir(session: &Session, dir: &Path) -> Result<Option<(PathBuf, usize)>> {
    let facts = session
        .store()
        .list_all(session.user_id())
        .await
        .context("Could not list memories")?;

    if facts.is_empty() {
        return Ok(None);
    }

    let document = ExportDocument::new(session.user_id(), session.language(), Utc::now(), &facts);
    let path = transfer::write_document(&document, dir).await?;
    Ok(Some((path, facts.len())))
}

/// Export all facts to a file in the working directory
pub async fn handle_export(session: &Session) -> Result<()> {
    match export_to_dir(session, Path::new(".")).await? {
        None => println!("No memories to export."),
        Some((path, count)) => println!("✓ Exported {} memories to {}", count, path.display()),
    }
    Ok(())
}

/// Re-add each exported text as a new fact, skipping entries the store
/// rejects. Ids are never reused; the store assigns fresh ones.
pub async fn import_facts(session: &Session, document: &ExportDocument) -> usize {
    let mut imported = 0;
    for memory in &document.memories {
        match session.store().add(session.user_id(), &memory.text).await {
            Ok(()) => imported += 1,
            Err(e) => tracing::warn!("Skipping one memory during import: {}", e),
        }
    }
    imported
}

/// Import facts from an export document, after confirmation
pub async fn handle_import(session: &Session, filename: &str) -> Result<()> {
    if filename.is_empty() {
        return Err(anyhow!("Usage: /import <file>"));
    }

    let document = transfer::read_document(Path::new(filename)).await?;
    if document.memories.is_empty() {
        println!("Nothing to import.");
        return Ok(());
    }

    println!(
        "Found {} memories for user {} (exported {}).",
        document.memories.len(),
        document.user_id,
        document.export_date.format("%Y-%m-%d")
    );
    let answer = prompt_line("Import them as new memories? [y/N]: ")?;
    if !is_affirmative(&answer) {
        println!("Import cancelled.");
        return Ok(());
    }

    let imported = import_facts(session, &document).await;
    println!(
        "✓ Imported {} of {} memories.",
        imported,
        document.memories.len()
    );
    Ok(())
}

/// Delete every stored fact and empty the alias table, returning how
/// many deletes succeeded. Per-fact failures are logged and skipped.
pub async fn clear_all(session: &mut Session, facts: &[Fact]) -> usize {
    let mut deleted = 0;
    for fact in facts {
        match session.store().delete(session.user_id(), &fact.id).await {
            Ok(()) => deleted += 1,
            Err(e) => tracing::warn!("Could not delete memory {}: {}", fact.id, e),
        }
    }
    session.aliases_mut().invalidate();
    deleted
}

/// Clear the whole knowledge base. Requires the literal answer "yes";
/// anything else deletes nothing.
pub async fn handle_clear(session: &mut Session) -> Result<()> {
    let facts = session
        .store()
        .list_all(session.user_id())
        .await
        .context("Could not list memories")?;

    if facts.is_empty() {
        println!("Nothing to clear.");
        return Ok(());
    }

    let answer = prompt_line(&format!(
        "Delete all {} memories permanently? Type \"yes\" to confirm: ",
        facts.len()
    ))?;
    if answer != "yes" {
        println!("Clear cancelled; nothing deleted.");
        return Ok(());
    }

    let deleted = clear_all(session, &facts).await;
    println!("✓ Cleared {} memories.", deleted);
    Ok(())
}
