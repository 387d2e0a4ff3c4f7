//! Session controller
//!
//! One `Session` owns everything a REPL run needs: the immutable identity
//! settings, one handle to the memory store, one handle to the completion
//! service, and the volatile alias table. The loop reads a line, classifies
//! it, and runs the matching handler; no handler failure outlives its own
//! iteration. Only the startup probe is fatal.

use anyhow::{anyhow, Context, Result};
use std::io::{self, Write};

use crate::config::Config;
use crate::handlers;
use crate::llm::CompletionProvider;
use crate::memory::MemoryStore;

pub mod alias;
pub mod command;
pub mod transfer;

use alias::AliasTable;
use command::Command;

/// One interactive tutoring session
pub struct Session {
    user_id: String,
    language: String,
    model: String,
    store: Box<dyn MemoryStore>,
    provider: Box<dyn CompletionProvider>,
    aliases: AliasTable,
}

impl Session {
    /// Create a session from configuration and its two gateways
    pub fn new(
        config: &Config,
        store: Box<dyn MemoryStore>,
        provider: Box<dyn CompletionProvider>,
    ) -> Self {
        Self {
            user_id: config.session.user_id.clone(),
            language: config.session.language.clone(),
            model: config.completion.model.clone(),
            store,
            provider,
            aliases: AliasTable::new(),
        }
    }

    /// Owner of every fact this session touches
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Language the tutor teaches
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Completion model name, for status output
    pub fn model(&self) -> &str {
        &self.model
    }

    /// The memory store gateway
    pub fn store(&self) -> &dyn MemoryStore {
        self.store.as_ref()
    }

    /// The completion service gateway
    pub fn provider(&self) -> &dyn CompletionProvider {
        self.provider.as_ref()
    }

    /// The session's alias table
    pub fn aliases(&self) -> &AliasTable {
        &self.aliases
    }

    /// Mutable access to the alias table, for rebuild and invalidation
    pub fn aliases_mut(&mut self) -> &mut AliasTable {
        &mut self.aliases
    }

    /// Run the session to completion.
    ///
    /// Probes the store once before entering the loop; a store that is
    /// unreachable at startup is the one fatal gateway error. The store
    /// handle is released on every exit path, including error-driven
    /// ones.
    pub async fn run(mut self) -> Result<()> {
        let initial = self
            .store
            .list_all(&self.user_id)
            .await
            .context("Memory store unreachable at startup")?;

        tracing::info!(
            "Session started: user={}, store={}, {} facts on record",
            self.user_id,
            self.store.name(),
            initial.len()
        );
        handlers::print_banner(&self, initial.len());

        let result = self.read_loop().await;
        self.close();
        result
    }

    /// Read lines until exit or end of input, one fully processed at a
    /// time.
    async fn read_loop(&mut self) -> Result<()> {
        loop {
            print!("You: ");
            io::stdout().flush().context("Failed to flush stdout")?;

            let mut line = String::new();
            let bytes = io::stdin()
                .read_line(&mut line)
                .context("Failed to read input")?;
            if bytes == 0 {
                // End of input counts as a clean exit
                println!();
                break;
            }

            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let command = Command::parse(line);
            if command == Command::Exit {
                println!("Goodbye. Your memories are saved.");
                break;
            }

            // Failure boundary: nothing a handler does outlives this
            // iteration.
            if let Err(e) = self.dispatch(command).await {
                println!("⚠  {e:#}");
            }
        }
        Ok(())
    }

    /// Route one classified command to its handler
    async fn dispatch(&mut self, command: Command) -> Result<()> {
        match command {
            Command::Help => {
                handlers::print_help();
                Ok(())
            }
            Command::Stats => handlers::handle_stats(self).await,
            Command::Search(query) => handlers::handle_search(self, &query).await,
            Command::AddFact(text) => handlers::handle_add(self, &text).await,
            Command::ClearAll => handlers::handle_clear(self).await,
            Command::Export => handlers::handle_export(self).await,
            Command::Import(filename) => handlers::handle_import(self, &filename).await,
            Command::ListMemories => handlers::handle_memories(self).await,
            Command::Forget(alias) => handlers::handle_forget(self, &alias).await,
            Command::Chat(text) => handlers::handle_chat(self, &text).await,
            Command::Unknown(keyword) => Err(anyhow!(
                "Unknown command /{keyword}. Type /help for the command list."
            )),
            // Exit never reaches dispatch; the loop handles it.
            Command::Exit => Ok(()),
        }
    }

    /// Release the store handle, exactly once, at session end
    fn close(self) {
        tracing::info!("Releasing memory store handle");
        drop(self.store);
    }
}
