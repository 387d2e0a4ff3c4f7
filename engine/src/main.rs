// Lingo AI Tutor
// Main entry point for the lingo binary

use anyhow::Context;

use lingo_engine::config::{Config, StoreBackend};
use lingo_engine::llm::{openai::OpenAiProvider, CompletionProvider};
use lingo_engine::memory::{hosted::HostedStore, local::SelfHostedStore, MemoryStore};
use lingo_engine::session::Session;
use lingo_engine::telemetry::{init_telemetry, init_telemetry_with_level};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A .env file is honored when present; absence is not an error
    dotenvy::dotenv().ok();

    // Initialize basic telemetry first (before config is loaded)
    init_telemetry();

    let config = Config::from_env().context("Invalid configuration")?;

    // Re-initialize telemetry with the configured log level
    // (only takes effect if RUST_LOG env var is not set)
    init_telemetry_with_level(&config.log_level);

    tracing::info!(
        "lingo v{} (store: {}, model: {})",
        env!("CARGO_PKG_VERSION"),
        config.store.backend,
        config.completion.model
    );

    let store: Box<dyn MemoryStore> = match (config.store.backend, &config.store.api_key) {
        (StoreBackend::Hosted, Some(api_key)) => Box::new(HostedStore::new(
            config.store.base_url.clone(),
            api_key.clone(),
        )),
        // Config validation guarantees a token for the hosted backend
        (StoreBackend::Hosted, None) => {
            anyhow::bail!("MEM0_API_KEY is required for the hosted store backend")
        }
        (StoreBackend::SelfHosted, _) => {
            Box::new(SelfHostedStore::new(config.store.base_url.clone()))
        }
    };

    let provider: Box<dyn CompletionProvider> =
        Box::new(OpenAiProvider::new(config.completion.clone()));

    Session::new(&config, store, provider).run().await
}
