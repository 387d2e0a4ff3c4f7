//! Lingo Engine Library
//!
//! This library provides the core functionality of the lingo tutoring
//! session. It is used by both the main binary and integration tests.

/// Configuration management module
pub mod config;

/// Secret value handling
pub mod secrets;

/// Completion service gateway
pub mod llm;

/// Memory store gateway
pub mod memory;

/// Session controller and REPL loop
pub mod session;

/// Command handlers module
pub mod handlers;

/// Telemetry and Observability
pub mod telemetry;
