//! Core verso library (session, provider, prompts, config).

pub mod config;
pub mod engine;
pub mod events;
pub mod interrupt;
pub mod logging;
pub mod markdown;
pub mod prompts;
pub mod provider;
pub mod session;
