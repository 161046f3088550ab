//! Provider resolution and credential lifecycle for picoclaw.
//!
//! This crate provides:
//! - Alias resolution from free-form model identifiers to canonical providers
//! - Provider availability aggregated from the model list and legacy provider blocks
//! - The persisted credential store and its freshness evaluation
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────┐     ┌────────────────────────────┐
//! │  model_list entries  │     │  legacy [providers.*]      │
//! │  "doubao/ernie-4"    │     │  api_key / api_base        │
//! └──────────┬───────────┘     └─────────────┬──────────────┘
//!            │ resolve()                     │
//!            ▼                               ▼
//! ┌─────────────────────────────────────────────────────────┐
//! │          aggregate() -> ProviderAvailability            │
//! └─────────────────────────────────────────────────────────┘
//!
//! ┌─────────────────────────────────────────────────────────┐
//! │   CredentialStore (auth.json) -> evaluate(cred, now)    │
//! │          Fresh -> NeedsRefresh -> Expired               │
//! └─────────────────────────────────────────────────────────┘
//! ```

mod error;
mod types;

pub mod auth;
pub mod providers;

pub use error::{Error, Result};
pub use types::{ModelEntry, ProviderConfig};
