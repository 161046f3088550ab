//! Provider identity: the display catalogue, the alias table and the resolver.
//!
//! Model identifiers are free-form `provider/model` strings. The provider
//! token before the first `/` is lowercased and expanded through
//! [`PROVIDER_ALIASES`] so that brand names (`doubao`, `kimi`, ...) also mark
//! the backend they are served by.
//!
//! # Example
//!
//! ```
//! use picoclaw_models::providers::resolve;
//!
//! let resolved = resolve("Doubao/ernie-4").unwrap();
//! let all: Vec<&str> = resolved.all().collect();
//! assert_eq!(all, ["doubao", "volcengine"]);
//!
//! assert!(resolve("ernie-4").is_none());
//! assert!(resolve("/ernie-4").is_none());
//! ```

mod availability;

pub use availability::{ProviderAvailability, ProviderStatus, aggregate};

/// Separator between the provider token and the model name.
pub const PROVIDER_SEPARATOR: char = '/';

/// Provider tokens that also stand for other canonical providers.
///
/// Tokens not listed here map to themselves only. Adding an alias is a data
/// change to this table.
pub const PROVIDER_ALIASES: &[(&str, &[&str])] = &[
    ("doubao", &["volcengine"]),
    ("claude", &["anthropic"]),
    ("gpt", &["openai"]),
    ("tongyi", &["qwen"]),
    ("kimi", &["moonshot"]),
    ("glm", &["zhipu"]),
];

/// How a provider is addressed in its legacy config block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Addressing {
    /// Hosted API, configured by key.
    ApiKey,
    /// Local or self-hosted backend, configured by endpoint.
    BaseUrl,
}

/// A provider the status report knows how to display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KnownProvider {
    /// Canonical provider token.
    pub name: &'static str,
    /// Human-readable label.
    pub label: &'static str,
    /// Addressing mode of the legacy config block.
    pub addressing: Addressing,
}

impl KnownProvider {
    const fn keyed(name: &'static str, label: &'static str) -> Self {
        Self {
            name,
            label,
            addressing: Addressing::ApiKey,
        }
    }

    const fn based(name: &'static str, label: &'static str) -> Self {
        Self {
            name,
            label,
            addressing: Addressing::BaseUrl,
        }
    }

    /// Whether this provider is located by base URL rather than key.
    pub fn is_base_url_addressed(&self) -> bool {
        self.addressing == Addressing::BaseUrl
    }
}

/// Providers with a display mapping, in report order.
pub const KNOWN_PROVIDERS: &[KnownProvider] = &[
    KnownProvider::keyed("openrouter", "OpenRouter"),
    KnownProvider::keyed("anthropic", "Anthropic"),
    KnownProvider::keyed("openai", "OpenAI"),
    KnownProvider::keyed("gemini", "Gemini"),
    KnownProvider::keyed("zhipu", "Zhipu"),
    KnownProvider::keyed("qwen", "Qwen"),
    KnownProvider::keyed("groq", "Groq"),
    KnownProvider::keyed("moonshot", "Moonshot"),
    KnownProvider::keyed("deepseek", "DeepSeek"),
    KnownProvider::keyed("volcengine", "VolcEngine"),
    KnownProvider::keyed("nvidia", "Nvidia"),
    KnownProvider::based("vllm", "vLLM/Local"),
    KnownProvider::based("ollama", "Ollama"),
];

/// Look up a provider in the display catalogue.
pub fn known_provider(name: &str) -> Option<&'static KnownProvider> {
    KNOWN_PROVIDERS.iter().find(|p| p.name == name)
}

/// Aliased equivalents of a lowercased provider token.
pub fn aliases_for(token: &str) -> &'static [&'static str] {
    PROVIDER_ALIASES
        .iter()
        .find(|(t, _)| *t == token)
        .map(|(_, aliases)| *aliases)
        .unwrap_or(&[])
}

/// Canonical provider set named by a model identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedProvider {
    token: String,
    aliases: &'static [&'static str],
}

impl ResolvedProvider {
    /// The lowercased provider token.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Additional canonical providers the token stands for.
    pub fn aliases(&self) -> &'static [&'static str] {
        self.aliases
    }

    /// The token followed by every alias.
    pub fn all(&self) -> impl Iterator<Item = &str> + '_ {
        std::iter::once(self.token.as_str()).chain(self.aliases.iter().copied())
    }
}

/// Resolve the provider set for a model identifier.
///
/// Returns `None` when the identifier has no `/` or the provider token before
/// it is empty.
pub fn resolve(model_id: &str) -> Option<ResolvedProvider> {
    let (prefix, _) = model_id.split_once(PROVIDER_SEPARATOR)?;
    if prefix.is_empty() {
        return None;
    }

    let token = prefix.to_lowercase();
    let aliases = aliases_for(&token);
    Some(ResolvedProvider { token, aliases })
}
