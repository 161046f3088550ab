//! Provider availability merged from the model list and legacy provider blocks.

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use super::{Addressing, KNOWN_PROVIDERS, KnownProvider, known_provider};
use crate::{ModelEntry, ProviderConfig};

/// Which providers are usable, keyed by canonical provider token.
///
/// Derived on every status query; never persisted. Providers inferred from
/// model entries are kept even when [`KNOWN_PROVIDERS`] has no display
/// mapping for them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderAvailability {
    available: BTreeSet<String>,
    base_urls: BTreeMap<String, String>,
}

/// Display row for a provider from the catalogue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderStatus<'a> {
    /// Catalogue entry with the display label.
    pub provider: &'static KnownProvider,
    /// Whether either config source made the provider usable.
    pub available: bool,
    /// Base URL for base-URL-addressed providers, when configured.
    pub base_url: Option<&'a str>,
}

impl ProviderAvailability {
    /// Mark a provider as available. Availability is never retracted.
    pub fn mark(&mut self, provider: impl Into<String>) {
        self.available.insert(provider.into());
    }

    /// Whether the provider is available.
    pub fn is_available(&self, provider: &str) -> bool {
        self.available.contains(provider)
    }

    /// Resolved base URL of a base-URL-addressed provider.
    pub fn base_url(&self, provider: &str) -> Option<&str> {
        self.base_urls.get(provider).map(String::as_str)
    }

    /// All available providers, sorted.
    pub fn providers(&self) -> impl Iterator<Item = &str> {
        self.available.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.available.len()
    }

    pub fn is_empty(&self) -> bool {
        self.available.is_empty()
    }

    /// One row per catalogue provider, in display order.
    pub fn statuses(&self) -> impl Iterator<Item = ProviderStatus<'_>> {
        KNOWN_PROVIDERS.iter().map(|provider| ProviderStatus {
            provider,
            available: self.is_available(provider.name),
            base_url: self.base_url(provider.name),
        })
    }

    fn record_base_url(&mut self, provider: &str, base_url: &str) {
        self.base_urls
            .insert(provider.to_string(), base_url.to_string());
    }
}

/// Merge both configuration sources into one availability set.
///
/// A provider is available when either source says so. Model entries without
/// a key, or whose identifier names no provider, are skipped.
pub fn aggregate(
    model_entries: &[ModelEntry],
    legacy_providers: &BTreeMap<String, ProviderConfig>,
) -> ProviderAvailability {
    let mut availability = ProviderAvailability::default();

    for entry in model_entries {
        if !entry.has_key() {
            debug!(model = %entry.model, "skipping model entry without api key");
            continue;
        }
        let Some(resolved) = entry.provider() else {
            debug!(model = %entry.model, "skipping model entry without provider prefix");
            continue;
        };
        for provider in resolved.all() {
            availability.mark(provider);
        }
    }

    for (name, config) in legacy_providers {
        let name = name.to_lowercase();
        let addressing = known_provider(&name)
            .map(|p| p.addressing)
            .unwrap_or(Addressing::ApiKey);

        let by_base = addressing == Addressing::BaseUrl && !config.api_base.is_empty();
        if by_base {
            availability.record_base_url(&name, &config.api_base);
        }
        if !config.api_key.is_empty() || by_base {
            availability.mark(name);
        }
    }

    debug!(count = availability.len(), "aggregated provider availability");
    availability
}

#[cfg(test)]
mod tests {
    use super::*;

    fn legacy(entries: &[(&str, ProviderConfig)]) -> BTreeMap<String, ProviderConfig> {
        entries
            .iter()
            .map(|(name, config)| (name.to_string(), config.clone()))
            .collect()
    }

    #[test]
    fn model_list_with_alias_and_empty_key() {
        let models = vec![
            ModelEntry::new("doubao/ernie-4", "k1"),
            ModelEntry::new("gpt/4o", ""),
        ];
        let availability = aggregate(&models, &BTreeMap::new());

        assert_eq!(
            availability.providers().collect::<Vec<_>>(),
            ["doubao", "volcengine"]
        );
        assert!(!availability.is_available("gpt"));
        assert!(!availability.is_available("openai"));
    }

    #[test]
    fn legacy_key_only() {
        let providers = legacy(&[
            ("openai", ProviderConfig::with_key("sk-test")),
            ("anthropic", ProviderConfig::default()),
        ]);
        let availability = aggregate(&[], &providers);

        assert_eq!(availability.providers().collect::<Vec<_>>(), ["openai"]);
        for status in availability.statuses() {
            assert_eq!(status.available, status.provider.name == "openai");
        }
    }

    #[test]
    fn legacy_base_url_provider() {
        let providers = legacy(&[("ollama", ProviderConfig::with_base("http://localhost:11434"))]);
        let availability = aggregate(&[], &providers);

        assert_eq!(availability.providers().collect::<Vec<_>>(), ["ollama"]);
        assert_eq!(
            availability.base_url("ollama"),
            Some("http://localhost:11434")
        );
    }

    #[test]
    fn base_url_ignored_for_key_addressed_provider() {
        let providers = legacy(&[("openai", ProviderConfig::with_base("https://proxy.local/v1"))]);
        let availability = aggregate(&[], &providers);

        assert!(availability.is_empty());
        assert_eq!(availability.base_url("openai"), None);
    }

    #[test]
    fn key_marks_base_url_provider_too() {
        let providers = legacy(&[("vllm", ProviderConfig::with_key("token"))]);
        let availability = aggregate(&[], &providers);

        assert!(availability.is_available("vllm"));
        assert_eq!(availability.base_url("vllm"), None);
    }

    #[test]
    fn sources_are_ored_without_precedence() {
        let models = vec![ModelEntry::new("openai/gpt-4o", "")];
        let providers = legacy(&[("OpenAI", ProviderConfig::with_key("sk-test"))]);
        let availability = aggregate(&models, &providers);

        assert!(availability.is_available("openai"));

        let models = vec![ModelEntry::new("anthropic/claude", "key")];
        let providers = legacy(&[("anthropic", ProviderConfig::default())]);
        assert!(aggregate(&models, &providers).is_available("anthropic"));
    }

    #[test]
    fn unknown_providers_pass_through() {
        let models = vec![ModelEntry::new("mistral/large", "key")];
        let availability = aggregate(&models, &BTreeMap::new());

        assert!(availability.is_available("mistral"));
        assert!(availability.statuses().all(|s| !s.available));
    }

    #[test]
    fn malformed_identifiers_are_skipped() {
        let models = vec![
            ModelEntry::new("gpt-4o", "key"),
            ModelEntry::new("/gpt-4o", "key"),
        ];
        assert!(aggregate(&models, &BTreeMap::new()).is_empty());
    }

    #[test]
    fn adding_keyed_entries_is_monotonic() {
        let mut models = vec![
            ModelEntry::new("kimi/k2", "k"),
            ModelEntry::new("glm/4.7", "k"),
        ];
        let providers = legacy(&[("groq", ProviderConfig::with_key("gk"))]);
        let before = aggregate(&models, &providers);

        for extra in ["gpt/4o", "bogus", "KIMI/k1", "deepseek/chat"] {
            models.push(ModelEntry::new(extra, "k"));
            let after = aggregate(&models, &providers);
            for provider in before.providers() {
                assert!(after.is_available(provider), "{provider} lost after {extra}");
            }
        }
    }

    #[test]
    fn empty_inputs_give_empty_availability() {
        let availability = aggregate(&[], &BTreeMap::new());
        assert!(availability.is_empty());
        assert_eq!(availability.statuses().count(), KNOWN_PROVIDERS.len());
    }
}
