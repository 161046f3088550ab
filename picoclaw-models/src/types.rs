//! Configuration-side types consumed by the availability aggregator.

use serde::{Deserialize, Serialize};

use crate::providers::{self, ResolvedProvider};

/// One configured model binding from the `model_list` section.
///
/// # Examples
///
/// ```
/// use picoclaw_models::ModelEntry;
///
/// let entry = ModelEntry::new("doubao/ernie-4", "k1");
/// assert!(entry.has_key());
/// assert_eq!(entry.provider().unwrap().token(), "doubao");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelEntry {
    /// Display alias for the binding (e.g., "gpt4").
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub model_name: String,
    /// Model identifier in `provider/model` form.
    pub model: String,
    /// API key; empty means the binding is not configured.
    #[serde(default)]
    pub api_key: String,
    /// Endpoint override for this binding.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub api_base: String,
}

impl ModelEntry {
    /// Create a binding from a model identifier and key.
    pub fn new(model: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            api_key: api_key.into(),
            ..Default::default()
        }
    }

    /// Set the display alias.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.model_name = name.into();
        self
    }

    /// Whether this binding carries a key.
    pub fn has_key(&self) -> bool {
        !self.api_key.is_empty()
    }

    /// Resolve the provider set named by the model identifier.
    pub fn provider(&self) -> Option<ResolvedProvider> {
        providers::resolve(&self.model)
    }
}

/// Legacy explicit per-provider configuration block.
///
/// Empty fields mean "not configured".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Provider API key.
    #[serde(default)]
    pub api_key: String,
    /// Provider API base URL.
    #[serde(default)]
    pub api_base: String,
}

impl ProviderConfig {
    /// Create a key-only provider config.
    pub fn with_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_base: String::new(),
        }
    }

    /// Create a base-URL-only provider config.
    pub fn with_base(api_base: impl Into<String>) -> Self {
        Self {
            api_key: String::new(),
            api_base: api_base.into(),
        }
    }

    /// True when neither field is set.
    pub fn is_empty(&self) -> bool {
        self.api_key.is_empty() && self.api_base.is_empty()
    }
}
