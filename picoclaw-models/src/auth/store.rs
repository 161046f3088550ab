//! Read-only view of the persisted credential store.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::debug;

use super::{Credential, CredentialStatus};
use crate::{Error, Result};

/// Provider credentials loaded from `auth.json`.
///
/// The file has the shape `{ "credentials": { "<provider>": { ... } } }`.
/// The store is a snapshot: it is loaded once per invocation and never
/// written back from here.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CredentialStore {
    #[serde(default)]
    credentials: BTreeMap<String, Credential>,
}

impl CredentialStore {
    /// Load the store from `path`.
    ///
    /// A missing file is an empty store.
    ///
    /// # Errors
    ///
    /// Returns `Error::CredentialStore` if the file exists but cannot be read
    /// or is not valid JSON.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no credential store found");
                return Ok(Self::default());
            }
            Err(e) => return Err(Error::store(path, e)),
        };

        let store = Self::from_json(&contents).map_err(|e| Error::store(path, e))?;
        debug!(
            path = %path.display(),
            count = store.len(),
            "loaded credential store"
        );
        Ok(store)
    }

    /// Parse a store from its JSON representation.
    pub fn from_json(json: &str) -> Result<Self> {
        let mut store: Self = serde_json::from_str(json)?;
        for (provider, cred) in store.credentials.iter_mut() {
            if cred.provider.is_empty() {
                cred.provider = provider.clone();
            }
        }
        Ok(store)
    }

    /// Build a store from credentials, keyed by their provider.
    pub fn from_credentials(credentials: impl IntoIterator<Item = Credential>) -> Self {
        Self {
            credentials: credentials
                .into_iter()
                .map(|cred| (cred.provider.clone(), cred))
                .collect(),
        }
    }

    /// Credential stored for a provider.
    pub fn get(&self, provider: &str) -> Option<&Credential> {
        self.credentials.get(provider)
    }

    /// All credentials, sorted by provider.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Credential)> {
        self.credentials.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.credentials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.credentials.is_empty()
    }

    /// Report status of every stored credential at `now`.
    pub fn statuses(
        &self,
        now: DateTime<Utc>,
    ) -> impl Iterator<Item = (&str, &Credential, CredentialStatus)> {
        self.iter()
            .map(move |(provider, cred)| (provider, cred, cred.status(now)))
    }
}
