//! Stored provider credentials and their lifecycle.
//!
//! Credentials are written by the login flows into a JSON store and only read
//! here. OAuth credentials carry an expiry; their freshness is evaluated
//! against an explicit `now`:
//!
//! ```text
//!   Fresh ──(now >= expiry - window)──▶ NeedsRefresh ──(now >= expiry)──▶ Expired
//! ```
//!
//! Static API-key credentials have no lifecycle and are always reported as
//! authenticated.
//!
//! # Example
//!
//! ```
//! use chrono::{Duration, TimeZone, Utc};
//! use picoclaw_models::auth::{Credential, LifecycleState, evaluate};
//!
//! let expiry = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
//! let cred = Credential::oauth("anthropic", "token", expiry)
//!     .with_refresh_window(Duration::seconds(600));
//!
//! assert_eq!(evaluate(&cred, expiry - Duration::seconds(700)), LifecycleState::Fresh);
//! assert_eq!(evaluate(&cred, expiry - Duration::seconds(300)), LifecycleState::NeedsRefresh);
//! assert_eq!(evaluate(&cred, expiry + Duration::seconds(1)), LifecycleState::Expired);
//! ```

mod store;

use std::fmt;

use chrono::{DateTime, Datelike, Duration, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer};

pub use store::CredentialStore;

/// Lookahead before expiry, in seconds, in which an OAuth credential should
/// be refreshed.
pub const DEFAULT_REFRESH_WINDOW_SECS: i64 = 300;

/// Secret token material that prevents accidental logging.
///
/// The value is wrapped in `SecretString`, so `Debug` is redacted and the
/// memory is zeroized on drop.
#[derive(Clone)]
pub struct SecretToken(SecretString);

impl SecretToken {
    /// Wrap a token value.
    pub fn new(token: impl Into<String>) -> Self {
        Self(SecretString::from(token.into()))
    }

    /// Expose the token value.
    ///
    /// Use sparingly - only when actually sending to an API.
    pub fn expose_secret(&self) -> &str {
        self.0.expose_secret()
    }
}

impl fmt::Debug for SecretToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretToken([REDACTED])")
    }
}

impl<'de> Deserialize<'de> for SecretToken {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Self::new)
    }
}

/// How a stored credential authenticates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum AuthMethod {
    /// Static API key or pasted token; never expires.
    #[serde(rename = "token", alias = "api_key")]
    ApiKey,
    /// OAuth access token with an expiry.
    #[serde(rename = "oauth", alias = "oauth_token")]
    OAuth,
    /// Method written by a newer login flow; evaluated by its expiry.
    #[serde(other)]
    Other,
}

impl AuthMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            AuthMethod::ApiKey => "token",
            AuthMethod::OAuth => "oauth",
            AuthMethod::Other => "unknown",
        }
    }
}

impl fmt::Display for AuthMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Freshness of an OAuth credential at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LifecycleState {
    Fresh,
    NeedsRefresh,
    Expired,
}

/// What the status report shows for a stored credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialStatus {
    Authenticated,
    NeedsRefresh,
    Expired,
}

impl CredentialStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            CredentialStatus::Authenticated => "authenticated",
            CredentialStatus::NeedsRefresh => "needs refresh",
            CredentialStatus::Expired => "expired",
        }
    }
}

impl fmt::Display for CredentialStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<LifecycleState> for CredentialStatus {
    fn from(state: LifecycleState) -> Self {
        match state {
            LifecycleState::Fresh => CredentialStatus::Authenticated,
            LifecycleState::NeedsRefresh => CredentialStatus::NeedsRefresh,
            LifecycleState::Expired => CredentialStatus::Expired,
        }
    }
}

/// A stored provider credential.
#[derive(Debug, Clone, Deserialize)]
pub struct Credential {
    /// Provider name; filled from the store key when absent.
    #[serde(default)]
    pub provider: String,
    pub auth_method: AuthMethod,
    pub access_token: SecretToken,
    #[serde(default)]
    pub refresh_token: Option<SecretToken>,
    #[serde(default)]
    pub account_id: Option<String>,
    #[serde(default)]
    expires_at: Option<DateTime<Utc>>,
    #[serde(default)]
    refresh_window_secs: Option<i64>,
}

impl Credential {
    /// Create a static API-key credential.
    pub fn api_key(provider: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            auth_method: AuthMethod::ApiKey,
            access_token: SecretToken::new(token),
            refresh_token: None,
            account_id: None,
            expires_at: None,
            refresh_window_secs: None,
        }
    }

    /// Create an OAuth credential expiring at `expires_at`.
    pub fn oauth(
        provider: impl Into<String>,
        token: impl Into<String>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            auth_method: AuthMethod::OAuth,
            expires_at: Some(expires_at),
            ..Self::api_key(provider, token)
        }
    }

    /// Set the refresh lookahead window.
    pub fn with_refresh_window(mut self, window: Duration) -> Self {
        self.refresh_window_secs = Some(window.num_seconds());
        self
    }

    /// Expiry instant, if one is recorded.
    ///
    /// The zero time `0001-01-01T00:00:00Z` means "no expiry". Any other
    /// instant, including ones before the Unix epoch, is a real expiry.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at.filter(|t| t.year() > 1)
    }

    /// Lookahead before expiry in which a refresh is due.
    pub fn refresh_window(&self) -> Duration {
        self.refresh_window_secs
            .filter(|secs| *secs >= 0)
            .and_then(Duration::try_seconds)
            .unwrap_or_else(|| Duration::seconds(DEFAULT_REFRESH_WINDOW_SECS))
    }

    /// Instant from which the credential needs refreshing.
    pub fn refresh_threshold(&self) -> Option<DateTime<Utc>> {
        self.expires_at()
            .and_then(|expiry| expiry.checked_sub_signed(self.refresh_window()))
    }

    /// Lifecycle state at `now`; `None` for credentials without a lifecycle.
    pub fn lifecycle(&self, now: DateTime<Utc>) -> Option<LifecycleState> {
        match self.auth_method {
            AuthMethod::ApiKey => None,
            AuthMethod::OAuth | AuthMethod::Other => Some(evaluate(self, now)),
        }
    }

    /// Status shown in the report at `now`.
    pub fn status(&self, now: DateTime<Utc>) -> CredentialStatus {
        self.lifecycle(now)
            .map(CredentialStatus::from)
            .unwrap_or(CredentialStatus::Authenticated)
    }
}

/// Evaluate the lifecycle state of a credential at `now`.
///
/// Expiry is checked before the refresh window, so a credential past its
/// expiry is never reported as merely needing refresh. A credential without a
/// recorded expiry is fresh.
pub fn evaluate(cred: &Credential, now: DateTime<Utc>) -> LifecycleState {
    let Some(expiry) = cred.expires_at() else {
        return LifecycleState::Fresh;
    };

    if now >= expiry {
        LifecycleState::Expired
    } else if cred.refresh_threshold().is_some_and(|threshold| now >= threshold) {
        LifecycleState::NeedsRefresh
    } else {
        LifecycleState::Fresh
    }
}
