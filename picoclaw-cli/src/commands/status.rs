//! Health summary of configuration, providers, credentials and channels.

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::{DateTime, Utc};
use picoclaw_models::auth::{AuthMethod, CredentialStatus, CredentialStore};
use picoclaw_models::providers::{self, ProviderAvailability};
use tracing::warn;

use crate::config::{ChannelsConfig, ConfigLoader, PicoclawConfig};

const LOGO: &str = "🦞";

/// Run status command.
pub fn run() -> Result<()> {
    let config = match ConfigLoader::load() {
        Ok(config) => config,
        Err(e) => {
            println!("Error loading config: {e:#}");
            return Ok(());
        }
    };

    let store = load_store(&picoclaw_paths::auth_store_path());
    let report = StatusReport::collect(
        &config,
        ConfigLoader::active_config_path(),
        &store,
        Utc::now(),
    );
    print!("{report}");
    Ok(())
}

/// Load the credential store, treating any failure as "no credentials".
pub(crate) fn load_store(path: &Path) -> CredentialStore {
    CredentialStore::load(path).unwrap_or_else(|e| {
        warn!("ignoring credential store: {e}");
        CredentialStore::default()
    })
}

/// Version line content.
pub fn format_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// Build line content; empty when nothing was embedded at build time.
pub fn format_build_info() -> String {
    let commit = env!("PICOCLAW_GIT_COMMIT");
    let details: Vec<&str> = [env!("PICOCLAW_BUILD_PROFILE"), env!("PICOCLAW_BUILD_TARGET")]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect();

    match (commit.is_empty(), details.is_empty()) {
        (true, true) => String::new(),
        (true, false) => details.join(", "),
        (false, true) => commit.to_string(),
        (false, false) => format!("{commit} ({})", details.join(", ")),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CredentialLine {
    provider: String,
    method: AuthMethod,
    status: CredentialStatus,
}

/// Everything the status report renders, gathered up front.
#[derive(Debug)]
pub struct StatusReport<'a> {
    config: &'a PicoclawConfig,
    config_path: PathBuf,
    config_present: bool,
    workspace: PathBuf,
    workspace_present: bool,
    availability: ProviderAvailability,
    credentials: Vec<CredentialLine>,
}

impl<'a> StatusReport<'a> {
    /// Gather the report, checking the config file and workspace on disk.
    pub fn collect(
        config: &'a PicoclawConfig,
        config_path: PathBuf,
        store: &CredentialStore,
        now: DateTime<Utc>,
    ) -> Self {
        let config_present = config_path.exists();
        let workspace_present = config.workspace_path().exists();
        Self::new(config, config_path, config_present, workspace_present, store, now)
    }

    /// Gather the report from already known presence flags.
    pub fn new(
        config: &'a PicoclawConfig,
        config_path: PathBuf,
        config_present: bool,
        workspace_present: bool,
        store: &CredentialStore,
        now: DateTime<Utc>,
    ) -> Self {
        let availability = providers::aggregate(&config.model_list, &config.providers);
        let credentials = store
            .statuses(now)
            .map(|(provider, cred, status)| CredentialLine {
                provider: provider.to_string(),
                method: cred.auth_method,
                status,
            })
            .collect();

        Self {
            config,
            config_path,
            config_present,
            workspace: config.workspace_path(),
            workspace_present,
            availability,
            credentials,
        }
    }

    fn fmt_providers(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for status in self.availability.statuses() {
            let label = status.provider.label;
            if !status.provider.is_base_url_addressed() {
                writeln!(f, "{label} API: {}", enabled(status.available))?;
                continue;
            }
            match (status.available, status.base_url) {
                (true, Some(url)) => writeln!(f, "{label}: ✓ {url}")?,
                (true, None) => writeln!(f, "{label}: ✓")?,
                (false, _) => writeln!(f, "{label}: not set")?,
            }
        }
        Ok(())
    }

    fn fmt_credentials(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.credentials.is_empty() {
            return Ok(());
        }
        writeln!(f)?;
        writeln!(f, "OAuth/Token Auth:")?;
        for line in &self.credentials {
            writeln!(f, "  {} ({}): {}", line.provider, line.method, line.status)?;
        }
        Ok(())
    }

    fn fmt_channels(channels: &ChannelsConfig, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        writeln!(f, "Channels:")?;
        for (name, on) in channels.toggles() {
            if on {
                writeln!(f, "  {name}: ✓")?;
            } else {
                writeln!(f, "  {name}: disabled")?;
            }
        }
        if channels.websocket.enabled {
            writeln!(f, "  WebSocket: ✓ {}", channels.websocket.url())?;
        } else {
            writeln!(f, "  WebSocket: disabled")?;
        }
        Ok(())
    }
}

fn enabled(on: bool) -> &'static str {
    if on { "✓" } else { "not set" }
}

fn present(exists: bool) -> &'static str {
    if exists { "✓" } else { "✗" }
}

impl fmt::Display for StatusReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{LOGO} picoclaw Status")?;
        writeln!(f, "Version: {}", format_version())?;
        let build = format_build_info();
        if !build.is_empty() {
            writeln!(f, "Build: {build}")?;
        }
        writeln!(f)?;

        writeln!(
            f,
            "Config: {} {}",
            self.config_path.display(),
            present(self.config_present)
        )?;
        writeln!(
            f,
            "Workspace: {} {}",
            self.workspace.display(),
            present(self.workspace_present)
        )?;

        if !self.config_present {
            return Ok(());
        }

        let model = self
            .config
            .agents
            .defaults
            .model
            .as_deref()
            .unwrap_or("(not set)");
        writeln!(f, "Model: {model}")?;

        self.fmt_providers(f)?;
        self.fmt_credentials(f)?;
        Self::fmt_channels(&self.config.channels, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use picoclaw_models::auth::Credential;
    use picoclaw_models::{ModelEntry, ProviderConfig};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 18, 12, 0, 0).unwrap()
    }

    fn render(config: &PicoclawConfig, store: &CredentialStore, config_present: bool) -> String {
        StatusReport::new(
            config,
            PathBuf::from("/etc/picoclaw/config.toml"),
            config_present,
            false,
            store,
            now(),
        )
        .to_string()
    }

    #[test]
    fn missing_config_stops_after_paths() {
        let out = render(&PicoclawConfig::default(), &CredentialStore::default(), false);

        assert!(out.contains("picoclaw Status"));
        assert!(out.contains("Config: /etc/picoclaw/config.toml ✗"));
        assert!(out.contains("Workspace: "));
        assert!(!out.contains("Model:"));
        assert!(!out.contains("Channels:"));
    }

    #[test]
    fn providers_from_both_sources() {
        let mut config = PicoclawConfig::default();
        config.agents.defaults.model = Some("doubao/ernie-4".to_string());
        config.model_list = vec![
            ModelEntry::new("doubao/ernie-4", "k1"),
            ModelEntry::new("gpt/4o", ""),
        ];
        config
            .providers
            .insert("ollama".to_string(), ProviderConfig::with_base("http://localhost:11434"));

        let out = render(&config, &CredentialStore::default(), true);

        assert!(out.contains("Config: /etc/picoclaw/config.toml ✓"));
        assert!(out.contains("Model: doubao/ernie-4"));
        assert!(out.contains("VolcEngine API: ✓"));
        assert!(out.contains("OpenAI API: not set"));
        assert!(out.contains("Anthropic API: not set"));
        assert!(out.contains("vLLM/Local: not set"));
        assert!(out.contains("Ollama: ✓ http://localhost:11434"));
        assert!(!out.contains("OAuth/Token Auth:"));
    }

    #[test]
    fn base_url_provider_from_model_list_has_no_url() {
        let mut config = PicoclawConfig::default();
        config.model_list = vec![ModelEntry::new("vllm/qwen", "local")];

        let out = render(&config, &CredentialStore::default(), true);
        assert!(out.contains("vLLM/Local: ✓\n"));
    }

    #[test]
    fn credentials_render_with_lifecycle() {
        let store = CredentialStore::from_credentials([
            Credential::oauth("anthropic", "at", now() - Duration::seconds(1)),
            Credential::oauth("openai", "at", now() + Duration::minutes(2)),
            Credential::oauth("gemini", "at", now() + Duration::hours(2)),
            Credential::api_key("groq", "gk"),
        ]);

        let out = render(&PicoclawConfig::default(), &store, true);

        assert!(out.contains("OAuth/Token Auth:"));
        assert!(out.contains("  anthropic (oauth): expired"));
        assert!(out.contains("  openai (oauth): needs refresh"));
        assert!(out.contains("  gemini (oauth): authenticated"));
        assert!(out.contains("  groq (token): authenticated"));
    }

    #[test]
    fn channels_render_enabled_and_disabled() {
        let mut config = PicoclawConfig::default();
        config.channels.telegram.enabled = true;
        config.channels.websocket.enabled = true;
        config.channels.websocket.port = Some(9000);

        let out = render(&config, &CredentialStore::default(), true);

        assert!(out.contains("  Telegram: ✓\n"));
        assert!(out.contains("  Discord: disabled"));
        assert!(out.contains("  WebSocket: ✓ http://127.0.0.1:9000"));
    }

    #[test]
    fn unreadable_store_is_empty() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("auth.json");
        std::fs::write(&path, "not json").unwrap();

        assert!(load_store(&path).is_empty());
    }
}
