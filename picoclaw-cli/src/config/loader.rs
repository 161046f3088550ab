use super::types::{
    AgentDefaults, AgentsConfig, ChannelsConfig, PicoclawConfig, RawAgentDefaults,
    RawAgentsConfig, RawPicoclawConfig,
};
use anyhow::{Context, Result};
use picoclaw_models::ProviderConfig;
use picoclaw_models::providers::KNOWN_PROVIDERS;
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::debug;

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load merged configuration (user + project + environment)
    pub fn load() -> Result<PicoclawConfig> {
        let user_path = Self::user_config_path();
        let project_path = Self::project_config_path();
        Self::load_layers(&[user_path, project_path], |key| std::env::var(key).ok())
    }

    /// Load and merge the given config files in order, then apply environment overrides
    ///
    /// Files that do not exist are skipped.
    pub fn load_layers<F>(paths: &[PathBuf], env: F) -> Result<PicoclawConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut raw = RawPicoclawConfig::default();

        for path in paths {
            if !path.exists() {
                continue;
            }
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            let layer: RawPicoclawConfig = toml::from_str(&contents)
                .with_context(|| format!("parsing {}", path.display()))?;
            debug!(path = %path.display(), "loaded config layer");
            raw = Self::merge_raw(raw, layer);
        }

        let mut config = Self::finalize(raw);
        Self::apply_env_overrides(&mut config, env);
        Ok(config)
    }

    /// Get user config path
    pub fn user_config_path() -> PathBuf {
        picoclaw_paths::config_dir().join("config.toml")
    }

    /// Get project config path
    /// Can be overridden with PICOCLAW_PROJECT_CONFIG_DIR env var (useful for isolated e2e tests)
    pub fn project_config_path() -> PathBuf {
        if let Ok(dir) = std::env::var("PICOCLAW_PROJECT_CONFIG_DIR") {
            PathBuf::from(dir).join("config.toml")
        } else {
            PathBuf::from(".picoclaw/config.toml")
        }
    }

    /// The config file the status report points at: project config if present, else user config
    pub fn active_config_path() -> PathBuf {
        Self::pick_active(Self::user_config_path(), Self::project_config_path())
    }

    fn pick_active(user: PathBuf, project: PathBuf) -> PathBuf {
        if project.exists() { project } else { user }
    }

    /// Environment variable overriding a legacy provider field,
    /// e.g. `PICOCLAW_PROVIDERS_OPENAI_API_KEY`
    pub fn provider_env_var(provider: &str, field: &str) -> String {
        format!(
            "PICOCLAW_PROVIDERS_{}_{}",
            provider.to_uppercase(),
            field.to_uppercase()
        )
    }

    /// Apply `PICOCLAW_PROVIDERS_<NAME>_API_KEY` / `_API_BASE` overrides for known providers
    fn apply_env_overrides<F>(config: &mut PicoclawConfig, env: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        for provider in KNOWN_PROVIDERS {
            let key = env(&Self::provider_env_var(provider.name, "api_key"))
                .filter(|v| !v.is_empty());
            let base = env(&Self::provider_env_var(provider.name, "api_base"))
                .filter(|v| !v.is_empty());
            if key.is_none() && base.is_none() {
                continue;
            }

            debug!(provider = provider.name, "applying provider env override");
            let entry = config
                .providers
                .entry(provider.name.to_string())
                .or_default();
            if let Some(key) = key {
                entry.api_key = key;
            }
            if let Some(base) = base {
                entry.api_base = base;
            }
        }
    }

    /// Merge two raw configs (overlay values override base only if explicitly set)
    fn merge_raw(base: RawPicoclawConfig, overlay: RawPicoclawConfig) -> RawPicoclawConfig {
        RawPicoclawConfig {
            agents: RawAgentsConfig {
                defaults: RawAgentDefaults {
                    workspace: overlay
                        .agents
                        .defaults
                        .workspace
                        .or(base.agents.defaults.workspace),
                    model: overlay.agents.defaults.model.or(base.agents.defaults.model),
                },
            },
            model_list: overlay.model_list.or(base.model_list),
            providers: Self::merge_providers(base.providers, overlay.providers),
            channels: ChannelsConfig::merge(base.channels, overlay.channels),
        }
    }

    /// Field-wise provider merge: a non-empty overlay field wins
    fn merge_providers(
        mut base: BTreeMap<String, ProviderConfig>,
        overlay: BTreeMap<String, ProviderConfig>,
    ) -> BTreeMap<String, ProviderConfig> {
        for (name, config) in overlay {
            let entry = base.entry(name).or_default();
            if !config.api_key.is_empty() {
                entry.api_key = config.api_key;
            }
            if !config.api_base.is_empty() {
                entry.api_base = config.api_base;
            }
        }
        base
    }

    /// Convert raw config to final config with defaults applied
    fn finalize(raw: RawPicoclawConfig) -> PicoclawConfig {
        let defaults = AgentDefaults::default();
        PicoclawConfig {
            agents: AgentsConfig {
                defaults: AgentDefaults {
                    workspace: raw.agents.defaults.workspace.unwrap_or(defaults.workspace),
                    model: raw.agents.defaults.model,
                },
            },
            model_list: raw.model_list.unwrap_or_default(),
            providers: raw.providers,
            channels: raw.channels,
        }
    }

    /// Load a single config file without merging or env overrides
    #[cfg(test)]
    pub fn load_from_path(path: &std::path::Path) -> Result<PicoclawConfig> {
        Self::load_layers(&[path.to_path_buf()], |_| None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_missing_files_give_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config = ConfigLoader::load_layers(
            &[
                temp_dir.path().join("user.toml"),
                temp_dir.path().join("project.toml"),
            ],
            |_| None,
        )
        .unwrap();

        assert!(config.model_list.is_empty());
        assert!(config.providers.is_empty());
        assert!(config.agents.defaults.model.is_none());
    }

    #[test]
    fn test_project_overrides_user() {
        let temp_dir = TempDir::new().unwrap();
        let user = write(
            &temp_dir,
            "user.toml",
            r#"
[agents.defaults]
model = "gpt/4o"
workspace = "/srv/user-ws"

[[model_list]]
model = "gpt/4o"
api_key = "user-key"

[providers.openai]
api_key = "sk-user"
api_base = "https://api.openai.com/v1"

[channels.telegram]
enabled = true
"#,
        );
        let project = write(
            &temp_dir,
            "project.toml",
            r#"
[agents.defaults]
model = "claude/sonnet-4"

[[model_list]]
model = "claude/sonnet-4"
api_key = "project-key"

[providers.openai]
api_key = "sk-project"

[channels.discord]
enabled = true
"#,
        );

        let config = ConfigLoader::load_layers(&[user, project], |_| None).unwrap();

        assert_eq!(
            config.agents.defaults.model.as_deref(),
            Some("claude/sonnet-4")
        );
        assert_eq!(config.agents.defaults.workspace, "/srv/user-ws");
        assert_eq!(config.model_list.len(), 1);
        assert_eq!(config.model_list[0].model, "claude/sonnet-4");
        assert_eq!(config.providers["openai"].api_key, "sk-project");
        assert_eq!(
            config.providers["openai"].api_base,
            "https://api.openai.com/v1"
        );
        assert!(config.channels.telegram.enabled);
        assert!(config.channels.discord.enabled);
    }

    #[test]
    fn test_env_overrides_known_providers() {
        let temp_dir = TempDir::new().unwrap();
        let user = write(
            &temp_dir,
            "user.toml",
            "[providers.anthropic]\napi_key = \"from-file\"\n",
        );

        let env = |key: &str| match key {
            "PICOCLAW_PROVIDERS_ANTHROPIC_API_KEY" => Some("from-env".to_string()),
            "PICOCLAW_PROVIDERS_OLLAMA_API_BASE" => Some("http://gpu:11434".to_string()),
            "PICOCLAW_PROVIDERS_GROQ_API_KEY" => Some(String::new()),
            _ => None,
        };
        let config = ConfigLoader::load_layers(&[user], env).unwrap();

        assert_eq!(config.providers["anthropic"].api_key, "from-env");
        assert_eq!(config.providers["ollama"].api_base, "http://gpu:11434");
        assert!(!config.providers.contains_key("groq"));
    }

    #[test]
    fn test_invalid_toml_names_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = write(&temp_dir, "broken.toml", "[agents\nmodel = ");

        let err = ConfigLoader::load_from_path(&path).unwrap_err();
        assert!(format!("{err:#}").contains("broken.toml"));
    }

    #[test]
    fn test_provider_env_var_name() {
        assert_eq!(
            ConfigLoader::provider_env_var("vllm", "api_base"),
            "PICOCLAW_PROVIDERS_VLLM_API_BASE"
        );
    }

    #[test]
    fn test_pick_active_prefers_existing_project() {
        let temp_dir = TempDir::new().unwrap();
        let user = temp_dir.path().join("user.toml");
        let project = temp_dir.path().join("project.toml");

        assert_eq!(ConfigLoader::pick_active(user.clone(), project.clone()), user);

        std::fs::write(&project, "").unwrap();
        assert_eq!(ConfigLoader::pick_active(user, project.clone()), project);
    }

    #[test]
    fn test_load_from_path_reads_workspace() {
        let temp_dir = TempDir::new().unwrap();
        let path = write(
            &temp_dir,
            "config.toml",
            "[agents.defaults]\nworkspace = \"~/pico-ws\"\n",
        );

        let config = ConfigLoader::load_from_path(&path).unwrap();
        assert_eq!(
            config.workspace_path(),
            picoclaw_paths::expand_home("~").join("pico-ws")
        );
    }
}
