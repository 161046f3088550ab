use std::collections::BTreeMap;
use std::path::PathBuf;

use picoclaw_models::{ModelEntry, ProviderConfig};
use serde::{Deserialize, Serialize};

/// Default bind host for the WebSocket channel
pub const DEFAULT_WEBSOCKET_HOST: &str = "127.0.0.1";

/// Default port for the WebSocket channel
pub const DEFAULT_WEBSOCKET_PORT: u16 = 18791;

/// Placeholder shown instead of secrets by `config show`
pub const REDACTED: &str = "********";

/// Configuration as stored in TOML files (with optional fields for merging)
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawPicoclawConfig {
    #[serde(default)]
    pub agents: RawAgentsConfig,

    /// Generic model bindings; an overlay list replaces the base list
    pub model_list: Option<Vec<ModelEntry>>,

    /// Legacy explicit provider blocks
    #[serde(default)]
    pub providers: BTreeMap<String, ProviderConfig>,

    #[serde(default)]
    pub channels: ChannelsConfig,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawAgentsConfig {
    #[serde(default)]
    pub defaults: RawAgentDefaults,
}

/// Agent defaults as stored in TOML (optional fields for proper merging)
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawAgentDefaults {
    /// Agent workspace directory (`~` is expanded)
    pub workspace: Option<String>,

    /// Default model identifier
    pub model: Option<String>,
}

/// Final configuration with defaults applied
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PicoclawConfig {
    #[serde(default)]
    pub agents: AgentsConfig,

    #[serde(default)]
    pub model_list: Vec<ModelEntry>,

    #[serde(default)]
    pub providers: BTreeMap<String, ProviderConfig>,

    #[serde(default)]
    pub channels: ChannelsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AgentsConfig {
    #[serde(default)]
    pub defaults: AgentDefaults,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentDefaults {
    /// Agent workspace directory
    pub workspace: String,

    /// Default model identifier
    pub model: Option<String>,
}

impl Default for AgentDefaults {
    fn default() -> Self {
        Self {
            workspace: picoclaw_paths::default_workspace()
                .to_string_lossy()
                .into_owned(),
            model: None,
        }
    }
}

impl PicoclawConfig {
    /// Workspace directory with `~` expanded
    pub fn workspace_path(&self) -> PathBuf {
        picoclaw_paths::expand_home(&self.agents.defaults.workspace)
    }

    /// Copy of the config with every non-empty API key replaced by [`REDACTED`]
    pub fn redacted(&self) -> Self {
        let mut config = self.clone();
        for entry in &mut config.model_list {
            redact(&mut entry.api_key);
        }
        for provider in config.providers.values_mut() {
            redact(&mut provider.api_key);
        }
        config
    }
}

fn redact(secret: &mut String) {
    if !secret.is_empty() {
        *secret = REDACTED.to_string();
    }
}

/// Simple on/off channel section
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct ChannelToggle {
    #[serde(default)]
    pub enabled: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct WebSocketChannelConfig {
    #[serde(default)]
    pub enabled: bool,

    /// Bind host (default: 127.0.0.1)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,

    /// Bind port (default: 18791)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
}

impl WebSocketChannelConfig {
    /// Listen URL, e.g. `http://127.0.0.1:18791`; IPv6 hosts are bracketed
    pub fn url(&self) -> String {
        let host = self.host.as_deref().unwrap_or(DEFAULT_WEBSOCKET_HOST);
        let port = self.port.unwrap_or(DEFAULT_WEBSOCKET_PORT);
        if host.contains(':') {
            format!("http://[{host}]:{port}")
        } else {
            format!("http://{host}:{port}")
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct ChannelsConfig {
    #[serde(default)]
    pub telegram: ChannelToggle,
    #[serde(default)]
    pub discord: ChannelToggle,
    #[serde(default)]
    pub feishu: ChannelToggle,
    #[serde(default)]
    pub dingtalk: ChannelToggle,
    #[serde(default)]
    pub slack: ChannelToggle,
    #[serde(default)]
    pub whatsapp: ChannelToggle,
    #[serde(default)]
    pub qq: ChannelToggle,
    #[serde(default)]
    pub line: ChannelToggle,
    #[serde(default)]
    pub onebot: ChannelToggle,
    #[serde(default)]
    pub maixcam: ChannelToggle,
    #[serde(default)]
    pub websocket: WebSocketChannelConfig,
}

impl ChannelsConfig {
    /// Display name and enablement of every toggle channel, in report order
    pub fn toggles(&self) -> [(&'static str, bool); 10] {
        [
            ("Telegram", self.telegram.enabled),
            ("Discord", self.discord.enabled),
            ("Feishu", self.feishu.enabled),
            ("DingTalk", self.dingtalk.enabled),
            ("Slack", self.slack.enabled),
            ("WhatsApp", self.whatsapp.enabled),
            ("QQ", self.qq.enabled),
            ("LINE", self.line.enabled),
            ("OneBot", self.onebot.enabled),
            ("MaixCam", self.maixcam.enabled),
        ]
    }

    /// Overlay toggles are OR-ed with the base; WebSocket host/port override only if set
    pub fn merge(base: Self, overlay: Self) -> Self {
        let or = |b: ChannelToggle, o: ChannelToggle| ChannelToggle {
            enabled: b.enabled || o.enabled,
        };
        Self {
            telegram: or(base.telegram, overlay.telegram),
            discord: or(base.discord, overlay.discord),
            feishu: or(base.feishu, overlay.feishu),
            dingtalk: or(base.dingtalk, overlay.dingtalk),
            slack: or(base.slack, overlay.slack),
            whatsapp: or(base.whatsapp, overlay.whatsapp),
            qq: or(base.qq, overlay.qq),
            line: or(base.line, overlay.line),
            onebot: or(base.onebot, overlay.onebot),
            maixcam: or(base.maixcam, overlay.maixcam),
            websocket: WebSocketChannelConfig {
                enabled: base.websocket.enabled || overlay.websocket.enabled,
                host: overlay.websocket.host.or(base.websocket.host),
                port: overlay.websocket.port.or(base.websocket.port),
            },
        }
    }
}
