//! DispatcherConfig - handler set の設定
//!
//! TOML（文字列 or ファイル）から読み込みます。未知のキーはエラーにします。
//!
//! ```toml
//! warm_cache_on_campaign_start = true
//! campaign_start_event = "onCampaignStart"
//! message_send_event = "onMessageSend"
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DispatcherConfig {
    /// Run the cache warm-up at the end of the campaign-start cascade.
    ///
    /// Off by default: the contact cache load is not yet cheap enough to run
    /// on every campaign start.
    pub warm_cache_on_campaign_start: bool,

    /// Service-manager event that may start a campaign.
    pub campaign_start_event: String,

    /// Service-manager event consulted before each outbound send.
    pub message_send_event: String,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            warm_cache_on_campaign_start: false,
            campaign_start_event: "onCampaignStart".to_string(),
            message_send_event: "onMessageSend".to_string(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

impl DispatcherConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }
}
