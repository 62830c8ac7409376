//! ServiceManagerPipeline port - ライフサイクルイベントの拡張チェーン
//!
//! pipeline の結果は名前付きのシグナルを持つ構造体として受け取り、
//! 後続の制御（campaign start の cascade など）はそのシグナルだけで判断します。

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::{CollaboratorError, Organization};

/// Combined result of every service manager that reacted to an event.
///
/// An event nobody reacted to yields `PipelineResult::default()`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineResult {
    /// Set by a manager that must veto marking a campaign as started.
    #[serde(default, rename = "blockCampaignStart")]
    pub block_campaign_start: bool,

    /// Manager-specific data, forwarded as-is (e.g. to outbound services).
    #[serde(flatten)]
    pub data: Map<String, Value>,
}

impl PipelineResult {
    pub fn blocking_campaign_start() -> Self {
        Self {
            block_campaign_start: true,
            data: Map::new(),
        }
    }
}

#[async_trait]
pub trait ServiceManagerPipeline: Send + Sync {
    async fn process(
        &self,
        event: &str,
        organization: Option<&Organization>,
        data: &Value,
    ) -> Result<PipelineResult, CollaboratorError>;
}
