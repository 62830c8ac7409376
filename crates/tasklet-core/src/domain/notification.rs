use serde::{Deserialize, Serialize};

use super::ids::CampaignId;

/// User-facing notifications emitted by task handlers.
///
/// Shape on the wire: `{"type": "campaign_started", "campaign_id": 3}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Notification {
    CampaignStarted { campaign_id: CampaignId },
}
