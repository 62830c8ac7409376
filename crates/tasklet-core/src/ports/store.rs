//! CampaignStore port - 正本ストアへの書き込み

use async_trait::async_trait;

use crate::domain::{CampaignId, CollaboratorError};

/// Scoped writes against the authoritative store.
///
/// Each call is its own unit of work; no transaction spans several calls.
#[async_trait]
pub trait CampaignStore: Send + Sync {
    /// Set the campaign's `is_started` flag.
    async fn mark_campaign_started(
        &self,
        campaign_id: CampaignId,
    ) -> Result<(), CollaboratorError>;
}
