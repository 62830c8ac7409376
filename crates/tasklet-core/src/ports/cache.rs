//! CacheLayer port - ドメインエンティティのキャッシュ/ロード層
//!
//! assignment cache / contact cache / opt-out cache はそれぞれ独立した
//! パーティションなので、同時に呼ばれても互いにロックを必要としません。

use async_trait::async_trait;

use crate::domain::{
    Attributes, Campaign, CampaignId, CollaboratorError, Organization, OrganizationId,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadOptions {
    /// Bypass the cached copy and reload from the store.
    pub force_load: bool,
}

impl LoadOptions {
    pub fn forced() -> Self {
        Self { force_load: true }
    }
}

#[async_trait]
pub trait CacheLayer: Send + Sync {
    async fn load_organization(
        &self,
        id: OrganizationId,
    ) -> Result<Organization, CollaboratorError>;

    async fn load_campaign(
        &self,
        id: CampaignId,
        options: LoadOptions,
    ) -> Result<Campaign, CollaboratorError>;

    async fn update_campaign_assignment_cache(
        &self,
        campaign_id: CampaignId,
    ) -> Result<(), CollaboratorError>;

    async fn load_contacts_many(
        &self,
        campaign: &Campaign,
        organization: &Organization,
        context_vars: &Attributes,
    ) -> Result<(), CollaboratorError>;

    async fn load_opt_outs_many(
        &self,
        organization_id: OrganizationId,
    ) -> Result<(), CollaboratorError>;
}
