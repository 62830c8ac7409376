//! ServiceManagerTrigger - ライフサイクルイベントを service manager pipeline に流す
//!
//! `onCampaignStart` だけは pipeline の後に cascade（started フラグ更新 →
//! キャッシュ強制リロード → 通知）を実行します。cascade 内の失敗はその場で
//! 捕まえずに伝播させるので、「started にはなったが通知は飛んでいない」状態が
//! 残りうる点に注意。

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use super::cache_warmer::CacheWarmer;
use crate::domain::{
    Attributes, CampaignId, DispatchError, Notification, Organization, Outcome,
};
use crate::ports::{
    CacheLayer, CampaignStore, LoadOptions, Notifier, PipelineResult, ServiceManagerPipeline,
};
use crate::typed::{Handler, ServiceManagerTriggerTask};

pub struct ServiceManagerTrigger {
    store: Arc<dyn CampaignStore>,
    cache: Arc<dyn CacheLayer>,
    notifier: Arc<dyn Notifier>,
    service_managers: Arc<dyn ServiceManagerPipeline>,
    campaign_start_event: String,
    warm_up: Option<CacheWarmer>,
}

impl ServiceManagerTrigger {
    pub fn new(
        store: Arc<dyn CampaignStore>,
        cache: Arc<dyn CacheLayer>,
        notifier: Arc<dyn Notifier>,
        service_managers: Arc<dyn ServiceManagerPipeline>,
        campaign_start_event: impl Into<String>,
    ) -> Self {
        Self {
            store,
            cache,
            notifier,
            service_managers,
            campaign_start_event: campaign_start_event.into(),
            warm_up: None,
        }
    }

    /// Finish the campaign-start cascade with a cache warm-up.
    pub fn with_warm_up(mut self, warmer: CacheWarmer) -> Self {
        self.warm_up = Some(warmer);
        self
    }

    /// The campaign to start, if the cascade must run for this event.
    ///
    /// A campaign reference without a usable id fails the call instead of
    /// skipping the cascade.
    fn campaign_to_start(
        &self,
        task: &ServiceManagerTriggerTask,
        result: &PipelineResult,
    ) -> Result<Option<CampaignId>, DispatchError> {
        if task.function_name != self.campaign_start_event || result.block_campaign_start {
            return Ok(None);
        }
        task.campaign_ref()
    }

    #[instrument(skip(self, organization))]
    async fn start_campaign(
        &self,
        campaign_id: CampaignId,
        organization: Option<Organization>,
    ) -> Result<Outcome, DispatchError> {
        self.store.mark_campaign_started(campaign_id).await?;
        let campaign = self
            .cache
            .load_campaign(campaign_id, LoadOptions::forced())
            .await?;
        self.notifier
            .send(Notification::CampaignStarted { campaign_id })
            .await?;
        info!("campaign started");

        let Some(warmer) = &self.warm_up else {
            return Ok(Outcome::success());
        };

        let organization = match (organization, campaign.organization_id) {
            (Some(organization), _) => organization,
            (None, Some(id)) => self.cache.load_organization(id).await?,
            (None, None) => {
                warn!("no organization for campaign; skipping cache warm-up");
                return Ok(Outcome::success());
            }
        };
        warmer.warm(campaign, organization, Attributes::new()).await
    }
}

#[async_trait]
impl Handler<ServiceManagerTriggerTask> for ServiceManagerTrigger {
    #[instrument(skip_all, fields(function_name = %task.function_name))]
    async fn handle(&self, task: ServiceManagerTriggerTask) -> Result<Outcome, DispatchError> {
        let organization = match task.organization_id {
            Some(id) => Some(self.cache.load_organization(id).await?),
            None => None,
        };

        let result = self
            .service_managers
            .process(&task.function_name, organization.as_ref(), &task.data)
            .await?;

        match self.campaign_to_start(&task, &result)? {
            Some(campaign_id) => self.start_campaign(campaign_id, organization).await,
            None => {
                debug!(
                    blocked = result.block_campaign_start,
                    "campaign start cascade not entered"
                );
                Ok(Outcome::skipped(format!(
                    "no cascade for {}",
                    task.function_name
                )))
            }
        }
    }
}
