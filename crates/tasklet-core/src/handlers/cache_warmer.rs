//! CacheWarmer - campaign 関連キャッシュの並行リフレッシュ
//!
//! 3 つのブランチ（assignment cache / contacts / opt-outs）は互いに依存しないので
//! それぞれ spawn して同時に走らせ、`tokio::join!` で全部の終了を待ちます。
//!
//! 失敗ポリシーはブランチごとに join 前に付けます:
//! - contacts: ログに出して握りつぶす（warm-up 全体は失敗させない）
//! - assignment cache / opt-outs: そのまま呼び出し元へ伝播

use async_trait::async_trait;
use std::sync::Arc;
use tokio::task::JoinError;
use tracing::{Instrument, debug, error, instrument};

use crate::domain::{
    Attributes, Campaign, CollaboratorError, DispatchError, Organization, Outcome,
    SuppressedWarmupError,
};
use crate::ports::CacheLayer;
use crate::typed::{CampaignStartCacheTask, Handler};

#[derive(Clone)]
pub struct CacheWarmer {
    cache: Arc<dyn CacheLayer>,
}

impl CacheWarmer {
    pub fn new(cache: Arc<dyn CacheLayer>) -> Self {
        Self { cache }
    }

    /// Refresh the assignment cache, the contact cache and the opt-out set.
    ///
    /// Returns only after all three branches have settled. A contact-load
    /// failure yields a `DEGRADED` outcome instead of an error.
    #[instrument(skip_all, fields(campaign_id = %campaign.id, organization_id = %organization.id))]
    pub async fn warm(
        &self,
        campaign: Campaign,
        organization: Organization,
        context_vars: Attributes,
    ) -> Result<Outcome, DispatchError> {
        let campaign_id = campaign.id;
        let organization_id = organization.id;

        let assignments = tokio::spawn({
            let cache = Arc::clone(&self.cache);
            async move { cache.update_campaign_assignment_cache(campaign_id).await }
                .in_current_span()
        });

        let contacts = tokio::spawn({
            let cache = Arc::clone(&self.cache);
            async move {
                match cache
                    .load_contacts_many(&campaign, &organization, &context_vars)
                    .await
                {
                    Ok(()) => {
                        debug!("finished contact load");
                        None
                    }
                    Err(source) => Some(SuppressedWarmupError {
                        campaign_id,
                        source,
                    }),
                }
            }
            .in_current_span()
        });

        let opt_outs = tokio::spawn({
            let cache = Arc::clone(&self.cache);
            async move { cache.load_opt_outs_many(organization_id).await }.in_current_span()
        });

        let (assignments, contacts, opt_outs) = tokio::join!(assignments, contacts, opt_outs);

        let suppressed = contacts.unwrap_or_else(|e| {
            Some(SuppressedWarmupError {
                campaign_id,
                source: CollaboratorError::failed(format!("contact load aborted: {e}")),
            })
        });
        if let Some(err) = &suppressed {
            error!(error = %err, "contact load failed during cache warm-up");
        }

        settle("assignment cache refresh", assignments)?;
        settle("opt-out reload", opt_outs)?;

        Ok(match suppressed {
            Some(err) => Outcome::degraded(err.to_string()),
            None => Outcome::success(),
        })
    }
}

fn settle(
    branch: &'static str,
    joined: Result<Result<(), CollaboratorError>, JoinError>,
) -> Result<(), DispatchError> {
    match joined {
        Ok(result) => result.map_err(DispatchError::from),
        Err(e) => Err(DispatchError::BranchAborted {
            branch,
            reason: e.to_string(),
        }),
    }
}

#[async_trait]
impl Handler<CampaignStartCacheTask> for CacheWarmer {
    async fn handle(&self, task: CampaignStartCacheTask) -> Result<Outcome, DispatchError> {
        self.warm(task.campaign, task.organization, task.context_vars)
            .await
    }
}
