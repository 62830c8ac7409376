//! Task trait - 型付き Task の定義と、各 task 識別子に束縛された payload 型
//!
//! payload の形は識別子だけで決まります。dispatcher は payload の中身を見て
//! ルーティングを変えることはありません。

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::{
    Attributes, Campaign, CampaignId, Contact, DispatchError, Message, Organization,
    OrganizationId, ScopeHandle, Tag, TaskName, Texter,
};
use crate::ports::ActionContext;

/// Task は task 識別子と payload 型を対応付ける
///
/// # Trait Bounds
/// - `Serialize`: typed API から JSON payload を組み立てるため
/// - `DeserializeOwned`: dispatch 時に JSON payload から復元するため
/// - `Send + Sync + 'static`: spawn された future に渡せるため
pub trait Task: Serialize + DeserializeOwned + Send + Sync + 'static {
    const NAME: TaskName;
}

/// Payload of `send_message`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageTask {
    pub message: Message,
    pub contact: Contact,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trx: Option<ScopeHandle>,
    pub organization: Organization,
    pub campaign: Campaign,
}

impl Task for SendMessageTask {
    const NAME: TaskName = TaskName::SendMessage;
}

/// Payload of `action_handler:question_response`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionResponseTask {
    /// Action handler name.
    pub name: String,
    #[serde(default)]
    pub was_deleted: bool,
    #[serde(flatten)]
    pub context: ActionContext,
}

impl Task for QuestionResponseTask {
    const NAME: TaskName = TaskName::ActionHandlerQuestionResponse;
}

/// Payload of `action_handler:tag_update`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagUpdateTask {
    pub name: String,
    pub tags: Vec<Tag>,
    pub contact: Contact,
    pub campaign: Campaign,
    pub organization: Organization,
    pub texter: Texter,
}

impl Task for TagUpdateTask {
    const NAME: TaskName = TaskName::ActionHandlerTagUpdate;
}

/// Payload of `campaign_start_cache`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignStartCacheTask {
    pub campaign: Campaign,
    pub organization: Organization,
    /// Passed through to the contact loader.
    #[serde(default, skip_serializing_if = "Attributes::is_empty")]
    pub context_vars: Attributes,
}

impl Task for CampaignStartCacheTask {
    const NAME: TaskName = TaskName::CampaignStartCache;
}

/// Payload of `service_manager_trigger`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceManagerTriggerTask {
    pub function_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization_id: Option<OrganizationId>,
    /// Interpreted by the service managers only, except `campaign.id`.
    #[serde(default)]
    pub data: Value,
}

impl Task for ServiceManagerTriggerTask {
    const NAME: TaskName = TaskName::ServiceManagerTrigger;
}

impl ServiceManagerTriggerTask {
    /// The `campaign.id` carried in `data`, if any.
    ///
    /// An absent, `null` or `false` campaign is no reference. Any other
    /// campaign must carry an integer id, or an integer written as a string.
    pub fn campaign_ref(&self) -> Result<Option<CampaignId>, DispatchError> {
        let campaign = match self.data.get("campaign") {
            None | Some(Value::Null) | Some(Value::Bool(false)) => return Ok(None),
            Some(campaign) => campaign,
        };
        let id = campaign.get("id").and_then(|id| {
            id.as_i64()
                .or_else(|| id.as_str()?.trim().parse().ok())
        });
        match id {
            Some(id) => Ok(Some(CampaignId::new(id))),
            None => Err(DispatchError::InvalidCampaignRef {
                event: self.function_name.clone(),
                campaign: campaign.clone(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[test]
    fn question_response_payload_uses_camel_case_and_flattens_context() {
        let task: QuestionResponseTask = serde_json::from_value(json!({
            "name": "ngpvan-action",
            "wasDeleted": true,
            "questionResponse": { "value": "Yes" },
            "interactionStep": { "id": 11 },
            "contact": { "id": 5 },
            "campaign": { "id": 3 },
            "organization": { "id": 1 },
            "previousValue": "No"
        }))
        .unwrap();

        assert!(task.was_deleted);
        assert_eq!(task.context.campaign_contact_id().get(), 5);
        assert_eq!(task.context.previous_value, Some(json!("No")));
    }

    #[test]
    fn context_vars_default_to_empty() {
        let task: CampaignStartCacheTask = serde_json::from_value(json!({
            "campaign": { "id": 3 },
            "organization": { "id": 1 }
        }))
        .unwrap();
        assert!(task.context_vars.is_empty());
    }

    fn trigger_task(data: Value) -> ServiceManagerTriggerTask {
        ServiceManagerTriggerTask {
            function_name: "onCampaignStart".to_string(),
            organization_id: None,
            data,
        }
    }

    #[rstest]
    #[case::with_campaign(json!({ "campaign": { "id": 3 } }), Some(3))]
    #[case::string_id(json!({ "campaign": { "id": "3" } }), Some(3))]
    #[case::no_campaign(json!({ "other": true }), None)]
    #[case::null_campaign(json!({ "campaign": null }), None)]
    #[case::false_campaign(json!({ "campaign": false }), None)]
    #[case::null_data(Value::Null, None)]
    fn campaign_ref_reads_data_campaign_id(#[case] data: Value, #[case] expected: Option<i64>) {
        let campaign = trigger_task(data).campaign_ref().unwrap();
        assert_eq!(campaign.map(|id| id.get()), expected);
    }

    #[rstest]
    #[case::campaign_without_id(json!({ "campaign": { "title": "x" } }))]
    #[case::non_numeric_id(json!({ "campaign": { "id": "abc" } }))]
    #[case::fractional_id(json!({ "campaign": { "id": 3.5 } }))]
    fn unusable_campaign_ref_is_an_error(#[case] data: Value) {
        let err = trigger_task(data).campaign_ref().unwrap_err();
        assert!(matches!(
            err,
            DispatchError::InvalidCampaignRef { ref event, .. } if event == "onCampaignStart"
        ));
    }
}
