//! TaskName - 受け付ける task 識別子の閉じた列挙
//!
//! 文字列表現は producer とのワイヤ契約なので変更しないこと。

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::errors::DispatchError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TaskName {
    #[serde(rename = "send_message")]
    SendMessage,
    #[serde(rename = "action_handler:question_response")]
    ActionHandlerQuestionResponse,
    #[serde(rename = "action_handler:tag_update")]
    ActionHandlerTagUpdate,
    #[serde(rename = "campaign_start_cache")]
    CampaignStartCache,
    #[serde(rename = "service_manager_trigger")]
    ServiceManagerTrigger,
}

impl TaskName {
    pub const ALL: [TaskName; 5] = [
        TaskName::SendMessage,
        TaskName::ActionHandlerQuestionResponse,
        TaskName::ActionHandlerTagUpdate,
        TaskName::CampaignStartCache,
        TaskName::ServiceManagerTrigger,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskName::SendMessage => "send_message",
            TaskName::ActionHandlerQuestionResponse => "action_handler:question_response",
            TaskName::ActionHandlerTagUpdate => "action_handler:tag_update",
            TaskName::CampaignStartCache => "campaign_start_cache",
            TaskName::ServiceManagerTrigger => "service_manager_trigger",
        }
    }
}

impl fmt::Display for TaskName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskName {
    type Err = DispatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TaskName::ALL
            .into_iter()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| DispatchError::UnknownTask(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::send_message("send_message", TaskName::SendMessage)]
    #[case::question_response(
        "action_handler:question_response",
        TaskName::ActionHandlerQuestionResponse
    )]
    #[case::tag_update("action_handler:tag_update", TaskName::ActionHandlerTagUpdate)]
    #[case::start_cache("campaign_start_cache", TaskName::CampaignStartCache)]
    #[case::trigger("service_manager_trigger", TaskName::ServiceManagerTrigger)]
    fn parses_wire_identifiers(#[case] wire: &str, #[case] expected: TaskName) {
        let parsed: TaskName = wire.parse().unwrap();
        assert_eq!(parsed, expected);
        assert_eq!(parsed.to_string(), wire);

        let json = serde_json::to_string(&parsed).unwrap();
        assert_eq!(json, format!("\"{wire}\""));
    }

    #[rstest]
    #[case::empty("")]
    #[case::wrong_case("SEND_MESSAGE")]
    #[case::job_name("export_campaign")]
    #[case::trailing_space("send_message ")]
    fn rejects_unknown_identifiers(#[case] wire: &str) {
        let err = wire.parse::<TaskName>().unwrap_err();
        assert!(matches!(err, DispatchError::UnknownTask(ref name) if name == wire));
    }
}
