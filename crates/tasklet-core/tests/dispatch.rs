//! End-to-end dispatch over the in-memory collaborators, driven with the same
//! JSON payloads producers enqueue.

use async_trait::async_trait;
use rstest::rstest;
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};
use tasklet_core::domain::{CampaignId, ContactId, MessageId, Notification, OrganizationId};
use tasklet_core::impls::memory::{self, CacheOp, InMemoryCache, Journal, Recorded};
use tasklet_core::typed::{
    CampaignStartCacheTask, Handler, QuestionResponseTask, SendMessageTask,
    ServiceManagerTriggerTask, TagUpdateTask, Task,
};
use tasklet_core::{
    DispatchError, DispatcherBuilder, DispatcherConfig, Outcome, OutcomeKind, TaskDispatcher,
    TaskName,
};

fn dispatcher(journal: &Journal, config: DispatcherConfig) -> TaskDispatcher {
    TaskDispatcher::from_collaborators(&memory::collaborators(journal), &config).unwrap()
}

/// Dispatcher whose cache fails on `op`.
fn dispatcher_failing_on(journal: &Journal, op: CacheOp) -> TaskDispatcher {
    let mut collaborators = memory::collaborators(journal);
    collaborators.cache = Arc::new(InMemoryCache::new(journal.clone()).failing_on(op));
    TaskDispatcher::from_collaborators(&collaborators, &DispatcherConfig::default()).unwrap()
}

fn cache_warm_up() -> Value {
    json!({
        "campaign": { "id": 3 },
        "organization": { "id": 1 },
        "contextVars": { "source": "admin" }
    })
}

fn campaign_start(campaign_id: i64) -> Value {
    json!({
        "functionName": "onCampaignStart",
        "organizationId": 1,
        "data": { "campaign": { "id": campaign_id, "title": "GOTV" } }
    })
}

#[tokio::test]
async fn campaign_start_sets_flag_reloads_and_notifies_once() {
    let journal = Journal::new();

    let outcome = dispatcher(&journal, DispatcherConfig::default())
        .dispatch("service_manager_trigger", campaign_start(3))
        .await
        .unwrap();

    assert_eq!(outcome.kind, OutcomeKind::Success);
    let entries = journal.entries().await;
    assert!(entries.contains(&Recorded::CampaignMarkedStarted(CampaignId::new(3))));
    assert!(entries.contains(&Recorded::CampaignLoaded {
        id: CampaignId::new(3),
        forced: true,
    }));
    let notifications: Vec<&Recorded> = entries
        .iter()
        .filter(|e| matches!(e, Recorded::NotificationSent(_)))
        .collect();
    assert_eq!(
        notifications,
        vec![&Recorded::NotificationSent(Notification::CampaignStarted {
            campaign_id: CampaignId::new(3),
        })]
    );
    // warm-up is off by default
    assert!(!entries.iter().any(|e| matches!(e, Recorded::OptOutsLoaded(_))));
}

#[tokio::test]
async fn campaign_start_with_warm_up_enabled_refreshes_caches() {
    let journal = Journal::new();
    let config = DispatcherConfig::from_toml_str("warm_cache_on_campaign_start = true").unwrap();

    dispatcher(&journal, config)
        .dispatch("service_manager_trigger", campaign_start(3))
        .await
        .unwrap();

    let entries = journal.entries().await;
    assert!(entries.contains(&Recorded::AssignmentCacheUpdated(CampaignId::new(3))));
    assert!(entries.contains(&Recorded::ContactsLoaded(CampaignId::new(3))));
    assert!(entries.contains(&Recorded::OptOutsLoaded(OrganizationId::new(1))));
}

#[tokio::test]
async fn cache_warm_up_task_touches_all_three_caches() {
    let journal = Journal::new();

    let outcome = dispatcher(&journal, DispatcherConfig::default())
        .dispatch(
            "campaign_start_cache",
            json!({
                "campaign": { "id": 3 },
                "organization": { "id": 1 },
                "contextVars": { "source": "admin" }
            }),
        )
        .await
        .unwrap();

    assert_eq!(outcome.kind, OutcomeKind::Success);
    let mut entries = journal.entries().await;
    entries.sort_by_key(|e| format!("{e:?}"));
    assert_eq!(
        entries,
        vec![
            Recorded::AssignmentCacheUpdated(CampaignId::new(3)),
            Recorded::ContactsLoaded(CampaignId::new(3)),
            Recorded::OptOutsLoaded(OrganizationId::new(1)),
        ]
    );
}

#[tokio::test]
async fn contact_load_failure_degrades_but_other_caches_are_refreshed() {
    let journal = Journal::new();

    let outcome = dispatcher_failing_on(&journal, CacheOp::Contacts)
        .dispatch("campaign_start_cache", cache_warm_up())
        .await
        .unwrap();

    assert_eq!(outcome.kind, OutcomeKind::Degraded);
    let entries = journal.entries().await;
    assert!(entries.contains(&Recorded::AssignmentCacheUpdated(CampaignId::new(3))));
    assert!(entries.contains(&Recorded::OptOutsLoaded(OrganizationId::new(1))));
    assert!(!entries.contains(&Recorded::ContactsLoaded(CampaignId::new(3))));
}

#[rstest]
#[case::assignment_cache(CacheOp::AssignmentCache, "AssignmentCache cache unavailable")]
#[case::opt_outs(CacheOp::OptOuts, "OptOuts cache unavailable")]
#[tokio::test]
async fn propagating_branch_failure_fails_the_warm_up(
    #[case] op: CacheOp,
    #[case] message: &str,
) {
    let journal = Journal::new();

    let err = dispatcher_failing_on(&journal, op)
        .dispatch("campaign_start_cache", cache_warm_up())
        .await
        .unwrap_err();

    assert!(matches!(err, DispatchError::Collaborator(_)));
    assert_eq!(err.to_string(), message);
    // the contact branch still ran to completion
    assert!(
        journal
            .entries()
            .await
            .contains(&Recorded::ContactsLoaded(CampaignId::new(3)))
    );
}

#[tokio::test]
async fn campaign_start_accepts_string_campaign_id() {
    let journal = Journal::new();

    let outcome = dispatcher(&journal, DispatcherConfig::default())
        .dispatch(
            "service_manager_trigger",
            json!({
                "functionName": "onCampaignStart",
                "organizationId": 1,
                "data": { "campaign": { "id": "3" } }
            }),
        )
        .await
        .unwrap();

    assert_eq!(outcome.kind, OutcomeKind::Success);
    let entries = journal.entries().await;
    assert!(entries.contains(&Recorded::CampaignMarkedStarted(CampaignId::new(3))));
    assert!(entries.contains(&Recorded::NotificationSent(Notification::CampaignStarted {
        campaign_id: CampaignId::new(3),
    })));
}

#[tokio::test]
async fn campaign_start_without_usable_id_is_an_error() {
    let journal = Journal::new();

    let err = dispatcher(&journal, DispatcherConfig::default())
        .dispatch(
            "service_manager_trigger",
            json!({
                "functionName": "onCampaignStart",
                "organizationId": 1,
                "data": { "campaign": { "title": "GOTV" } }
            }),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, DispatchError::InvalidCampaignRef { .. }));
    assert!(
        !journal
            .entries()
            .await
            .iter()
            .any(|e| matches!(e, Recorded::CampaignMarkedStarted(_)))
    );
}

#[tokio::test]
async fn question_response_reaches_named_handler() {
    let journal = Journal::new();

    dispatcher(&journal, DispatcherConfig::default())
        .dispatch(
            "action_handler:question_response",
            json!({
                "name": "test-action",
                "questionResponse": { "value": "Yes" },
                "interactionStep": { "id": 11 },
                "contact": { "id": 5 },
                "campaign": { "id": 3 },
                "organization": { "id": 1 },
                "wasDeleted": false
            }),
        )
        .await
        .unwrap();

    assert_eq!(
        journal.entries().await,
        vec![Recorded::ActionProcessed {
            handler: "test-action".to_string(),
            contact: ContactId::new(5),
        }]
    );
}

#[tokio::test]
async fn tag_update_reaches_named_handler() {
    let journal = Journal::new();

    dispatcher(&journal, DispatcherConfig::default())
        .dispatch(
            "action_handler:tag_update",
            json!({
                "name": "test-action",
                "tags": [{ "name": "Escalated" }, { "name": "Spanish" }],
                "contact": { "id": 5 },
                "campaign": { "id": 3 },
                "organization": { "id": 1 },
                "texter": { "id": 8 }
            }),
        )
        .await
        .unwrap();

    assert_eq!(
        journal.entries().await,
        vec![Recorded::TagsUpdated {
            handler: "test-action".to_string(),
            tags: vec!["Escalated".to_string(), "Spanish".to_string()],
        }]
    );
}

#[tokio::test]
async fn send_message_routes_by_service_name() {
    let journal = Journal::new();
    let dispatcher = dispatcher(&journal, DispatcherConfig::default());
    let payload = |service: &str| {
        json!({
            "message": { "id": 40, "service": service, "text": "hi" },
            "contact": { "id": 5 },
            "organization": { "id": 1 },
            "campaign": { "id": 3 }
        })
    };

    dispatcher
        .dispatch("send_message", payload("fakeservice"))
        .await
        .unwrap();
    let err = dispatcher
        .dispatch("send_message", payload("nexmo"))
        .await
        .unwrap_err();

    assert!(matches!(err, DispatchError::ServiceNotFound { .. }));
    let sent: Vec<Recorded> = journal
        .entries()
        .await
        .into_iter()
        .filter(|e| matches!(e, Recorded::MessageSent { .. }))
        .collect();
    assert_eq!(
        sent,
        vec![Recorded::MessageSent {
            service: "fakeservice".to_string(),
            message: MessageId::new(40),
        }]
    );
}

#[tokio::test]
async fn concurrent_dispatches_share_one_dispatcher() {
    let journal = Journal::new();
    let dispatcher = dispatcher(&journal, DispatcherConfig::default());

    let handles: Vec<_> = (1..=4)
        .map(|id| {
            let dispatcher = dispatcher.clone();
            tokio::spawn(async move {
                dispatcher
                    .dispatch("service_manager_trigger", campaign_start(id))
                    .await
            })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let started = journal
        .entries()
        .await
        .into_iter()
        .filter(|e| matches!(e, Recorded::CampaignMarkedStarted(_)))
        .count();
    assert_eq!(started, 4);
}

/// Records which task identifier each invocation was bound to.
#[derive(Clone, Default)]
struct CallLog {
    calls: Arc<Mutex<Vec<TaskName>>>,
}

#[async_trait]
impl<T: Task> Handler<T> for CallLog {
    async fn handle(&self, _task: T) -> Result<Outcome, DispatchError> {
        self.calls.lock().unwrap().push(T::NAME);
        Ok(Outcome::success())
    }
}

#[rstest]
#[case::send_message(
    TaskName::SendMessage,
    json!({
        "message": { "id": 40, "service": "fakeservice" },
        "contact": { "id": 5 },
        "organization": { "id": 1 },
        "campaign": { "id": 3 }
    })
)]
#[case::question_response(
    TaskName::ActionHandlerQuestionResponse,
    json!({
        "name": "test-action",
        "questionResponse": { "value": "Yes" },
        "interactionStep": { "id": 11 },
        "contact": { "id": 5 },
        "campaign": { "id": 3 },
        "organization": { "id": 1 }
    })
)]
#[case::tag_update(
    TaskName::ActionHandlerTagUpdate,
    json!({
        "name": "test-action",
        "tags": [],
        "contact": { "id": 5 },
        "campaign": { "id": 3 },
        "organization": { "id": 1 },
        "texter": { "id": 8 }
    })
)]
#[case::campaign_start_cache(TaskName::CampaignStartCache, cache_warm_up())]
#[case::service_manager_trigger(TaskName::ServiceManagerTrigger, campaign_start(3))]
#[tokio::test]
async fn each_identifier_invokes_exactly_its_handler_once(
    #[case] task: TaskName,
    #[case] payload: Value,
) {
    let log = CallLog::default();
    let dispatcher = DispatcherBuilder::new()
        .register::<SendMessageTask, _>(log.clone())
        .unwrap()
        .register::<QuestionResponseTask, _>(log.clone())
        .unwrap()
        .register::<TagUpdateTask, _>(log.clone())
        .unwrap()
        .register::<CampaignStartCacheTask, _>(log.clone())
        .unwrap()
        .register::<ServiceManagerTriggerTask, _>(log.clone())
        .unwrap()
        .build()
        .unwrap();

    dispatcher.dispatch(task.as_str(), payload).await.unwrap();

    assert_eq!(*log.calls.lock().unwrap(), vec![task]);
}
