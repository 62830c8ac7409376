//! Domain model (ids, entities, task names, outcomes, errors).

pub mod entities;
pub mod errors;
pub mod ids;
pub mod notification;
pub mod outcome;
pub mod task_name;

pub use entities::{
    Attributes, Campaign, Contact, InteractionStep, Message, Organization, QuestionResponse,
    ScopeHandle, Tag, Texter,
};
pub use errors::{CollaboratorError, DispatchError, SuppressedWarmupError};
pub use ids::{
    CampaignId, ContactId, DispatchId, InteractionStepId, MessageId, OrganizationId, UserId,
};
pub use notification::Notification;
pub use outcome::{Outcome, OutcomeKind};
pub use task_name::TaskName;
