use derive_more::Display;
use mongodb::bson::{oid::ObjectId, Bson};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    default_timestamp,
    entities::{category::Category, IssueRef, UserRef},
    repository::Entity,
};

#[derive(Debug, Display, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    #[display(fmt = "low")]
    Low,
    #[display(fmt = "medium")]
    Medium,
    #[display(fmt = "high")]
    High,
}

/// Issue lifecycle. Any status may follow any other; only the actor's
/// category gates a change.
#[derive(Debug, Display, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    #[default]
    #[display(fmt = "pending")]
    Pending,
    #[display(fmt = "in-progress")]
    InProgress,
    #[display(fmt = "resolved")]
    Resolved,
    #[display(fmt = "rejected")]
    Rejected,
    #[display(fmt = "re-opened")]
    ReOpened,
}

impl From<Status> for Bson {
    fn from(status: Status) -> Self {
        Bson::String(status.to_string())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Issue {
    pub id: ObjectId,
    pub title: String,
    pub description: String,
    pub category: Category,
    pub priority: Priority,
    #[serde(default)]
    pub status: Status,
    pub created_by: ObjectId,
    #[serde(default)]
    pub assigned_to: Option<ObjectId>,
    #[serde(default)]
    pub attachments: Vec<String>,
    #[serde(default = "default_timestamp")]
    pub created_at: i64,
    #[serde(default = "default_timestamp")]
    pub last_modified: i64,
}

impl Issue {
    /// Applies a status change, taking ownership on entry into in-progress.
    pub fn apply_status(&mut self, status: Status, actor: ObjectId) {
        self.status = status;
        if status == Status::InProgress {
            self.assigned_to = Some(actor);
        }
    }
}

impl Entity for Issue {
    fn id(&self) -> ObjectId {
        self.id
    }
}

impl From<&Issue> for IssueRef {
    fn from(issue: &Issue) -> Self {
        IssueRef {
            id: issue.id.to_hex(),
            title: issue.title.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct PublicIssue {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: Category,
    pub priority: Priority,
    pub status: Status,
    pub created_by: String,
    pub assigned_to: Option<String>,
    pub attachments: Vec<String>,
    pub created_at: i64,
    pub last_modified: i64,
}

impl From<Issue> for PublicIssue {
    fn from(issue: Issue) -> Self {
        PublicIssue {
            id: issue.id.to_hex(),
            title: issue.title,
            description: issue.description,
            category: issue.category,
            priority: issue.priority,
            status: issue.status,
            created_by: issue.created_by.to_hex(),
            assigned_to: issue.assigned_to.map(|id| id.to_hex()),
            attachments: issue.attachments,
            created_at: issue.created_at,
            last_modified: issue.last_modified,
        }
    }
}

/// Issue with creator and assignee resolved for display. A reference stays
/// `None` when the user no longer exists.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct IssueDetails {
    #[serde(flatten)]
    pub issue: PublicIssue,
    pub creator: Option<UserRef>,
    pub assignee: Option<UserRef>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issue() -> Issue {
        Issue {
            id: ObjectId::new(),
            title: "Printer offline".to_string(),
            description: "Second floor printer does not respond".to_string(),
            category: Category::Technical,
            priority: Priority::High,
            status: Status::Pending,
            created_by: ObjectId::new(),
            assigned_to: None,
            attachments: Vec::new(),
            created_at: 0,
            last_modified: 0,
        }
    }

    #[test]
    fn in_progress_assigns_actor() {
        let actor = ObjectId::new();
        let mut issue = issue();
        issue.apply_status(Status::InProgress, actor);
        assert_eq!(issue.status, Status::InProgress);
        assert_eq!(issue.assigned_to, Some(actor));
    }

    #[test]
    fn other_statuses_keep_assignee() {
        let first = ObjectId::new();
        let mut issue = issue();
        issue.apply_status(Status::InProgress, first);
        issue.apply_status(Status::Resolved, ObjectId::new());
        assert_eq!(issue.assigned_to, Some(first));

        let mut unassigned = self::issue();
        unassigned.apply_status(Status::Rejected, ObjectId::new());
        assert_eq!(unassigned.assigned_to, None);
    }

    #[test]
    fn status_wire_names() {
        assert_eq!(
            serde_json::to_string(&Status::InProgress).unwrap(),
            "\"in-progress\""
        );
        assert_eq!(
            serde_json::from_str::<Status>("\"re-opened\"").unwrap(),
            Status::ReOpened
        );
        assert_eq!(Status::ReOpened.to_string(), "re-opened");
    }
}
