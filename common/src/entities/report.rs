use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    constants::STATUS_UPDATE_ACTION,
    default_timestamp,
    entities::{
        issue::{Issue, Status},
        IssueRef, UserRef,
    },
    repository::Entity,
};

/// Audit record of one status change. Written once, never updated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Report {
    pub id: ObjectId,
    pub action: String,
    pub description: String,
    #[serde(default)]
    pub issue_id: Option<ObjectId>,
    pub team_member: ObjectId,
    #[serde(default)]
    pub old_status: Option<Status>,
    #[serde(default)]
    pub new_status: Option<Status>,
    #[serde(default = "default_timestamp")]
    pub timestamp: i64,
}

impl Report {
    pub fn new(
        action: impl Into<String>,
        description: impl Into<String>,
        issue_id: Option<ObjectId>,
        team_member: ObjectId,
        old_status: Option<Status>,
        new_status: Option<Status>,
    ) -> Self {
        Report {
            id: ObjectId::new(),
            action: action.into(),
            description: description.into(),
            issue_id,
            team_member,
            old_status,
            new_status,
            timestamp: default_timestamp(),
        }
    }

    pub fn status_update(issue: &Issue, team_member: ObjectId, new_status: Status) -> Self {
        Report::new(
            STATUS_UPDATE_ACTION,
            format!("Changed status from {} to {}", issue.status, new_status),
            Some(issue.id),
            team_member,
            Some(issue.status),
            Some(new_status),
        )
    }
}

impl Entity for Report {
    fn id(&self) -> ObjectId {
        self.id
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct PublicReport {
    pub id: String,
    pub action: String,
    pub description: String,
    pub issue_id: Option<String>,
    pub team_member_id: String,
    pub old_status: Option<Status>,
    pub new_status: Option<Status>,
    pub timestamp: i64,
    pub team_member: Option<UserRef>,
    pub issue: Option<IssueRef>,
}

impl PublicReport {
    pub fn new(report: Report, team_member: Option<UserRef>, issue: Option<IssueRef>) -> Self {
        PublicReport {
            id: report.id.to_hex(),
            action: report.action,
            description: report.description,
            issue_id: report.issue_id.map(|id| id.to_hex()),
            team_member_id: report.team_member.to_hex(),
            old_status: report.old_status,
            new_status: report.new_status,
            timestamp: report.timestamp,
            team_member,
            issue,
        }
    }
}
