use std::collections::HashMap;

use common::{
    access_rules::{deny, AccessRules, Administrate, Submit},
    context::Context,
    default_timestamp,
    entities::{
        category::Category,
        issue::{Issue, IssueDetails, Priority, PublicIssue, Status},
        user::User,
        UserRef,
    },
    error::{self, AddCode},
};
use mongodb::bson::{oid::ObjectId, Bson};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::team_member;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateIssue {
    pub title: String,
    pub description: String,
    pub category: Category,
    pub priority: Priority,
    #[serde(default)]
    pub attachments: Vec<String>,
}

/// Resolves user ids to display references. Ids without a stored user are
/// left out of the map.
pub async fn resolve_users(
    context: &Context,
    ids: Vec<ObjectId>,
) -> error::Result<HashMap<ObjectId, UserRef>> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    let users = context.try_get_repository::<User>()?;
    Ok(users
        .find_all_by_ids("id", ids)
        .await?
        .iter()
        .map(|user| (user.id, UserRef::from(user)))
        .collect())
}

pub struct IssueService {
    context: Context,
}

impl IssueService {
    pub fn new(context: Context) -> Self {
        Self { context }
    }

    pub async fn create(&self, issue: CreateIssue) -> error::Result<PublicIssue> {
        let auth = self.context.auth();
        if !Submit.get_access(&auth, ()) {
            return Err(deny(&auth, "Only clients can submit issues"));
        }
        let created_by = auth.authenticated()?;

        if issue.title.trim().is_empty() {
            return Err(anyhow::anyhow!("Title is required").code(400));
        }
        if issue.description.trim().is_empty() {
            return Err(anyhow::anyhow!("Description is required").code(400));
        }

        let now = default_timestamp();
        let issue = Issue {
            id: ObjectId::new(),
            title: issue.title.trim().to_string(),
            description: issue.description,
            category: issue.category,
            priority: issue.priority,
            status: Status::Pending,
            created_by,
            assigned_to: None,
            attachments: issue.attachments,
            created_at: now,
            last_modified: now,
        };

        let issues = self.context.try_get_repository::<Issue>()?;
        issues.insert(&issue).await?;

        log::info!("Issue {} submitted in {}", issue.id, issue.category);
        Ok(issue.into())
    }

    pub async fn list_for_client(&self) -> error::Result<Vec<PublicIssue>> {
        let id = self.context.auth().authenticated()?;
        let issues = self.context.try_get_repository::<Issue>()?;

        let issues = issues.find_many("created_by", &Bson::ObjectId(id)).await?;
        Ok(issues.into_iter().map(PublicIssue::from).collect())
    }

    /// Open queue of the caller's category. Resolved issues are left out.
    pub async fn list_for_team(&self) -> error::Result<Vec<IssueDetails>> {
        let member = team_member(&self.context).await?;
        let Some(category) = member.category else {
            return Err(anyhow::anyhow!("Not authorized as a team member").code(401));
        };

        let issues = self.context.try_get_repository::<Issue>()?;
        let queue = issues
            .find_many("category", &Bson::from(category))
            .await?
            .into_iter()
            .filter(|issue| issue.status != Status::Resolved)
            .collect();

        self.details(queue).await
    }

    /// Every issue, optionally paged. Without `limit` the whole collection
    /// from `skip` onwards is returned.
    pub async fn list_all(&self, skip: u32, limit: Option<u32>) -> error::Result<Vec<IssueDetails>> {
        let auth = self.context.auth();
        if !Administrate.get_access(&auth, ()) {
            return Err(deny(&auth, "Not authorized as an admin"));
        }

        let issues = self.context.try_get_repository::<Issue>()?;
        let issues = issues
            .find_all(skip, limit.unwrap_or(u32::MAX))
            .await?;

        self.details(issues).await
    }

    async fn details(&self, issues: Vec<Issue>) -> error::Result<Vec<IssueDetails>> {
        let mut ids: Vec<ObjectId> = issues
            .iter()
            .flat_map(|issue| std::iter::once(issue.created_by).chain(issue.assigned_to))
            .collect();
        ids.sort();
        ids.dedup();

        let users = resolve_users(&self.context, ids).await?;

        Ok(issues
            .into_iter()
            .map(|issue| IssueDetails {
                creator: users.get(&issue.created_by).cloned(),
                assignee: issue.assigned_to.and_then(|id| users.get(&id).cloned()),
                issue: issue.into(),
            })
            .collect())
    }
}
