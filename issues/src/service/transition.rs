use common::{
    access_rules::{AccessRules, Transition},
    context::Context,
    default_timestamp,
    entities::{
        issue::{Issue, PublicIssue, Status},
        report::Report,
        user::User,
    },
    error::{self, AddCode},
    retry::retry_on_conflict,
};
use mongodb::bson::{oid::ObjectId, Bson};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::team_member;
use crate::repositories::ledger::LedgerObject;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ChangeStatus {
    pub status: Status,
}

pub struct TransitionService {
    context: Context,
}

impl TransitionService {
    pub fn new(context: Context) -> Self {
        Self { context }
    }

    /// Moves an issue to `status` on behalf of the calling team member and
    /// records the change. Lost races against another transition are retried
    /// from a fresh read of the issue.
    pub async fn transition(&self, id: ObjectId, status: Status) -> error::Result<PublicIssue> {
        let actor = team_member(&self.context).await?;
        let actor = &actor;

        let issue = retry_on_conflict(move || self.attempt(actor, id, status)).await?;
        Ok(issue.into())
    }

    async fn attempt(&self, actor: &User, id: ObjectId, status: Status) -> error::Result<Issue> {
        let issues = self.context.try_get_repository::<Issue>()?;
        let ledger = self.context.try_get_repository_manual::<LedgerObject>()?;

        let Some(mut issue) = issues.find("id", &Bson::ObjectId(id)).await? else {
            return Err(anyhow::anyhow!("Issue not found").code(404));
        };

        if !Transition.get_access(actor, &issue) {
            return Err(anyhow::anyhow!(
                "You can only update issues in your category"
            )
            .code(403));
        }

        let report = Report::status_update(&issue, actor.id, status);
        let expected = issue.last_modified;

        issue.apply_status(status, actor.id);
        issue.last_modified = default_timestamp().max(expected + 1);

        ledger.commit(&report, &issue, expected).await?;

        log::info!(
            "Issue {} moved to {} by {}",
            issue.id,
            issue.status,
            actor.id
        );
        Ok(issue)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    use async_trait::async_trait;
    use common::{
        auth::Auth,
        entities::{
            category::Category,
            issue::{Issue, Priority, Status},
            report::Report,
            role::Role,
        },
        error::{self, AddCode},
        repository::{test_repository::TestRepository, Repository},
    };
    use mongodb::bson::{oid::ObjectId, Bson};

    use super::*;
    use crate::{
        repositories::ledger::{RepositoryLedger, TransitionLedger},
        test_utils::Fixture,
    };

    /// Loses the race a fixed number of times before writing through.
    struct ContendedLedger {
        inner: RepositoryLedger,
        conflicts: AtomicUsize,
        commits: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl TransitionLedger for ContendedLedger {
        async fn commit(&self, report: &Report, issue: &Issue, expected: i64) -> error::Result<()> {
            self.commits.fetch_add(1, Ordering::SeqCst);
            let left = self.conflicts.load(Ordering::SeqCst);
            if left > 0 {
                self.conflicts.store(left - 1, Ordering::SeqCst);
                return Err(anyhow::anyhow!("Issue {} was modified concurrently", issue.id).code(409));
            }
            self.inner.commit(report, issue, expected).await
        }
    }

    #[actix_web::test]
    async fn repeated_conflicts_are_retried() {
        let commits = Arc::new(AtomicUsize::new(0));
        let counter = commits.clone();
        let fixture = Fixture::with_ledger(
            Arc::new(TestRepository::<Issue>::default()),
            move |issues, reports| -> LedgerObject {
                Arc::new(ContendedLedger {
                    inner: RepositoryLedger::new(issues, reports),
                    conflicts: AtomicUsize::new(8),
                    commits: counter,
                })
            },
        );
        let (member, _) = fixture
            .user("Tess", Role::Team, Some(Category::Supplies))
            .await;

        let issue = Issue {
            id: ObjectId::new(),
            title: "Paper shortage".to_string(),
            description: "Print room is out of A4".to_string(),
            category: Category::Supplies,
            priority: Priority::Medium,
            status: Status::Pending,
            created_by: ObjectId::new(),
            assigned_to: None,
            attachments: Vec::new(),
            created_at: 0,
            last_modified: 0,
        };
        fixture.issues.insert(&issue).await.unwrap();

        let service = TransitionService::new(Context::new(
            fixture.state.clone(),
            Auth::Team(member.id),
        ));
        let updated = service
            .transition(issue.id, Status::InProgress)
            .await
            .unwrap();
        assert_eq!(updated.status, Status::InProgress);

        assert_eq!(commits.load(Ordering::SeqCst), 9);

        let reports = fixture.reports.find_all(0, u32::MAX).await.unwrap();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].team_member, member.id);

        let saved = fixture
            .issues
            .find("id", &Bson::ObjectId(issue.id))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(saved.status, Status::InProgress);
        assert_eq!(saved.assigned_to, Some(member.id));
    }

    #[actix_web::test]
    async fn non_members_are_unauthorized() {
        let fixture = Fixture::new();
        let (client, _) = fixture.user("Casey", Role::Client, None).await;

        let service = TransitionService::new(Context::new(
            fixture.state.clone(),
            Auth::Team(client.id),
        ));
        let err = service
            .transition(ObjectId::new(), Status::Resolved)
            .await
            .unwrap_err();
        assert_eq!(err.code, 401);
    }
}
