use std::sync::Arc;

use async_trait::async_trait;
use common::{
    constants::{ISSUES_COLLECTION, REPORTS_COLLECTION},
    entities::{issue::Issue, report::Report},
    error::{self, AddCode},
    repository::RepositoryObject,
};
use mongodb::{
    bson::doc,
    error::TRANSIENT_TRANSACTION_ERROR,
    Client, ClientSession, Collection,
};

/// Persists a status change: the report and the new issue state land
/// together or not at all.
#[async_trait]
pub trait TransitionLedger: Send + Sync {
    /// Stores `report` and replaces `issue`. `expected` is the
    /// `last_modified` the caller read; implementations that cannot isolate
    /// the two writes may ignore it and let the last writer win. A 409 leaves
    /// both collections untouched and is safe to retry.
    async fn commit(&self, report: &Report, issue: &Issue, expected: i64) -> error::Result<()>;
}

pub type LedgerObject = Arc<dyn TransitionLedger>;

fn conflict(issue: &Issue) -> error::ServiceError {
    anyhow::anyhow!("Issue {} was modified concurrently", issue.id).code(409)
}

/// Multi-document transaction. Needs a replica set deployment.
pub struct MongoLedger {
    client: Client,
    issues: Collection<Issue>,
    reports: Collection<Report>,
}

impl MongoLedger {
    pub async fn new(mongo_uri: &str, database: &str) -> anyhow::Result<Self> {
        let client = Client::with_uri_str(mongo_uri).await?;
        let db = client.database(database);
        Ok(Self {
            issues: db.collection(ISSUES_COLLECTION),
            reports: db.collection(REPORTS_COLLECTION),
            client,
        })
    }

    async fn write(
        &self,
        session: &mut ClientSession,
        report: &Report,
        issue: &Issue,
        expected: i64,
    ) -> mongodb::error::Result<bool> {
        self.reports
            .insert_one_with_session(report, None, session)
            .await?;

        let result = self
            .issues
            .replace_one_with_session(
                doc! {"id": issue.id, "last_modified": expected},
                issue,
                None,
                session,
            )
            .await?;
        Ok(result.matched_count > 0)
    }
}

#[async_trait]
impl TransitionLedger for MongoLedger {
    async fn commit(&self, report: &Report, issue: &Issue, expected: i64) -> error::Result<()> {
        let mut session = self.client.start_session(None).await?;
        session.start_transaction(None).await?;

        match self.write(&mut session, report, issue, expected).await {
            Ok(true) => {
                session.commit_transaction().await?;
                Ok(())
            }
            Ok(false) => {
                session.abort_transaction().await?;
                Err(conflict(issue))
            }
            Err(err) => {
                session.abort_transaction().await.ok();
                if err.contains_label(TRANSIENT_TRANSACTION_ERROR) {
                    log::warn!("Transient transaction error on issue {}: {}", issue.id, err);
                    return Err(conflict(issue));
                }
                Err(err.into())
            }
        }
    }
}

/// Compensating protocol over plain repositories: the report goes in first
/// and is removed again if the issue write does not happen. The issue is
/// replaced unconditionally, so concurrent transitions never conflict and
/// the last write wins.
pub struct RepositoryLedger {
    issues: RepositoryObject<Issue>,
    reports: RepositoryObject<Report>,
}

impl RepositoryLedger {
    pub fn new(issues: RepositoryObject<Issue>, reports: RepositoryObject<Report>) -> Self {
        Self { issues, reports }
    }

    async fn discard(&self, report: &Report) {
        if let Err(err) = self.reports.delete("id", &report.id).await {
            log::error!("Failed to remove report {}: {}", report.id, err);
        }
    }
}

#[async_trait]
impl TransitionLedger for RepositoryLedger {
    async fn commit(&self, report: &Report, issue: &Issue, _expected: i64) -> error::Result<()> {
        if !self.reports.insert(report).await? {
            return Err(anyhow::anyhow!("Report {} already exists", report.id).code(500));
        }

        match self
            .issues
            .update_one(doc! {"id": issue.id}, issue)
            .await
        {
            Ok(true) => Ok(()),
            Ok(false) => {
                self.discard(report).await;
                Err(anyhow::anyhow!("Issue not found").code(404))
            }
            Err(err) => {
                self.discard(report).await;
                Err(err)
            }
        }
    }
}
