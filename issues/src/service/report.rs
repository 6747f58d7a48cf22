use std::collections::HashMap;

use common::{
    access_rules::{deny, AccessRules, Administrate},
    context::Context,
    entities::{
        issue::Issue,
        report::{PublicReport, Report},
        IssueRef,
    },
    error,
};
use mongodb::bson::oid::ObjectId;

use super::issue::resolve_users;

pub struct ReportService {
    context: Context,
}

impl ReportService {
    pub fn new(context: Context) -> Self {
        Self { context }
    }

    /// Report log, with team member and issue references resolved. Without
    /// `limit` every report from `skip` onwards is returned.
    pub async fn list_all(&self, skip: u32, limit: Option<u32>) -> error::Result<Vec<PublicReport>> {
        let auth = self.context.auth();
        if !Administrate.get_access(&auth, ()) {
            return Err(deny(&auth, "Not authorized as an admin"));
        }

        let reports = self.context.try_get_repository::<Report>()?;
        let reports = reports
            .find_all(skip, limit.unwrap_or(u32::MAX))
            .await?;

        let mut member_ids: Vec<ObjectId> = reports.iter().map(|r| r.team_member).collect();
        member_ids.sort();
        member_ids.dedup();
        let members = resolve_users(&self.context, member_ids).await?;

        let mut issue_ids: Vec<ObjectId> = reports.iter().filter_map(|r| r.issue_id).collect();
        issue_ids.sort();
        issue_ids.dedup();
        let issues: HashMap<ObjectId, IssueRef> = if issue_ids.is_empty() {
            HashMap::new()
        } else {
            self.context
                .try_get_repository::<Issue>()?
                .find_all_by_ids("id", issue_ids)
                .await?
                .iter()
                .map(|issue| (issue.id, IssueRef::from(issue)))
                .collect()
        };

        Ok(reports
            .into_iter()
            .map(|report| {
                let member = members.get(&report.team_member).cloned();
                let issue = report.issue_id.and_then(|id| issues.get(&id).cloned());
                PublicReport::new(report, member, issue)
            })
            .collect())
    }
}
