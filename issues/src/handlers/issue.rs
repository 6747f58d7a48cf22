use actix_web::{
    get, post, put,
    web::{self, Json},
    HttpResponse,
};
use common::{
    context::Context,
    entities::issue::{IssueDetails, PublicIssue},
    error, parse_id,
};
use serde::{Deserialize, Serialize};
use utoipa::IntoParams;

use crate::service::{
    issue::{CreateIssue, IssueService},
    transition::{ChangeStatus, TransitionService},
};

#[derive(Debug, Clone, Serialize, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AllIssuesQuery {
    #[serde(default)]
    pub skip: u32,
    pub limit: Option<u32>,
}

#[utoipa::path(
    params(
        ("Authorization" = String, Header,  description = "Bearer token"),
    ),
    request_body(
        content = CreateIssue
    ),
    responses(
        (status = 201, description = "Submitted issue", body = PublicIssue),
        (status = 400, description = "Missing title or description, unknown category or priority"),
        (status = 403, description = "Caller is not a client")
    )
)]
#[post("/api/issues")]
pub async fn post_issue(
    context: Context,
    Json(data): web::Json<CreateIssue>,
) -> error::Result<HttpResponse> {
    let issue = IssueService::new(context).create(data).await?;
    Ok(HttpResponse::Created().json(issue))
}

#[utoipa::path(
    params(
        ("Authorization" = String, Header,  description = "Bearer token"),
    ),
    responses(
        (status = 200, description = "Issues submitted by the caller", body = [PublicIssue])
    )
)]
#[get("/api/issues/client")]
pub async fn get_client_issues(context: Context) -> error::Result<Json<Vec<PublicIssue>>> {
    Ok(Json(IssueService::new(context).list_for_client().await?))
}

#[utoipa::path(
    params(
        ("Authorization" = String, Header,  description = "Bearer token"),
    ),
    responses(
        (status = 200, description = "Unresolved issues of the caller's category", body = [IssueDetails]),
        (status = 401, description = "Caller is not a team member")
    )
)]
#[get("/api/issues/team")]
pub async fn get_team_issues(context: Context) -> error::Result<Json<Vec<IssueDetails>>> {
    Ok(Json(IssueService::new(context).list_for_team().await?))
}

#[utoipa::path(
    params(
        ("Authorization" = String, Header,  description = "Bearer token"),
        AllIssuesQuery,
    ),
    responses(
        (status = 200, description = "All issues", body = [IssueDetails]),
        (status = 403, description = "Caller is not an admin")
    )
)]
#[get("/api/issues/admin")]
pub async fn get_all_issues(
    context: Context,
    query: web::Query<AllIssuesQuery>,
) -> error::Result<Json<Vec<IssueDetails>>> {
    Ok(Json(
        IssueService::new(context)
            .list_all(query.skip, query.limit)
            .await?,
    ))
}

#[utoipa::path(
    params(
        ("Authorization" = String, Header,  description = "Bearer token"),
        ("id" = String, Path, description = "Issue id"),
    ),
    request_body(
        content = ChangeStatus
    ),
    responses(
        (status = 200, description = "Updated issue", body = PublicIssue),
        (status = 401, description = "Caller is not a team member"),
        (status = 403, description = "Issue belongs to another category"),
        (status = 404, description = "Issue not found")
    )
)]
#[put("/api/issues/{id}/status")]
pub async fn put_issue_status(
    context: Context,
    id: web::Path<String>,
    Json(data): web::Json<ChangeStatus>,
) -> error::Result<Json<PublicIssue>> {
    Ok(Json(
        TransitionService::new(context)
            .transition(parse_id(&id)?, data.status)
            .await?,
    ))
}
