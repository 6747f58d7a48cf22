use actix_web::{
    delete, get, post,
    web::{self, Json},
    HttpResponse,
};
use common::{context::Context, entities::user::PublicUser, error, parse_id};

use crate::service::team::{CreateTeamMember, TeamService};

#[utoipa::path(
    params(
        ("Authorization" = String, Header,  description = "Bearer token"),
    ),
    responses(
        (status = 200, description = "All team members", body = [PublicUser]),
        (status = 403, description = "Caller is not an admin")
    )
)]
#[get("/api/teams")]
pub async fn get_team_members(context: Context) -> error::Result<Json<Vec<PublicUser>>> {
    Ok(Json(TeamService::new(context).list().await?))
}

#[utoipa::path(
    params(
        ("Authorization" = String, Header,  description = "Bearer token"),
    ),
    request_body(
        content = CreateTeamMember
    ),
    responses(
        (status = 201, description = "Created team member", body = PublicUser),
        (status = 400, description = "Invalid input or duplicate email"),
        (status = 403, description = "Caller is not an admin")
    )
)]
#[post("/api/teams")]
pub async fn post_team_member(
    context: Context,
    Json(data): web::Json<CreateTeamMember>,
) -> error::Result<HttpResponse> {
    let member = TeamService::new(context).create(data).await?;
    Ok(HttpResponse::Created().json(member))
}

#[utoipa::path(
    params(
        ("Authorization" = String, Header,  description = "Bearer token"),
        ("id" = String, Path, description = "Team member id"),
    ),
    responses(
        (status = 200, description = "Removed team member", body = PublicUser),
        (status = 404, description = "No team member with this id")
    )
)]
#[delete("/api/teams/{id}")]
pub async fn delete_team_member(
    context: Context,
    id: web::Path<String>,
) -> error::Result<Json<PublicUser>> {
    Ok(Json(TeamService::new(context).delete(parse_id(&id)?).await?))
}
