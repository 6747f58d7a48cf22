use actix_web::{get, web::Json};
use common::{context::Context, entities::user::PublicUser, error};

use crate::service::user::UserService;

#[utoipa::path(
    params(
        ("Authorization" = String, Header,  description = "Bearer token"),
    ),
    responses(
        (status = 200, description = "Current user", body = PublicUser),
        (status = 401, description = "Missing or invalid token")
    )
)]
#[get("/api/users/profile")]
pub async fn profile(context: Context) -> error::Result<Json<PublicUser>> {
    Ok(Json(UserService::new(context).profile().await?))
}
