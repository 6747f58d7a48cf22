use actix_web::{
    post,
    web::{self, Json},
    HttpResponse,
};
use common::{context::Context, error};

use crate::service::{
    auth::{AuthService, Login, Token},
    user::CreateUser,
};

#[utoipa::path(
    request_body(
        content = CreateUser
    ),
    responses(
        (status = 201, description = "Registered user and session token", body = Token),
        (status = 400, description = "Invalid role, missing category or duplicate email")
    )
)]
#[post("/api/users/register")]
pub async fn register(
    context: Context,
    Json(user): web::Json<CreateUser>,
) -> error::Result<HttpResponse> {
    let token = AuthService::new(context).register(user).await?;
    Ok(HttpResponse::Created().json(token))
}

#[utoipa::path(
    request_body(
        content = Login
    ),
    responses(
        (status = 200, description = "Authorized user's token", body = Token),
        (status = 401, description = "Invalid credentials")
    )
)]
#[post("/api/users/login")]
pub async fn login(context: Context, login: Json<Login>) -> error::Result<Json<Token>> {
    Ok(Json(AuthService::new(context).login(&login).await?))
}
