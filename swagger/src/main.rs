use std::net::Ipv4Addr;

use actix_web::{middleware::Logger, App, HttpServer};
use common::services::SWAGGER_PORT;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::{SwaggerUi, Url};

pub struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "http",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        users::register,
        users::login,
        users::profile,
        users::get_team_members,
        users::post_team_member,
        users::delete_team_member,
    ),
    components(schemas(
        users::service::user::CreateUser,
        users::service::auth::Login,
        users::service::auth::Token,
        users::service::team::CreateTeamMember,
        common::entities::user::PublicUser,
        common::entities::role::Role,
        common::entities::category::Category,
    )),
    modifiers(&SecurityAddon)
)]
struct UsersServiceDoc;

#[derive(OpenApi)]
#[openapi(
    paths(
        issues::post_issue,
        issues::get_client_issues,
        issues::get_team_issues,
        issues::get_all_issues,
        issues::put_issue_status,
        issues::get_reports,
    ),
    components(schemas(
        issues::service::issue::CreateIssue,
        issues::service::transition::ChangeStatus,
        common::entities::issue::PublicIssue,
        common::entities::issue::IssueDetails,
        common::entities::issue::Priority,
        common::entities::issue::Status,
        common::entities::report::PublicReport,
        common::entities::category::Category,
        common::entities::UserRef,
        common::entities::IssueRef,
    )),
    modifiers(&SecurityAddon)
)]
struct IssuesServiceDoc;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();

    log::info!("Swagger UI listening on port {}", *SWAGGER_PORT);
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .service(SwaggerUi::new("/swagger-ui/{_:.*}").urls(vec![
                (
                    Url::new("users", "/api-doc/users.json"),
                    UsersServiceDoc::openapi(),
                ),
                (
                    Url::new("issues", "/api-doc/issues.json"),
                    IssuesServiceDoc::openapi(),
                ),
            ]))
    })
    .bind((Ipv4Addr::UNSPECIFIED, *SWAGGER_PORT))?
    .run()
    .await?;
    Ok(())
}
