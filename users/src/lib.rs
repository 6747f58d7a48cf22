pub mod handlers;
pub mod service;

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::body::MessageBody;
use actix_web::dev::ServiceFactory;
use actix_web::dev::ServiceRequest;
use actix_web::dev::ServiceResponse;
use actix_web::middleware;
use actix_web::web;
use actix_web::App;

use common::{context::ServiceState, error::AddCode};

pub use handlers::auth::*;
pub use handlers::team::*;
pub use handlers::user::*;

pub fn create_app(
    state: Arc<ServiceState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Response = ServiceResponse<impl MessageBody>,
        Config = (),
        InitError = (),
        Error = actix_web::Error,
    >,
> {
    let cors = Cors::permissive();
    let json = web::JsonConfig::default()
        .error_handler(|err, _req| anyhow::anyhow!("{}", err).code(400).into());

    App::new()
        .wrap(cors)
        .wrap(middleware::Logger::default())
        .app_data(web::Data::new(state))
        .app_data(json)
        .service(register)
        .service(login)
        .service(profile)
        .service(get_team_members)
        .service(post_team_member)
        .service(delete_team_member)
}
