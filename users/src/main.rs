use std::sync::Arc;

use actix_web::HttpServer;

use common::{
    constants::USERS_COLLECTION,
    context::ServiceState,
    entities::user::User,
    repository::mongo_repository::MongoRepository,
    services::{mongo_uri, DATABASE, USERS_PORT},
    verification::{verify, Depth},
};
use users::create_app;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();

    let mongo_uri = mongo_uri()?;

    let users = verify::<User>(mongo_uri.as_str(), &DATABASE, USERS_COLLECTION, Depth::Full).await?;
    log::info!("Verified {} stored users", users);

    let user_repo: MongoRepository<User> =
        MongoRepository::new(&mongo_uri, &DATABASE, USERS_COLLECTION).await?;
    user_repo.unique_index("email").await?;
    user_repo.unique_index("id").await?;

    let mut state = ServiceState::new();
    state.insert::<User>(Arc::new(user_repo));
    let state = Arc::new(state);

    log::info!("Users service listening on port {}", *USERS_PORT);
    HttpServer::new(move || create_app(state.clone()))
        .bind(("0.0.0.0", *USERS_PORT))?
        .run()
        .await?;
    Ok(())
}
