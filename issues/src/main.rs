use std::sync::Arc;

use actix_web::HttpServer;

use common::{
    constants::{ISSUES_COLLECTION, REPORTS_COLLECTION, USERS_COLLECTION},
    context::ServiceState,
    entities::{issue::Issue, report::Report, user::User},
    repository::mongo_repository::MongoRepository,
    services::{mongo_uri, DATABASE, ISSUES_PORT, MONGO_TRANSACTIONS},
    verification::{verify, Depth},
};
use issues::{
    create_app,
    repositories::ledger::{LedgerObject, MongoLedger, RepositoryLedger},
};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();

    let mongo_uri = mongo_uri()?;

    verify::<User>(mongo_uri.as_str(), &DATABASE, USERS_COLLECTION, Depth::Sample).await?;
    let issues = verify::<Issue>(mongo_uri.as_str(), &DATABASE, ISSUES_COLLECTION, Depth::Full).await?;
    let reports =
        verify::<Report>(mongo_uri.as_str(), &DATABASE, REPORTS_COLLECTION, Depth::Full).await?;
    log::info!("Verified {} stored issues and {} reports", issues, reports);

    let user_repo: MongoRepository<User> =
        MongoRepository::new(&mongo_uri, &DATABASE, USERS_COLLECTION).await?;
    let issue_repo: MongoRepository<Issue> =
        MongoRepository::new(&mongo_uri, &DATABASE, ISSUES_COLLECTION).await?;
    issue_repo.unique_index("id").await?;
    let report_repo: MongoRepository<Report> =
        MongoRepository::new(&mongo_uri, &DATABASE, REPORTS_COLLECTION).await?;
    report_repo.unique_index("id").await?;

    let issue_repo = Arc::new(issue_repo);
    let report_repo = Arc::new(report_repo);

    let ledger: LedgerObject = if *MONGO_TRANSACTIONS {
        log::info!("Status changes use MongoDB transactions");
        Arc::new(MongoLedger::new(&mongo_uri, &DATABASE).await?)
    } else {
        log::info!("Status changes use the compensating ledger");
        Arc::new(RepositoryLedger::new(issue_repo.clone(), report_repo.clone()))
    };

    let mut state = ServiceState::new();
    state.insert::<User>(Arc::new(user_repo));
    state.insert::<Issue>(issue_repo);
    state.insert::<Report>(report_repo);
    state.insert_manual(ledger);
    let state = Arc::new(state);

    log::info!("Issues service listening on port {}", *ISSUES_PORT);
    HttpServer::new(move || create_app(state.clone()))
        .bind(("0.0.0.0", *ISSUES_PORT))?
        .run()
        .await?;
    Ok(())
}
