pub mod handlers;
pub mod repositories;
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

pub use handlers::issue::*;
pub use handlers::report::*;

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
    let query = web::QueryConfig::default()
        .error_handler(|err, _req| anyhow::anyhow!("{}", err).code(400).into());

    App::new()
        .wrap(cors)
        .wrap(middleware::Logger::default())
        .app_data(web::Data::new(state))
        .app_data(json)
        .app_data(query)
        .service(post_issue)
        .service(get_client_issues)
        .service(get_team_issues)
        .service(get_all_issues)
        .service(put_issue_status)
        .service(get_reports)
}

#[cfg(test)]
pub(crate) mod test_utils {
    use std::sync::Arc;

    use common::{
        auth::Auth,
        context::ServiceState,
        entities::{category::Category, issue::Issue, report::Report, role::Role, user::User},
        repository::{test_repository::TestRepository, Repository, RepositoryObject},
    };
    use mongodb::bson::oid::ObjectId;

    use crate::repositories::ledger::{LedgerObject, RepositoryLedger};

    pub struct Fixture {
        pub state: Arc<ServiceState>,
        pub users: Arc<TestRepository<User>>,
        pub issues: RepositoryObject<Issue>,
        pub reports: Arc<TestRepository<Report>>,
    }

    impl Fixture {
        pub fn new() -> Self {
            Self::with_issues(Arc::new(TestRepository::<Issue>::default()))
        }

        pub fn with_issues(issues: RepositoryObject<Issue>) -> Self {
            Self::with_ledger(issues, |issues, reports| -> LedgerObject {
                Arc::new(RepositoryLedger::new(issues, reports))
            })
        }

        pub fn with_ledger<F>(issues: RepositoryObject<Issue>, ledger: F) -> Self
        where
            F: FnOnce(RepositoryObject<Issue>, RepositoryObject<Report>) -> LedgerObject,
        {
            std::env::set_var("JWT_SECRET", "test-secret");

            let users = Arc::new(TestRepository::<User>::default());
            let reports = Arc::new(TestRepository::<Report>::default());
            let report_store: RepositoryObject<Report> = reports.clone();
            let ledger = ledger(issues.clone(), report_store);

            let mut state = ServiceState::new();
            state.insert::<User>(users.clone());
            state.insert::<Issue>(issues.clone());
            state.insert::<Report>(reports.clone());
            state.insert_manual(ledger);

            Fixture {
                state: Arc::new(state),
                users,
                issues,
                reports,
            }
        }

        /// Stores a user and returns it with an `Authorization` header value.
        pub async fn user(
            &self,
            name: &str,
            role: Role,
            category: Option<Category>,
        ) -> (User, String) {
            let user = User {
                id: ObjectId::new(),
                name: name.to_string(),
                email: format!("{}@example.com", name.to_lowercase()),
                password: String::new(),
                salt: String::new(),
                role,
                category,
                created_at: 0,
                last_modified: 0,
            };
            self.users.insert(&user).await.unwrap();

            let token = Auth::from(&user).to_token().unwrap();
            (user, format!("Bearer {}", token))
        }
    }
}
