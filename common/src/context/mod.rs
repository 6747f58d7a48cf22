use std::sync::Arc;

use actix_web::{dev::Payload, web::Data, FromRequest, HttpRequest};
use anyhow::anyhow;
use type_map::concurrent::TypeMap;

use crate::{
    auth::Auth,
    error::{self, AddCode, ServiceError},
    repository::RepositoryObject,
};

/// Process-wide state: repositories and other shared handles, keyed by type.
#[derive(Default)]
pub struct ServiceState {
    pub repositories: TypeMap,
}

impl ServiceState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert<T: 'static>(&mut self, repository: RepositoryObject<T>) {
        self.repositories.insert(repository);
    }

    pub fn insert_manual<T: Send + Sync + 'static>(&mut self, repository: T) {
        self.repositories.insert(repository);
    }
}

#[derive(Clone)]
pub struct HandlerContext {
    pub user_auth: Auth,
}

/// Per-request context: shared state plus the caller's session.
#[derive(Clone)]
pub struct Context(pub Arc<ServiceState>, pub HandlerContext);

impl Context {
    pub fn new(state: Arc<ServiceState>, user_auth: Auth) -> Self {
        Context(state, HandlerContext { user_auth })
    }

    pub fn auth(&self) -> Auth {
        self.1.user_auth
    }

    pub fn try_get_repository<T: 'static>(&self) -> error::Result<RepositoryObject<T>> {
        self.0
            .repositories
            .get::<RepositoryObject<T>>()
            .cloned()
            .ok_or(
                anyhow!(
                    "Repository for type {} not found",
                    std::any::type_name::<T>()
                )
                .code(500),
            )
    }

    pub fn try_get_repository_manual<T: 'static + Clone>(&self) -> error::Result<T> {
        self.0.repositories.get::<T>().cloned().ok_or(
            anyhow!("State entry {} not found", std::any::type_name::<T>()).code(500),
        )
    }
}

fn auth_from_request(req: &HttpRequest) -> error::Result<Auth> {
    let token = req
        .headers()
        .get("Authorization")
        .and_then(|x| x.to_str().ok())
        .and_then(|x| x.strip_prefix("Bearer ")); // remove prefix

    let Some(token) = token else {
        log::debug!("No authorization header provided");
        return Ok(Auth::None);
    };

    match Auth::from_token(token)? {
        Some(auth) => Ok(auth),
        None => Err(anyhow!("Not authorized, token expired").code(401)),
    }
}

impl FromRequest for Context {
    type Error = ServiceError;

    type Future = futures_util::future::LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        fn from_request_inner(req: &HttpRequest, _payload: &mut Payload) -> error::Result<Context> {
            let user_auth = auth_from_request(req)?;

            let Some(state) = req.app_data::<Data<Arc<ServiceState>>>() else {
                return Err(anyhow!("No state provided".to_string()).into());
            };

            Ok(Context::new(Arc::clone(state.get_ref()), user_auth))
        }
        let result = from_request_inner(req, payload);

        Box::pin(async move { result })
    }
}
