use actix_web::{
    http::{header::ContentType, StatusCode},
    HttpResponse,
};
use serde_json::json;

/// Error surfaced to the HTTP boundary: an HTTP status code plus the cause.
///
/// 400 validation, 401 authentication, 403 forbidden, 404 not found,
/// 409 optimistic write conflict, 500 anything else.
#[derive(Debug)]
pub struct ServiceError {
    pub code: u16,
    err: anyhow::Error,
}

impl ServiceError {
    pub fn message(&self) -> String {
        self.err.to_string()
    }
}

impl std::fmt::Display for ServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "ServiceError({}): {}", self.code, self.err)
    }
}

impl actix_web::error::ResponseError for ServiceError {
    fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    fn error_response(&self) -> HttpResponse {
        if self.code >= 500 {
            log::error!("{}", self);
        }
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .body(json!({ "message": self.message() }).to_string())
    }
}

impl<E: Into<anyhow::Error>> From<E> for ServiceError {
    fn from(err: E) -> ServiceError {
        ServiceError {
            code: 500,
            err: err.into(),
        }
    }
}

pub trait AddCode {
    fn code(self, code: u16) -> ServiceError;
}

impl AddCode for anyhow::Error {
    fn code(self, code: u16) -> ServiceError {
        ServiceError { code, err: self }
    }
}

pub type Result<T> = std::result::Result<T, ServiceError>;
