pub mod category;
pub mod issue;
pub mod report;
pub mod role;
pub mod user;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Display reference to a user, resolved from an id for admin and team views.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct UserRef {
    pub id: String,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct IssueRef {
    pub id: String,
    pub title: String,
}
