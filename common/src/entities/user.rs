use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    default_timestamp,
    entities::{category::Category, role::Role, UserRef},
    repository::Entity,
};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: ObjectId,
    pub name: String,
    pub email: String,
    /// Hex SHA-256 digest of `password + salt`.
    pub password: String,
    pub salt: String,
    pub role: Role,
    #[serde(default)]
    pub category: Option<Category>,
    #[serde(default = "default_timestamp")]
    pub created_at: i64,
    #[serde(default = "default_timestamp")]
    pub last_modified: i64,
}

impl Entity for User {
    fn id(&self) -> ObjectId {
        self.id
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct PublicUser {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub category: Option<Category>,
    pub created_at: i64,
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        PublicUser {
            id: user.id.to_hex(),
            name: user.name,
            email: user.email,
            role: user.role,
            category: user.category,
            created_at: user.created_at,
        }
    }
}

impl From<&User> for UserRef {
    fn from(user: &User) -> Self {
        UserRef {
            id: user.id.to_hex(),
            name: user.name.clone(),
            email: user.email.clone(),
        }
    }
}
