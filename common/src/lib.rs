pub mod access_rules;
pub mod auth;
pub mod constants;
pub mod context;
pub mod entities;
pub mod error;
pub mod repository;
pub mod retry;
pub mod services;
pub mod verification;

use chrono::Utc;
use mongodb::bson::oid::ObjectId;

use crate::error::AddCode;

pub fn default_timestamp() -> i64 {
    Utc::now().timestamp_micros()
}

pub fn parse_id(id: &str) -> error::Result<ObjectId> {
    id.parse::<ObjectId>()
        .map_err(|_| anyhow::anyhow!("Invalid id: {}", id).code(400))
}
