pub mod mongo_repository;
pub mod test_repository;

use std::sync::Arc;

use async_trait::async_trait;
use mongodb::bson::{oid::ObjectId, Bson, Document};

use crate::error;

pub trait Entity {
    fn id(&self) -> ObjectId;
}

#[async_trait]
pub trait Repository<T: Send + Sync>: Send + Sync {
    /// Returns `false` when an entity with the same id (or unique key) exists.
    async fn insert(&self, item: &T) -> error::Result<bool>;
    async fn find(&self, field: &str, value: &Bson) -> error::Result<Option<T>>;
    async fn find_many(&self, field: &str, value: &Bson) -> error::Result<Vec<T>>;
    async fn find_all(&self, skip: u32, limit: u32) -> error::Result<Vec<T>>;
    async fn find_all_by_ids(&self, field: &str, ids: Vec<ObjectId>) -> error::Result<Vec<T>>;
    /// Replaces the single document matching every key of `filter`.
    /// Returns `false` if nothing matched.
    async fn update_one(&self, filter: Document, item: &T) -> error::Result<bool>;
    async fn delete(&self, field: &str, id: &ObjectId) -> error::Result<Option<T>>;
}

pub type RepositoryObject<T> = Arc<dyn Repository<T>>;
