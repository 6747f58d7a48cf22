use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use mongodb::bson::{self, oid::ObjectId, Bson, Document};
use serde::{de::DeserializeOwned, Serialize};

use crate::error;

use super::{Entity, Repository};

/// In-memory repository keeping documents as BSON, so field lookups behave
/// like the Mongo-backed one.
pub struct TestRepository<T> {
    _t: std::marker::PhantomData<T>,
    pub db: Mutex<Vec<Document>>,
}

impl<T> Default for TestRepository<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TestRepository<T> {
    pub fn new() -> Self {
        Self {
            _t: std::marker::PhantomData,
            db: Mutex::new(Vec::new()),
        }
    }

    fn db(&self) -> error::Result<MutexGuard<'_, Vec<Document>>> {
        self.db
            .lock()
            .map_err(|_| anyhow::anyhow!("Test repository lock poisoned").into())
    }
}

fn matches(document: &Document, filter: &Document) -> bool {
    filter
        .iter()
        .all(|(key, value)| document.get(key) == Some(value))
}

fn decode<T: DeserializeOwned>(document: &Document) -> error::Result<T> {
    Ok(bson::from_document(document.clone())?)
}

#[async_trait]
impl<T> Repository<T> for TestRepository<T>
where
    T: Entity + Clone + Send + Sync + Serialize + DeserializeOwned,
{
    async fn insert(&self, item: &T) -> error::Result<bool> {
        let document = bson::to_document(item)?;
        let mut db = self.db()?;

        let id = Bson::ObjectId(item.id());
        let contains = db.iter().any(|x| x.get("id") == Some(&id));
        if !contains {
            db.push(document);
        }
        Ok(!contains)
    }

    async fn find(&self, field: &str, value: &Bson) -> error::Result<Option<T>> {
        let db = self.db()?;
        db.iter()
            .find(|x| x.get(field) == Some(value))
            .map(decode)
            .transpose()
    }

    async fn find_many(&self, field: &str, value: &Bson) -> error::Result<Vec<T>> {
        let db = self.db()?;
        db.iter()
            .filter(|x| x.get(field) == Some(value))
            .map(decode)
            .collect()
    }

    async fn find_all(&self, skip: u32, limit: u32) -> error::Result<Vec<T>> {
        let db = self.db()?;
        db.iter()
            .skip(skip as usize)
            .take(limit as usize)
            .map(decode)
            .collect()
    }

    async fn find_all_by_ids(&self, field: &str, ids: Vec<ObjectId>) -> error::Result<Vec<T>> {
        let db = self.db()?;
        db.iter()
            .filter(|x| x.get_object_id(field).map_or(false, |id| ids.contains(&id)))
            .map(decode)
            .collect()
    }

    async fn update_one(&self, filter: Document, item: &T) -> error::Result<bool> {
        let document = bson::to_document(item)?;
        let mut db = self.db()?;
        match db.iter_mut().find(|x| matches(x, &filter)) {
            Some(stored) => {
                *stored = document;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, field: &str, id: &ObjectId) -> error::Result<Option<T>> {
        let mut db = self.db()?;
        let Some(pos) = db
            .iter()
            .position(|x| x.get_object_id(field).ok().as_ref() == Some(id))
        else {
            return Ok(None);
        };
        decode(&db.remove(pos)).map(Some)
    }
}
