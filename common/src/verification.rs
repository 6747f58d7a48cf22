use anyhow::Context as _;
use futures_util::{Stream, StreamExt};
use mongodb::options::FindOptions;
use serde::de::DeserializeOwned;

/// How much of a collection is decoded at boot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Depth {
    /// Only the first stored document.
    Sample,
    /// Every stored document.
    Full,
}

async fn count_decoded<T, S>(mut documents: S) -> anyhow::Result<usize>
where
    S: Stream<Item = mongodb::error::Result<T>> + Unpin,
{
    let mut decoded = 0;
    while let Some(document) = documents.next().await {
        document.with_context(|| format!("document #{} does not decode", decoded + 1))?;
        decoded += 1;
    }
    Ok(decoded)
}

/// Decodes stored documents at startup so schema drift fails the boot
/// instead of the first request. Returns how many documents were read.
pub async fn verify<T: DeserializeOwned + Unpin + Send + Sync>(
    mongo_uri: &str,
    database: &str,
    collection: &str,
    depth: Depth,
) -> anyhow::Result<usize> {
    let client = mongodb::Client::with_uri_str(mongo_uri).await?;
    let collection = client.database(database).collection::<T>(collection);

    let options = match depth {
        Depth::Sample => FindOptions::builder().limit(1).build(),
        Depth::Full => FindOptions::default(),
    };
    let cursor = collection.find(None, options).await?;

    count_decoded(cursor)
        .await
        .with_context(|| format!("{}.{}", database, collection.name()))
}
