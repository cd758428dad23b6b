use mongodb::{
    bson::doc,
    options::{FindOneAndUpdateOptions, ReturnDocument},
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::mongodb::Coll;

/// A counter object used to implement auto-increment fields.
///
/// Each collection with integer IDs has one counter, keyed by the
/// collection name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Counter {
    #[serde(rename = "_id")]
    pub id: String,
    /// The last value handed out.
    pub last: u32,
}

impl Counter {
    /// Atomically retrieve the next value of the counter with the given ID.
    ///
    /// Counters are created on first use, so the first value is 1.
    pub async fn next(counters: &Coll<Counter>, id: &str) -> Result<u32> {
        let update = doc! {
            "$inc": { "last": 1 }
        };
        let options = FindOneAndUpdateOptions::builder()
            .upsert(true)
            .return_document(ReturnDocument::After)
            .build();
        let counter = counters
            .find_one_and_update(doc! { "_id": id }, update, options)
            .await?
            .ok_or_else(|| Error::not_found(format!("Counter with ID '{id}'")))?;
        Ok(counter.last)
    }
}
