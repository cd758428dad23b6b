use std::ops::Deref;

use log::debug;
use mongodb::{
    bson::doc, error::Error as DbError, options::IndexOptions, Collection, Database, IndexModel,
};

use crate::model::db::{Candidate, Sponsor, User, Vote};

use super::counter::Counter;

/// A type that can be directly inserted/read to/from the database.
pub trait MongoCollection {
    /// The name of the collection.
    const NAME: &'static str;
}

/// A database collection of the given type.
pub struct Coll<T>(Collection<T>);

impl<T> Coll<T>
where
    T: MongoCollection,
{
    /// Get a handle on this collection in the given database.
    pub fn from_db(db: &Database) -> Self {
        Self(db.collection(T::NAME))
    }
}

// `Derive(Clone)` would only derive if `T: Clone`, but we don't need that bound.
impl<T> Clone for Coll<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<T> Deref for Coll<T> {
    type Target = Collection<T>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl MongoCollection for User {
    const NAME: &'static str = "users";
}

impl MongoCollection for Candidate {
    const NAME: &'static str = "candidates";
}

impl MongoCollection for Sponsor {
    const NAME: &'static str = "sponsors";
}

impl MongoCollection for Vote {
    const NAME: &'static str = "votes";
}

impl MongoCollection for Counter {
    const NAME: &'static str = "counters";
}

/// Ensure that all the required indexes exist on the given database.
///
/// This operation is idempotent.
pub async fn ensure_indexes_exist(db: &Database) -> Result<(), DbError> {
    debug!("Ensuring collection indexes exist");

    let unique = IndexOptions::builder().unique(true).build();

    // One account per email address.
    let user_index = IndexModel::builder()
        .keys(doc! {"email": 1})
        .options(unique.clone())
        .build();
    Coll::<User>::from_db(db)
        .create_index(user_index, None)
        .await?;

    // One vote per user.
    let vote_index = IndexModel::builder()
        .keys(doc! {"user_id": 1})
        .options(unique)
        .build();
    Coll::<Vote>::from_db(db)
        .create_index(vote_index, None)
        .await?;

    // Tallying groups by candidate.
    let tally_index = IndexModel::builder()
        .keys(doc! {"candidate_id": 1})
        .build();
    Coll::<Vote>::from_db(db)
        .create_index(tally_index, None)
        .await?;

    Ok(())
}
