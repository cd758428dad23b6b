mod collection;
mod counter;
mod errors;

pub use collection::{ensure_indexes_exist, Coll, MongoCollection};
pub use counter::Counter;
pub use errors::{is_duplicate_key_error, DUPLICATE_KEY};
