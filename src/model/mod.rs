pub mod api;
pub mod db;
pub mod mongodb;
pub mod repo;
pub mod seed;

pub use repo::Store;
