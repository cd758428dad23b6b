//! The operations behind each route. Every function takes the [`Store`]
//! explicitly, plus the user it acts for where one is needed.
//!
//! [`Store`]: crate::model::Store

pub mod auth;
pub mod results;
pub mod voting;
