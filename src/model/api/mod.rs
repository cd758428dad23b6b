//! API-friendly types: what routes receive and send.

pub mod auth;
pub mod forms;
pub mod reply;
pub mod results;
