#[macro_use]
extern crate rocket;

#[cfg(test)]
#[macro_use]
extern crate backend_test;

use rocket::{Build, Rocket};

pub mod api;
pub mod config;
pub mod error;
pub mod logging;
pub mod model;
pub mod pages;
pub mod service;

pub use config::Config;

use config::{ConfigFairing, DatabaseFairing, SeedFairing, StaticFilesFairing};
use logging::LoggerFairing;

/// Build the server from `Rocket.toml` and the environment.
///
/// Configuration is only validated when the rocket ignites, by the fairings.
pub fn build() -> Rocket<Build> {
    rocket::build()
        .attach(LoggerFairing)
        .attach(ConfigFairing)
        .attach(StaticFilesFairing)
        .attach(DatabaseFairing)
        .attach(SeedFairing)
        .mount("/", api::routes())
        .register("/", api::catchers())
}

/// A rocket over the given store, ignoring `Rocket.toml`.
#[cfg(test)]
pub(crate) fn rocket_for_store(store: model::Store) -> Rocket<Build> {
    let figment = rocket::figment::Figment::from(rocket::Config::default())
        .merge(("log_level", "off"))
        .merge(("auth_ttl", 3600))
        .merge(("jwt_secret", "test-only-jwt-secret"))
        .merge(("admin_email", "admin@campus.id"))
        .merge(("admin_password", "admin123"));

    rocket::custom(figment)
        .attach(ConfigFairing)
        .manage(store)
        .mount("/", api::routes())
        .register("/", api::catchers())
}
