use std::path::Path;

use chrono::Duration;
use log::{error, info, warn};
use mongodb::Client as MongoClient;
use rocket::{
    fairing::{Fairing, Info, Kind},
    fs::FileServer,
    Build, Rocket,
};
use serde::Deserialize;

use crate::model::{mongodb::ensure_indexes_exist, seed::ensure_seeded, Store};

/// Application configuration, derived from `Rocket.toml` and `ROCKET_*`
/// environment variables. This struct becomes managed state and can be
/// inspected by any endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    // non-secrets
    auth_ttl: i64,
    admin_email: String,
    #[serde(default = "default_static_dir")]
    static_dir: String,
    // secrets
    jwt_secret: String,
    admin_password: String,
}

fn default_static_dir() -> String {
    "static".to_string()
}

impl Config {
    /// Valid lifetime of login sessions.
    pub fn auth_ttl(&self) -> Duration {
        Duration::seconds(self.auth_ttl)
    }

    /// Secret key used to sign session JWTs.
    pub fn jwt_secret(&self) -> &[u8] {
        self.jwt_secret.as_bytes()
    }

    /// Email of the account created on first launch.
    pub fn admin_email(&self) -> &str {
        &self.admin_email
    }

    /// Initial password of the admin account.
    pub fn admin_password(&self) -> &str {
        &self.admin_password
    }

    /// Directory served under `/static`.
    pub fn static_dir(&self) -> &str {
        &self.static_dir
    }

    /// Reject values that deserialize but cannot work.
    fn validate(&self) -> Result<(), String> {
        if self.auth_ttl <= 0 {
            return Err(format!("`auth_ttl` must be positive, got {}", self.auth_ttl));
        }
        if self.jwt_secret.is_empty() {
            return Err("`jwt_secret` must not be empty".to_string());
        }
        Ok(())
    }
}

/// A fairing that loads the application config and puts it in managed state.
/// This could easily be achieved using `AdHoc::config`, but is written out
/// explicitly for symmetry with the other fairings and control over error
/// messages.
pub struct ConfigFairing;

#[rocket::async_trait]
impl Fairing for ConfigFairing {
    fn info(&self) -> Info {
        Info {
            name: "Config",
            kind: Kind::Ignite,
        }
    }

    async fn on_ignite(&self, rocket: Rocket<Build>) -> rocket::fairing::Result {
        // Load the config.
        let config = match rocket.figment().extract::<Config>() {
            Ok(config) => config,
            Err(e) => {
                error!("Failed to load application config");
                rocket::config::pretty_print_error(e);
                return Err(rocket);
            }
        };
        if let Err(e) = config.validate() {
            error!("Invalid application config: {e}");
            return Err(rocket);
        }

        // Manage the state.
        Ok(rocket.manage(config))
    }
}

/// A fairing that serves the configured static directory under `/static`.
/// Must be attached after [`ConfigFairing`]. A missing directory is not an
/// error; nothing is served.
pub struct StaticFilesFairing;

#[rocket::async_trait]
impl Fairing for StaticFilesFairing {
    fn info(&self) -> Info {
        Info {
            name: "Static files",
            kind: Kind::Ignite,
        }
    }

    async fn on_ignite(&self, rocket: Rocket<Build>) -> rocket::fairing::Result {
        let Some(config) = rocket.state::<Config>() else {
            error!("Static files require the config fairing");
            return Err(rocket);
        };

        let dir = config.static_dir().to_string();
        if Path::new(&dir).is_dir() {
            info!("Serving static files from {dir}");
            Ok(rocket.mount("/static", FileServer::from(dir)))
        } else {
            warn!("Static directory {dir} not found, not serving /static");
            Ok(rocket)
        }
    }
}

/// Where the data lives.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    #[default]
    Mongodb,
    /// Lost on shutdown. Useful for demos and tests.
    Memory,
}

/// Configuration for the database.
#[derive(Debug, Deserialize)]
struct DbConfig {
    #[serde(default)]
    storage: StorageKind,
    #[serde(default = "default_db_name")]
    db_name: String,
    // secrets
    db_uri: Option<String>,
}

fn default_db_name() -> String {
    "campus_vote".to_string()
}

/// A fairing that loads the database config, connects to the database,
/// performs any setup necessary, and places a [`Store`] into managed state.
pub struct DatabaseFairing;

#[rocket::async_trait]
impl Fairing for DatabaseFairing {
    fn info(&self) -> Info {
        Info {
            name: "Database",
            kind: Kind::Ignite,
        }
    }

    async fn on_ignite(&self, rocket: Rocket<Build>) -> rocket::fairing::Result {
        // Load the config.
        let config = match rocket.figment().extract::<DbConfig>() {
            Ok(config) => config,
            Err(e) => {
                error!("Failed to load database config");
                rocket::config::pretty_print_error(e);
                return Err(rocket);
            }
        };

        let store = match config.storage {
            StorageKind::Memory => {
                info!("Using in-memory storage; data will not survive a restart");
                Store::memory()
            }
            StorageKind::Mongodb => {
                let Some(db_uri) = config.db_uri else {
                    error!("`db_uri` must be set when `storage` is \"mongodb\"");
                    return Err(rocket);
                };
                info!("Loaded database config, connecting...");
                // Construct the connection.
                let client = match MongoClient::with_uri_str(db_uri).await {
                    Ok(client) => client,
                    Err(e) => {
                        error!("Failed to connect to database: {e}");
                        return Err(rocket);
                    }
                };
                let db = client.database(&config.db_name);

                // Ensure the required indexes exist.
                if let Err(e) = ensure_indexes_exist(&db).await {
                    error!("Failed to create database indexes: {e}");
                    return Err(rocket);
                }
                info!("...database connection online!");
                Store::mongodb(&db)
            }
        };

        // Manage the state.
        Ok(rocket.manage(store))
    }
}

/// A fairing that seeds the store on first launch. Must be attached after
/// [`ConfigFairing`] and [`DatabaseFairing`].
pub struct SeedFairing;

#[rocket::async_trait]
impl Fairing for SeedFairing {
    fn info(&self) -> Info {
        Info {
            name: "Seed data",
            kind: Kind::Ignite,
        }
    }

    async fn on_ignite(&self, rocket: Rocket<Build>) -> rocket::fairing::Result {
        let (Some(config), Some(store)) = (rocket.state::<Config>(), rocket.state::<Store>())
        else {
            error!("Seeding requires the config and database fairings");
            return Err(rocket);
        };

        if let Err(e) = ensure_seeded(store, config).await {
            error!("Failed to seed database: {e}");
            return Err(rocket);
        }
        Ok(rocket)
    }
}

/// Example data for tests.
#[cfg(test)]
mod examples {
    use super::*;

    impl Config {
        pub fn example() -> Self {
            Self {
                auth_ttl: 3600,
                admin_email: "admin@campus.id".to_string(),
                static_dir: default_static_dir(),
                jwt_secret: "test-only-jwt-secret".to_string(),
                admin_password: "admin123".to_string(),
            }
        }

        pub fn with_auth_ttl(self, seconds: i64) -> Self {
            Self {
                auth_ttl: seconds,
                ..self
            }
        }

        pub fn with_jwt_secret(self, secret: &str) -> Self {
            Self {
                jwt_secret: secret.to_string(),
                ..self
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use rocket::{
        error::ErrorKind,
        figment::Figment,
        http::{ContentType, Status},
        local::asynchronous::Client,
    };

    use super::*;

    /// Deliberately ignores `Rocket.toml`.
    fn figment() -> Figment {
        Figment::from(rocket::Config::default())
            .merge(("log_level", "off"))
            .merge(("auth_ttl", 60))
            .merge(("admin_email", "root@campus.id"))
            .merge(("admin_password", "hunter22"))
            .merge(("jwt_secret", "secret"))
            .merge(("storage", "memory"))
    }

    #[rocket::async_test]
    async fn config_and_seed_fairings_manage_state() {
        let rocket = rocket::custom(figment())
            .attach(ConfigFairing)
            .attach(DatabaseFairing)
            .attach(SeedFairing)
            .ignite()
            .await
            .unwrap();

        let config = rocket.state::<Config>().unwrap();
        assert_eq!("root@campus.id", config.admin_email());
        assert_eq!(60, config.auth_ttl().num_seconds());
        assert_eq!("static", config.static_dir());

        let store = rocket.state::<Store>().unwrap();
        assert_eq!(6, store.candidates.count().await.unwrap());
        assert!(store
            .users
            .find_by_email("root@campus.id")
            .await
            .unwrap()
            .is_some());
    }

    #[rocket::async_test]
    async fn static_directory_is_served_when_present() {
        let rocket = rocket::custom(figment())
            .attach(ConfigFairing)
            .attach(StaticFilesFairing);
        let client = Client::tracked(rocket).await.unwrap();
        let response = client.get("/static/css/style.css").dispatch().await;
        assert_eq!(Status::Ok, response.status());
        assert_eq!(Some(ContentType::CSS), response.content_type());

        let figment = figment().merge(("static_dir", "no/such/dir"));
        let rocket = rocket::custom(figment)
            .attach(ConfigFairing)
            .attach(StaticFilesFairing);
        let client = Client::tracked(rocket).await.unwrap();
        let response = client.get("/static/css/style.css").dispatch().await;
        assert_eq!(Status::NotFound, response.status());
    }

    #[rocket::async_test]
    async fn missing_secret_aborts_ignition() {
        let figment = figment().merge(("jwt_secret", ""));
        let err = rocket::custom(figment)
            .attach(ConfigFairing)
            .ignite()
            .await
            .unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::FailedFairings(_)));
    }

    #[rocket::async_test]
    async fn mongodb_storage_requires_uri() {
        let figment = figment().merge(("storage", "mongodb"));
        let err = rocket::custom(figment)
            .attach(DatabaseFairing)
            .ignite()
            .await
            .unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::FailedFairings(_)));
    }
}
