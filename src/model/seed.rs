//! First-launch data: the admin account, candidates and sponsors.

use log::info;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::model::{
    db::{normalize_email, CandidateCore, NewCandidate, NewSponsor, SponsorCore},
    Store,
};
use crate::service::auth::register;

const ADMIN_NAME: &str = "Admin";

/// The candidates on the ballot.
pub fn default_candidates() -> Vec<NewCandidate> {
    vec![
        CandidateCore::new("Rian Saputera", "Teknik Informatika", "/static/img/1.jpg"),
        CandidateCore::new("Bima Saputra", "Manajemen", "/static/img/2.jpg"),
        CandidateCore::new("Citra Lestari", "Desain Komunikasi Visual", "/static/img/3.jpg"),
        CandidateCore::new("Alya Pratama", "Teknik Informatika", "/static/img/4.jpg"),
        CandidateCore::new("wahyuu huda", "Manajemen", "/static/img/5.jpg"),
        CandidateCore::new("Chily ", "Desain Komunikasi Visual", "/static/img/6.jpg"),
    ]
}

pub fn default_sponsors() -> Vec<NewSponsor> {
    vec![
        SponsorCore::new("TechCorp", "/static/img/s1.png"),
        SponsorCore::new("EduPlus", "/static/img/s2.jpg"),
        SponsorCore::new("DesignHub", "/static/img/s3.png"),
        SponsorCore::new("DesignH2ub", "/static/img/s3.png"),
    ]
}

/// Ensure there is an admin account with the given credentials.
///
/// An existing account with that email is left untouched.
pub async fn ensure_admin_exists(store: &Store, email: &str, password: &str) -> Result<()> {
    if store
        .users
        .find_by_email(&normalize_email(email))
        .await?
        .is_some()
    {
        return Ok(());
    }
    match register(store, email, ADMIN_NAME, password).await {
        Ok(admin) => {
            info!("Created admin account <{}>", admin.email);
            Ok(())
        }
        // Another instance seeded it first.
        Err(Error::DuplicateEmail(_)) => Ok(()),
        Err(e) => Err(e),
    }
}

/// Seed an empty store. Each collection is only filled if it is empty, so
/// this is idempotent.
pub async fn ensure_seeded(store: &Store, config: &Config) -> Result<()> {
    ensure_admin_exists(store, config.admin_email(), config.admin_password()).await?;

    if store.candidates.count().await? == 0 {
        let candidates = default_candidates();
        info!("Seeding {} candidates", candidates.len());
        for candidate in candidates {
            store.candidates.insert(candidate).await?;
        }
    }

    if store.sponsors.count().await? == 0 {
        let sponsors = default_sponsors();
        info!("Seeding {} sponsors", sponsors.len());
        for sponsor in sponsors {
            store.sponsors.insert(sponsor).await?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::service::auth::login;

    #[rocket::async_test]
    async fn seeding_is_idempotent() {
        let store = Store::memory();
        let config = Config::example();

        ensure_seeded(&store, &config).await.unwrap();
        ensure_seeded(&store, &config).await.unwrap();

        assert_eq!(1, store.users.count().await.unwrap());
        assert_eq!(6, store.candidates.count().await.unwrap());
        assert_eq!(4, store.sponsors.count().await.unwrap());

        let names = store
            .candidates
            .all()
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.candidate.name)
            .collect::<Vec<_>>();
        assert_eq!("Rian Saputera", names[0]);
        assert_eq!("wahyuu huda", names[4]);
        assert_eq!("Chily ", names[5]);
    }

    #[rocket::async_test]
    async fn admin_can_log_in() {
        let store = Store::memory();
        let config = Config::example();
        ensure_seeded(&store, &config).await.unwrap();

        let admin = login(&store, config.admin_email(), config.admin_password())
            .await
            .unwrap();
        assert_eq!(ADMIN_NAME, admin.name);
    }

    #[rocket::async_test]
    async fn existing_candidates_are_kept() {
        let store = Store::memory();
        store
            .candidates
            .insert(CandidateCore::new("Only", "Physics", "/only.jpg"))
            .await
            .unwrap();

        ensure_seeded(&store, &Config::example()).await.unwrap();

        assert_eq!(1, store.candidates.count().await.unwrap());
        assert_eq!(4, store.sponsors.count().await.unwrap());
    }
}
