use log::{info, warn};
use rocket::http::CookieJar;

use crate::error::{Error, Result};
use crate::model::{
    api::{auth::AuthToken, forms::Registration},
    db::{normalize_email, NewUser, User},
    Store,
};

/// Create an account.
///
/// Fails with [`Error::Validation`] if any field is empty, and with
/// [`Error::DuplicateEmail`] if the email (compared case-insensitively) is
/// already registered.
pub async fn register(store: &Store, email: &str, name: &str, password: &str) -> Result<User> {
    let registration = Registration::new(email, name, password)?;
    let email = registration.email().to_string();

    if store.users.find_by_email(&email).await?.is_some() {
        return Err(Error::DuplicateEmail(email));
    }

    let user: NewUser = registration.try_into()?;
    // The unique index catches a registration racing this one.
    let user = store.users.insert(user).await.map_err(|e| {
        if e.is_duplicate_key() {
            Error::DuplicateEmail(email.clone())
        } else {
            e
        }
    })?;
    info!("Registered user {} <{}>", user.id, user.email);
    Ok(user)
}

/// Check credentials, returning the user they belong to.
///
/// An unknown email and a wrong password fail identically, with
/// [`Error::Auth`].
pub async fn login(store: &Store, email: &str, password: &str) -> Result<User> {
    let email = normalize_email(email);
    let user = store
        .users
        .find_by_email(&email)
        .await?
        .filter(|user| user.verify_password(password))
        .ok_or_else(|| {
            warn!("Failed login for <{email}>");
            Error::Auth
        })?;
    info!("User {} logged in", user.id);
    Ok(user)
}

/// End the session held in the cookie jar.
pub fn logout(cookies: &CookieJar<'_>) {
    AuthToken::revoke(cookies);
}

/// Resolve a session to its user, if that user still exists.
pub async fn current_user(store: &Store, token: &AuthToken) -> Result<Option<User>> {
    store.users.find_by_id(token.user_id).await
}
