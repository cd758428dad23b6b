use chrono::{serde::ts_seconds, DateTime, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, TokenData, Validation};
use rocket::{
    http::{Cookie, CookieJar, SameSite, Status},
    outcome::{try_outcome, IntoOutcome},
    request::{FromRequest, Outcome},
    time::Duration,
    Request,
};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::model::{
    db::{User, UserId},
    Store,
};
use crate::service::auth::current_user;

pub const AUTH_TOKEN_COOKIE: &str = "auth_token";

/// A session: proof that the holder logged in as a specific user.
///
/// Nothing is stored server-side; the token is a signed JWT in a cookie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthToken {
    #[serde(rename = "uid")]
    pub user_id: UserId,
}

impl AuthToken {
    /// Create a new [`AuthToken`] for the given user.
    pub fn new(user: &User) -> Self {
        Self { user_id: user.id }
    }

    /// Serialize this token into a cookie.
    pub fn into_cookie(self, config: &Config) -> Result<Cookie<'static>> {
        let claims = Claims {
            token: self,
            expire_at: Utc::now() + config.auth_ttl(),
        };

        let token = jsonwebtoken::encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(config.jwt_secret()),
        )?;

        Ok(Cookie::build(AUTH_TOKEN_COOKIE, token)
            .max_age(Duration::seconds(config.auth_ttl().num_seconds()))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .finish())
    }

    /// Deserialize a token from a cookie, checking its signature and expiry.
    pub fn from_cookie(cookie: &Cookie<'_>, config: &Config) -> Result<Self> {
        let token = jsonwebtoken::decode(
            cookie.value(),
            &DecodingKey::from_secret(config.jwt_secret()),
            &Validation::default(),
        )
        .map(|claims: TokenData<Claims>| claims.claims.token)?;
        Ok(token)
    }

    /// End the session held in this cookie jar, if any.
    pub fn revoke(cookies: &CookieJar<'_>) {
        cookies.remove(Cookie::named(AUTH_TOKEN_COOKIE));
    }
}

/// Cookie claims: the token itself plus an expiry datetime.
#[derive(Serialize, Deserialize)]
struct Claims {
    #[serde(flatten)]
    token: AuthToken,
    #[serde(rename = "exp", with = "ts_seconds")]
    expire_at: DateTime<Utc>,
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for AuthToken {
    type Error = Error;

    /// Get an [`AuthToken`] from the cookie. Missing, expired or tampered
    /// tokens forward, so routes without a session can take over.
    async fn from_request(req: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let config = try_outcome!(req
            .rocket()
            .state::<Config>()
            .ok_or(Error::Unmanaged("Config"))
            .into_outcome(Status::InternalServerError));

        let cookie = try_outcome!(req.cookies().get(AUTH_TOKEN_COOKIE).or_forward(()));

        AuthToken::from_cookie(cookie, config).or_forward(())
    }
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for User {
    type Error = Error;

    /// Resolve the session to a user that still exists.
    async fn from_request(req: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let token = try_outcome!(req.guard::<AuthToken>().await);
        let store = try_outcome!(req
            .rocket()
            .state::<Store>()
            .ok_or(Error::Unmanaged("Store"))
            .into_outcome(Status::InternalServerError));

        match current_user(store, &token).await {
            Ok(Some(user)) => Outcome::Success(user),
            Ok(None) => Outcome::Forward(()),
            Err(e) => Outcome::Failure((Status::InternalServerError, e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::model::db::UserCore;

    fn config(auth_ttl: i64) -> Config {
        Config::example().with_auth_ttl(auth_ttl)
    }

    #[test]
    fn cookie_round_trips_user_id() {
        let config = config(60);
        let user = User {
            id: 7,
            user: UserCore::example(),
        };
        let cookie = AuthToken::new(&user).into_cookie(&config).unwrap();
        assert_eq!(AUTH_TOKEN_COOKIE, cookie.name());
        assert_eq!(Some(true), cookie.http_only());

        let token = AuthToken::from_cookie(&cookie, &config).unwrap();
        assert_eq!(7, token.user_id);
    }

    #[test]
    fn expired_cookie_is_rejected() {
        // Well beyond the default validation leeway.
        let config = config(-3600);
        let cookie = AuthToken { user_id: 1 }.into_cookie(&config).unwrap();
        let err = AuthToken::from_cookie(&cookie, &config).unwrap_err();
        assert_eq!(Status::Unauthorized, err.status());
    }

    #[test]
    fn cookie_signed_with_other_secret_is_rejected() {
        let config = config(60);
        let cookie = AuthToken { user_id: 1 }.into_cookie(&config).unwrap();
        let other = Config::example().with_jwt_secret("another secret");
        assert!(AuthToken::from_cookie(&cookie, &other).is_err());
    }
}
