use rand::Rng;
use rocket::{serde::json::Value, FromForm};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::db::{normalize_email, NewUser};

/// The login form. Missing fields are treated as empty.
#[derive(Debug, Default, FromForm)]
pub struct LoginForm {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// The registration form, as submitted. Validated into a [`Registration`].
#[derive(Debug, Default, FromForm)]
pub struct RegisterForm {
    pub email: Option<String>,
    pub name: Option<String>,
    pub password: Option<String>,
}

/// Validated registration details. The password is still in plaintext, so
/// this is never stored directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    email: String,
    name: String,
    password: String,
}

impl Registration {
    /// Normalise the email, trim the name, and reject any empty field.
    /// The password is taken as-is.
    pub fn new(email: &str, name: &str, password: &str) -> Result<Self> {
        let email = normalize_email(email);
        let name = name.trim().to_string();
        if email.is_empty() || name.is_empty() || password.is_empty() {
            return Err(Error::validation("Please fill in every field."));
        }
        Ok(Self {
            email,
            name,
            password: password.to_string(),
        })
    }

    pub fn email(&self) -> &str {
        &self.email
    }
}

impl TryFrom<Registration> for NewUser {
    type Error = Error;

    /// Convert a [`Registration`] to a new user by hashing the password.
    fn try_from(reg: Registration) -> Result<Self> {
        // 16 bytes is recommended for password hashing:
        //  https://en.wikipedia.org/wiki/Argon2
        let mut salt = [0_u8; 16];
        rand::thread_rng().fill(&mut salt);
        let password_hash =
            argon2::hash_encoded(reg.password.as_bytes(), &salt, &argon2::Config::default())?;
        Ok(Self {
            email: reg.email,
            name: reg.name,
            password_hash,
            created_at: chrono::Utc::now(),
        })
    }
}

/// Body of a vote submission: `{"candidate_id": 3}`.
///
/// The ID is kept loosely typed so that a missing, null or malformed ID is
/// reported as invalid input rather than rejected by the JSON parser.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoteRequest {
    #[serde(default)]
    pub candidate_id: Option<Value>,
}

impl VoteRequest {
    /// The requested candidate ID, if it is a positive integer or a string
    /// holding one.
    pub fn candidate_id(&self) -> Option<u64> {
        let id = match self.candidate_id.as_ref()? {
            Value::Number(n) => n.as_u64()?,
            Value::String(s) => s.trim().parse().ok()?,
            _ => return None,
        };
        (id != 0).then_some(id)
    }
}
