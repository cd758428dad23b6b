use argon2::Error as Argon2Error;
use jsonwebtoken::errors::{Error as JwtError, ErrorKind as JwtErrorKind};
use log::{debug, error};
use mongodb::{bson::de::Error as BsonError, error::Error as DbError};
use rocket::{
    http::{Status, StatusClass},
    response::{self, Responder},
    serde::json::Json,
    Request,
};
use thiserror::Error;

use crate::logging::RequestId;
use crate::model::{api::reply::ApiReply, mongodb::is_duplicate_key_error};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Db(#[from] DbError),
    #[error(transparent)]
    Bson(#[from] BsonError),
    #[error(transparent)]
    Jwt(#[from] JwtError),
    #[error(transparent)]
    Argon2(#[from] Argon2Error),
    #[error("{0}")]
    Validation(String),
    #[error("Email already registered: {0}")]
    DuplicateEmail(String),
    #[error("Incorrect email or password.")]
    Auth,
    #[error("You have already voted.")]
    AlreadyVoted,
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Login required.")]
    Unauthorized,
    #[error("{0} is not managed by Rocket")]
    Unmanaged(&'static str),
    /// A uniqueness constraint rejected a write. Raised by stores that
    /// enforce constraints themselves rather than through the database.
    #[error("Duplicate value for unique field `{0}`")]
    Duplicate(&'static str),
}

impl Error {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    /// Did this error come from a uniqueness constraint, in whichever store?
    pub fn is_duplicate_key(&self) -> bool {
        match self {
            Self::Duplicate(_) => true,
            Self::Db(err) => is_duplicate_key_error(err),
            _ => false,
        }
    }

    /// The HTTP status this error maps to.
    pub fn status(&self) -> Status {
        match self {
            Self::Validation(_) => Status::BadRequest,
            Self::DuplicateEmail(_) | Self::AlreadyVoted | Self::Duplicate(_) => Status::Conflict,
            Self::Auth | Self::Unauthorized => Status::Unauthorized,
            Self::NotFound(_) => Status::NotFound,
            Self::Db(_) | Self::Bson(_) | Self::Argon2(_) | Self::Unmanaged(_) => {
                Status::InternalServerError
            },
            Self::Jwt(err) => match err.kind() {
                JwtErrorKind::ExpiredSignature | JwtErrorKind::ImmatureSignature => {
                    Status::Unauthorized
                }
                _ => Status::BadRequest,
            },
        }
    }
}

impl<'r, 'o: 'r> Responder<'r, 'o> for Error {
    fn respond_to(self, req: &'r Request<'_>) -> response::Result<'o> {
        let status = self.status();
        let id = req.local_cache(RequestId::next);
        let message = if status.class() == StatusClass::ServerError {
            error!("req{id} failed: {self}");
            "Internal server error.".to_string()
        } else {
            debug!("req{id} rejected: {self}");
            self.to_string()
        };
        (status, Json(ApiReply::failure(message))).respond_to(req)
    }
}
