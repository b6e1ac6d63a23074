use chrono::Duration;
use chrono::Local;
use hmac::{Hmac, Mac};
use jwt::SignWithKey;
use jwt::VerifyWithKey;
use log::warn;
use serde::Deserialize;
use serde::Serialize;
use sha2::Sha256;

use crate::constants::SESSION_LIFETIME_HOURS;
use crate::database::schema::{Id, User};
use crate::error::{ActionError, QueryError};

use super::permissions::Viewer;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct SessionData {
    pub user_id: Id,
    pub username: String,
    iat: i64,
    exp: i64,
}

impl SessionData {
    pub fn new(id: Id, username: String) -> Self {
        let now = Local::now();
        let iat = now.timestamp();
        let exp = (now + Duration::hours(SESSION_LIFETIME_HOURS)).timestamp();

        Self {
            user_id: id,
            username,
            iat,
            exp,
        }
    }

    pub fn is_expired(&self) -> bool {
        (self.exp - Local::now().timestamp()).is_negative()
    }

    pub fn viewer(&self) -> Viewer {
        Viewer::User(self.user_id)
    }
}

/// Key and signing failures are server faults, never the client's.
fn session_fault(info: &str) -> ActionError {
    ActionError::Query(QueryError::new(info.to_owned()))
}

fn signing_key(secret: &str) -> Result<Hmac<Sha256>, ActionError> {
    Hmac::new_from_slice(secret.as_bytes()).map_err(|_| session_fault("Invalid session secret"))
}

pub fn generate_jwt_session(user: &User, secret: &str) -> Result<String, ActionError> {
    let key = signing_key(secret)?;
    let claims = SessionData::new(user.id, user.username.to_owned());

    claims
        .sign_with_key(&key)
        .map_err(|_| session_fault("Could not sign session"))
}

pub fn verify_jwt_session(token: &str, secret: &str) -> Result<SessionData, ActionError> {
    let key = signing_key(secret)?;

    let session: SessionData = token.verify_with_key(&key).map_err(|e| {
        warn!("Rejected session token: {e}");
        ActionError::Unauthenticated
    })?;

    if session.is_expired() {
        warn!("Rejected expired session of user {}", session.user_id);
        return Err(ActionError::Unauthenticated);
    }

    Ok(session)
}
