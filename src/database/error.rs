use std::fmt::{self, Display};

use thiserror::Error;
use warp::http::StatusCode;

/// Every failure an action can surface to its caller.
///
/// None of these are retried. A recipe write that fails with any variant has
/// rolled back entirely before the error is returned.
#[derive(Error, Debug)]
pub enum ActionError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    /// The membership or follow edge being removed doesn't exist.
    #[error("{0}")]
    Absent(String),

    #[error("{0}")]
    InvalidOperation(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("Authentication required")]
    Unauthenticated,

    #[error("{0}")]
    Query(#[from] QueryError),
}

impl ActionError {
    pub fn validation(info: impl Into<String>) -> Self {
        Self::Validation(info.into())
    }

    pub fn not_found(info: impl Into<String>) -> Self {
        Self::NotFound(info.into())
    }

    pub fn conflict(info: impl Into<String>) -> Self {
        Self::Conflict(info.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ActionError::Validation(_)
            | ActionError::Conflict(_)
            | ActionError::Absent(_)
            | ActionError::InvalidOperation(_) => StatusCode::BAD_REQUEST,
            ActionError::NotFound(_) => StatusCode::NOT_FOUND,
            ActionError::Forbidden(_) => StatusCode::FORBIDDEN,
            ActionError::Unauthenticated => StatusCode::UNAUTHORIZED,
            ActionError::Query(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Constraint violations reported by the storage layer are client errors;
/// anything else is an internal query failure.
impl From<sqlx::Error> for ActionError {
    fn from(value: sqlx::Error) -> Self {
        if let sqlx::Error::Database(e) = &value {
            if e.is_unique_violation() {
                return Self::Conflict(format!("Already exists ({})", e.message()));
            }
            if e.is_foreign_key_violation() {
                return Self::NotFound(format!("Referenced row doesn't exist ({})", e.message()));
            }
            if e.is_check_violation() {
                return Self::Validation(format!("Invalid value ({})", e.message()));
            }
        }

        Self::Query(QueryError::from(value))
    }
}

impl From<TypeError> for ActionError {
    fn from(value: TypeError) -> Self {
        Self::Validation(value.info)
    }
}

impl Into<potion::Error> for ActionError {
    fn into(self) -> potion::Error {
        let code = match &self {
            ActionError::Validation(_)
            | ActionError::Conflict(_)
            | ActionError::Absent(_)
            | ActionError::InvalidOperation(_) => 400,
            ActionError::NotFound(_) => 404,
            ActionError::Forbidden(_) => 403,
            ActionError::Unauthenticated => 401,
            ActionError::Query(_) => 500,
        };

        potion::Error {
            code,
            info: Some(self.to_string()),
            redirect: None,
        }
    }
}

#[derive(Debug)]
pub struct QueryError {
    info: String,
}

impl QueryError {
    pub fn new(info: String) -> Self {
        Self { info }
    }
}

impl From<sqlx::Error> for QueryError {
    fn from(value: sqlx::Error) -> Self {
        match value {
            sqlx::Error::Database(e) => Self::new(format!("{e}")),
            sqlx::Error::RowNotFound => Self::new(format!("RowNotFound")),
            sqlx::Error::ColumnNotFound(e) => Self::new(format!("Column not found: {e}")),
            sqlx::Error::ColumnDecode { index, source } => {
                Self::new(format!("Column decode {index} ({source})"))
            }
            sqlx::Error::PoolTimedOut => Self::new(format!("Pool timed out")),
            sqlx::Error::PoolClosed => Self::new(format!("Pool closed")),
            sqlx::Error::Migrate(e) => Self::new(format!("{e}")),
            e => Self::new(format!("{e}")),
        }
    }
}

impl Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Query failed ({})", self.info)
    }
}

impl std::error::Error for QueryError {}

impl Into<potion::Error> for QueryError {
    fn into(self) -> potion::Error {
        potion::Error {
            code: 500,
            info: Some(self.info),
            redirect: None,
        }
    }
}

#[derive(Debug)]
pub struct TypeError {
    info: String,
}

impl TypeError {
    pub fn new(info: &str) -> Self {
        Self {
            info: info.to_string(),
        }
    }
}

impl Display for TypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({})", self.info)
    }
}

impl std::error::Error for TypeError {}
