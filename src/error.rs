//! Error taxonomy shared by the mutation service and the client cache.

use serde::{Deserialize, Serialize};

/// Caller-inspectable failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    InvalidInput,
    InvalidReference,
    Unauthenticated,
    Forbidden,
    NotFound,
    Unexpected,
}

impl ErrorKind {
    /// HTTP-style status code carried by error responses.
    pub fn status_code(self) -> u16 {
        match self {
            ErrorKind::InvalidInput | ErrorKind::InvalidReference => 400,
            ErrorKind::Unauthenticated => 401,
            ErrorKind::Forbidden => 403,
            ErrorKind::NotFound => 404,
            ErrorKind::Unexpected => 500,
        }
    }

    /// Whether the failure means "you may not do this" rather than "something broke".
    pub fn is_permission_denial(self) -> bool {
        matches!(self, ErrorKind::Forbidden | ErrorKind::Unauthenticated)
    }
}

/// Errors returned by [`crate::service::TrackerService`].
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid reference: {0}")]
    InvalidReference(String),

    #[error("Caller identity is missing")]
    Unauthenticated,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unexpected error: {0}")]
    Unexpected(#[from] anyhow::Error),
}

impl ServiceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ServiceError::InvalidInput(_) => ErrorKind::InvalidInput,
            ServiceError::InvalidReference(_) => ErrorKind::InvalidReference,
            ServiceError::Unauthenticated => ErrorKind::Unauthenticated,
            ServiceError::Forbidden(_) => ErrorKind::Forbidden,
            ServiceError::NotFound(_) => ErrorKind::NotFound,
            ServiceError::Unexpected(_) => ErrorKind::Unexpected,
        }
    }

    pub fn status_code(&self) -> u16 {
        self.kind().status_code()
    }
}

impl From<sea_orm::DbErr> for ServiceError {
    fn from(err: sea_orm::DbErr) -> Self {
        ServiceError::Unexpected(err.into())
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;
