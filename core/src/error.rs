use anyhow::anyhow;
use sea_orm::TransactionError as SeaTransactionError;
use thiserror::Error;

// ---------- SeaORM transaction error conversions ----------

impl From<SeaTransactionError<PersistDbError>> for PersistDbError {
    fn from(err: SeaTransactionError<PersistDbError>) -> Self {
        match err {
            SeaTransactionError::Connection(db_err) => PersistDbError::DatabaseFailure(db_err),
            SeaTransactionError::Transaction(inner) => inner,
        }
    }
}

// ---------- Domain/Layer error types ----------

/// Reasons a token operation is rejected. All of them surface as 401.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("invalid token")]
    InvalidToken,

    #[error("refresh token does not match the active session")]
    TokenMismatch,

    #[error("access and refresh tokens are both expired")]
    BothExpired,

    #[error("access token has not expired yet")]
    WrongApproach,

    #[error("invalid email or password")]
    InvalidLogin,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExternalServiceError {
    #[error("external api rejected the service key")]
    InvalidCredentials,

    #[error("external api failure: {0}")]
    Unknown(String),
}

#[derive(Debug, Error)]
pub enum PersistDbError {
    #[error("Database operation failed: {0}")]
    DatabaseFailure(#[from] sea_orm::DbErr),

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("User already exists: {0}")]
    DuplicateUser(String),

    #[error("invariant violation: {0}")]
    InvariantViolation(String),
}

#[derive(Debug, Error)]
pub enum SessionStoreError {
    #[error("session backend failure: {0}")]
    Backend(#[from] redis::RedisError),
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("invalid parameters: {0}")]
    InvalidParams(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("unauthorized: {0}")]
    Auth(#[from] AuthError),

    #[error(transparent)]
    External(#[from] ExternalServiceError),

    #[error("database error: {0}")]
    Db(PersistDbError),

    #[error(transparent)]
    Session(#[from] SessionStoreError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl ServiceError {
    /// True for every failure a controller should answer with 401.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ServiceError::Auth(_))
    }

    pub fn auth_kind(&self) -> Option<AuthError> {
        match self {
            ServiceError::Auth(kind) => Some(*kind),
            _ => None,
        }
    }
}

impl From<PersistDbError> for ServiceError {
    fn from(e: PersistDbError) -> Self {
        match e {
            PersistDbError::UserNotFound(_) => ServiceError::Auth(AuthError::InvalidLogin),
            PersistDbError::DuplicateUser(email) => {
                ServiceError::Conflict(format!("user {email} already exists"))
            }
            PersistDbError::InvariantViolation(msg) => ServiceError::Other(anyhow!(msg)),
            PersistDbError::DatabaseFailure(e) => {
                ServiceError::Db(PersistDbError::DatabaseFailure(e))
            }
        }
    }
}
