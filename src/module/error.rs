use crate::error::ProtocolError;
use axum::http::StatusCode;

#[derive(Debug, Clone)]
pub struct AppError {
    pub status: StatusCode,
    pub code: &'static str,
    pub message: String,
}

impl AppError {
    pub fn bad_request(code: &'static str, message: impl Into<String>) -> Self {
        Self::with_status(StatusCode::BAD_REQUEST, code, message)
    }

    pub fn conflict(code: &'static str, message: impl Into<String>) -> Self {
        Self::with_status(StatusCode::CONFLICT, code, message)
    }

    pub fn unauthorized(code: &'static str, message: impl Into<String>) -> Self {
        Self::with_status(StatusCode::UNAUTHORIZED, code, message)
    }

    pub fn not_found(code: &'static str, message: impl Into<String>) -> Self {
        Self::with_status(StatusCode::NOT_FOUND, code, message)
    }

    pub fn unprocessable(code: &'static str, message: impl Into<String>) -> Self {
        Self::with_status(StatusCode::UNPROCESSABLE_ENTITY, code, message)
    }

    pub fn internal(code: &'static str, message: impl Into<String>) -> Self {
        Self::with_status(StatusCode::INTERNAL_SERVER_ERROR, code, message)
    }

    fn with_status(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }
}

impl From<ProtocolError> for AppError {
    fn from(err: ProtocolError) -> Self {
        let code = err.code();
        let message = err.to_string();
        match err {
            ProtocolError::DuplicateCommitment
            | ProtocolError::InvalidState { .. }
            | ProtocolError::JobAlreadyConsumed
            | ProtocolError::SnapshotConflict => Self::conflict(code, message),
            ProtocolError::Unauthorized { .. } => Self::unauthorized(code, message),
            ProtocolError::JobNotFound | ProtocolError::SnapshotNotFound => {
                Self::not_found(code, message)
            }
            ProtocolError::StoreUnavailable => Self::internal(code, message),
            ref e if e.is_correctness_violation() => Self::unprocessable(code, message),
            _ => Self::bad_request(code, message),
        }
    }
}
