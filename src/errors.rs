use http::StatusCode;
use thiserror::Error;
use worker::Error as WorkerError;

/// Failures the gateway turns into HTTP error responses.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Bad request: path does not name a supported audio object")]
    BadPath,
    #[error("Not found: {key}")]
    NotFound { key: String },
    #[error("Method not allowed: {method}")]
    MethodNotAllowed { method: String },
    #[error("Range not satisfiable for object of {size} bytes")]
    RangeNotSatisfiable { size: u64 },
    #[error("Backing store unavailable: {0}")]
    StoreUnavailable(String),
}

pub type AppResult<T> = std::result::Result<T, AppError>;

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadPath => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
            AppError::RangeNotSatisfiable { .. } => StatusCode::RANGE_NOT_SATISFIABLE,
            AppError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// Short plain-text body sent to the client. Store details stay in the logs.
    pub fn public_message(&self) -> &'static str {
        match self {
            AppError::BadPath => "Bad Request",
            AppError::NotFound { .. } => "Not Found",
            AppError::MethodNotAllowed { .. } => "Method Not Allowed",
            AppError::RangeNotSatisfiable { .. } => "Range Not Satisfiable",
            AppError::StoreUnavailable(_) => "Service Unavailable",
        }
    }
}

// Every worker-side failure while talking to R2 is a store failure, never a miss.
impl From<WorkerError> for AppError {
    fn from(error: WorkerError) -> Self {
        AppError::StoreUnavailable(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_follow_taxonomy() {
        assert_eq!(AppError::BadPath.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            AppError::NotFound { key: "a.mp3".into() }.status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::MethodNotAllowed { method: "POST".into() }.status(),
            StatusCode::METHOD_NOT_ALLOWED
        );
        assert_eq!(
            AppError::RangeNotSatisfiable { size: 10 }.status(),
            StatusCode::RANGE_NOT_SATISFIABLE
        );
        assert_eq!(
            AppError::StoreUnavailable("timeout".into()).status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn worker_errors_are_store_failures() {
        let err: AppError = WorkerError::RustError("connection reset".into()).into();
        assert!(matches!(err, AppError::StoreUnavailable(ref msg) if msg.contains("connection reset")));
        assert_eq!(err.public_message(), "Service Unavailable");
    }
}
