//! Maps service errors onto HTTP responses.
//!
//! Every failure is returned as `{"message": "..."}`. Client mistakes get a
//! 4xx status; upstream and unexpected failures are 500 with the original
//! message.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::Error;

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, Error>;

/// JSON error payload.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorBody {
    pub message: String,
}

fn status_for(err: &Error) -> StatusCode {
    if err.is_client_error() {
        return StatusCode::BAD_REQUEST;
    }
    match err {
        Error::NotFound(_) => StatusCode::NOT_FOUND,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self)
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            error!(error = %self, "request failed");
        }

        HttpResponse::build(status).json(ErrorBody {
            message: self.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Stage;

    #[test]
    fn test_client_errors_are_bad_request() {
        for err in [
            Error::InvalidUpload("too big".to_string()),
            Error::UnknownStyle("pixel".to_string()),
            Error::InvalidRequest("missing".to_string()),
        ] {
            assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
            assert!(err.is_client_error());
        }
    }

    #[test]
    fn test_not_found() {
        assert_eq!(
            Error::NotFound("image 3".to_string()).status_code(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_upstream_errors_are_internal() {
        let wrapped = Error::TransformationFailed {
            stage: Stage::Describe,
            source: Box::new(Error::AiProvider("timeout".to_string())),
        };
        for err in [
            Error::DescriptionUnavailable,
            Error::GenerationFailed,
            Error::Internal("record id overflow".to_string()),
            wrapped,
        ] {
            assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        }
    }
}
