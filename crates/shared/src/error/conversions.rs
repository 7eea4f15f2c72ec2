//! Error conversions - From implementations for common error types
//!
//! Provides automatic conversion from common error types to [`AppError`].

use super::app_error::AppError;
use super::kind::ErrorKind;

// ============================================================================
// serde_json conversions
// ============================================================================

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_syntax() || err.is_data() || err.is_eof() {
            AppError::bad_request(format!("JSON parse error: {}", err)).with_source(err)
        } else {
            AppError::internal("JSON serialization error").with_source(err)
        }
    }
}

// ============================================================================
// http conversions
// ============================================================================

impl From<http::StatusCode> for AppError {
    fn from(status: http::StatusCode) -> Self {
        let kind = ErrorKind::from_status_code(status.as_u16())
            .unwrap_or(ErrorKind::InternalServerError);
        let reason = status.canonical_reason().unwrap_or(kind.as_str());
        AppError::new(kind, format!("Server responded {} {}", status.as_u16(), reason))
    }
}

// ============================================================================
// reqwest conversions (feature-gated)
// ============================================================================

#[cfg(feature = "reqwest")]
impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            let base = AppError::from(status);
            return AppError::new(base.kind(), base.message().to_string()).with_source(err);
        }
        if err.is_timeout() {
            AppError::new(ErrorKind::RequestTimeout, "Request timed out").with_source(err)
        } else if err.is_connect() {
            AppError::service_unavailable("Could not reach the server").with_source(err)
        } else if err.is_decode() {
            AppError::new(ErrorKind::BadGateway, "Malformed response body").with_source(err)
        } else {
            AppError::internal("HTTP client error").with_source(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let app_err: AppError = json_err.into();
        assert_eq!(app_err.kind(), ErrorKind::BadRequest);
    }

    #[test]
    fn test_status_conversion() {
        let app_err: AppError = http::StatusCode::UNAUTHORIZED.into();
        assert_eq!(app_err.kind(), ErrorKind::Unauthorized);
        assert_eq!(app_err.message(), "Server responded 401 Unauthorized");

        let app_err: AppError = http::StatusCode::IM_A_TEAPOT.into();
        assert_eq!(app_err.kind(), ErrorKind::BadRequest);
    }
}
