use thiserror::Error;

/// Classified outcome of one API exchange.
///
/// The status code rides on the error value itself, so callers branch with
/// [`ApiError::status`] instead of re-parsing a stringified payload.
#[derive(Error, Debug)]
pub enum ApiError {
    /// The exchange itself could not be completed (DNS, connection reset,
    /// timeout). Never retried automatically.
    #[error("request could not be completed: {0}")]
    Transport(#[source] reqwest::Error),

    /// A response arrived, but its status was outside {200, 202}. Carries
    /// the raw body verbatim, even when the body is itself a JSON error
    /// payload from the server.
    #[error("request replied with status code {status}: {body}")]
    Status { status: u16, body: String },

    /// A successful body did not match the shape the operation declares
    /// (e.g. a list endpoint replied with something other than an array).
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("configuration error: {0}")]
    Config(String),
}

impl ApiError {
    /// Numeric status code for HTTP failures, `None` for everything else.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_accessor_only_on_http_failures() {
        let err = ApiError::Status {
            status: 404,
            body: r#"{"statusCode":404}"#.to_string(),
        };
        assert_eq!(err.status(), Some(404));

        let err = ApiError::Config("API_URL not set".to_string());
        assert_eq!(err.status(), None);
    }

    #[test]
    fn status_display_carries_code_and_body() {
        let err = ApiError::Status {
            status: 500,
            body: "internal".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "request replied with status code 500: internal"
        );
    }
}
