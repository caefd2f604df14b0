use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single failure within a submitted batch, pointing at the index of the offending item.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct IndexedErrorItem {
    pub index: u64,
    pub message: String,
}

impl IndexedErrorItem {
    pub fn new(index: u64, message: impl Into<String>) -> Self {
        Self {
            index,
            message: message.into(),
        }
    }
}

/// Error bodies a beacon node may answer with. The indexed shape is tried first, it is a
/// superset of the plain one. An indexed body without any failures is a plain error.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ServerErrorBody {
    Indexed {
        code: u16,
        message: String,
        failures: Vec<IndexedErrorItem>,
    },
    Message {
        code: u16,
        message: String,
    },
}

impl From<ServerErrorBody> for ApiError {
    fn from(body: ServerErrorBody) -> Self {
        match body {
            ServerErrorBody::Indexed {
                code,
                message,
                failures,
            } if !failures.is_empty() => ApiError::BatchValidation {
                code,
                message,
                failures,
            },
            ServerErrorBody::Indexed { code, message, .. }
            | ServerErrorBody::Message { code, message } => ApiError::Server { code, message },
        }
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("resource not found")]
    NotFound,
    #[error("no beacon node url configured, set BEACON_URL")]
    MissingBeaconUrl,
    #[error("transport failure: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),
    #[error("failed to decode response body: {0}")]
    Decode(#[source] serde_json::Error),
    #[error("failed to encode request body: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("server error {code}: {message}")]
    Server { code: u16, message: String },
    #[error("server responded with status {0}")]
    Status(u16),
    #[error("batch validation failed {code}: {message} ({} failures)", .failures.len())]
    BatchValidation {
        code: u16,
        message: String,
        failures: Vec<IndexedErrorItem>,
    },
}

impl ApiError {
    /// The per item failures of a rejected batch, `None` for any other kind of error.
    pub fn indexed_failures(&self) -> Option<&[IndexedErrorItem]> {
        match self {
            ApiError::BatchValidation { failures, .. } => Some(failures.as_slice()),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(error: reqwest::Error) -> Self {
        ApiError::Transport(Box::new(error))
    }
}

/// Turns a not found error into `Ok(None)`, leaving every other error untouched.
pub trait ResponseOptional<T> {
    fn optional(self) -> Result<Option<T>, ApiError>;
}

impl<T> ResponseOptional<T> for Result<T, ApiError> {
    fn optional(self) -> Result<Option<T>, ApiError> {
        match self {
            Ok(value) => Ok(Some(value)),
            Err(ApiError::NotFound) => Ok(None),
            Err(error) => Err(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_indexed_error_body() {
        let body = r#"{
            "code": 400,
            "message": "some failures",
            "failures": [
                {"index": 0, "message": "bad signature"},
                {"index": 2, "message": "unknown validator"}
            ]
        }"#;
        let error: ApiError = serde_json::from_str::<ServerErrorBody>(body).unwrap().into();

        assert!(matches!(error, ApiError::BatchValidation { code: 400, .. }));
        assert_eq!(
            error.indexed_failures(),
            Some(
                &[
                    IndexedErrorItem::new(0, "bad signature"),
                    IndexedErrorItem::new(2, "unknown validator"),
                ][..]
            )
        );
    }

    #[test]
    fn test_indexed_body_without_failures_is_plain_error() {
        let body = r#"{"code":400,"message":"bad request","failures":[]}"#;
        let error: ApiError = serde_json::from_str::<ServerErrorBody>(body).unwrap().into();

        assert_eq!(error.indexed_failures(), None);
        assert!(matches!(
            error,
            ApiError::Server { code: 400, ref message } if message == "bad request"
        ));
    }

    #[test]
    fn test_parse_plain_error_body() {
        let body = r#"{"code": 500, "message": "internal error", "stacktraces": []}"#;
        let error: ApiError = serde_json::from_str::<ServerErrorBody>(body).unwrap().into();

        assert!(matches!(
            error,
            ApiError::Server { code: 500, ref message } if message == "internal error"
        ));
        assert_eq!(error.indexed_failures(), None);
    }

    #[test]
    fn test_optional_maps_only_not_found() {
        let not_found: Result<u8, ApiError> = Err(ApiError::NotFound);
        assert!(matches!(not_found.optional(), Ok(None)));

        let found: Result<u8, ApiError> = Ok(1);
        assert!(matches!(found.optional(), Ok(Some(1))));

        let failed: Result<u8, ApiError> = Err(ApiError::Status(503));
        assert!(matches!(failed.optional(), Err(ApiError::Status(503))));
    }

    #[test]
    fn test_transport_error_has_no_failures() {
        let error = ApiError::Transport("connection refused".into());
        assert_eq!(error.indexed_failures(), None);
    }
}
