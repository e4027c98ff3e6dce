//! Error taxonomy and response normalization.
//!
//! Every remote operation yields a [`RemoteResult`]. HTTP statuses and
//! transport failures are classified here and nowhere else.

use std::collections::BTreeMap;
use std::fmt;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::program::Message;

/// Per-field validation messages, as returned by a 422 response.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Classification of a failed remote operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Unauthorized,
    Forbidden,
    NotFound,
    Invalid,
    ServerError,
    NetworkError,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Unauthorized => "unauthorized",
            ErrorKind::Forbidden => "forbidden",
            ErrorKind::NotFound => "not-found",
            ErrorKind::Invalid => "invalid",
            ErrorKind::ServerError => "server-error",
            ErrorKind::NetworkError => "network-error",
        }
    }

    /// All kinds, in declaration order.
    pub fn all() -> &'static [ErrorKind] {
        &[
            ErrorKind::Unauthorized,
            ErrorKind::Forbidden,
            ErrorKind::NotFound,
            ErrorKind::Invalid,
            ErrorKind::ServerError,
            ErrorKind::NetworkError,
        ]
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure of a remote operation.
///
/// Only `invalid` carries field errors; the constructors enforce it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}")]
pub struct RemoteError {
    kind: ErrorKind,
    fields: Option<FieldErrors>,
}

impl RemoteError {
    /// Error without payload. `Invalid` gets an empty field map.
    pub fn new(kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::Invalid => Self::invalid(FieldErrors::new()),
            kind => Self { kind, fields: None },
        }
    }

    pub fn invalid(fields: FieldErrors) -> Self {
        Self {
            kind: ErrorKind::Invalid,
            fields: Some(fields),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Field errors of an `invalid` error.
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        self.fields.as_ref()
    }
}

/// Success payload or classified failure.
pub type RemoteResult<T> = Result<T, RemoteError>;

impl<T: Send + 'static> Message for RemoteResult<T> {}

#[derive(Deserialize, Default)]
#[serde(default)]
struct ValidationPayload {
    errors: FieldErrors,
}

/// Classifies an HTTP response.
///
/// 401, 403, 404, 422 and 5xx map to their error kinds; every other status
/// is a success carrying the payload. A payload that failed to parse arrives
/// here as `Value::Null`.
pub fn normalize(status: u16, payload: Value) -> RemoteResult<Value> {
    match status {
        401 => Err(RemoteError::new(ErrorKind::Unauthorized)),
        403 => Err(RemoteError::new(ErrorKind::Forbidden)),
        404 => Err(RemoteError::new(ErrorKind::NotFound)),
        422 => {
            let fields = serde_json::from_value::<ValidationPayload>(payload)
                .map(|p| p.errors)
                .unwrap_or_default();
            Err(RemoteError::invalid(fields))
        }
        s if s >= 500 => Err(RemoteError::new(ErrorKind::ServerError)),
        _ => Ok(payload),
    }
}

/// Decodes a success payload into the operation's type.
///
/// Missing fields default through serde; a payload of the wrong shape
/// altogether is reported as `server-error`.
pub fn decode<T: DeserializeOwned>(payload: Value) -> RemoteResult<T> {
    serde_json::from_value(payload).map_err(|err| {
        tracing::warn!(error = %err, "Undecodable response payload");
        RemoteError::new(ErrorKind::ServerError)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn maps_statuses_to_kinds() {
        let cases = [
            (401, ErrorKind::Unauthorized),
            (403, ErrorKind::Forbidden),
            (404, ErrorKind::NotFound),
            (500, ErrorKind::ServerError),
            (502, ErrorKind::ServerError),
            (503, ErrorKind::ServerError),
        ];
        for (status, kind) in cases {
            let err = normalize(status, json!({})).unwrap_err();
            assert_eq!(err.kind(), kind, "status {status}");
            assert!(err.field_errors().is_none());
        }
    }

    #[test]
    fn validation_payload_becomes_field_errors() {
        let err = normalize(422, json!({"errors": {"title": ["can't be blank"]}})).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Invalid);
        let mut expected = FieldErrors::new();
        expected.insert("title".into(), vec!["can't be blank".into()]);
        assert_eq!(err.field_errors(), Some(&expected));
    }

    #[test]
    fn malformed_validation_payload_yields_empty_fields() {
        let err = normalize(422, Value::Null).unwrap_err();
        assert_eq!(err.field_errors(), Some(&FieldErrors::new()));
    }

    #[test]
    fn other_statuses_are_success() {
        assert_eq!(normalize(200, json!({"a": 1})), Ok(json!({"a": 1})));
        assert_eq!(normalize(204, Value::Null), Ok(Value::Null));
    }

    #[test]
    fn kind_strings_match_taxonomy() {
        let names: Vec<_> = ErrorKind::all().iter().map(ErrorKind::as_str).collect();
        assert_eq!(
            names,
            vec!["unauthorized", "forbidden", "not-found", "invalid", "server-error", "network-error"]
        );
    }

    #[test]
    fn decode_rejects_wrong_shape() {
        let err = decode::<Vec<String>>(json!({"tags": 1})).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ServerError);
    }
}
