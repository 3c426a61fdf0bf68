use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("configuration error: {0}")]
    Config(String),
    #[error("output directory unavailable: {0}")]
    OutputUnavailable(String),
    #[error("failed to write rollback plan: {0}")]
    Write(String),
}

impl From<crate::types::errors::Error> for ApiError {
    fn from(e: crate::types::errors::Error) -> Self {
        use crate::types::errors::ErrorKind::{Config, Io, Serialize};
        match e.kind {
            Config => ApiError::Config(e.msg),
            Io | Serialize => ApiError::Write(e.msg),
        }
    }
}

impl ApiError {
    #[must_use]
    pub const fn id(&self) -> ErrorId {
        match self {
            ApiError::Config(_) => ErrorId::E_CONFIG,
            ApiError::OutputUnavailable(_) => ErrorId::E_OUTPUT_DIR,
            ApiError::Write(_) => ErrorId::E_WRITE,
        }
    }
}

// Stable identifiers carried in emitted facts.
#[allow(non_camel_case_types, reason = "Error IDs are emitted verbatim")]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorId {
    E_CONFIG,
    E_OUTPUT_DIR,
    E_UNSUPPORTED,
    E_UNKNOWN_TYPE,
    E_MISSING_FIELD,
    E_MISSING_ARGUMENT,
    E_WRITE,
}

#[must_use]
pub const fn id_str(id: ErrorId) -> &'static str {
    match id {
        ErrorId::E_CONFIG => "E_CONFIG",
        ErrorId::E_OUTPUT_DIR => "E_OUTPUT_DIR",
        ErrorId::E_UNSUPPORTED => "E_UNSUPPORTED",
        ErrorId::E_UNKNOWN_TYPE => "E_UNKNOWN_TYPE",
        ErrorId::E_MISSING_FIELD => "E_MISSING_FIELD",
        ErrorId::E_MISSING_ARGUMENT => "E_MISSING_ARGUMENT",
        ErrorId::E_WRITE => "E_WRITE",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::errors::{Error, ErrorKind};

    #[test]
    fn type_errors_map_to_api_errors() {
        let e: ApiError = Error::new(ErrorKind::Io, "disk full").into();
        assert!(matches!(e, ApiError::Write(ref m) if m == "disk full"));
        assert_eq!(id_str(e.id()), "E_WRITE");

        let e: ApiError = Error::new(ErrorKind::Config, "bad key").into();
        assert_eq!(e.id(), ErrorId::E_CONFIG);
    }
}
