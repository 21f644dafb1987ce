//! Conversions from external infrastructure errors into domain errors.

use focusguard_domain::FocusError;
use reqwest::{Error as HttpError, StatusCode};

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub FocusError);

impl From<InfraError> for FocusError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<FocusError> for InfraError {
    fn from(value: FocusError) -> Self {
        InfraError(value)
    }
}

impl std::fmt::Display for InfraError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for InfraError {}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoFocusError {
    fn into_focus(self) -> FocusError;
}

/* -------------------------------------------------------------------------- */
/* HTTP status → FocusError */
/* -------------------------------------------------------------------------- */

/// Map a non-success Graph response to a domain error.
///
/// `detail` is appended to the message, typically the response body.
pub fn status_error(status: StatusCode, detail: &str) -> InfraError {
    let code = status.as_u16();
    let mut message =
        format!("HTTP {} {}", code, status.canonical_reason().unwrap_or("unknown status"));
    let detail = detail.trim();
    if !detail.is_empty() {
        message.push_str(": ");
        message.push_str(detail);
    }

    InfraError(match code {
        401 | 403 => FocusError::Auth(message),
        404 => FocusError::NotFound(message),
        429 => FocusError::StoreUnavailable(message),
        400..=499 => FocusError::InvalidInput(message),
        _ => FocusError::StoreUnavailable(message),
    })
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → FocusError */
/* -------------------------------------------------------------------------- */

impl IntoFocusError for HttpError {
    fn into_focus(self) -> FocusError {
        if self.is_timeout() {
            return FocusError::StoreUnavailable("HTTP request timed out".into());
        }

        if self.is_connect() {
            return FocusError::StoreUnavailable("HTTP connection failure".into());
        }

        if let Some(status) = self.status() {
            return status_error(status, "").0;
        }

        if self.is_decode() {
            return FocusError::InvalidInput(format!("malformed response body: {self}"));
        }

        if self.is_builder() {
            return FocusError::Config(format!("invalid HTTP request: {self}"));
        }

        FocusError::StoreUnavailable(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_focus())
    }
}

/* -------------------------------------------------------------------------- */
/* std::io / parser errors → FocusError */
/* -------------------------------------------------------------------------- */

impl IntoFocusError for std::io::Error {
    fn into_focus(self) -> FocusError {
        FocusError::Io(self.to_string())
    }
}

impl From<std::io::Error> for InfraError {
    fn from(value: std::io::Error) -> Self {
        InfraError(value.into_focus())
    }
}

impl From<toml::de::Error> for InfraError {
    fn from(value: toml::de::Error) -> Self {
        InfraError(FocusError::Config(format!("Invalid TOML format: {value}")))
    }
}

impl From<toml::ser::Error> for InfraError {
    fn from(value: toml::ser::Error) -> Self {
        InfraError(FocusError::Config(format!("Cannot render TOML: {value}")))
    }
}

impl From<serde_json::Error> for InfraError {
    fn from(value: serde_json::Error) -> Self {
        InfraError(FocusError::InvalidInput(format!("Invalid JSON: {value}")))
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
