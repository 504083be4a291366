//! Conversions from external infrastructure errors into domain errors.

use chica_domain::ChicaError;
use reqwest::Error as HttpError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub ChicaError);

impl From<InfraError> for ChicaError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<ChicaError> for InfraError {
    fn from(value: ChicaError) -> Self {
        InfraError(value)
    }
}

trait IntoChicaError {
    fn into_chica(self) -> ChicaError;
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → ChicaError */
/* -------------------------------------------------------------------------- */

impl IntoChicaError for HttpError {
    fn into_chica(self) -> ChicaError {
        if self.is_timeout() {
            return ChicaError::Network("HTTP request timed out".into());
        }

        if self.is_connect() {
            return ChicaError::Network("HTTP connection failure".into());
        }

        if self.is_builder() {
            return ChicaError::Config(format!("HTTP client misconfigured: {self}"));
        }

        if let Some(status) = self.status() {
            let code = status.as_u16();
            let message =
                format!("HTTP {} {}", code, status.canonical_reason().unwrap_or("unknown status"));

            return match code {
                401 | 403 => ChicaError::Auth(message),
                400..=499 => ChicaError::InvalidInput(message),
                _ => ChicaError::Network(message),
            };
        }

        ChicaError::Network(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_chica())
    }
}
