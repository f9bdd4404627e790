//! Conversions from external infrastructure errors into domain errors.

use reqwest::Error as HttpError;
use rusqlite::Error as SqlError;
use voyagr_domain::VoyagrError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub VoyagrError);

impl From<InfraError> for VoyagrError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<VoyagrError> for InfraError {
    fn from(value: VoyagrError) -> Self {
        InfraError(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoVoyagrError {
    fn into_voyagr(self) -> VoyagrError;
}

/* -------------------------------------------------------------------------- */
/* rusqlite::Error → VoyagrError */
/* -------------------------------------------------------------------------- */

impl IntoVoyagrError for SqlError {
    fn into_voyagr(self) -> VoyagrError {
        use rusqlite::ffi::ErrorCode;
        use rusqlite::Error as RE;

        match self {
            RE::SqliteFailure(err, maybe_message) => {
                let message = maybe_message.unwrap_or_default();
                match err.code {
                    ErrorCode::DatabaseBusy => VoyagrError::Database("database is busy".into()),
                    ErrorCode::DatabaseLocked => {
                        VoyagrError::Database("database is locked".into())
                    }
                    ErrorCode::ConstraintViolation => {
                        VoyagrError::Database(format!("constraint violation: {message}"))
                    }
                    _ => VoyagrError::Database(format!(
                        "sqlite failure {:?} (code {}): {}",
                        err.code, err.extended_code, message
                    )),
                }
            }
            RE::QueryReturnedNoRows => VoyagrError::NotFound("no rows returned by query".into()),
            RE::FromSqlConversionFailure(_, _, cause) => {
                VoyagrError::Database(format!("failed to convert sqlite value: {cause}"))
            }
            RE::InvalidColumnType(_, _, ty) => {
                VoyagrError::Database(format!("invalid column type: {ty}"))
            }
            RE::Utf8Error(_) => VoyagrError::Database("invalid UTF-8 returned from sqlite".into()),
            RE::InvalidQuery => VoyagrError::Database("invalid SQL query".into()),
            other => VoyagrError::Database(other.to_string()),
        }
    }
}

impl From<SqlError> for InfraError {
    fn from(value: SqlError) -> Self {
        InfraError(value.into_voyagr())
    }
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → VoyagrError */
/* -------------------------------------------------------------------------- */

impl IntoVoyagrError for HttpError {
    fn into_voyagr(self) -> VoyagrError {
        if self.is_timeout() {
            return VoyagrError::Network("HTTP request timed out".into());
        }

        if self.is_connect() {
            return VoyagrError::Network("HTTP connection failure".into());
        }

        if let Some(status) = self.status() {
            let code = status.as_u16();
            let message =
                format!("HTTP {} {}", code, status.canonical_reason().unwrap_or("unknown status"));

            return match code {
                401 | 403 => VoyagrError::Auth(message),
                404 => VoyagrError::NotFound(message),
                429 => VoyagrError::Network(message),
                400..=499 => VoyagrError::InvalidInput(message),
                _ => VoyagrError::Network(message),
            };
        }

        VoyagrError::Network(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_voyagr())
    }
}

/* -------------------------------------------------------------------------- */
/* r2d2::Error → VoyagrError */
/* -------------------------------------------------------------------------- */

impl From<r2d2::Error> for InfraError {
    fn from(value: r2d2::Error) -> Self {
        InfraError(VoyagrError::Database(format!("connection pool error: {value}")))
    }
}
