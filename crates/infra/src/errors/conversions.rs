//! Conversions from external infrastructure errors into domain errors.

use calcache_domain::CalCacheError;
use reqwest::Error as HttpError;
use rusqlite::Error as SqlError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub CalCacheError);

impl From<InfraError> for CalCacheError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<CalCacheError> for InfraError {
    fn from(value: CalCacheError) -> Self {
        InfraError(value)
    }
}

trait IntoCalCacheError {
    fn into_calcache(self) -> CalCacheError;
}

/* -------------------------------------------------------------------------- */
/* rusqlite::Error → CalCacheError */
/* -------------------------------------------------------------------------- */

impl IntoCalCacheError for SqlError {
    fn into_calcache(self) -> CalCacheError {
        use rusqlite::ffi::ErrorCode;
        use rusqlite::Error as RE;

        match self {
            RE::SqliteFailure(err, maybe_message) => {
                let message = maybe_message.unwrap_or_default();
                match (err.code, err.extended_code) {
                    (ErrorCode::DatabaseBusy, _) => {
                        CalCacheError::Database("database is busy".into())
                    }
                    (ErrorCode::DatabaseLocked, _) => {
                        CalCacheError::Database("database is locked".into())
                    }
                    (ErrorCode::ConstraintViolation, 1555 | 2067) => {
                        CalCacheError::Database("unique constraint violation".into())
                    }
                    _ => CalCacheError::Database(format!(
                        "sqlite failure {:?} (code {}): {}",
                        err.code, err.extended_code, message
                    )),
                }
            }
            RE::QueryReturnedNoRows => CalCacheError::NotFound("no rows returned by query".into()),
            RE::FromSqlConversionFailure(_, _, cause) => {
                CalCacheError::Database(format!("failed to convert sqlite value: {cause}"))
            }
            RE::InvalidColumnType(_, name, ty) => {
                CalCacheError::Database(format!("invalid column type for {name}: {ty}"))
            }
            other => CalCacheError::Database(other.to_string()),
        }
    }
}

impl From<SqlError> for InfraError {
    fn from(value: SqlError) -> Self {
        InfraError(value.into_calcache())
    }
}

/* -------------------------------------------------------------------------- */
/* r2d2::Error → CalCacheError */
/* -------------------------------------------------------------------------- */

impl From<r2d2::Error> for InfraError {
    fn from(value: r2d2::Error) -> Self {
        InfraError(CalCacheError::Database(format!("connection pool: {value}")))
    }
}

/* -------------------------------------------------------------------------- */
/* serde_json::Error → CalCacheError */
/* -------------------------------------------------------------------------- */

impl From<serde_json::Error> for InfraError {
    fn from(value: serde_json::Error) -> Self {
        InfraError(CalCacheError::MalformedResponse(value.to_string()))
    }
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → CalCacheError */
/* -------------------------------------------------------------------------- */

impl IntoCalCacheError for HttpError {
    fn into_calcache(self) -> CalCacheError {
        if self.is_timeout() {
            return CalCacheError::Network("HTTP request timed out".into());
        }

        if self.is_connect() {
            return CalCacheError::Network("HTTP connection failure".into());
        }

        if self.is_decode() {
            return CalCacheError::MalformedResponse(format!("undecodable body: {self}"));
        }

        if let Some(status) = self.status() {
            return status_error(status, None);
        }

        CalCacheError::Network(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_calcache())
    }
}

/// Map a non-success HTTP status (and optional body excerpt) to a domain
/// error.
pub fn status_error(status: reqwest::StatusCode, body: Option<&str>) -> CalCacheError {
    let code = status.as_u16();
    let mut message = format!("HTTP {} {}", code, status.canonical_reason().unwrap_or("unknown status"));
    if let Some(body) = body.filter(|b| !b.is_empty()) {
        message.push_str(": ");
        message.extend(body.chars().take(200));
    }

    match code {
        401 | 403 => CalCacheError::Auth(message),
        404 => CalCacheError::NotFound(message),
        400..=499 if code != 429 => CalCacheError::InvalidInput(message),
        _ => CalCacheError::Network(message),
    }
}

/// Re-tag a store failure so callers can tell it apart from other database
/// errors.
pub fn cache_store_error(err: impl Into<InfraError>) -> CalCacheError {
    match err.into().0 {
        CalCacheError::Database(message) => CalCacheError::CacheStore(message),
        other => other,
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */

#[cfg(test)]
mod tests {
    use reqwest::{Client, StatusCode};
    use rusqlite::ffi::{Error as FfiError, ErrorCode};
    use rusqlite::Error as SqlError;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    #[test]
    fn sqlite_busy_maps_to_database_error() {
        let err = SqlError::SqliteFailure(
            FfiError { code: ErrorCode::DatabaseBusy, extended_code: 5 },
            Some("database is locked".into()),
        );

        let mapped: CalCacheError = InfraError::from(err).into();
        match mapped {
            CalCacheError::Database(msg) => assert!(msg.contains("busy")),
            other => panic!("expected database error, got {:?}", other),
        }
    }

    #[test]
    fn store_failures_are_retagged() {
        let err = SqlError::SqliteFailure(
            FfiError { code: ErrorCode::DatabaseLocked, extended_code: 6 },
            None,
        );
        assert_eq!(cache_store_error(err), CalCacheError::CacheStore("database is locked".into()));

        let untouched = cache_store_error(CalCacheError::NotFound("row".into()));
        assert_eq!(untouched, CalCacheError::NotFound("row".into()));
    }

    #[test]
    fn status_mapping() {
        assert!(matches!(status_error(StatusCode::FORBIDDEN, None), CalCacheError::Auth(_)));
        assert!(matches!(status_error(StatusCode::NOT_FOUND, None), CalCacheError::NotFound(_)));
        assert!(matches!(
            status_error(StatusCode::BAD_REQUEST, Some("bad timeMin")),
            CalCacheError::InvalidInput(msg) if msg.ends_with("bad timeMin")
        ));
        assert!(matches!(
            status_error(StatusCode::TOO_MANY_REQUESTS, None),
            CalCacheError::Network(_)
        ));
        assert!(matches!(status_error(StatusCode::BAD_GATEWAY, None), CalCacheError::Network(_)));
    }

    #[tokio::test]
    async fn http_status_401_maps_to_auth_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(StatusCode::UNAUTHORIZED))
            .mount(&server)
            .await;

        let client = Client::builder().no_proxy().build().unwrap();
        let error = client.get(server.uri()).send().await.unwrap().error_for_status().unwrap_err();

        let mapped: CalCacheError = InfraError::from(error).into();
        match mapped {
            CalCacheError::Auth(msg) => assert!(msg.contains("401")),
            other => panic!("expected auth error, got {:?}", other),
        }
    }

    #[test]
    fn json_errors_are_malformed_responses() {
        let err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let mapped: CalCacheError = InfraError::from(err).into();
        assert!(matches!(mapped, CalCacheError::MalformedResponse(_)));
    }
}
