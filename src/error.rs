//! Defines the crate level error type and the client-side validation errors.

use reqwest::StatusCode;

/// The errors that may occur while talking to the finance service or acting
/// on the dashboard.
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum Error {
    /// The service rejected the session token with HTTP 401 or 403.
    ///
    /// Any dashboard fetch that fails with this error tears down the session.
    #[error("the session is not authorised (HTTP {0})")]
    Unauthorized(u16),

    /// The service responded with an error status other than 401 or 403.
    ///
    /// `body` holds whatever text the service sent back and should only be
    /// logged, not shown to the user.
    #[error("the service responded with HTTP {status}: {body}")]
    Status {
        /// The HTTP status code.
        status: u16,
        /// The response body, possibly empty.
        body: String,
    },

    /// The request could not be sent or the response could not be read.
    #[error("could not reach the service: {0}")]
    Network(String),

    /// The response body did not have the expected shape.
    #[error("could not decode the response: {0}")]
    Decode(String),

    /// User input failed a client-side check and was never sent.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The login and password combination was rejected.
    #[error("invalid login or password")]
    InvalidCredentials,

    /// A new transaction is already being submitted.
    #[error("a transaction is already being submitted")]
    SubmissionInFlight,

    /// The profile was saved while the edit form was closed.
    #[error("the profile is not being edited")]
    NotEditing,

    /// The dashboard has been mounted already.
    #[error("the dashboard is already mounted")]
    AlreadyMounted,

    /// The dashboard was unmounted or its session ended before the operation
    /// could start.
    #[error("the dashboard is no longer active")]
    Inactive,

    /// The configured API base URL could not be parsed.
    #[error("invalid API base URL \"{0}\"")]
    InvalidBaseUrl(String),
}

impl Error {
    /// Create an error from a non-success HTTP status.
    ///
    /// 401 and 403 become [Error::Unauthorized], everything else becomes
    /// [Error::Status].
    pub fn from_status(status: StatusCode, body: String) -> Self {
        if is_auth_status(status) {
            Error::Unauthorized(status.as_u16())
        } else {
            Error::Status {
                status: status.as_u16(),
                body,
            }
        }
    }

    /// Whether this error means the session is no longer valid.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, Error::Unauthorized(_))
    }
}

impl From<reqwest::Error> for Error {
    fn from(value: reqwest::Error) -> Self {
        match value.status() {
            Some(status) => Error::from_status(status, String::new()),
            None if value.is_decode() => Error::Decode(value.to_string()),
            None => {
                tracing::error!("an unhandled HTTP client error occurred: {}", value);
                Error::Network(value.to_string())
            }
        }
    }
}

fn is_auth_status(status: StatusCode) -> bool {
    status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN
}

/// Client-side checks that block an action before it reaches the network.
#[derive(Debug, Clone, Copy, thiserror::Error, PartialEq, Eq)]
pub enum ValidationError {
    /// The profile edit form was saved without a password.
    #[error("the password is required to update your details")]
    PasswordRequired,

    /// A new transaction has no kind.
    #[error("choose whether the transaction is an inflow or an outflow")]
    MissingKind,

    /// A new transaction has an amount that is zero, negative or not a number.
    #[error("the amount must be greater than zero")]
    NonPositiveAmount,
}

#[cfg(test)]
mod tests {
    use reqwest::StatusCode;

    use super::{Error, ValidationError};

    #[test]
    fn unauthorized_and_forbidden_are_auth_failures() {
        assert_eq!(
            Error::from_status(StatusCode::UNAUTHORIZED, String::new()),
            Error::Unauthorized(401)
        );
        assert_eq!(
            Error::from_status(StatusCode::FORBIDDEN, String::new()),
            Error::Unauthorized(403)
        );
        assert!(Error::Unauthorized(403).is_auth_failure());
    }

    #[test]
    fn other_statuses_are_not_auth_failures() {
        let error = Error::from_status(StatusCode::INTERNAL_SERVER_ERROR, "boom".to_owned());

        assert_eq!(
            error,
            Error::Status {
                status: 500,
                body: "boom".to_owned()
            }
        );
        assert!(!error.is_auth_failure());
    }

    #[test]
    fn validation_errors_convert_into_error() {
        let error: Error = ValidationError::PasswordRequired.into();

        assert_eq!(error, Error::Validation(ValidationError::PasswordRequired));
        assert!(!error.is_auth_failure());
    }
}
