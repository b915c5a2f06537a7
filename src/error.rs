//! Standard errors used by all functions in the crate.

use std::{collections::HashMap, fmt};

/// Error collecting all possible failures of the Dwolla client.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Reqwest error, raised when the request could not be sent or the response could not be read.
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),
    /// Error returned by a Dwolla API endpoint.
    #[error("{0}")]
    ApiError(#[from] ApiError),
    /// A request body could not be encoded, or a response body could not be decoded.
    #[error("JSON error: {0}")]
    SerializationError(#[from] serde_json::Error),
    /// An access token could not be obtained with the configured credentials.
    #[error("Failed to get auth token: {0}")]
    AuthenticationError(Box<Error>),
    /// A Dwolla operation failed without an error response to report,
    /// e.g. the connection dropped or the response body could not be decoded.
    #[error("Failed to {operation} while {stage}: {source}")]
    OperationError {
        /// The operation that failed, e.g. `retrieve the customer`.
        operation: &'static str,
        stage: Stage,
        source: Box<Error>,
    },
    /// Catch-all variant for unexpected errors.
    #[error(transparent)]
    Other(anyhow::Error),
}

/// Step of a Dwolla operation at which an [`Error::OperationError`] happened.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum Stage {
    /// Assembling the HTTP request.
    BuildRequest,
    /// Sending the request and waiting for the response.
    SendRequest,
    /// Reading or decoding the response.
    ReadResponse,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Stage::BuildRequest => "creating the request",
            Stage::SendRequest => "making the request to the Dwolla API",
            Stage::ReadResponse => "reading the Dwolla API response",
        })
    }
}

impl Error {
    /// Returns the [`ApiErrorKind`](crate::error::ApiErrorKind) of this error,
    /// or `None` if the failure did not come from a Dwolla HTTP response.
    pub fn api_error_kind(&self) -> Option<ApiErrorKind> {
        match self {
            Error::ApiError(api_error) => Some(api_error.kind),
            _ => None,
        }
    }

    /// Returns the underlying failure, looking through [`Error::OperationError`] wrappers.
    pub fn root(&self) -> &Error {
        match self {
            Error::OperationError { source, .. } => source.root(),
            e => e,
        }
    }
}

impl From<reqwest_middleware::Error> for Error {
    fn from(e: reqwest_middleware::Error) -> Self {
        match e {
            reqwest_middleware::Error::Reqwest(e) => Error::HttpError(e),
            reqwest_middleware::Error::Middleware(e) => {
                e.downcast::<Error>().unwrap_or_else(Error::Other)
            }
        }
    }
}

impl From<Error> for reqwest_middleware::Error {
    fn from(e: Error) -> Self {
        reqwest_middleware::Error::Middleware(e.into())
    }
}

/// Classification of a failed Dwolla API call, derived from the HTTP status code.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum ApiErrorKind {
    /// `400 Bad Request`: duplicate resource or validation error.
    Validation,
    /// `403 Forbidden`: the credentials are not allowed to perform the operation.
    Forbidden,
    /// `404 Not Found`: the resource does not exist.
    NotFound,
    /// Any other non-successful status.
    Other,
}

impl ApiErrorKind {
    pub(crate) fn from_status(status: u16) -> Self {
        match status {
            400 => ApiErrorKind::Validation,
            403 => ApiErrorKind::Forbidden,
            404 => ApiErrorKind::NotFound,
            _ => ApiErrorKind::Other,
        }
    }
}

/// Dwolla HTTP APIs error.
#[derive(thiserror::Error, Debug)]
pub struct ApiError {
    /// Category of the failure.
    pub kind: ApiErrorKind,
    /// HTTP status returned by the server.
    pub status: u16,
    /// Description of the failure.
    ///
    /// For `400`, `403` and `404` this names the operation or resource involved
    /// (e.g. `not authorized to retrieve the customer`). For any other status
    /// this is the raw status text (e.g. `500 Internal Server Error`).
    pub message: String,
    /// Error code returned by Dwolla in the response body, if any (e.g. `ValidationError`).
    pub code: Option<String>,
    /// Human readable explanation returned by Dwolla in the response body, if any.
    pub detail: Option<String>,
    /// Field-level errors returned by Dwolla, keyed by the JSON path of the offending field.
    pub errors: HashMap<String, Vec<String>>,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Dwolla HTTP error {}: {}", self.status, self.message)?;

        if let Some(ref code) = self.code {
            write!(f, " ({})", code)?;
        }

        if let Some(ref detail) = self.detail {
            write!(f, "\nAdditional details: {}", detail)?;
        }

        if !self.errors.is_empty() {
            write!(f, "\nAll errors:")?;
            for (k, v) in &self.errors {
                write!(f, "\n- {}: {}", k, v.join(", "))?;
            }
        }

        Ok(())
    }
}
