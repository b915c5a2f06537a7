//! Clients for the various Dwolla APIs.

use crate::{
    apis::hal::HalCollection,
    authenticator::Authenticator,
    client::Environment,
    common::{HAL_JSON_CONTENT_TYPE, IDEMPOTENCY_KEY_HEADER},
    error::{ApiErrorKind, Stage},
    Error,
};
use anyhow::anyhow;
use reqwest::{
    header::{HeaderValue, CONTENT_TYPE, LOCATION},
    Response, Url,
};
use reqwest_middleware::{ClientWithMiddleware, RequestBuilder};
use serde::{de::DeserializeOwned, Serialize};
use std::fmt::{Debug, Formatter};
use uuid::Uuid;

pub mod accounts;
pub mod auth;
pub mod customers;
pub mod funding_sources;
pub mod hal;
pub mod transfers;

pub(crate) struct DwollaClientInner {
    pub(crate) client: ClientWithMiddleware,
    /// Plain client used only to assemble requests that `ClientWithMiddleware` cannot build (multipart).
    pub(crate) http_client: reqwest::Client,
    pub(crate) authenticator: Authenticator,
    pub(crate) environment: Environment,
}

impl Debug for DwollaClientInner {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DwollaClientInner")
            .field("environment", &self.environment)
            .field("client_id", &self.authenticator.client_id)
            .finish_non_exhaustive()
    }
}

impl DwollaClientInner {
    /// Resolves a path against the root URL of the configured environment.
    pub(crate) fn url(&self, path: &str) -> Result<Url, Error> {
        self.environment
            .api_url()
            .join(path)
            .map_err(|e| Error::Other(anyhow!("Invalid URL for path {}: {}", path, e)))
    }

    /// Sends a request through the middleware stack and labels any API error
    /// with the messages of the given operation.
    pub(crate) async fn send(
        &self,
        operation: &Operation,
        request: RequestBuilder,
    ) -> Result<Response, Error> {
        request
            .send()
            .await
            .map_err(|e| operation.request_failed(e.into()))
    }

    /// Same as [`send`](Self::send), for requests already built.
    pub(crate) async fn execute(
        &self,
        operation: &Operation,
        request: reqwest::Request,
    ) -> Result<Response, Error> {
        self.client
            .execute(request)
            .await
            .map_err(|e| operation.request_failed(e.into()))
    }
}

/// A single call to a Dwolla endpoint, and the messages reported when it fails.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Operation {
    /// Name of the operation. Also completes `not authorized to ...` on `403`.
    pub(crate) action: &'static str,
    /// Resource reported as missing on `404`.
    pub(crate) resource: &'static str,
    /// Description of a `400`.
    pub(crate) invalid: &'static str,
}

impl Operation {
    pub(crate) const fn new(action: &'static str, resource: &'static str) -> Self {
        Self {
            action,
            resource,
            invalid: "duplicate resource or validation error",
        }
    }

    pub(crate) const fn with_invalid(self, invalid: &'static str) -> Self {
        Self { invalid, ..self }
    }

    pub(crate) fn describe(&self, error: Error) -> Error {
        match error {
            Error::ApiError(mut api_error) => {
                match api_error.kind {
                    ApiErrorKind::Validation => api_error.message = self.invalid.to_string(),
                    ApiErrorKind::Forbidden => {
                        api_error.message = format!("not authorized to {}", self.action)
                    }
                    ApiErrorKind::NotFound => {
                        api_error.message = format!("{} not found", self.resource)
                    }
                    ApiErrorKind::Other => {}
                }
                Error::ApiError(api_error)
            }
            e => e,
        }
    }

    /// Reports a failure of this operation at the given stage.
    ///
    /// Error responses and authentication failures already say what went wrong
    /// and are returned unwrapped.
    pub(crate) fn fail(&self, stage: Stage, error: Error) -> Error {
        match error {
            e @ (Error::ApiError(_)
            | Error::AuthenticationError(_)
            | Error::OperationError { .. }) => self.describe(e),
            e => Error::OperationError {
                operation: self.action,
                stage,
                source: Box::new(e),
            },
        }
    }

    fn request_failed(&self, error: Error) -> Error {
        let stage = match &error {
            Error::HttpError(e) if e.is_builder() => Stage::BuildRequest,
            _ => Stage::SendRequest,
        };
        self.fail(stage, error)
    }

    /// Decodes the JSON body of a successful response.
    pub(crate) async fn decode<T: DeserializeOwned>(&self, response: Response) -> Result<T, Error> {
        decode_json(response)
            .await
            .map_err(|e| self.fail(Stage::ReadResponse, e))
    }

    /// Decodes the items embedded under `key` in a list response.
    pub(crate) async fn decode_items<T: DeserializeOwned>(
        &self,
        response: Response,
        key: &str,
    ) -> Result<Vec<T>, Error> {
        self.decode::<HalCollection>(response)
            .await?
            .into_items(key)
            .map_err(|e| self.fail(Stage::ReadResponse, e))
    }

    /// Reads the id of a newly created resource from a `201` response.
    pub(crate) fn created_id(&self, response: &Response, collection: &Url) -> Result<String, Error> {
        id_from_location(response.headers().get(LOCATION), collection)
            .map_err(|e| self.fail(Stage::ReadResponse, e))
    }
}

/// Dwolla-specific extensions to the request builder.
pub(crate) trait RequestBuilderExt: Sized {
    /// Serializes `body` as the HAL+JSON payload of the request.
    fn hal_json<T: Serialize + ?Sized>(self, body: &T) -> Result<Self, Error>;

    /// Declares an empty HAL+JSON payload.
    fn hal_empty(self) -> Self;

    /// Attaches a new random idempotency key.
    fn idempotency_key(self) -> Self;
}

impl RequestBuilderExt for RequestBuilder {
    fn hal_json<T: Serialize + ?Sized>(self, body: &T) -> Result<Self, Error> {
        let bytes = serde_json::to_vec(body)?;
        Ok(self.hal_empty().body(bytes))
    }

    fn hal_empty(self) -> Self {
        self.header(CONTENT_TYPE, HAL_JSON_CONTENT_TYPE)
    }

    fn idempotency_key(self) -> Self {
        self.header(IDEMPOTENCY_KEY_HEADER, Uuid::new_v4().to_string())
    }
}

/// Reads the whole response body and decodes it as JSON.
pub(crate) async fn decode_json<T: DeserializeOwned>(response: Response) -> Result<T, Error> {
    let bytes = response.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// Extracts the id of a newly created resource from the `Location` header of a `201` response.
///
/// The id is what remains after stripping the `collection` URL from the header value
/// (e.g. `https://api.dwolla.com/customers/` + `abc-123`). A header pointing to another
/// host is accepted only when its path ends with the collection name followed by the id.
pub(crate) fn id_from_location(
    location: Option<&HeaderValue>,
    collection: &Url,
) -> Result<String, Error> {
    let location = location
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| Error::Other(anyhow!("Missing Location header in response")))?;

    let unexpected = || {
        Error::Other(anyhow!(
            "Unexpected Location header in response: {}",
            location
        ))
    };

    let id = match location.strip_prefix(collection.as_str()) {
        Some(id) => id.trim_end_matches('/').to_string(),
        None => {
            // Only trust a foreign URL shaped like `.../{collection}/{id}`
            let collection_name = collection
                .path_segments()
                .and_then(|mut segments| segments.rfind(|s| !s.is_empty()))
                .ok_or_else(unexpected)?;
            let url = collection.join(location).map_err(|_| unexpected())?;
            let mut segments = url
                .path_segments()
                .ok_or_else(unexpected)?
                .filter(|s| !s.is_empty())
                .rev();

            match (segments.next(), segments.next()) {
                (Some(id), Some(name)) if name == collection_name => id.to_string(),
                _ => return Err(unexpected()),
            }
        }
    };

    if id.is_empty() || id.contains('/') {
        return Err(unexpected());
    }

    Ok(id)
}
