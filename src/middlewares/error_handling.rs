use crate::error::{ApiError, ApiErrorKind, Error};
use async_trait::async_trait;
use reqwest::{Request, Response};
use reqwest_middleware::{Middleware, Next};
use std::collections::HashMap;
use http::Extensions;

/// Reqwest middleware which translates non-successful responses returned from Dwolla APIs
/// into [`Error::ApiError`](crate::error::Error)s.
///
/// The error message is the raw HTTP status text. Each API operation later replaces it
/// with a more specific description for the statuses it knows about.
pub struct ErrorHandlingMiddleware;

#[async_trait]
impl Middleware for ErrorHandlingMiddleware {
    async fn handle(
        &self,
        req: Request,
        extensions: &mut Extensions,
        next: Next<'_>,
    ) -> reqwest_middleware::Result<Response> {
        // Capture the response
        let response = next.run(req, extensions).await?;

        // Build an ApiError if the response is not a success
        if !response.status().is_success() {
            tracing::debug!("Failed HTTP request. Status code: {}", response.status());

            let api_error = api_error_from_response(response).await?;
            return Err(Error::ApiError(api_error).into());
        }

        Ok(response)
    }
}

/// Body of an error response from Dwolla APIs.
#[derive(serde::Deserialize, Debug)]
#[serde(untagged)]
enum ErrorResponseBody {
    Hal {
        code: String,
        message: String,
        #[serde(rename = "_embedded")]
        embedded: Option<EmbeddedErrors>,
    },
    OAuth {
        error: String,
        error_description: Option<String>,
    },
    Unknown,
}

#[derive(serde::Deserialize, Debug)]
struct EmbeddedErrors {
    #[serde(default)]
    errors: Vec<FieldError>,
}

#[derive(serde::Deserialize, Debug)]
struct FieldError {
    code: String,
    message: String,
    path: Option<String>,
}

async fn api_error_from_response(response: Response) -> reqwest_middleware::Result<ApiError> {
    let status = response.status();

    // Parse the response body as JSON
    let bytes = response.bytes().await?;
    let error_response: ErrorResponseBody =
        serde_json::from_slice(&bytes).unwrap_or(ErrorResponseBody::Unknown);

    let (code, detail, errors) = match error_response {
        ErrorResponseBody::Hal {
            code,
            message,
            embedded,
        } => {
            let mut errors: HashMap<String, Vec<String>> = HashMap::new();
            for field_error in embedded.map(|e| e.errors).unwrap_or_default() {
                errors
                    .entry(field_error.path.unwrap_or(field_error.code))
                    .or_default()
                    .push(field_error.message);
            }
            (Some(code), Some(message), errors)
        }
        ErrorResponseBody::OAuth {
            error,
            error_description,
        } => (Some(error), error_description, HashMap::new()),
        ErrorResponseBody::Unknown => (None, None, HashMap::new()),
    };

    Ok(ApiError {
        kind: ApiErrorKind::from_status(status.as_u16()),
        status: status.as_u16(),
        message: status.to_string(),
        code,
        detail,
        errors,
    })
}
