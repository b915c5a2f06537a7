use crate::common::HAL_JSON_CONTENT_TYPE;
use async_trait::async_trait;
use reqwest::{
    header::{HeaderValue, ACCEPT, CONTENT_TYPE, USER_AGENT},
    Request, Response,
};
use reqwest_middleware::{Middleware, Next};
use http::Extensions;

/// Middleware to inject the `User-Agent` header and the Dwolla HAL `Accept` and `Content-Type`
/// headers to all outgoing requests, bodiless ones included.
/// Headers already set on the request (e.g. by multipart or form bodies) are left untouched.
pub struct InjectHeadersMiddleware {
    user_agent: HeaderValue,
    hal_json: HeaderValue,
}

impl InjectHeadersMiddleware {
    pub fn new() -> Self {
        Self {
            user_agent: HeaderValue::from_static(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            )),
            hal_json: HeaderValue::from_static(HAL_JSON_CONTENT_TYPE),
        }
    }
}

#[async_trait]
impl Middleware for InjectHeadersMiddleware {
    async fn handle(
        &self,
        mut req: Request,
        extensions: &mut Extensions,
        next: Next<'_>,
    ) -> reqwest_middleware::Result<Response> {
        let headers = req.headers_mut();
        headers
            .entry(USER_AGENT)
            .or_insert_with(|| self.user_agent.clone());
        headers.entry(ACCEPT).or_insert_with(|| self.hal_json.clone());
        headers
            .entry(CONTENT_TYPE)
            .or_insert_with(|| self.hal_json.clone());

        next.run(req, extensions).await
    }
}
