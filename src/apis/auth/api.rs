use crate::{
    apis::{auth::AuthenticationResult, DwollaClientInner},
    Error,
};
use std::sync::Arc;

/// Dwolla authentication API client.
#[derive(Debug, Clone)]
pub struct AuthApi {
    inner: Arc<DwollaClientInner>,
}

impl AuthApi {
    pub(crate) fn new(inner: Arc<DwollaClientInner>) -> Self {
        Self { inner }
    }

    /// Returns the current [`AccessToken`](crate::apis::auth::AccessToken) used to authenticate to the Dwolla APIs.
    /// If the client is not authenticated yet, or the cached token is about to expire,
    /// a new authentication request using the configured credentials will be fired.
    pub async fn get_access_token(&self) -> Result<AuthenticationResult, Error> {
        self.inner.authenticator.get_access_token().await
    }
}
