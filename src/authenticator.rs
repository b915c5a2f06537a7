use crate::{
    apis::{
        auth::{AccessToken, AuthenticationResult, Credentials},
        decode_json,
    },
    error::Error,
};
use anyhow::anyhow;
use chrono::{Duration, Utc};
use reqwest::{header::ACCEPT, Url};
use reqwest_middleware::ClientWithMiddleware;
use tokio::sync::{mpsc, oneshot};

/// Manager for credentials and access tokens.
#[derive(Debug, Clone)]
pub struct Authenticator {
    tx: mpsc::UnboundedSender<oneshot::Sender<Result<AuthenticationResult, Error>>>,
    pub(crate) client_id: String,
}

impl Authenticator {
    /// Starts a new authenticator with the given credentials.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn new(client: ClientWithMiddleware, api_url: Url, credentials: Credentials) -> Self {
        let client_id = credentials.client_id().to_string();
        let state = AuthenticatorState {
            client,
            api_url,
            credentials,
            access_token: None,
        };

        // Spawn a long running task which will run until the authenticator is dropped
        let (tx, rx) = mpsc::unbounded_channel();
        #[cfg(test)]
        tests::mocked_time::spawn(async move {
            // We need to propagate the mocked time task-local in order to control time in the tests
            process_loop(state, rx).await;
        });
        #[cfg(not(test))]
        tokio::spawn(async move {
            process_loop(state, rx).await;
        });

        Self { tx, client_id }
    }

    /// Returns the current access token used for authentication against the Dwolla APIs.
    /// If there's no access token available, or the available one is about to expire,
    /// a new one will be requested from the server using the configured client credentials.
    ///
    /// Concurrent calls to `get_access_token` are processed one at a time, so that
    /// at most one token request is in flight.
    ///
    /// If the client is already authenticated, this is a no-op.
    pub async fn get_access_token(&self) -> Result<AuthenticationResult, Error> {
        let (tx, rx) = oneshot::channel();
        self.tx
            .send(tx)
            .map_err(|_| Error::Other(anyhow!("Authenticator task is not running")))?;

        rx.await
            .map_err(|_| Error::Other(anyhow!("Authenticator task dropped the request")))?
            .map_err(|e| Error::AuthenticationError(Box::new(e)))
    }
}

/// Internal state of the authenticator.
struct AuthenticatorState {
    client: ClientWithMiddleware,
    api_url: Url,
    credentials: Credentials,
    access_token: Option<AccessToken>,
}

async fn process_loop(
    mut state: AuthenticatorState,
    mut rx: mpsc::UnboundedReceiver<oneshot::Sender<Result<AuthenticationResult, Error>>>,
) {
    // Loop waiting for commands from the main client
    while let Some(reply) = rx.recv().await {
        if reply
            .send(process_get_access_token(&mut state).await)
            .is_err()
        {
            tracing::warn!("Receiver dropped before the reply");
        }
    }
}

#[tracing::instrument(name = "Get Access Token", level = "debug", skip(state))]
async fn process_get_access_token(
    state: &mut AuthenticatorState,
) -> Result<AuthenticationResult, Error> {
    // If we are already authenticated, do nothing
    if let Some(token) = &state.access_token {
        if !should_refresh_token(token) {
            tracing::debug!("Reusing existing access token");
            return Ok(AuthenticationResult {
                access_token: token.clone(),
            });
        }
    }

    let token_url = state
        .api_url
        .join("/token")
        .map_err(|e| Error::Other(anyhow!("Invalid token URL: {}", e)))?;

    // Client credentials grant, with the credentials sent as HTTP basic auth
    let response = state
        .client
        .post(token_url)
        .basic_auth(
            state.credentials.client_id(),
            Some(state.credentials.client_secret().expose_secret()),
        )
        .header(ACCEPT, "application/json")
        .form(&[("grant_type", "client_credentials")])
        .send()
        .await?;
    let res: RawAuthenticationResponse = decode_json(response).await?;

    if !res.token_type.eq_ignore_ascii_case("bearer") {
        return Err(Error::Other(anyhow!(
            "Unsupported access token type: {}",
            res.token_type,
        )));
    }

    // Store the access token
    let token = AccessToken {
        token: res.access_token.into(),
        expires_at: Some(now() + Duration::seconds(res.expires_in)),
    };
    state.access_token = Some(token.clone());

    tracing::info!("Got new access token");

    Ok(AuthenticationResult {
        access_token: token,
    })
}

/// Returns `true` if the token is close to expiration (10 minutes before actual expiration)
/// and should be refreshed. If this token does not expire, this function always returns `false`.
fn should_refresh_token(token: &AccessToken) -> bool {
    token.expires_at.map_or(false, |expires_at| {
        now() >= expires_at - Duration::minutes(10)
    })
}

// Select an implementation of `now()` depending on whether we are testing or not
#[cfg(not(test))]
fn now() -> chrono::DateTime<Utc> {
    Utc::now()
}
#[cfg(test)]
use tests::mocked_time::now;

/// Successful response of an authentication request.
#[derive(serde::Deserialize)]
struct RawAuthenticationResponse {
    access_token: String,
    expires_in: i64,
    token_type: String,
}
