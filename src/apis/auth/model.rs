use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::ops::Deref;

/// Application credentials used to obtain access tokens with the OAuth2 client credentials grant.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: Token,
}

impl Credentials {
    /// Builds a new set of client credentials.
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<Token>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }

    /// Returns a reference to the client id stored in these [`Credentials`](crate::apis::auth::Credentials).
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// Returns a reference to the client secret stored in these [`Credentials`](crate::apis::auth::Credentials).
    pub fn client_secret(&self) -> &Token {
        &self.client_secret
    }
}

/// Result of an authentication request.
#[derive(Clone, Debug)]
pub struct AuthenticationResult {
    pub(crate) access_token: AccessToken,
}

impl AuthenticationResult {
    /// Returns a reference to the [`AccessToken`](crate::apis::auth::AccessToken) returned by the authentication server.
    pub fn access_token(&self) -> &AccessToken {
        &self.access_token
    }
}

/// Opaque bearer token used to authenticate to Dwolla APIs.
#[derive(Clone, Debug)]
pub struct AccessToken {
    pub(crate) token: Token,
    pub(crate) expires_at: Option<DateTime<Utc>>,
}

impl AccessToken {
    /// Actual token contents held by this `AccessToken` instance.
    pub fn token(&self) -> &Token {
        &self.token
    }

    /// Expiration date of the token.
    ///
    /// Returns `None` if this token does not expire.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }
}

impl Deref for AccessToken {
    type Target = Token;

    fn deref(&self) -> &Self::Target {
        self.token()
    }
}

/// Secret string, such as a client secret, an access token or a customer's SSN.
///
/// Printing a `Token` with `Debug` never reveals its contents. Serializing it does,
/// since secrets like `ssn` have to be sent in request bodies.
///
/// ```rust
/// # use dwolla_rust::apis::auth::Token;
/// let ssn = Token::from("123-45-6789");
///
/// assert!(!format!("{:?}", ssn).contains("6789"));
/// assert_eq!(serde_json::to_string(&ssn).unwrap(), "\"123-45-6789\"");
/// assert_eq!(ssn.expose_secret(), "123-45-6789");
/// ```
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Token(#[serde(serialize_with = "serialize_secret")] Secret<String>);

impl Token {
    /// Wraps a secret string in a new `Token`.
    pub fn new<T: Into<String>>(s: T) -> Self {
        Self(Secret::new(s.into()))
    }

    /// Exposes a reference to the underlying secret string.
    pub fn expose_secret(&self) -> &str {
        self.0.expose_secret()
    }
}

impl<T> From<T> for Token
where
    T: Into<String>,
{
    fn from(s: T) -> Self {
        Token::new(s)
    }
}

fn serialize_secret<S>(secret: &Secret<String>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::ser::Serializer,
{
    secret.expose_secret().serialize(serializer)
}
