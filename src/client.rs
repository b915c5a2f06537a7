//! Module containing the main Dwolla API client.

use crate::{
    apis::{
        accounts::{Account, AccountsApi},
        auth::{AuthApi, Credentials},
        customers::{
            CreateCustomerRequest, Customer, CustomersApi, Document, ListCustomersRequest,
        },
        funding_sources::{FundingSource, FundingSourcesApi},
        transfers::{CreateTransferRequest, OnDemandAuthorization, Transfer, TransfersApi},
        DwollaClientInner,
    },
    authenticator::Authenticator,
    common::{DEFAULT_API_URL, DEFAULT_SANDBOX_API_URL},
    middlewares::{
        authentication::AuthenticationMiddleware, error_handling::ErrorHandlingMiddleware,
        inject_headers::InjectHeadersMiddleware,
    },
    Error,
};
use anyhow::anyhow;
use reqwest::Url;
use reqwest_middleware::ClientWithMiddleware;
use reqwest_tracing::TracingMiddleware;
use std::{str::FromStr, sync::Arc};

/// Client for Dwolla public APIs.
///
/// Every operation is a single HTTP round trip. Failed requests are never retried.
#[derive(Debug, Clone)]
pub struct DwollaClient {
    /// Authentication APIs client.
    pub auth: AuthApi,
    /// Master account APIs client.
    pub accounts: AccountsApi,
    /// Customers APIs client.
    pub customers: CustomersApi,
    /// Funding sources APIs client.
    pub funding_sources: FundingSourcesApi,
    /// Transfers APIs client.
    pub transfers: TransfersApi,
}

impl DwollaClient {
    /// Builds a new [`DwollaClient`](crate::client::DwollaClient) with the default configuration.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn new(credentials: Credentials) -> DwollaClient {
        DwollaClientBuilder::new(credentials).build()
    }

    /// Returns a new builder to configure a new [`DwollaClient`](crate::client::DwollaClient).
    pub fn builder(credentials: Credentials) -> DwollaClientBuilder {
        DwollaClientBuilder::new(credentials)
    }

    /// Shortcut for [`AccountsApi::retrieve`](crate::apis::accounts::AccountsApi::retrieve).
    pub async fn retrieve_account(&self) -> Result<Account, Error> {
        self.accounts.retrieve().await
    }

    /// Shortcut for [`CustomersApi::create`](crate::apis::customers::CustomersApi::create).
    pub async fn create_customer(&self, request: &CreateCustomerRequest) -> Result<String, Error> {
        self.customers.create(request).await
    }

    /// Shortcut for [`CustomersApi::list`](crate::apis::customers::CustomersApi::list)
    /// without any filter.
    pub async fn list_customers(&self) -> Result<Vec<Customer>, Error> {
        self.customers.list(&ListCustomersRequest::default()).await
    }

    /// Shortcut for [`CustomersApi::get_by_id`](crate::apis::customers::CustomersApi::get_by_id).
    pub async fn get_customer(&self, customer_id: &str) -> Result<Customer, Error> {
        self.customers.get_by_id(customer_id).await
    }

    /// Shortcut for [`CustomersApi::get_document`](crate::apis::customers::CustomersApi::get_document).
    pub async fn get_document(&self, document_id: &str) -> Result<Document, Error> {
        self.customers.get_document(document_id).await
    }

    /// Shortcut for [`FundingSourcesApi::get_by_id`](crate::apis::funding_sources::FundingSourcesApi::get_by_id).
    pub async fn get_funding_source(&self, funding_source_id: &str) -> Result<FundingSource, Error> {
        self.funding_sources.get_by_id(funding_source_id).await
    }

    /// Shortcut for [`TransfersApi::create`](crate::apis::transfers::TransfersApi::create).
    pub async fn create_transfer(&self, request: &CreateTransferRequest) -> Result<String, Error> {
        self.transfers.create(request).await
    }

    /// Shortcut for [`TransfersApi::get_by_id`](crate::apis::transfers::TransfersApi::get_by_id).
    pub async fn get_transfer(&self, transfer_id: &str) -> Result<Transfer, Error> {
        self.transfers.get_by_id(transfer_id).await
    }

    /// Shortcut for [`TransfersApi::create_on_demand_authorization`](crate::apis::transfers::TransfersApi::create_on_demand_authorization).
    pub async fn create_on_demand_authorization(&self) -> Result<OnDemandAuthorization, Error> {
        self.transfers.create_on_demand_authorization().await
    }
}

/// Builder for a [`DwollaClient`](crate::client::DwollaClient).
#[derive(Debug)]
pub struct DwollaClientBuilder {
    client: reqwest::Client,
    environment: Environment,
    credentials: Credentials,
}

impl DwollaClientBuilder {
    /// Creates a new builder to configure a [`DwollaClient`](crate::client::DwollaClient).
    pub fn new(credentials: Credentials) -> Self {
        Self {
            client: reqwest::Client::new(),
            environment: Environment::Production,
            credentials,
        }
    }

    /// Consumes the builder and builds a new [`DwollaClient`](crate::client::DwollaClient).
    ///
    /// Must be called from within a Tokio runtime.
    pub fn build(self) -> DwollaClient {
        let inner = Arc::new(build_inner(self.client, self.environment, self.credentials));

        DwollaClient {
            auth: AuthApi::new(inner.clone()),
            accounts: AccountsApi::new(inner.clone()),
            customers: CustomersApi::new(inner.clone()),
            funding_sources: FundingSourcesApi::new(inner.clone()),
            transfers: TransfersApi::new(inner),
        }
    }

    /// Sets a specific reqwest [`Client`](reqwest::Client) to use.
    ///
    /// Timeouts and proxies configured on the client apply to every request.
    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    /// Sets the environment to which this client should connect.
    ///
    /// Defaults to: [`Environment::Production`](crate::client::Environment::Production).
    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }
}

/// Assembles the shared state used by every API client.
pub(crate) fn build_inner(
    client: reqwest::Client,
    environment: Environment,
    credentials: Credentials,
) -> DwollaClientInner {
    let authenticator = Authenticator::new(
        build_client_with_middleware(client.clone(), None),
        environment.api_url(),
        credentials,
    );

    let auth_middleware = AuthenticationMiddleware {
        authenticator: authenticator.clone(),
    };

    DwollaClientInner {
        client: build_client_with_middleware(client.clone(), Some(auth_middleware)),
        http_client: client,
        authenticator,
        environment,
    }
}

fn build_client_with_middleware(
    client: reqwest::Client,
    auth_middleware: Option<AuthenticationMiddleware>,
) -> ClientWithMiddleware {
    let mut builder = reqwest_middleware::ClientBuilder::new(client)
        .with(TracingMiddleware::default())
        .with(ErrorHandlingMiddleware)
        .with(InjectHeadersMiddleware::new());

    if let Some(auth_middleware) = auth_middleware {
        builder = builder.with(auth_middleware);
    }

    builder.build()
}

/// Dwolla environment to which a [`DwollaClient`](crate::client::DwollaClient) should connect.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Environment {
    /// Dwolla production environment.
    Production,
    /// Dwolla sandbox environment.
    Sandbox,
    /// Custom environment, mostly used to point to a local mock server.
    Custom { api_url: Url },
}

impl Environment {
    /// Builds a custom environment where all the APIs are served from the given URL.
    pub fn from_single_url(url: &Url) -> Environment {
        Environment::Custom {
            api_url: url.clone(),
        }
    }

    /// Root URL of the Dwolla APIs, token endpoint included.
    pub fn api_url(&self) -> Url {
        match self {
            Environment::Production => Url::parse(DEFAULT_API_URL).unwrap(),
            Environment::Sandbox => Url::parse(DEFAULT_SANDBOX_API_URL).unwrap(),
            Environment::Custom { api_url } => api_url.clone(),
        }
    }
}

impl FromStr for Environment {
    type Err = Error;

    /// Parses the environment names used by Dwolla, `production` and `sandbox`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "production" => Ok(Environment::Production),
            "sandbox" => Ok(Environment::Sandbox),
            other => Err(Error::Other(anyhow!("Unknown Dwolla environment: {}", other))),
        }
    }
}
