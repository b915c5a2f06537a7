use crate::common::mock_server::DwollaMockServer;
use dwolla_rust::{apis::auth::Credentials, client::Environment, DwollaClient};
use uuid::Uuid;

pub struct TestContext {
    pub client: DwollaClient,
    pub account_id: String,
    mock_server: DwollaMockServer,
}

impl TestContext {
    pub async fn start() -> Self {
        // Generate a new set of random credentials for this specific test
        let client_id = Uuid::new_v4().to_string();
        let client_secret = Uuid::new_v4().to_string();

        // Setup a new mock server
        let mock_server = DwollaMockServer::start(&client_id, &client_secret).await;

        // Configure a new DwollaClient to point to the mock server
        let client = DwollaClient::builder(Credentials::new(client_id, client_secret))
            .with_environment(Environment::from_single_url(mock_server.url()))
            .build();

        Self {
            client,
            account_id: mock_server.account_id().to_string(),
            mock_server,
        }
    }

    pub fn dwolla_environment(&self) -> Environment {
        Environment::from_single_url(self.mock_server.url())
    }
}
