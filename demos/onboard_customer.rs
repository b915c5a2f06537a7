use anyhow::Context;
use chrono::NaiveDate;
use dwolla_rust::{
    apis::{
        auth::Credentials,
        customers::{CreateCustomerRequestBuilder, CustomerType},
        funding_sources::{
            BankAccountType, CreateFundingSourceRequestBuilder, FundingSourceStatus,
            FundingSourceType, ListFundingSourcesRequest,
        },
        transfers::{Amount, CreateTransferRequestBuilder, TransferLinks},
    },
    client::Environment,
    DwollaClient,
};
use url::Url;

#[derive(serde::Deserialize, Debug)]
struct Config {
    client_id: String,
    client_secret: String,
    #[serde(default = "default_environment")]
    environment: String,
    customer_email: String,
}

fn default_environment() -> String {
    "sandbox".to_string()
}

impl Config {
    /// Reads `config.{toml,json,yaml}` if present, overridden by `DWOLLA_*` environment variables.
    fn read() -> anyhow::Result<Self> {
        config::Config::builder()
            .add_source(config::File::with_name("config").required(false))
            .add_source(config::Environment::with_prefix("DWOLLA"))
            .build()?
            .try_deserialize()
            .context("Failed to assemble the required configuration")
    }
}

async fn run() -> anyhow::Result<()> {
    let config = Config::read()?;
    let environment: Environment = config.environment.parse()?;

    // Setup Dwolla client
    let dwolla = DwollaClient::builder(Credentials::new(config.client_id, config.client_secret))
        .with_environment(environment.clone())
        .build();

    // Find the balance of the master account
    let account = dwolla.retrieve_account().await?;
    tracing::info!("Master account {} ({})", account.id, account.name);

    let balance = dwolla
        .accounts
        .list_funding_sources(
            &account.id,
            &ListFundingSourcesRequest {
                removed: Some(false),
            },
        )
        .await?
        .into_iter()
        .find(|fs| {
            fs.r#type == FundingSourceType::Balance && fs.status == FundingSourceStatus::Verified
        })
        .context("Cannot find a verified balance on the master account")?;

    // Onboard a new personal verified customer
    let customer_id = dwolla
        .create_customer(
            &CreateCustomerRequestBuilder::default()
                .first_name("Jane")
                .last_name("Merchant")
                .email(config.customer_email)
                .customer_type(CustomerType::Personal)
                .address1("99-99 33rd St")
                .city("Some City")
                .state("NY")
                .postal_code("11101")
                .date_of_birth(NaiveDate::from_ymd_opt(1970, 1, 1).context("Invalid date")?)
                .ssn("1234")
                .build()?,
        )
        .await?;
    let customer = dwolla.get_customer(&customer_id).await?;
    tracing::info!("Created customer {}: {:?}", customer.id, customer.status);

    // Attach a bank account
    let bank_account_id = dwolla
        .customers
        .create_funding_source(
            &customer.id,
            &CreateFundingSourceRequestBuilder::default()
                .routing_number("222222226")
                .account_number("123456789")
                .bank_account_type(BankAccountType::Checking)
                .name("Jane Merchant - Checking")
                .build()?,
        )
        .await?;
    tracing::info!("Attached bank account {}", bank_account_id);

    // Send the new customer some money
    let api_url: Url = environment.api_url();
    let transfer_id = dwolla
        .create_transfer(
            &CreateTransferRequestBuilder::default()
                .links(TransferLinks::new(
                    api_url.join(&format!("/funding-sources/{}", balance.id))?.to_string(),
                    api_url.join(&format!("/funding-sources/{}", bank_account_id))?.to_string(),
                ))
                .amount(Amount::usd("1.00"))
                .build()?,
        )
        .await?;

    let transfer = dwolla.get_transfer(&transfer_id).await?;
    tracing::info!("{:#?}", transfer);

    Ok(())
}

#[tokio::main]
async fn main() {
    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_max_level(tracing::Level::INFO)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Setting default subscriber failed");

    if let Err(e) = run().await {
        tracing::error!("Fatal error: {:?}", e);
        std::process::exit(1);
    }
}
