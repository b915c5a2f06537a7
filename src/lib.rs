//! An unofficial Rust client for the [Dwolla](https://www.dwolla.com) v2 API, providing
//! access to the master account, customers, funding sources and transfers.
//!
//! Check out also the official Dwolla [API documentation](https://developers.dwolla.com).
//!
//! # Usage
//!
//! ## Prerequisites
//!
//! First [sign up](https://accounts-sandbox.dwolla.com/sign-up) for a Sandbox account
//! and obtain the key and secret of your application from the dashboard.
//!
//! ## Initialize a new `DwollaClient`
//!
//! Create a new [`DwollaClient`](crate::client::DwollaClient) and provide your client credentials.
//!
//! ```rust,no_run
//! # use dwolla_rust::{DwollaClient, apis::auth::Credentials, client::Environment};
//! # #[tokio::main]
//! # async fn main() {
//! let dwolla = DwollaClient::builder(Credentials::new("some-key", "some-secret"))
//!     .with_environment(Environment::Sandbox)
//!     .build();
//! # }
//! ```
//!
//! By default, a `DwollaClient` connects to the Production environment.
//! Access tokens are obtained on the first request and refreshed automatically before expiry.
//!
//! ## Create a verified customer
//!
//! ```rust,no_run
//! # use dwolla_rust::{DwollaClient, Error, apis::customers::*};
//! # use chrono::NaiveDate;
//! #
//! # #[tokio::main]
//! # async fn main() -> Result<(), Error> {
//! # let dwolla: DwollaClient = unreachable!();
//! #
//! let request = CreateCustomerRequestBuilder::default()
//!     .first_name("Jane")
//!     .last_name("Doe")
//!     .email("jane.doe@nomail.net")
//!     .customer_type(CustomerType::Personal)
//!     .address1("99-99 33rd St")
//!     .city("Some City")
//!     .state("NY")
//!     .postal_code("11101")
//!     .date_of_birth(NaiveDate::from_ymd_opt(1970, 1, 1).unwrap())
//!     .ssn("1234")
//!     .build()
//!     .unwrap();
//!
//! let customer_id = dwolla.create_customer(&request).await?;
//! let customer = dwolla.get_customer(&customer_id).await?;
//!
//! println!("Customer {} is {:?}", customer.id, customer.status);
//! # Ok(())
//! # }
//! ```
//!
//! ## Send money
//!
//! ```rust,no_run
//! # use dwolla_rust::{DwollaClient, Error, apis::transfers::*};
//! #
//! # #[tokio::main]
//! # async fn main() -> Result<(), Error> {
//! # let dwolla: DwollaClient = unreachable!();
//! #
//! let request = CreateTransferRequestBuilder::default()
//!     .links(TransferLinks::new(
//!         "https://api-sandbox.dwolla.com/funding-sources/source-id",
//!         "https://api-sandbox.dwolla.com/funding-sources/destination-id",
//!     ))
//!     .amount(Amount::usd("10.00"))
//!     .build()
//!     .unwrap();
//!
//! let transfer_id = dwolla.create_transfer(&request).await?;
//! let transfer = dwolla.get_transfer(&transfer_id).await?;
//!
//! println!("Transfer {} is {:?}", transfer.id, transfer.status);
//! # Ok(())
//! # }
//! ```
//!
//! ## Handling errors
//!
//! Failed API calls return an [`ApiError`](crate::error::ApiError) whose
//! [`kind`](crate::error::ApiErrorKind) tells validation failures, missing permissions
//! and missing resources apart.
//!
//! ```rust,no_run
//! # use dwolla_rust::{DwollaClient, Error, error::ApiErrorKind};
//! #
//! # #[tokio::main]
//! # async fn main() -> Result<(), Error> {
//! # let dwolla: DwollaClient = unreachable!();
//! #
//! match dwolla.get_customer("some-customer-id").await {
//!     Ok(customer) => println!("Found {}", customer.email),
//!     Err(e) if e.api_error_kind() == Some(ApiErrorKind::NotFound) => println!("{}", e),
//!     Err(e) => return Err(e),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## More examples
//!
//! Look into the [`demos`](../demos) for a complete onboarding flow.
//!
//! ```shell
//! cargo run --example onboard_customer
//! ```

#![deny(missing_debug_implementations)]
#![forbid(unsafe_code)]

pub mod apis;
pub(crate) mod authenticator;
pub mod client;
mod common;
pub mod error;
mod middlewares;

pub use client::DwollaClient;
pub use error::Error;
