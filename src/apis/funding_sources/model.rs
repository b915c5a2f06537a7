use crate::apis::hal::Links;
use chrono::{DateTime, Utc};
use derive_builder::Builder;
use serde::{Deserialize, Serialize};

/// A bank account or balance usable as the source or destination of a transfer.
#[derive(Serialize, Deserialize, Debug, Clone, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FundingSource {
    pub id: String,
    pub status: FundingSourceStatus,
    #[serde(rename = "type")]
    pub r#type: FundingSourceType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bank_account_type: Option<BankAccountType>,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bank_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub routing_number: Option<String>,
    pub created: DateTime<Utc>,
    /// Removed funding sources are kept by Dwolla and can still show up in listings.
    #[serde(default)]
    pub removed: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub channels: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<String>,
    #[serde(rename = "_links", default, skip_serializing_if = "Links::is_empty")]
    pub links: Links,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Eq, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub enum FundingSourceStatus {
    Unverified,
    Verified,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Eq, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub enum FundingSourceType {
    Bank,
    Balance,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Eq, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub enum BankAccountType {
    Checking,
    Savings,
    GeneralLedger,
    Loan,
}

/// Bank account to attach to a customer.
#[derive(Serialize, Deserialize, Debug, Clone, Builder)]
#[serde(rename_all = "camelCase")]
pub struct CreateFundingSourceRequest {
    #[builder(setter(into))]
    pub routing_number: String,
    #[builder(setter(into))]
    pub account_number: String,
    pub bank_account_type: BankAccountType,
    /// Arbitrary nickname for the funding source.
    #[builder(setter(into))]
    pub name: String,
    /// Processor token obtained from Plaid, used instead of micro-deposits.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(setter(into, strip_option), default)]
    pub plaid_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(setter(strip_option), default)]
    pub channels: Option<Vec<String>>,
    /// Optional `on-demand-authorization` link, required to debit the bank account.
    #[serde(rename = "_links", skip_serializing_if = "Option::is_none")]
    #[builder(setter(strip_option), default)]
    pub links: Option<Links>,
}

/// Filters applied when listing funding sources.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct ListFundingSourcesRequest {
    /// `Some(false)` hides removed funding sources; `None` returns all of them.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub removed: Option<bool>,
}

#[derive(Serialize, Debug)]
pub(crate) struct RemoveFundingSourceRequest {
    pub(crate) removed: bool,
}
