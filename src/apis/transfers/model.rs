use crate::apis::hal::{Link, Links};
use chrono::{DateTime, Utc};
use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use std::{
    collections::HashMap,
    fmt::{Display, Formatter},
};

#[derive(Serialize, Deserialize, Debug, Clone, Eq, PartialEq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Usd,
}

impl Display for Currency {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Currency::Usd => write!(f, "USD"),
        }
    }
}

/// Amount of money, as a decimal string in the major unit (e.g. `"10.50"`).
#[derive(Serialize, Deserialize, Debug, Clone, Eq, PartialEq)]
pub struct Amount {
    pub value: String,
    pub currency: Currency,
}

impl Amount {
    pub fn usd(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            currency: Currency::Usd,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Eq, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub enum TransferStatus {
    Pending,
    Processed,
    Failed,
    Cancelled,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Transfer {
    pub id: String,
    pub status: TransferStatus,
    pub amount: Amount,
    pub created: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<HashMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub individual_ach_id: Option<String>,
    #[serde(rename = "_links", default, skip_serializing_if = "Links::is_empty")]
    pub links: Links,
}

impl Transfer {
    /// Funding source the money is taken from.
    pub fn source(&self) -> Option<&Link> {
        self.links.get("source")
    }

    /// Funding source the money is sent to.
    pub fn destination(&self) -> Option<&Link> {
        self.links.get("destination")
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Eq, PartialEq)]
pub struct TransferLinks {
    pub source: Link,
    pub destination: Link,
}

impl TransferLinks {
    /// Links a source and a destination funding source by their URLs.
    pub fn new(source: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            source: Link::new(source),
            destination: Link::new(destination),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Builder)]
#[serde(rename_all = "camelCase")]
pub struct CreateTransferRequest {
    #[serde(rename = "_links")]
    pub links: TransferLinks,
    pub amount: Amount,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(setter(strip_option), default)]
    pub metadata: Option<HashMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(setter(into, strip_option), default)]
    pub correlation_id: Option<String>,
}

#[derive(Serialize, Debug)]
pub(crate) struct CancelTransferRequest {
    pub(crate) status: TransferStatus,
}

/// Authorization text to present to a customer before debiting their bank account.
#[derive(Serialize, Deserialize, Debug, Clone, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OnDemandAuthorization {
    pub body_text: String,
    pub button_text: String,
    #[serde(rename = "_links", default, skip_serializing_if = "Links::is_empty")]
    pub links: Links,
}
