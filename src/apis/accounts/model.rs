use crate::apis::hal::Links;
use serde::{Deserialize, Serialize};

/// The master account tied to the API credentials.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone_offset: Option<f64>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub account_type: Option<String>,
    #[serde(rename = "_links", default, skip_serializing_if = "Links::is_empty")]
    pub links: Links,
}

/// Body of `GET /`, listing where the top-level resources live.
#[derive(Deserialize, Debug)]
pub(crate) struct Root {
    #[serde(rename = "_links", default)]
    pub(crate) links: Links,
}
