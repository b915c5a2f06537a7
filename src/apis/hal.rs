//! Hypermedia (HAL) primitives shared by all Dwolla resources.

use crate::Error;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::collections::HashMap;

/// A named URL supplied by Dwolla, used to navigate to related resources.
#[derive(Serialize, Deserialize, Debug, Clone, Eq, PartialEq)]
pub struct Link {
    pub href: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
    #[serde(rename = "resource-type", skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
}

impl Link {
    /// Builds a link pointing to the given URL.
    pub fn new(href: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            media_type: None,
            resource_type: None,
        }
    }
}

/// Links attached to a resource, keyed by relation name (e.g. `self`, `funding-sources`).
pub type Links = HashMap<String, Link>;

/// Envelope returned by list endpoints.
#[derive(Deserialize, Debug)]
pub(crate) struct HalCollection {
    #[serde(rename = "_embedded", default)]
    embedded: HashMap<String, serde_json::Value>,
}

impl HalCollection {
    /// Decodes the items stored under `key`.
    ///
    /// A missing key is treated as an empty collection.
    pub(crate) fn into_items<T: DeserializeOwned>(mut self, key: &str) -> Result<Vec<T>, Error> {
        match self.embedded.remove(key) {
            Some(items) => Ok(serde_json::from_value(items)?),
            None => Ok(Vec::new()),
        }
    }
}
