//! APIs and models related to customers and their documents.

mod api;
mod model;

pub use api::CustomersApi;
pub use model::*;
