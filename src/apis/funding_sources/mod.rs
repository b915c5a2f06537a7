//! APIs and models related to funding sources.

mod api;
mod model;

pub use api::FundingSourcesApi;
pub use model::*;
