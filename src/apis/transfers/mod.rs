//! APIs and models related to transfers.

mod api;
mod model;

pub use api::TransfersApi;
pub use model::*;
