use crate::{
    apis::{
        funding_sources::{model::RemoveFundingSourceRequest, FundingSource},
        DwollaClientInner, Operation, RequestBuilderExt,
    },
    Error,
};
use std::sync::Arc;
use urlencoding::encode;

const GET_BY_ID: Operation = Operation::new("retrieve the funding source", "funding source");
const REMOVE: Operation = Operation::new("remove the funding source", "funding source")
    .with_invalid("funding source cannot be removed");

/// Dwolla funding sources APIs client.
#[derive(Clone, Debug)]
pub struct FundingSourcesApi {
    inner: Arc<DwollaClientInner>,
}

impl FundingSourcesApi {
    pub(crate) fn new(inner: Arc<DwollaClientInner>) -> Self {
        Self { inner }
    }

    /// Gets the details of an existing funding source.
    #[tracing::instrument(name = "Get Funding Source by ID", skip(self))]
    pub async fn get_by_id(&self, id: &str) -> Result<FundingSource, Error> {
        let url = self.inner.url(&format!("/funding-sources/{}", encode(id)))?;

        let res = self
            .inner
            .send(&GET_BY_ID, self.inner.client.get(url))
            .await?;

        GET_BY_ID.decode(res).await
    }

    /// Soft-removes a funding source. Dwolla keeps it around flagged as `removed`.
    #[tracing::instrument(name = "Remove Funding Source", skip(self))]
    pub async fn remove(&self, id: &str) -> Result<FundingSource, Error> {
        let url = self.inner.url(&format!("/funding-sources/{}", encode(id)))?;

        let res = self
            .inner
            .send(
                &REMOVE,
                self.inner
                    .client
                    .post(url)
                    .hal_json(&RemoveFundingSourceRequest { removed: true })?,
            )
            .await?;

        REMOVE.decode(res).await
    }
}
