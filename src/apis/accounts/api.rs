use crate::{
    apis::{
        accounts::{model::Root, Account},
        funding_sources::{FundingSource, ListFundingSourcesRequest},
        transfers::Transfer,
        DwollaClientInner, Operation,
    },
    error::Stage,
    Error,
};
use anyhow::anyhow;
use std::sync::Arc;
use urlencoding::encode;

const RETRIEVE: Operation = Operation::new("retrieve the account", "account");
const LIST_FUNDING_SOURCES: Operation = Operation::new("list funding sources", "account");
const LIST_TRANSFERS: Operation = Operation::new("list transfers", "account");

/// Dwolla master account APIs client.
#[derive(Clone, Debug)]
pub struct AccountsApi {
    inner: Arc<DwollaClientInner>,
}

impl AccountsApi {
    pub(crate) fn new(inner: Arc<DwollaClientInner>) -> Self {
        Self { inner }
    }

    /// Retrieves the master account tied to the client credentials.
    ///
    /// The account URL is discovered through the `account` link of the API root.
    #[tracing::instrument(name = "Retrieve Account", skip(self))]
    pub async fn retrieve(&self) -> Result<Account, Error> {
        let res = self
            .inner
            .send(&RETRIEVE, self.inner.client.get(self.inner.url("/")?))
            .await?;
        let root: Root = RETRIEVE.decode(res).await?;

        let account_link = root
            .links
            .get("account")
            .ok_or_else(|| {
                RETRIEVE.fail(
                    Stage::ReadResponse,
                    Error::Other(anyhow!("Missing account link in API root")),
                )
            })?;

        let res = self
            .inner
            .send(
                &RETRIEVE,
                self.inner.client.get(self.inner.url(&account_link.href)?),
            )
            .await?;

        RETRIEVE.decode(res).await
    }

    /// Lists the funding sources of the master account.
    #[tracing::instrument(name = "List Account Funding Sources", skip(self))]
    pub async fn list_funding_sources(
        &self,
        account_id: &str,
        request: &ListFundingSourcesRequest,
    ) -> Result<Vec<FundingSource>, Error> {
        let url = self
            .inner
            .url(&format!("/accounts/{}/funding-sources", encode(account_id)))?;

        let res = self
            .inner
            .send(&LIST_FUNDING_SOURCES, self.inner.client.get(url).query(request))
            .await?;

        LIST_FUNDING_SOURCES.decode_items(res, "funding-sources").await
    }

    /// Lists the transfers the master account took part in.
    #[tracing::instrument(name = "List Account Transfers", skip(self))]
    pub async fn list_transfers(&self, account_id: &str) -> Result<Vec<Transfer>, Error> {
        let url = self
            .inner
            .url(&format!("/accounts/{}/transfers", encode(account_id)))?;

        let res = self
            .inner
            .send(&LIST_TRANSFERS, self.inner.client.get(url))
            .await?;

        LIST_TRANSFERS.decode_items(res, "transfers").await
    }
}
