use crate::{
    apis::{
        transfers::{
            model::CancelTransferRequest, CreateTransferRequest, OnDemandAuthorization, Transfer,
            TransferStatus,
        },
        DwollaClientInner, Operation, RequestBuilderExt,
    },
    Error,
};
use std::sync::Arc;
use urlencoding::encode;

const CREATE: Operation = Operation::new("create transfers", "account")
    .with_invalid("invalid transfer or validation error");
const GET_BY_ID: Operation = Operation::new("retrieve the transfer", "transfer");
const CANCEL: Operation = Operation::new("cancel the transfer", "transfer")
    .with_invalid("transfer cannot be cancelled");
const CREATE_ON_DEMAND_AUTHORIZATION: Operation =
    Operation::new("create on-demand authorizations", "account");

/// Dwolla transfers APIs client.
#[derive(Clone, Debug)]
pub struct TransfersApi {
    inner: Arc<DwollaClientInner>,
}

impl TransfersApi {
    pub(crate) fn new(inner: Arc<DwollaClientInner>) -> Self {
        Self { inner }
    }

    /// Moves money between two funding sources.
    ///
    /// Returns the id of the new transfer.
    #[tracing::instrument(
        name = "Create Transfer",
        skip(self, create_transfer_request),
        fields(
            amount = %create_transfer_request.amount.value,
            currency = %create_transfer_request.amount.currency,
        )
    )]
    pub async fn create(
        &self,
        create_transfer_request: &CreateTransferRequest,
    ) -> Result<String, Error> {
        let collection = self.inner.url("/transfers/")?;

        let res = self
            .inner
            .send(
                &CREATE,
                self.inner
                    .client
                    .post(self.inner.url("/transfers")?)
                    .idempotency_key()
                    .hal_json(create_transfer_request)?,
            )
            .await?;

        CREATE.created_id(&res, &collection)
    }

    /// Gets the details of an existing transfer.
    #[tracing::instrument(name = "Get Transfer by ID", skip(self))]
    pub async fn get_by_id(&self, id: &str) -> Result<Transfer, Error> {
        let url = self.inner.url(&format!("/transfers/{}", encode(id)))?;

        let res = self
            .inner
            .send(&GET_BY_ID, self.inner.client.get(url))
            .await?;

        GET_BY_ID.decode(res).await
    }

    /// Cancels a transfer that is still pending.
    #[tracing::instrument(name = "Cancel Transfer", skip(self))]
    pub async fn cancel(&self, id: &str) -> Result<Transfer, Error> {
        let url = self.inner.url(&format!("/transfers/{}", encode(id)))?;

        let res = self
            .inner
            .send(
                &CANCEL,
                self.inner
                    .client
                    .post(url)
                    .hal_json(&CancelTransferRequest {
                        status: TransferStatus::Cancelled,
                    })?,
            )
            .await?;

        CANCEL.decode(res).await
    }

    /// Creates an authorization to debit a customer's bank account on demand.
    #[tracing::instrument(name = "Create On-Demand Authorization", skip(self))]
    pub async fn create_on_demand_authorization(&self) -> Result<OnDemandAuthorization, Error> {
        let res = self
            .inner
            .send(
                &CREATE_ON_DEMAND_AUTHORIZATION,
                self.inner
                    .client
                    .post(self.inner.url("/on-demand-authorizations")?)
                    .hal_empty(),
            )
            .await?;

        CREATE_ON_DEMAND_AUTHORIZATION.decode(res).await
    }
}
