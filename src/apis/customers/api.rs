use crate::{
    apis::{
        auth::Token,
        customers::{
            model::TokenResponse, CreateCustomerRequest, Customer, Document, DocumentUpload,
            ListCustomersRequest, UpdateCustomerRequest,
        },
        funding_sources::{CreateFundingSourceRequest, FundingSource, ListFundingSourcesRequest},
        transfers::Transfer,
        DwollaClientInner, Operation, RequestBuilderExt,
    },
    error::Stage,
    Error,
};
use anyhow::anyhow;
use reqwest::{
    multipart::{Form, Part},
    StatusCode,
};
use std::sync::Arc;
use urlencoding::encode;

const CREATE: Operation = Operation::new("create customers", "account")
    .with_invalid("duplicate customer or validation error");
const LIST: Operation = Operation::new("list customers", "account");
const GET_BY_ID: Operation = Operation::new("retrieve the customer", "customer account");
const UPDATE: Operation =
    Operation::new("update the customer", "customer").with_invalid("validation error");
const ADD_DOCUMENT: Operation =
    Operation::new("upload document to customer", "customer").with_invalid("invalid document");
const LIST_DOCUMENTS: Operation = Operation::new("list documents", "customer");
const GET_DOCUMENT: Operation = Operation::new("retrieve the document", "document");
const CREATE_FUNDING_SOURCE: Operation = Operation::new("create funding source", "customer")
    .with_invalid("duplicate funding source or validation error");
const CREATE_FUNDING_SOURCES_TOKEN: Operation =
    Operation::new("create a funding sources token", "customer");
const CREATE_IAV_TOKEN: Operation = Operation::new("create an IAV token", "customer");
const LIST_FUNDING_SOURCES: Operation = Operation::new("list funding sources", "customer");
const LIST_TRANSFERS: Operation = Operation::new("list transfers", "customer");

/// Dwolla customers APIs client.
#[derive(Clone, Debug)]
pub struct CustomersApi {
    inner: Arc<DwollaClientInner>,
}

impl CustomersApi {
    pub(crate) fn new(inner: Arc<DwollaClientInner>) -> Self {
        Self { inner }
    }

    /// Creates a new customer and returns its id.
    #[tracing::instrument(
        name = "Create Customer",
        skip(self, create_customer_request),
        fields(customer_type = ?create_customer_request.customer_type)
    )]
    pub async fn create(
        &self,
        create_customer_request: &CreateCustomerRequest,
    ) -> Result<String, Error> {
        let collection = self.inner.url("/customers/")?;

        let res = self
            .inner
            .send(
                &CREATE,
                self.inner
                    .client
                    .post(self.inner.url("/customers")?)
                    .idempotency_key()
                    .hal_json(create_customer_request)?,
            )
            .await?;

        CREATE.created_id(&res, &collection)
    }

    /// Lists the customers of the master account, optionally filtered.
    #[tracing::instrument(name = "List Customers", skip(self))]
    pub async fn list(&self, request: &ListCustomersRequest) -> Result<Vec<Customer>, Error> {
        let res = self
            .inner
            .send(
                &LIST,
                self.inner
                    .client
                    .get(self.inner.url("/customers")?)
                    .query(request),
            )
            .await?;

        LIST.decode_items(res, "customers").await
    }

    /// Gets the details of an existing customer.
    #[tracing::instrument(name = "Get Customer by ID", skip(self))]
    pub async fn get_by_id(&self, id: &str) -> Result<Customer, Error> {
        let res = self
            .inner
            .send(&GET_BY_ID, self.inner.client.get(self.customer_url(id, "")?))
            .await?;

        GET_BY_ID.decode(res).await
    }

    /// Submits a patch to an existing customer and returns its updated state.
    ///
    /// See [`UpdateCustomerRequest`](crate::apis::customers::UpdateCustomerRequest) for the
    /// combinations of fields Dwolla accepts.
    #[tracing::instrument(
        name = "Update Customer",
        skip(self, update_customer_request),
        fields(status = ?update_customer_request.status)
    )]
    pub async fn update(
        &self,
        id: &str,
        update_customer_request: &UpdateCustomerRequest,
    ) -> Result<Customer, Error> {
        let res = self
            .inner
            .send(
                &UPDATE,
                self.inner
                    .client
                    .post(self.customer_url(id, "")?)
                    .hal_json(update_customer_request)?,
            )
            .await?;

        UPDATE.decode(res).await
    }

    /// Uploads an identity document for a customer in `document` status.
    #[tracing::instrument(
        name = "Add Customer Document",
        skip(self, document),
        fields(
            document_type = document.document_type.as_str(),
            file_name = %document.file_name,
        )
    )]
    pub async fn add_document(&self, id: &str, document: DocumentUpload) -> Result<(), Error> {
        let build_failed = |e: reqwest::Error| ADD_DOCUMENT.fail(Stage::BuildRequest, e.into());

        let mut file = Part::bytes(document.content).file_name(document.file_name);
        if let Some(mime_type) = document.mime_type.as_deref() {
            file = file.mime_str(mime_type).map_err(build_failed)?;
        }
        let form = Form::new()
            .part("file", file)
            .text("documentType", document.document_type.as_str());

        let request = self
            .inner
            .http_client
            .post(self.customer_url(id, "/documents")?)
            .multipart(form)
            .build()
            .map_err(build_failed)?;

        let res = self.inner.execute(&ADD_DOCUMENT, request).await?;

        if res.status() != StatusCode::CREATED {
            return Err(ADD_DOCUMENT.fail(
                Stage::ReadResponse,
                Error::Other(anyhow!(
                    "Unexpected status code for document upload: {}",
                    res.status()
                )),
            ));
        }

        Ok(())
    }

    /// Lists the documents uploaded for a customer.
    #[tracing::instrument(name = "List Customer Documents", skip(self))]
    pub async fn list_documents(&self, id: &str) -> Result<Vec<Document>, Error> {
        let res = self
            .inner
            .send(
                &LIST_DOCUMENTS,
                self.inner.client.get(self.customer_url(id, "/documents")?),
            )
            .await?;

        LIST_DOCUMENTS.decode_items(res, "documents").await
    }

    /// Gets the details of an uploaded document.
    #[tracing::instrument(name = "Get Document by ID", skip(self))]
    pub async fn get_document(&self, document_id: &str) -> Result<Document, Error> {
        let url = self
            .inner
            .url(&format!("/documents/{}", encode(document_id)))?;

        let res = self
            .inner
            .send(&GET_DOCUMENT, self.inner.client.get(url))
            .await?;

        GET_DOCUMENT.decode(res).await
    }

    /// Attaches a bank account to a customer and returns the id of the new funding source.
    #[tracing::instrument(
        name = "Create Customer Funding Source",
        skip(self, create_funding_source_request),
        fields(bank_account_type = ?create_funding_source_request.bank_account_type)
    )]
    pub async fn create_funding_source(
        &self,
        id: &str,
        create_funding_source_request: &CreateFundingSourceRequest,
    ) -> Result<String, Error> {
        let collection = self.inner.url("/funding-sources/")?;

        let res = self
            .inner
            .send(
                &CREATE_FUNDING_SOURCE,
                self.inner
                    .client
                    .post(self.customer_url(id, "/funding-sources")?)
                    .idempotency_key()
                    .hal_json(create_funding_source_request)?,
            )
            .await?;

        CREATE_FUNDING_SOURCE.created_id(&res, &collection)
    }

    /// Mints a single-use token to add funding sources to a customer from the browser.
    #[tracing::instrument(name = "Create Funding Sources Token", skip(self))]
    pub async fn create_funding_sources_token(&self, id: &str) -> Result<Token, Error> {
        self.create_token(id, "/funding-sources-token", &CREATE_FUNDING_SOURCES_TOKEN)
            .await
    }

    /// Mints a single-use token for instant account verification of a customer's bank account.
    #[tracing::instrument(name = "Create IAV Token", skip(self))]
    pub async fn create_iav_token(&self, id: &str) -> Result<Token, Error> {
        self.create_token(id, "/iav-token", &CREATE_IAV_TOKEN).await
    }

    /// Lists the funding sources of a customer.
    #[tracing::instrument(name = "List Customer Funding Sources", skip(self))]
    pub async fn list_funding_sources(
        &self,
        id: &str,
        request: &ListFundingSourcesRequest,
    ) -> Result<Vec<FundingSource>, Error> {
        let res = self
            .inner
            .send(
                &LIST_FUNDING_SOURCES,
                self.inner
                    .client
                    .get(self.customer_url(id, "/funding-sources")?)
                    .query(request),
            )
            .await?;

        LIST_FUNDING_SOURCES.decode_items(res, "funding-sources").await
    }

    /// Lists the transfers of a previously fetched customer.
    ///
    /// The customer's `self` link is followed when present.
    #[tracing::instrument(name = "List Customer Transfers", skip(self, customer), fields(customer_id = %customer.id))]
    pub async fn list_transfers(&self, customer: &Customer) -> Result<Vec<Transfer>, Error> {
        let url = match customer.links.get("self") {
            Some(link) => self
                .inner
                .url(&format!("{}/transfers", link.href.trim_end_matches('/')))?,
            None => self.customer_url(&customer.id, "/transfers")?,
        };

        let res = self
            .inner
            .send(&LIST_TRANSFERS, self.inner.client.get(url))
            .await?;

        LIST_TRANSFERS.decode_items(res, "transfers").await
    }

    fn customer_url(&self, id: &str, suffix: &str) -> Result<reqwest::Url, Error> {
        self.inner
            .url(&format!("/customers/{}{}", encode(id), suffix))
    }

    async fn create_token(
        &self,
        id: &str,
        suffix: &str,
        operation: &Operation,
    ) -> Result<Token, Error> {
        let res = self
            .inner
            .send(
                operation,
                self.inner
                    .client
                    .post(self.customer_url(id, suffix)?)
                    .hal_empty(),
            )
            .await?;

        Ok(operation.decode::<TokenResponse>(res).await?.token)
    }
}
