use crate::common::mock_server::{MockServerConfiguration, MockServerStorage};
use actix_web::{http::header::LOCATION, web, HttpResponse};
use chrono::Utc;
use dwolla_rust::apis::{
    customers::{
        CreateCustomerRequest, Customer, CustomerStatus, CustomerStatusChange, CustomerType,
        Document, DocumentStatus, DocumentType, ListCustomersRequest, UpdateCustomerRequest,
    },
    funding_sources::{
        CreateFundingSourceRequest, FundingSource, FundingSourceStatus, FundingSourceType,
        ListFundingSourcesRequest,
    },
    hal::{Link, Links},
    transfers::{CreateTransferRequest, Transfer, TransferStatus},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

#[derive(Deserialize)]
pub(super) struct TokenRequest {
    grant_type: String,
}

#[derive(Deserialize)]
pub(super) struct RemoveFundingSourceRequest {
    removed: bool,
}

#[derive(Deserialize)]
pub(super) struct CancelTransferRequest {
    status: TransferStatus,
}

fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(json!({
        "code": "NotFound",
        "message": "The requested resource was not found."
    }))
}

fn validation_error(path: &str, message: &str) -> HttpResponse {
    HttpResponse::BadRequest().json(json!({
        "code": "ValidationError",
        "message": "Validation error(s) present. See embedded errors list for more details.",
        "_embedded": {
            "errors": [{
                "code": "Invalid",
                "message": message,
                "path": path
            }]
        }
    }))
}

fn created(configuration: &MockServerConfiguration, path: &str) -> HttpResponse {
    HttpResponse::Created()
        .insert_header((LOCATION, configuration.link(path).href))
        .finish()
}

fn collection<T: Serialize>(key: &str, items: Vec<T>) -> HttpResponse {
    let total = items.len();
    HttpResponse::Ok().json(json!({
        "_embedded": { key: items },
        "total": total
    }))
}

fn self_links(configuration: &MockServerConfiguration, path: &str) -> Links {
    [("self".to_string(), configuration.link(path))]
        .into_iter()
        .collect()
}

/// Id of the resource a link points to.
fn linked_id(link: &Link) -> &str {
    link.href.trim_end_matches('/').rsplit('/').next().unwrap_or_default()
}

fn is_verified_type(customer_type: CustomerType) -> bool {
    matches!(customer_type, CustomerType::Personal | CustomerType::Business)
}

/// POST /token
pub(super) async fn post_token(
    configuration: web::Data<MockServerConfiguration>,
    form: web::Form<TokenRequest>,
) -> HttpResponse {
    if form.grant_type != "client_credentials" {
        return HttpResponse::BadRequest().json(json!({
            "error": "unsupported_grant_type"
        }));
    }

    HttpResponse::Ok().json(json!({
        "access_token": configuration.access_token,
        "token_type": "bearer",
        "expires_in": 3600
    }))
}

/// GET /
pub(super) async fn get_root(configuration: web::Data<MockServerConfiguration>) -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "_links": {
            "account": configuration.link(&format!("/accounts/{}", configuration.account.id))
        }
    }))
}

/// GET /accounts/{id}
pub(super) async fn get_account(
    configuration: web::Data<MockServerConfiguration>,
    path: web::Path<String>,
) -> HttpResponse {
    if path.into_inner() != configuration.account.id {
        return not_found();
    }

    HttpResponse::Ok().json(&configuration.account)
}

/// GET /accounts/{id}/funding-sources
pub(super) async fn list_account_funding_sources(
    configuration: web::Data<MockServerConfiguration>,
    storage: web::Data<MockServerStorage>,
    path: web::Path<String>,
    query: web::Query<ListFundingSourcesRequest>,
) -> HttpResponse {
    if path.into_inner() != configuration.account.id {
        return not_found();
    }

    let funding_sources = storage
        .read()
        .unwrap()
        .funding_sources
        .values()
        .filter(|(owner, fs)| owner.is_none() && query.removed.map_or(true, |r| fs.removed == r))
        .map(|(_, fs)| fs.clone())
        .collect::<Vec<_>>();

    collection("funding-sources", funding_sources)
}

/// GET /accounts/{id}/transfers
pub(super) async fn list_account_transfers(
    configuration: web::Data<MockServerConfiguration>,
    storage: web::Data<MockServerStorage>,
    path: web::Path<String>,
) -> HttpResponse {
    if path.into_inner() != configuration.account.id {
        return not_found();
    }

    list_transfers_of(&storage, None)
}

/// POST /customers
pub(super) async fn create_customer(
    configuration: web::Data<MockServerConfiguration>,
    storage: web::Data<MockServerStorage>,
    body: web::Json<CreateCustomerRequest>,
) -> HttpResponse {
    let body = body.into_inner();
    let mut storage = storage.write().unwrap();

    if storage
        .customers
        .values()
        .any(|c| c.email.eq_ignore_ascii_case(&body.email))
    {
        return validation_error("/email", "Email already exists.");
    }

    let customer_type = body.customer_type.unwrap_or(CustomerType::Unverified);
    if customer_type == CustomerType::Personal && body.date_of_birth.is_none() {
        return validation_error("/dateOfBirth", "DateOfBirth required.");
    }

    let id = Uuid::new_v4().to_string();
    let path = format!("/customers/{}", id);
    storage.customers.insert(
        id.clone(),
        Customer {
            id,
            first_name: body.first_name,
            last_name: body.last_name,
            email: body.email,
            r#type: customer_type,
            status: if is_verified_type(customer_type) {
                CustomerStatus::Verified
            } else {
                CustomerStatus::Unverified
            },
            created: Utc::now(),
            business_name: body.business_name,
            address1: body.address1,
            address2: body.address2,
            city: body.city,
            state: body.state,
            postal_code: body.postal_code,
            phone: body.phone,
            correlation_id: body.correlation_id,
            links: self_links(&configuration, &path),
        },
    );

    created(&configuration, &path)
}

/// GET /customers
pub(super) async fn list_customers(
    storage: web::Data<MockServerStorage>,
    query: web::Query<ListCustomersRequest>,
) -> HttpResponse {
    let search = query.search.as_deref().map(str::to_lowercase);

    let mut customers = storage
        .read()
        .unwrap()
        .customers
        .values()
        .filter(|c| {
            query
                .email
                .as_deref()
                .map_or(true, |email| c.email.eq_ignore_ascii_case(email))
        })
        .filter(|c| query.status.map_or(true, |status| c.status == status))
        .filter(|c| {
            search.as_deref().map_or(true, |search| {
                [
                    Some(c.first_name.as_str()),
                    Some(c.last_name.as_str()),
                    Some(c.email.as_str()),
                    c.business_name.as_deref(),
                ]
                .into_iter()
                .flatten()
                .any(|field| field.to_lowercase().contains(search))
            })
        })
        .cloned()
        .collect::<Vec<_>>();
    customers.sort_by(|a, b| b.created.cmp(&a.created));

    collection("customers", customers)
}

/// GET /customers/{id}
pub(super) async fn get_customer(
    storage: web::Data<MockServerStorage>,
    path: web::Path<String>,
) -> HttpResponse {
    storage
        .read()
        .unwrap()
        .customers
        .get(&path.into_inner())
        .map_or_else(not_found, |customer| HttpResponse::Ok().json(customer))
}

/// POST /customers/{id}
pub(super) async fn update_customer(
    storage: web::Data<MockServerStorage>,
    path: web::Path<String>,
    body: web::Json<UpdateCustomerRequest>,
) -> HttpResponse {
    let body = body.into_inner();
    let mut guard = storage.write().unwrap();
    let storage = &mut *guard;

    let id = path.into_inner();
    if let Some(email) = body.email.as_deref() {
        if storage
            .customers
            .values()
            .any(|c| c.id != id && c.email.eq_ignore_ascii_case(email))
        {
            return validation_error("/email", "Email already exists.");
        }
        if !email.contains('@') {
            return validation_error("/email", "Email invalid.");
        }
    }

    let customer = match storage.customers.get_mut(&id) {
        Some(customer) => customer,
        None => return not_found(),
    };

    if customer.status == CustomerStatus::Deactivated
        && body.status != Some(CustomerStatusChange::Reactivated)
    {
        return validation_error("/status", "Customer is deactivated.");
    }

    match body.status {
        Some(CustomerStatusChange::Suspended) => customer.status = CustomerStatus::Suspended,
        Some(CustomerStatusChange::Deactivated) => customer.status = CustomerStatus::Deactivated,
        Some(CustomerStatusChange::Reactivated) => {
            customer.status = if is_verified_type(customer.r#type) {
                CustomerStatus::Verified
            } else {
                CustomerStatus::Unverified
            }
        }
        None => {}
    }

    if let Some(customer_type) = body.customer_type {
        customer.r#type = customer_type;
        if is_verified_type(customer_type) {
            customer.status = CustomerStatus::Verified;
        }
    }

    macro_rules! apply {
        ($($field:ident),*) => {
            $(if let Some(value) = body.$field { customer.$field = value.into(); })*
        };
    }
    apply!(first_name, last_name, email);
    apply!(
        business_name,
        address1,
        address2,
        city,
        state,
        postal_code,
        phone,
        correlation_id
    );

    HttpResponse::Ok().json(&*customer)
}

/// POST /customers/{id}/documents
///
/// Only the parts needed by the tests are read from the multipart body.
pub(super) async fn upload_document(
    configuration: web::Data<MockServerConfiguration>,
    storage: web::Data<MockServerStorage>,
    path: web::Path<String>,
    body: web::Bytes,
) -> HttpResponse {
    let customer_id = path.into_inner();
    let mut storage = storage.write().unwrap();
    if !storage.customers.contains_key(&customer_id) {
        return not_found();
    }

    let body = String::from_utf8_lossy(&body);
    let document_type = body
        .split_once("name=\"documentType\"\r\n\r\n")
        .and_then(|(_, rest)| rest.split("\r\n").next())
        .and_then(|value| serde_json::from_value::<DocumentType>(json!(value)).ok());
    let document_type = match document_type {
        Some(document_type) if body.contains("name=\"file\"") => document_type,
        _ => return validation_error("/documentType", "Invalid document."),
    };

    let id = Uuid::new_v4().to_string();
    let path = format!("/documents/{}", id);
    storage.documents.insert(
        id.clone(),
        (
            customer_id,
            Document {
                id,
                status: DocumentStatus::Pending,
                r#type: document_type,
                created: Utc::now(),
                failure_reason: None,
                links: self_links(&configuration, &path),
            },
        ),
    );

    created(&configuration, &path)
}

/// GET /customers/{id}/documents
pub(super) async fn list_documents(
    storage: web::Data<MockServerStorage>,
    path: web::Path<String>,
) -> HttpResponse {
    let customer_id = path.into_inner();
    let storage = storage.read().unwrap();
    if !storage.customers.contains_key(&customer_id) {
        return not_found();
    }

    let documents = storage
        .documents
        .values()
        .filter(|(owner, _)| *owner == customer_id)
        .map(|(_, document)| document.clone())
        .collect::<Vec<_>>();

    collection("documents", documents)
}

/// GET /documents/{id}
pub(super) async fn get_document(
    storage: web::Data<MockServerStorage>,
    path: web::Path<String>,
) -> HttpResponse {
    storage
        .read()
        .unwrap()
        .documents
        .get(&path.into_inner())
        .map_or_else(not_found, |(_, document)| HttpResponse::Ok().json(document))
}

/// POST /customers/{id}/funding-sources
pub(super) async fn create_funding_source(
    configuration: web::Data<MockServerConfiguration>,
    storage: web::Data<MockServerStorage>,
    path: web::Path<String>,
    body: web::Json<CreateFundingSourceRequest>,
) -> HttpResponse {
    let customer_id = path.into_inner();
    let body = body.into_inner();
    let mut storage = storage.write().unwrap();
    if !storage.customers.contains_key(&customer_id) {
        return not_found();
    }

    // The fingerprint identifies a bank account for duplicate detection
    let fingerprint = format!("{}-{}", body.routing_number, body.account_number);
    if storage.funding_sources.values().any(|(owner, fs)| {
        owner.as_deref() == Some(customer_id.as_str())
            && !fs.removed
            && fs.fingerprint.as_deref() == Some(fingerprint.as_str())
    }) {
        return validation_error("/accountNumber", "Bank already exists.");
    }

    let id = Uuid::new_v4().to_string();
    let path = format!("/funding-sources/{}", id);
    let mut links = self_links(&configuration, &path);
    links.insert(
        "customer".to_string(),
        configuration.link(&format!("/customers/{}", customer_id)),
    );

    storage.funding_sources.insert(
        id.clone(),
        (
            Some(customer_id),
            FundingSource {
                id,
                status: if body.plaid_token.is_some() {
                    FundingSourceStatus::Verified
                } else {
                    FundingSourceStatus::Unverified
                },
                r#type: FundingSourceType::Bank,
                bank_account_type: Some(body.bank_account_type),
                name: body.name,
                bank_name: Some("SANDBOX TEST BANK".to_string()),
                account_number: None,
                routing_number: None,
                created: Utc::now(),
                removed: false,
                channels: body.channels.unwrap_or_else(|| vec!["ach".to_string()]),
                fingerprint: Some(fingerprint),
                links,
            },
        ),
    );

    created(&configuration, &path)
}

/// GET /customers/{id}/funding-sources
pub(super) async fn list_customer_funding_sources(
    storage: web::Data<MockServerStorage>,
    path: web::Path<String>,
    query: web::Query<ListFundingSourcesRequest>,
) -> HttpResponse {
    let customer_id = path.into_inner();
    let storage = storage.read().unwrap();
    if !storage.customers.contains_key(&customer_id) {
        return not_found();
    }

    let funding_sources = storage
        .funding_sources
        .values()
        .filter(|(owner, fs)| {
            owner.as_deref() == Some(customer_id.as_str())
                && query.removed.map_or(true, |r| fs.removed == r)
        })
        .map(|(_, fs)| fs.clone())
        .collect::<Vec<_>>();

    collection("funding-sources", funding_sources)
}

/// POST /customers/{id}/funding-sources-token
/// POST /customers/{id}/iav-token
pub(super) async fn create_token(
    configuration: web::Data<MockServerConfiguration>,
    storage: web::Data<MockServerStorage>,
    path: web::Path<String>,
) -> HttpResponse {
    let customer_id = path.into_inner();
    if !storage.read().unwrap().customers.contains_key(&customer_id) {
        return not_found();
    }

    HttpResponse::Ok().json(json!({
        "_links": {
            "self": configuration.link(&format!("/customers/{}", customer_id))
        },
        "token": Uuid::new_v4().to_string()
    }))
}

/// GET /customers/{id}/transfers
pub(super) async fn list_customer_transfers(
    storage: web::Data<MockServerStorage>,
    path: web::Path<String>,
) -> HttpResponse {
    let customer_id = path.into_inner();
    if !storage.read().unwrap().customers.contains_key(&customer_id) {
        return not_found();
    }

    list_transfers_of(&storage, Some(&customer_id))
}

/// Transfers touching a funding source of the given owner (`None` for the master account).
fn list_transfers_of(storage: &MockServerStorage, owner: Option<&str>) -> HttpResponse {
    let storage = storage.read().unwrap();
    let owned_by = |link: Option<&Link>| {
        link.and_then(|link| storage.funding_sources.get(linked_id(link)))
            .map_or(false, |(fs_owner, _)| fs_owner.as_deref() == owner)
    };

    let mut transfers = storage
        .transfers
        .values()
        .filter(|t| owned_by(t.source()) || owned_by(t.destination()))
        .cloned()
        .collect::<Vec<_>>();
    transfers.sort_by(|a, b| b.created.cmp(&a.created));

    collection("transfers", transfers)
}

/// GET /funding-sources/{id}
pub(super) async fn get_funding_source(
    storage: web::Data<MockServerStorage>,
    path: web::Path<String>,
) -> HttpResponse {
    storage
        .read()
        .unwrap()
        .funding_sources
        .get(&path.into_inner())
        .map_or_else(not_found, |(_, fs)| HttpResponse::Ok().json(fs))
}

/// POST /funding-sources/{id}
pub(super) async fn remove_funding_source(
    storage: web::Data<MockServerStorage>,
    path: web::Path<String>,
    body: web::Json<RemoveFundingSourceRequest>,
) -> HttpResponse {
    let mut storage = storage.write().unwrap();
    let funding_source = match storage.funding_sources.get_mut(&path.into_inner()) {
        Some((_, fs)) => fs,
        None => return not_found(),
    };

    if !body.removed || funding_source.r#type == FundingSourceType::Balance {
        return validation_error("/removed", "Funding source cannot be removed.");
    }
    funding_source.removed = true;

    HttpResponse::Ok().json(&*funding_source)
}

/// POST /transfers
pub(super) async fn create_transfer(
    configuration: web::Data<MockServerConfiguration>,
    storage: web::Data<MockServerStorage>,
    body: web::Json<CreateTransferRequest>,
) -> HttpResponse {
    let body = body.into_inner();
    let mut guard = storage.write().unwrap();
    let storage = &mut *guard;

    if body
        .amount
        .value
        .parse::<f64>()
        .map_or(true, |value| value <= 0.0)
    {
        return validation_error("/amount/value", "Invalid amount.");
    }

    let source = storage.funding_sources.get(linked_id(&body.links.source));
    let destination = storage
        .funding_sources
        .get(linked_id(&body.links.destination));
    match (source, destination) {
        (Some((_, source)), Some((_, destination)))
            if !source.removed && !destination.removed =>
        {
            if source.status != FundingSourceStatus::Verified {
                return validation_error("/_links/source/href", "Invalid funding source.");
            }
        }
        _ => return validation_error("/_links/source/href", "Funding source not found."),
    }

    let id = Uuid::new_v4().to_string();
    let path = format!("/transfers/{}", id);
    let mut links = self_links(&configuration, &path);
    links.insert("source".to_string(), body.links.source);
    links.insert("destination".to_string(), body.links.destination);

    storage.transfers.insert(
        id.clone(),
        Transfer {
            id,
            status: TransferStatus::Pending,
            amount: body.amount,
            created: Utc::now(),
            metadata: body.metadata,
            correlation_id: body.correlation_id,
            individual_ach_id: None,
            links,
        },
    );

    created(&configuration, &path)
}

/// GET /transfers/{id}
pub(super) async fn get_transfer(
    storage: web::Data<MockServerStorage>,
    path: web::Path<String>,
) -> HttpResponse {
    storage
        .read()
        .unwrap()
        .transfers
        .get(&path.into_inner())
        .map_or_else(not_found, |transfer| HttpResponse::Ok().json(transfer))
}

/// POST /transfers/{id}
pub(super) async fn cancel_transfer(
    storage: web::Data<MockServerStorage>,
    path: web::Path<String>,
    body: web::Json<CancelTransferRequest>,
) -> HttpResponse {
    let mut storage = storage.write().unwrap();
    let transfer = match storage.transfers.get_mut(&path.into_inner()) {
        Some(transfer) => transfer,
        None => return not_found(),
    };

    if body.status != TransferStatus::Cancelled || transfer.status != TransferStatus::Pending {
        return validation_error("/status", "Transfer cannot be cancelled.");
    }
    transfer.status = TransferStatus::Cancelled;

    HttpResponse::Ok().json(&*transfer)
}

/// POST /on-demand-authorizations
pub(super) async fn create_on_demand_authorization(
    configuration: web::Data<MockServerConfiguration>,
) -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "_links": {
            "self": configuration.link(&format!("/on-demand-authorizations/{}", Uuid::new_v4()))
        },
        "bodyText": format!(
            "I agree that future payments to {} will be processed by the Dwolla payment system.",
            configuration.account.name
        ),
        "buttonText": "Agree & Continue"
    }))
}
