//! Client for the upstream inventory REST service
//!
//! Collections are fetched as raw JSON and converted through the wire adapter;
//! records that fail to convert are skipped and logged.

use reqwest::{Client, Method, RequestBuilder};
use serde_json::Value;
use shared::models::{
    Material, MaterialInput, Supplier, SupplierInput, Transaction, TransactionInput,
};
use shared::wire::{
    map_records, material_from_wire, material_to_wire, supplier_from_wire, supplier_to_wire,
    transaction_from_wire, transaction_to_wire, MappedRecords, MappingError,
};

use crate::config::UpstreamConfig;
use crate::error::{AppError, AppResult};

/// Inventory service client
#[derive(Clone)]
pub struct InventoryApiClient {
    client: Client,
    api_token: Option<String>,
    base_url: String,
}

impl InventoryApiClient {
    /// Create a client from the upstream configuration
    pub fn new(config: &UpstreamConfig) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| AppError::Configuration(format!("HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_token: config.api_token.clone().filter(|t| !t.is_empty()),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Create a client against a custom base URL (for testing)
    pub fn with_base_url(base_url: String) -> Self {
        Self {
            client: Client::new(),
            api_token: None,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.client.request(method, self.url(path));
        match &self.api_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Send a request and decode the JSON body
    async fn send(&self, builder: RequestBuilder, what: &str) -> AppResult<Value> {
        let response = builder
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("{} request failed: {}", what, e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::warn!("{} returned {}: {}", what, status, body);
            return Err(AppError::UpstreamRejected {
                status: status.as_u16(),
                message: format!("{} failed: {} {}", what, status, body.trim()),
            });
        }

        // Deletes may answer with an empty body
        let text = response
            .text()
            .await
            .map_err(|e| AppError::Upstream(format!("Failed to read {} response: {}", what, e)))?;
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text)
            .map_err(|e| AppError::Upstream(format!("Failed to parse {} response: {}", what, e)))
    }

    async fn fetch_collection<T>(
        &self,
        path: &str,
        mapper: impl Fn(&Value) -> Result<T, MappingError>,
    ) -> AppResult<Vec<T>> {
        let body = self.send(self.request(Method::GET, path), path).await?;
        let MappedRecords { records, rejected } = map_collection(path, &body, mapper)?;

        for (index, error) in &rejected {
            tracing::warn!("Skipping {} record {}: {}", path, index, error);
        }
        tracing::debug!("Fetched {} {} ({} skipped)", records.len(), path, rejected.len());
        Ok(records)
    }

    pub async fn fetch_materials(&self) -> AppResult<Vec<Material>> {
        self.fetch_collection("materials", material_from_wire).await
    }

    pub async fn fetch_transactions(&self) -> AppResult<Vec<Transaction>> {
        self.fetch_collection("transactions", transaction_from_wire).await
    }

    pub async fn fetch_suppliers(&self) -> AppResult<Vec<Supplier>> {
        self.fetch_collection("suppliers", supplier_from_wire).await
    }

    pub async fn create_material(&self, input: &MaterialInput) -> AppResult<Option<Material>> {
        let body = self
            .send(
                self.request(Method::POST, "materials").json(&material_to_wire(input)),
                "create material",
            )
            .await?;
        Ok(created_record(&body, material_from_wire))
    }

    pub async fn update_material(
        &self,
        id: &str,
        input: &MaterialInput,
    ) -> AppResult<Option<Material>> {
        let body = self
            .send(
                self.request(Method::PUT, &format!("materials/{}", id))
                    .json(&material_to_wire(input)),
                "update material",
            )
            .await?;
        Ok(created_record(&body, material_from_wire))
    }

    pub async fn delete_material(&self, id: &str) -> AppResult<()> {
        self.send(
            self.request(Method::DELETE, &format!("materials/{}", id)),
            "delete material",
        )
        .await?;
        Ok(())
    }

    pub async fn create_supplier(&self, input: &SupplierInput) -> AppResult<Option<Supplier>> {
        let body = self
            .send(
                self.request(Method::POST, "suppliers").json(&supplier_to_wire(input)),
                "create supplier",
            )
            .await?;
        Ok(created_record(&body, supplier_from_wire))
    }

    pub async fn update_supplier(
        &self,
        id: &str,
        input: &SupplierInput,
    ) -> AppResult<Option<Supplier>> {
        let body = self
            .send(
                self.request(Method::PUT, &format!("suppliers/{}", id))
                    .json(&supplier_to_wire(input)),
                "update supplier",
            )
            .await?;
        Ok(created_record(&body, supplier_from_wire))
    }

    pub async fn delete_supplier(&self, id: &str) -> AppResult<()> {
        self.send(
            self.request(Method::DELETE, &format!("suppliers/{}", id)),
            "delete supplier",
        )
        .await?;
        Ok(())
    }

    pub async fn create_transaction(
        &self,
        input: &TransactionInput,
    ) -> AppResult<Option<Transaction>> {
        let body = self
            .send(
                self.request(Method::POST, "transactions")
                    .json(&transaction_to_wire(input)),
                "record transaction",
            )
            .await?;
        Ok(created_record(&body, transaction_from_wire))
    }
}

/// Convert a collection body; anything but a JSON array is an upstream error
fn map_collection<T>(
    path: &str,
    body: &Value,
    mapper: impl Fn(&Value) -> Result<T, MappingError>,
) -> AppResult<MappedRecords<T>> {
    match body {
        Value::Array(values) => Ok(map_records(values, mapper)),
        Value::Null => Ok(map_records(&[], mapper)),
        other => Err(AppError::Upstream(format!(
            "Expected a list of {}, got {}",
            path,
            json_kind(other)
        ))),
    }
}

/// The record echoed back by a create/update call, when it converts
fn created_record<T>(
    body: &Value,
    mapper: impl Fn(&Value) -> Result<T, MappingError>,
) -> Option<T> {
    if body.is_null() {
        return None;
    }
    match mapper(body) {
        Ok(record) => Some(record),
        Err(e) => {
            tracing::warn!("Upstream echoed an unreadable record: {}", e);
            None
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
