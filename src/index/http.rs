use crate::config::types::IndexConfig;
use crate::correlate::MergedDocument;
use crate::index::name::IndexName;
use crate::index::schema::log_index_mapping;
use crate::index::traits::{CreateOutcome, IndexStore, StoreError};
use async_trait::async_trait;
use reqwest::{RequestBuilder, StatusCode};
use serde_json::json;
use std::time::Duration;
use tracing::debug;

/// Index store speaking the Elasticsearch-compatible REST API.
///
/// Constructed once at process start and reused across pipeline
/// invocations; connection state lives in the injected client, not in
/// globals. Credentials and endpoint come from config; the ambient
/// execution environment supplies them.
#[derive(Debug)]
pub struct HttpIndexStore {
    base_url: String,
    client: reqwest::Client,
    username: Option<String>,
    password: Option<String>,
}

impl HttpIndexStore {
    pub fn new(config: &IndexConfig) -> Result<Self, StoreError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            base_url: config.endpoint.trim_end_matches('/').to_string(),
            client,
            username: config.username.clone(),
            password: config.password.clone(),
        })
    }

    fn authed(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.username {
            Some(user) => request.basic_auth(user, self.password.as_deref()),
            None => request,
        }
    }

    async fn unexpected(response: reqwest::Response) -> StoreError {
        StoreError::Unexpected {
            status: response.status().as_u16(),
            message: response.text().await.unwrap_or_default(),
        }
    }
}

#[async_trait]
impl IndexStore for HttpIndexStore {
    async fn index_exists(&self, index: &IndexName) -> Result<bool, StoreError> {
        let url = format!("{}/{}", self.base_url, index);
        let response = self.authed(self.client.head(&url)).send().await?;

        match response.status() {
            StatusCode::OK => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            _ => Err(Self::unexpected(response).await),
        }
    }

    async fn create_index(&self, index: &IndexName) -> Result<(), StoreError> {
        let url = format!("{}/{}", self.base_url, index);
        let response = self
            .authed(self.client.put(&url))
            .json(&log_index_mapping())
            .send()
            .await?;

        if response.status().is_success() {
            debug!(index = %index, "created index");
            return Ok(());
        }

        // Concurrent invocations race to create the same daily index;
        // losing the race is success.
        if response.status() == StatusCode::BAD_REQUEST {
            let body = response.text().await.unwrap_or_default();
            if body.contains("resource_already_exists_exception") {
                debug!(index = %index, "index already exists");
                return Ok(());
            }
            return Err(StoreError::Unexpected {
                status: StatusCode::BAD_REQUEST.as_u16(),
                message: body,
            });
        }

        Err(Self::unexpected(response).await)
    }

    async fn create_document(
        &self,
        index: &IndexName,
        document: &MergedDocument,
    ) -> Result<CreateOutcome, StoreError> {
        let url = format!("{}/{}/_create/{}", self.base_url, index, document.id);
        let response = self
            .authed(self.client.put(&url))
            .json(&document.fields)
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => Ok(CreateOutcome::Created),
            StatusCode::CONFLICT => Ok(CreateOutcome::AlreadyExists),
            _ => Err(Self::unexpected(response).await),
        }
    }

    async fn update_document(
        &self,
        index: &IndexName,
        document: &MergedDocument,
    ) -> Result<(), StoreError> {
        let url = format!("{}/{}/_update/{}", self.base_url, index, document.id);
        let response = self
            .authed(self.client.post(&url))
            .json(&json!({ "doc": &document.fields }))
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => Ok(()),
            StatusCode::NOT_FOUND => Err(StoreError::DocumentNotFound {
                index: index.as_str().to_string(),
                id: document.id.as_str().to_string(),
            }),
            _ => Err(Self::unexpected(response).await),
        }
    }

    async fn put_document(
        &self,
        index: &IndexName,
        document: &MergedDocument,
    ) -> Result<(), StoreError> {
        let url = format!("{}/{}/_doc/{}", self.base_url, index, document.id);
        let response = self
            .authed(self.client.put(&url))
            .json(&document.fields)
            .send()
            .await?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(Self::unexpected(response).await)
        }
    }
}
