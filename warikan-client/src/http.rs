//! HTTP client for the settle-up backend API

use crate::retry::{RetryPolicy, retry_with_backoff};
use crate::{ClientConfig, ClientError, ClientResult};
use reqwest::{Client, StatusCode, multipart};
use serde::de::DeserializeOwned;
use shared::{Group, GroupUser, ListResponse, ReceiptParseResult, TransactionResponse};
use shared::models::SettlementPayload;

/// HTTP client for making network requests to the settle-up backend
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    base_url: String,
    token: Option<String>,
    retry: RetryPolicy,
}

impl HttpClient {
    /// Create a new HTTP client from configuration
    pub fn new(config: &ClientConfig) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: config.base_url.clone(),
            token: config.token.clone(),
            retry: RetryPolicy::default(),
        }
    }

    /// Set the authentication token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Override the retry policy for transaction syncs
    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry = policy;
        self
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Build authorization header value
    fn auth_header(&self) -> Option<String> {
        self.token.as_ref().map(|t| format!("Bearer {}", t))
    }

    /// Make a GET request
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let mut request = self.client.get(self.url(path));

        if let Some(auth) = self.auth_header() {
            request = request.header(reqwest::header::AUTHORIZATION, auth);
        }

        let response = request.send().await?;
        Self::handle_response(response).await
    }

    /// Make a POST request with JSON body
    pub async fn post<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let mut request = self.client.post(self.url(path)).json(body);

        if let Some(auth) = self.auth_header() {
            request = request.header(reqwest::header::AUTHORIZATION, auth);
        }

        let response = request.send().await?;
        Self::handle_response(response).await
    }

    /// Make a POST request with a multipart form body
    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: multipart::Form,
    ) -> ClientResult<T> {
        let mut request = self.client.post(self.url(path)).multipart(form);

        if let Some(auth) = self.auth_header() {
            request = request.header(reqwest::header::AUTHORIZATION, auth);
        }

        let response = request.send().await?;
        Self::handle_response(response).await
    }

    /// Handle the HTTP response
    async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> ClientResult<T> {
        let status = response.status();

        if !status.is_success() {
            let text = response.text().await?;
            return match status {
                StatusCode::UNAUTHORIZED => Err(ClientError::Unauthorized),
                StatusCode::NOT_FOUND => Err(ClientError::NotFound(text)),
                StatusCode::BAD_REQUEST => Err(ClientError::Validation(text)),
                _ => Err(ClientError::Internal(text)),
            };
        }

        response.json().await.map_err(Into::into)
    }

    // ========== Settle-up API ==========

    /// List all settlement groups
    pub async fn groups(&self) -> ClientResult<ListResponse<Group>> {
        self.get("/api/v1/settle-up/groups/").await
    }

    /// List the members of a settlement group
    pub async fn group_users(&self, group_id: i64) -> ClientResult<ListResponse<GroupUser>> {
        self.get(&format!("/api/v1/settle-up/users/?group_id={group_id}"))
            .await
    }

    /// Post a settlement transaction, without retry
    pub async fn create_transaction(
        &self,
        payload: &SettlementPayload,
    ) -> ClientResult<TransactionResponse> {
        self.post("/api/v1/settle-up/transactions/", payload).await
    }

    /// Post a settlement transaction with bounded retry
    ///
    /// The payload is built once by the caller and resent identically
    /// on each attempt; the POST carries idempotent intent, so a retry
    /// after an ambiguous failure is acceptable.
    pub async fn sync_transaction(
        &self,
        payload: &SettlementPayload,
    ) -> ClientResult<TransactionResponse> {
        let result = retry_with_backoff(self.retry, || self.create_transaction(payload)).await;

        match &result {
            Ok(resp) => tracing::info!(transaction_id = ?resp.id, "Settlement sync complete"),
            Err(e) => tracing::error!("Settlement sync failed after retries: {e}"),
        }

        result
    }

    /// Upload a receipt photo for OCR extraction
    ///
    /// Sends the JPEG as multipart field `file` and returns the parsed
    /// line items. Upload failures are not retried here; the capture
    /// flow falls back to saving the photo locally instead.
    pub async fn upload_receipt(
        &self,
        jpeg: Vec<u8>,
        file_name: impl Into<String>,
    ) -> ClientResult<ReceiptParseResult> {
        let part = multipart::Part::bytes(jpeg)
            .file_name(file_name.into())
            .mime_str("image/jpeg")?;
        let form = multipart::Form::new().part("file", part);

        self.post_multipart("/api/v1/receipts/receipt-items/", form)
            .await
    }
}
