//! Remote document gateway over HTTP.
//!
//! Every call is a JSON `POST` carrying an `operationID` header; the gateway
//! answers with the `{errCode, errMsg, data}` envelope. A batch is sent as a
//! single commit request and applied by the gateway atomically.

use crate::social::store::{Document, DocumentStore, Query, StoreError, WriteBatch};
use crate::social::types::{deserialize_vec_or_null, handle_http_response};
use async_trait::async_trait;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{debug, error, info};
use uuid::Uuid;

/// HTTP-backed document store.
pub struct HttpDocumentStore {
    client: reqwest::Client,
    api_base_url: String,
}

#[derive(Serialize)]
struct GetDocumentReq<'a> {
    collection: &'a str,
    id: &'a str,
}

#[derive(Deserialize)]
struct QueryResp {
    #[serde(default, deserialize_with = "deserialize_vec_or_null")]
    documents: Vec<Document>,
}

impl HttpDocumentStore {
    /// `client` should already carry the auth headers.
    pub fn new(client: reqwest::Client, api_base_url: String) -> Self {
        Self {
            client,
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Build a client that sends `token` on every request.
    pub fn with_token(api_base_url: String, token: &str) -> Result<Self, StoreError> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::HeaderName::from_static("token"),
            reqwest::header::HeaderValue::from_str(token)
                .map_err(|e| StoreError::Config(format!("invalid token: {}", e)))?,
        );
        let client = reqwest::ClientBuilder::new()
            .default_headers(headers)
            .build()?;
        Ok(Self::new(client, api_base_url))
    }

    fn url(&self, path: &str) -> String {
        format!("{}/documents/{}", self.api_base_url, path)
    }

    async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Option<T>, StoreError> {
        let operation_id = Uuid::new_v4().to_string();
        let url = self.url(path);
        debug!("[HttpStore] 📡 POST {} operationID={}", url, operation_id);

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .header("operationID", &operation_id)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                error!("[HttpStore] {} request failed: {:?}", path, e);
                StoreError::Http(e)
            })?;

        let api_resp = handle_http_response::<T>(response, path).await?;
        Ok(api_resp.data)
    }
}

#[async_trait]
impl DocumentStore for HttpDocumentStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
        self.post("get", &GetDocumentReq { collection, id }).await
    }

    async fn query(&self, query: &Query) -> Result<Vec<Document>, StoreError> {
        let resp: Option<QueryResp> = self.post("query", query).await?;
        let docs = resp.map(|r| r.documents).unwrap_or_default();
        debug!(
            "[HttpStore] query {} -> {} documents",
            query.collection,
            docs.len()
        );
        Ok(docs)
    }

    async fn commit(&self, batch: WriteBatch) -> Result<(), StoreError> {
        batch.validate()?;
        let ops = batch.len();
        let _: Option<serde_json::Value> = self.post("commit", &batch).await?;
        info!("[HttpStore] ✅ committed batch of {} operations", ops);
        Ok(())
    }
}
