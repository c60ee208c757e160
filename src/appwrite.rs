use crate::config::AppwriteConfig;
use crate::error::AppError;
use crate::models::TrendingMovie;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{header, Client, Method};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;

/// Document collection holding one popularity counter per search term.
#[async_trait]
pub trait CounterStore: Send + Sync {
    /// Exact, case-sensitive match on `searchTerm`.
    async fn find_by_term(&self, term: &str) -> Result<Option<TrendingMovie>>;
    async fn create(&self, counter: NewCounter) -> Result<TrendingMovie>;
    async fn update_count(&self, document_id: &str, search_term: &str, count: i64) -> Result<()>;
    async fn top_by_count(&self, limit: usize) -> Result<Vec<TrendingMovie>>;
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NewCounter {
    #[serde(rename = "searchTerm")]
    pub search_term: String,
    pub count: i64,
    pub title: String,
    pub movie_id: i64,
    pub poster_url: String,
}

#[derive(Debug, Clone)]
pub struct AppwriteClient {
    client: Client,
    documents_url: String,
}

#[derive(Debug, Deserialize)]
struct DocumentList {
    #[serde(default)]
    documents: Vec<TrendingMovie>,
}

impl AppwriteClient {
    pub fn new(config: &AppwriteConfig) -> Result<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            "X-Appwrite-Project",
            header::HeaderValue::from_str(&config.project_id)
                .context("APPWRITE_PROJECT_ID is not a valid header value")?,
        );
        if let Some(key) = &config.api_key {
            let mut value = header::HeaderValue::from_str(key)
                .context("APPWRITE_API_KEY is not a valid header value")?;
            value.set_sensitive(true);
            headers.insert("X-Appwrite-Key", value);
        }

        let client = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(15))
            .user_agent(format!("cinedex/{}", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .build()
            .context("Failed to build Appwrite HTTP client")?;

        Ok(Self {
            client,
            documents_url: format!(
                "{}/databases/{}/collections/{}/documents",
                config.endpoint.trim_end_matches('/'),
                config.database_id,
                config.collection_id
            ),
        })
    }

    async fn send(&self, method: Method, url: &str, body: Option<Value>) -> Result<String> {
        debug!("{} {}", method, url);
        let mut req = self.client.request(method, url);
        if let Some(body) = body {
            req = req.json(&body);
        }
        let res = req
            .send()
            .await
            .map_err(|e| AppError::Network(e.to_string()))?;
        let status = res.status();
        let text = res
            .text()
            .await
            .map_err(|e| AppError::Network(e.to_string()))?;
        if !status.is_success() {
            return Err(AppError::Http {
                status: status.as_u16(),
                url: url.to_string(),
                body: text,
            }
            .into());
        }
        Ok(text)
    }

    async fn list(&self, queries: &[Value]) -> Result<Vec<TrendingMovie>> {
        let url = list_url(&self.documents_url, queries);
        let text = self.send(Method::GET, &url, None).await?;
        let list: DocumentList = serde_json::from_str(&text)
            .map_err(AppError::from)
            .context("Appwrite document list parse failed")?;
        Ok(list.documents)
    }
}

#[async_trait]
impl CounterStore for AppwriteClient {
    async fn find_by_term(&self, term: &str) -> Result<Option<TrendingMovie>> {
        let docs = self.list(&[query_equal("searchTerm", term)]).await?;
        Ok(docs.into_iter().next())
    }

    async fn create(&self, counter: NewCounter) -> Result<TrendingMovie> {
        let body = json!({
            "documentId": "unique()",
            "data": counter,
        });
        let text = self
            .send(Method::POST, &self.documents_url, Some(body))
            .await?;
        let doc = serde_json::from_str(&text)
            .map_err(AppError::from)
            .context("Appwrite created document parse failed")?;
        Ok(doc)
    }

    async fn update_count(&self, document_id: &str, search_term: &str, count: i64) -> Result<()> {
        let url = format!(
            "{}/{}",
            self.documents_url,
            urlencoding::encode(document_id)
        );
        let body = json!({
            "data": { "searchTerm": search_term, "count": count },
        });
        self.send(Method::PATCH, &url, Some(body)).await?;
        Ok(())
    }

    async fn top_by_count(&self, limit: usize) -> Result<Vec<TrendingMovie>> {
        self.list(&[query_limit(limit), query_order_desc("count")])
            .await
    }
}

fn query_equal(attribute: &str, value: &str) -> Value {
    json!({ "method": "equal", "attribute": attribute, "values": [value] })
}

fn query_limit(limit: usize) -> Value {
    json!({ "method": "limit", "values": [limit] })
}

fn query_order_desc(attribute: &str) -> Value {
    json!({ "method": "orderDesc", "attribute": attribute })
}

fn list_url(base: &str, queries: &[Value]) -> String {
    if queries.is_empty() {
        return base.to_string();
    }
    let params = queries
        .iter()
        .map(|q| format!("queries%5B%5D={}", urlencoding::encode(&q.to_string())))
        .collect::<Vec<_>>()
        .join("&");
    format!("{}?{}", base, params)
}
