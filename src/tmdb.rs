use crate::error::AppError;
use crate::models::{Movie, MovieDetails};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{header, Client};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

const TMDB_BASE: &str = "https://api.themoviedb.org/3";

#[async_trait]
pub trait TmdbApi: Send + Sync {
    async fn search_movies(&self, query: &str) -> Result<Vec<Movie>>;
    async fn discover_movies(&self) -> Result<Vec<Movie>>;
    async fn fetch_details(&self, id: &str) -> Result<MovieDetails>;
}

#[derive(Debug, Clone)]
pub struct TmdbClient {
    client: Client,
    base: String,
}

#[derive(Debug, Deserialize)]
struct PagedMovies {
    #[serde(default)]
    results: Vec<Movie>,
}

impl TmdbClient {
    /// `api_key` is the v4 read access token, sent as a bearer token.
    pub fn new(api_key: &str) -> Result<Self> {
        Self::with_base(api_key, TMDB_BASE)
    }

    pub fn with_base(api_key: &str, base: &str) -> Result<Self> {
        let mut headers = header::HeaderMap::new();
        let mut auth = header::HeaderValue::from_str(&format!("Bearer {}", api_key))
            .context("TMDB_API_KEY is not a valid header value")?;
        auth.set_sensitive(true);
        headers.insert(header::AUTHORIZATION, auth);
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );

        let client = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(30))
            .user_agent(format!("cinedex/{}", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .build()
            .context("Failed to build TMDB HTTP client")?;
        Ok(Self {
            client,
            base: base.trim_end_matches('/').to_string(),
        })
    }

    async fn get_json<T: for<'de> Deserialize<'de>>(&self, url: &str) -> Result<T> {
        debug!("GET {}", url);
        let res = self
            .client
            .get(url)
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
        let parsed: T = serde_json::from_str(&text)
            .map_err(AppError::from)
            .context("TMDB JSON parse failed")?;
        Ok(parsed)
    }
}

#[async_trait]
impl TmdbApi for TmdbClient {
    async fn search_movies(&self, query: &str) -> Result<Vec<Movie>> {
        let url = search_url(&self.base, query);
        let page: PagedMovies = self.get_json(&url).await?;
        Ok(page.results)
    }

    async fn discover_movies(&self) -> Result<Vec<Movie>> {
        let url = format!("{}/discover/movie?sort_by=popularity.desc", self.base);
        let page: PagedMovies = self.get_json(&url).await?;
        Ok(page.results)
    }

    async fn fetch_details(&self, id: &str) -> Result<MovieDetails> {
        let url = format!("{}/movie/{}", self.base, urlencoding::encode(id.trim()));
        self.get_json(&url)
            .await
            .with_context(|| format!("Failed to fetch TMDB movie {}", id))
    }
}

fn search_url(base: &str, query: &str) -> String {
    format!(
        "{base}/search/movie?query={}",
        urlencoding::encode(query.trim())
    )
}
