#![allow(dead_code)]

use cinedex::appwrite::{CounterStore, NewCounter};
use cinedex::error::AppError;
use cinedex::models::{Genre, Movie, MovieDetails, ProductionCompany, TrendingMovie};
use cinedex::storage::{KeyValueStore, MemoryStore};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

pub fn movie(id: i64, title: &str) -> Movie {
    Movie {
        id,
        title: title.to_string(),
        overview: format!("{} overview", title),
        poster_path: format!("/poster-{}.jpg", id),
        backdrop_path: String::new(),
        original_language: "en".to_string(),
        original_title: title.to_string(),
        adult: false,
        vote_average: 7.5,
        vote_count: 1200,
        popularity: 33.3,
        release_date: "2008-07-16".to_string(),
        genre_ids: vec![28],
        video: false,
    }
}

pub fn details(id: i64, title: &str) -> MovieDetails {
    MovieDetails {
        id,
        title: title.to_string(),
        overview: None,
        poster_path: Some(format!("/poster-{}.jpg", id)),
        backdrop_path: None,
        original_language: "en".to_string(),
        original_title: title.to_string(),
        adult: false,
        vote_average: 8.4,
        vote_count: 30000,
        popularity: 99.0,
        release_date: Some("2008-07-16".to_string()),
        video: false,
        genres: vec![
            Genre {
                id: 18,
                name: "Drama".to_string(),
            },
            Genre {
                id: 80,
                name: "Crime".to_string(),
            },
        ],
        runtime: Some(152),
        budget: 185_000_000,
        revenue: 1_004_558_444,
        production_companies: vec![ProductionCompany {
            id: 923,
            name: "Legendary Pictures".to_string(),
            logo_path: None,
            origin_country: Some("US".to_string()),
        }],
        status: "Released".to_string(),
        tagline: Some("Why So Serious?".to_string()),
        homepage: None,
        imdb_id: Some("tt0468569".to_string()),
    }
}

#[derive(Default)]
pub struct FakeTmdb {
    pub results: HashMap<String, Vec<Movie>>,
    pub delays: HashMap<String, Duration>,
    pub failing: HashSet<String>,
    pub details: HashMap<String, MovieDetails>,
    pub detail_delay: Duration,
    pub discover_fails: bool,
    pub calls: Mutex<Vec<String>>,
    pub detail_calls: Mutex<Vec<String>>,
}

impl FakeTmdb {
    pub fn with_results(query: &str, movies: Vec<Movie>) -> Self {
        let mut fake = Self::default();
        fake.results.insert(query.to_string(), movies);
        fake
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl cinedex::tmdb::TmdbApi for FakeTmdb {
    async fn search_movies(&self, query: &str) -> anyhow::Result<Vec<Movie>> {
        self.calls.lock().unwrap().push(query.to_string());
        if let Some(delay) = self.delays.get(query) {
            tokio::time::sleep(*delay).await;
        }
        if self.failing.contains(query) {
            return Err(AppError::Http {
                status: 500,
                url: format!("https://tmdb/search/movie?query={}", query),
                body: "{\"status_message\":\"boom\"}".to_string(),
            }
            .into());
        }
        Ok(self.results.get(query).cloned().unwrap_or_default())
    }

    async fn discover_movies(&self) -> anyhow::Result<Vec<Movie>> {
        if self.discover_fails {
            return Err(AppError::Http {
                status: 503,
                url: "https://tmdb/discover/movie?sort_by=popularity.desc".to_string(),
                body: "{\"status_message\":\"unavailable\"}".to_string(),
            }
            .into());
        }
        Ok(self.results.values().flatten().cloned().collect())
    }

    async fn fetch_details(&self, id: &str) -> anyhow::Result<MovieDetails> {
        self.detail_calls.lock().unwrap().push(id.to_string());
        if !self.detail_delay.is_zero() {
            tokio::time::sleep(self.detail_delay).await;
        }
        self.details.get(id).cloned().ok_or_else(|| {
            AppError::Http {
                status: 404,
                url: format!("https://tmdb/movie/{}", id),
                body: "{\"status_message\":\"not found\"}".to_string(),
            }
            .into()
        })
    }
}

/// Counter collection kept in memory; records every remote call.
#[derive(Default)]
pub struct FakeCounters {
    pub docs: Mutex<Vec<TrendingMovie>>,
    pub creates: Mutex<Vec<NewCounter>>,
    pub updates: Mutex<Vec<(String, String, i64)>>,
    pub failing: bool,
}

impl FakeCounters {
    pub fn with_doc(id: &str, term: &str, count: i64) -> Self {
        let fake = Self::default();
        fake.docs.lock().unwrap().push(TrendingMovie {
            document_id: id.to_string(),
            search_term: term.to_string(),
            count,
            title: "Existing".to_string(),
            movie_id: 1,
            poster_url: String::new(),
        });
        fake
    }

    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    pub fn call_count(&self) -> usize {
        self.creates.lock().unwrap().len() + self.updates.lock().unwrap().len()
    }

    fn check(&self) -> anyhow::Result<()> {
        if self.failing {
            return Err(AppError::Network("connection refused".to_string()).into());
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl CounterStore for FakeCounters {
    async fn find_by_term(&self, term: &str) -> anyhow::Result<Option<TrendingMovie>> {
        self.check()?;
        Ok(self
            .docs
            .lock()
            .unwrap()
            .iter()
            .find(|d| d.search_term == term)
            .cloned())
    }

    async fn create(&self, counter: NewCounter) -> anyhow::Result<TrendingMovie> {
        self.check()?;
        self.creates.lock().unwrap().push(counter.clone());
        let mut docs = self.docs.lock().unwrap();
        let doc = TrendingMovie {
            document_id: format!("doc-{}", docs.len() + 1),
            search_term: counter.search_term,
            count: counter.count,
            title: counter.title,
            movie_id: counter.movie_id,
            poster_url: counter.poster_url,
        };
        docs.push(doc.clone());
        Ok(doc)
    }

    async fn update_count(
        &self,
        document_id: &str,
        search_term: &str,
        count: i64,
    ) -> anyhow::Result<()> {
        self.check()?;
        self.updates.lock().unwrap().push((
            document_id.to_string(),
            search_term.to_string(),
            count,
        ));
        if let Some(doc) = self
            .docs
            .lock()
            .unwrap()
            .iter_mut()
            .find(|d| d.document_id == document_id)
        {
            doc.count = count;
        }
        Ok(())
    }

    async fn top_by_count(&self, limit: usize) -> anyhow::Result<Vec<TrendingMovie>> {
        self.check()?;
        let mut docs = self.docs.lock().unwrap().clone();
        docs.sort_by(|a, b| b.count.cmp(&a.count));
        docs.truncate(limit);
        Ok(docs)
    }
}

/// Memory-backed store that records every write and can be told to fail.
#[derive(Default)]
pub struct RecordingStore {
    pub inner: MemoryStore,
    pub writes: Mutex<Vec<String>>,
    pub fail_reads: bool,
    pub fail_writes: bool,
}

impl RecordingStore {
    pub fn primed(key: &str, value: &str) -> Self {
        Self {
            inner: MemoryStore::with_value(key, value),
            ..Self::default()
        }
    }

    pub fn writes(&self) -> Vec<String> {
        self.writes.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl KeyValueStore for RecordingStore {
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        if self.fail_reads {
            return Err(AppError::Storage("read denied".to_string()).into());
        }
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: String) -> anyhow::Result<()> {
        self.writes.lock().unwrap().push(value.clone());
        if self.fail_writes {
            return Err(AppError::Storage("disk full".to_string()).into());
        }
        self.inner.set(key, value).await
    }
}

/// Polls `check` on the tokio clock; works with paused time.
pub async fn wait_until(what: &str, check: impl Fn() -> bool) {
    for _ in 0..500 {
        if check() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("timed out waiting for {}", what);
}
