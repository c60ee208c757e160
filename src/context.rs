use crate::appwrite::{AppwriteClient, CounterStore};
use crate::config::Config;
use crate::details::DetailView;
use crate::models::{Movie, TrendingMovie};
use crate::saved::SavedMovies;
use crate::search::SearchOrchestrator;
use crate::storage::{FileStore, KeyValueStore};
use crate::tmdb::{TmdbApi, TmdbClient};
use crate::trending;
use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Process-wide services, built once at startup and shared by every screen.
#[derive(Clone)]
pub struct AppContext {
    pub tmdb: Arc<dyn TmdbApi>,
    pub counters: Arc<dyn CounterStore>,
    pub saved: Arc<SavedMovies>,
    pub debounce: Duration,
}

impl AppContext {
    pub async fn from_config(config: &Config) -> Result<Self> {
        let tmdb: Arc<dyn TmdbApi> = Arc::new(TmdbClient::new(&config.tmdb_api_key)?);
        let counters: Arc<dyn CounterStore> = Arc::new(AppwriteClient::new(&config.appwrite)?);
        let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::new(config.data_dir.clone()));
        info!("Saved movies stored under {}", config.data_dir.display());
        Ok(Self::new(tmdb, counters, store, config.debounce).await)
    }

    pub async fn new(
        tmdb: Arc<dyn TmdbApi>,
        counters: Arc<dyn CounterStore>,
        store: Arc<dyn KeyValueStore>,
        debounce: Duration,
    ) -> Self {
        let saved = SavedMovies::load(store).await;
        Self {
            tmdb,
            counters,
            saved,
            debounce,
        }
    }

    pub fn search(&self) -> SearchOrchestrator {
        SearchOrchestrator::new(self.tmdb.clone(), self.counters.clone(), self.debounce)
    }

    pub fn detail_view(&self) -> DetailView {
        DetailView::new(self.tmdb.clone(), self.saved.clone())
    }

    pub async fn trending(&self) -> Vec<TrendingMovie> {
        trending::trending_movies(self.counters.as_ref()).await
    }

    pub async fn popular(&self) -> Result<Vec<Movie>> {
        self.tmdb.discover_movies().await
    }
}
