//! Debounced movie search.
//!
//! Every input change cancels the pending timer and arms a new one; only the
//! timer armed by the latest input can start a fetch. Fetches are detached
//! from the timer, so new input never cancels a request already in flight,
//! and whichever response lands last wins.
use crate::appwrite::CounterStore;
use crate::error::user_message;
use crate::models::Movie;
use crate::tmdb::TmdbApi;
use crate::trending;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchPhase {
    #[default]
    Idle,
    Pending,
    Fetching,
    Success,
    Failed,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchSnapshot {
    /// Raw input as typed.
    pub query: String,
    pub phase: SearchPhase,
    pub movies: Vec<Movie>,
    pub error: Option<String>,
}

impl SearchSnapshot {
    pub fn is_loading(&self) -> bool {
        self.phase == SearchPhase::Fetching
    }
}

#[derive(Default)]
struct Debounce {
    generation: u64,
    handle: Option<JoinHandle<()>>,
}

impl Debounce {
    fn cancel(&mut self) {
        self.generation += 1;
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }

    fn arm(&mut self, inner: Arc<Inner>) {
        self.cancel();
        let generation = self.generation;
        self.handle = Some(tokio::spawn(async move {
            tokio::time::sleep(inner.delay).await;
            inner.fire(generation);
        }));
    }
}

struct Inner {
    tmdb: Arc<dyn TmdbApi>,
    counters: Arc<dyn CounterStore>,
    delay: Duration,
    state: watch::Sender<SearchSnapshot>,
    timer: Mutex<Debounce>,
}

pub struct SearchOrchestrator {
    inner: Arc<Inner>,
}

impl SearchOrchestrator {
    pub fn new(
        tmdb: Arc<dyn TmdbApi>,
        counters: Arc<dyn CounterStore>,
        delay: Duration,
    ) -> Self {
        let (state, _) = watch::channel(SearchSnapshot::default());
        Self {
            inner: Arc::new(Inner {
                tmdb,
                counters,
                delay,
                state,
                timer: Mutex::new(Debounce::default()),
            }),
        }
    }

    /// Feeds the current contents of the search box.
    pub fn set_query(&self, text: &str) {
        let mut timer = self.inner.lock_timer();
        timer.cancel();

        if text.trim().is_empty() {
            self.inner.state.send_modify(|s| {
                s.query = text.to_string();
                s.phase = SearchPhase::Idle;
                s.movies.clear();
                s.error = None;
            });
            return;
        }

        self.inner.state.send_modify(|s| {
            s.query = text.to_string();
            s.phase = SearchPhase::Pending;
        });
        timer.arm(self.inner.clone());
    }

    /// Runs the current query again right away. Nothing happens for an empty query.
    pub fn retry(&self) {
        let mut timer = self.inner.lock_timer();
        timer.cancel();
        let query = self.inner.state.borrow().query.clone();
        if !query.trim().is_empty() {
            self.inner.clone().start_fetch(query);
        }
    }

    pub fn reset(&self) {
        self.set_query("");
    }

    pub fn snapshot(&self) -> SearchSnapshot {
        self.inner.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SearchSnapshot> {
        self.inner.state.subscribe()
    }
}

impl Drop for SearchOrchestrator {
    fn drop(&mut self) {
        self.inner.lock_timer().cancel();
    }
}

impl Inner {
    fn lock_timer(&self) -> MutexGuard<'_, Debounce> {
        self.timer.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn fire(self: Arc<Self>, generation: u64) {
        let timer = self.lock_timer();
        if timer.generation != generation {
            debug!("Stale debounce timer ignored");
            return;
        }
        let query = self.state.borrow().query.clone();
        if query.trim().is_empty() {
            self.state.send_modify(|s| {
                s.phase = SearchPhase::Idle;
                s.movies.clear();
                s.error = None;
            });
            return;
        }
        drop(timer);
        self.start_fetch(query);
    }

    fn start_fetch(self: Arc<Self>, query: String) {
        self.state.send_modify(|s| {
            s.phase = SearchPhase::Fetching;
            s.error = None;
        });
        tokio::spawn(async move { self.fetch(query).await });
    }

    async fn fetch(self: Arc<Self>, query: String) {
        let term = query.trim();
        info!("Searching TMDB for '{}'", term);
        match self.tmdb.search_movies(term).await {
            Ok(movies) => {
                info!("Search '{}' returned {} movies", term, movies.len());
                let first = movies.first().cloned();
                self.state.send_modify(|s| {
                    s.phase = SearchPhase::Success;
                    s.movies = movies;
                    s.error = None;
                });
                if let Some(first) = first {
                    self.record_search(query.clone(), first);
                }
            }
            Err(e) => {
                warn!("Search '{}' failed: {:#}", term, e);
                let message = user_message(&e);
                self.state.send_modify(|s| {
                    s.phase = SearchPhase::Failed;
                    s.movies.clear();
                    s.error = Some(message);
                });
            }
        }
    }

    fn record_search(&self, query: String, first: Movie) {
        let counters = self.counters.clone();
        tokio::spawn(async move {
            if let Err(e) = trending::update_search_count(counters.as_ref(), &query, &first).await
            {
                warn!("Failed to update search count for '{}': {:#}", query.trim(), e);
            }
        });
    }
}
