use crate::error::user_message;
use crate::models::MovieDetails;
use crate::saved::SavedMovies;
use crate::tmdb::TmdbApi;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{info, warn};

#[derive(Debug, Clone, Default, PartialEq)]
pub enum DetailState {
    #[default]
    Empty,
    Loading,
    Loaded(Box<MovieDetails>),
    Failed(String),
}

impl DetailState {
    pub fn details(&self) -> Option<&MovieDetails> {
        match self {
            DetailState::Loaded(d) => Some(d.as_ref()),
            _ => None,
        }
    }
}

/// One open movie page: its detail document and bookmark toggle.
pub struct DetailView {
    tmdb: Arc<dyn TmdbApi>,
    saved: Arc<SavedMovies>,
    state: watch::Sender<DetailState>,
}

impl DetailView {
    pub fn new(tmdb: Arc<dyn TmdbApi>, saved: Arc<SavedMovies>) -> Self {
        let (state, _) = watch::channel(DetailState::Empty);
        Self { tmdb, saved, state }
    }

    pub async fn fetch_details(&self, id: &str) {
        self.state.send_replace(DetailState::Loading);
        let next = match self.tmdb.fetch_details(id).await {
            Ok(details) => {
                info!("Loaded details for '{}' ({})", details.title, details.id);
                DetailState::Loaded(Box::new(details))
            }
            Err(e) => {
                warn!("Failed to load movie {}: {:#}", id, e);
                DetailState::Failed(user_message(&e))
            }
        };
        self.state.send_replace(next);
    }

    /// Saves or unsaves the loaded movie and returns the new saved state.
    /// Does nothing until details have loaded.
    pub fn toggle_save(&self) -> bool {
        let Some(details) = self.state.borrow().details().cloned() else {
            return false;
        };
        if self.saved.is_saved(details.id) {
            self.saved.remove(details.id);
            false
        } else {
            self.saved.save(details.to_movie());
            true
        }
    }

    pub fn is_saved(&self) -> bool {
        self.state
            .borrow()
            .details()
            .map(|d| self.saved.is_saved(d.id))
            .unwrap_or(false)
    }

    pub fn state(&self) -> DetailState {
        self.state.borrow().clone()
    }
}
