use crate::appwrite::{CounterStore, NewCounter};
use crate::models::{Movie, TrendingMovie};
use anyhow::Result;
use tracing::{info, warn};

pub const TRENDING_LIMIT: usize = 5;

/// Bumps the popularity counter for `query`, creating it from `movie` on first use.
///
/// Read and write are two separate remote calls; concurrent callers can race
/// and undercount.
pub async fn update_search_count(
    store: &dyn CounterStore,
    query: &str,
    movie: &Movie,
) -> Result<()> {
    let term = query.trim();
    if term.is_empty() {
        info!("Empty search term, skipping counter update");
        return Ok(());
    }

    match store.find_by_term(term).await? {
        Some(existing) => {
            let count = existing.count + 1;
            store
                .update_count(&existing.document_id, term, count)
                .await?;
            info!("Search count for '{}' is now {}", term, count);
        }
        None => {
            store
                .create(NewCounter {
                    search_term: term.to_string(),
                    count: 1,
                    title: movie.title.clone(),
                    movie_id: movie.id,
                    poster_url: movie.poster_url(),
                })
                .await?;
            info!("Started search count for '{}' ({})", term, movie.title);
        }
    }
    Ok(())
}

/// Top search terms by count; an unreachable store yields an empty list.
pub async fn trending_movies(store: &dyn CounterStore) -> Vec<TrendingMovie> {
    match store.top_by_count(TRENDING_LIMIT).await {
        Ok(docs) => docs,
        Err(e) => {
            warn!("Failed to load trending movies: {:#}", e);
            Vec::new()
        }
    }
}
