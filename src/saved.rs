//! Bookmarked movies, kept in memory and mirrored to durable storage.
//!
//! Mutations apply to the in-memory list synchronously. Each one then queues
//! a snapshot of the whole list for a single background writer, which stores
//! snapshots in the order the mutations happened. Write failures are logged
//! and never reach the caller.
use crate::models::Movie;
use crate::storage::KeyValueStore;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

pub const STORAGE_KEY: &str = "saved_movies";

enum WriteJob {
    Snapshot(Vec<Movie>),
    Flush(oneshot::Sender<()>),
}

pub struct SavedMovies {
    movies: Mutex<Vec<Movie>>,
    writer: mpsc::UnboundedSender<WriteJob>,
}

impl SavedMovies {
    /// Reads the persisted list and starts the background writer.
    ///
    /// Missing or unreadable data starts an empty list.
    pub async fn load(store: Arc<dyn KeyValueStore>) -> Arc<Self> {
        let initial = match store.get(STORAGE_KEY).await {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<Movie>>(&raw) {
                Ok(movies) => {
                    info!("Loaded {} saved movies", movies.len());
                    movies
                }
                Err(e) => {
                    warn!("Error parsing saved movies, starting empty: {}", e);
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!("Error loading saved movies, starting empty: {:#}", e);
                Vec::new()
            }
        };

        let (writer, jobs) = mpsc::unbounded_channel();
        tokio::spawn(write_loop(store, jobs));
        Arc::new(Self {
            movies: Mutex::new(initial),
            writer,
        })
    }

    /// Prepends `movie` unless one with the same id is already saved.
    /// Returns whether the list changed.
    pub fn save(&self, movie: Movie) -> bool {
        let mut movies = self.lock();
        if movies.iter().any(|m| m.id == movie.id) {
            return false;
        }
        debug!("Saving movie {} '{}'", movie.id, movie.title);
        movies.insert(0, movie);
        self.enqueue(&movies);
        true
    }

    /// Drops any entry with `id`. The list is persisted even when nothing matched.
    pub fn remove(&self, id: i64) -> bool {
        let mut movies = self.lock();
        let before = movies.len();
        movies.retain(|m| m.id != id);
        let removed = movies.len() != before;
        if removed {
            debug!("Removed movie {}", id);
        }
        self.enqueue(&movies);
        removed
    }

    pub fn is_saved(&self, id: i64) -> bool {
        self.lock().iter().any(|m| m.id == id)
    }

    /// Most recently saved first.
    pub fn movies(&self) -> Vec<Movie> {
        self.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Resolves once every write queued before this call has been attempted.
    pub async fn flush(&self) {
        let (ack, done) = oneshot::channel();
        if self.writer.send(WriteJob::Flush(ack)).is_ok() {
            let _ = done.await;
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Movie>> {
        self.movies.lock().unwrap_or_else(|e| e.into_inner())
    }

    // Called with the list lock held so snapshots queue in mutation order.
    fn enqueue(&self, movies: &[Movie]) {
        if self
            .writer
            .send(WriteJob::Snapshot(movies.to_vec()))
            .is_err()
        {
            warn!("Saved movies writer has stopped; change kept in memory only");
        }
    }
}

async fn write_loop(store: Arc<dyn KeyValueStore>, mut jobs: mpsc::UnboundedReceiver<WriteJob>) {
    while let Some(job) = jobs.recv().await {
        match job {
            WriteJob::Snapshot(movies) => persist(store.as_ref(), &movies).await,
            WriteJob::Flush(ack) => {
                let _ = ack.send(());
            }
        }
    }
    debug!("Saved movies writer stopped");
}

async fn persist(store: &dyn KeyValueStore, movies: &[Movie]) {
    let raw = match serde_json::to_string(movies) {
        Ok(raw) => raw,
        Err(e) => {
            warn!("Error serialising saved movies: {}", e);
            return;
        }
    };
    if let Err(e) = store.set(STORAGE_KEY, raw).await {
        warn!("Error saving movies: {:#}", e);
    }
}
