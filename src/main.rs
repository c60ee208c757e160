use anyhow::Result;
use cinedex::config::{self, Config};
use cinedex::context::AppContext;
use cinedex::details::{DetailState, DetailView};
use cinedex::search::{SearchPhase, SearchSnapshot};
use dotenvy::dotenv;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn print_results(snapshot: &SearchSnapshot) {
    if snapshot.is_loading() {
        println!("Loading...");
        return;
    }
    match snapshot.phase {
        SearchPhase::Success if snapshot.movies.is_empty() => println!("No results found"),
        SearchPhase::Success => {
            println!("Search results for {}", snapshot.query.trim());
            for movie in &snapshot.movies {
                let year = movie.release_date.split('-').next().unwrap_or("");
                println!("  {:>8}  {} ({})", movie.id, movie.title, year);
            }
        }
        SearchPhase::Failed => {
            println!("Error: {}", snapshot.error.as_deref().unwrap_or("unknown"));
        }
        _ => {}
    }
}

async fn print_popular(ctx: &AppContext) {
    match ctx.popular().await {
        Ok(movies) => {
            println!("Popular movies:");
            for movie in movies.iter().take(10) {
                println!("  {:>8}  {}", movie.id, movie.title);
            }
        }
        Err(e) => warn!("Failed to load popular movies: {:#}", e),
    }
}

fn print_details(view: &DetailView) {
    match view.state() {
        DetailState::Loaded(movie) => {
            let marker = if view.is_saved() { "[saved]" } else { "" };
            println!("{} {}", movie.title, marker);
            println!(
                "  {} | {}m | {}/10 ({} votes)",
                movie.release_year().unwrap_or("N/A"),
                movie.runtime.unwrap_or(0),
                movie.score(),
                movie.vote_count
            );
            println!("  Overview: {}", movie.overview.as_deref().unwrap_or("N/A"));
            println!("  Genres: {}", movie.genre_names());
            println!(
                "  Budget: ${} million | Revenue: ${} million",
                movie.budget_millions(),
                movie.revenue_millions().round()
            );
            println!("  Production Companies: {}", movie.company_names());
        }
        DetailState::Failed(message) => println!("Error: {}", message),
        DetailState::Loading | DetailState::Empty => {}
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    match dotenv() {
        Ok(path) => info!("Loaded environment from {:?}", path),
        Err(e) => warn!("No .env file loaded ({}) - relying on environment", e),
    }
    init_tracing();
    config::check_env()?;
    let config = Config::from_env()?;
    let ctx = AppContext::from_config(&config).await?;

    let trending = ctx.trending().await;
    if !trending.is_empty() {
        println!("Trending searches:");
        for (rank, doc) in trending.iter().enumerate() {
            println!("  {}. {} ({} searches)", rank + 1, doc.title, doc.count);
        }
    }
    print_popular(&ctx).await;
    println!("{} saved movies", ctx.saved.len());
    println!("Type to search. Commands: :open <id>, :save, :saved, :retry, :quit");

    let search = ctx.search();
    let mut updates = search.subscribe();
    tokio::spawn(async move {
        while updates.changed().await.is_ok() {
            let snapshot = updates.borrow_and_update().clone();
            print_results(&snapshot);
        }
    });

    let mut view: Option<DetailView> = None;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim_end();
        match line.split_once(' ').unwrap_or((line, "")) {
            (":quit", _) => break,
            (":retry", _) => search.retry(),
            (":open", id) if !id.trim().is_empty() => {
                let detail = ctx.detail_view();
                detail.fetch_details(id.trim()).await;
                print_details(&detail);
                view = Some(detail);
            }
            (":open", _) => println!("Usage: :open <tmdb id>"),
            (":save", _) => match &view {
                Some(detail) => {
                    let saved = detail.toggle_save();
                    println!("{}", if saved { "Saved" } else { "Removed" });
                }
                None => println!("Open a movie first"),
            },
            (":saved", _) => {
                let movies = ctx.saved.movies();
                if movies.is_empty() {
                    println!("No saved movies yet");
                }
                for movie in movies {
                    println!("  {:>8}  {}", movie.id, movie.title);
                }
            }
            _ if line.trim().is_empty() => {
                search.set_query(line);
                print_popular(&ctx).await;
            }
            _ => search.set_query(line),
        }
    }

    ctx.saved.flush().await;
    info!("Bye");
    Ok(())
}
