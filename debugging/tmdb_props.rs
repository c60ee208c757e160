//! Query TMDB and print what the app would see, including the saved-movie projection.
//! Usage:
//!   cargo run --bin tmdb_props -- search <query>
//!   cargo run --bin tmdb_props -- details <tmdb_id>
//! Requires TMDB_API_KEY in the environment (.env supported).

use anyhow::{Context, Result};
use cinedex::tmdb::{TmdbApi, TmdbClient};
use dotenvy::dotenv;
use serde_json::json;
use std::env;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Lookup {
    Search,
    Details,
}

impl FromStr for Lookup {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "search" => Ok(Lookup::Search),
            "details" => Ok(Lookup::Details),
            _ => Err(anyhow::anyhow!("lookup must be 'search' or 'details'")),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenv();
    let mut args = env::args().skip(1);
    let lookup: Lookup = args
        .next()
        .context("usage: tmdb_props <search|details> <arg>")?
        .parse()?;
    let arg = args.collect::<Vec<_>>().join(" ");
    if arg.trim().is_empty() {
        anyhow::bail!("missing query or id");
    }

    let key = env::var("TMDB_API_KEY").context("TMDB_API_KEY not set")?;
    let tmdb = TmdbClient::new(&key)?;

    let output = match lookup {
        Lookup::Search => {
            let movies = tmdb.search_movies(&arg).await?;
            json!({
                "query": arg.trim(),
                "count": movies.len(),
                "first": movies.first(),
                "poster_url": movies.first().map(|m| m.poster_url()),
            })
        }
        Lookup::Details => {
            let details = tmdb.fetch_details(&arg).await?;
            json!({
                "details": details,
                "saved_shape": details.to_movie(),
                "year": details.release_year(),
                "genres": details.genre_names(),
                "companies": details.company_names(),
            })
        }
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
