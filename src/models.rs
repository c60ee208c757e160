use serde::{Deserialize, Deserializer, Serialize};

pub const POSTER_BASE: &str = "https://image.tmdb.org/t/p/w500";

/// Summary record as returned by TMDB search and discover endpoints.
///
/// Saved movies are persisted in exactly this shape.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Movie {
    pub id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub overview: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub poster_path: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub backdrop_path: String,
    #[serde(default)]
    pub original_language: String,
    #[serde(default)]
    pub original_title: String,
    #[serde(default)]
    pub adult: bool,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub vote_count: i64,
    #[serde(default)]
    pub popularity: f64,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub release_date: String,
    #[serde(default)]
    pub genre_ids: Vec<i64>,
    #[serde(default)]
    pub video: bool,
}

impl Movie {
    pub fn poster_url(&self) -> String {
        poster_url(&self.poster_path)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Genre {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ProductionCompany {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub logo_path: Option<String>,
    #[serde(default)]
    pub origin_country: Option<String>,
}

/// Full detail document from `GET /movie/{id}`. Never persisted.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct MovieDetails {
    pub id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub original_language: String,
    #[serde(default)]
    pub original_title: String,
    #[serde(default)]
    pub adult: bool,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub vote_count: i64,
    #[serde(default)]
    pub popularity: f64,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub video: bool,
    #[serde(default)]
    pub genres: Vec<Genre>,
    #[serde(default)]
    pub runtime: Option<i64>,
    #[serde(default)]
    pub budget: i64,
    #[serde(default)]
    pub revenue: i64,
    #[serde(default)]
    pub production_companies: Vec<ProductionCompany>,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub tagline: Option<String>,
    #[serde(default)]
    pub homepage: Option<String>,
    #[serde(default)]
    pub imdb_id: Option<String>,
}

impl MovieDetails {
    /// Projects the detail document down to the summary shape that gets saved.
    pub fn to_movie(&self) -> Movie {
        Movie {
            id: self.id,
            title: self.title.clone(),
            overview: self.overview.clone().unwrap_or_default(),
            poster_path: self.poster_path.clone().unwrap_or_default(),
            backdrop_path: self.backdrop_path.clone().unwrap_or_default(),
            original_language: self.original_language.clone(),
            original_title: self.original_title.clone(),
            adult: self.adult,
            vote_average: self.vote_average,
            vote_count: self.vote_count,
            popularity: self.popularity,
            release_date: self.release_date.clone().unwrap_or_default(),
            genre_ids: self.genres.iter().map(|g| g.id).collect(),
            video: self.video,
        }
    }

    pub fn release_year(&self) -> Option<&str> {
        self.release_date
            .as_deref()
            .and_then(|d| d.split('-').next())
            .filter(|y| !y.is_empty())
    }

    pub fn genre_names(&self) -> String {
        join_or_na(self.genres.iter().map(|g| g.name.as_str()))
    }

    pub fn company_names(&self) -> String {
        join_or_na(self.production_companies.iter().map(|c| c.name.as_str()))
    }

    pub fn budget_millions(&self) -> f64 {
        self.budget as f64 / 1_000_000.0
    }

    pub fn revenue_millions(&self) -> f64 {
        self.revenue as f64 / 1_000_000.0
    }

    /// Vote average rounded to a whole score out of ten.
    pub fn score(&self) -> i64 {
        self.vote_average.round() as i64
    }
}

/// Popularity document for one search term, as stored in Appwrite.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TrendingMovie {
    #[serde(rename = "$id", default)]
    pub document_id: String,
    #[serde(rename = "searchTerm")]
    pub search_term: String,
    pub count: i64,
    #[serde(default)]
    pub title: String,
    pub movie_id: i64,
    #[serde(default)]
    pub poster_url: String,
}

pub fn poster_url(path: &str) -> String {
    format!("{POSTER_BASE}{path}")
}

fn join_or_na<'a>(names: impl Iterator<Item = &'a str>) -> String {
    let joined = names.collect::<Vec<_>>().join(", ");
    if joined.is_empty() {
        "N/A".to_string()
    } else {
        joined
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
