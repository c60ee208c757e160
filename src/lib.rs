pub mod appwrite;
pub mod config;
pub mod context;
pub mod details;
pub mod error;
pub mod models;
pub mod saved;
pub mod search;
pub mod storage;
pub mod tmdb;
pub mod trending;
