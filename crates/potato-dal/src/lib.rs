pub mod error;
pub mod game;
pub mod genre;

use std::str::FromStr as _;

pub use error::Error;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

use crate::error::Result;

pub type ChosenDB = sqlx::Sqlite;
pub type ChosenRow = sqlx::sqlite::SqliteRow;
pub type Connection = sqlx::SqliteConnection;
pub type Pool = sqlx::Pool<ChosenDB>;

pub const MAX_LIMIT: usize = 10_000;

pub async fn new_pool(database_url: &str) -> Result<Pool, Error> {
    let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(50)
        .connect_with(options)
        .await?;
    Ok(pool)
}

/// Brings schema up to date, migrations are embedded at compile time.
pub async fn migrate(pool: &Pool) -> Result<()> {
    sqlx::migrate!("../../migrations").run(pool).await?;
    Ok(())
}

#[derive(Debug, Clone)]
pub struct ListingParams {
    pub offset: i64,
    pub limit: i64,
}

impl Default for ListingParams {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: MAX_LIMIT as i64,
        }
    }
}

impl ListingParams {
    pub fn new(offset: i64, limit: i64) -> Self {
        Self { offset, limit }
    }

    /// Zero based page of given size
    pub fn page(page: u32, page_size: u32) -> Self {
        let page_size = i64::from(page_size.max(1));
        Self {
            offset: i64::from(page) * page_size,
            limit: page_size,
        }
    }
}

#[derive(Debug)]
pub struct Batch<T> {
    pub offset: i64,
    pub limit: i64,
    pub total: u64,
    pub rows: Vec<T>,
}
