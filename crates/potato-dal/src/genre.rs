use crate::{Error, error::Result};
use futures::{StreamExt as _, TryStreamExt as _};
use serde::{Deserialize, Serialize};
use sqlx::Pool;
use tracing::debug;

/// Genre as embedded in a game payload, identified by its name only.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CreateGenre {
    pub name: String,
}

impl CreateGenre {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

// Internal key is never sent to clients
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, sqlx::FromRow)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Genre {
    #[serde(skip)]
    pub id: i64,
    pub name: String,
}

pub type GenreRepository = GenreRepositoryImpl<Pool<crate::ChosenDB>>;

pub struct GenreRepositoryImpl<E> {
    executor: E,
}

impl<'c, E> GenreRepositoryImpl<E>
where
    for<'a> &'a E: sqlx::Executor<'c, Database = crate::ChosenDB>,
{
    pub fn new(executor: E) -> Self {
        Self { executor }
    }

    pub async fn list_all(&self) -> Result<Vec<Genre>> {
        let records = sqlx::query_as::<_, Genre>("SELECT id, name FROM genre ORDER BY id")
            .fetch(&self.executor)
            .take(crate::MAX_LIMIT)
            .try_collect::<Vec<_>>()
            .await?;
        Ok(records)
    }

    pub async fn count(&self) -> Result<u64> {
        let count: i64 = sqlx::query_scalar("SELECT count(*) FROM genre")
            .fetch_one(&self.executor)
            .await?;
        Ok(count as u64)
    }

    pub async fn get(&self, id: i64) -> Result<Genre> {
        sqlx::query_as::<_, Genre>("SELECT id, name FROM genre WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.executor)
            .await?
            .ok_or_else(|| Error::RecordNotFound("Genre".to_string()))
    }

    /// Exact, case sensitive match
    pub async fn find_by_name(&self, name: &str) -> Result<Option<Genre>> {
        let record = sqlx::query_as::<_, Genre>("SELECT id, name FROM genre WHERE name = ?")
            .bind(name)
            .fetch_optional(&self.executor)
            .await?;
        Ok(record)
    }
}

/// Returns id of genre with given name, creating it when it does not exist yet.
///
/// Relies on unique constraint on `genre.name`, so concurrent callers with same name
/// always end up with the same row. `name_lc` keeps Unicode lowercase form for search.
pub async fn upsert_by_name<'c, E>(executor: E, name: &str) -> Result<i64>
where
    E: sqlx::Executor<'c, Database = crate::ChosenDB>,
{
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO genre (name, name_lc) VALUES (?, ?) ON CONFLICT(name) DO UPDATE SET name = excluded.name RETURNING id",
    )
    .bind(name)
    .bind(name.to_lowercase())
    .fetch_one(executor)
    .await?;
    debug!("Genre {name} resolved to id {id}");
    Ok(id)
}
