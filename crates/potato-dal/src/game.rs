use std::collections::HashMap;

use crate::{
    Batch, ChosenRow, Connection, Error, ListingParams,
    error::Result,
    genre::{CreateGenre, Genre},
};
use futures::{StreamExt as _, TryStreamExt as _};
use serde::{Deserialize, Serialize};
use sqlx::{Pool, QueryBuilder, Row as _};
use tracing::debug;

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct CreateGame {
    pub title: Option<String>,
    pub description: Option<String>,
    pub features: Option<String>,
    pub publisher: Option<String>,
    pub cover_image_url: Option<String>,
    #[serde(default)]
    pub screenshot_urls: Vec<String>,
    pub trailer_video_url: Option<String>,
    pub direct_download_url: Option<String>,
    pub external_download_url: Option<String>,
    pub file_size: Option<i64>,
    pub system_requirements: Option<String>,
    pub genre: Option<CreateGenre>,
    pub release_date: Option<time::Date>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Game {
    pub id: i64,
    pub title: Option<String>,
    pub description: Option<String>,
    pub features: Option<String>,
    pub publisher: Option<String>,
    pub cover_image_url: Option<String>,
    pub screenshot_urls: Vec<String>,
    pub trailer_video_url: Option<String>,
    pub direct_download_url: Option<String>,
    pub external_download_url: Option<String>,
    pub file_size: Option<i64>,
    pub system_requirements: Option<String>,
    pub genre: Option<Genre>,
    pub release_date: Option<time::Date>,
}

// screenshots live in own table and are attached after the main query
impl sqlx::FromRow<'_, ChosenRow> for Game {
    fn from_row(row: &ChosenRow) -> Result<Self, sqlx::Error> {
        let genre = match row.try_get::<Option<i64>, _>("genre_id")? {
            Some(id) => Some(Genre {
                id,
                name: row.try_get("genre_name")?,
            }),
            None => None,
        };
        Ok(Game {
            id: row.try_get("id")?,
            title: row.try_get("title")?,
            description: row.try_get("description")?,
            features: row.try_get("features")?,
            publisher: row.try_get("publisher")?,
            cover_image_url: row.try_get("cover_image_url")?,
            screenshot_urls: Vec::new(),
            trailer_video_url: row.try_get("trailer_video_url")?,
            direct_download_url: row.try_get("direct_download_url")?,
            external_download_url: row.try_get("external_download_url")?,
            file_size: row.try_get("file_size")?,
            system_requirements: row.try_get("system_requirements")?,
            genre,
            release_date: row.try_get("release_date")?,
        })
    }
}

const SELECT_GAME: &str = r#"
SELECT g.id, g.title, g.description, g.features, g.publisher, g.cover_image_url,
g.trailer_video_url, g.direct_download_url, g.external_download_url, g.file_size,
g.system_requirements, g.release_date, g.genre_id, ge.name AS genre_name
FROM game g
LEFT JOIN genre ge ON g.genre_id = ge.id
"#;

pub type GameRepository = GameRepositoryImpl<Pool<crate::ChosenDB>>;

pub struct GameRepositoryImpl<E> {
    executor: E,
}

impl<'c, E> GameRepositoryImpl<E>
where
    for<'a> &'a E: sqlx::Executor<'c, Database = crate::ChosenDB>,
{
    pub fn new(executor: E) -> Self {
        Self { executor }
    }

    pub async fn count(&self) -> Result<u64> {
        let count: i64 = sqlx::query_scalar("SELECT count(*) FROM game")
            .fetch_one(&self.executor)
            .await?;
        Ok(count as u64)
    }

    pub async fn get(&self, id: i64) -> Result<Game> {
        let sql = format!("{SELECT_GAME} WHERE g.id = ?");
        let mut record = sqlx::query_as::<_, Game>(&sql)
            .bind(id)
            .fetch_optional(&self.executor)
            .await?
            .ok_or_else(|| Error::RecordNotFound("Game".to_string()))?;
        let mut screenshots = self.load_screenshots(&[id]).await?;
        record.screenshot_urls = screenshots.remove(&id).unwrap_or_default();
        Ok(record)
    }

    pub async fn list(&self, params: ListingParams) -> Result<Batch<Game>> {
        let total = self.count().await?;
        let sql = format!("{SELECT_GAME} ORDER BY g.id LIMIT ? OFFSET ?");
        let records = sqlx::query_as::<_, Game>(&sql)
            .bind(params.limit)
            .bind(params.offset)
            .fetch(&self.executor)
            .take(crate::MAX_LIMIT)
            .try_collect::<Vec<_>>()
            .await?;
        let rows = self.attach_screenshots(records).await?;
        Ok(Batch {
            offset: params.offset,
            limit: params.limit,
            total,
            rows,
        })
    }

    pub async fn list_all(&self) -> Result<Vec<Game>> {
        Ok(self.list(ListingParams::default()).await?.rows)
    }

    /// Case insensitive substring match on title, publisher or genre name.
    /// SQLite `lower()` folds ASCII only, so both sides are folded here and compared
    /// with `*_lc` columns.
    pub async fn search(&self, query: &str, limit: usize) -> Result<Vec<Game>> {
        let pattern = format!("%{}%", escape_like(&query.to_lowercase()));
        let sql = format!(
            r#"{SELECT_GAME}
WHERE g.title_lc LIKE ? ESCAPE '\'
OR g.publisher_lc LIKE ? ESCAPE '\'
OR ge.name_lc LIKE ? ESCAPE '\'
ORDER BY g.id LIMIT ?"#
        );
        let records = sqlx::query_as::<_, Game>(&sql)
            .bind(&pattern)
            .bind(&pattern)
            .bind(&pattern)
            .bind(limit as i64)
            .fetch_all(&self.executor)
            .await?;
        debug!("Search for {query:?} found {} games", records.len());
        self.attach_screenshots(records).await
    }

    async fn attach_screenshots(&self, mut records: Vec<Game>) -> Result<Vec<Game>> {
        let ids = records.iter().map(|g| g.id).collect::<Vec<_>>();
        let mut screenshots = self.load_screenshots(&ids).await?;
        for record in records.iter_mut() {
            record.screenshot_urls = screenshots.remove(&record.id).unwrap_or_default();
        }
        Ok(records)
    }

    async fn load_screenshots(&self, ids: &[i64]) -> Result<HashMap<i64, Vec<String>>> {
        let mut screenshots: HashMap<i64, Vec<String>> = HashMap::new();
        if ids.is_empty() {
            return Ok(screenshots);
        }
        let mut query = QueryBuilder::<crate::ChosenDB>::new(
            "SELECT game_id, image_url FROM game_screenshot WHERE game_id IN (",
        );
        let mut separated = query.separated(", ");
        for id in ids {
            separated.push_bind(*id);
        }
        separated.push_unseparated(") ORDER BY game_id, position");
        let rows: Vec<(i64, String)> = query
            .build_query_as()
            .fetch_all(&self.executor)
            .await?;
        for (game_id, url) in rows {
            screenshots.entry(game_id).or_default().push(url);
        }
        Ok(screenshots)
    }
}

/// Inserts game with its screenshots, genre must be already resolved to `genre_id`.
/// Expected to run inside transaction.
pub async fn insert(conn: &mut Connection, payload: &CreateGame, genre_id: Option<i64>) -> Result<i64> {
    let result = sqlx::query(
        r#"INSERT INTO game (title, title_lc, description, features, publisher, publisher_lc,
cover_image_url, trailer_video_url, direct_download_url, external_download_url, file_size,
system_requirements, release_date, genre_id)
VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
    )
    .bind(&payload.title)
    .bind(payload.title.as_deref().map(str::to_lowercase))
    .bind(&payload.description)
    .bind(&payload.features)
    .bind(&payload.publisher)
    .bind(payload.publisher.as_deref().map(str::to_lowercase))
    .bind(&payload.cover_image_url)
    .bind(&payload.trailer_video_url)
    .bind(&payload.direct_download_url)
    .bind(&payload.external_download_url)
    .bind(payload.file_size)
    .bind(&payload.system_requirements)
    .bind(payload.release_date)
    .bind(genre_id)
    .execute(&mut *conn)
    .await?;

    let id = result.last_insert_rowid();
    for (position, url) in payload.screenshot_urls.iter().enumerate() {
        sqlx::query("INSERT INTO game_screenshot (game_id, position, image_url) VALUES (?, ?, ?)")
            .bind(id)
            .bind(position as i64)
            .bind(url)
            .execute(&mut *conn)
            .await?;
    }
    Ok(id)
}

fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
