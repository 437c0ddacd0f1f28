use std::convert::Infallible;

use axum::extract::FromRequestParts;
use http::request::Parts;
use potato_dal::{
    game::{self, CreateGame, Game, GameRepository},
    genre::{self, Genre, GenreRepository},
    Batch, ListingParams, Pool,
};
use tracing::{debug, error, info};

use crate::state::AppState;

pub const GAME_CREATED: &str = "Game created successfully";
pub const BULK_CREATED: &str = "bulk update successful";

pub type CatalogResult<T> = std::result::Result<T, CatalogError>;

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error(transparent)]
    Store(#[from] potato_dal::Error),

    #[error("Bulk create failed after {created} games: {source}")]
    PartialBulk {
        created: usize,
        #[source]
        source: potato_dal::Error,
    },
}

/// Catalog operations on top of game and genre stores
#[derive(Clone)]
pub struct CatalogService {
    pool: Pool,
    page_size: u32,
    search_limit: usize,
}

impl CatalogService {
    pub fn new(pool: Pool, page_size: u32, search_limit: usize) -> Self {
        Self {
            pool,
            page_size,
            search_limit,
        }
    }

    pub fn from_state(state: &AppState) -> Self {
        let config = state.config();
        Self::new(state.pool().clone(), config.page_size, config.search_limit)
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    fn games(&self) -> GameRepository {
        GameRepository::new(self.pool.clone())
    }

    fn genres(&self) -> GenreRepository {
        GenreRepository::new(self.pool.clone())
    }

    /// Resolves embedded genre by name (creating it if needed) and stores the game,
    /// both in one transaction.
    pub async fn create_game(&self, payload: CreateGame) -> CatalogResult<&'static str> {
        let mut tx = self.pool.begin().await.map_err(potato_dal::Error::from)?;
        let genre_id = match payload.genre {
            Some(ref embedded) => Some(genre::upsert_by_name(&mut *tx, &embedded.name).await?),
            None => None,
        };
        let id = game::insert(&mut *tx, &payload, genre_id).await?;
        tx.commit().await.map_err(potato_dal::Error::from)?;
        info!("Created game {id} {:?}", payload.title);
        Ok(GAME_CREATED)
    }

    /// Creates games one by one in given order, stops on first failure.
    /// Games created before the failure stay stored.
    pub async fn create_games(&self, payloads: Vec<CreateGame>) -> CatalogResult<&'static str> {
        let total = payloads.len();
        for (created, payload) in payloads.into_iter().enumerate() {
            match self.create_game(payload).await {
                Ok(_) => {}
                Err(CatalogError::Store(source)) => {
                    error!("Bulk create stopped at item {created} of {total}: {source}");
                    return Err(CatalogError::PartialBulk { created, source });
                }
                Err(e) => return Err(e),
            }
        }
        debug!("Bulk created {total} games");
        Ok(BULK_CREATED)
    }

    pub async fn get_all_games(&self, page: u32) -> CatalogResult<Batch<Game>> {
        let params = ListingParams::page(page, self.page_size);
        let batch = self.games().list(params).await?;
        Ok(batch)
    }

    pub async fn get_game_by_id(&self, id: i64) -> CatalogResult<Game> {
        let record = self.games().get(id).await?;
        Ok(record)
    }

    pub async fn get_all_genres(&self) -> CatalogResult<Vec<Genre>> {
        let records = self.genres().list_all().await?;
        Ok(records)
    }

    pub async fn search_games(&self, query: &str) -> CatalogResult<Vec<Game>> {
        let records = self.games().search(query, self.search_limit).await?;
        Ok(records)
    }
}

impl FromRequestParts<AppState> for CatalogService {
    type Rejection = Infallible;

    async fn from_request_parts(
        _parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(CatalogService::from_state(state))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use potato_dal::genre::CreateGenre;
    use tracing_test::traced_test;

    async fn service() -> CatalogService {
        let pool = sqlx::sqlite::SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        potato_dal::migrate(&pool).await.unwrap();
        CatalogService::new(pool, 12, 4)
    }

    fn game(title: &str, publisher: &str, genre: &str) -> CreateGame {
        CreateGame {
            title: Some(title.to_string()),
            publisher: Some(publisher.to_string()),
            genre: Some(CreateGenre::new(genre)),
            ..Default::default()
        }
    }

    #[tokio::test]
    #[traced_test]
    async fn test_genre_dedup() {
        let service = service().await;
        let msg = service.create_game(game("Alpha", "Beta", "RPG")).await.unwrap();
        assert_eq!(GAME_CREATED, msg);
        service.create_game(game("Gamma", "Delta", "RPG")).await.unwrap();

        let genres = service.get_all_genres().await.unwrap();
        assert_eq!(1, genres.len());

        let games = service.get_all_games(0).await.unwrap().rows;
        assert_eq!(2, games.len());
        let first = games[0].genre.as_ref().unwrap();
        let second = games[1].genre.as_ref().unwrap();
        assert_eq!(first.id, second.id);
    }

    #[tokio::test]
    #[traced_test]
    async fn test_bulk_and_pages() {
        let service = service().await;
        let payloads = (0..25)
            .map(|i| game(&format!("Game {i}"), "Pub", "Arcade"))
            .collect::<Vec<_>>();
        let msg = service.create_games(payloads).await.unwrap();
        assert_eq!(BULK_CREATED, msg);

        let mut titles = vec![];
        for page in 0..3 {
            let batch = service.get_all_games(page).await.unwrap();
            assert!(batch.rows.len() <= 12);
            titles.extend(batch.rows.into_iter().filter_map(|g| g.title));
        }
        let expected = (0..25).map(|i| format!("Game {i}")).collect::<Vec<_>>();
        assert_eq!(expected, titles);
    }

    #[tokio::test]
    #[traced_test]
    async fn test_search_round_trip() {
        let service = service().await;
        service.create_game(game("Alpha", "Beta", "RPG")).await.unwrap();
        for i in 0..5 {
            service
                .create_game(game(&format!("Shooter {i}"), "Bang", "FPS"))
                .await
                .unwrap();
        }
        for query in ["alpha", "beta", "rpg"] {
            let found = service.search_games(query).await.unwrap();
            assert_eq!(1, found.len());
            assert_eq!(Some("Alpha".to_string()), found[0].title);
        }
        let found = service.search_games("shoot").await.unwrap();
        assert_eq!(4, found.len());
    }

    #[tokio::test]
    #[traced_test]
    async fn test_missing_game() {
        let service = service().await;
        let res = service.get_game_by_id(999).await;
        assert!(matches!(
            res,
            Err(CatalogError::Store(potato_dal::Error::RecordNotFound(_)))
        ));
    }

    #[tokio::test]
    #[traced_test]
    async fn test_failed_create_leaves_no_genre() {
        let service = service().await;
        sqlx::query("DROP TABLE game_screenshot")
            .execute(&service.pool)
            .await
            .unwrap();
        let payload = CreateGame {
            screenshot_urls: vec!["http://img/1.png".to_string()],
            ..game("Alpha", "Beta", "Orphan")
        };
        let res = service.create_game(payload).await;
        assert!(res.is_err());
        assert!(service.get_all_genres().await.unwrap().is_empty());
        assert_eq!(0, service.games().count().await.unwrap());
    }

    #[tokio::test]
    #[traced_test]
    async fn test_partial_bulk() {
        let service = service().await;
        sqlx::query("DROP TABLE game_screenshot")
            .execute(&service.pool)
            .await
            .unwrap();
        let broken = CreateGame {
            screenshot_urls: vec!["http://img/1.png".to_string()],
            ..game("Broken", "Pub", "RPG")
        };
        let payloads = vec![
            game("First", "Pub", "RPG"),
            game("Second", "Pub", "RPG"),
            broken,
            game("Never", "Pub", "RPG"),
        ];
        let res = service.create_games(payloads).await;
        assert!(matches!(res, Err(CatalogError::PartialBulk { created: 2, .. })));
        assert_eq!(2, service.games().count().await.unwrap());
    }

    #[tokio::test]
    #[traced_test]
    async fn test_concurrent_creates_share_genre() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}", dir.path().join("catalog.db").display());
        let pool = potato_dal::new_pool(&url).await.unwrap();
        potato_dal::migrate(&pool).await.unwrap();
        let service = CatalogService::new(pool, 12, 4);

        let creates = (0..8).map(|i| service.create_game(game(&format!("Kart {i}"), "Pub", "Karting")));
        let results = futures::future::join_all(creates).await;
        assert!(results.iter().all(|r| r.is_ok()));

        let genres = service.get_all_genres().await.unwrap();
        assert_eq!(1, genres.len());
        assert_eq!("Karting", genres[0].name);
        let games = service.get_all_games(0).await.unwrap().rows;
        assert_eq!(8, games.len());
        assert!(games
            .iter()
            .all(|g| g.genre.as_ref().map(|ge| ge.id) == Some(genres[0].id)));
    }
}
