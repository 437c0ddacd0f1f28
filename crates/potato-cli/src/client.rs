use anyhow::{anyhow, Context as _};
use potato_app::rest_api::ApiResponse;
use potato_dal::{
    game::{CreateGame, Game},
    genre::Genre,
};
use reqwest::Response;
use serde_json::Value;
use tracing::debug;
use url::Url;

/// Thin HTTP client for the catalog REST API
#[derive(Clone)]
pub struct CatalogClient {
    http: reqwest::Client,
    base_url: Url,
}

impl CatalogClient {
    pub fn new(base_url: Url) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
        }
    }

    fn api_url(&self, path: &str) -> anyhow::Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow!("Invalid base URL {}", self.base_url))?
            .pop_if_empty()
            .push("api")
            .extend(path.split('/'));
        Ok(url)
    }

    pub async fn bulk_create(&self, games: &[CreateGame]) -> anyhow::Result<ApiResponse> {
        let url = self.api_url("bulk/create")?;
        debug!("Posting {} games to {url}", games.len());
        let response = self.http.post(url).json(games).send().await?;
        let response = check(response).await?;
        Ok(response.json().await?)
    }

    pub async fn search(&self, query: &str) -> anyhow::Result<Vec<Game>> {
        let url = self.api_url("search")?;
        let response = self
            .http
            .get(url)
            .query(&[("query", query)])
            .send()
            .await?;
        let response = check(response).await?;
        Ok(response.json().await?)
    }

    pub async fn game(&self, id: i64) -> anyhow::Result<Game> {
        let url = self.api_url(&id.to_string())?;
        let response = self.http.get(url).send().await?;
        let response = check(response).await?;
        Ok(response.json().await?)
    }

    pub async fn genres(&self) -> anyhow::Result<Vec<Genre>> {
        let url = self.api_url("genre/list")?;
        let response = self.http.get(url).send().await?;
        let response = check(response).await?;
        Ok(response.json().await?)
    }
}

/// Turns non-success status into error carrying server's envelope message
async fn check(response: Response) -> anyhow::Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response
        .text()
        .await
        .context("Cannot read error response")?;
    let message = serde_json::from_str::<ApiResponse>(&body)
        .map(|r| r.message)
        .or_else(|_| serde_json::from_str::<Value>(&body).map(|v| v.to_string()))
        .unwrap_or(body);
    Err(anyhow!("Server returned {status}: {message}"))
}
