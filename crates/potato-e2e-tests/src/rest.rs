use anyhow::Result;
use potato_app::rest_api::ApiResponse;
use potato_dal::game::Game;
use reqwest::Url;
use serde_json::{Value, json};
use tracing::info;

pub fn game_payload(title: &str, publisher: &str, genre: &str) -> Value {
    json!({
        "title": title,
        "publisher": publisher,
        "description": format!("{title} by {publisher}"),
        "screenshotUrls": [format!("http://img/{title}/1.png")],
        "fileSize": 1_000_000,
        "releaseDate": "2024-02-29",
        "genre": {"name": genre}
    })
}

pub async fn create_game(client: &reqwest::Client, base_url: &Url, payload: &Value) -> Result<ApiResponse> {
    let api_url = base_url.join("api/create")?;

    let response = client.post(api_url).json(payload).send().await?;
    info!("Create response: {:#?}", response);
    assert_eq!(201, response.status().as_u16());

    let envelope: ApiResponse = response.json().await?;
    Ok(envelope)
}

pub async fn bulk_create(client: &reqwest::Client, base_url: &Url, payloads: &[Value]) -> Result<ApiResponse> {
    let api_url = base_url.join("api/bulk/create")?;

    let response = client.post(api_url).json(payloads).send().await?;
    info!("Bulk create response: {:#?}", response);
    assert_eq!(201, response.status().as_u16());

    let envelope: ApiResponse = response.json().await?;
    Ok(envelope)
}

pub async fn get_page(client: &reqwest::Client, base_url: &Url, page: u32) -> Result<Value> {
    let api_url = base_url.join(&format!("api/all/{page}"))?;

    let response = client.get(api_url).send().await?;
    assert_eq!(202, response.status().as_u16());

    let page: Value = response.json().await?;
    Ok(page)
}

pub async fn search(client: &reqwest::Client, base_url: &Url, query: &str) -> Result<Vec<Game>> {
    let mut api_url = base_url.join("api/search")?;
    api_url.query_pairs_mut().append_pair("query", query);

    let response = client.get(api_url).send().await?;
    assert_eq!(202, response.status().as_u16());

    let games: Vec<Game> = response.json().await?;
    Ok(games)
}
