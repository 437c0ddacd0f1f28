use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query,
    },
    response::IntoResponse,
    Json,
};
use http::StatusCode;
use potato_dal::game::CreateGame;
use serde::Deserialize;
use tracing::debug;

use crate::{
    catalog::CatalogService,
    error::ApiResult,
    rest_api::{paging::Page, ApiResponse},
};

#[cfg(feature = "openapi")]
use potato_dal::game::Game;

#[derive(Debug, Clone, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams))]
#[cfg_attr(feature = "openapi", into_params(parameter_in = Query))]
pub struct SearchQuery {
    /// Substring of title, publisher or genre name, case insensitive
    query: String,
}

#[cfg_attr(feature = "openapi", utoipa::path(get, path = "/all/{page}", tag = "Games", operation_id = "listGames",
    params(("page" = u32, Path, description = "Zero based page index")),
    responses((status = StatusCode::ACCEPTED, description = "Page of games", body = Page<Game>))))]
pub async fn list_page(
    service: CatalogService,
    page: Result<Path<u32>, PathRejection>,
) -> ApiResult<impl IntoResponse> {
    let Path(page) = page?;
    let batch = service.get_all_games(page).await?;
    let page = Page::try_from_batch(batch, page, service.page_size())?;
    Ok((StatusCode::ACCEPTED, Json(page)))
}

#[cfg_attr(feature = "openapi", utoipa::path(get, path = "/{id}", tag = "Games", operation_id = "getGame",
    params(("id" = i64, Path, description = "Game id")),
    responses((status = StatusCode::ACCEPTED, description = "Game", body = Game),
        (status = StatusCode::NOT_FOUND, description = "No such game", body = ApiResponse))))]
pub async fn get(
    service: CatalogService,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<impl IntoResponse> {
    let Path(id) = id?;
    let record = service.get_game_by_id(id).await?;
    Ok((StatusCode::ACCEPTED, Json(record)))
}

#[cfg_attr(feature = "openapi", utoipa::path(get, path = "/search", tag = "Games", operation_id = "searchGames",
    params(SearchQuery),
    responses((status = StatusCode::ACCEPTED, description = "Matching games, limited count", body = Vec<Game>))))]
pub async fn search(
    service: CatalogService,
    query: Result<Query<SearchQuery>, QueryRejection>,
) -> ApiResult<impl IntoResponse> {
    let Query(SearchQuery { query }) = query?;
    debug!("Searching for {query:?}");
    let records = service.search_games(&query).await?;
    Ok((StatusCode::ACCEPTED, Json(records)))
}

#[cfg_attr(feature = "openapi", utoipa::path(post, path = "/create", tag = "Games", operation_id = "createGame",
    request_body = CreateGame,
    responses((status = StatusCode::CREATED, description = "Game created", body = ApiResponse))))]
pub async fn create(
    service: CatalogService,
    payload: Result<Json<CreateGame>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(payload) = payload?;
    let message = service.create_game(payload).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(message))))
}

#[cfg_attr(feature = "openapi", utoipa::path(post, path = "/bulk/create", tag = "Games", operation_id = "createGames",
    request_body = Vec<CreateGame>,
    responses((status = StatusCode::CREATED, description = "All games created", body = ApiResponse),
        (status = StatusCode::INTERNAL_SERVER_ERROR, description = "Stopped on first failure, previous games stay stored", body = ApiResponse))))]
pub async fn bulk_create(
    service: CatalogService,
    payload: Result<Json<Vec<CreateGame>>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(payloads) = payload?;
    let message = service.create_games(payloads).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(message))))
}
