use axum::{response::IntoResponse, Json};
use http::StatusCode;

use crate::{catalog::CatalogService, error::ApiResult};

#[cfg_attr(feature = "openapi", utoipa::path(get, path = "/genre/list", tag = "Genres", operation_id = "listGenres",
    responses((status = StatusCode::ACCEPTED, description = "All genres", body = Vec<potato_dal::genre::Genre>))))]
pub async fn list(service: CatalogService) -> ApiResult<impl IntoResponse> {
    let genres = service.get_all_genres().await?;
    Ok((StatusCode::ACCEPTED, Json(genres)))
}
