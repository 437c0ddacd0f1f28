pub mod game;
pub mod genre;
pub mod paging;

use axum::routing::{get, post};
use serde::{Deserialize, Serialize};

use crate::state::AppState;

/// Envelope returned by create operations and by every failure.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ApiResponse {
    pub message: String,
    pub success: bool,
}

impl ApiResponse {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            success: true,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            success: false,
        }
    }
}

pub fn router() -> axum::Router<AppState> {
    axum::Router::new()
        .route("/all/{page}", get(game::list_page))
        .route("/genre/list", get(genre::list))
        .route("/search", get(game::search))
        .route("/create", post(game::create))
        .route("/bulk/create", post(game::bulk_create))
        .route("/{id}", get(game::get))
}

#[cfg(feature = "openapi")]
pub fn api_docs() -> utoipa::openapi::OpenApi {
    use utoipa::OpenApi as _;

    #[derive(utoipa::OpenApi)]
    #[openapi(paths(
        game::list_page,
        game::get,
        game::search,
        game::create,
        game::bulk_create,
        genre::list
    ))]
    struct ApiDocs;

    ApiDocs::openapi()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::AppConfig;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt as _;
    use tracing_test::traced_test;

    async fn app() -> axum::Router {
        let pool = sqlx::sqlite::SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        potato_dal::migrate(&pool).await.unwrap();
        let state = AppState::new(AppConfig::default(), pool);
        axum::Router::new().nest("/api", router()).with_state(state)
    }

    async fn call(app: &axum::Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&body).unwrap_or(Value::Null);
        (status, value)
    }

    fn get_req(uri: &str) -> Request<Body> {
        Request::get(uri).body(Body::empty()).unwrap()
    }

    fn post_req(uri: &str, payload: &Value) -> Request<Body> {
        Request::post(uri)
            .header("content-type", "application/json")
            .body(Body::from(payload.to_string()))
            .unwrap()
    }

    #[tokio::test]
    #[traced_test]
    async fn test_create_and_read() {
        let app = app().await;
        let payload = json!({
            "title": "Alpha",
            "publisher": "Beta",
            "screenshotUrls": ["http://img/1.png", "http://img/2.png"],
            "fileSize": 1024,
            "releaseDate": "2020-05-01",
            "genre": {"name": "RPG"}
        });
        let (status, body) = call(&app, post_req("/api/create", &payload)).await;
        assert_eq!(StatusCode::CREATED, status);
        assert_eq!(json!({"message": "Game created successfully", "success": true}), body);

        let (status, body) = call(&app, get_req("/api/all/0")).await;
        assert_eq!(StatusCode::ACCEPTED, status);
        assert_eq!(1, body["totalElements"]);
        let id = body["content"][0]["id"].as_i64().unwrap();

        let (status, body) = call(&app, get_req(&format!("/api/{id}"))).await;
        assert_eq!(StatusCode::ACCEPTED, status);
        assert_eq!("Alpha", body["title"]);
        assert_eq!("2020-05-01", body["releaseDate"]);
        assert_eq!(json!({"name": "RPG"}), body["genre"]);
        assert_eq!(2, body["screenshotUrls"].as_array().unwrap().len());

        let (status, body) = call(&app, get_req("/api/genre/list")).await;
        assert_eq!(StatusCode::ACCEPTED, status);
        assert_eq!(json!([{"name": "RPG"}]), body);

        let (status, body) = call(&app, get_req("/api/search?query=rp")).await;
        assert_eq!(StatusCode::ACCEPTED, status);
        assert_eq!(1, body.as_array().unwrap().len());
    }

    #[tokio::test]
    #[traced_test]
    async fn test_failures_use_envelope() {
        let app = app().await;

        let (status, body) = call(&app, get_req("/api/12345")).await;
        assert_eq!(StatusCode::NOT_FOUND, status);
        assert_eq!(false, body["success"]);
        assert_eq!("Game not found", body["message"]);

        let (status, body) = call(&app, get_req("/api/not-a-number")).await;
        assert_eq!(StatusCode::BAD_REQUEST, status);
        assert_eq!(false, body["success"]);

        let (status, body) = call(&app, get_req("/api/all/-1")).await;
        assert_eq!(StatusCode::BAD_REQUEST, status);
        assert_eq!(false, body["success"]);

        let (status, body) = call(&app, get_req("/api/search")).await;
        assert_eq!(StatusCode::BAD_REQUEST, status);
        assert_eq!(false, body["success"]);

        let (status, body) = call(&app, post_req("/api/create", &json!({"fileSize": "big"}))).await;
        assert!(status.is_client_error());
        assert_eq!(false, body["success"]);
    }

    #[tokio::test]
    #[traced_test]
    async fn test_bulk_create() {
        let app = app().await;
        let payload = json!([
            {"title": "One", "genre": {"name": "FPS"}},
            {"title": "Two", "genre": {"name": "FPS"}},
            {"title": "Three", "genre": {"name": "RTS"}}
        ]);
        let (status, body) = call(&app, post_req("/api/bulk/create", &payload)).await;
        assert_eq!(StatusCode::CREATED, status);
        assert_eq!("bulk update successful", body["message"]);

        let (_, body) = call(&app, get_req("/api/all/0")).await;
        assert_eq!(3, body["numberOfElements"]);
        let (_, body) = call(&app, get_req("/api/genre/list")).await;
        assert_eq!(2, body.as_array().unwrap().len());
    }
}
