//! HTTP router assembly.

use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use crate::{handlers, state::AppState};

/// Build the application router over the given state.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health_check))
        .route(
            "/records",
            get(handlers::api_keys::list_api_keys).post(handlers::api_keys::create_api_key),
        )
        .route(
            "/records/{id}",
            get(handlers::api_keys::get_api_key)
                .put(handlers::api_keys::update_api_key)
                .delete(handlers::api_keys::delete_api_key),
        )
        // Empty id; the handlers answer 400 because no `{id}` segment is captured
        .route(
            "/records/",
            get(handlers::api_keys::get_api_key)
                .put(handlers::api_keys::update_api_key)
                .delete(handlers::api_keys::delete_api_key),
        )
        // Request/response spans for every call
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::{
        body::Body,
        http::{Method, Request, StatusCode, header},
    };
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::*;
    use crate::{
        models::api_key::ApiKeyRecord,
        store::{ApiKeyStore, MemoryApiKeyStore, StoreError},
    };

    /// Store whose every call fails like an unreachable database.
    struct UnreachableStore;

    #[async_trait]
    impl ApiKeyStore for UnreachableStore {
        async fn list_all(&self) -> Result<Vec<ApiKeyRecord>, StoreError> {
            Err(StoreError::Database(sqlx::Error::PoolTimedOut))
        }

        async fn get_by_id(&self, _id: &str) -> Result<Option<ApiKeyRecord>, StoreError> {
            Err(StoreError::Database(sqlx::Error::PoolTimedOut))
        }

        async fn create(&self, _name: &str, _key: &str) -> Result<ApiKeyRecord, StoreError> {
            Err(StoreError::Database(sqlx::Error::PoolTimedOut))
        }

        async fn update(
            &self,
            _id: &str,
            _name: &str,
            _key: &str,
        ) -> Result<Option<ApiKeyRecord>, StoreError> {
            Err(StoreError::Database(sqlx::Error::PoolTimedOut))
        }

        async fn delete_by_id(&self, _id: &str) -> Result<(), StoreError> {
            Err(StoreError::Database(sqlx::Error::PoolTimedOut))
        }

        async fn ping(&self) -> Result<(), StoreError> {
            Err(StoreError::Database(sqlx::Error::PoolTimedOut))
        }
    }

    fn memory_app() -> Router {
        router(AppState::new(Arc::new(MemoryApiKeyStore::new())))
    }

    fn failing_app() -> Router {
        router(AppState::new(Arc::new(UnreachableStore)))
    }

    async fn send(
        app: &Router,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };

        (status, json)
    }

    #[tokio::test]
    async fn full_record_lifecycle() {
        let app = memory_app();

        let (status, created) = send(
            &app,
            Method::POST,
            "/records",
            Some(json!({ "name": "prod", "key": "sk_abc" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["name"], "prod");
        assert_eq!(created["key"], "sk_abc");
        assert!(created["createdAt"].is_string());
        let id = created["id"].as_str().unwrap().to_string();

        let (status, fetched) = send(&app, Method::GET, &format!("/records/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched, created);

        let (status, updated) = send(
            &app,
            Method::PUT,
            &format!("/records/{id}"),
            Some(json!({ "name": "prod2", "key": "sk_def" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["name"], "prod2");
        assert_eq!(updated["key"], "sk_def");
        assert_eq!(updated["id"], created["id"]);
        assert_eq!(updated["createdAt"], created["createdAt"]);

        let (status, deleted) = send(&app, Method::DELETE, &format!("/records/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(deleted, json!({ "success": true }));

        let (status, body) = send(&app, Method::GET, &format!("/records/{id}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "API key not found");
    }

    #[tokio::test]
    async fn list_returns_newest_first() {
        let app = memory_app();

        let (status, body) = send(&app, Method::GET, "/records", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));

        for name in ["older", "newer"] {
            send(
                &app,
                Method::POST,
                "/records",
                Some(json!({ "name": name, "key": "k" })),
            )
            .await;
        }

        let (_, body) = send(&app, Method::GET, "/records", None).await;
        let names: Vec<&str> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, ["newer", "older"]);
    }

    #[tokio::test]
    async fn create_with_missing_fields_is_bad_request() {
        let app = memory_app();

        for body in [
            json!({ "name": "prod" }),
            json!({ "key": "sk_abc" }),
            json!({ "name": "", "key": "sk_abc" }),
            json!({}),
        ] {
            let (status, error) = send(&app, Method::POST, "/records", Some(body)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(error["error"], "Name and key are required");
        }

        let (_, listed) = send(&app, Method::GET, "/records", None).await;
        assert_eq!(listed, json!([]));
    }

    #[tokio::test]
    async fn unparsable_body_is_bad_request() {
        let app = memory_app();
        let request = Request::builder()
            .method(Method::POST)
            .uri("/records")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn sentinel_ids_are_rejected_before_the_store() {
        // The failing store would answer 500 if the request reached it
        let app = failing_app();

        for id in ["undefined", "null", "%5Bid%5D", "%7Bid%7D", ":id", "%20"] {
            let uri = format!("/records/{id}");

            let (status, body) = send(&app, Method::GET, &uri, None).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "GET {uri}");
            assert_eq!(body["error"], "API key ID is required");

            let (status, _) = send(
                &app,
                Method::PUT,
                &uri,
                Some(json!({ "name": "n", "key": "k" })),
            )
            .await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "PUT {uri}");

            let (status, _) = send(&app, Method::DELETE, &uri, None).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "DELETE {uri}");
        }
    }

    #[tokio::test]
    async fn empty_path_id_is_bad_request() {
        let app = failing_app();

        for method in [Method::GET, Method::PUT, Method::DELETE] {
            let body = (method == Method::PUT).then(|| json!({ "name": "n", "key": "k" }));
            let (status, error) = send(&app, method.clone(), "/records/", body).await;

            assert_eq!(status, StatusCode::BAD_REQUEST, "{method} /records/");
            assert_eq!(error["error"], "API key ID is required");
        }
    }

    #[tokio::test]
    async fn undecodable_path_id_uses_json_error_body() {
        let app = failing_app();

        for method in [Method::GET, Method::DELETE] {
            let (status, error) = send(&app, method.clone(), "/records/%FF", None).await;

            assert_eq!(status, StatusCode::BAD_REQUEST, "{method} /records/%FF");
            assert_eq!(error["error"], "API key ID is required");
            assert!(error["details"].is_string());
        }
    }

    #[tokio::test]
    async fn update_checks_id_before_body() {
        let app = failing_app();
        let request = Request::builder()
            .method(Method::PUT)
            .uri("/records/undefined")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let error: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(error["error"], "API key ID is required");
    }

    #[tokio::test]
    async fn malformed_id_differs_from_missing_record() {
        let app = memory_app();

        let (status, body) = send(&app, Method::GET, "/records/12345", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid API key ID format");

        let (status, _) = send(
            &app,
            Method::PUT,
            "/records/12345",
            Some(json!({ "name": "n", "key": "k" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let missing = "/records/550e8400-e29b-41d4-a716-446655440000";
        let (status, _) = send(&app, Method::GET, missing, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(
            &app,
            Method::PUT,
            missing,
            Some(json!({ "name": "n", "key": "k" })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn deleting_unknown_record_succeeds() {
        let app = memory_app();

        let (status, body) = send(
            &app,
            Method::DELETE,
            "/records/550e8400-e29b-41d4-a716-446655440000",
            None,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "success": true }));
    }

    #[tokio::test]
    async fn store_failures_map_to_internal_error() {
        let app = failing_app();
        let id = "550e8400-e29b-41d4-a716-446655440000";

        let (status, body) = send(&app, Method::GET, "/records", None).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "error": "Failed to fetch API keys" }));

        let (status, body) = send(&app, Method::GET, &format!("/records/{id}"), None).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "error": "Failed to fetch API key" }));

        let (status, body) = send(
            &app,
            Method::POST,
            "/records",
            Some(json!({ "name": "n", "key": "k" })),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Failed to create API key");
        assert!(body["details"].is_string());

        let (status, body) = send(
            &app,
            Method::PUT,
            &format!("/records/{id}"),
            Some(json!({ "name": "n", "key": "k" })),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Failed to update API key");
        assert!(body["details"].is_string());

        let (status, body) = send(&app, Method::DELETE, &format!("/records/{id}"), None).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Failed to delete API key");
    }

    #[tokio::test]
    async fn health_reflects_store_reachability() {
        let (status, body) = send(&memory_app(), Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");

        let (status, _) = send(&failing_app(), Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
