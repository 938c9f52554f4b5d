use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

use super::health;
use super::state::AppState;
use super::v1;

/// Create the full router with application state
pub fn create_router_with_state(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/ready", get(health::ready_check))
        .route("/live", get(health::live_check))
        .nest("/v1", v1::create_v1_router())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use super::*;
    use crate::api::state::test_support::test_state;

    async fn json_body(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health_and_live() {
        let app = create_router_with_state(test_state());

        let health = app
            .clone()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(health.status(), StatusCode::OK);
        assert_eq!(json_body(health).await["status"], "healthy");

        let live = app
            .oneshot(Request::get("/live").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(live.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_ready_reports_chunk_count_after_ingest() {
        let app = create_router_with_state(test_state());

        let ready = app
            .clone()
            .oneshot(Request::get("/ready").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let body = json_body(ready).await;
        assert_eq!(body["status"], "degraded");
        assert_eq!(body["chunks"], 0);

        let ingest = app
            .clone()
            .oneshot(post_json(
                "/v1/documents",
                serde_json::json!({
                    "text": "The ablation studies remove the retrieval evaluator.",
                    "source": "paper.md"
                }),
            ))
            .await
            .unwrap();
        assert_eq!(ingest.status(), StatusCode::OK);
        let report = json_body(ingest).await;
        assert_eq!(report["chunks_added"], 1);
        assert_eq!(report["total_chunks"], 1);

        let ready = app
            .oneshot(Request::get("/ready").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let body = json_body(ready).await;
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["chunks"], 1);
    }

    #[tokio::test]
    async fn test_ask_runs_a_cycle() {
        let app = create_router_with_state(test_state());

        app.clone()
            .oneshot(post_json(
                "/v1/documents",
                serde_json::json!({ "text": "The ablation studies remove the retrieval evaluator." }),
            ))
            .await
            .unwrap();

        let response = app
            .oneshot(post_json(
                "/v1/ask",
                serde_json::json!({ "question": "What are the ablation studies?" }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["answer"], "generated answer");
        assert_eq!(body["verdict"], "relevant");
        assert_eq!(
            body["steps"],
            serde_json::json!(["retrieve", "grade", "generate", "done"])
        );
        assert_eq!(body["context"][0]["source"]["origin"], "inline");
        assert!(body.get("rewritten_query").is_none());
    }

    #[tokio::test]
    async fn test_ask_rejects_empty_question() {
        let app = create_router_with_state(test_state());

        let response = app
            .oneshot(post_json("/v1/ask", serde_json::json!({ "question": "" })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["error"]["type"], "invalid_request_error");
        assert_eq!(body["error"]["param"], "question");
    }

    #[tokio::test]
    async fn test_documents_requires_exactly_one_source() {
        let app = create_router_with_state(test_state());

        let response = app
            .oneshot(post_json(
                "/v1/documents",
                serde_json::json!({ "text": "a", "url": "https://example.com" }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_malformed_json_is_api_error() {
        let app = create_router_with_state(test_state());

        let response = app
            .oneshot(
                Request::post("/v1/ask")
                    .header("content-type", "application/json")
                    .body(Body::from("{not json"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["error"]["code"], "json_parse_error");
    }
}
