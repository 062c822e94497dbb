use std::time::Duration;

use axum::{
    http::{header, Method, StatusCode},
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::{
    handlers::{
        admin::{invalidate_cache, warm_cache},
        dashboard::{get_dashboard, get_slice},
        health::{healthz, livez},
        records::{create_inventory_item, create_invoice, create_transfer},
        shops::list_shops,
    },
    state::AppState,
};

/// Create the application router with all routes and middleware.
pub fn create_app(state: AppState) -> Router {
    // CORS configuration for API endpoints
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE]);

    // API routes with CORS
    let api_routes = Router::new()
        // Dashboard routes
        .route("/dashboard", get(get_dashboard))
        .route("/dashboard/{slice}", get(get_slice))
        // Record routes
        .route("/shops", get(list_shops))
        .route("/invoices", post(create_invoice))
        .route("/transfers", post(create_transfer))
        .route("/inventory", post(create_inventory_item))
        // Cache administration
        .route("/admin/cache", delete(invalidate_cache))
        .route("/admin/cache/warm", post(warm_cache))
        .layer(cors);

    // Main application router
    Router::new()
        .route("/livez", get(livez))
        .route("/healthz", get(healthz))
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(10),
        ))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use stockroom_core::dashboard::TITLE_OUTSTANDING_INVOICES;
    use stockroom_core::retail::Shop;
    use stockroom_core::storage::ShopRepository;

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let body = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&body).unwrap()
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn outstanding(dashboard: &serde_json::Value) -> f64 {
        dashboard["summaryData"]
            .as_array()
            .unwrap()
            .iter()
            .find(|item| item["title"] == TITLE_OUTSTANDING_INVOICES)
            .and_then(|item| item["value"].as_f64())
            .unwrap()
    }

    #[tokio::test]
    async fn test_livez() {
        let app = create_app(AppState::default());

        let response = app.oneshot(get_request("/livez")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_healthz_reports_backends() {
        let app = create_app(AppState::default());

        let response = app.oneshot(get_request("/healthz")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["healthy"], true);
        assert_eq!(json["cache"], true);
        assert_eq!(json["store"], true);
    }

    #[tokio::test]
    async fn test_dashboard_on_empty_store() {
        let app = create_app(AppState::default());

        let response = app.oneshot(get_request("/api/dashboard")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["success"], true);
        assert_eq!(json["errors"], serde_json::json!([]));
        assert_eq!(outstanding(&json), 0.0);
        assert_eq!(json["shopPerformance"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_dashboard_rejects_inverted_range() {
        let app = create_app(AppState::default());

        let response = app
            .oneshot(get_request(
                "/api/dashboard?startDate=2024-03-31&endDate=2024-03-01",
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["success"], false);
        assert!(json["message"].as_str().unwrap().contains("Invalid"));
    }

    #[tokio::test]
    async fn test_dashboard_rejects_far_out_dates() {
        let app = create_app(AppState::default());

        let response = app
            .oneshot(get_request("/api/dashboard?endDate=-262143-01-01"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert!(json["message"]
            .as_str()
            .unwrap()
            .contains("out of supported range"));
    }

    #[tokio::test]
    async fn test_dashboard_rejects_unknown_period() {
        let app = create_app(AppState::default());

        let response = app
            .oneshot(get_request("/api/dashboard?period=fortnight"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_single_slice() {
        let app = create_app(AppState::default());

        let response = app
            .oneshot(get_request("/api/dashboard/total-value?period=30d"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["success"], true);
        assert_eq!(json["data"]["inventoryValue"], 0.0);
    }

    #[tokio::test]
    async fn test_unknown_slice() {
        let app = create_app(AppState::default());

        let response = app
            .oneshot(get_request("/api/dashboard/widgets"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["message"], "Unknown dashboard slice: widgets");
    }

    #[tokio::test]
    async fn test_invoice_write_refreshes_cached_dashboard() {
        let state = AppState::default();
        let shop = Shop::new("Harbour Street");
        state.store.create_shop(&shop).await.unwrap();
        let app = create_app(state);
        let uri = format!("/api/dashboard?shopId={}", shop.id);

        let before = body_json(app.clone().oneshot(get_request(&uri)).await.unwrap()).await;
        assert_eq!(outstanding(&before), 0.0);

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/invoices",
                serde_json::json!({
                    "shop_id": shop.id,
                    "number": "INV-1",
                    "total": 250.0,
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let after = body_json(app.oneshot(get_request(&uri)).await.unwrap()).await;
        assert_eq!(outstanding(&after), 250.0);
    }

    #[tokio::test]
    async fn test_invalid_transfer_rejected() {
        let app = create_app(AppState::default());
        let shop = uuid::Uuid::new_v4();

        let response = app
            .oneshot(json_request(
                "POST",
                "/api/transfers",
                serde_json::json!({
                    "from_shop_id": shop,
                    "to_shop_id": shop,
                    "item_name": "Lamps",
                    "quantity": 3,
                }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["success"], false);
    }

    #[tokio::test]
    async fn test_admin_invalidate_and_warm() {
        let app = create_app(AppState::default());

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/admin/cache/warm")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let report = body_json(response).await;
        let targets = report["targets"].as_u64().unwrap();
        assert!(targets > 0);
        assert_eq!(report["failed"], 0);

        let response = app
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri("/api/admin/cache?pattern=dashboard:composed:*")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        // The default dashboard plus one per preset.
        assert_eq!(json["removed"], 5);
    }

    #[tokio::test]
    async fn test_list_shops() {
        let state = AppState::default();
        state
            .store
            .create_shop(&Shop::new("Closed Corner").inactive())
            .await
            .unwrap();
        state.store.create_shop(&Shop::new("Open Arcade")).await.unwrap();
        let app = create_app(state);

        let all = body_json(app.clone().oneshot(get_request("/api/shops")).await.unwrap()).await;
        let active = body_json(
            app.oneshot(get_request("/api/shops?activeOnly=true"))
                .await
                .unwrap(),
        )
        .await;

        assert_eq!(all.as_array().unwrap().len(), 2);
        assert_eq!(active.as_array().unwrap().len(), 1);
    }
}
