//! API handlers for the library REST endpoints

pub mod books;
pub mod catalog;
pub mod health;
pub mod openapi;
pub mod ratings;
pub mod reservations;

use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::AppState;

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_v1 = Router::new()
        // Health check
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Books
        .route("/books", get(books::list_books).post(books::create_book))
        .route(
            "/books/:id",
            get(books::get_book)
                .put(books::update_book)
                .delete(books::delete_book),
        )
        .route("/books/:id/availability", get(books::get_availability))
        .route("/books/:id/restock", post(books::restock_book))
        .route("/books/:id/queue", get(reservations::get_book_queue))
        .route(
            "/books/:id/ratings",
            get(ratings::get_ratings).post(ratings::rate_book),
        )
        // Categories & tags
        .route(
            "/categories",
            get(catalog::list_categories).post(catalog::create_category),
        )
        .route("/categories/:id", delete(catalog::delete_category))
        .route("/tags", get(catalog::list_tags).post(catalog::create_tag))
        .route("/tags/:id", delete(catalog::delete_tag))
        // Reservations
        .route("/reservations", post(reservations::create_reservation))
        .route("/reservations/sweep", post(reservations::run_sweep))
        .route(
            "/reservations/:id",
            get(reservations::get_reservation).delete(reservations::delete_reservation),
        )
        .route(
            "/reservations/:id/approve",
            post(reservations::approve_reservation),
        )
        .route("/reservations/:id/return", post(reservations::return_reservation))
        .route("/reservations/:id/position", get(reservations::get_queue_position))
        .route("/users/:id/reservations", get(reservations::get_user_reservations))
        .with_state(state);

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi::create_openapi_router())
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use sqlx::postgres::PgPoolOptions;
    use std::sync::Arc;
    use tower::ServiceExt;

    use crate::{config::AppConfig, repository::Repository, services::Services};

    fn lazy_state() -> AppState {
        let config = AppConfig::default();
        // Never connects unless a handler touches the database
        let pool = PgPoolOptions::new()
            .connect_lazy(&config.database.url)
            .expect("valid database url");
        let services = Services::new(Repository::new(pool.clone()), &config.reservations);

        AppState {
            services: Arc::new(services),
            pool,
        }
    }

    #[tokio::test]
    async fn test_health_route() {
        let app = create_router(lazy_state());

        let response = app
            .oneshot(Request::builder().uri("/api/v1/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "healthy");
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let app = create_router(lazy_state());

        let response = app
            .oneshot(Request::builder().uri("/api/v1/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_invalid_reservation_id_is_rejected() {
        let app = create_router(lazy_state());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/reservations/abc")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_malformed_sweep_body_is_rejected() {
        let app = create_router(lazy_state());

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/reservations/sweep")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"as_of": "yesterday"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
