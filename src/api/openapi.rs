//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{books, catalog, health, ratings, reservations};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Library API",
        version = "1.0.0",
        description = "Catalog, ratings and reservation queue REST API"
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Books
        books::list_books,
        books::get_book,
        books::create_book,
        books::update_book,
        books::delete_book,
        books::get_availability,
        books::restock_book,
        // Catalog
        catalog::list_categories,
        catalog::create_category,
        catalog::delete_category,
        catalog::list_tags,
        catalog::create_tag,
        catalog::delete_tag,
        // Ratings
        ratings::get_ratings,
        ratings::rate_book,
        // Reservations
        reservations::create_reservation,
        reservations::get_reservation,
        reservations::delete_reservation,
        reservations::approve_reservation,
        reservations::return_reservation,
        reservations::get_queue_position,
        reservations::get_book_queue,
        reservations::get_user_reservations,
        reservations::run_sweep,
    ),
    components(
        schemas(
            health::HealthResponse,
            crate::error::ErrorResponse,
            crate::models::book::Book,
            crate::models::book::CreateBook,
            crate::models::book::UpdateBook,
            crate::models::book::Restock,
            crate::models::book::Availability,
            crate::models::catalog::Category,
            crate::models::catalog::CreateCategory,
            crate::models::catalog::Tag,
            crate::models::catalog::CreateTag,
            crate::models::rating::Rating,
            crate::models::rating::RateBook,
            crate::models::rating::RatingSummary,
            crate::models::reservation::Reservation,
            crate::models::reservation::ReservationStatus,
            crate::models::reservation::CreateReservation,
            crate::models::reservation::QueuePosition,
            crate::models::reservation::SweepRequest,
            crate::models::reservation::SweepReport,
        )
    ),
    tags(
        (name = "health", description = "Health checks"),
        (name = "books", description = "Books and shelf inventory"),
        (name = "catalog", description = "Categories and tags"),
        (name = "ratings", description = "Book ratings"),
        (name = "reservations", description = "Reservation queue and approvals")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI router with Swagger UI
pub fn create_openapi_router() -> Router {
    Router::new().merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
