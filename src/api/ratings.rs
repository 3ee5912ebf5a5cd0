//! Rating endpoints

use axum::{
    extract::{Path, State},
    Json,
};

use crate::{
    error::AppResult,
    models::rating::{RateBook, Rating, RatingSummary},
    AppState,
};

/// Ratings of a book
#[utoipa::path(
    get,
    path = "/books/{id}/ratings",
    tag = "ratings",
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Ratings with average", body = RatingSummary),
        (status = 404, description = "Book not found")
    )
)]
pub async fn get_ratings(
    State(state): State<AppState>,
    Path(book_id): Path<i32>,
) -> AppResult<Json<RatingSummary>> {
    Ok(Json(state.services.ratings.summary(book_id).await?))
}

/// Rate a book (1 to 5); rating again replaces the score
#[utoipa::path(
    post,
    path = "/books/{id}/ratings",
    tag = "ratings",
    params(("id" = i32, Path, description = "Book ID")),
    request_body = RateBook,
    responses(
        (status = 200, description = "Rating stored", body = Rating),
        (status = 400, description = "Score out of range"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn rate_book(
    State(state): State<AppState>,
    Path(book_id): Path<i32>,
    Json(request): Json<RateBook>,
) -> AppResult<Json<Rating>> {
    Ok(Json(state.services.ratings.rate(book_id, &request).await?))
}
