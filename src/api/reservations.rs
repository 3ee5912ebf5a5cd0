//! Reservation endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;

use crate::{
    error::AppResult,
    models::reservation::{CreateReservation, QueuePosition, Reservation, SweepReport, SweepRequest},
    AppState,
};

/// Queue a new reservation
#[utoipa::path(
    post,
    path = "/reservations",
    tag = "reservations",
    request_body = CreateReservation,
    responses(
        (status = 201, description = "Reservation queued", body = Reservation),
        (status = 400, description = "Invalid position"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn create_reservation(
    State(state): State<AppState>,
    Json(request): Json<CreateReservation>,
) -> AppResult<(StatusCode, Json<Reservation>)> {
    let reservation = state.services.reservations.create(&request).await?;
    Ok((StatusCode::CREATED, Json(reservation)))
}

/// Get a reservation
#[utoipa::path(
    get,
    path = "/reservations/{id}",
    tag = "reservations",
    params(("id" = i32, Path, description = "Reservation ID")),
    responses(
        (status = 200, description = "Reservation", body = Reservation),
        (status = 404, description = "Reservation not found")
    )
)]
pub async fn get_reservation(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<Reservation>> {
    Ok(Json(state.services.reservations.get(id).await?))
}

/// Delete a reservation
#[utoipa::path(
    delete,
    path = "/reservations/{id}",
    tag = "reservations",
    params(("id" = i32, Path, description = "Reservation ID")),
    responses(
        (status = 204, description = "Reservation deleted"),
        (status = 404, description = "Reservation not found")
    )
)]
pub async fn delete_reservation(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    state.services.reservations.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Approve a pending reservation
#[utoipa::path(
    post,
    path = "/reservations/{id}/approve",
    tag = "reservations",
    params(("id" = i32, Path, description = "Reservation ID")),
    responses(
        (status = 200, description = "Reservation approved", body = Reservation),
        (status = 404, description = "Reservation not found"),
        (status = 409, description = "Already approved or no copies available")
    )
)]
pub async fn approve_reservation(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<Reservation>> {
    Ok(Json(state.services.reservations.approve(id).await?))
}

/// Return the copy held by a reservation
#[utoipa::path(
    post,
    path = "/reservations/{id}/return",
    tag = "reservations",
    params(("id" = i32, Path, description = "Reservation ID")),
    responses(
        (status = 200, description = "Copy returned", body = Reservation),
        (status = 404, description = "Reservation not found"),
        (status = 409, description = "Reservation not approved")
    )
)]
pub async fn return_reservation(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<Reservation>> {
    Ok(Json(state.services.reservations.return_book(id).await?))
}

/// Place of a reservation in its book's queue
#[utoipa::path(
    get,
    path = "/reservations/{id}/position",
    tag = "reservations",
    params(("id" = i32, Path, description = "Reservation ID")),
    responses(
        (status = 200, description = "Queue position, 0 once returned", body = QueuePosition),
        (status = 404, description = "Reservation not found")
    )
)]
pub async fn get_queue_position(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<QueuePosition>> {
    Ok(Json(state.services.reservations.queue_position(id).await?))
}

/// Active reservations of a book in queue order
#[utoipa::path(
    get,
    path = "/books/{id}/queue",
    tag = "reservations",
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book queue", body = Vec<Reservation>),
        (status = 404, description = "Book not found")
    )
)]
pub async fn get_book_queue(
    State(state): State<AppState>,
    Path(book_id): Path<i32>,
) -> AppResult<Json<Vec<Reservation>>> {
    Ok(Json(state.services.reservations.list_queue(book_id).await?))
}

/// Reservations made by a user
#[utoipa::path(
    get,
    path = "/users/{id}/reservations",
    tag = "reservations",
    params(("id" = i32, Path, description = "User ID")),
    responses(
        (status = 200, description = "User reservations", body = Vec<Reservation>)
    )
)]
pub async fn get_user_reservations(
    State(state): State<AppState>,
    Path(user_id): Path<i32>,
) -> AppResult<Json<Vec<Reservation>>> {
    Ok(Json(state.services.reservations.list_for_user(user_id).await?))
}

/// Run the overdue sweep now
#[utoipa::path(
    post,
    path = "/reservations/sweep",
    tag = "reservations",
    request_body = SweepRequest,
    responses(
        (status = 200, description = "Sweep finished", body = SweepReport),
        (status = 400, description = "as_of out of range", body = crate::error::ErrorResponse),
        (status = 422, description = "Malformed request body")
    )
)]
pub async fn run_sweep(
    State(state): State<AppState>,
    Json(request): Json<SweepRequest>,
) -> AppResult<Json<SweepReport>> {
    let as_of = request.as_of.unwrap_or_else(Utc::now);

    let transitioned = state.services.reservations.run_overdue_sweep(as_of).await?;
    Ok(Json(SweepReport { as_of, transitioned }))
}
