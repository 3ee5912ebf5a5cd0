//! Book endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::book::{Availability, Book, CreateBook, Restock, UpdateBook},
    AppState,
};

/// List books
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    responses((status = 200, description = "All books", body = Vec<Book>))
)]
pub async fn list_books(State(state): State<AppState>) -> AppResult<Json<Vec<Book>>> {
    Ok(Json(state.services.books.list().await?))
}

/// Get a book
#[utoipa::path(
    get,
    path = "/books/{id}",
    tag = "books",
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book", body = Book),
        (status = 404, description = "Book not found")
    )
)]
pub async fn get_book(State(state): State<AppState>, Path(id): Path<i32>) -> AppResult<Json<Book>> {
    Ok(Json(state.services.books.get(id).await?))
}

/// Create a book
#[utoipa::path(
    post,
    path = "/books",
    tag = "books",
    request_body = CreateBook,
    responses(
        (status = 201, description = "Book created", body = Book),
        (status = 400, description = "Invalid request")
    )
)]
pub async fn create_book(
    State(state): State<AppState>,
    Json(request): Json<CreateBook>,
) -> AppResult<(StatusCode, Json<Book>)> {
    let book = state.services.books.create(&request).await?;
    Ok((StatusCode::CREATED, Json(book)))
}

/// Update book metadata
#[utoipa::path(
    put,
    path = "/books/{id}",
    tag = "books",
    params(("id" = i32, Path, description = "Book ID")),
    request_body = UpdateBook,
    responses(
        (status = 200, description = "Book updated", body = Book),
        (status = 404, description = "Book not found")
    )
)]
pub async fn update_book(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(request): Json<UpdateBook>,
) -> AppResult<Json<Book>> {
    Ok(Json(state.services.books.update(id, &request).await?))
}

/// Delete a book with its reservations and ratings
#[utoipa::path(
    delete,
    path = "/books/{id}",
    tag = "books",
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 204, description = "Book deleted"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn delete_book(State(state): State<AppState>, Path(id): Path<i32>) -> AppResult<StatusCode> {
    state.services.books.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Shelf count and availability
#[utoipa::path(
    get,
    path = "/books/{id}/availability",
    tag = "books",
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Availability", body = Availability),
        (status = 404, description = "Book not found")
    )
)]
pub async fn get_availability(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<Availability>> {
    Ok(Json(state.services.books.availability(id).await?))
}

/// Add copies to the shelf
#[utoipa::path(
    post,
    path = "/books/{id}/restock",
    tag = "books",
    params(("id" = i32, Path, description = "Book ID")),
    request_body = Restock,
    responses(
        (status = 200, description = "New availability", body = Availability),
        (status = 400, description = "Invalid copy count"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn restock_book(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(request): Json<Restock>,
) -> AppResult<Json<Availability>> {
    Ok(Json(state.services.books.restock(id, &request).await?))
}
