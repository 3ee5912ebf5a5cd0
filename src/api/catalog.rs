//! Category and tag endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::catalog::{Category, CreateCategory, CreateTag, Tag},
    AppState,
};

/// List categories
#[utoipa::path(
    get,
    path = "/categories",
    tag = "catalog",
    responses((status = 200, description = "Categories", body = Vec<Category>))
)]
pub async fn list_categories(State(state): State<AppState>) -> AppResult<Json<Vec<Category>>> {
    Ok(Json(state.services.catalog.list_categories().await?))
}

/// Create a category
#[utoipa::path(
    post,
    path = "/categories",
    tag = "catalog",
    request_body = CreateCategory,
    responses(
        (status = 201, description = "Category created", body = Category),
        (status = 400, description = "Invalid request")
    )
)]
pub async fn create_category(
    State(state): State<AppState>,
    Json(request): Json<CreateCategory>,
) -> AppResult<(StatusCode, Json<Category>)> {
    let category = state.services.catalog.create_category(&request).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

/// Delete a category
#[utoipa::path(
    delete,
    path = "/categories/{id}",
    tag = "catalog",
    params(("id" = i32, Path, description = "Category ID")),
    responses(
        (status = 204, description = "Category deleted"),
        (status = 404, description = "Category not found")
    )
)]
pub async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    state.services.catalog.delete_category(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// List tags
#[utoipa::path(
    get,
    path = "/tags",
    tag = "catalog",
    responses((status = 200, description = "Tags", body = Vec<Tag>))
)]
pub async fn list_tags(State(state): State<AppState>) -> AppResult<Json<Vec<Tag>>> {
    Ok(Json(state.services.catalog.list_tags().await?))
}

/// Create a tag
#[utoipa::path(
    post,
    path = "/tags",
    tag = "catalog",
    request_body = CreateTag,
    responses(
        (status = 201, description = "Tag created", body = Tag),
        (status = 409, description = "Tag already exists")
    )
)]
pub async fn create_tag(
    State(state): State<AppState>,
    Json(request): Json<CreateTag>,
) -> AppResult<(StatusCode, Json<Tag>)> {
    let tag = state.services.catalog.create_tag(&request).await?;
    Ok((StatusCode::CREATED, Json(tag)))
}

/// Delete a tag
#[utoipa::path(
    delete,
    path = "/tags/{id}",
    tag = "catalog",
    params(("id" = i32, Path, description = "Tag ID")),
    responses(
        (status = 204, description = "Tag deleted"),
        (status = 404, description = "Tag not found")
    )
)]
pub async fn delete_tag(State(state): State<AppState>, Path(id): Path<i32>) -> AppResult<StatusCode> {
    state.services.catalog.delete_tag(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
