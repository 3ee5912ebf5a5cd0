//! Ratings repository

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::rating::Rating,
};

#[derive(Clone)]
pub struct RatingsRepository {
    pool: Pool<Postgres>,
}

impl RatingsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Insert or replace the rating a user gave a book
    pub async fn upsert(&self, book_id: i32, user_id: i32, score: i16) -> AppResult<Rating> {
        let row = sqlx::query_as::<_, Rating>(
            r#"
            INSERT INTO ratings (book_id, user_id, score)
            VALUES ($1, $2, $3)
            ON CONFLICT (book_id, user_id)
            DO UPDATE SET score = EXCLUDED.score, updated_at = NOW()
            RETURNING *
            "#,
        )
        .bind(book_id)
        .bind(user_id)
        .bind(score)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            // Book deleted after the caller checked it
            sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
                AppError::NotFound(format!("Book with id {} not found", book_id))
            }
            other => AppError::Database(other),
        })?;

        Ok(row)
    }

    pub async fn list_for_book(&self, book_id: i32) -> AppResult<Vec<Rating>> {
        let rows = sqlx::query_as::<_, Rating>(
            "SELECT * FROM ratings WHERE book_id = $1 ORDER BY created_at, id",
        )
        .bind(book_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
