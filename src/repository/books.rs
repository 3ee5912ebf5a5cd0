//! Books repository for catalog operations

use std::collections::HashMap;

use sqlx::{Pool, Postgres, Row, Transaction};

use crate::{
    error::{AppError, AppResult},
    models::{
        book::{Book, CreateBook, UpdateBook},
        catalog::Tag,
    },
};

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get book by ID, with its tags
    pub async fn get_by_id(&self, id: i32) -> AppResult<Book> {
        let mut book = sqlx::query_as::<_, Book>("SELECT * FROM books WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))?;

        book.tags = self.tags_of(&[id]).await?.remove(&id).unwrap_or_default();
        Ok(book)
    }

    /// List all books, with their tags
    pub async fn list(&self) -> AppResult<Vec<Book>> {
        let mut books = sqlx::query_as::<_, Book>("SELECT * FROM books ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        let ids: Vec<i32> = books.iter().map(|b| b.id).collect();
        let mut tags = self.tags_of(&ids).await?;
        for book in &mut books {
            book.tags = tags.remove(&book.id).unwrap_or_default();
        }

        Ok(books)
    }

    /// Create a new book with its tags
    pub async fn create(&self, data: &CreateBook) -> AppResult<Book> {
        let mut tx = self.pool.begin().await?;

        let quantity = data.quantity.max(0);
        let id = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO books (
                name, author, description, isbn, category_id, visible,
                total_quantity, is_available
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id
            "#,
        )
        .bind(&data.name)
        .bind(&data.author)
        .bind(data.description.as_deref().unwrap_or_default())
        .bind(data.isbn.as_deref().unwrap_or_default())
        .bind(data.category_id)
        .bind(data.visible.unwrap_or(true))
        .bind(quantity)
        .bind(quantity > 0)
        .fetch_one(&mut *tx)
        .await?;

        set_tags(&mut tx, id, &data.tag_ids).await?;
        tx.commit().await?;

        self.get_by_id(id).await
    }

    /// Update book metadata
    pub async fn update(&self, id: i32, data: &UpdateBook) -> AppResult<Book> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            UPDATE books SET
                name = COALESCE($1, name),
                author = COALESCE($2, author),
                description = COALESCE($3, description),
                isbn = COALESCE($4, isbn),
                category_id = CASE WHEN $6 THEN $5 ELSE category_id END,
                visible = COALESCE($7, visible),
                updated_at = NOW()
            WHERE id = $8
            "#,
        )
        .bind(&data.name)
        .bind(&data.author)
        .bind(&data.description)
        .bind(&data.isbn)
        .bind(data.category_id.flatten())
        .bind(data.category_id.is_some())
        .bind(data.visible)
        .bind(id)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Book with id {} not found", id)));
        }

        if let Some(ref tag_ids) = data.tag_ids {
            sqlx::query("DELETE FROM book_tags WHERE book_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;
            set_tags(&mut tx, id, tag_ids).await?;
        }

        tx.commit().await?;
        self.get_by_id(id).await
    }

    /// Delete a book; its reservations and ratings go with it
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Book with id {} not found", id)));
        }

        Ok(())
    }

    /// Check a book exists
    pub async fn exists(&self, id: i32) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM books WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    async fn tags_of(&self, book_ids: &[i32]) -> AppResult<HashMap<i32, Vec<Tag>>> {
        let rows = sqlx::query(
            r#"
            SELECT bt.book_id, t.id, t.name
            FROM book_tags bt
            JOIN tags t ON t.id = bt.tag_id
            WHERE bt.book_id = ANY($1)
            ORDER BY t.name
            "#,
        )
        .bind(book_ids)
        .fetch_all(&self.pool)
        .await?;

        let mut tags: HashMap<i32, Vec<Tag>> = HashMap::new();
        for row in rows {
            tags.entry(row.get("book_id")).or_default().push(Tag {
                id: row.get("id"),
                name: row.get("name"),
            });
        }

        Ok(tags)
    }
}

async fn set_tags(tx: &mut Transaction<'_, Postgres>, book_id: i32, tag_ids: &[i32]) -> AppResult<()> {
    if tag_ids.is_empty() {
        return Ok(());
    }

    let known: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tags WHERE id = ANY($1)")
        .bind(tag_ids)
        .fetch_one(&mut **tx)
        .await?;

    let mut unique = tag_ids.to_vec();
    unique.sort_unstable();
    unique.dedup();
    if known != unique.len() as i64 {
        return Err(AppError::Validation("Unknown tag id".to_string()));
    }

    sqlx::query(
        r#"
        INSERT INTO book_tags (book_id, tag_id)
        SELECT $1, UNNEST($2::int4[])
        ON CONFLICT DO NOTHING
        "#,
    )
    .bind(book_id)
    .bind(&unique)
    .execute(&mut **tx)
    .await?;

    Ok(())
}
