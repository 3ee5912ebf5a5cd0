//! Inventory ledger: a book's shelf count and availability flag
//!
//! Mutations run inside the caller's transaction and start by locking the
//! book row (`SELECT ... FOR UPDATE`), so the check and the write of an
//! allocation are one unit for every server sharing the database.

use sqlx::{Pool, Postgres, Row, Transaction};

use crate::{
    error::{AppError, AppResult},
    models::book::Availability,
};

#[derive(Clone)]
pub struct LedgerRepository {
    pool: Pool<Postgres>,
}

impl LedgerRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Current availability, without locking
    pub async fn availability(&self, book_id: i32) -> AppResult<Availability> {
        let row = sqlx::query("SELECT total_quantity, is_available FROM books WHERE id = $1")
            .bind(book_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", book_id)))?;

        Ok(Availability::from_stored(row.get("total_quantity"), row.get("is_available")).availability)
    }

    /// Lock the book row for the rest of the transaction and read its ledger
    pub async fn lock(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        book_id: i32,
    ) -> AppResult<Availability> {
        let row = sqlx::query(
            "SELECT total_quantity, is_available FROM books WHERE id = $1 FOR UPDATE",
        )
        .bind(book_id)
        .fetch_optional(&mut **tx)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", book_id)))?;

        let stored_quantity: i32 = row.get("total_quantity");
        let stored_available: bool = row.get("is_available");
        let repaired = Availability::from_stored(stored_quantity, stored_available);

        if repaired.is_violation() {
            tracing::error!(
                book_id,
                stored_quantity,
                stored_available,
                "Inventory invariant violated, repairing ledger row"
            );
            self.store(tx, book_id, repaired.availability).await?;
        }

        Ok(repaired.availability)
    }

    /// Take one copy off the shelf, or fail with `NoCopiesAvailable`
    pub async fn allocate(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        book_id: i32,
    ) -> AppResult<Availability> {
        let current = self.lock(tx, book_id).await?;
        let next = current.allocate(book_id)?;
        self.store(tx, book_id, next).await?;

        tracing::debug!(book_id, total_quantity = next.total_quantity(), "Copy allocated");
        Ok(next)
    }

    /// Put one copy back on the shelf
    pub async fn release(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        book_id: i32,
    ) -> AppResult<Availability> {
        let current = self.lock(tx, book_id).await?;
        let next = current.release();
        self.store(tx, book_id, next).await?;

        tracing::debug!(book_id, total_quantity = next.total_quantity(), "Copy released");
        Ok(next)
    }

    /// Add new copies to the shelf
    pub async fn restock(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        book_id: i32,
        copies: i32,
    ) -> AppResult<Availability> {
        if copies < 1 {
            return Err(AppError::Validation(
                "At least one copy must be added".to_string(),
            ));
        }

        let current = self.lock(tx, book_id).await?;
        let next = current.restock(copies);
        self.store(tx, book_id, next).await?;
        Ok(next)
    }

    async fn store(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        book_id: i32,
        availability: Availability,
    ) -> AppResult<()> {
        sqlx::query(
            "UPDATE books SET total_quantity = $1, is_available = $2, updated_at = NOW() WHERE id = $3",
        )
        .bind(availability.total_quantity())
        .bind(availability.is_available())
        .bind(book_id)
        .execute(&mut **tx)
        .await?;

        Ok(())
    }
}
