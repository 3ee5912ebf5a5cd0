//! Reservations repository: rows and per-book queue positions

use chrono::{DateTime, Utc};
use sqlx::{Pool, Postgres, Row, Transaction};

use crate::{
    error::{AppError, AppResult},
    models::{
        queue::BookQueue,
        reservation::{Reservation, ReservationStatus},
    },
};

#[derive(Clone)]
pub struct ReservationsRepository {
    pool: Pool<Postgres>,
}

impl ReservationsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get reservation by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Reservation> {
        sqlx::query_as::<_, Reservation>("SELECT * FROM reservations WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| not_found(id))
    }

    /// Book a reservation belongs to (never changes after creation)
    pub async fn book_id_of(&self, id: i32) -> AppResult<i32> {
        sqlx::query_scalar::<_, i32>("SELECT book_id FROM reservations WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| not_found(id))
    }

    /// Active reservations of a book in queue order
    pub async fn list_queue(&self, book_id: i32) -> AppResult<Vec<Reservation>> {
        let rows = sqlx::query_as::<_, Reservation>(
            r#"
            SELECT * FROM reservations
            WHERE book_id = $1 AND status <> $2
            ORDER BY queue_position, id
            "#,
        )
        .bind(book_id)
        .bind(ReservationStatus::Returned)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// All reservations of a user, newest first
    pub async fn list_for_user(&self, user_id: i32) -> AppResult<Vec<Reservation>> {
        let rows = sqlx::query_as::<_, Reservation>(
            "SELECT * FROM reservations WHERE user_id = $1 ORDER BY created_at DESC, id DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Lock a reservation row. The book row must already be locked.
    pub async fn lock(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        id: i32,
    ) -> AppResult<Reservation> {
        sqlx::query_as::<_, Reservation>("SELECT * FROM reservations WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut **tx)
            .await?
            .ok_or_else(|| not_found(id))
    }

    /// Load a book's active queue. The book row must already be locked.
    pub async fn load_queue(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        book_id: i32,
    ) -> AppResult<BookQueue> {
        let rows = sqlx::query(
            r#"
            SELECT id, queue_position FROM reservations
            WHERE book_id = $1 AND status <> $2
            ORDER BY queue_position, id
            FOR UPDATE
            "#,
        )
        .bind(book_id)
        .bind(ReservationStatus::Returned)
        .fetch_all(&mut **tx)
        .await?;

        let queue = BookQueue::load(
            book_id,
            rows.iter()
                .map(|row| (row.get::<i32, _>("id"), row.get::<i32, _>("queue_position"))),
        );

        if queue.was_repaired() {
            tracing::error!(
                book_id,
                active = queue.len(),
                "Queue positions were not contiguous, renumbering"
            );
        }

        Ok(queue)
    }

    /// Write back every position the queue changed
    pub async fn save_positions(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        queue: &BookQueue,
    ) -> AppResult<()> {
        let (ids, positions): (Vec<i32>, Vec<i32>) = queue.changes().into_iter().unzip();
        if ids.is_empty() {
            return Ok(());
        }

        sqlx::query(
            r#"
            UPDATE reservations AS r
            SET queue_position = v.position, updated_at = NOW()
            FROM UNNEST($1::int4[], $2::int4[]) AS v(id, position)
            WHERE r.id = v.id
            "#,
        )
        .bind(&ids)
        .bind(&positions)
        .execute(&mut **tx)
        .await?;

        tracing::debug!(book_id = queue.book_id(), moved = ids.len(), "Queue positions saved");
        Ok(())
    }

    /// Insert a pending reservation at `position`
    pub async fn insert(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        book_id: i32,
        user_id: i32,
        position: i32,
    ) -> AppResult<Reservation> {
        let row = sqlx::query_as::<_, Reservation>(
            r#"
            INSERT INTO reservations (book_id, user_id, status, queue_position)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(book_id)
        .bind(user_id)
        .bind(ReservationStatus::Pending)
        .bind(position)
        .fetch_one(&mut **tx)
        .await?;

        Ok(row)
    }

    /// Record an approval
    pub async fn set_approved(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        id: i32,
        approved_at: DateTime<Utc>,
    ) -> AppResult<Reservation> {
        let row = sqlx::query_as::<_, Reservation>(
            r#"
            UPDATE reservations
            SET status = $1, approved_at = $2, updated_at = NOW()
            WHERE id = $3
            RETURNING *
            "#,
        )
        .bind(ReservationStatus::Approved)
        .bind(approved_at)
        .bind(id)
        .fetch_one(&mut **tx)
        .await?;

        Ok(row)
    }

    /// Record a return and retire the queue position
    pub async fn set_returned(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        id: i32,
        returned_at: DateTime<Utc>,
    ) -> AppResult<Reservation> {
        let row = sqlx::query_as::<_, Reservation>(
            r#"
            UPDATE reservations
            SET status = $1, queue_position = 0, returned_at = $2, updated_at = NOW()
            WHERE id = $3
            RETURNING *
            "#,
        )
        .bind(ReservationStatus::Returned)
        .bind(returned_at)
        .bind(id)
        .fetch_one(&mut **tx)
        .await?;

        Ok(row)
    }

    /// Delete a reservation row
    pub async fn delete(&self, tx: &mut Transaction<'_, Postgres>, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM reservations WHERE id = $1")
            .bind(id)
            .execute(&mut **tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(not_found(id));
        }

        Ok(())
    }

    /// Approved reservations approved at or before `cutoff`, oldest first
    pub async fn overdue_candidates(
        &self,
        cutoff: DateTime<Utc>,
        limit: i64,
    ) -> AppResult<Vec<Reservation>> {
        let rows = sqlx::query_as::<_, Reservation>(
            r#"
            SELECT * FROM reservations
            WHERE status = $1 AND approved_at <= $2
            ORDER BY approved_at, id
            LIMIT $3
            "#,
        )
        .bind(ReservationStatus::Approved)
        .bind(cutoff)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Move a reservation from `from` to `to` if nobody changed it meanwhile.
    ///
    /// Single statement, so it only holds the reservation row lock while it runs.
    pub async fn compare_and_set_status(
        &self,
        id: i32,
        from: ReservationStatus,
        to: ReservationStatus,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE reservations SET status = $1, updated_at = NOW() WHERE id = $2 AND status = $3",
        )
        .bind(to)
        .bind(id)
        .bind(from)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }
}

fn not_found(id: i32) -> AppError {
    AppError::NotFound(format!("Reservation with id {} not found", id))
}
