//! Reservation workflow: queue placement, approvals, returns and the overdue sweep
//!
//! Each operation runs in one transaction that locks the book row before it
//! touches any reservation row of that book. Locks are per book, so work on
//! different books never waits on each other.

use chrono::{DateTime, Duration, Utc};
use validator::Validate;

use crate::{
    config::ReservationsConfig,
    error::AppResult,
    models::reservation::{overdue_cutoff, CreateReservation, QueuePosition, Reservation},
    repository::Repository,
};

#[derive(Clone)]
pub struct ReservationsService {
    repository: Repository,
    loan_period: Duration,
    sweep_batch_size: i64,
}

impl ReservationsService {
    pub fn new(repository: Repository, config: &ReservationsConfig) -> Self {
        Self {
            repository,
            loan_period: config.loan_period(),
            sweep_batch_size: config.sweep_batch_size.max(1),
        }
    }

    pub fn loan_period(&self) -> Duration {
        self.loan_period
    }

    /// Get a reservation
    pub async fn get(&self, id: i32) -> AppResult<Reservation> {
        self.repository.reservations.get_by_id(id).await
    }

    /// Active reservations of a book in queue order
    pub async fn list_queue(&self, book_id: i32) -> AppResult<Vec<Reservation>> {
        self.repository.ledger.availability(book_id).await?;
        self.repository.reservations.list_queue(book_id).await
    }

    /// Reservations made by a user
    pub async fn list_for_user(&self, user_id: i32) -> AppResult<Vec<Reservation>> {
        self.repository.reservations.list_for_user(user_id).await
    }

    /// Place of a reservation in its book's queue (0 once returned)
    pub async fn queue_position(&self, id: i32) -> AppResult<QueuePosition> {
        let reservation = self.repository.reservations.get_by_id(id).await?;
        Ok(QueuePosition {
            reservation_id: reservation.id,
            book_id: reservation.book_id,
            position: reservation.queue_position,
        })
    }

    /// Queue a new pending reservation, at the back or at a requested place
    pub async fn create(&self, data: &CreateReservation) -> AppResult<Reservation> {
        data.validate()?;

        let repo = &self.repository;
        let mut tx = repo.pool.begin().await?;

        repo.ledger.lock(&mut tx, data.book_id).await?;
        let mut queue = repo.reservations.load_queue(&mut tx, data.book_id).await?;
        let position = queue.insert(data.position)?;
        repo.reservations.save_positions(&mut tx, &queue).await?;
        let reservation = repo
            .reservations
            .insert(&mut tx, data.book_id, data.user_id, position)
            .await?;

        tx.commit().await?;

        tracing::info!(
            reservation_id = reservation.id,
            book_id = reservation.book_id,
            user_id = reservation.user_id,
            position,
            "Reservation created"
        );
        Ok(reservation)
    }

    /// Approve a pending reservation and check a copy out to it
    pub async fn approve(&self, id: i32) -> AppResult<Reservation> {
        let repo = &self.repository;
        let book_id = repo.reservations.book_id_of(id).await?;
        let mut tx = repo.pool.begin().await?;

        repo.ledger.lock(&mut tx, book_id).await?;
        let reservation = repo.reservations.lock(&mut tx, id).await?;
        reservation.status.approve(id)?;

        let availability = repo.ledger.allocate(&mut tx, book_id).await?;
        let approved = repo.reservations.set_approved(&mut tx, id, Utc::now()).await?;

        tx.commit().await?;

        tracing::info!(
            reservation_id = id,
            book_id,
            total_quantity = availability.total_quantity(),
            "Reservation approved"
        );
        Ok(approved)
    }

    /// Return the copy held by an approved or overdue reservation
    pub async fn return_book(&self, id: i32) -> AppResult<Reservation> {
        let repo = &self.repository;
        let book_id = repo.reservations.book_id_of(id).await?;
        let mut tx = repo.pool.begin().await?;

        repo.ledger.lock(&mut tx, book_id).await?;
        let reservation = repo.reservations.lock(&mut tx, id).await?;
        reservation.status.return_book(id)?;

        let mut queue = repo.reservations.load_queue(&mut tx, book_id).await?;
        let retired_from = queue.remove(id);
        repo.reservations.save_positions(&mut tx, &queue).await?;
        let returned = repo.reservations.set_returned(&mut tx, id, Utc::now()).await?;
        let availability = repo.ledger.release(&mut tx, book_id).await?;

        tx.commit().await?;

        tracing::info!(
            reservation_id = id,
            book_id,
            retired_from = ?retired_from,
            total_quantity = availability.total_quantity(),
            "Reservation returned"
        );
        Ok(returned)
    }

    /// Delete a reservation, closing its queue gap and releasing any copy it held
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let repo = &self.repository;
        let book_id = repo.reservations.book_id_of(id).await?;
        let mut tx = repo.pool.begin().await?;

        repo.ledger.lock(&mut tx, book_id).await?;
        let reservation = repo.reservations.lock(&mut tx, id).await?;

        if reservation.status.is_active() {
            let mut queue = repo.reservations.load_queue(&mut tx, book_id).await?;
            queue.remove(id);
            repo.reservations.save_positions(&mut tx, &queue).await?;
        }

        repo.reservations.delete(&mut tx, id).await?;

        if reservation.status.holds_copy() {
            repo.ledger.release(&mut tx, book_id).await?;
        }

        tx.commit().await?;

        tracing::info!(
            reservation_id = id,
            book_id,
            status = ?reservation.status,
            "Reservation deleted"
        );
        Ok(())
    }

    /// Mark every approved reservation whose loan period has elapsed at `as_of`
    /// as overdue. Returns how many were transitioned.
    ///
    /// Each transition is its own conditional update; no book lock is taken and
    /// a reservation returned concurrently is simply skipped.
    pub async fn run_overdue_sweep(&self, as_of: DateTime<Utc>) -> AppResult<u64> {
        let repo = &self.repository;
        let cutoff = overdue_cutoff(as_of, self.loan_period)?;
        let mut transitioned = 0u64;

        loop {
            let candidates = repo
                .reservations
                .overdue_candidates(cutoff, self.sweep_batch_size)
                .await?;
            let fetched = candidates.len() as i64;
            let mut progressed = false;

            for reservation in candidates {
                if !reservation.is_overdue_at(as_of, self.loan_period) {
                    continue;
                }
                let next = reservation.status.mark_overdue(reservation.id)?;

                if repo
                    .reservations
                    .compare_and_set_status(reservation.id, reservation.status, next)
                    .await?
                {
                    transitioned += 1;
                    progressed = true;
                    tracing::info!(
                        reservation_id = reservation.id,
                        book_id = reservation.book_id,
                        "Reservation overdue"
                    );
                }
            }

            if fetched < self.sweep_batch_size || !progressed {
                break;
            }
        }

        Ok(transitioned)
    }
}
