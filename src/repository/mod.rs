//! Repository layer for database operations

pub mod books;
pub mod catalog;
pub mod ledger;
pub mod ratings;
pub mod reservations;

use sqlx::{Pool, Postgres};

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub books: books::BooksRepository,
    pub catalog: catalog::CatalogRepository,
    pub ledger: ledger::LedgerRepository,
    pub ratings: ratings::RatingsRepository,
    pub reservations: reservations::ReservationsRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            books: books::BooksRepository::new(pool.clone()),
            catalog: catalog::CatalogRepository::new(pool.clone()),
            ledger: ledger::LedgerRepository::new(pool.clone()),
            ratings: ratings::RatingsRepository::new(pool.clone()),
            reservations: reservations::ReservationsRepository::new(pool.clone()),
            pool,
        }
    }
}
