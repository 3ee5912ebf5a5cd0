//! Business logic services

pub mod books;
pub mod catalog;
pub mod ratings;
pub mod reservations;
pub mod sweep;

use crate::{config::ReservationsConfig, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub books: books::BooksService,
    pub catalog: catalog::CatalogService,
    pub ratings: ratings::RatingsService,
    pub reservations: reservations::ReservationsService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, reservations_config: &ReservationsConfig) -> Self {
        Self {
            books: books::BooksService::new(repository.clone()),
            catalog: catalog::CatalogService::new(repository.clone()),
            ratings: ratings::RatingsService::new(repository.clone()),
            reservations: reservations::ReservationsService::new(repository, reservations_config),
        }
    }
}
