//! Ratings service

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::rating::{RateBook, Rating, RatingSummary},
    repository::Repository,
};

#[derive(Clone)]
pub struct RatingsService {
    repository: Repository,
}

impl RatingsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Rate a book, replacing the user's previous score
    pub async fn rate(&self, book_id: i32, data: &RateBook) -> AppResult<Rating> {
        data.validate()?;
        self.ensure_book(book_id).await?;
        self.repository.ratings.upsert(book_id, data.user_id, data.score).await
    }

    pub async fn summary(&self, book_id: i32) -> AppResult<RatingSummary> {
        self.ensure_book(book_id).await?;
        let ratings = self.repository.ratings.list_for_book(book_id).await?;
        Ok(RatingSummary::new(book_id, ratings))
    }

    async fn ensure_book(&self, book_id: i32) -> AppResult<()> {
        if !self.repository.books.exists(book_id).await? {
            return Err(AppError::NotFound(format!("Book with id {} not found", book_id)));
        }
        Ok(())
    }
}
