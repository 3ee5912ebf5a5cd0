//! Book catalog and ledger queries

use validator::Validate;

use crate::{
    error::AppResult,
    models::book::{Availability, Book, CreateBook, Restock, UpdateBook},
    repository::Repository,
};

#[derive(Clone)]
pub struct BooksService {
    repository: Repository,
}

impl BooksService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self) -> AppResult<Vec<Book>> {
        self.repository.books.list().await
    }

    pub async fn get(&self, id: i32) -> AppResult<Book> {
        self.repository.books.get_by_id(id).await
    }

    pub async fn create(&self, data: &CreateBook) -> AppResult<Book> {
        data.validate()?;
        let book = self.repository.books.create(data).await?;
        tracing::info!(book_id = book.id, total_quantity = book.total_quantity, "Book created");
        Ok(book)
    }

    pub async fn update(&self, id: i32, data: &UpdateBook) -> AppResult<Book> {
        data.validate()?;
        self.repository.books.update(id, data).await
    }

    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.repository.books.delete(id).await?;
        tracing::info!(book_id = id, "Book deleted");
        Ok(())
    }

    /// Shelf count and availability flag
    pub async fn availability(&self, id: i32) -> AppResult<Availability> {
        self.repository.ledger.availability(id).await
    }

    /// Add copies to the shelf
    pub async fn restock(&self, id: i32, data: &Restock) -> AppResult<Availability> {
        data.validate()?;

        let mut tx = self.repository.pool.begin().await?;
        let availability = self.repository.ledger.restock(&mut tx, id, data.copies).await?;
        tx.commit().await?;

        tracing::info!(
            book_id = id,
            copies = data.copies,
            total_quantity = availability.total_quantity(),
            "Book restocked"
        );
        Ok(availability)
    }
}
