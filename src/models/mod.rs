//! Data models and domain rules

pub mod book;
pub mod catalog;
pub mod queue;
pub mod rating;
pub mod reservation;

// Re-export commonly used types
pub use book::{Availability, Book};
pub use catalog::{Category, Tag};
pub use queue::BookQueue;
pub use rating::{Rating, RatingSummary};
pub use reservation::{Reservation, ReservationStatus};
