//! Book model and the inventory ledger arithmetic

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::error::{AppError, AppResult};

use super::catalog::Tag;

/// Book row from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: i32,
    pub name: String,
    pub author: String,
    pub description: String,
    pub isbn: String,
    pub category_id: Option<i32>,
    pub visible: bool,
    /// Copies currently on the shelf (not copies owned)
    pub total_quantity: i32,
    pub is_available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    // Populated by the catalog queries, empty otherwise
    #[sqlx(skip)]
    #[serde(default)]
    pub tags: Vec<Tag>,
}

/// Create book request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBook {
    #[validate(length(min = 1, max = 255, message = "Name must be 1 to 255 characters"))]
    pub name: String,
    #[validate(length(min = 1, max = 255, message = "Author must be 1 to 255 characters"))]
    pub author: String,
    pub description: Option<String>,
    #[validate(length(max = 20, message = "ISBN must be at most 20 characters"))]
    pub isbn: Option<String>,
    pub category_id: Option<i32>,
    #[serde(default)]
    pub tag_ids: Vec<i32>,
    /// Copies initially on the shelf
    #[validate(range(min = 0, message = "Quantity cannot be negative"))]
    pub quantity: i32,
    pub visible: Option<bool>,
}

/// Update book request (metadata only; quantity belongs to the ledger)
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateBook {
    #[validate(length(min = 1, max = 255, message = "Name must be 1 to 255 characters"))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 255, message = "Author must be 1 to 255 characters"))]
    pub author: Option<String>,
    pub description: Option<String>,
    #[validate(length(max = 20, message = "ISBN must be at most 20 characters"))]
    pub isbn: Option<String>,
    /// Absent keeps the category, `null` clears it
    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = Option<i32>)]
    pub category_id: Option<Option<i32>>,
    pub tag_ids: Option<Vec<i32>>,
    pub visible: Option<bool>,
}

/// Marks a key that was sent, so `null` can be told apart from a missing key
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Restock request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct Restock {
    #[validate(range(min = 1, message = "At least one copy must be added"))]
    pub copies: i32,
}

/// A book's shelf count and the availability flag derived from it.
///
/// Fields are only set through the constructors below, which all recompute
/// `is_available`, so a value always satisfies
/// `is_available == (total_quantity > 0)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct Availability {
    total_quantity: i32,
    is_available: bool,
}

/// Outcome of reading a possibly corrupted ledger row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Repaired {
    pub availability: Availability,
    /// Stored quantity when it had gone negative
    pub clamped_from: Option<i32>,
    /// Stored flag disagreed with the quantity
    pub flag_corrected: bool,
}

impl Repaired {
    pub fn is_violation(&self) -> bool {
        self.clamped_from.is_some() || self.flag_corrected
    }
}

impl Availability {
    /// Build from a shelf count, clamping negatives to zero
    pub fn new(total_quantity: i32) -> Self {
        let total_quantity = total_quantity.max(0);
        Self {
            total_quantity,
            is_available: total_quantity > 0,
        }
    }

    /// Rebuild from stored columns, reporting anything that breaks the invariant
    pub fn from_stored(total_quantity: i32, is_available: bool) -> Repaired {
        let availability = Self::new(total_quantity);
        Repaired {
            availability,
            clamped_from: (total_quantity < 0).then_some(total_quantity),
            flag_corrected: is_available != availability.is_available,
        }
    }

    pub fn total_quantity(&self) -> i32 {
        self.total_quantity
    }

    pub fn is_available(&self) -> bool {
        self.is_available
    }

    /// Take one copy off the shelf
    pub fn allocate(self, book_id: i32) -> AppResult<Self> {
        if self.total_quantity <= 0 {
            return Err(AppError::NoCopiesAvailable(book_id));
        }
        Ok(Self::new(self.total_quantity - 1))
    }

    /// Put one copy back on the shelf
    pub fn release(self) -> Self {
        self.restock(1)
    }

    /// Add `copies` to the shelf. Saturates instead of overflowing.
    pub fn restock(self, copies: i32) -> Self {
        Self::new(self.total_quantity.saturating_add(copies.max(0)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_derives_flag() {
        assert!(!Availability::new(0).is_available);
        assert!(Availability::new(3).is_available);
    }

    #[test]
    fn test_allocate_last_copy() {
        let a = Availability::new(1).allocate(7).unwrap();
        assert_eq!(a.total_quantity, 0);
        assert!(!a.is_available);
    }

    #[test]
    fn test_allocate_empty_shelf_rejected() {
        let err = Availability::new(0).allocate(7).unwrap_err();
        assert!(matches!(err, AppError::NoCopiesAvailable(7)));
    }

    #[test]
    fn test_release_makes_available() {
        let a = Availability::new(0).release();
        assert_eq!(a.total_quantity, 1);
        assert!(a.is_available);
    }

    #[test]
    fn test_from_stored_clamps_negative() {
        let repaired = Availability::from_stored(-2, true);
        assert_eq!(repaired.clamped_from, Some(-2));
        assert!(repaired.flag_corrected);
        assert_eq!(repaired.availability, Availability::new(0));
        assert!(repaired.is_violation());

        // Release after repair lands on one, not on -1
        assert_eq!(repaired.availability.release().total_quantity, 1);
    }

    #[test]
    fn test_from_stored_detects_stale_flag() {
        let repaired = Availability::from_stored(2, false);
        assert_eq!(repaired.clamped_from, None);
        assert!(repaired.flag_corrected);
        assert!(repaired.availability.is_available);
    }

    #[test]
    fn test_from_stored_consistent_row() {
        let repaired = Availability::from_stored(4, true);
        assert!(!repaired.is_violation());
    }

    #[test]
    fn test_flag_matches_quantity_after_any_sequence() {
        let mut a = Availability::new(2);
        for step in 0..20 {
            a = if step % 3 == 0 {
                a.release()
            } else {
                a.allocate(1).unwrap_or(a)
            };
            assert!(a.total_quantity >= 0);
            assert_eq!(a.is_available, a.total_quantity > 0);
        }
    }

    #[test]
    fn test_update_distinguishes_null_category() {
        let keep: UpdateBook = serde_json::from_str(r#"{"name": "Emma"}"#).unwrap();
        assert_eq!(keep.category_id, None);

        let clear: UpdateBook = serde_json::from_str(r#"{"category_id": null}"#).unwrap();
        assert_eq!(clear.category_id, Some(None));

        let set: UpdateBook = serde_json::from_str(r#"{"category_id": 4}"#).unwrap();
        assert_eq!(set.category_id, Some(Some(4)));
    }

    #[test]
    fn test_serializes_both_fields() {
        let json = serde_json::to_value(Availability::new(0).restock(3)).unwrap();
        assert_eq!(json["total_quantity"], 3);
        assert_eq!(json["is_available"], true);
    }

    #[test]
    fn test_restock_ignores_negative_and_saturates() {
        assert_eq!(Availability::new(2).restock(-5).total_quantity, 2);
        assert_eq!(Availability::new(i32::MAX).restock(1).total_quantity, i32::MAX);
    }
}
