//! Book ratings (one per book and user)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Rating {
    pub id: i32,
    pub book_id: i32,
    pub user_id: i32,
    pub score: i16,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Rate book request; rating again replaces the previous score
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RateBook {
    pub user_id: i32,
    #[validate(range(min = 1, max = 5, message = "Score must be between 1 and 5"))]
    pub score: i16,
}

/// Ratings of a book with their aggregate
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RatingSummary {
    pub book_id: i32,
    pub count: i64,
    pub average: Option<f64>,
    pub ratings: Vec<Rating>,
}

impl RatingSummary {
    pub fn new(book_id: i32, ratings: Vec<Rating>) -> Self {
        let count = ratings.len() as i64;
        let average = (count > 0).then(|| {
            ratings.iter().map(|r| f64::from(r.score)).sum::<f64>() / count as f64
        });
        Self {
            book_id,
            count,
            average,
            ratings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rating(score: i16) -> Rating {
        Rating {
            id: 1,
            book_id: 1,
            user_id: 1,
            score,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_summary_average() {
        let summary = RatingSummary::new(1, vec![rating(5), rating(2), rating(2)]);
        assert_eq!(summary.count, 3);
        assert_eq!(summary.average, Some(3.0));
    }

    #[test]
    fn test_summary_empty() {
        let summary = RatingSummary::new(1, Vec::new());
        assert_eq!(summary.count, 0);
        assert_eq!(summary.average, None);
    }

    #[test]
    fn test_score_bounds() {
        assert!(RateBook { user_id: 1, score: 0 }.validate().is_err());
        assert!(RateBook { user_id: 1, score: 6 }.validate().is_err());
        assert!(RateBook { user_id: 1, score: 5 }.validate().is_ok());
    }
}
