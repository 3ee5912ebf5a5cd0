//! Reservation model and its status state machine

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Decode, Encode, FromRow, Postgres};
use utoipa::ToSchema;
use validator::Validate;

use crate::error::{AppError, AppResult};

/// Reservation status, stored as SMALLINT
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
#[repr(i16)]
pub enum ReservationStatus {
    Pending = 1,
    Approved = 2,
    Returned = 3,
    Overdue = 4,
}

impl ReservationStatus {
    /// Still in the book's queue
    pub fn is_active(self) -> bool {
        self != ReservationStatus::Returned
    }

    /// A copy is checked out under this reservation
    pub fn holds_copy(self) -> bool {
        matches!(self, ReservationStatus::Approved | ReservationStatus::Overdue)
    }

    /// Pending -> Approved
    pub fn approve(self, reservation_id: i32) -> AppResult<Self> {
        match self {
            ReservationStatus::Pending => Ok(ReservationStatus::Approved),
            ReservationStatus::Approved | ReservationStatus::Overdue => {
                Err(AppError::AlreadyApproved(reservation_id))
            }
            ReservationStatus::Returned => Err(AppError::InvalidTransition(format!(
                "reservation {} has already been returned",
                reservation_id
            ))),
        }
    }

    /// Approved | Overdue -> Returned
    pub fn return_book(self, reservation_id: i32) -> AppResult<Self> {
        match self {
            ReservationStatus::Approved | ReservationStatus::Overdue => {
                Ok(ReservationStatus::Returned)
            }
            ReservationStatus::Pending | ReservationStatus::Returned => {
                Err(AppError::NotApproved(reservation_id))
            }
        }
    }

    /// Approved -> Overdue
    pub fn mark_overdue(self, reservation_id: i32) -> AppResult<Self> {
        match self {
            ReservationStatus::Approved => Ok(ReservationStatus::Overdue),
            other => Err(AppError::InvalidTransition(format!(
                "reservation {} cannot become overdue from {:?}",
                reservation_id, other
            ))),
        }
    }
}

impl TryFrom<i16> for ReservationStatus {
    type Error = String;

    fn try_from(v: i16) -> Result<Self, Self::Error> {
        match v {
            1 => Ok(ReservationStatus::Pending),
            2 => Ok(ReservationStatus::Approved),
            3 => Ok(ReservationStatus::Returned),
            4 => Ok(ReservationStatus::Overdue),
            _ => Err(format!("Invalid reservation status: {}", v)),
        }
    }
}

impl From<ReservationStatus> for i16 {
    fn from(s: ReservationStatus) -> Self {
        s as i16
    }
}

// SQLx conversion for ReservationStatus
impl sqlx::Type<Postgres> for ReservationStatus {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <i16 as sqlx::Type<Postgres>>::type_info()
    }
}

impl<'r> Decode<'r, Postgres> for ReservationStatus {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let v: i16 = Decode::<Postgres>::decode(value)?;
        ReservationStatus::try_from(v).map_err(|e| e.into())
    }
}

impl Encode<'_, Postgres> for ReservationStatus {
    fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
        <i16 as Encode<Postgres>>::encode(i16::from(*self), buf)
    }
}

/// Reservation row from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Reservation {
    pub id: i32,
    pub book_id: i32,
    pub user_id: i32,
    pub status: ReservationStatus,
    /// 1-based place in the book's queue, 0 once returned
    pub queue_position: i32,
    pub approved_at: Option<DateTime<Utc>>,
    pub returned_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Reservation {
    /// When the copy is due back, if one is checked out
    pub fn due_at(&self, loan_period: Duration) -> Option<DateTime<Utc>> {
        if !self.status.holds_copy() {
            return None;
        }
        self.approved_at
            .and_then(|approved| approved.checked_add_signed(loan_period))
    }

    /// Whether the overdue sweep would pick this reservation up at `as_of`
    pub fn is_overdue_at(&self, as_of: DateTime<Utc>, loan_period: Duration) -> bool {
        self.status == ReservationStatus::Approved
            && self.due_at(loan_period).is_some_and(|due| due <= as_of)
    }
}

/// Latest approval time that is overdue at `as_of`
pub fn overdue_cutoff(as_of: DateTime<Utc>, loan_period: Duration) -> AppResult<DateTime<Utc>> {
    as_of
        .checked_sub_signed(loan_period)
        .ok_or_else(|| AppError::Validation(format!("as_of {} is out of range", as_of)))
}

/// Create reservation request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateReservation {
    pub book_id: i32,
    /// Opaque user identifier
    pub user_id: i32,
    /// Insert at this place instead of appending
    #[validate(range(min = 1, message = "Position must be at least 1"))]
    pub position: Option<i32>,
}

/// Queue position of a reservation
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct QueuePosition {
    pub reservation_id: i32,
    pub book_id: i32,
    pub position: i32,
}

/// Overdue sweep request; send `{}` to sweep as of now
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct SweepRequest {
    #[serde(default)]
    pub as_of: Option<DateTime<Utc>>,
}

/// Overdue sweep result
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SweepReport {
    pub as_of: DateTime<Utc>,
    pub transitioned: u64,
}
