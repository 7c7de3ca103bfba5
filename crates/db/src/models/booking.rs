//! Booking entity model and DTOs.

use rallypoint_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A booking row from the `bookings` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Booking {
    pub id: DbId,
    pub event_id: DbId,
    pub enterprise_id: DbId,
    pub booker_id: Option<DbId>,
    pub number_of_people: i32,
    pub booking_time: Timestamp,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new booking.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateBooking {
    pub event_id: DbId,
    pub enterprise_id: DbId,
    pub number_of_people: i32,
    pub booking_time: Timestamp,
}
