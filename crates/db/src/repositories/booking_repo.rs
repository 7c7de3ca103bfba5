//! Repository for the `bookings` table.

use rallypoint_core::status::{BookingStatus, EventStatus};
use rallypoint_core::types::DbId;
use sqlx::PgPool;

use crate::models::booking::{Booking, CreateBooking};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, event_id, enterprise_id, booker_id, number_of_people, \
                        booking_time, status, created_at, updated_at";

/// Provides CRUD operations and status transitions for bookings.
pub struct BookingRepo;

impl BookingRepo {
    /// Insert a new `pending` booking placed by `booker_id`.
    pub async fn create(
        pool: &PgPool,
        booker_id: DbId,
        input: &CreateBooking,
    ) -> Result<Booking, sqlx::Error> {
        let query = format!(
            "INSERT INTO bookings (event_id, enterprise_id, booker_id, number_of_people, booking_time)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Booking>(&query)
            .bind(input.event_id)
            .bind(input.enterprise_id)
            .bind(booker_id)
            .bind(input.number_of_people)
            .bind(input.booking_time)
            .fetch_one(pool)
            .await
    }

    /// Find a booking by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Booking>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM bookings WHERE id = $1");
        sqlx::query_as::<_, Booking>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Bookings for one event, newest first.
    pub async fn list_by_event(pool: &PgPool, event_id: DbId) -> Result<Vec<Booking>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM bookings WHERE event_id = $1 ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Booking>(&query)
            .bind(event_id)
            .fetch_all(pool)
            .await
    }

    /// Bookings placed by one user, newest first.
    pub async fn list_by_booker(
        pool: &PgPool,
        booker_id: DbId,
    ) -> Result<Vec<Booking>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM bookings WHERE booker_id = $1 ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Booking>(&query)
            .bind(booker_id)
            .fetch_all(pool)
            .await
    }

    /// Bookings received by an enterprise, optionally filtered by status,
    /// ordered by the time they are for.
    pub async fn list_by_enterprise(
        pool: &PgPool,
        enterprise_id: DbId,
        status: Option<BookingStatus>,
    ) -> Result<Vec<Booking>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM bookings
             WHERE enterprise_id = $1 AND ($2::TEXT IS NULL OR status = $2)
             ORDER BY booking_time ASC, id ASC"
        );
        sqlx::query_as::<_, Booking>(&query)
            .bind(enterprise_id)
            .bind(status.map(|s| s.as_str()))
            .fetch_all(pool)
            .await
    }

    /// Move a booking from `from` to `to`.
    ///
    /// The update only applies while the row is still in `from`, so two racing
    /// transitions cannot both succeed. Returns `None` when the booking does
    /// not exist or has already moved on.
    pub async fn transition(
        pool: &PgPool,
        id: DbId,
        from: BookingStatus,
        to: BookingStatus,
    ) -> Result<Option<Booking>, sqlx::Error> {
        let query = format!(
            "UPDATE bookings SET status = $3
             WHERE id = $1 AND status = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Booking>(&query)
            .bind(id)
            .bind(from.as_str())
            .bind(to.as_str())
            .fetch_optional(pool)
            .await
    }

    /// Accept a pending booking and settle its event on the booked venue.
    ///
    /// In one transaction: the booking becomes `accepted`, the event's venue
    /// is set to the enterprise name, and a `planned` event becomes
    /// `confirmed`. Returns `None` if the booking is no longer pending.
    pub async fn accept(pool: &PgPool, id: DbId) -> Result<Option<Booking>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE bookings SET status = $3
             WHERE id = $1 AND status = $2
             RETURNING {COLUMNS}"
        );
        let booking = sqlx::query_as::<_, Booking>(&query)
            .bind(id)
            .bind(BookingStatus::Pending.as_str())
            .bind(BookingStatus::Accepted.as_str())
            .fetch_optional(&mut *tx)
            .await?;

        let Some(booking) = booking else {
            tx.rollback().await?;
            return Ok(None);
        };

        sqlx::query(
            "UPDATE events SET
                venue = (SELECT name FROM enterprises WHERE id = $2),
                status = CASE WHEN status = $3 THEN $4 ELSE status END
             WHERE id = $1",
        )
        .bind(booking.event_id)
        .bind(booking.enterprise_id)
        .bind(EventStatus::Planned.as_str())
        .bind(EventStatus::Confirmed.as_str())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(Some(booking))
    }
}
