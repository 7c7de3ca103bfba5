//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod availability_repo;
pub mod booking_repo;
pub mod enterprise_repo;
pub mod event_repo;
pub mod group_repo;
pub mod membership_repo;
pub mod post_repo;
pub mod session_repo;
pub mod stats_repo;
pub mod user_repo;

pub use availability_repo::AvailabilityRepo;
pub use booking_repo::BookingRepo;
pub use enterprise_repo::EnterpriseRepo;
pub use event_repo::EventRepo;
pub use group_repo::GroupRepo;
pub use membership_repo::MembershipRepo;
pub use post_repo::PostRepo;
pub use session_repo::SessionRepo;
pub use stats_repo::StatsRepo;
pub use user_repo::UserRepo;
