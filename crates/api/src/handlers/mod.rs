pub mod admin;
pub mod auth;
pub mod availability;
pub mod bookings;
pub mod enterprises;
pub mod events;
pub mod groups;
pub mod posts;
pub mod users;
