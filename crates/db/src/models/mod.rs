//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) for patches

pub mod availability;
pub mod booking;
pub mod enterprise;
pub mod event;
pub mod group;
pub mod post;
pub mod session;
pub mod stats;
pub mod user;
