//! Rallypoint domain core.
//!
//! Pure logic with no IO: shared id/timestamp types, the domain error enum,
//! role constants, lifecycle state machines, input validators and the weekly
//! availability aggregation used by the group views.

pub mod availability;
pub mod error;
pub mod roles;
pub mod status;
pub mod types;
pub mod validation;
