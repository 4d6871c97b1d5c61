//! Domain models for the accounts service.
//!
//! These types represent validated domain objects separate from database row
//! types (see [`crate::db`]) and request bodies (see [`crate::routes`]).

pub mod account;

pub use account::{Account, NewAccount, Profile, ProfileUpdate};
