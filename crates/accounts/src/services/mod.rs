//! Business logic services for the accounts API.
//!
//! # Services
//!
//! - `auth` - Registration, password login, bearer tokens, profile access

pub mod auth;
