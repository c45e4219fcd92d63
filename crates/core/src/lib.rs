//! # CueFinder Core
//!
//! Domain types and rules for the venue dashboard: the booking and table
//! status vocabularies, the store boundary, booking/table repositories with
//! live subscriptions, the occupancy reconciler and the venue directory.
//!
//! Nothing in this crate knows which database sits behind the
//! [`store`] traits.

pub mod auth;
pub mod directory;
pub mod errors;
pub mod models;
pub mod reconcile;
pub mod repository;
pub mod search;
pub mod store;
pub mod subscription;
