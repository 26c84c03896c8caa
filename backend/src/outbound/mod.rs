//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL-backed repositories using Diesel ORM
//! - **memory**: in-process repositories for local runs and tests
//! - **geocoding**: HTTP geocoder speaking the Google Maps JSON contract
//! - **images**: uploads directory access through `cap-std`
//!
//! Adapters are thin translators that convert between domain types and
//! infrastructure-specific representations. They contain no business logic.

pub mod geocoding;
pub mod images;
pub mod memory;
pub mod persistence;
