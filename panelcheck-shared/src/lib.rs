//! # PanelCheck Shared Library
//!
//! Domain types, persistence, authentication and panel analysis used by the
//! PanelCheck API server.
//!
//! ## Module Organization
//!
//! - `models`: Record types (users, projects, notes, panel analyses)
//! - `store`: The `RecordStore` trait with in-memory and PostgreSQL backends
//! - `auth`: Password hashing and the auth gate
//! - `analysis`: NEC compliance analysis via an external vision model
//! - `db`: PostgreSQL pool and migrations

pub mod analysis;
pub mod auth;
pub mod db;
pub mod models;
pub mod store;

/// Current version of the PanelCheck shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
