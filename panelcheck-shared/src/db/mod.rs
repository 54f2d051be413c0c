/// Database plumbing for the PostgreSQL backends
///
/// - `pool`: connection pool creation, health check and shutdown
/// - `migrations`: schema migrations embedded from `migrations/`
///
/// The record store that uses the pool is [`crate::store::postgres`]. The
/// migrations also create the `tower_sessions.session` table that the API
/// server's session layer writes to.

pub mod migrations;
pub mod pool;
