/// Middleware modules for the API server
///
/// This module contains custom middleware for:
/// - Security headers
/// - Cookie sessions (tower-sessions) and the login gate

pub mod security;
pub mod session;
