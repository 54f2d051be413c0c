/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `auth`: Registration, login, logout, current user
/// - `projects`: Project CRUD and the ownership check
/// - `notes`: Project notes
/// - `analyses`: Panel analysis

pub mod analyses;
pub mod auth;
pub mod health;
pub mod notes;
pub mod projects;
