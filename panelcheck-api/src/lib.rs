//! # PanelCheck API Server Library
//!
//! HTTP surface for PanelCheck: electricians register, track projects and
//! notes, and have panel photos checked against NEC 2023.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `extract`: Extractors with JSON rejections
//! - `middleware`: Security headers and session resolution
//! - `routes`: API route handlers

pub mod app;
pub mod config;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod routes;
