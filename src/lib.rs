//! Imprenta Server Library
//!
//! HTML to PDF conversion service. A single authenticated endpoint accepts
//! a multipart upload holding an HTML document plus its auxiliary assets
//! and answers with the rendered PDF. This crate exposes the application
//! modules so integration tests can drive the real router with a scripted
//! rendering engine; the server binary lives in main.rs.
//!
//! # Modules
//!
//! - `auth`: static client API key table
//! - `config`: environment-driven configuration
//! - `error`: application error type and its wire mapping
//! - `render`: rendering seam and the Chromium engine
//! - `routes`: HTTP surface
//! - `state`: shared application state
//! - `workspace`: per-request staging directory

pub mod auth;
pub mod config;
pub mod error;
pub mod render;
pub mod routes;
pub mod state;
pub mod workspace;
