//! # Sentia Common Library
//!
//! Shared code for the Sentia text-analytics services including:
//! - Database schema, typed records and gateway queries
//! - API request/response types (used by the API server and the bot)
//! - Configuration loading
//! - Common error type

pub mod api;
pub mod config;
pub mod db;
pub mod error;

pub use error::{Error, Result};
