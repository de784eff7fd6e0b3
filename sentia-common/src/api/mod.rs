//! Shared API types for Sentia services

pub mod types;
