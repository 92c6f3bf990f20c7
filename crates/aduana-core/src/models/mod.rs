//! Data models for invoice records, validation outcomes and configuration.

pub mod config;
pub mod outcome;
pub mod record;
