//! Configuration module
//!
//! Loads and saves the TOML settings file (API endpoint and key,
//! validation strictness, display options).

pub mod config;
