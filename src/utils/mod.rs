//! Utilities Module
//!
//! Logging and configuration shared by the crate and its binary.

pub mod config;
pub mod logging;
