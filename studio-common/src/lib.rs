//! # Studio Common Library
//!
//! Shared code for the studio content tools:
//! - Error type
//! - Configuration loading (TOML + environment)
//! - Clock abstraction
//! - UUID helpers

pub mod config;
pub mod error;
pub mod time;
pub mod uuid_utils;

pub use error::{Error, Result};
pub use time::{Clock, ManualClock, SystemClock};
