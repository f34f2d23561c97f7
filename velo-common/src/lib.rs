//! # Velo Common Library
//!
//! Shared code for the velo evidence review console:
//! - Error taxonomy and result alias
//! - Timestamp parsing and combination utilities
//! - Configuration resolution

pub mod config;
pub mod error;
pub mod time;

pub use error::{Error, Result};
