//! Configuration module for md2html5
//!
//! This module handles the user's default conversion settings, including
//! serialization/deserialization to/from JSON and persistent storage to
//! platform-specific directories.

mod persistence;
mod settings;

pub use persistence::*;
pub use settings::*;
