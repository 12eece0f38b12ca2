//! Utility functions and data structures.
//!
//! This module provides shared utilities used throughout DXI:
//!
//! ## Modules
//!
//! - [`app_data`] - Application data directory management (XDG-compliant)
//! - [`encoding`] - Little-endian integer read/write helpers

pub mod app_data;
pub mod encoding;

pub use app_data::*;
pub use encoding::*;
