//! Core module - Shared data structures and utilities
//!
//! This module provides:
//! - Unified result model (ResultItem)
//! - Rendering functions for different output formats
//! - Note reading and path handling
//! - stderr diagnostics
//! - Common utilities

pub mod file_reader;
pub mod log;
pub mod model;
pub mod paths;
pub mod render;
pub mod util;
