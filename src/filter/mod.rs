//! Filter module - show or hide tagged content blocks
//!
//! Active tags select blocks by union (OR) or intersection (AND).

pub mod api;
pub mod blocks;
