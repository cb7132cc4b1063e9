//! Markup module - turn marker-delimited names in notes into links
//!
//! Notes mark entity names with a marker character on each side:
//! `Meet *Bob* at the inn, beware the @Owlbear@`. Each marker selects a link
//! kind. Paragraphs and `[list]` blocks are rewritten before linking.

pub mod api;
pub mod kinds;
pub mod linker;
pub mod lint;
pub mod structure;
