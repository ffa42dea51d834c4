//! Free-text lookup over entity display names.
//!
//! # Responsibility
//! - Expose the substring search surface used for numbered-list selection.
//! - Keep result shaping inside core.

pub mod names;
