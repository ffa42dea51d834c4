//! Core use-case services.
//!
//! # Responsibility
//! - Compose entity store, relationship index and name search behind the
//!   single surface consumed by presentation layers.

pub mod gathering_manager;
