//! Repository layer: entity store and relationship index.
//!
//! # Responsibility
//! - Define data access contracts for entity records and link sets.
//! - Keep SQL details inside the storage boundary.
//!
//! # Invariants
//! - Write paths validate display-name contracts before mutating rows.
//! - Repository APIs return semantic errors (`NotFound`) in addition to
//!   storage transport errors.
//! - Link operations only ever receive stable ids, never display text.

pub mod entity_repo;
pub mod link_repo;
