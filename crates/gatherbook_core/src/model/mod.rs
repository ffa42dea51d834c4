//! Domain model for the gathering manager.
//!
//! # Responsibility
//! - Define the canonical records owned by the entity store.
//! - Keep stable identity separate from mutable display text.
//!
//! # Invariants
//! - Every entity is identified by a stable `EntityId` assigned at creation.
//! - Relationship links reference entities by id, never by display name.

pub mod entity;
