//! Domain model for tutorials.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Keep wire naming (`id`, `createdAt`, `updatedAt`) in one place.
//!
//! # Invariants
//! - Every tutorial is identified by a stable `TutorialId`.
//! - Deletion is a hard delete; there are no tombstones.

pub mod tutorial;
