//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Keep HTTP and CLI layers decoupled from storage details.

pub mod tutorial_service;
