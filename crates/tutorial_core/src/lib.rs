//! Core domain logic for the tutorial service.
//! This crate is the single source of truth for business invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status, LogDestination};
pub use model::tutorial::{
    NewTutorial, Tutorial, TutorialDraft, TutorialId, TutorialPatch, TutorialValidationError,
};
pub use repo::tutorial_repo::{
    RepoError, RepoResult, SqliteTutorialRepository, TutorialListQuery, TutorialRepository,
};
pub use service::tutorial_service::{ServiceResult, TutorialService, TutorialServiceError};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
