//! Tutorial use-case service.
//!
//! # Responsibility
//! - Provide stable CRUD entry points for server and CLI callers.
//! - Map repository outcomes into use-case errors (`NotFound`, `EmptyUpdate`).
//!
//! # Invariants
//! - Service APIs never bypass repository validation/persistence contracts.
//! - Create and update return the persisted state read back from storage.

use crate::model::tutorial::{
    NewTutorial, Tutorial, TutorialDraft, TutorialId, TutorialPatch, TutorialValidationError,
};
use crate::repo::tutorial_repo::{RepoError, TutorialListQuery, TutorialRepository};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for tutorial use-cases.
#[derive(Debug)]
pub enum TutorialServiceError {
    /// Input violates a model invariant.
    Validation(TutorialValidationError),
    /// Update payload carries no field.
    EmptyUpdate,
    /// Target tutorial does not exist.
    NotFound(TutorialId),
    /// Persistence-layer failure.
    Repo(RepoError),
    /// Internal consistency mismatch between write and read-back.
    InconsistentState(&'static str),
}

impl Display for TutorialServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::EmptyUpdate => write!(f, "Data to update can not be empty!"),
            Self::NotFound(id) => write!(f, "tutorial not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => {
                write!(f, "inconsistent tutorial state: {details}")
            }
        }
    }
}

impl Error for TutorialServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for TutorialServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::NotFound(id),
            RepoError::Validation(err) => Self::Validation(err),
            other => Self::Repo(other),
        }
    }
}

impl From<TutorialValidationError> for TutorialServiceError {
    fn from(value: TutorialValidationError) -> Self {
        Self::Validation(value)
    }
}

pub type ServiceResult<T> = Result<T, TutorialServiceError>;

/// Use-case service wrapper for tutorial CRUD operations.
pub struct TutorialService<R: TutorialRepository> {
    repo: R,
}

impl<R: TutorialRepository> TutorialService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates one tutorial from a partial draft.
    ///
    /// # Contract
    /// - Missing `description` defaults to `""`, missing `published` to `false`.
    /// - Missing or blank `title` fails with `Validation(EmptyTitle)`.
    pub fn create_tutorial(&self, draft: TutorialDraft) -> ServiceResult<Tutorial> {
        let new_tutorial = NewTutorial::from_draft(draft);
        new_tutorial.validate()?;

        let id = self.repo.create_tutorial(&new_tutorial)?;
        info!("event=tutorial_create module=service status=ok id={id}");
        self.repo
            .get_tutorial(id)?
            .ok_or(TutorialServiceError::InconsistentState(
                "created tutorial not found in read-back",
            ))
    }

    pub fn get_tutorial(&self, id: TutorialId) -> ServiceResult<Tutorial> {
        self.repo
            .get_tutorial(id)?
            .ok_or(TutorialServiceError::NotFound(id))
    }

    pub fn list_tutorials(&self, query: &TutorialListQuery) -> ServiceResult<Vec<Tutorial>> {
        Ok(self.repo.list_tutorials(query)?)
    }

    /// Lists tutorials whose title contains `title`, ignoring case.
    pub fn find_by_title(&self, title: &str) -> ServiceResult<Vec<Tutorial>> {
        self.list_tutorials(&TutorialListQuery::by_title(title))
    }

    pub fn list_published(&self) -> ServiceResult<Vec<Tutorial>> {
        self.list_tutorials(&TutorialListQuery::published())
    }

    /// Overwrites the fields present in `patch` and returns the new state.
    ///
    /// # Contract
    /// - An empty patch fails with `EmptyUpdate` before touching storage.
    /// - Repeating the same patch leaves the fields unchanged.
    pub fn update_tutorial(
        &self,
        id: TutorialId,
        patch: &TutorialPatch,
    ) -> ServiceResult<Tutorial> {
        if patch.is_empty() {
            warn!("event=tutorial_update module=service status=rejected id={id} reason=empty_patch");
            return Err(TutorialServiceError::EmptyUpdate);
        }
        patch.validate()?;

        self.repo.update_tutorial(id, patch)?;
        info!("event=tutorial_update module=service status=ok id={id}");
        self.repo
            .get_tutorial(id)?
            .ok_or(TutorialServiceError::InconsistentState(
                "updated tutorial not found in read-back",
            ))
    }

    pub fn delete_tutorial(&self, id: TutorialId) -> ServiceResult<()> {
        self.repo.delete_tutorial(id)?;
        info!("event=tutorial_delete module=service status=ok id={id}");
        Ok(())
    }

    /// Deletes every tutorial and returns how many rows were removed.
    pub fn delete_all_tutorials(&self) -> ServiceResult<u64> {
        let deleted = self.repo.delete_all_tutorials()?;
        info!("event=tutorial_delete_all module=service status=ok deleted={deleted}");
        Ok(deleted)
    }
}
