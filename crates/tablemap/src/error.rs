use crate::store::StoreError;
use tablemap_core::error::MappingError;
use thiserror::Error as ThisError;

///
/// RepositoryError
///
/// Everything a repository call can fail with: translation through the
/// mapping, or the store itself.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
#[remain::sorted]
pub enum RepositoryError {
    #[error(transparent)]
    Mapping(#[from] MappingError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl RepositoryError {
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::Store(StoreError::NotFound { .. }))
    }

    #[must_use]
    pub const fn is_conflict(&self) -> bool {
        matches!(
            self,
            Self::Store(StoreError::Conflict { .. } | StoreError::PreconditionFailed { .. })
        )
    }
}
