//! ## Crate layout
//! - `core`: member accessors, mappers, synthesized row types and the
//!   compiled translation plans.
//! - `store`: the storage boundary (`TableStore`) and an in-memory store.
//! - `repository`: typed reads and writes through a mapping configuration.
//!
//! The `prelude` module covers what is needed to declare a mapping and drive
//! a repository.

pub use tablemap_core as core;

pub mod error;
pub mod repository;
pub mod store;

//
// Consts
//

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//
// Re-exports
//

pub use error::RepositoryError;
pub use repository::Repository;
pub use store::{MemoryTableStore, StoreError, TableStore};
pub use tablemap_core::{
    config::MappingSettings, configurator::TableMapping, error::MappingError, member,
    runtime::RuntimeMappingConfiguration,
};

///
/// Prelude
///

pub mod prelude {
    pub use crate::{
        error::RepositoryError,
        repository::Repository,
        store::{MemoryTableStore, TableStore},
    };
    pub use tablemap_core::{
        config::MappingSettings,
        key::{DescendingTimeKeyGenerator, UlidKeyGenerator},
        prelude::*,
        serialize::{CborContent, ContentFormat, JsonContent},
    };
}
