use crate::{
    error::MappingError,
    mapper::{ColumnMapper, KeyRole, MapperKind},
    member::MemberPath,
};
use std::{cell::OnceCell, collections::HashSet, sync::Arc};

///
/// ValidationState
///
/// Observable state of the cached key-cardinality verdict.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ValidationState {
    Unevaluated,
    Valid,
    Invalid(MappingError),
}

///
/// MapperSet
///
/// Insertion-ordered mapper list, deduplicated by resolved member path.
/// Registration order drives signature hashing and column order.
///

pub struct MapperSet<E> {
    mappers: Vec<Arc<dyn ColumnMapper<E>>>,
    paths: HashSet<MemberPath>,
    verdict: OnceCell<Result<(), MappingError>>,
}

impl<E> MapperSet<E> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            mappers: Vec::new(),
            paths: HashSet::new(),
            verdict: OnceCell::new(),
        }
    }

    /// Register the mapper produced by `factory` unless `path` is already
    /// mapped. Returns whether a mapper was added.
    ///
    /// The factory only runs for new paths, so a repeated registration never
    /// re-checks or overwrites the first one.
    pub fn register<F>(&mut self, path: &MemberPath, factory: F) -> Result<bool, MappingError>
    where
        F: FnOnce() -> Result<Arc<dyn ColumnMapper<E>>, MappingError>,
    {
        if self.paths.contains(path) {
            tracing::debug!(path = %path, "member already mapped; registration ignored");
            return Ok(false);
        }

        let mapper = factory()?;
        tracing::trace!(
            path = %path,
            binding = mapper.binding_name(),
            kind = ?mapper.kind(),
            "mapper registered"
        );

        self.paths.insert(path.clone());
        self.mappers.push(mapper);

        // the set changed; an earlier verdict no longer describes it
        self.verdict = OnceCell::new();

        Ok(true)
    }

    /// Mappers in first-registration order.
    #[must_use]
    pub fn get_all(&self) -> &[Arc<dyn ColumnMapper<E>>] {
        &self.mappers
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.mappers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.mappers.is_empty()
    }

    #[must_use]
    pub fn contains(&self, path: &MemberPath) -> bool {
        self.paths.contains(path)
    }

    /// Mappers of one kind, in registration order.
    pub fn of_kind(&self, kind: MapperKind) -> impl Iterator<Item = &Arc<dyn ColumnMapper<E>>> {
        self.mappers.iter().filter(move |mapper| mapper.kind() == kind)
    }

    /// Enforce exactly one partition key and exactly one row key.
    ///
    /// Evaluated once; later calls return the cached verdict.
    pub fn validate(&self) -> Result<(), MappingError> {
        self.verdict
            .get_or_init(|| {
                let verdict = self
                    .check_key(KeyRole::PartitionKey)
                    .and_then(|()| self.check_key(KeyRole::RowKey));

                match &verdict {
                    Ok(()) => tracing::debug!(mappers = self.len(), "mapping configuration valid"),
                    Err(err) => tracing::debug!(error = %err, "mapping configuration invalid"),
                }

                verdict
            })
            .clone()
    }

    #[must_use]
    pub fn validation_state(&self) -> ValidationState {
        match self.verdict.get() {
            None => ValidationState::Unevaluated,
            Some(Ok(())) => ValidationState::Valid,
            Some(Err(err)) => ValidationState::Invalid(err.clone()),
        }
    }

    fn check_key(&self, role: KeyRole) -> Result<(), MappingError> {
        let found = self.of_kind(role.mapper_kind()).count();

        if found == 1 {
            Ok(())
        } else {
            Err(MappingError::KeyCardinality { role, found })
        }
    }
}

impl<E> Default for MapperSet<E> {
    fn default() -> Self {
        Self::new()
    }
}
