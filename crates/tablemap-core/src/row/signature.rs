use crate::{mapper::ColumnMapper, value::ColumnKind};
use std::{
    fmt,
    hash::{Hash, Hasher},
    sync::Arc,
};
use xxhash_rust::xxh3::Xxh3;

///
/// RowSignature
///
/// Deterministic fingerprint of a mapper set's shape: the ordered
/// (binding name, declared kind) pairs.
///
/// Hashing uses the 64-bit digest; equality compares the pairs themselves, so
/// two equal signatures always describe structurally equal rows.
///

#[derive(Clone, Debug)]
pub struct RowSignature {
    digest: u64,
    columns: Vec<(String, ColumnKind)>,
}

// Bump when the canonical byte layout fed to the hasher changes.
const SIGNATURE_VERSION: u8 = 1;

impl RowSignature {
    #[must_use]
    pub fn new(columns: Vec<(String, ColumnKind)>) -> Self {
        let mut h = Xxh3::new();
        h.update(&[SIGNATURE_VERSION]);

        for (binding, kind) in &columns {
            // length-prefix so ("ab", "c") and ("a", "bc") never collide
            h.update(&(binding.len() as u64).to_be_bytes());
            h.update(binding.as_bytes());
            h.update(kind.label().as_bytes());
            h.update(&[0]);
        }

        Self {
            digest: h.digest(),
            columns,
        }
    }

    /// Signature of a mapper list, in mapper order.
    #[must_use]
    pub fn of<E>(mappers: &[Arc<dyn ColumnMapper<E>>]) -> Self {
        Self::new(
            mappers
                .iter()
                .map(|mapper| (mapper.binding_name().to_string(), mapper.column_kind()))
                .collect(),
        )
    }

    #[must_use]
    pub const fn digest(&self) -> u64 {
        self.digest
    }

    #[must_use]
    pub fn columns(&self) -> &[(String, ColumnKind)] {
        &self.columns
    }
}

impl PartialEq for RowSignature {
    fn eq(&self, other: &Self) -> bool {
        self.digest == other.digest && self.columns == other.columns
    }
}

impl Eq for RowSignature {}

impl Hash for RowSignature {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.digest);
    }
}

impl fmt::Display for RowSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.digest)
    }
}
