//! Core runtime for TableMap: member accessors, property mappers, synthesized
//! row types, and the compiled translation plans that move values between a
//! user entity and a wide-column store row.
//!
//! Configuration flows bottom-up:
//! - `member` resolves declarative selectors into validated accessors
//! - `mapper` binds accessors to columns and validates key cardinality
//! - `row` synthesizes (or reuses) the row type for a mapper-set signature
//! - `translate` compiles the entity <-> row copy plans
//! - `configurator` bundles everything into a `RuntimeMappingConfiguration`
#![warn(unreachable_pub)]

pub mod config;
pub mod configurator;
pub mod error;
pub mod key;
pub mod mapper;
pub mod member;
pub mod row;
pub mod runtime;
pub mod serialize;
pub mod table;
pub mod translate;
pub mod value;

// test
#[cfg(test)]
pub(crate) mod test_fixtures;

///
/// CONSTANTS
///

/// Largest column name the store accepts.
pub const MAX_BINDING_NAME_LEN: usize = 255;

/// Default per-column size bound for serialized Content values.
pub const DEFAULT_MAX_CONTENT_BYTES: usize = 64 * 1024;

///
/// Prelude
///
/// Domain vocabulary needed to declare and consume a mapping.
///

pub mod prelude {
    pub use crate::{
        configurator::TableMapping,
        error::MappingError,
        key::{KeyContext, KeyGenerator},
        mapper::{ColumnMapper, KeyRole, MapperKind},
        member,
        member::{Member, MemberPath},
        row::Row,
        runtime::RuntimeMappingConfiguration,
        value::{ColumnKind, ColumnValue, Value},
    };
}
