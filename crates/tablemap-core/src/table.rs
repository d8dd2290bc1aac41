//! Destination table naming.

use crate::error::MappingError;
use std::{any::type_name, marker::PhantomData};

/// Shortest table name the store accepts.
pub const MIN_TABLE_NAME_LEN: usize = 3;

/// Longest table name the store accepts.
pub const MAX_TABLE_NAME_LEN: usize = 63;

///
/// TableNameProvider
///
/// Supplies the destination table for one entity type. `override_name`, when
/// given, replaces the configured name for a single call.
///

pub trait TableNameProvider: Send + Sync {
    fn table_name(&self, override_name: Option<&str>) -> Result<String, MappingError>;
}

///
/// DefaultTableNameProvider
///
/// Explicit name if one was configured, otherwise the entity type's short
/// name behind an optional prefix.
///

#[derive(Debug)]
pub struct DefaultTableNameProvider<E> {
    explicit: Option<String>,
    prefix: Option<String>,
    _marker: PhantomData<fn() -> E>,
}

impl<E> DefaultTableNameProvider<E> {
    #[must_use]
    pub const fn new(prefix: Option<String>) -> Self {
        Self {
            explicit: None,
            prefix,
            _marker: PhantomData,
        }
    }

    /// Fix the table name, validating it up front.
    pub fn with_name(mut self, name: impl Into<String>) -> Result<Self, MappingError> {
        let name = name.into();
        validate_table_name(&name)?;
        self.explicit = Some(name);

        Ok(self)
    }

    /// Name derived from the entity type, before validation.
    #[must_use]
    pub fn derived_name(&self) -> String {
        let short = short_type_name(type_name::<E>());

        match &self.prefix {
            Some(prefix) => format!("{prefix}{short}"),
            None => short.to_string(),
        }
    }
}

impl<E> TableNameProvider for DefaultTableNameProvider<E> {
    fn table_name(&self, override_name: Option<&str>) -> Result<String, MappingError> {
        let name = match (override_name, &self.explicit) {
            (Some(name), _) => name.to_string(),
            (None, Some(explicit)) => explicit.clone(),
            (None, None) => self.derived_name(),
        };
        validate_table_name(&name)?;

        Ok(name)
    }
}

/// Check the store's table-name rules: 3 to 63 ASCII alphanumerics, starting
/// with a letter.
pub fn validate_table_name(name: &str) -> Result<(), MappingError> {
    let invalid = |reason: &str| MappingError::InvalidTableName {
        name: name.to_string(),
        reason: reason.to_string(),
    };

    if !(MIN_TABLE_NAME_LEN..=MAX_TABLE_NAME_LEN).contains(&name.len()) {
        return Err(invalid("length must be between 3 and 63"));
    }
    if !name.starts_with(|c: char| c.is_ascii_alphabetic()) {
        return Err(invalid("must start with a letter"));
    }
    if !name.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(invalid("only ASCII letters and digits are allowed"));
    }

    Ok(())
}

// `my_app::model::Order<u32>` -> `Order`
fn short_type_name(full: &str) -> &str {
    let base = full.split('<').next().unwrap_or(full);

    base.rsplit("::").next().unwrap_or(base)
}

///
/// TESTS
///
