//! Member selectors and the path resolver.
//!
//! A `Member<E, T>` is the declarative description of one location inside
//! an entity: a selector expression plus a typed getter and an optional
//! materializing mutator. Resolving it validates the expression and yields an
//! `Accessor` that mappers call on every translation without any name lookup.

mod path;

#[cfg(test)]
mod tests;

use crate::{
    error::MappingError,
    value::{ColumnKind, ColumnValue},
};
use std::{fmt, sync::Arc};

pub use path::MemberPath;

type Getter<E, T> = dyn for<'a> Fn(&'a E) -> Option<&'a T> + Send + Sync;
type Mutator<E, T> = dyn for<'a> Fn(&'a mut E) -> &'a mut T + Send + Sync;

// Pin closure signatures to the higher-ranked shapes above; closures built
// inside generic code cannot infer them otherwise.
fn getter<E, T, F>(f: F) -> Arc<Getter<E, T>>
where
    F: for<'a> Fn(&'a E) -> Option<&'a T> + Send + Sync + 'static,
{
    Arc::new(f)
}

fn mutator<E, T, F>(f: F) -> Arc<Mutator<E, T>>
where
    F: for<'a> Fn(&'a mut E) -> &'a mut T + Send + Sync + 'static,
{
    Arc::new(f)
}

///
/// Member
///
/// Unvalidated selector over `E` producing a `T`.
///

pub struct Member<E, T> {
    expr: String,
    get: Arc<Getter<E, T>>,
    get_mut: Option<Arc<Mutator<E, T>>>,
}

impl<E: 'static, T: 'static> Member<E, T> {
    /// Select a plain field.
    pub fn field<G, M>(expr: impl Into<String>, get: G, get_mut: M) -> Self
    where
        G: for<'a> Fn(&'a E) -> &'a T + Send + Sync + 'static,
        M: for<'a> Fn(&'a mut E) -> &'a mut T + Send + Sync + 'static,
    {
        Self {
            expr: expr.into(),
            get: getter(move |e: &E| Some(get(e))),
            get_mut: Some(mutator(get_mut)),
        }
    }

    /// Select an `Option<T>` field that acts as an intermediate segment.
    ///
    /// Reads yield nothing while the option is `None`; writes materialize it
    /// with `T::default()` first.
    pub fn optional<G, M>(expr: impl Into<String>, get: G, get_mut: M) -> Self
    where
        T: Default,
        G: for<'a> Fn(&'a E) -> &'a Option<T> + Send + Sync + 'static,
        M: for<'a> Fn(&'a mut E) -> &'a mut Option<T> + Send + Sync + 'static,
    {
        Self {
            expr: expr.into(),
            get: getter(move |e: &E| get(e).as_ref()),
            get_mut: Some(mutator(move |e: &mut E| {
                get_mut(e).get_or_insert_with(T::default)
            })),
        }
    }

    /// Select a member that cannot be written back.
    pub fn read_only<G>(expr: impl Into<String>, get: G) -> Self
    where
        G: for<'a> Fn(&'a E) -> Option<&'a T> + Send + Sync + 'static,
    {
        Self {
            expr: expr.into(),
            get: getter(get),
            get_mut: None,
        }
    }

    /// Continue the selector into a member of `T`.
    #[must_use]
    pub fn then<U: 'static>(self, next: Member<T, U>) -> Member<E, U> {
        let expr = format!("{}.{}", self.expr, next.expr);

        let (outer, inner) = (self.get, next.get);
        let get = getter(move |e: &E| outer(e).and_then(|t| inner(t)));

        let get_mut = match (self.get_mut, next.get_mut) {
            (Some(outer), Some(inner)) => Some(mutator(move |e: &mut E| inner(outer(e)))),
            _ => None,
        };

        Member { expr, get, get_mut }
    }

    /// Selector expression as written.
    #[must_use]
    pub fn expr(&self) -> &str {
        &self.expr
    }

    /// Validate the selector expression into an accessor.
    pub fn resolve(self) -> Result<Accessor<E, T>, MappingError> {
        let path = MemberPath::parse(&self.expr)?;

        Ok(Accessor {
            path,
            get: self.get,
            get_mut: self.get_mut,
        })
    }
}

impl<E, T> fmt::Debug for Member<E, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Member")
            .field("expr", &self.expr)
            .field("writable", &self.get_mut.is_some())
            .finish()
    }
}

///
/// Accessor
///
/// Resolved member: a validated path plus the compiled getter/mutator pair.
///

pub struct Accessor<E, T> {
    path: MemberPath,
    get: Arc<Getter<E, T>>,
    get_mut: Option<Arc<Mutator<E, T>>>,
}

impl<E, T> Accessor<E, T> {
    #[must_use]
    pub const fn path(&self) -> &MemberPath {
        &self.path
    }

    #[must_use]
    pub const fn is_writable(&self) -> bool {
        self.get_mut.is_some()
    }

    /// Read the member; `None` when an intermediate segment is absent.
    pub fn get<'a>(&self, entity: &'a E) -> Option<&'a T> {
        (self.get)(entity)
    }

    /// Borrow the member for writing, materializing intermediate segments.
    /// `None` for read-only members.
    pub fn get_mut<'a>(&self, entity: &'a mut E) -> Option<&'a mut T> {
        self.get_mut.as_ref().map(|get_mut| get_mut(entity))
    }

    /// Fail unless the member can be written back.
    pub fn require_writable(&self) -> Result<(), MappingError> {
        if self.is_writable() {
            Ok(())
        } else {
            Err(MappingError::expression(
                self.path.to_string(),
                "read-only member cannot be mapped as a writable column",
            ))
        }
    }
}

impl<E, T> Clone for Accessor<E, T> {
    fn clone(&self) -> Self {
        Self {
            path: self.path.clone(),
            get: Arc::clone(&self.get),
            get_mut: self.get_mut.clone(),
        }
    }
}

impl<E, T> fmt::Debug for Accessor<E, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Accessor")
            .field("path", &self.path)
            .field("writable", &self.is_writable())
            .finish()
    }
}

///
/// TYPE CHECKS
///

/// Key and property members must be store-native primitives; keys must also
/// have a lossless key-text form.
pub fn check_column_type<T: ColumnValue>(
    path: &MemberPath,
    role: &'static str,
    key: bool,
) -> Result<ColumnKind, MappingError> {
    let kind = T::kind();
    let supported = if key {
        kind.is_keyable()
    } else {
        kind.is_primitive()
    };

    if supported {
        Ok(kind)
    } else {
        Err(MappingError::UnsupportedType {
            path: path.to_string(),
            kind,
            role,
        })
    }
}

/// Content members must be complex; primitives belong in a property mapper.
pub fn check_content_type<T: 'static>(path: &MemberPath) -> Result<(), MappingError> {
    match ColumnKind::of::<T>() {
        Some(kind) => Err(MappingError::UnsupportedType {
            path: path.to_string(),
            kind,
            role: "content",
        }),
        None => Ok(()),
    }
}

///
/// member!
///
/// Build a `Member` over a direct field: `member!(Order => category)`, or over
/// an `Option` field used as an intermediate segment: `member!(Order => customer?)`.
///

#[macro_export]
macro_rules! member {
    ($entity:ty => $field:ident ?) => {
        $crate::member::Member::<$entity, _>::optional(
            stringify!($field),
            |e: &$entity| &e.$field,
            |e: &mut $entity| &mut e.$field,
        )
    };
    ($entity:ty => $field:ident) => {
        $crate::member::Member::<$entity, _>::field(
            stringify!($field),
            |e: &$entity| &e.$field,
            |e: &mut $entity| &mut e.$field,
        )
    };
}
