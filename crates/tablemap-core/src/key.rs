//! Automatic key generation for entities written with an unset key member.

use crate::mapper::KeyRole;
use chrono::{DateTime, Utc};
use std::{fmt, sync::Arc};
use ulid::Ulid;

///
/// KeyContext
///
/// What a generator can see besides the entity itself.
///

#[derive(Clone, Copy, Debug)]
pub struct KeyContext {
    pub role: KeyRole,
    pub binding: &'static str,
    pub timestamp: DateTime<Utc>,
}

///
/// KeyGenerator
///
/// Produces a key value for an entity whose key member is null or empty.
/// Closures `Fn(&E, &KeyContext) -> String` implement it directly.
///

pub trait KeyGenerator<E>: Send + Sync {
    fn generate(&self, entity: &E, context: &KeyContext) -> String;
}

impl<E, F> KeyGenerator<E> for F
where
    F: Fn(&E, &KeyContext) -> String + Send + Sync,
{
    fn generate(&self, entity: &E, context: &KeyContext) -> String {
        self(entity, context)
    }
}

///
/// UlidKeyGenerator
///
/// Fresh ULID per call, seeded with the write timestamp.
///

#[derive(Clone, Copy, Debug, Default)]
pub struct UlidKeyGenerator;

impl<E> KeyGenerator<E> for UlidKeyGenerator {
    fn generate(&self, _: &E, context: &KeyContext) -> String {
        Ulid::from_datetime(context.timestamp.into()).to_string()
    }
}

///
/// DescendingTimeKeyGenerator
///
/// Zero-padded `i64::MAX - millis`, so lexical key order is newest first.
///

#[derive(Clone, Copy, Debug, Default)]
pub struct DescendingTimeKeyGenerator;

impl DescendingTimeKeyGenerator {
    #[must_use]
    pub fn key_at(timestamp: DateTime<Utc>) -> String {
        let inverted = i64::MAX.saturating_sub(timestamp.timestamp_millis().max(0));

        format!("{inverted:019}")
    }
}

impl<E> KeyGenerator<E> for DescendingTimeKeyGenerator {
    fn generate(&self, _: &E, context: &KeyContext) -> String {
        Self::key_at(context.timestamp)
    }
}

///
/// AutoKey
///
/// A generator bound to the key role it fills.
///

pub struct AutoKey<E> {
    role: KeyRole,
    generator: Arc<dyn KeyGenerator<E>>,
}

impl<E> AutoKey<E> {
    pub fn new(role: KeyRole, generator: impl KeyGenerator<E> + 'static) -> Self {
        Self {
            role,
            generator: Arc::new(generator),
        }
    }

    #[must_use]
    pub const fn role(&self) -> KeyRole {
        self.role
    }

    #[must_use]
    pub fn generate(&self, entity: &E, context: &KeyContext) -> String {
        self.generator.generate(entity, context)
    }
}

impl<E> Clone for AutoKey<E> {
    fn clone(&self) -> Self {
        Self {
            role: self.role,
            generator: Arc::clone(&self.generator),
        }
    }
}

impl<E> fmt::Debug for AutoKey<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AutoKey").field("role", &self.role).finish()
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn context(timestamp: DateTime<Utc>) -> KeyContext {
        KeyContext {
            role: KeyRole::RowKey,
            binding: "RowKey",
            timestamp,
        }
    }

    #[test]
    fn closures_are_generators() {
        let auto = AutoKey::new(KeyRole::RowKey, |entity: &u32, ctx: &KeyContext| {
            format!("{}-{entity}", ctx.binding)
        });

        assert_eq!(auto.generate(&7, &context(Utc::now())), "RowKey-7");
        assert_eq!(auto.role(), KeyRole::RowKey);
    }

    #[test]
    fn descending_keys_sort_newest_first() {
        let older = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let newer = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();

        let older_key = DescendingTimeKeyGenerator::key_at(older);
        let newer_key = DescendingTimeKeyGenerator::key_at(newer);

        assert_eq!(older_key.len(), 19);
        assert_eq!(newer_key.len(), 19);
        assert!(newer_key < older_key);
    }

    #[test]
    fn ulid_keys_carry_the_write_time() {
        let ts = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        let key = KeyGenerator::<()>::generate(&UlidKeyGenerator, &(), &context(ts));

        let parsed = Ulid::from_string(&key).expect("valid ulid");
        assert_eq!(
            parsed.timestamp_ms(),
            u64::try_from(ts.timestamp_millis()).unwrap()
        );
    }
}
