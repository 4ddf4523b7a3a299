//! Process-wide cache of payload type matchers.
//!
//! Every lookup on an [`Attachments`](crate::Attachments) record asks "is this
//! payload a `T`?". The answer is given by a [`TypeMatcher`], which is created
//! once per payload type and then shared by every query for that type, on
//! every thread.
//!
//! The cache is populated lazily: the first call to [`matcher`] for a type
//! registers a matcher for it, later calls get the registered one back. The
//! table is guarded by a reader-writer lock, so concurrent lookups of already
//! registered types only ever take the read side. Two threads registering the
//! same type at the same time both end up with the matcher stored by whichever
//! one took the write lock first.
//!
//! The cache never changes the result of a query. It only avoids building a
//! matcher per call.
//!
//! # Examples
//!
//! ```
//! use nodemeta::type_match;
//!
//! let first = type_match::matcher::<u32>();
//! let second = type_match::matcher::<u32>();
//! assert!(type_match::TypeMatcher::ptr_eq(&first, &second));
//! assert_eq!(first.type_name(), "u32");
//! ```

mod cache_lock;

use core::any::TypeId;

use hashbrown::{HashMap, hash_map::Entry};
use triomphe::Arc;

use crate::{payload::PayloadRef, type_match::cache_lock::CacheLock};

type MatcherMap = HashMap<TypeId, Arc<TypeMatcher>, rustc_hash::FxBuildHasher>;

static MATCHERS: CacheLock<MatcherMap> = CacheLock::new();

/// Answers whether a payload has one specific type.
///
/// Obtain one through [`matcher`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TypeMatcher {
    type_id: TypeId,
    type_name: &'static str,
}

impl TypeMatcher {
    fn new<T: 'static>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: core::any::type_name::<T>(),
        }
    }

    /// The [`TypeId`] this matcher accepts.
    #[must_use]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// The [`core::any::type_name`] of the type this matcher accepts.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Returns `true` if `payload` holds a value of the matched type.
    #[inline]
    #[must_use]
    pub fn matches(&self, payload: PayloadRef<'_>) -> bool {
        payload.type_id() == self.type_id
    }

    /// Returns `true` if both handles refer to the same cached matcher.
    #[must_use]
    pub fn ptr_eq(this: &Arc<Self>, other: &Arc<Self>) -> bool {
        Arc::ptr_eq(this, other)
    }
}

/// Returns the shared matcher for payloads of type `T`, registering it on
/// first use.
#[must_use]
pub fn matcher<T: 'static>() -> Arc<TypeMatcher> {
    let type_id = TypeId::of::<T>();

    if let Some(matcher) = MATCHERS
        .read()
        .get()
        .and_then(|matchers| matchers.get(&type_id))
    {
        return matcher.clone();
    }

    let mut guard = MATCHERS.write();
    match guard.get_or_default().entry(type_id) {
        Entry::Occupied(entry) => entry.get().clone(),
        Entry::Vacant(entry) => {
            let matcher = entry.insert(Arc::new(TypeMatcher::new::<T>()));

            #[cfg(feature = "tracing")]
            tracing::trace!(
                payload_type = matcher.type_name(),
                "registered payload type matcher"
            );

            matcher.clone()
        }
    }
}

/// Number of payload types that currently have a cached matcher.
#[must_use]
pub fn cached_types() -> usize {
    MATCHERS.read().get().map_or(0, |matchers| matchers.len())
}

#[cfg(test)]
mod tests {
    use alloc::string::String;

    use super::*;

    #[test]
    fn test_matcher_is_reused() {
        struct OnlyUsedHere;

        let first = matcher::<OnlyUsedHere>();
        assert!(cached_types() >= 1);
        let second = matcher::<OnlyUsedHere>();

        assert!(TypeMatcher::ptr_eq(&first, &second));
        assert_eq!(first.type_id(), TypeId::of::<OnlyUsedHere>());
    }

    #[test]
    fn test_distinct_types_get_distinct_matchers() {
        let int_matcher = matcher::<i32>();
        let string_matcher = matcher::<String>();

        assert!(!TypeMatcher::ptr_eq(&int_matcher, &string_matcher));
        assert_ne!(int_matcher.type_id(), string_matcher.type_id());
        assert_eq!(string_matcher.type_name(), "alloc::string::String");
    }

    #[test]
    fn test_matcher_send_sync() {
        static_assertions::assert_impl_all!(TypeMatcher: Send, Sync, Copy);
        static_assertions::assert_impl_all!(Arc<TypeMatcher>: Send, Sync);
    }
}
