use alloc::vec::Vec;
use core::{any::TypeId, fmt};

use nodemeta_internals::RawPayload;

use crate::{
    payload::{PayloadRef, PayloadsIter},
    type_match::TypeMatcher,
};

/// FIXME: Once rust-lang/rust#132922 gets resolved, we can make the `raw` field
/// an unsafe field and remove this module.
mod limit_field_access {
    use alloc::vec::Vec;

    use nodemeta_internals::RawPayload;
    use triomphe::Arc;

    /// The shared, non-empty payload storage of a record.
    ///
    /// Cloning a [`PayloadSet`] only bumps a reference count. The payload
    /// handles inside are never modified after construction, which is what
    /// makes records derived from one another safe to share.
    pub(crate) struct PayloadSet {
        /// # Safety
        ///
        /// The following safety invariants are guaranteed to be upheld as long
        /// as this struct exists:
        ///
        /// 1. All of the inner payloads are `Send + Sync`.
        /// 2. No two inner payloads have the same `TypeId`.
        /// 3. The vector is not empty.
        raw: Arc<Vec<RawPayload>>,
    }

    impl PayloadSet {
        /// Creates a new [`PayloadSet`] from a vector of raw payloads.
        ///
        /// # Safety
        ///
        /// The caller must ensure:
        ///
        /// 1. All of the payloads are `Send + Sync`.
        /// 2. No two payloads have the same `TypeId`.
        /// 3. The vector is not empty.
        #[must_use]
        pub(crate) unsafe fn from_raw(raw: Vec<RawPayload>) -> Self {
            debug_assert!(!raw.is_empty());

            // SAFETY: We must uphold the safety invariants of the raw field:
            // 1. Guaranteed by the caller
            // 2. Guaranteed by the caller
            // 3. Guaranteed by the caller
            Self { raw: Arc::new(raw) }
        }

        /// Provides access to the inner raw payloads.
        #[must_use]
        pub(crate) fn as_raw(&self) -> &[RawPayload] {
            &self.raw
        }
    }

    impl Clone for PayloadSet {
        fn clone(&self) -> Self {
            // SAFETY: The clone shares the exact same payloads, so all invariants
            // carry over.
            Self {
                raw: Arc::clone(&self.raw),
            }
        }
    }
}
pub(crate) use limit_field_access::PayloadSet;

impl PayloadSet {
    /// Creates a set holding only `value`.
    #[must_use]
    pub(crate) fn single<T: Send + Sync + 'static>(value: T) -> Self {
        let mut raw = Vec::with_capacity(1);
        raw.push(RawPayload::new(value));

        // SAFETY:
        // 1. `T: Send + Sync`.
        // 2. There is only one payload.
        // 3. There is exactly one payload.
        unsafe { Self::from_raw(raw) }
    }

    /// Index of the payload accepted by `matcher`, if any.
    #[must_use]
    pub(crate) fn position_of(&self, matcher: &TypeMatcher) -> Option<usize> {
        self.as_raw()
            .iter()
            .position(|raw| matcher.matches(PayloadRef::from_raw(raw.as_ref())))
    }

    /// The payload accepted by `matcher`, if any.
    #[must_use]
    pub(crate) fn find(&self, matcher: &TypeMatcher) -> Option<PayloadRef<'_>> {
        self.as_payloads()
            .iter()
            .find(|&payload| matcher.matches(payload))
    }

    /// Returns a new set in which `value` takes the place of any payload of
    /// the same type. Untouched payloads are shared, not copied.
    #[must_use]
    pub(crate) fn replacing<T: Send + Sync + 'static>(
        &self,
        matcher: &TypeMatcher,
        value: T,
    ) -> Self {
        debug_assert_eq!(matcher.type_id(), TypeId::of::<T>());

        let current = self.as_raw();
        let mut raw = Vec::with_capacity(current.len() + 1);
        raw.extend(
            current
                .iter()
                .filter(|payload| !matcher.matches(PayloadRef::from_raw(payload.as_ref())))
                .cloned(),
        );
        raw.push(RawPayload::new(value));

        // SAFETY:
        // 1. The carried-over payloads are `Send + Sync` by the invariant of `self`,
        //    and the new one because `T: Send + Sync`.
        // 2. Every payload of type `T` was filtered out before pushing `value`, and
        //    the rest were already distinct.
        // 3. We just pushed a payload.
        unsafe { Self::from_raw(raw) }
    }

    /// Returns the set without the payload at `index`, or [`None`] if that
    /// leaves nothing.
    #[must_use]
    pub(crate) fn without(&self, index: usize) -> Option<Self> {
        let current = self.as_raw();
        if current.len() == 1 {
            return None;
        }

        let raw: Vec<RawPayload> = current
            .iter()
            .enumerate()
            .filter(|&(i, _)| i != index)
            .map(|(_, payload)| payload.clone())
            .collect();

        // SAFETY:
        // 1. Every payload comes from `self`, where all payloads are `Send + Sync`.
        // 2. A subset of distinct-typed payloads is still distinct-typed.
        // 3. At least two payloads were present and at most one was dropped.
        let set = unsafe { Self::from_raw(raw) };
        Some(set)
    }

    #[must_use]
    pub(crate) fn as_payloads(&self) -> Payloads<'_> {
        Payloads::from_raw(self.as_raw())
    }
}

// SAFETY:
// The invariants of the `PayloadSet` type guarantee that all payloads are
// `Send + Sync`, and the set is never mutated after construction, so it can be
// shared and sent freely.
unsafe impl Send for PayloadSet {}

// SAFETY:
// The invariants of the `PayloadSet` type guarantee that all payloads are
// `Send + Sync`, and the set is never mutated after construction, so it can be
// shared and sent freely.
unsafe impl Sync for PayloadSet {}

/// The payload set of an [`Attachments`](crate::Attachments) record.
///
/// Holds at most one payload per type. Iteration order is unspecified.
#[derive(Copy, Clone)]
pub struct Payloads<'a> {
    raw: &'a [RawPayload],
}

impl<'a> Payloads<'a> {
    pub(crate) fn from_raw(raw: &'a [RawPayload]) -> Self {
        Self { raw }
    }

    pub(crate) fn empty() -> Self {
        Self { raw: &[] }
    }

    /// Returns the number of payloads.
    #[must_use]
    pub fn len(self) -> usize {
        self.raw.len()
    }

    /// Returns `true` if there are no payloads.
    #[must_use]
    pub fn is_empty(self) -> bool {
        self.raw.is_empty()
    }

    /// Returns an iterator over the payloads.
    pub fn iter(self) -> PayloadsIter<'a> {
        PayloadsIter::from_raw(self.raw.iter())
    }

    /// Returns the payload of type `T`, if present.
    ///
    /// Equivalent to [`Attachments::get`](crate::Attachments::get).
    #[must_use]
    pub fn get<T: 'static>(self) -> Option<&'a T> {
        self.iter().find_map(PayloadRef::downcast::<T>)
    }

    /// Returns `true` if a payload of type `T` is present.
    #[must_use]
    pub fn contains<T: 'static>(self) -> bool {
        self.iter().any(PayloadRef::is::<T>)
    }

    /// Returns `true` if both views refer to the same payload storage.
    ///
    /// Two empty views are always considered the same.
    #[must_use]
    pub fn ptr_eq(self, other: Payloads<'_>) -> bool {
        (self.is_empty() && other.is_empty())
            || (core::ptr::eq(self.raw.as_ptr(), other.raw.as_ptr())
                && self.raw.len() == other.raw.len())
    }
}

impl<'a> IntoIterator for Payloads<'a> {
    type IntoIter = PayloadsIter<'a>;
    type Item = PayloadRef<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Debug for Payloads<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::String;

    use super::*;
    use crate::type_match;

    #[test]
    fn test_replacing_keeps_types_unique() {
        let set = PayloadSet::single(1_i32);
        let set = set.replacing(&type_match::matcher::<String>(), String::from("a"));
        let set = set.replacing(&type_match::matcher::<i32>(), 2_i32);

        let payloads = set.as_payloads();
        assert_eq!(payloads.len(), 2);
        assert_eq!(payloads.get::<i32>(), Some(&2));
        assert_eq!(payloads.get::<String>().map(String::as_str), Some("a"));
    }

    #[test]
    fn test_replacing_shares_untouched_payloads() {
        let before = PayloadSet::single(String::from("kept"));
        let after = before.replacing(&type_match::matcher::<u8>(), 9_u8);

        let kept_before = before.as_payloads().iter().next().unwrap();
        let kept_after = after
            .as_payloads()
            .iter()
            .find(|p| p.is::<String>())
            .unwrap();
        assert!(kept_before.ptr_eq(kept_after));
    }

    #[test]
    fn test_without_last_payload_is_none() {
        let set = PayloadSet::single(1_u64);
        let index = set.position_of(&type_match::matcher::<u64>()).unwrap();
        assert!(set.without(index).is_none());
    }

    #[test]
    fn test_without_keeps_the_rest() {
        let set = PayloadSet::single(1_u64).replacing(&type_match::matcher::<bool>(), true);
        let index = set.position_of(&type_match::matcher::<u64>()).unwrap();
        let rest = set.without(index).unwrap();

        assert_eq!(rest.as_payloads().len(), 1);
        assert_eq!(rest.as_payloads().get::<bool>(), Some(&true));
        assert!(rest.position_of(&type_match::matcher::<u64>()).is_none());
    }

    #[test]
    fn test_payload_set_send_sync() {
        static_assertions::assert_impl_all!(PayloadSet: Send, Sync, Clone);
        static_assertions::assert_not_impl_any!(PayloadSet: Copy);
        static_assertions::assert_not_impl_any!(Payloads<'static>: Send, Sync);
    }
}
