//! Type-erased payload pointer types.
//!
//! This module encapsulates the `ptr` field of [`RawPayload`] and
//! [`RawPayloadRef`], ensuring it is only visible within this module. This
//! visibility restriction guarantees the safety invariant: **the pointer always
//! comes from `triomphe::Arc<PayloadData<T>>`**.
//!
//! # Safety Invariant
//!
//! Since the `ptr` field can only be set via [`RawPayload::from_arc`] (which
//! creates it from `Arc::into_raw`), and cannot be modified afterwards, the
//! pointer provenance remains valid throughout the value's lifetime. The
//! [`Clone`] and [`Drop`] implementations rely on this to adjust the reference
//! count through the vtable.
//!
//! # Type Erasure
//!
//! The concrete type parameter `T` is erased by casting to
//! `PayloadData<Erased>`. The vtable stored within the `PayloadData` provides
//! the runtime type information needed to downcast and release payloads.
//!
//! # Allocation Strategy
//!
//! Payloads use `triomphe::Arc` so that a payload can be shared by every
//! attachment record derived from the one it was inserted into. Payloads are
//! immutable once created, so no weak count and no mutable access is needed.

use core::{any::TypeId, ptr::NonNull};

use crate::{payload::data::PayloadData, util::Erased};

/// A pointer to a [`PayloadData`] that is guaranteed to point to an
/// initialized instance of a [`PayloadData<T>`] for some specific `T`, though
/// we do not know which actual `T` it is.
///
/// However, the pointer is allowed to transition into a non-initialized state
/// inside the [`RawPayload::drop`] method.
///
/// Each [`RawPayload`] owns exactly one strong reference of the underlying
/// [`triomphe::Arc`].
#[repr(transparent)]
pub struct RawPayload {
    /// Pointer to the inner payload data
    ///
    /// # Safety
    ///
    /// The following safety invariants are guaranteed to be upheld as long as
    /// this struct exists:
    ///
    /// 1. The pointer must have been created from a
    ///    `triomphe::Arc<PayloadData<T>>` for some `T` using
    ///    `triomphe::Arc::into_raw`.
    /// 2. This struct owns one strong reference to that `Arc`.
    /// 3. The pointer will point to the same `PayloadData<T>` for the entire
    ///    lifetime of this object.
    ptr: NonNull<PayloadData<Erased>>,
}

impl RawPayload {
    /// Creates a new [`RawPayload`] from a [`triomphe::Arc<PayloadData<T>>`],
    /// taking over its strong reference.
    #[inline]
    pub(super) fn from_arc<T: 'static>(data: triomphe::Arc<PayloadData<T>>) -> Self {
        let ptr: *const PayloadData<T> = triomphe::Arc::into_raw(data);
        let ptr: *mut PayloadData<Erased> = ptr.cast::<PayloadData<Erased>>().cast_mut();

        // SAFETY: Triomphe guarantees that `Arc::into_raw` returns a non-null
        // pointer.
        let ptr: NonNull<PayloadData<Erased>> = unsafe { NonNull::new_unchecked(ptr) };

        Self {
            // SAFETY:
            // 1. We just created the pointer using `triomphe::Arc::into_raw`.
            // 2. The strong reference of `data` has been transferred to us.
            // 3. We are creating the object here and never change the pointer.
            ptr,
        }
    }

    /// Moves `value` into a new reference-counted allocation.
    ///
    /// The returned payload has a strong count of 1.
    #[inline]
    pub fn new<T: 'static>(value: T) -> Self {
        Self::from_arc(triomphe::Arc::new(PayloadData::new(value)))
    }

    /// Returns a reference to the [`PayloadData`] instance.
    #[inline]
    pub fn as_ref(&self) -> RawPayloadRef<'_> {
        RawPayloadRef {
            ptr: self.ptr,
            _marker: core::marker::PhantomData,
        }
    }
}

impl Clone for RawPayload {
    #[inline]
    fn clone(&self) -> Self {
        let vtable = self.as_ref().vtable();

        // SAFETY:
        // 1. The pointer comes from `Arc::into_raw` and is alive, since we hold a
        //    strong reference to it.
        // 2. The vtable returned by `self.as_ref().vtable()` is guaranteed to match
        //    the data in the `PayloadData`.
        unsafe { vtable.clone_arc(self.ptr) }
    }
}

impl core::ops::Drop for RawPayload {
    #[inline]
    fn drop(&mut self) {
        let vtable = self.as_ref().vtable();

        // SAFETY:
        // 1. The pointer comes from `Arc::into_raw` (guaranteed by `from_arc`)
        // 2. The vtable returned by `self.as_ref().vtable()` is guaranteed to match
        //    the data in the `PayloadData`.
        // 3. We own one strong reference and the pointer is not used afterwards,
        //    as we are in the drop function.
        unsafe {
            vtable.drop(self.ptr);
        }
    }
}

/// A lifetime-bound pointer to a [`PayloadData`] that is guaranteed to point
/// to an initialized instance of a [`PayloadData<T>`] for some specific `T`,
/// though we do not know which actual `T` it is.
///
/// We cannot use a [`&'a PayloadData<T>`] directly, because that would
/// require us to know the actual type of the payload, which we do not.
///
/// [`&'a PayloadData<T>`]: PayloadData
#[derive(Clone, Copy)]
#[repr(transparent)]
pub struct RawPayloadRef<'a> {
    /// Pointer to the inner payload data
    ///
    /// # Safety
    ///
    /// The following safety invariants are guaranteed to be upheld as long as
    /// this struct exists:
    ///
    /// 1. The pointer must have been created from a
    ///    `triomphe::Arc<PayloadData<T>>` for some `T` using
    ///    `triomphe::Arc::into_raw`.
    /// 2. A strong reference to that `Arc` is kept alive for `'a`.
    ptr: NonNull<PayloadData<Erased>>,

    /// Marker to tell the compiler that we should
    /// behave the same as a `&'a PayloadData<Erased>`
    _marker: core::marker::PhantomData<&'a PayloadData<Erased>>,
}

impl<'a> RawPayloadRef<'a> {
    /// Casts the [`RawPayloadRef`] to a [`PayloadData<T>`] reference.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. The type `T` matches the actual payload type stored in the
    ///    [`PayloadData`].
    #[inline]
    pub(super) unsafe fn cast_inner<T>(self) -> &'a PayloadData<T> {
        // Debug assertion to catch type mismatches in case of bugs
        debug_assert_eq!(self.vtable().type_id(), TypeId::of::<T>());

        let this = self.ptr.cast::<PayloadData<T>>();
        // SAFETY: Converting the NonNull pointer to a reference is sound because:
        // - The pointer is non-null, aligned and dereferenceable for `'a`
        //   (guaranteed by the invariants of `RawPayloadRef`)
        // - The pointee is initialized and never mutated after creation
        // - The type `T` matches the actual payload type (guaranteed by caller)
        unsafe { this.as_ref() }
    }

    /// Returns a raw pointer to the [`PayloadData`] instance.
    #[inline]
    pub(super) fn as_ptr(self) -> *const PayloadData<Erased> {
        self.ptr.as_ptr()
    }

    /// Returns the [`TypeId`] of the payload.
    #[inline]
    pub fn type_id(self) -> TypeId {
        self.vtable().type_id()
    }

    /// Returns the [`core::any::type_name`] of the payload.
    #[inline]
    pub fn type_name(self) -> &'static str {
        self.vtable().type_name()
    }

    /// Returns the number of [`RawPayload`] handles that currently share this
    /// payload.
    #[inline]
    pub fn strong_count(self) -> usize {
        let vtable = self.vtable();

        // SAFETY:
        // 1. The pointer comes from `Arc::into_raw` and is kept alive for `'a`.
        // 2. The vtable returned by `self.vtable()` is guaranteed to match the data
        //    in the `PayloadData`.
        unsafe { vtable.strong_count(self.ptr) }
    }

    /// Returns `true` if both references point to the same allocation.
    #[inline]
    pub fn ptr_eq(self, other: RawPayloadRef<'_>) -> bool {
        core::ptr::eq(self.as_ptr(), other.as_ptr())
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::String;

    use super::*;

    #[test]
    fn test_raw_payload_size() {
        assert_eq!(
            core::mem::size_of::<RawPayload>(),
            core::mem::size_of::<usize>()
        );
        assert_eq!(
            core::mem::size_of::<Option<RawPayload>>(),
            core::mem::size_of::<usize>()
        );
        assert_eq!(
            core::mem::size_of::<RawPayloadRef<'_>>(),
            core::mem::size_of::<usize>()
        );
        assert_eq!(
            core::mem::size_of::<Option<RawPayloadRef<'_>>>(),
            core::mem::size_of::<usize>()
        );
    }

    #[test]
    fn test_raw_payload_get_refs() {
        let payload = RawPayload::new(100_i32);
        let payload_ref = payload.as_ref();

        let ptr1 = payload_ref.as_ptr();
        let ptr2 = payload_ref.as_ptr();
        assert_eq!(ptr1, ptr2);
    }

    #[test]
    fn test_raw_payload_type_ids() {
        let int_payload = RawPayload::new(42_i32);
        let string_payload = RawPayload::new(String::from("test"));

        let int_ref = int_payload.as_ref();
        let string_ref = string_payload.as_ref();

        assert_eq!(int_ref.type_id(), TypeId::of::<i32>());
        assert_eq!(string_ref.type_id(), TypeId::of::<String>());
        assert!(!core::ptr::eq(int_ref.vtable(), string_ref.vtable()));
    }

    #[test]
    fn test_raw_payload_clone_shares_allocation() {
        let payload = RawPayload::new(String::from("shared"));
        assert_eq!(payload.as_ref().strong_count(), 1);

        let copy = payload.clone();
        assert!(payload.as_ref().ptr_eq(copy.as_ref()));
        assert_eq!(payload.as_ref().strong_count(), 2);

        drop(copy);
        assert_eq!(payload.as_ref().strong_count(), 1);
    }

    #[test]
    fn test_send_sync() {
        static_assertions::assert_not_impl_any!(RawPayload: Send, Sync);
        static_assertions::assert_not_impl_any!(RawPayloadRef<'_>: Send, Sync);
    }
}
