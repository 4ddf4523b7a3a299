//! Vtable for type-erased payload operations.
//!
//! This module contains the [`PayloadVtable`], which lets us drop, clone and
//! identify payloads whose concrete type `T` has been erased. The fields are
//! private to this module, which guarantees the safety invariant: **the
//! vtable's type parameter matches the actual payload type stored in the
//! [`PayloadData`]**.
//!
//! # Safety Invariant
//!
//! Vtables are only created as `&'static` references via
//! [`PayloadVtable::new`], which pairs the function pointers with one specific
//! type `T` at compile time.

use core::{any::TypeId, ptr::NonNull};

use crate::{
    payload::{data::PayloadData, raw::RawPayload},
    util::Erased,
};

/// Vtable for type-erased payload operations.
///
/// # Safety Invariant
///
/// The fields `drop`, `clone_arc` and `strong_count` are guaranteed to point
/// to the functions defined below, instantiated with the payload type `T`
/// that was used to create this [`PayloadVtable`].
pub(crate) struct PayloadVtable {
    /// Gets the [`TypeId`] of the payload type.
    type_id: fn() -> TypeId,
    /// Gets the [`core::any::type_name`] of the payload type.
    type_name: fn() -> &'static str,
    /// Drops one strong reference to the [`triomphe::Arc<PayloadData<T>>`].
    drop: unsafe fn(NonNull<PayloadData<Erased>>),
    /// Creates a new strong reference to the
    /// [`triomphe::Arc<PayloadData<T>>`].
    clone_arc: unsafe fn(NonNull<PayloadData<Erased>>) -> RawPayload,
    /// Gets the strong count of the [`triomphe::Arc<PayloadData<T>>`].
    strong_count: unsafe fn(NonNull<PayloadData<Erased>>) -> usize,
}

impl PayloadVtable {
    /// Creates a new [`PayloadVtable`] for the payload type `T`.
    pub(super) const fn new<T: 'static>() -> &'static Self {
        const {
            &Self {
                type_id: TypeId::of::<T>,
                type_name: core::any::type_name::<T>,
                drop: drop::<T>,
                clone_arc: clone_arc::<T>,
                strong_count: strong_count::<T>,
            }
        }
    }

    /// Gets the [`TypeId`] of the payload type that was used to create this
    /// [`PayloadVtable`].
    #[inline]
    pub(super) fn type_id(&self) -> TypeId {
        (self.type_id)()
    }

    /// Gets the [`core::any::type_name`] of the payload type that was used to
    /// create this [`PayloadVtable`].
    #[inline]
    pub(super) fn type_name(&self) -> &'static str {
        (self.type_name)()
    }

    /// Drops one strong reference to the payload pointed to by this pointer.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. The pointer comes from [`triomphe::Arc<PayloadData<T>>`] via
    ///    [`triomphe::Arc::into_raw`]
    /// 2. This [`PayloadVtable`] is the vtable for the payload type stored in
    ///    the [`PayloadData`].
    /// 3. The caller owns the strong reference being released and will not
    ///    use the pointer afterwards.
    #[inline]
    pub(super) unsafe fn drop(&self, ptr: NonNull<PayloadData<Erased>>) {
        // SAFETY: `self.drop` points to `drop::<T>` below, whose requirements are
        // upheld:
        // 1. Guaranteed by the caller
        // 2. Guaranteed by the caller
        // 3. Guaranteed by the caller
        unsafe {
            (self.drop)(ptr);
        }
    }

    /// Creates a new strong reference to the payload pointed to by this
    /// pointer.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. The pointer comes from [`triomphe::Arc<PayloadData<T>>`] via
    ///    [`triomphe::Arc::into_raw`] and is still alive
    /// 2. This [`PayloadVtable`] is the vtable for the payload type stored in
    ///    the [`PayloadData`].
    #[inline]
    pub(super) unsafe fn clone_arc(&self, ptr: NonNull<PayloadData<Erased>>) -> RawPayload {
        // SAFETY: `self.clone_arc` points to `clone_arc::<T>` below, whose
        // requirements are upheld:
        // 1. Guaranteed by the caller
        // 2. Guaranteed by the caller
        unsafe { (self.clone_arc)(ptr) }
    }

    /// Gets the strong count of the payload pointed to by this pointer.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. The pointer comes from [`triomphe::Arc<PayloadData<T>>`] via
    ///    [`triomphe::Arc::into_raw`] and is still alive
    /// 2. This [`PayloadVtable`] is the vtable for the payload type stored in
    ///    the [`PayloadData`].
    #[inline]
    pub(super) unsafe fn strong_count(&self, ptr: NonNull<PayloadData<Erased>>) -> usize {
        // SAFETY: `self.strong_count` points to `strong_count::<T>` below, whose
        // requirements are upheld:
        // 1. Guaranteed by the caller
        // 2. Guaranteed by the caller
        unsafe { (self.strong_count)(ptr) }
    }
}

/// Drops one strong reference to the [`triomphe::Arc<PayloadData<T>>`]
/// pointed to by this pointer.
///
/// # Safety
///
/// The caller must ensure:
///
/// 1. The pointer comes from [`triomphe::Arc<PayloadData<T>>`] via
///    [`triomphe::Arc::into_raw`]
/// 2. The type `T` matches the actual payload type stored in the
///    [`PayloadData`]
/// 3. The pointer is not used after calling this method.
unsafe fn drop<T: 'static>(ptr: NonNull<PayloadData<Erased>>) {
    let ptr: *const PayloadData<T> = ptr.cast::<PayloadData<T>>().as_ptr();
    // SAFETY: The pointer has the correct type and came from `Arc::into_raw`
    // (guaranteed by the caller), and it is not accessed again afterwards.
    let arc = unsafe { triomphe::Arc::from_raw(ptr) };
    core::mem::drop(arc);
}

/// Clones the [`triomphe::Arc<PayloadData<T>>`] pointed to by this pointer.
///
/// # Safety
///
/// The caller must ensure:
///
/// 1. The pointer comes from [`triomphe::Arc<PayloadData<T>>`] via
///    [`triomphe::Arc::into_raw`] and is still alive
/// 2. The type `T` matches the actual payload type stored in the
///    [`PayloadData`]
unsafe fn clone_arc<T: 'static>(ptr: NonNull<PayloadData<Erased>>) -> RawPayload {
    let ptr: *const PayloadData<T> = ptr.cast::<PayloadData<T>>().as_ptr();

    // SAFETY: The pointer is valid and came from `Arc::into_raw` with the correct
    // type (guaranteed by the caller), which fulfills the requirements for
    // `ArcBorrow::from_ptr`.
    let arc_borrow = unsafe { triomphe::ArcBorrow::from_ptr(ptr) };

    RawPayload::from_arc(arc_borrow.clone_arc())
}

/// Gets the strong count of the [`triomphe::Arc<PayloadData<T>>`] pointed to
/// by this pointer.
///
/// # Safety
///
/// The caller must ensure:
///
/// 1. The pointer comes from [`triomphe::Arc<PayloadData<T>>`] via
///    [`triomphe::Arc::into_raw`] and is still alive
/// 2. The type `T` matches the actual payload type stored in the
///    [`PayloadData`]
unsafe fn strong_count<T: 'static>(ptr: NonNull<PayloadData<Erased>>) -> usize {
    let ptr: *const PayloadData<T> = ptr.cast::<PayloadData<T>>().as_ptr();

    // SAFETY: The pointer is valid and came from `Arc::into_raw` with the correct
    // type (guaranteed by the caller).
    let arc_borrow = unsafe { triomphe::ArcBorrow::from_ptr(ptr) };

    triomphe::ArcBorrow::strong_count(&arc_borrow)
}
