//! This module encapsulates the fields of the [`PayloadData`]. Since this is
//! the only place they are visible, the [`PayloadVtable`] is guaranteed to
//! always describe the type of the value stored next to it. The two are paired
//! when the data is created and nothing can change either afterwards.

use crate::payload::{raw::RawPayloadRef, vtable::PayloadVtable};

/// Type-erased payload data structure with vtable-based dispatch.
///
/// This struct uses `#[repr(C)]` so that the vtable field can be read even
/// when the concrete payload type `T` is unknown.
#[repr(C)]
pub(super) struct PayloadData<T: 'static> {
    /// The vtable of this payload
    vtable: &'static PayloadVtable,
    /// The payload value itself
    value: T,
}

impl<T: 'static> PayloadData<T> {
    /// Creates a new [`PayloadData`] holding the given value, paired with the
    /// vtable for `T`.
    #[inline]
    pub(super) fn new(value: T) -> Self {
        Self {
            vtable: PayloadVtable::new::<T>(),
            value,
        }
    }
}

impl<'a> RawPayloadRef<'a> {
    /// Returns a reference to the [`PayloadVtable`] of the [`PayloadData`]
    /// instance.
    #[inline]
    pub(super) fn vtable(self) -> &'static PayloadVtable {
        let ptr = self.as_ptr();
        // SAFETY: We don't know the actual payload type, but we do know that the
        // pointer refers to a `PayloadData<T>` for some specific `T`. Since
        // `PayloadData<T>` is `#[repr(C)]`, the `vtable` field sits at the same
        // offset for every `T`, so projecting to it is valid.
        //
        // No reference to the `PayloadData` itself is created, as that would
        // require knowing the correct type.
        let vtable_ptr: *const &'static PayloadVtable = unsafe { &raw const (*ptr).vtable };

        // SAFETY: Reading the `&'static PayloadVtable` out of the field is valid
        // for the same reasons.
        unsafe { *vtable_ptr }
    }

    /// Accesses the payload value as a reference to the specified type.
    ///
    /// # Safety
    ///
    /// The caller must ensure that the type `T` matches the actual payload
    /// type stored in the [`PayloadData`].
    #[inline]
    pub unsafe fn value_downcast_unchecked<T: 'static>(self) -> &'a T {
        // SAFETY: The inner function requires that `T` matches the type stored,
        // which is guaranteed by our caller.
        let this = unsafe { self.cast_inner::<T>() };
        &this.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_field_offsets() {
        use core::mem::{offset_of, size_of};

        #[repr(align(32))]
        struct LargeAlignment {
            _value: u8,
        }

        assert_eq!(offset_of!(PayloadData<u8>, vtable), 0);
        assert_eq!(offset_of!(PayloadData<u64>, vtable), 0);
        assert_eq!(offset_of!(PayloadData<LargeAlignment>, vtable), 0);

        assert!(offset_of!(PayloadData<u8>, value) >= size_of::<&'static PayloadVtable>());
        assert!(
            offset_of!(PayloadData<LargeAlignment>, value) >= size_of::<&'static PayloadVtable>()
        );
    }
}
