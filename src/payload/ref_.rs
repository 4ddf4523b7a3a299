use core::{any::TypeId, fmt};

use nodemeta_internals::RawPayloadRef;

/// A borrowed, type-erased payload.
///
/// The payload lives as long as the record (or any record derived from it)
/// that holds it.
#[derive(Copy, Clone)]
#[repr(transparent)]
pub struct PayloadRef<'a> {
    raw: RawPayloadRef<'a>,
}

impl<'a> PayloadRef<'a> {
    pub(crate) fn from_raw(raw: RawPayloadRef<'a>) -> Self {
        Self { raw }
    }

    /// Returns the [`TypeId`] of the payload's concrete type.
    ///
    /// # Examples
    ///
    /// ```
    /// use core::any::TypeId;
    ///
    /// use nodemeta::Attachments;
    ///
    /// let attachments = Attachments::new(()).update(3.5_f64);
    /// let payload = attachments.payloads().iter().next().unwrap();
    /// assert_eq!(payload.type_id(), TypeId::of::<f64>());
    /// ```
    #[must_use]
    pub fn type_id(self) -> TypeId {
        self.raw.type_id()
    }

    /// Returns the [`core::any::type_name`] of the payload's concrete type.
    #[must_use]
    pub fn type_name(self) -> &'static str {
        self.raw.type_name()
    }

    /// Returns `true` if the payload is of type `T`.
    #[must_use]
    pub fn is<T: 'static>(self) -> bool {
        self.type_id() == TypeId::of::<T>()
    }

    /// Returns the payload as a `&T`, or [`None`] if it has another type.
    ///
    /// # Examples
    ///
    /// ```
    /// use nodemeta::Attachments;
    ///
    /// let attachments = Attachments::new(()).update(String::from("Int"));
    /// let payload = attachments.payloads().iter().next().unwrap();
    ///
    /// assert_eq!(payload.downcast::<String>().map(String::as_str), Some("Int"));
    /// assert_eq!(payload.downcast::<u8>(), None);
    /// ```
    #[must_use]
    pub fn downcast<T: 'static>(self) -> Option<&'a T> {
        if self.is::<T>() {
            // SAFETY:
            // 1. We just checked that the payload has type `T`.
            let value = unsafe { self.raw.value_downcast_unchecked::<T>() };
            Some(value)
        } else {
            None
        }
    }

    /// Returns `true` if both refer to the same payload allocation.
    ///
    /// Records derived from one another share payloads, so this is how to
    /// tell that a payload was carried over rather than re-inserted.
    #[must_use]
    pub fn ptr_eq(self, other: PayloadRef<'_>) -> bool {
        self.raw.ptr_eq(other.raw)
    }
}

impl fmt::Debug for PayloadRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PayloadRef")
            .field(&format_args!("{}", self.type_name()))
            .finish()
    }
}
