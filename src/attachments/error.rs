use core::fmt;

/// Error returned by [`Attachments::require`](crate::Attachments::require)
/// when the record holds no payload of the requested type.
///
/// # Examples
///
/// ```
/// use nodemeta::{Attachments, MissingPayload};
///
/// struct Symbol(u32);
///
/// fn symbol_of(attachments: &Attachments<usize>) -> Result<u32, MissingPayload> {
///     Ok(attachments.require::<Symbol>()?.0)
/// }
///
/// let error = symbol_of(&Attachments::new(0)).unwrap_err();
/// assert!(error.type_name().ends_with("Symbol"));
/// ```
#[derive(Copy, Clone, PartialEq, Eq)]
pub struct MissingPayload {
    type_name: &'static str,
}

impl MissingPayload {
    pub(crate) fn of<T: 'static>() -> Self {
        Self {
            type_name: core::any::type_name::<T>(),
        }
    }

    /// The [`core::any::type_name`] of the payload type that was requested.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }
}

impl fmt::Debug for MissingPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MissingPayload")
            .field("type_name", &self.type_name)
            .finish()
    }
}

impl fmt::Display for MissingPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "no payload of type `{}` is attached", self.type_name)
    }
}

impl core::error::Error for MissingPayload {}

#[cfg(test)]
mod tests {
    use alloc::format;

    use super::*;

    #[test]
    fn test_missing_payload_display() {
        let error = MissingPayload::of::<u16>();
        assert_eq!(format!("{error}"), "no payload of type `u16` is attached");
        assert_eq!(
            format!("{error:?}"),
            "MissingPayload { type_name: \"u16\" }"
        );
    }

    #[test]
    fn test_missing_payload_traits() {
        static_assertions::assert_impl_all!(
            MissingPayload: Send,
            Sync,
            Copy,
            core::error::Error
        );
    }
}
