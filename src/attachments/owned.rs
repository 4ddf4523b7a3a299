use core::fmt;

use crate::{
    attachments::MissingPayload,
    payload::{PayloadSet, Payloads},
    type_match,
};

/// A position plus a set of payloads with pairwise distinct types.
///
/// See the [module documentation](crate::attachments) for an overview.
///
/// # Type Parameters
/// - `P`: The position type. It is never inspected; it only has to be
///   [`Clone`] for the operations that derive a new record from a borrowed
///   one.
///
/// # Thread Safety
///
/// Payloads must be `Send + Sync`, so a record is `Send + Sync` whenever its
/// position is.
pub struct Attachments<P> {
    position: P,
    /// `None` is the empty record. When present, the set is never empty.
    payloads: Option<PayloadSet>,
}

impl<P> Attachments<P> {
    /// Creates a record without payloads at the given position.
    ///
    /// No payload storage is allocated.
    ///
    /// # Examples
    ///
    /// ```
    /// use nodemeta::Attachments;
    ///
    /// let attachments = Attachments::new((3_u32, 14_u32));
    /// assert!(attachments.is_empty());
    /// assert_eq!(attachments.position(), &(3, 14));
    /// ```
    #[must_use]
    pub const fn new(position: P) -> Self {
        Self {
            position,
            payloads: None,
        }
    }

    /// Returns the position of this record.
    #[must_use]
    pub fn position(&self) -> &P {
        &self.position
    }

    /// Returns a record with the same payloads at a new position.
    ///
    /// The payloads are shared with `self`, not copied.
    ///
    /// # Examples
    ///
    /// ```
    /// use nodemeta::Attachments;
    ///
    /// let before = Attachments::new(10_usize).update("checked");
    /// let after = before.with_position(20);
    ///
    /// assert_eq!(after.position(), &20);
    /// assert!(after.payloads().ptr_eq(before.payloads()));
    /// ```
    #[must_use]
    pub fn with_position(&self, position: P) -> Self {
        Self {
            position,
            payloads: self.payloads.clone(),
        }
    }

    /// Returns all payloads of this record.
    ///
    /// The view is empty for a record without payloads.
    #[must_use]
    pub fn payloads(&self) -> Payloads<'_> {
        match &self.payloads {
            Some(set) => set.as_payloads(),
            None => Payloads::empty(),
        }
    }

    /// Returns the number of payloads.
    #[must_use]
    pub fn len(&self) -> usize {
        self.payloads().len()
    }

    /// Returns `true` if the record holds no payloads.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.payloads.is_none()
    }

    /// Returns the payload of type `T`, if present.
    ///
    /// # Examples
    ///
    /// ```
    /// use nodemeta::Attachments;
    ///
    /// let attachments = Attachments::new(()).update(5_i32);
    /// assert_eq!(attachments.get::<i32>(), Some(&5));
    /// assert_eq!(attachments.get::<String>(), None);
    /// ```
    #[must_use]
    pub fn get<T: 'static>(&self) -> Option<&T> {
        let set = self.payloads.as_ref()?;
        set.find(&type_match::matcher::<T>())?.downcast::<T>()
    }

    /// Returns `true` if a payload of type `T` is present.
    ///
    /// A record without payloads answers without consulting the type-match
    /// cache.
    #[must_use]
    pub fn contains<T: 'static>(&self) -> bool {
        match &self.payloads {
            Some(set) => set.position_of(&type_match::matcher::<T>()).is_some(),
            None => false,
        }
    }

    /// Returns the payload of type `T`, or a [`MissingPayload`] error naming
    /// the type.
    ///
    /// # Examples
    ///
    /// ```
    /// use nodemeta::Attachments;
    ///
    /// let attachments = Attachments::new(()).update(8_u64);
    /// assert_eq!(attachments.require::<u64>(), Ok(&8));
    /// assert!(attachments.require::<u32>().is_err());
    /// ```
    pub fn require<T: 'static>(&self) -> Result<&T, MissingPayload> {
        self.get::<T>().ok_or_else(MissingPayload::of::<T>)
    }

    /// Returns `true` if both records share the same payload storage.
    ///
    /// Positions are not compared. Two records without payloads always share
    /// storage, since neither has any.
    ///
    /// # Examples
    ///
    /// ```
    /// use nodemeta::Attachments;
    ///
    /// let attachments = Attachments::new(0_u8).update(1_i32);
    /// let unchanged = attachments.remove::<String>();
    /// assert!(Attachments::ptr_eq(&attachments, &unchanged));
    ///
    /// let changed = attachments.update(2_i32);
    /// assert!(!Attachments::ptr_eq(&attachments, &changed));
    /// ```
    #[must_use]
    pub fn ptr_eq(this: &Self, other: &Self) -> bool {
        this.payloads().ptr_eq(other.payloads())
    }
}

impl<P: Clone> Attachments<P> {
    /// Returns a record in which `value` replaces any payload of type `T`.
    ///
    /// The result always holds at least one payload.
    ///
    /// # Examples
    ///
    /// ```
    /// use nodemeta::Attachments;
    ///
    /// let first = Attachments::new(()).update(5_i32).update("hi");
    /// let second = first.update(7_i32);
    ///
    /// assert_eq!(second.get::<i32>(), Some(&7));
    /// assert_eq!(second.len(), 2);
    /// assert_eq!(first.get::<i32>(), Some(&5));
    /// ```
    #[must_use]
    pub fn update<T: Send + Sync + 'static>(&self, value: T) -> Self {
        let payloads = match &self.payloads {
            Some(set) => set.replacing(&type_match::matcher::<T>(), value),
            None => PayloadSet::single(value),
        };

        Self {
            position: self.position.clone(),
            payloads: Some(payloads),
        }
    }

    /// Computes a new payload of type `T` from the current one, if any, and
    /// stores it like [`update`](Self::update).
    ///
    /// # Examples
    ///
    /// ```
    /// use nodemeta::Attachments;
    ///
    /// struct UseCount(u32);
    ///
    /// let bump = |current: Option<&UseCount>| UseCount(current.map_or(0, |c| c.0) + 1);
    /// let attachments = Attachments::new(()).update_with(bump).update_with(bump);
    ///
    /// assert_eq!(attachments.get::<UseCount>().map(|c| c.0), Some(2));
    /// ```
    #[must_use]
    pub fn update_with<T, F>(&self, f: F) -> Self
    where
        T: Send + Sync + 'static,
        F: FnOnce(Option<&T>) -> T,
    {
        let value = f(self.get::<T>());
        self.update(value)
    }

    /// Returns a record without the payload of type `T`.
    ///
    /// - Without such a payload, the result shares its payload storage with
    ///   `self` and nothing is allocated.
    /// - If it was the only payload, the result holds no payloads and keeps
    ///   the position.
    ///
    /// # Examples
    ///
    /// ```
    /// use nodemeta::Attachments;
    ///
    /// let attachments = Attachments::new(7_u32).update(1_i32).update('c');
    ///
    /// let without_char = attachments.remove::<char>();
    /// assert_eq!(without_char.len(), 1);
    /// assert_eq!(without_char.get::<char>(), None);
    ///
    /// let empty = without_char.remove::<i32>();
    /// assert!(empty.is_empty());
    /// assert_eq!(empty.position(), &7);
    /// ```
    #[must_use]
    pub fn remove<T: 'static>(&self) -> Self {
        let Some(set) = &self.payloads else {
            return self.clone();
        };
        let Some(index) = set.position_of(&type_match::matcher::<T>()) else {
            return self.clone();
        };

        Self {
            position: self.position.clone(),
            payloads: set.without(index),
        }
    }
}

impl<P: Clone> Clone for Attachments<P> {
    fn clone(&self) -> Self {
        Self {
            position: self.position.clone(),
            payloads: self.payloads.clone(),
        }
    }
}

impl<P: Default> Default for Attachments<P> {
    fn default() -> Self {
        Self::new(P::default())
    }
}

impl<P: fmt::Debug> fmt::Debug for Attachments<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Attachments")
            .field("position", &self.position)
            .field("payloads", &self.payloads())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use alloc::{format, string::String};

    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    struct Span {
        start: u32,
        end: u32,
    }

    #[test]
    fn test_new_is_empty() {
        let attachments = Attachments::new(Span { start: 0, end: 4 });
        assert!(attachments.is_empty());
        assert_eq!(attachments.len(), 0);
        assert!(attachments.payloads().is_empty());
        assert!(!attachments.contains::<i32>());
        assert_eq!(attachments.get::<i32>(), None);
    }

    #[test]
    fn test_update_then_get() {
        let attachments = Attachments::new(1_u32).update(String::from("Int"));
        assert!(!attachments.is_empty());
        assert_eq!(attachments.get::<String>().map(String::as_str), Some("Int"));
        assert!(attachments.contains::<String>());
    }

    #[test]
    fn test_update_replaces_same_type() {
        let once = Attachments::new(0_u8).update(1_i32).update('a');
        let twice = once.update(2_i32);

        assert_eq!(once.len(), twice.len());
        assert_eq!(twice.get::<i32>(), Some(&2));
        assert_eq!(twice.get::<char>(), Some(&'a'));
    }

    #[test]
    fn test_remove_absent_shares_storage() {
        let attachments = Attachments::new(0_u8).update(1_i32);
        let same = attachments.remove::<String>();
        assert!(Attachments::ptr_eq(&attachments, &same));
        assert_eq!(same.get::<i32>(), Some(&1));

        let empty = Attachments::new(0_u8);
        assert!(empty.remove::<i32>().is_empty());
    }

    #[test]
    fn test_remove_last_collapses_to_empty() {
        let attachments = Attachments::new(Span { start: 2, end: 3 }).update(1_i32);
        let removed = attachments.remove::<i32>();

        assert!(removed.is_empty());
        assert!(removed.payloads.is_none());
        assert_eq!(removed.position(), &Span { start: 2, end: 3 });
    }

    #[test]
    fn test_with_position_keeps_payloads() {
        let attachments = Attachments::new(1_usize).update(true).update(3.0_f32);
        let moved = attachments.with_position(9);

        assert_eq!(moved.position(), &9);
        assert_eq!(moved.len(), 2);
        assert!(Attachments::ptr_eq(&attachments, &moved));
        assert_eq!(moved.get::<bool>(), Some(&true));
    }

    #[test]
    fn test_debug_lists_payload_types() {
        let attachments = Attachments::new(5_u32).update(1_u8);
        assert_eq!(
            format!("{attachments:?}"),
            "Attachments { position: 5, payloads: {PayloadRef(u8)} }"
        );
    }

    #[test]
    fn test_default() {
        let attachments: Attachments<u32> = Attachments::default();
        assert_eq!(attachments.position(), &0);
        assert!(attachments.is_empty());
    }

    #[test]
    fn test_attachments_send_sync() {
        static_assertions::assert_impl_all!(Attachments<u32>: Send, Sync, Clone);
        static_assertions::assert_not_impl_any!(Attachments<u32>: Copy);
        static_assertions::assert_not_impl_any!(Attachments<alloc::rc::Rc<u32>>: Send, Sync);
    }
}
