use crate::Attachments;

/// A host node that carries an [`Attachments`] record.
///
/// Implementors only expose their record and accept a replacement for it. The
/// provided methods derive the new record and store it back, so passes can
/// work on nodes directly.
///
/// # Examples
///
/// ```
/// use nodemeta::{Attachable, Attachments};
///
/// #[derive(Clone, Copy, Debug, PartialEq)]
/// struct Offset(usize);
///
/// struct Ident {
///     name: String,
///     attachments: Attachments<Offset>,
/// }
///
/// impl Attachable for Ident {
///     type Position = Offset;
///
///     fn attachments(&self) -> &Attachments<Offset> {
///         &self.attachments
///     }
///
///     fn set_attachments(&mut self, attachments: Attachments<Offset>) {
///         self.attachments = attachments;
///     }
/// }
///
/// struct SymbolId(u32);
///
/// let mut ident = Ident {
///     name: "x".to_string(),
///     attachments: Attachments::new(Offset(12)),
/// };
///
/// ident.update_attachment(SymbolId(3));
/// assert_eq!(ident.attachment::<SymbolId>().map(|s| s.0), Some(3));
///
/// ident.set_position(Offset(40));
/// assert_eq!(ident.position(), &Offset(40));
/// assert!(ident.has_attachment::<SymbolId>());
///
/// ident.remove_attachment::<SymbolId>();
/// assert!(ident.attachments().is_empty());
/// ```
pub trait Attachable {
    /// The position type of the node's record.
    type Position: Clone;

    /// Returns the node's current record.
    fn attachments(&self) -> &Attachments<Self::Position>;

    /// Replaces the node's record.
    fn set_attachments(&mut self, attachments: Attachments<Self::Position>);

    /// Returns the node's position.
    fn position(&self) -> &Self::Position {
        self.attachments().position()
    }

    /// Moves the node to a new position, keeping its payloads.
    fn set_position(&mut self, position: Self::Position) {
        let next = self.attachments().with_position(position);
        self.set_attachments(next);
    }

    /// Returns the node's payload of type `T`, if present.
    fn attachment<T: 'static>(&self) -> Option<&T> {
        self.attachments().get::<T>()
    }

    /// Returns `true` if the node has a payload of type `T`.
    fn has_attachment<T: 'static>(&self) -> bool {
        self.attachments().contains::<T>()
    }

    /// Stores `value` on the node, replacing any payload of the same type.
    fn update_attachment<T: Send + Sync + 'static>(&mut self, value: T) {
        let next = self.attachments().update(value);
        self.set_attachments(next);
    }

    /// Removes the node's payload of type `T`, if present.
    fn remove_attachment<T: 'static>(&mut self) {
        if self.has_attachment::<T>() {
            let next = self.attachments().remove::<T>();
            self.set_attachments(next);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Leaf {
        attachments: Attachments<u32>,
    }

    impl Attachable for Leaf {
        type Position = u32;

        fn attachments(&self) -> &Attachments<u32> {
            &self.attachments
        }

        fn set_attachments(&mut self, attachments: Attachments<u32>) {
            self.attachments = attachments;
        }
    }

    #[test]
    fn test_update_is_threaded_back() {
        let mut leaf = Leaf {
            attachments: Attachments::new(1),
        };
        let before = leaf.attachments().clone();

        leaf.update_attachment(true);
        leaf.update_attachment(false);

        assert_eq!(leaf.attachment::<bool>(), Some(&false));
        assert_eq!(leaf.attachments().len(), 1);
        assert!(before.is_empty());
    }

    #[test]
    fn test_remove_absent_keeps_record() {
        let mut leaf = Leaf {
            attachments: Attachments::new(1).update('q'),
        };
        let before = leaf.attachments().clone();

        leaf.remove_attachment::<u8>();
        assert!(Attachments::ptr_eq(&before, leaf.attachments()));

        leaf.remove_attachment::<char>();
        assert!(leaf.attachments().is_empty());
        assert_eq!(leaf.position(), &1);
    }
}
