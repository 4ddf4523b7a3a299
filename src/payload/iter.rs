use core::iter::FusedIterator;

use nodemeta_internals::RawPayload;

use crate::payload::PayloadRef;

/// An iterator over the payloads of a record.
///
/// This iterator yields [`PayloadRef`] items and is created by calling
/// [`Payloads::iter`](crate::payload::Payloads::iter).
///
/// # Examples
///
/// ```
/// use nodemeta::{Attachments, payload::PayloadsIter};
///
/// let attachments = Attachments::new(()).update(1_u8).update('x');
/// let iterator: PayloadsIter<'_> = attachments.payloads().iter();
/// assert_eq!(iterator.len(), 2);
/// ```
#[must_use]
pub struct PayloadsIter<'a> {
    iter: core::slice::Iter<'a, RawPayload>,
}

impl<'a> PayloadsIter<'a> {
    pub(crate) fn from_raw(iter: core::slice::Iter<'a, RawPayload>) -> Self {
        Self { iter }
    }
}

impl<'a> Iterator for PayloadsIter<'a> {
    type Item = PayloadRef<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let payload = self.iter.next()?.as_ref();
        Some(PayloadRef::from_raw(payload))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

impl<'a> DoubleEndedIterator for PayloadsIter<'a> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let payload = self.iter.next_back()?.as_ref();
        Some(PayloadRef::from_raw(payload))
    }
}

impl<'a> ExactSizeIterator for PayloadsIter<'a> {
    fn len(&self) -> usize {
        self.iter.len()
    }
}

impl<'a> FusedIterator for PayloadsIter<'a> {}
