//! The attachment record carried by every host node.
//!
//! An [`Attachments<P>`] value is a position of type `P` plus a set of
//! payloads, at most one per payload type. Records are immutable: every
//! operation that changes something returns a new record and leaves the old
//! one intact. Payloads that survive an operation are shared between the old
//! and the new record, never copied.
//!
//! # Representation
//!
//! A record without payloads stores nothing but its position; no payload
//! storage is allocated until the first [`update`]. Removing the last payload
//! with [`remove`] collapses the record back to that form, keeping the
//! position.
//!
//! # Examples
//!
//! ```
//! use nodemeta::Attachments;
//!
//! #[derive(Debug, PartialEq)]
//! struct InferredType(&'static str);
//!
//! let start = Attachments::new(42_u32);
//! let typed = start.update(InferredType("Int"));
//!
//! assert_eq!(typed.get::<InferredType>(), Some(&InferredType("Int")));
//! assert!(start.is_empty());
//!
//! let cleared = typed.remove::<InferredType>();
//! assert!(cleared.is_empty());
//! assert_eq!(cleared.position(), &42);
//! ```
//!
//! [`update`]: Attachments::update
//! [`remove`]: Attachments::remove

mod error;
mod owned;

pub use self::{error::MissingPayload, owned::Attachments};
