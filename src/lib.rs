#![cfg_attr(not(doc), no_std)]
#![deny(
    missing_docs,
    clippy::alloc_instead_of_core,
    clippy::std_instead_of_alloc,
    clippy::std_instead_of_core,
    clippy::missing_safety_doc,
    clippy::undocumented_unsafe_blocks,
    clippy::multiple_unsafe_ops_per_block,
    clippy::as_ptr_cast_mut,
    clippy::ptr_as_ptr,
    rustdoc::invalid_rust_codeblocks,
    rustdoc::broken_intra_doc_links,
    missing_copy_implementations,
    unused_doc_comments
)]
// Extra checks on nightly
#![cfg_attr(nightly_extra_checks, feature(rustdoc_missing_doc_code_examples))]
#![cfg_attr(nightly_extra_checks, forbid(rustdoc::missing_doc_code_examples))]
// Make docs.rs generate better docs
#![cfg_attr(docsrs, feature(doc_cfg))]

//! Persistent, type-indexed metadata records for syntax tree nodes.
//!
//! ## Overview
//!
//! Compiler passes keep learning things about the nodes of a syntax tree: the
//! inferred type of an expression, the symbol an identifier resolves to, the
//! scope a block opens. This crate gives every node one place to keep such
//! facts, an [`Attachments`] record, without the node type having to know in
//! advance which facts will exist.
//!
//! A record holds:
//! - A **position**, such as a source span. It is generic and never inspected.
//! - Any number of **payloads**, at most one per payload type. A payload is
//!   found again by naming its type.
//!
//! Records are persistent values. Operations such as [`update`] and
//! [`remove`] return a new record and leave the old one untouched, so an
//! earlier pass can keep looking at the tree it produced while a later pass
//! builds the next one. Payloads that survive an operation are shared between
//! the two records rather than copied.
//!
//! ## Quick Example
//!
//! ```
//! use nodemeta::prelude::*;
//!
//! #[derive(Debug, PartialEq)]
//! struct InferredType(&'static str);
//!
//! let parsed = Attachments::new(0..5_usize);
//! let checked = parsed.update(InferredType("Int"));
//!
//! assert_eq!(checked.get::<InferredType>(), Some(&InferredType("Int")));
//! assert!(parsed.is_empty());
//!
//! let moved = checked.with_position(10..15);
//! assert_eq!(moved.position(), &(10..15));
//! assert!(moved.contains::<InferredType>());
//! ```
//!
//! ## Host Nodes
//!
//! Node types that carry a record can implement [`Attachable`] to get the
//! record operations directly on the node, with the new record stored back in
//! place.
//!
//! ## Type Matching
//!
//! Finding a payload by type goes through a [`TypeMatcher`], which is cached
//! process-wide per payload type. See the [`type_match`] module.
//!
//! ## Features
//!
//! - `std`: Guards the type-match cache with [`std::sync::RwLock`] instead of
//!   a spin lock.
//! - `tracing`: Emits a `trace`-level event through the [`tracing`] crate
//!   whenever a new payload type is registered in the cache.
//!
//! [`update`]: Attachments::update
//! [`remove`]: Attachments::remove
//! [`TypeMatcher`]: type_match::TypeMatcher
//! [`tracing`]: https://docs.rs/tracing/latest/tracing/

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

pub mod attachments;
mod host;
pub mod payload;
pub mod prelude;
pub mod type_match;

pub use self::{
    attachments::{Attachments, MissingPayload},
    host::Attachable,
};
