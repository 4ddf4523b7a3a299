#![no_std]
#![forbid(
    missing_docs,
    clippy::alloc_instead_of_core,
    clippy::std_instead_of_alloc,
    clippy::std_instead_of_core,
    clippy::missing_safety_doc,
    clippy::missing_docs_in_private_items,
    clippy::undocumented_unsafe_blocks,
    clippy::multiple_unsafe_ops_per_block,
    rustdoc::invalid_rust_codeblocks,
    rustdoc::broken_intra_doc_links,
    missing_copy_implementations,
    unused_doc_comments
)]
#![allow(rustdoc::private_intra_doc_links)]
//! Internal implementation crate for [`nodemeta`].
//!
//! # Overview
//!
//! This crate contains the low-level, type-erased payload storage that backs
//! the attachment records of the [`nodemeta`] crate. A payload is a value of
//! an arbitrary `'static` type that has been moved into a reference-counted
//! allocation together with a vtable describing it.
//!
//! **This crate is an implementation detail.** No semantic versioning
//! guarantees are provided. Users should depend on the [`nodemeta`] crate,
//! not this one.
//!
//! # Architecture
//!
//! - [`RawPayload`]: Owned handle to a payload with [`Arc`]-based allocation.
//!   Cloning a handle bumps the reference count; the payload itself is never
//!   copied.
//! - [`RawPayloadRef`]: Borrowed reference to a payload.
//! - [`PayloadData`]: `#[repr(C)]` wrapper enabling field access on erased
//!   types.
//! - [`PayloadVtable`]: Function pointers for type-erased dispatch.
//!
//! # Safety Strategy
//!
//! When we erase `PayloadData<T>` to `PayloadData<Erased>`, the vtable
//! function pointers must still match the concrete type stored in memory.
//! This is maintained through:
//!
//! - **Module-based encapsulation**: the `ptr` fields and the vtable fields
//!   are private to a single file each, making the invariants locally
//!   verifiable
//! - **`#[repr(C)]` layout**: the vtable can be read through an erased pointer
//!   without constructing a reference of the wrong type
//! - **Documented vtable contracts**: each vtable method states exactly when
//!   it may be called
//!
//! [`nodemeta`]: https://docs.rs/nodemeta/latest/nodemeta/
//! [`PayloadData`]: payload::data::PayloadData
//! [`PayloadVtable`]: payload::vtable::PayloadVtable
//! [`Arc`]: triomphe::Arc

extern crate alloc;

mod payload;
mod util;

pub use payload::{RawPayload, RawPayloadRef};
