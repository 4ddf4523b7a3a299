//! Module containing the type-erased payload storage

mod data;
mod raw;
mod vtable;

pub use self::raw::{RawPayload, RawPayloadRef};
