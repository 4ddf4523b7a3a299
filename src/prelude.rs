//! Commonly used items for convenient importing.
//!
//! ```rust
//! use nodemeta::prelude::*;
//!
//! let attachments: Attachments<u32> = Attachments::new(0).update("note");
//! assert_eq!(attachments.get::<&str>(), Some(&"note"));
//! ```

pub use crate::{Attachable, Attachments, MissingPayload, payload::PayloadRef};
