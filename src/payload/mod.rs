//! Borrowed views of the payloads stored in an attachment record.
//!
//! - [`Payloads`] is the whole payload set of one record, as returned by
//!   [`Attachments::payloads`](crate::Attachments::payloads).
//! - [`PayloadRef`] is a single type-erased payload, which can be inspected
//!   and downcast back to its concrete type.
//!
//! # Examples
//!
//! ```
//! use nodemeta::Attachments;
//!
//! let attachments = Attachments::new(0_u32)
//!     .update(17_i64)
//!     .update("inferred");
//!
//! let payloads = attachments.payloads();
//! assert_eq!(payloads.len(), 2);
//!
//! let mut names: Vec<&str> = payloads.iter().map(|p| p.type_name()).collect();
//! names.sort();
//! assert_eq!(names, ["&str", "i64"]);
//! ```

mod iter;
mod ref_;
mod set;

pub(crate) use self::set::PayloadSet;
pub use self::{iter::PayloadsIter, ref_::PayloadRef, set::Payloads};
