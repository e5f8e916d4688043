//! # cke-id
//!
//! Typed identifiers for the resources the suite drives through the
//! provisioning API.
//!
//! The provisioning service hands out opaque string IDs (UUIDs in practice).
//! The suite never interprets them; it only threads them from one call into
//! the URL path of the next. The newtypes exist so that a cluster ID can't be
//! passed where a node-pool ID is expected.
//!
//! Every ID is validated on construction:
//! - it is non-empty
//! - it is safe to embed as a single URL path segment

mod error;
mod macros;
mod types;

pub use error::IdError;
pub use types::*;

#[doc(hidden)]
pub use macros::find_invalid_char as __find_invalid_char;
