//! `objson`: JSON documents that remember the concrete type of every object.
//!
//! This crate re-exports the workspace members:
//!
//! - [`codec`]: type registry, attribute filter, encoder, decoder and
//!   persistence helpers, plus `#[derive(Serializable)]`.
//! - [`utils`]: hash containers shared by the members.

// -----------------------------------------------------------------------------
// Top-level exports

pub use oj_codec as codec;
pub use oj_utils as utils;

pub use oj_codec::prelude;
