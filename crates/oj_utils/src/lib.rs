//! Containers shared by the `objson` crates.
//!
//! - [`hash`]: `hashbrown` maps with a fixed `foldhash` seed, so iteration
//!   order of registry tables is stable between runs.
//! - [`TypeIdMap`]: a map keyed by [`TypeId`](core::any::TypeId) that skips
//!   rehashing the already well distributed id.

// -----------------------------------------------------------------------------
// Modules

mod typeid_map;

pub mod hash;

// -----------------------------------------------------------------------------
// Top-level exports

pub use typeid_map::TypeIdMap;
