//! Attribute exclusion and fallback extras.

// -----------------------------------------------------------------------------
// Modules

mod attribute_filter;
mod config;

// -----------------------------------------------------------------------------
// Exports

pub use attribute_filter::AttributeFilter;
pub use config::FilterConfig;
