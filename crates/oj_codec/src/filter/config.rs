use serde::{Deserialize, Serialize};

/// Attribute filtering options, as plain strings.
///
/// Compiled into an [`AttributeFilter`](super::AttributeFilter). Empty
/// extra fields inherit the corresponding exclusion fields.
///
/// ```
/// use oj_codec::filter::FilterConfig;
///
/// let config: FilterConfig = serde_json::from_str(r#"{
///     "excluded_attributes": ["^mongo_"],
///     "excluded_attribute_scope": ["app.store"]
/// }"#).unwrap();
/// assert!(config.extra_attributes.is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Regular expressions; an attribute whose name matches any of them is
    /// left out of documents.
    pub excluded_attributes: Vec<String>,
    /// Type Keys the exclusions apply to; empty means every type.
    pub excluded_attribute_scope: Vec<String>,
    /// Regular expressions naming attributes harvested as fallback
    /// constructor arguments.
    pub extra_attributes: Vec<String>,
    /// Type Keys that receive every fallback argument unconditionally.
    pub extra_attribute_scope: Vec<String>,
}
