use indexmap::IndexMap;
use oj_utils::hash::HashSet;
use regex::Regex;

use super::FilterConfig;
use crate::registry::TypeMeta;
use crate::value::Value;
use crate::{CodecError, Object};

fn compile(patterns: &[String]) -> Result<Vec<Regex>, CodecError> {
    patterns
        .iter()
        .map(|pattern| {
            Regex::new(pattern).map_err(|source| CodecError::InvalidPattern {
                pattern: pattern.clone(),
                source,
            })
        })
        .collect()
}

fn any_match(patterns: &[Regex], name: &str) -> bool {
    patterns.iter().any(|p| p.is_match(name))
}

/// The compiled form of a [`FilterConfig`].
///
/// Patterns use search semantics: a pattern matches when it matches
/// anywhere in the attribute name.
#[derive(Debug, Clone, Default)]
pub struct AttributeFilter {
    excluded: Vec<Regex>,
    excluded_scope: HashSet<String>,
    extra: Vec<Regex>,
    extra_scope: HashSet<String>,
    fallbacks: IndexMap<String, Value>,
}

impl AttributeFilter {
    /// Compiles every pattern, failing on the first invalid one.
    ///
    /// ```
    /// use oj_codec::CodecError;
    /// use oj_codec::filter::{AttributeFilter, FilterConfig};
    ///
    /// let config = FilterConfig {
    ///     excluded_attributes: vec!["(".to_owned()],
    ///     ..Default::default()
    /// };
    /// assert!(matches!(
    ///     AttributeFilter::new(&config),
    ///     Err(CodecError::InvalidPattern { pattern, .. }) if pattern == "("
    /// ));
    /// ```
    pub fn new(config: &FilterConfig) -> Result<Self, CodecError> {
        let excluded = compile(&config.excluded_attributes)?;
        let extra = if config.extra_attributes.is_empty() {
            excluded.clone()
        } else {
            compile(&config.extra_attributes)?
        };
        let extra_scope = if config.extra_attribute_scope.is_empty() {
            &config.excluded_attribute_scope
        } else {
            &config.extra_attribute_scope
        };

        Ok(Self {
            excluded,
            excluded_scope: config.excluded_attribute_scope.iter().cloned().collect(),
            extra,
            extra_scope: extra_scope.iter().cloned().collect(),
            fallbacks: IndexMap::new(),
        })
    }

    /// Adds an explicit fallback argument.
    pub fn with_fallback(mut self, name: impl Into<String>, value: Value) -> Self {
        self.fallbacks.insert(name.into(), value);
        self
    }

    #[inline]
    pub fn fallbacks(&self) -> &IndexMap<String, Value> {
        &self.fallbacks
    }

    /// Whether attribute `name` of type `type_key` is left out of documents.
    pub fn is_excluded(&self, type_key: &str, name: &str) -> bool {
        if !self.excluded_scope.is_empty() && !self.excluded_scope.contains(type_key) {
            return false;
        }
        any_match(&self.excluded, name)
    }

    /// Whether `name` matches an extra-attribute pattern.
    #[inline]
    pub fn is_extra(&self, name: &str) -> bool {
        any_match(&self.extra, name)
    }

    /// Whether `type_key` receives every fallback unconditionally.
    #[inline]
    pub fn is_extra_scope(&self, type_key: &str) -> bool {
        self.extra_scope.contains(type_key)
    }

    /// Collects fallbacks for a decode into `instance`: its fields matching
    /// an extra pattern, overridden by the explicit fallbacks.
    pub fn harvest(&self, meta: &TypeMeta, instance: &dyn Object) -> IndexMap<String, Value> {
        let mut harvested: IndexMap<String, Value> = meta
            .fields()
            .iter()
            .filter(|field| self.is_extra(field.name()))
            .filter_map(|field| Some((field.name().to_owned(), field.get(instance)?)))
            .collect();
        harvested.extend(self.fallbacks.iter().map(|(k, v)| (k.clone(), v.clone())));
        harvested
    }

    /// Picks the fallbacks offered to the constructor of `type_key`.
    ///
    /// An in-scope type receives the whole mapping; any other type only
    /// the names listed in `missing`.
    pub fn supply_extras(
        &self,
        type_key: &str,
        missing: &[&str],
        fallbacks: &IndexMap<String, Value>,
    ) -> IndexMap<String, Value> {
        if self.is_extra_scope(type_key) {
            return fallbacks.clone();
        }
        missing
            .iter()
            .filter_map(|name| Some(((*name).to_owned(), fallbacks.get(*name)?.clone())))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use indexmap::IndexMap;

    use super::{AttributeFilter, FilterConfig};
    use crate::value::Value;

    fn filter(excluded: &[&str], scope: &[&str]) -> AttributeFilter {
        AttributeFilter::new(&FilterConfig {
            excluded_attributes: excluded.iter().map(|s| s.to_string()).collect(),
            excluded_attribute_scope: scope.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn search_semantics() {
        let f = filter(&["secret"], &[]);
        assert!(f.is_excluded("any.type", "my_secret_key"));
        assert!(!f.is_excluded("any.type", "public"));
    }

    #[test]
    fn scoped_exclusion() {
        let f = filter(&["^password$"], &["app.user"]);
        assert!(f.is_excluded("app.user", "password"));
        assert!(!f.is_excluded("app.account", "password"));
    }

    #[test]
    fn extras_inherit_exclusions() {
        let f = filter(&["^mongo_"], &["app.store"]);
        assert!(f.is_extra("mongo_host"));
        assert!(f.is_extra_scope("app.store"));
        assert!(!f.is_extra_scope("app.other"));
    }

    #[test]
    fn supply_only_missing_outside_scope() {
        let f = filter(&["^mongo_"], &["app.store"]);
        let mut fallbacks = IndexMap::new();
        fallbacks.insert("mongo_host".to_owned(), Value::from("db"));
        fallbacks.insert("mongo_port".to_owned(), Value::Int(27017));

        let partial = f.supply_extras("app.child", &["mongo_port"], &fallbacks);
        assert_eq!(partial.len(), 1);
        assert_eq!(partial.get("mongo_port"), Some(&Value::Int(27017)));

        let full = f.supply_extras("app.store", &[], &fallbacks);
        assert_eq!(full, fallbacks);
    }
}
