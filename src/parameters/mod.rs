//! Parameter store and placeholder interpolation.
//!
//! Parameters are named configuration values, kept apart from services and
//! substituted into definitions through `%name%` placeholders. Parameters may
//! reference other parameters; they never reference services.

mod placeholder;

use std::collections::BTreeMap;

use crate::error::{DiError, DiResult};
use crate::value::ParameterValue;
use placeholder::{Segment, DELIMITER};

/// Flat mapping from parameter name to value.
///
/// A store starts out *unresolved*: stored values may still contain
/// placeholders to other parameters, and every lookup during interpolation
/// resolves them recursively. [`resolve_all`](Self::resolve_all) produces a
/// *resolved* store whose values are final; building a container does this
/// once so that later interpolation is a single substitution pass.
///
/// # Examples
///
/// ```rust
/// use wiring::{ParameterStore, ParameterValue};
///
/// let mut params = ParameterStore::new();
/// params.set("admin_email", "a@b.com");
/// params.set("mailer.port", 25);
///
/// assert_eq!(params.resolve("%admin_email%").unwrap(), ParameterValue::from("a@b.com"));
/// // A whole-string placeholder keeps the value's type
/// assert_eq!(params.resolve("%mailer.port%").unwrap(), ParameterValue::Int(25));
/// // Embedded placeholders are stringified
/// assert_eq!(
///     params.resolve("smtp://localhost:%mailer.port%").unwrap(),
///     ParameterValue::from("smtp://localhost:25")
/// );
/// // Doubled delimiters are literal text, never a lookup
/// assert_eq!(params.resolve("%%literal%%").unwrap(), ParameterValue::from("%literal%"));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterStore {
    values: BTreeMap<String, ParameterValue>,
    resolved: bool,
}

impl ParameterStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets (or replaces) a parameter. Marks the store unresolved.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<ParameterValue>) -> &mut Self {
        self.values.insert(name.into(), value.into());
        self.resolved = false;
        self
    }

    /// Returns the stored value of a parameter.
    ///
    /// On an unresolved store this is the raw value, placeholders included.
    pub fn get(&self, name: &str) -> DiResult<&ParameterValue> {
        self.values.get(name).ok_or_else(|| DiError::UnknownParameter {
            name: name.to_string(),
        })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Parameters in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParameterValue)> {
        self.values.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Whether every stored value is final.
    pub fn is_resolved(&self) -> bool {
        self.resolved
    }

    /// Interpolates the placeholders in `raw`.
    ///
    /// If `raw` is exactly one placeholder the looked-up value is returned with
    /// its type preserved. Otherwise each placeholder is replaced by the text
    /// form of its value and the result is a string. `%%` becomes a literal
    /// `%` and is never treated as part of a placeholder.
    pub fn resolve(&self, raw: &str) -> DiResult<ParameterValue> {
        let mut stack = Vec::new();
        self.resolve_str(raw, &mut stack)
    }

    /// Interpolates every string inside `value`, descending into lists and
    /// map values. Non-string scalars are returned as they are.
    pub fn resolve_value(&self, value: &ParameterValue) -> DiResult<ParameterValue> {
        let mut stack = Vec::new();
        self.resolve_nested(value, &mut stack)
    }

    /// Produces a resolved copy of the store, with every parameter
    /// interpolated against the others.
    ///
    /// Fails with `CircularParameter` if parameters reference each other in a
    /// loop, and with the usual interpolation errors otherwise.
    pub fn resolve_all(&self) -> DiResult<ParameterStore> {
        if self.resolved {
            return Ok(self.clone());
        }
        let mut values = BTreeMap::new();
        for name in self.values.keys() {
            let mut stack = Vec::new();
            let value = self.lookup(name, &mut stack)?;
            values.insert(name.clone(), value);
        }
        tracing::trace!(count = values.len(), "resolved parameters");
        Ok(ParameterStore { values, resolved: true })
    }

    /// Escapes `literal` so that interpolating it yields `literal` unchanged.
    ///
    /// ```rust
    /// use wiring::{ParameterStore, ParameterValue};
    ///
    /// let escaped = ParameterStore::escape("100%");
    /// assert_eq!(escaped, "100%%");
    /// assert_eq!(ParameterStore::new().resolve(&escaped).unwrap(), ParameterValue::from("100%"));
    /// ```
    pub fn escape(literal: &str) -> String {
        placeholder::escape(literal)
    }

    fn resolve_str(&self, raw: &str, stack: &mut Vec<String>) -> DiResult<ParameterValue> {
        if !raw.contains(DELIMITER) {
            return Ok(ParameterValue::String(raw.to_string()));
        }

        let segments = placeholder::tokenize(raw)?;
        if let [Segment::Placeholder(name)] = segments.as_slice() {
            return self.lookup(name, stack);
        }

        let mut out = String::with_capacity(raw.len());
        for segment in segments {
            match segment {
                Segment::Text(text) => out.push_str(&text),
                Segment::Placeholder(name) => {
                    let value = self.lookup(name, stack)?;
                    let text = value.interpolate().ok_or_else(|| DiError::NonScalarInterpolation {
                        name: name.to_string(),
                        kind: value.kind(),
                        value: raw.to_string(),
                    })?;
                    out.push_str(&text);
                }
            }
        }
        Ok(ParameterValue::String(out))
    }

    fn resolve_nested(&self, value: &ParameterValue, stack: &mut Vec<String>) -> DiResult<ParameterValue> {
        match value {
            ParameterValue::String(raw) => self.resolve_str(raw, stack),
            ParameterValue::List(items) => items
                .iter()
                .map(|item| self.resolve_nested(item, stack))
                .collect::<DiResult<Vec<_>>>()
                .map(ParameterValue::List),
            ParameterValue::Map(entries) => entries
                .iter()
                .map(|(key, item)| Ok((key.clone(), self.resolve_nested(item, stack)?)))
                .collect::<DiResult<BTreeMap<_, _>>>()
                .map(ParameterValue::Map),
            scalar => Ok(scalar.clone()),
        }
    }

    fn lookup(&self, name: &str, stack: &mut Vec<String>) -> DiResult<ParameterValue> {
        let value = self.get(name)?;
        if self.resolved {
            return Ok(value.clone());
        }

        if stack.iter().any(|n| n == name) {
            let mut path = stack.clone();
            path.push(name.to_string());
            return Err(DiError::CircularParameter(path));
        }

        stack.push(name.to_string());
        let result = self.resolve_nested(value, stack);
        stack.pop();
        result
    }
}

impl<K: Into<String>, V: Into<ParameterValue>> FromIterator<(K, V)> for ParameterStore {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut store = ParameterStore::new();
        for (name, value) in iter {
            store.set(name, value);
        }
        store
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_references_resolve_recursively() {
        let mut params = ParameterStore::new();
        params.set("root", "/srv/app");
        params.set("cache_dir", "%root%/var/cache");
        params.set("twig_cache", "%cache_dir%/twig");

        assert_eq!(
            params.resolve("%twig_cache%").unwrap(),
            ParameterValue::from("/srv/app/var/cache/twig")
        );
    }

    #[test]
    fn resolved_store_does_not_reinterpret_escaped_values() {
        let mut params = ParameterStore::new();
        params.set("discount", "100%%");
        let resolved = params.resolve_all().unwrap();

        assert!(resolved.is_resolved());
        assert_eq!(resolved.get("discount").unwrap(), &ParameterValue::from("100%"));
        assert_eq!(resolved.resolve("%discount% off").unwrap(), ParameterValue::from("100% off"));
    }

    #[test]
    fn self_reference_is_circular() {
        let mut params = ParameterStore::new();
        params.set("a", "%b%");
        params.set("b", "x-%a%");

        match params.resolve("%a%") {
            Err(DiError::CircularParameter(path)) => assert_eq!(path, vec!["a", "b", "a"]),
            other => panic!("expected CircularParameter, got {:?}", other),
        }
    }

    #[test]
    fn set_after_resolve_marks_unresolved() {
        let mut params = ParameterStore::new().resolve_all().unwrap();
        assert!(params.is_resolved());
        params.set("a", 1);
        assert!(!params.is_resolved());
    }

    #[test]
    fn lists_and_maps_are_resolved_elementwise() {
        let mut params = ParameterStore::new();
        params.set("host", "db.local");
        params.set("port", 5432);

        let mut map = BTreeMap::new();
        map.insert("dsn".to_string(), ParameterValue::from("pg://%host%:%port%"));
        map.insert("port".to_string(), ParameterValue::from("%port%"));
        let value = ParameterValue::List(vec![ParameterValue::Map(map), ParameterValue::Bool(true)]);

        let resolved = params.resolve_value(&value).unwrap();
        let list = resolved.as_list().unwrap();
        let entries = list[0].as_map().unwrap();
        assert_eq!(entries["dsn"], ParameterValue::from("pg://db.local:5432"));
        assert_eq!(entries["port"], ParameterValue::Int(5432));
        assert_eq!(list[1], ParameterValue::Bool(true));
    }
}
