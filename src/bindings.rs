//! Named value bindings: the ordered field/value pairs an upsert writes.
use crate::ast::Value;
use convert_case::{Case, Casing};
use std::borrow::Cow;

/// Normalizes a binding name into the column name used in the statements.
///
/// Words are split at lower/upper case changes, acronyms, underscores and
/// letter/digit transitions, then joined with underscores in lower case.
///
/// ```rust
/// # use upsert_resolver::bindings::column_name;
/// assert_eq!("bar_baz", column_name("barBaz"));
/// assert_eq!("bar_baz", column_name("bar_baz"));
/// assert_eq!("bar_0", column_name("bar0"));
/// ```
pub fn column_name(name: &str) -> String {
    name.to_case(Case::Snake)
}

/// An ordered list of field names and the values bound to them.
///
/// The order of the bindings is the order in which they were added, and it
/// decides the order of columns and parameters in the generated statements.
/// A binding can be present without a value (undefined), which is rejected
/// when the upsert is planned. SQL `NULL` is a defined value, e.g.
/// `Value::Text(None)`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NamedValueBindings<'a> {
    bindings: Vec<(Cow<'a, str>, Option<Value<'a>>)>,
}

impl<'a> NamedValueBindings<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a binding.
    ///
    /// ```rust
    /// # use upsert_resolver::{ast::Value, bindings::NamedValueBindings};
    /// let bindings = NamedValueBindings::new().bind("fooBar", "baz").bind("count", 3);
    ///
    /// assert_eq!(2, bindings.len());
    /// assert_eq!(Some(&Value::from(3)), bindings.get("count").flatten());
    /// ```
    pub fn bind<K, V>(mut self, name: K, value: V) -> Self
    where
        K: Into<Cow<'a, str>>,
        V: Into<Value<'a>>,
    {
        self.insert(name, Some(value.into()));
        self
    }

    /// Adds a binding, `None` marking its value as undefined.
    pub fn insert<K>(&mut self, name: K, value: Option<Value<'a>>)
    where
        K: Into<Cow<'a, str>>,
    {
        self.bindings.push((name.into(), value));
    }

    /// The value bound to `name`: `None` if there is no such binding,
    /// `Some(None)` if the binding is undefined.
    pub fn get(&self, name: &str) -> Option<Option<&Value<'a>>> {
        self.bindings
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, value)| value.as_ref())
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// The bindings in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&Value<'a>>)> {
        self.bindings.iter().map(|(name, value)| (&**name, value.as_ref()))
    }

    pub(crate) fn into_inner(self) -> Vec<(Cow<'a, str>, Option<Value<'a>>)> {
        self.bindings
    }
}

impl<'a, K, V> FromIterator<(K, V)> for NamedValueBindings<'a>
where
    K: Into<Cow<'a, str>>,
    V: Into<Value<'a>>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut bindings = Self::new();
        bindings.extend(iter);
        bindings
    }
}

impl<'a, K, V> Extend<(K, V)> for NamedValueBindings<'a>
where
    K: Into<Cow<'a, str>>,
    V: Into<Value<'a>>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (name, value) in iter {
            self.insert(name, Some(value.into()));
        }
    }
}

/// Object keys become binding names in document order. JSON `null` is SQL
/// `NULL`, arrays and objects are bound as JSON.
impl<'a> From<serde_json::Map<String, serde_json::Value>> for NamedValueBindings<'a> {
    fn from(map: serde_json::Map<String, serde_json::Value>) -> Self {
        map.into_iter()
            .map(|(name, value)| {
                let value = match value {
                    serde_json::Value::Null => Value::Text(None),
                    serde_json::Value::Bool(b) => Value::from(b),
                    serde_json::Value::Number(n) => match n.as_i64() {
                        Some(i) => Value::from(i),
                        None => Value::Double(n.as_f64()),
                    },
                    serde_json::Value::String(s) => Value::from(s),
                    json => Value::from(json),
                };

                (name, value)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn camel_case_names_become_snake_case() {
        assert_eq!("bar_baz", column_name("barBaz"));
        assert_eq!("qux_quux", column_name("quxQuux"));
        assert_eq!("bar_baz", column_name("BarBaz"));
    }

    #[test]
    fn snake_case_names_are_kept() {
        assert_eq!("bar", column_name("bar"));
        assert_eq!("bar_baz", column_name("bar_baz"));
        assert_eq!("bar_0", column_name("bar_0"));
    }

    #[test]
    fn digits_start_a_new_word() {
        assert_eq!("bar_0", column_name("bar0"));
        assert_eq!("bar_1", column_name("bar1"));
    }

    #[test]
    fn acronyms_are_one_word() {
        assert_eq!("user_id", column_name("userID"));
    }

    #[test]
    fn bindings_keep_insertion_order() {
        let bindings = NamedValueBindings::new().bind("zeta", 1).bind("alpha", 2).bind("mid", 3);
        let names: Vec<_> = bindings.iter().map(|(name, _)| name).collect();

        assert_eq!(vec!["zeta", "alpha", "mid"], names);
    }

    #[test]
    fn undefined_bindings_are_distinct_from_null() {
        let mut bindings = NamedValueBindings::new().bind("nullable", Value::Text(None));
        bindings.insert("missing", None);

        assert_eq!(Some(Some(&Value::Text(None))), bindings.get("nullable"));
        assert_eq!(Some(None), bindings.get("missing"));
        assert_eq!(None, bindings.get("absent"));
    }

    #[test]
    fn json_objects_convert_in_document_order() {
        let object = json!({ "name": "foo", "count": 2, "ratio": 0.5, "flag": true, "gone": null, "tags": ["a"] });

        let map = match object {
            serde_json::Value::Object(map) => map,
            _ => unreachable!(),
        };

        let bindings = NamedValueBindings::from(map);
        let values: Vec<_> = bindings.iter().map(|(name, value)| (name, value.cloned())).collect();

        assert_eq!(
            vec![
                ("name", Some(Value::from("foo"))),
                ("count", Some(Value::from(2i64))),
                ("ratio", Some(Value::from(0.5))),
                ("flag", Some(Value::from(true))),
                ("gone", Some(Value::Text(None))),
                ("tags", Some(Value::from(json!(["a"])))),
            ],
            values
        );
    }
}
