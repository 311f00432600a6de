use super::{Comparable, Compare, Value};
use std::borrow::Cow;

/// A column definition.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Column<'a> {
    pub(crate) name: Cow<'a, str>,
}

impl<'a> Column<'a> {
    /// Create a column definition.
    pub fn new<S>(name: S) -> Self
    where
        S: Into<Cow<'a, str>>,
    {
        Column { name: name.into() }
    }
}

impl<'a> From<&'a str> for Column<'a> {
    fn from(s: &'a str) -> Self {
        Column::new(s)
    }
}

impl<'a> From<&'a String> for Column<'a> {
    fn from(s: &'a String) -> Self {
        Column::new(s.as_str())
    }
}

impl<'a> From<String> for Column<'a> {
    fn from(s: String) -> Self {
        Column::new(s)
    }
}

impl<'a> From<Cow<'a, str>> for Column<'a> {
    fn from(s: Cow<'a, str>) -> Self {
        Column { name: s }
    }
}

impl<'a> Comparable<'a> for Column<'a> {
    fn equals<T>(self, comparison: T) -> Compare<'a>
    where
        T: Into<Value<'a>>,
    {
        Compare::Equals(self, comparison.into())
    }
}

impl<'a> Comparable<'a> for &'a str {
    fn equals<T>(self, comparison: T) -> Compare<'a>
    where
        T: Into<Value<'a>>,
    {
        Column::from(self).equals(comparison)
    }
}
