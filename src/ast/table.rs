use std::borrow::Cow;

/// A table definition, optionally qualified with the schema it lives in.
#[derive(Clone, Debug, PartialEq)]
pub struct Table<'a> {
    pub(crate) name: Cow<'a, str>,
    pub(crate) database: Option<Cow<'a, str>>,
}

impl<'a> Table<'a> {
    /// Define in which database (schema) the table is located.
    pub fn database<T>(mut self, database: T) -> Self
    where
        T: Into<Cow<'a, str>>,
    {
        self.database = Some(database.into());
        self
    }

    /// The unqualified name of the table.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl<'a> From<&'a str> for Table<'a> {
    fn from(s: &'a str) -> Table<'a> {
        Table {
            name: Cow::Borrowed(s),
            database: None,
        }
    }
}

impl<'a> From<&'a String> for Table<'a> {
    fn from(s: &'a String) -> Table<'a> {
        Table::from(s.as_str())
    }
}

impl<'a> From<String> for Table<'a> {
    fn from(s: String) -> Self {
        Table {
            name: Cow::Owned(s),
            database: None,
        }
    }
}

impl<'a> From<(&'a str, &'a str)> for Table<'a> {
    fn from(s: (&'a str, &'a str)) -> Table<'a> {
        Table::from(s.1).database(s.0)
    }
}

impl<'a> From<(String, String)> for Table<'a> {
    fn from(s: (String, String)) -> Self {
        Table::from(s.1).database(s.0)
    }
}
