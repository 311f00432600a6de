use super::{Column, ConditionTree, Query, Table};

/// A builder for a `SELECT` statement.
#[derive(Debug, PartialEq, Clone)]
pub struct Select<'a> {
    pub(crate) table: Table<'a>,
    pub(crate) columns: Vec<Column<'a>>,
    pub(crate) conditions: Option<ConditionTree<'a>>,
}

impl<'a> From<Select<'a>> for Query<'a> {
    fn from(sel: Select<'a>) -> Query<'a> {
        Query::Select(Box::new(sel))
    }
}

impl<'a> Select<'a> {
    /// Creates a new `SELECT` statement for the given table.
    ///
    /// ```rust
    /// # use upsert_resolver::{ast::*, visitor::{Visitor, Postgres}};
    /// # fn main() -> Result<(), upsert_resolver::error::Error> {
    /// let query = Select::from_table(("public", "users"));
    /// let (sql, _) = Postgres::build(query)?;
    ///
    /// assert_eq!(r#"SELECT * FROM "public"."users""#, sql);
    /// # Ok(())
    /// # }
    /// ```
    pub fn from_table<T>(table: T) -> Self
    where
        T: Into<Table<'a>>,
    {
        Select {
            table: table.into(),
            columns: Vec::new(),
            conditions: None,
        }
    }

    /// Adds a column to be selected.
    pub fn column<T>(mut self, column: T) -> Self
    where
        T: Into<Column<'a>>,
    {
        self.columns.push(column.into());
        self
    }

    /// Adds `WHERE` conditions to the query, replacing the previous
    /// conditions.
    pub fn so_that<T>(mut self, conditions: T) -> Self
    where
        T: Into<ConditionTree<'a>>,
    {
        self.conditions = Some(conditions.into());
        self
    }
}
