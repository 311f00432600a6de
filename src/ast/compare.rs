use super::{Column, ConditionTree, Value};

/// A comparison between a column and a parameterized value.
#[derive(Debug, Clone, PartialEq)]
pub enum Compare<'a> {
    /// `left = right`
    Equals(Column<'a>, Value<'a>),
}

impl<'a> Compare<'a> {
    /// Joins two comparisons into an `AND` condition.
    ///
    /// ```rust
    /// # use upsert_resolver::{ast::*, visitor::{Visitor, Postgres}};
    /// # fn main() -> Result<(), upsert_resolver::error::Error> {
    /// let conditions = "foo".equals("bar").and("baz".equals(1));
    /// let query = Select::from_table("users").column("id").so_that(conditions);
    /// let (sql, params) = Postgres::build(query)?;
    ///
    /// assert_eq!(r#"SELECT "id" FROM "users" WHERE ("foo" = $1 AND "baz" = $2)"#, sql);
    /// assert_eq!(vec![Value::from("bar"), Value::from(1)], params);
    /// # Ok(())
    /// # }
    /// ```
    pub fn and(self, other: Compare<'a>) -> ConditionTree<'a> {
        ConditionTree::And(vec![self, other])
    }
}

impl<'a> From<Compare<'a>> for ConditionTree<'a> {
    fn from(compare: Compare<'a>) -> Self {
        ConditionTree::And(vec![compare])
    }
}

/// An item that can be compared against other values in the database.
pub trait Comparable<'a> {
    /// Tests if both sides are the same value.
    ///
    /// ```rust
    /// # use upsert_resolver::{ast::*, visitor::{Visitor, Postgres}};
    /// # fn main() -> Result<(), upsert_resolver::error::Error> {
    /// let query = Select::from_table("users").column("id").so_that("foo".equals("bar"));
    /// let (sql, params) = Postgres::build(query)?;
    ///
    /// assert_eq!(r#"SELECT "id" FROM "users" WHERE ("foo" = $1)"#, sql);
    /// assert_eq!(vec![Value::from("bar")], params);
    /// # Ok(())
    /// # }
    /// ```
    fn equals<T>(self, comparison: T) -> Compare<'a>
    where
        T: Into<Value<'a>>;
}
