//! Visitors for reading an abstract SQL syntax tree, generating the query and
//! gathering parameters in the right order.
//!
//! The visitor writes identifiers and parameter placeholders in two separate
//! steps: [`delimited_identifiers`](Visitor::delimited_identifiers) quotes
//! every table and column name, and
//! [`visit_parameterized`](Visitor::visit_parameterized) stores the value and
//! writes a placeholder in its place. Values never end up in the SQL text.
mod postgres;

pub use self::postgres::Postgres;

use crate::ast::*;
use std::fmt;

pub type Result = crate::Result<()>;

/// A function travelling through the query AST, building the final query
/// string and gathering parameters sent to the database together with the
/// query.
pub trait Visitor<'a> {
    /// Quote character surrounding identifiers, such as column and table names.
    const C_QUOTE: &'static str;

    /// Convert the given `Query` to an SQL string and a vector of parameters.
    /// Every parameter placeholder in the query has its value in the vector,
    /// in the same position.
    fn build<Q>(query: Q) -> crate::Result<(String, Vec<Value<'a>>)>
    where
        Q: Into<Query<'a>>;

    /// Write to the query.
    fn write<D: fmt::Display>(&mut self, s: D) -> Result;

    /// When called, the visitor decided to not render the parameter into the query,
    /// writing a placeholder and calling `add_parameter` with the replaced value.
    fn add_parameter(&mut self, value: Value<'a>);

    /// The placeholder for the parameter stored last.
    fn parameter_substitution(&mut self) -> Result;

    /// The `INSERT` statement, conflict handling is database specific.
    fn visit_insert(&mut self, insert: Insert<'a>) -> Result;

    /// A parameter placeholder, storing the value.
    fn visit_parameterized(&mut self, value: Value<'a>) -> Result {
        self.add_parameter(value);
        self.parameter_substitution()
    }

    fn surround_with<F>(&mut self, begin: &str, end: &str, f: F) -> Result
    where
        F: FnOnce(&mut Self) -> Result,
    {
        self.write(begin)?;
        f(self)?;
        self.write(end)
    }

    /// Writes the dot-separated parts as quoted identifiers. A quote inside a
    /// part is doubled, so the name can never terminate the identifier early.
    fn delimited_identifiers(&mut self, parts: &[&str]) -> Result {
        let len = parts.len();

        for (i, part) in parts.iter().enumerate() {
            let escaped = part.replace(Self::C_QUOTE, &Self::C_QUOTE.repeat(2));
            self.surround_with(Self::C_QUOTE, Self::C_QUOTE, |ref mut s| {
                s.write(&escaped)
            })?;

            if i < (len - 1) {
                self.write(".")?;
            }
        }

        Ok(())
    }

    /// A walk through a complete query.
    fn visit_query(&mut self, query: Query<'a>) -> Result {
        match query {
            Query::Select(select) => self.visit_select(*select),
            Query::Insert(insert) => self.visit_insert(*insert),
        }
    }

    /// A walk through a `SELECT` statement
    fn visit_select(&mut self, select: Select<'a>) -> Result {
        self.write("SELECT ")?;

        if select.columns.is_empty() {
            self.write("*")?;
        } else {
            self.visit_columns(select.columns)?;
        }

        self.write(" FROM ")?;
        self.visit_table(select.table)?;

        if let Some(conditions) = select.conditions {
            self.write(" WHERE ")?;
            self.visit_conditions(conditions)?;
        }

        Ok(())
    }

    /// A database table identifier
    fn visit_table(&mut self, table: Table<'a>) -> Result {
        match table.database {
            Some(database) => self.delimited_identifiers(&[&*database, &*table.name]),
            None => self.delimited_identifiers(&[&*table.name]),
        }
    }

    /// A database column identifier
    fn visit_column(&mut self, column: Column<'a>) -> Result {
        self.delimited_identifiers(&[&*column.name])
    }

    /// A comma-separated list of column identifiers.
    fn visit_columns(&mut self, columns: Vec<Column<'a>>) -> Result {
        let len = columns.len();

        for (i, column) in columns.into_iter().enumerate() {
            self.visit_column(column)?;

            if i < (len - 1) {
                self.write(", ")?;
            }
        }

        Ok(())
    }

    /// A comma-separated list of parameter placeholders.
    fn visit_values(&mut self, values: Vec<Value<'a>>) -> Result {
        let len = values.len();

        for (i, value) in values.into_iter().enumerate() {
            self.visit_parameterized(value)?;

            if i < (len - 1) {
                self.write(", ")?;
            }
        }

        Ok(())
    }

    /// A walk through the `WHERE` conditions.
    fn visit_conditions(&mut self, tree: ConditionTree<'a>) -> Result {
        match tree {
            ConditionTree::And(compares) => self.surround_with("(", ")", |ref mut s| {
                let len = compares.len();

                for (i, compare) in compares.into_iter().enumerate() {
                    s.visit_compare(compare)?;

                    if i < (len - 1) {
                        s.write(" AND ")?;
                    }
                }

                Ok(())
            }),
            ConditionTree::NoCondition => self.write("1=1"),
        }
    }

    /// A comparison expression
    fn visit_compare(&mut self, compare: Compare<'a>) -> Result {
        match compare {
            Compare::Equals(column, value) => {
                self.visit_column(column)?;
                self.write(" = ")?;
                self.visit_parameterized(value)
            }
        }
    }
}
