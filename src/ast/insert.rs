use super::{Column, Query, Table, Value};

/// A builder for an `INSERT` statement.
#[derive(Clone, Debug, PartialEq)]
pub struct Insert<'a> {
    pub(crate) table: Table<'a>,
    pub(crate) columns: Vec<Column<'a>>,
    pub(crate) values: Vec<Value<'a>>,
    pub(crate) on_conflict: Option<OnConflict<'a>>,
    pub(crate) returning: Option<Vec<Column<'a>>>,
}

/// A builder for an `INSERT` statement for a single row.
#[derive(Clone, Debug, PartialEq)]
pub struct SingleRowInsert<'a> {
    pub(crate) table: Table<'a>,
    pub(crate) columns: Vec<Column<'a>>,
    pub(crate) values: Vec<Value<'a>>,
}

/// `INSERT` conflict resolution strategies, PostgreSQL flavour.
///
/// The `constraint` columns are the conflict target. An empty target is only
/// valid for `DoNothing`, where it renders as a bare `ON CONFLICT`.
#[derive(Clone, Debug, PartialEq)]
pub enum OnConflict<'a> {
    /// When a row already exists, do nothing.
    ///
    /// ```rust
    /// # use upsert_resolver::{ast::*, visitor::{Visitor, Postgres}};
    /// # fn main() -> Result<(), upsert_resolver::error::Error> {
    /// let query = Insert::single_into("users").value("email", "a@b.c").build();
    /// let query = query.on_conflict(OnConflict::do_nothing(["email"]));
    /// let (sql, _) = Postgres::build(query)?;
    ///
    /// assert_eq!(
    ///     r#"INSERT INTO "users" ("email") VALUES ($1) ON CONFLICT ("email") DO NOTHING"#,
    ///     sql
    /// );
    /// # Ok(())
    /// # }
    /// ```
    DoNothing { constraint: Vec<Column<'a>> },
    /// When a row already exists, overwrite the given columns with the values
    /// of the row we tried to insert (`EXCLUDED`).
    DoUpdate {
        constraint: Vec<Column<'a>>,
        columns: Vec<Column<'a>>,
    },
}

impl<'a> OnConflict<'a> {
    pub fn do_nothing<K, I>(constraint: I) -> Self
    where
        K: Into<Column<'a>>,
        I: IntoIterator<Item = K>,
    {
        OnConflict::DoNothing {
            constraint: constraint.into_iter().map(Into::into).collect(),
        }
    }

    pub fn do_update<K, I, L, J>(constraint: I, columns: J) -> Self
    where
        K: Into<Column<'a>>,
        I: IntoIterator<Item = K>,
        L: Into<Column<'a>>,
        J: IntoIterator<Item = L>,
    {
        OnConflict::DoUpdate {
            constraint: constraint.into_iter().map(Into::into).collect(),
            columns: columns.into_iter().map(Into::into).collect(),
        }
    }
}

impl<'a> From<Insert<'a>> for Query<'a> {
    fn from(insert: Insert<'a>) -> Self {
        Query::Insert(Box::new(insert))
    }
}

impl<'a> From<SingleRowInsert<'a>> for Insert<'a> {
    fn from(insert: SingleRowInsert<'a>) -> Self {
        Insert {
            table: insert.table,
            columns: insert.columns,
            values: insert.values,
            on_conflict: None,
            returning: None,
        }
    }
}

impl<'a> From<SingleRowInsert<'a>> for Query<'a> {
    fn from(insert: SingleRowInsert<'a>) -> Query<'a> {
        Query::from(Insert::from(insert))
    }
}

impl<'a> Insert<'a> {
    /// Creates a new single row `INSERT` statement for the given table.
    ///
    /// ```rust
    /// # use upsert_resolver::{ast::*, visitor::{Visitor, Postgres}};
    /// # fn main() -> Result<(), upsert_resolver::error::Error> {
    /// let query = Insert::single_into("users");
    /// let (sql, _) = Postgres::build(query)?;
    ///
    /// assert_eq!(r#"INSERT INTO "users" DEFAULT VALUES"#, sql);
    /// # Ok(())
    /// # }
    /// ```
    pub fn single_into<T>(table: T) -> SingleRowInsert<'a>
    where
        T: Into<Table<'a>>,
    {
        SingleRowInsert {
            table: table.into(),
            columns: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Sets the conflict resolution strategy.
    pub fn on_conflict(mut self, on_conflict: OnConflict<'a>) -> Self {
        self.on_conflict = Some(on_conflict);
        self
    }

    /// Sets the returned columns.
    ///
    /// ```rust
    /// # use upsert_resolver::{ast::*, visitor::{Visitor, Postgres}};
    /// # fn main() -> Result<(), upsert_resolver::error::Error> {
    /// let query = Insert::single_into("users");
    /// let insert = Insert::from(query).returning(["id"]);
    /// let (sql, _) = Postgres::build(insert)?;
    ///
    /// assert_eq!("INSERT INTO \"users\" DEFAULT VALUES RETURNING \"id\"", sql);
    /// # Ok(())
    /// # }
    /// ```
    pub fn returning<K, I>(mut self, columns: I) -> Self
    where
        K: Into<Column<'a>>,
        I: IntoIterator<Item = K>,
    {
        self.returning = Some(columns.into_iter().map(|k| k.into()).collect());
        self
    }
}

impl<'a> SingleRowInsert<'a> {
    /// Adds a new value to the `INSERT` statement
    ///
    /// ```rust
    /// # use upsert_resolver::{ast::*, visitor::{Visitor, Postgres}};
    /// # fn main() -> Result<(), upsert_resolver::error::Error> {
    /// let query = Insert::single_into("users").value("foo", 10);
    /// let (sql, params) = Postgres::build(query)?;
    ///
    /// assert_eq!(r#"INSERT INTO "users" ("foo") VALUES ($1)"#, sql);
    /// assert_eq!(vec![Value::from(10)], params);
    /// # Ok(())
    /// # }
    /// ```
    pub fn value<K, V>(mut self, key: K, val: V) -> SingleRowInsert<'a>
    where
        K: Into<Column<'a>>,
        V: Into<Value<'a>>,
    {
        self.columns.push(key.into());
        self.values.push(val.into());

        self
    }

    /// Convert into a common `Insert` statement.
    pub fn build(self) -> Insert<'a> {
        Insert::from(self)
    }
}
