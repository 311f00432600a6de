//! Select-or-insert of a single row, resolving to the row identifier.
//!
//! An upsert first looks for a row matching every bound value. When there is
//! none, it inserts one, letting `ON CONFLICT` settle a race with a concurrent
//! writer:
//!
//! - with columns left outside of the unique constraint, the insert updates
//!   them on conflict and returns the identifier directly;
//! - when the unique constraint covers every bound column, the insert does
//!   nothing on conflict and the first `SELECT` runs again.
//!
//! At most three statements are sent, one after another, and every value is
//! sent as a parameter.
use crate::{
    ast::*,
    bindings::{NamedValueBindings, column_name},
    connector::Queryable,
    error::{Error, ErrorKind},
};
use serde::Deserialize;
use std::borrow::Cow;

/// Settings of an upsert.
///
/// ```rust
/// # use upsert_resolver::upsert::UpsertConfiguration;
/// let configuration: UpsertConfiguration = serde_json::from_str(r#"{"identifierName": "uid"}"#).unwrap();
/// assert_eq!("uid", configuration.identifier_name);
///
/// let configuration: UpsertConfiguration = serde_json::from_str("{}").unwrap();
/// assert_eq!("id", configuration.identifier_name);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UpsertConfiguration {
    /// The column holding the row identifier.
    pub identifier_name: String,
}

impl Default for UpsertConfiguration {
    fn default() -> Self {
        Self {
            identifier_name: String::from("id"),
        }
    }
}

/// A builder for an upsert.
#[derive(Debug, Clone)]
pub struct Upsert<'a> {
    table: Table<'a>,
    bindings: NamedValueBindings<'a>,
    unique_constraint: Vec<Cow<'a, str>>,
    configuration: UpsertConfiguration,
}

impl<'a> Upsert<'a> {
    /// Creates an upsert of the given bindings into the table.
    ///
    /// Without a unique constraint the insert has no conflict target
    /// (`ON CONFLICT DO NOTHING`), matching any unique index of the table,
    /// and the lookup runs again to find the identifier.
    pub fn new<T>(table: T, bindings: NamedValueBindings<'a>) -> Self
    where
        T: Into<Table<'a>>,
    {
        Upsert {
            table: table.into(),
            bindings,
            unique_constraint: Vec::new(),
            configuration: UpsertConfiguration::default(),
        }
    }

    /// The columns of the unique constraint targeted by `ON CONFLICT`. The
    /// names are normalized like the binding names, and must all be bound.
    pub fn unique_constraint<K, I>(mut self, columns: I) -> Self
    where
        K: Into<Cow<'a, str>>,
        I: IntoIterator<Item = K>,
    {
        self.unique_constraint = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn configuration(mut self, configuration: UpsertConfiguration) -> Self {
        self.configuration = configuration;
        self
    }

    /// Validates the input and builds the statements, without running
    /// anything.
    pub fn plan(self) -> crate::Result<UpsertPlan<'a>> {
        let Upsert {
            table,
            bindings,
            unique_constraint,
            configuration,
        } = self;

        if bindings.is_empty() {
            return Err(Error::builder(ErrorKind::EmptyBindings).build());
        }

        if let Some((name, _)) = bindings.iter().find(|(_, value)| value.is_none()) {
            let kind = ErrorKind::UndefinedBindingValue { name: name.to_owned() };
            return Err(Error::builder(kind).build());
        }

        let mut remaining: Vec<(String, Value<'a>)> = Vec::with_capacity(bindings.len());

        for (name, value) in bindings.into_inner() {
            let column = column_name(&name);

            if remaining.iter().any(|(c, _)| *c == column) {
                return Err(Error::builder(ErrorKind::DuplicateColumn { column }).build());
            }

            if let Some(value) = value {
                remaining.push((column, value));
            }
        }

        let mut constraint: Vec<(Cow<'a, str>, String)> = Vec::with_capacity(unique_constraint.len());

        for given in unique_constraint {
            let column = column_name(&given);

            if !constraint.iter().any(|(_, c)| *c == column) {
                constraint.push((given, column));
            }
        }

        // Constraint columns go first, in their given order, followed by the
        // rest in binding order.
        let mut columns = Vec::with_capacity(remaining.len());

        for (given, column) in constraint.iter() {
            match remaining.iter().position(|(c, _)| c == column) {
                Some(position) => columns.push(remaining.remove(position)),
                None => {
                    let kind = ErrorKind::InvalidConstraintColumn {
                        column: given.clone().into_owned(),
                    };

                    return Err(Error::builder(kind).build());
                }
            }
        }

        // An update on conflict needs a conflict target. Without one, any
        // unique index of the table resolves the conflict.
        let update_columns: Vec<String> = if constraint.is_empty() {
            Vec::new()
        } else {
            remaining.iter().map(|(column, _)| column.clone()).collect()
        };

        columns.extend(remaining);

        let identifier = configuration.identifier_name;

        let lookup = Select::from_table(table.clone())
            .column(identifier.clone())
            .so_that(
                columns
                    .iter()
                    .map(|(column, value)| Column::from(column.clone()).equals(value.clone()))
                    .collect::<ConditionTree>(),
            );

        let insert = columns
            .into_iter()
            .fold(Insert::single_into(table), |insert, (column, value)| insert.value(column, value))
            .build();

        let constraint = constraint.into_iter().map(|(_, column)| column);
        let updates_on_conflict = !update_columns.is_empty();

        let insert = if updates_on_conflict {
            insert
                .on_conflict(OnConflict::do_update(constraint, update_columns))
                .returning([identifier])
        } else {
            insert.on_conflict(OnConflict::do_nothing(constraint))
        };

        Ok(UpsertPlan {
            lookup,
            insert,
            updates_on_conflict,
        })
    }

    /// Validates the input and runs the statements.
    pub async fn execute<Q>(self, conn: &Q) -> crate::Result<Value<'static>>
    where
        Q: Queryable + ?Sized,
    {
        self.plan()?.execute(conn).await
    }
}

/// A validated upsert, holding the statements it may run.
#[derive(Debug, Clone, PartialEq)]
pub struct UpsertPlan<'a> {
    lookup: Select<'a>,
    insert: Insert<'a>,
    updates_on_conflict: bool,
}

impl<'a> UpsertPlan<'a> {
    /// The `SELECT` looking for a row matching every bound value.
    pub fn lookup(&self) -> &Select<'a> {
        &self.lookup
    }

    /// The `INSERT` run when the lookup finds nothing.
    pub fn insert(&self) -> &Insert<'a> {
        &self.insert
    }

    /// `true` when the insert updates the columns outside of the unique
    /// constraint on conflict and returns the identifier. Otherwise it does
    /// nothing on conflict, and the lookup runs a second time.
    pub fn updates_on_conflict(&self) -> bool {
        self.updates_on_conflict
    }

    /// Runs the statements, returning the identifier of the matching or
    /// inserted row.
    ///
    /// Every error from the connection is returned as-is, and nothing is
    /// retried. When the insert did nothing and the second lookup still finds
    /// no row, the error is [`ErrorKind::NotFound`].
    #[tracing::instrument(name = "upsert", skip_all, fields(table = %self.lookup.table.name()))]
    pub async fn execute<Q>(self, conn: &Q) -> crate::Result<Value<'static>>
    where
        Q: Queryable + ?Sized,
    {
        let UpsertPlan {
            lookup,
            insert,
            updates_on_conflict,
        } = self;

        if let Some(id) = conn.query_scalar(lookup.clone().into()).await? {
            if !id.is_null() {
                tracing::debug!(%id, "found an existing row");
                return Ok(id);
            }
        }

        if updates_on_conflict {
            tracing::debug!("no matching row, inserting with update on conflict");
            return conn.query_one_scalar(insert.into()).await;
        }

        tracing::debug!("no matching row, inserting and selecting again");
        conn.query_scalar(insert.into()).await?;
        conn.query_one_scalar(lookup.into()).await
    }
}

/// Finds the row matching all `bindings` in `table`, inserting it when
/// missing, and returns its `id`.
///
/// The binding names are normalized to snake case column names. The
/// `unique_constraint_column_names` name the unique constraint used for
/// conflict resolution. An empty slice leaves the conflict target out
/// (`ON CONFLICT DO NOTHING`), so any unique index of the table applies.
///
/// Columns and parameters are ordered the same way in both statements:
/// constraint columns first, in the given order, then the remaining
/// bindings in their order. The `INSERT` column list therefore follows the
/// lookup's `WHERE` clause rather than the plain binding order; the two only
/// differ when the constraint does not name the leading bindings.
///
/// ```rust
/// # use upsert_resolver::{ast::Value, connector::Queryable, bindings::NamedValueBindings, upsert::upsert};
/// # struct Database;
/// # #[async_trait::async_trait]
/// # impl Queryable for Database {
/// #     async fn query_scalar_raw(
/// #         &self,
/// #         _: &str,
/// #         _: &[Value<'_>],
/// #     ) -> upsert_resolver::Result<Option<Value<'static>>> {
/// #         Ok(Some(Value::from(1)))
/// #     }
/// # }
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> upsert_resolver::Result<()> {
/// # let conn = Database;
/// let bindings = NamedValueBindings::new().bind("email", "foo@example.com").bind("displayName", "Foo");
/// let id = upsert(&conn, "account", bindings, &["email"]).await?;
/// # assert_eq!(Value::from(1), id);
/// # Ok(())
/// # }
/// ```
pub async fn upsert<'a, Q, T>(
    conn: &Q,
    table: T,
    bindings: NamedValueBindings<'a>,
    unique_constraint_column_names: &[&str],
) -> crate::Result<Value<'static>>
where
    Q: Queryable + ?Sized,
    T: Into<Table<'a>>,
{
    Upsert::new(table, bindings)
        .unique_constraint(unique_constraint_column_names.iter().map(|column| column.to_string()))
        .execute(conn)
        .await
}
