//! # upsert-resolver
//!
//! Resolves a row identifier by selecting or inserting a single row in a
//! PostgreSQL table.
//!
//! Given a table, named value bindings and the columns of a unique
//! constraint, the resolver looks for a row matching every value, and inserts
//! one with `INSERT ... ON CONFLICT` when there is none. The statements are
//! built as an AST and rendered by a [`visitor`], with every value sent as a
//! parameter.
//!
//! ## Executing an upsert
//!
//! The database is reached through the [`Queryable`](connector::Queryable)
//! trait. With the `postgresql-native` feature, a `tokio-postgres` client or
//! transaction can be wrapped in [`PostgreSql`](connector::PostgreSql).
//!
//! ```rust
//! use upsert_resolver::{ast::Value, bindings::NamedValueBindings, connector::Queryable, upsert::Upsert};
//!
//! # struct Database;
//! # #[async_trait::async_trait]
//! # impl Queryable for Database {
//! #     async fn query_scalar_raw(
//! #         &self,
//! #         _: &str,
//! #         _: &[Value<'_>],
//! #     ) -> upsert_resolver::Result<Option<Value<'static>>> {
//! #         Ok(Some(Value::from(42)))
//! #     }
//! # }
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), upsert_resolver::error::Error> {
//!     # let conn = Database;
//!     let bindings = NamedValueBindings::new()
//!         .bind("name", "foo")
//!         .bind("colorCode", "#ff0000");
//!
//!     let id = Upsert::new("color", bindings)
//!         .unique_constraint(["name"])
//!         .execute(&conn)
//!         .await?;
//!
//!     assert_eq!(Value::from(42), id);
//!     Ok(())
//! }
//! ```
//!
//! ## Inspecting the statements
//!
//! ```rust
//! use upsert_resolver::{bindings::NamedValueBindings, upsert::Upsert, visitor::{Postgres, Visitor}};
//!
//! # fn main() -> Result<(), upsert_resolver::error::Error> {
//! let bindings = NamedValueBindings::new().bind("name", "foo").bind("colorCode", "#ff0000");
//! let plan = Upsert::new("color", bindings).unique_constraint(["name"]).plan()?;
//!
//! let (sql, _) = Postgres::build(plan.lookup().clone())?;
//! assert_eq!(r#"SELECT "id" FROM "color" WHERE ("name" = $1 AND "color_code" = $2)"#, sql);
//!
//! let (sql, _) = Postgres::build(plan.insert().clone())?;
//! assert_eq!(
//!     r#"INSERT INTO "color" ("name", "color_code") VALUES ($1, $2) ON CONFLICT ("name") DO UPDATE SET "color_code" = EXCLUDED."color_code" RETURNING "id""#,
//!     sql
//! );
//! # Ok(())
//! # }
//! ```

pub mod ast;
pub mod bindings;
pub mod connector;
pub mod error;
pub mod upsert;
pub mod visitor;

pub use upsert::{Upsert, UpsertConfiguration, UpsertPlan, upsert};

pub type Result<T> = std::result::Result<T, error::Error>;
