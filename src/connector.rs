//! The database seam of the crate.
//!
//! Anything implementing [Queryable](trait.Queryable.html) can run the
//! statements of an upsert. With the `postgresql-native` feature,
//! [PostgreSql](struct.PostgreSql.html) adapts a `tokio-postgres` client or
//! transaction.

mod queryable;

pub use queryable::*;

#[cfg(feature = "postgresql-native")]
pub(crate) mod postgres;
#[cfg(feature = "postgresql-native")]
pub use postgres::PostgreSql;
