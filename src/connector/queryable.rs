use crate::{
    ast::*,
    error::{Error, ErrorKind},
    visitor::{Postgres, Visitor},
};
use async_trait::async_trait;

/// Represents a connection or a transaction that can be queried.
///
/// The resolver needs a single capability from the database: run one
/// parameterized statement and hand back the first column of the first row.
/// Connection handling, pooling and transaction scoping stay with the
/// implementor.
#[async_trait]
pub trait Queryable: Send + Sync {
    /// Execute a query given as SQL, binding the given parameters positionally.
    /// Returns the first column of the first row, or `None` when the statement
    /// produced no rows.
    async fn query_scalar_raw(&self, sql: &str, params: &[Value<'_>]) -> crate::Result<Option<Value<'static>>>;

    /// Render and execute the given query, returning the first column of the
    /// first row, or `None` when the statement produced no rows.
    async fn query_scalar(&self, q: Query<'_>) -> crate::Result<Option<Value<'static>>> {
        let (sql, params) = Postgres::build(q)?;
        self.query_scalar_raw(&sql, &params).await
    }

    /// Render and execute the given query, which must produce a row.
    ///
    /// Fails with [`ErrorKind::NotFound`] when there is no row, or when the
    /// first column is SQL `NULL`.
    async fn query_one_scalar(&self, q: Query<'_>) -> crate::Result<Value<'static>> {
        match self.query_scalar(q).await? {
            Some(value) if !value.is_null() => Ok(value),
            _ => Err(Error::builder(ErrorKind::NotFound).build()),
        }
    }
}

#[async_trait]
impl<Q> Queryable for &Q
where
    Q: Queryable + ?Sized,
{
    async fn query_scalar_raw(&self, sql: &str, params: &[Value<'_>]) -> crate::Result<Option<Value<'static>>> {
        (**self).query_scalar_raw(sql, params).await
    }
}

#[async_trait]
impl<Q> Queryable for Box<Q>
where
    Q: Queryable + ?Sized,
{
    async fn query_scalar_raw(&self, sql: &str, params: &[Value<'_>]) -> crate::Result<Option<Value<'static>>> {
        (**self).query_scalar_raw(sql, params).await
    }
}
