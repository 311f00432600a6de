mod conversion;
mod error;

use crate::{
    ast::{Params, Value},
    connector::Queryable,
};
use async_trait::async_trait;
use tokio_postgres::GenericClient;

/// Runs statements through a `tokio-postgres` [`Client`] or [`Transaction`].
///
/// Wrap a `Transaction` to run the upsert as part of a larger unit of work.
/// The wrapper never commits, rolls back or closes what it is given.
///
/// [`Client`]: tokio_postgres::Client
/// [`Transaction`]: tokio_postgres::Transaction
#[derive(Debug)]
pub struct PostgreSql<C> {
    client: C,
}

impl<C> PostgreSql<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    /// The wrapped client.
    pub fn client(&self) -> &C {
        &self.client
    }
}

#[async_trait]
impl<C> Queryable for PostgreSql<C>
where
    C: GenericClient + Send + Sync,
{
    #[tracing::instrument(skip(self, params), fields(params = %Params(params)))]
    async fn query_scalar_raw(&self, sql: &str, params: &[Value<'_>]) -> crate::Result<Option<Value<'static>>> {
        let rows = self.client.query(sql, &conversion::conv_params(params)).await?;

        match rows.first() {
            Some(row) => Ok(Some(conversion::first_column(row)?)),
            None => Ok(None),
        }
    }
}
