//! Generic client trait: the execution collaborator statements hand their SQL to.
//!
//! dbr never opens connections, manages pools or owns transactions. Callers
//! implement [`GenericClient`] over whatever driver, pool or transaction they
//! use and pass it to [`SqlQb::load`](crate::SqlQb::load) and friends.

use crate::context::Context;
use crate::error::{OrmError, OrmResult};
use crate::value::Value;

/// A trait that unifies database clients and transactions.
///
/// Every method receives the caller's [`Context`]; implementations decide how
/// to honour cancellation.
pub trait GenericClient: Send + Sync {
    /// Row type produced by queries.
    type Row: Send;

    /// Execute a query and return all rows.
    fn query(
        &self,
        ctx: &Context,
        sql: &str,
        args: &[Value],
    ) -> impl std::future::Future<Output = OrmResult<Vec<Self::Row>>> + Send;

    /// Execute a query and return the first row, if any.
    ///
    /// Semantics:
    /// - 0 rows: returns `Ok(None)`
    /// - 1 row: returns `Ok(Some(row))`
    /// - multiple rows: returns `Ok(Some(first_row))` (does **not** error)
    fn query_opt(
        &self,
        ctx: &Context,
        sql: &str,
        args: &[Value],
    ) -> impl std::future::Future<Output = OrmResult<Option<Self::Row>>> + Send {
        async move {
            let rows = self.query(ctx, sql, args).await?;
            Ok(rows.into_iter().next())
        }
    }

    /// Execute a query and return the **first** row.
    ///
    /// Returns `OrmError::NotFound` if no rows are returned.
    fn query_one(
        &self,
        ctx: &Context,
        sql: &str,
        args: &[Value],
    ) -> impl std::future::Future<Output = OrmResult<Self::Row>> + Send {
        async move {
            self.query_opt(ctx, sql, args)
                .await?
                .ok_or_else(|| OrmError::not_found("Expected 1 row, got 0"))
        }
    }

    /// Execute a statement and return the number of affected rows.
    fn execute(
        &self,
        ctx: &Context,
        sql: &str,
        args: &[Value],
    ) -> impl std::future::Future<Output = OrmResult<u64>> + Send;
}

impl<C: GenericClient> GenericClient for &C {
    type Row = C::Row;

    fn query(
        &self,
        ctx: &Context,
        sql: &str,
        args: &[Value],
    ) -> impl std::future::Future<Output = OrmResult<Vec<Self::Row>>> + Send {
        (**self).query(ctx, sql, args)
    }

    fn query_opt(
        &self,
        ctx: &Context,
        sql: &str,
        args: &[Value],
    ) -> impl std::future::Future<Output = OrmResult<Option<Self::Row>>> + Send {
        (**self).query_opt(ctx, sql, args)
    }

    fn query_one(
        &self,
        ctx: &Context,
        sql: &str,
        args: &[Value],
    ) -> impl std::future::Future<Output = OrmResult<Self::Row>> + Send {
        (**self).query_one(ctx, sql, args)
    }

    fn execute(
        &self,
        ctx: &Context,
        sql: &str,
        args: &[Value],
    ) -> impl std::future::Future<Output = OrmResult<u64>> + Send {
        (**self).execute(ctx, sql, args)
    }
}
