//! Trait definitions for statement builders.

use tracing::{Instrument, debug_span};

use crate::client::GenericClient;
use crate::context::Context;
use crate::error::OrmResult;
use crate::value::Value;

/// Base trait for all statement builders.
///
/// Provides compilation plus execution through a [`GenericClient`]. Errors
/// reported by the client are wrapped with the statement kind and table;
/// compile errors are returned as they are.
pub trait SqlQb: Send {
    /// Statement kind used in logs and error context.
    const KIND: &'static str;

    /// Table the statement targets.
    fn table_name(&self) -> &str;

    /// Fire listeners and compile to SQL plus bound values.
    fn to_sql(&mut self) -> OrmResult<(String, Vec<Value>)>;

    /// Execute query and return all rows.
    fn load<C: GenericClient>(
        &mut self,
        ctx: &Context,
        conn: &C,
    ) -> impl std::future::Future<Output = OrmResult<Vec<C::Row>>> + Send {
        async move {
            let (sql, args) = self.to_sql()?;
            let table = self.table_name().to_string();
            let span = debug_span!(target: "dbr.sql", "load", statement = Self::KIND, table = %table);
            conn.query(ctx, &sql, &args)
                .instrument(span)
                .await
                .map_err(|e| e.in_statement(Self::KIND, table))
        }
    }

    /// Execute query and return at most one row.
    fn load_opt<C: GenericClient>(
        &mut self,
        ctx: &Context,
        conn: &C,
    ) -> impl std::future::Future<Output = OrmResult<Option<C::Row>>> + Send {
        async move {
            let (sql, args) = self.to_sql()?;
            let table = self.table_name().to_string();
            let span = debug_span!(target: "dbr.sql", "load_opt", statement = Self::KIND, table = %table);
            conn.query_opt(ctx, &sql, &args)
                .instrument(span)
                .await
                .map_err(|e| e.in_statement(Self::KIND, table))
        }
    }

    /// Execute query and return exactly one row; no rows is a not-found error.
    fn load_one<C: GenericClient>(
        &mut self,
        ctx: &Context,
        conn: &C,
    ) -> impl std::future::Future<Output = OrmResult<C::Row>> + Send {
        async move {
            let (sql, args) = self.to_sql()?;
            let table = self.table_name().to_string();
            let span = debug_span!(target: "dbr.sql", "load_one", statement = Self::KIND, table = %table);
            conn.query_one(ctx, &sql, &args)
                .instrument(span)
                .await
                .map_err(|e| e.in_statement(Self::KIND, table))
        }
    }

    /// Execute the statement and return the number of affected rows.
    fn exec<C: GenericClient>(
        &mut self,
        ctx: &Context,
        conn: &C,
    ) -> impl std::future::Future<Output = OrmResult<u64>> + Send {
        async move {
            let (sql, args) = self.to_sql()?;
            let table = self.table_name().to_string();
            let span = debug_span!(target: "dbr.sql", "exec", statement = Self::KIND, table = %table);
            conn.execute(ctx, &sql, &args)
                .instrument(span)
                .await
                .map_err(|e| e.in_statement(Self::KIND, table))
        }
    }
}
