//! Statement builders.
//!
//! Every builder owns its clauses, its [`Options`] and its listener registry.
//! Compiling fires the `before_to_sql` listeners first, then renders SQL and
//! collects the bound values in placeholder order.
//!
//! # Usage
//!
//! ```ignore
//! use dbr::{Argument, Condition, Operator, arg, qb};
//!
//! // SELECT
//! let mut s = qb::select(["id", "name"]);
//! s.from("users")
//!     .where_([
//!         Condition::column("status", arg("active")),
//!         Condition::column("role", Argument::strings(["a", "b"]).operator(Operator::In)),
//!     ])
//!     .order_by_desc(["created_at"])
//!     .limit(20);
//! let (sql, args) = s.to_sql()?;
//!
//! // INSERT
//! let mut i = qb::insert("users");
//! i.columns(["name", "email"]).values([arg("alice"), arg("a@example.com")]);
//!
//! // UPDATE
//! let mut u = qb::update("users");
//! u.set("status", arg("inactive")).where_([Condition::column("id", arg(7))]);
//!
//! // DELETE
//! let mut d = qb::delete("users");
//! d.where_([Condition::column("id", arg(7))]);
//! ```

mod delete;
mod insert;
mod join;
mod select;
mod traits;
mod update;

#[cfg(test)]
mod tests;

pub use delete::Delete;
pub use insert::Insert;
pub use join::{Join, JoinKind};
pub use select::{Lock, Select};
pub use traits::SqlQb;
pub use update::Update;

use tracing::debug;

use crate::options::Options;
use crate::sql::Sql;

/// Create a SELECT for the given columns.
///
/// # Example
/// ```ignore
/// let mut s = dbr::qb::select(["a", "b"]);
/// s.from("c");
/// ```
pub fn select<I, S>(columns: I) -> Select
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    Select::new(columns)
}

/// Create an INSERT into `table`.
pub fn insert(table: impl Into<String>) -> Insert {
    Insert::new(table)
}

/// Create an UPDATE of `table`.
pub fn update(table: impl Into<String>) -> Update {
    Update::new(table)
}

/// Create a DELETE from `table`.
pub fn delete(table: impl Into<String>) -> Delete {
    Delete::new(table)
}

/// Emit the compiled statement on the `dbr.sql` target.
pub(crate) fn log_compiled(opts: &Options, kind: &str, table: &str, sql: &str, args: usize) {
    if !opts.log_sql {
        return;
    }
    debug!(
        target: "dbr.sql",
        statement = kind,
        table,
        args,
        sql = opts.truncate_sql(sql),
        "compiled"
    );
}

/// `<keyword>a, b, c`; nothing when `items` is empty.
pub(crate) fn write_list(sql: &mut Sql, keyword: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    sql.push(keyword);
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            sql.push(", ");
        }
        sql.push(item);
    }
}

/// ` LIMIT n[ OFFSET m]`. OFFSET without LIMIT is dropped.
pub(crate) fn write_limit(sql: &mut Sql, limit: Option<u64>, offset: Option<u64>) {
    let Some(limit) = limit else {
        return;
    };
    sql.push(" LIMIT ").push(&limit.to_string());
    if let Some(offset) = offset {
        sql.push(" OFFSET ").push(&offset.to_string());
    }
}
