//! # dbr
//!
//! A typed builder for parameterized, MySQL-flavoured SQL statements.
//!
//! ## Features
//!
//! - **Placeholders by default**: statements compile to SQL with `?` placeholders plus the ordered bound values
//! - **Condition trees**: AND/OR chains with explicit parenthesis markers, sub-selects and raw fragments
//! - **Back-tick quoting**: identifiers, dotted names and aliases are validated and quoted
//! - **Listeners**: callbacks that adjust a statement right before it compiles
//! - **Interpolation**: optionally render arguments inline as escaped literals
//! - **Driver agnostic**: execution goes through the [`GenericClient`] trait you implement
//!
//! ## Query Builder (qb)
//!
//! ```ignore
//! use dbr::{Argument, Condition, Operator, alias, arg, qb};
//!
//! // SELECT
//! let mut s = qb::select(["a", "b"]);
//! s.distinct()
//!     .from(alias("c", "cc"))
//!     .where_([
//!         Condition::parenthesis_open(),
//!         Condition::column("d", arg(1)),
//!         Condition::column("e", arg("wat")).or(),
//!         Condition::parenthesis_close(),
//!         Condition::column("h", Argument::int64s([4, 5, 6]).operator(Operator::In)),
//!     ])
//!     .order_by(["l"])
//!     .limit(7);
//! let (sql, args) = s.to_sql()?;
//! // SELECT DISTINCT a, b FROM `c` AS `cc` WHERE ((`d` = ?) OR (`e` = ?)) AND (`h` IN ?) ORDER BY l LIMIT 7
//!
//! // Execution through your own client
//! let rows = s.load(&ctx, &client).await?;
//! ```

pub mod argument;
pub mod client;
pub mod condition;
pub mod context;
pub mod error;
pub mod ident;
pub mod listener;
pub mod options;
pub mod qb;
pub mod value;

mod sql;

pub use argument::{Argument, Arguments, Operator, arg, interpolate};
pub use client::GenericClient;
pub use condition::Condition;
pub use context::Context;
pub use error::{OrmError, OrmResult};
pub use ident::{Alias, Ident, Quoter, alias, split_columns};
pub use listener::{EventType, Listen, Listeners};
pub use options::Options;
pub use value::{ToValue, Value};

// Re-export qb module for easy access
pub use qb::{Delete, Insert, Join, JoinKind, Lock, Select, SqlQb, Update};
