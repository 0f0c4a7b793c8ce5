//! DELETE statement builder.

use crate::condition::{Condition, write_conditions};
use crate::error::{OrmError, OrmResult};
use crate::listener::{EventType, Listenable, Listeners, dispatch};
use crate::options::Options;
use crate::sql::Sql;
use crate::value::Value;

use super::traits::SqlQb;
use super::{log_compiled, write_limit, write_list};

/// DELETE statement builder.
///
/// `` DELETE FROM `t` WHERE ... ORDER BY ... LIMIT n ``. Without conditions
/// every row is deleted.
#[derive(Debug, Clone, Default)]
pub struct Delete {
    options: Options,
    table: String,
    wheres: Vec<Condition>,
    order_bys: Vec<String>,
    limit: Option<u64>,
    pub listeners: Listeners<Delete>,
    pub propagation_stopped: bool,
}

impl Delete {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            ..Self::default()
        }
    }

    pub fn with_options(mut self, options: Options) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn set_options(&mut self, options: Options) -> &mut Self {
        self.options = options;
        self
    }

    pub fn where_(&mut self, conditions: impl IntoIterator<Item = Condition>) -> &mut Self {
        self.wheres.extend(conditions);
        self
    }

    pub fn order_by<I, S>(&mut self, columns: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.order_bys.extend(columns.into_iter().map(Into::into));
        self
    }

    pub fn limit(&mut self, n: u64) -> &mut Self {
        self.limit = Some(n);
        self
    }

    pub fn stop_propagation(&mut self) -> &mut Self {
        self.propagation_stopped = true;
        self
    }

    pub fn table_name(&self) -> &str {
        &self.table
    }

    /// Fire listeners, then compile to SQL and the ordered bound values.
    pub fn to_sql(&mut self) -> OrmResult<(String, Vec<Value>)> {
        dispatch(self, EventType::BeforeToSql)?;
        let mut sql = Sql::new(&self.options);
        if self.table.is_empty() {
            return Err(OrmError::empty("delete: table name is empty"));
        }
        sql.push("DELETE FROM ").push_ident(&self.table)?;
        if !self.wheres.is_empty() {
            sql.push(" WHERE ");
            write_conditions(&mut sql, &mut self.wheres)?;
        }
        write_list(&mut sql, " ORDER BY ", &self.order_bys);
        write_limit(&mut sql, self.limit, None);

        let (sql, values) = sql.finish();
        log_compiled(&self.options, Self::KIND, &self.table, &sql, values.len());
        Ok((sql, values))
    }
}

impl Listenable for Delete {
    const NAME: &'static str = "delete";

    fn listeners_mut(&mut self) -> &mut Listeners<Self> {
        &mut self.listeners
    }

    fn propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }

    fn set_propagation_stopped(&mut self, stopped: bool) {
        self.propagation_stopped = stopped;
    }
}

impl SqlQb for Delete {
    const KIND: &'static str = "delete";

    fn table_name(&self) -> &str {
        &self.table
    }

    fn to_sql(&mut self) -> OrmResult<(String, Vec<Value>)> {
        Delete::to_sql(self)
    }
}
