//! UPDATE statement builder.

use crate::argument::Argument;
use crate::condition::{Condition, write_conditions};
use crate::error::{OrmError, OrmResult};
use crate::listener::{EventType, Listenable, Listeners, dispatch};
use crate::options::Options;
use crate::sql::Sql;
use crate::value::Value;

use super::traits::SqlQb;
use super::{log_compiled, write_limit, write_list};

/// SET field value type.
#[derive(Debug, Clone)]
enum SetField {
    /// Bound value
    Value(Argument),
    /// Raw SQL expression, e.g. `NOW()` or `hits + 1`
    Raw(String),
}

/// UPDATE statement builder.
///
/// `` UPDATE `t` SET `a`=?, `b`=NOW() WHERE ... ORDER BY ... LIMIT n ``
#[derive(Debug, Clone, Default)]
pub struct Update {
    options: Options,
    table: String,
    set_fields: Vec<(String, SetField)>,
    wheres: Vec<Condition>,
    order_bys: Vec<String>,
    limit: Option<u64>,
    pub listeners: Listeners<Update>,
    pub propagation_stopped: bool,
}

impl Update {
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

    /// Set a column value.
    pub fn set(&mut self, column: impl Into<String>, value: impl Into<Argument>) -> &mut Self {
        self.set_fields
            .push((column.into(), SetField::Value(value.into())));
        self
    }

    /// Set a column to a raw SQL expression.
    pub fn set_expr(&mut self, column: impl Into<String>, expr: impl Into<String>) -> &mut Self {
        self.set_fields
            .push((column.into(), SetField::Raw(expr.into())));
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
        self.write_body(&mut sql)?;
        let (sql, values) = sql.finish();
        log_compiled(&self.options, Self::KIND, &self.table, &sql, values.len());
        Ok((sql, values))
    }

    fn write_body(&mut self, sql: &mut Sql) -> OrmResult<()> {
        if self.table.is_empty() {
            return Err(OrmError::empty("update: table name is empty"));
        }
        if self.set_fields.is_empty() {
            return Err(OrmError::empty("update: no SET fields"));
        }

        sql.push("UPDATE ").push_ident(&self.table)?.push(" SET ");
        for (i, (column, field)) in self.set_fields.iter().enumerate() {
            if i > 0 {
                sql.push(", ");
            }
            sql.push_ident(column)?.push_char('=');
            match field {
                SetField::Value(arg) => arg.write_value(sql)?,
                SetField::Raw(expr) => {
                    sql.push(expr);
                }
            }
        }

        if !self.wheres.is_empty() {
            sql.push(" WHERE ");
            write_conditions(sql, &mut self.wheres)?;
        }
        write_list(sql, " ORDER BY ", &self.order_bys);
        write_limit(sql, self.limit, None);
        Ok(())
    }
}

impl Listenable for Update {
    const NAME: &'static str = "update";

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

impl SqlQb for Update {
    const KIND: &'static str = "update";

    fn table_name(&self) -> &str {
        &self.table
    }

    fn to_sql(&mut self) -> OrmResult<(String, Vec<Value>)> {
        Update::to_sql(self)
    }
}
