//! INSERT statement builder.

use crate::argument::Argument;
use crate::error::{OrmError, OrmResult};
use crate::listener::{EventType, Listenable, Listeners, dispatch};
use crate::options::Options;
use crate::sql::Sql;
use crate::value::Value;

use super::log_compiled;
use super::select::Select;
use super::traits::SqlQb;

/// Right-hand side of an `ON DUPLICATE KEY UPDATE` assignment.
#[derive(Debug, Clone)]
enum DupValue {
    Arg(Argument),
    /// `` VALUES(`col`) ``: the value the row would have been inserted with.
    Values,
}

/// INSERT statement builder.
///
/// Renders `` INSERT [IGNORE] INTO `t` (`a`,`b`) VALUES (?,?),(?,?) `` or
/// `` INSERT INTO `t` (`a`,`b`) SELECT ... ``, optionally followed by
/// `ON DUPLICATE KEY UPDATE`.
#[derive(Debug, Clone, Default)]
pub struct Insert {
    options: Options,
    table: String,
    ignore: bool,
    columns: Vec<String>,
    records: Vec<Vec<Argument>>,
    select: Option<Box<Select>>,
    on_duplicate: Vec<(String, DupValue)>,
    pub listeners: Listeners<Insert>,
    pub propagation_stopped: bool,
}

impl Insert {
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

    /// `INSERT IGNORE`
    pub fn ignore(&mut self) -> &mut Self {
        self.ignore = true;
        self
    }

    /// Append target columns.
    pub fn columns<I, S>(&mut self, columns: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns.extend(columns.into_iter().map(Into::into));
        self
    }

    /// Append one record. Its length must match the column count.
    pub fn values<I, A>(&mut self, record: I) -> &mut Self
    where
        I: IntoIterator<Item = A>,
        A: Into<Argument>,
    {
        self.records
            .push(record.into_iter().map(Into::into).collect());
        self
    }

    /// Add a column together with its value in the first record.
    pub fn pair(&mut self, column: impl Into<String>, value: impl Into<Argument>) -> &mut Self {
        self.columns.push(column.into());
        if self.records.is_empty() {
            self.records.push(Vec::new());
        }
        self.records[0].push(value.into());
        self
    }

    /// `INSERT INTO t (cols) SELECT ...`. Replaces any value records.
    pub fn select(&mut self, select: Select) -> &mut Self {
        self.select = Some(Box::new(select));
        self
    }

    /// `` ON DUPLICATE KEY UPDATE `col`=? ``
    pub fn on_duplicate_key(
        &mut self,
        column: impl Into<String>,
        value: impl Into<Argument>,
    ) -> &mut Self {
        self.on_duplicate
            .push((column.into(), DupValue::Arg(value.into())));
        self
    }

    /// `` ON DUPLICATE KEY UPDATE `col`=VALUES(`col`) `` for each column.
    pub fn on_duplicate_key_values<I, S>(&mut self, columns: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.on_duplicate
            .extend(columns.into_iter().map(|c| (c.into(), DupValue::Values)));
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
            return Err(OrmError::empty("insert: table name is empty"));
        }
        if self.columns.is_empty() {
            return Err(OrmError::empty("insert: no columns"));
        }

        sql.push("INSERT ");
        if self.ignore {
            sql.push("IGNORE ");
        }
        sql.push("INTO ").push_ident(&self.table)?;
        sql.push(" (").push_ident_list(&self.columns)?.push_char(')');

        if let Some(select) = &mut self.select {
            sql.push_char(' ');
            select.write_nested(sql)?;
        } else {
            if self.records.is_empty() {
                return Err(OrmError::empty("insert: no values"));
            }
            sql.push(" VALUES ");
            for (i, record) in self.records.iter().enumerate() {
                if record.len() != self.columns.len() {
                    return Err(OrmError::validation(format!(
                        "insert: record {} has {} values for {} columns",
                        i,
                        record.len(),
                        self.columns.len()
                    )));
                }
                if i > 0 {
                    sql.push_char(',');
                }
                sql.push_char('(');
                for (j, arg) in record.iter().enumerate() {
                    if j > 0 {
                        sql.push_char(',');
                    }
                    arg.write_value(sql)?;
                }
                sql.push_char(')');
            }
        }

        if !self.on_duplicate.is_empty() {
            sql.push(" ON DUPLICATE KEY UPDATE ");
            for (i, (column, value)) in self.on_duplicate.iter().enumerate() {
                if i > 0 {
                    sql.push(", ");
                }
                sql.push_ident(column)?.push_char('=');
                match value {
                    DupValue::Arg(arg) => arg.write_value(sql)?,
                    DupValue::Values => {
                        sql.push("VALUES(").push_ident(column)?.push_char(')');
                    }
                }
            }
        }
        Ok(())
    }
}

impl Listenable for Insert {
    const NAME: &'static str = "insert";

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

impl SqlQb for Insert {
    const KIND: &'static str = "insert";

    fn table_name(&self) -> &str {
        &self.table
    }

    fn to_sql(&mut self) -> OrmResult<(String, Vec<Value>)> {
        Insert::to_sql(self)
    }
}
