//! SELECT query builder.

use crate::argument::Argument;
use crate::condition::{Condition, write_conditions};
use crate::error::{OrmError, OrmResult};
use crate::ident::{Alias, split_columns};
use crate::listener::{EventType, Listenable, Listeners, dispatch};
use crate::options::Options;
use crate::sql::Sql;
use crate::value::Value;

use super::join::{Join, JoinKind};
use super::traits::SqlQb;
use super::{log_compiled, write_limit, write_list};

#[derive(Debug, Clone)]
enum Column {
    /// Written verbatim: `a`, `COUNT(*)`, `p1.*`.
    Raw(String),
    /// Identifier-quoted: `` `t3`.`name` ``.
    Quoted(String),
    /// `` `t3`.`name` AS `t3Name` ``
    QuotedAlias(String, String),
    /// `` SUM(price) AS `total_price` ``
    ExprAlias(String, String),
}

#[derive(Debug, Clone)]
enum Source {
    Table(Alias),
    Sub { select: Box<Select>, alias: String },
}

/// Row locking clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lock {
    /// `LOCK IN SHARE MODE`
    ShareMode,
    /// `FOR UPDATE`
    ForUpdate,
}

impl Lock {
    pub fn as_str(&self) -> &'static str {
        match self {
            Lock::ShareMode => "LOCK IN SHARE MODE",
            Lock::ForUpdate => "FOR UPDATE",
        }
    }
}

/// SELECT statement builder.
///
/// Setters take `&mut self` so the same builder can be reconfigured from a
/// listener callback. Clauses compile in fixed order:
///
/// `SELECT [DISTINCT] [STRAIGHT_JOIN] [SQL_NO_CACHE] cols FROM src [JOIN ...]
/// [WHERE ...] [GROUP BY ...] [HAVING ...] [ORDER BY ...] [LIMIT n [OFFSET m]] [lock]`
///
/// # Example
/// ```ignore
/// use dbr::{Condition, Select, alias, arg};
///
/// let mut s = Select::new(["a", "b"]);
/// s.from(alias("c", "cc"))
///     .where_([Condition::column("d", arg(1))])
///     .order_by(["l"])
///     .limit(7);
/// let (sql, args) = s.to_sql()?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct Select {
    options: Options,
    raw: Option<(String, Vec<Argument>)>,
    columns: Vec<Column>,
    distinct: bool,
    straight_join: bool,
    sql_no_cache: bool,
    source: Option<Source>,
    joins: Vec<Join>,
    wheres: Vec<Condition>,
    group_bys: Vec<String>,
    havings: Vec<Condition>,
    order_bys: Vec<String>,
    limit: Option<u64>,
    offset: Option<u64>,
    lock: Option<Lock>,
    /// Listeners fired before every compile.
    pub listeners: Listeners<Select>,
    /// Set by a listener to skip the remaining listeners of the current compile.
    pub propagation_stopped: bool,
    build_error: Option<String>,
}

impl Select {
    /// Create a SELECT for the given columns. Comma separated entries are split
    /// and trimmed; columns are written verbatim.
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut s = Self::default();
        s.add_columns(columns);
        s
    }

    /// Select from a sub-select: `FROM (SELECT ...) AS `alias``.
    ///
    /// The inner statement's arguments come first in the bound argument list.
    pub fn from_sub(select: Select, alias: impl Into<String>) -> Self {
        Self {
            source: Some(Source::Sub {
                select: Box::new(select),
                alias: alias.into(),
            }),
            ..Self::default()
        }
    }

    /// A statement compiled verbatim from hand-written SQL with `?` placeholders.
    pub fn from_sql<I, A>(sql: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<Argument>,
    {
        Self {
            raw: Some((sql.into(), args.into_iter().map(Into::into).collect())),
            ..Self::default()
        }
    }

    /// Replace the formatting options.
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

    fn set_build_error(&mut self, err: String) {
        if self.build_error.is_none() {
            self.build_error = Some(err);
        }
    }

    // ==================== modifiers ====================

    pub fn distinct(&mut self) -> &mut Self {
        self.distinct = true;
        self
    }

    pub fn straight_join(&mut self) -> &mut Self {
        self.straight_join = true;
        self
    }

    pub fn sql_no_cache(&mut self) -> &mut Self {
        self.sql_no_cache = true;
        self
    }

    // ==================== columns ====================

    /// Append columns written verbatim. `"d,e, f"` adds three columns.
    pub fn add_columns<I, S>(&mut self, columns: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.columns
            .extend(split_columns(columns).into_iter().map(Column::Raw));
        self
    }

    /// Append identifier-quoted columns: `t3.name` becomes `` `t3`.`name` ``.
    pub fn add_columns_quoted<I, S>(&mut self, columns: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.columns
            .extend(split_columns(columns).into_iter().map(Column::Quoted));
        self
    }

    /// Append `column, alias` pairs, both quoted. Entries are comma split
    /// first, so `["t3.name,t3Name", "t3.sku", "t3SKU"]` is two pairs.
    pub fn add_columns_quoted_alias<I, S>(&mut self, pairs: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let names = split_columns(pairs);
        if names.len() % 2 != 0 {
            self.set_build_error(format!(
                "add_columns_quoted_alias: expects column/alias pairs, got {} names",
                names.len()
            ));
            return self;
        }
        let mut it = names.into_iter();
        while let (Some(col), Some(alias)) = (it.next(), it.next()) {
            self.columns.push(Column::QuotedAlias(col, alias));
        }
        self
    }

    /// Append `expression, alias` pairs. Expressions are written verbatim and
    /// not split, so they may contain commas.
    pub fn add_columns_expr_alias<I, S>(&mut self, pairs: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let items: Vec<String> = pairs.into_iter().map(Into::into).collect();
        if items.len() % 2 != 0 {
            self.set_build_error(format!(
                "add_columns_expr_alias: expects expression/alias pairs, got {} items",
                items.len()
            ));
            return self;
        }
        let mut it = items.into_iter();
        while let (Some(expr), Some(alias)) = (it.next(), it.next()) {
            self.columns.push(Column::ExprAlias(expr, alias));
        }
        self
    }

    // ==================== FROM / JOIN ====================

    /// Set the source table: `s.from("c")` or `s.from(alias("c", "cc"))`.
    pub fn from(&mut self, table: impl Into<Alias>) -> &mut Self {
        self.source = Some(Source::Table(table.into()));
        self
    }

    /// `INNER JOIN table ON conditions`
    pub fn join(
        &mut self,
        table: impl Into<Alias>,
        on: impl IntoIterator<Item = Condition>,
    ) -> &mut Self {
        self.joins.push(Join::on(JoinKind::Inner, table, on));
        self
    }

    /// `LEFT JOIN table ON conditions`
    pub fn left_join(
        &mut self,
        table: impl Into<Alias>,
        on: impl IntoIterator<Item = Condition>,
    ) -> &mut Self {
        self.joins.push(Join::on(JoinKind::Left, table, on));
        self
    }

    /// `RIGHT JOIN table ON conditions`
    pub fn right_join(
        &mut self,
        table: impl Into<Alias>,
        on: impl IntoIterator<Item = Condition>,
    ) -> &mut Self {
        self.joins.push(Join::on(JoinKind::Right, table, on));
        self
    }

    /// `<kind> JOIN table USING (`a`,`b`)`
    pub fn join_using<S: Into<String>>(
        &mut self,
        kind: JoinKind,
        table: impl Into<Alias>,
        columns: impl IntoIterator<Item = S>,
    ) -> &mut Self {
        self.joins.push(Join::using(kind, table, columns));
        self
    }

    // ==================== WHERE / GROUP BY / HAVING ====================

    /// Append WHERE conditions. Repeated calls append.
    pub fn where_(&mut self, conditions: impl IntoIterator<Item = Condition>) -> &mut Self {
        self.wheres.extend(conditions);
        self
    }

    /// Append GROUP BY expressions, written verbatim.
    pub fn group_by<I, S>(&mut self, columns: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.group_bys.extend(columns.into_iter().map(Into::into));
        self
    }

    /// Append HAVING conditions. Repeated calls append.
    pub fn having(&mut self, conditions: impl IntoIterator<Item = Condition>) -> &mut Self {
        self.havings.extend(conditions);
        self
    }

    // ==================== ORDER BY / LIMIT / locks ====================

    /// Append ORDER BY expressions, written verbatim (`"name ASC"`).
    pub fn order_by<I, S>(&mut self, columns: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.order_bys.extend(columns.into_iter().map(Into::into));
        self
    }

    /// Append descending ORDER BY expressions: `id` becomes `id DESC`.
    pub fn order_by_desc<I, S>(&mut self, columns: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.order_bys
            .extend(columns.into_iter().map(|c| format!("{} DESC", c.into())));
        self
    }

    pub fn limit(&mut self, n: u64) -> &mut Self {
        self.limit = Some(n);
        self
    }

    /// OFFSET is only written together with a LIMIT.
    pub fn offset(&mut self, n: u64) -> &mut Self {
        self.offset = Some(n);
        self
    }

    /// 1-based pagination: `LIMIT per_page OFFSET (page-1)*per_page`.
    /// Pages below 1 are treated as 1.
    pub fn paginate(&mut self, page: u64, per_page: u64) -> &mut Self {
        let page = page.max(1);
        self.limit = Some(per_page);
        self.offset = Some((page - 1).saturating_mul(per_page));
        self
    }

    pub fn lock_in_share_mode(&mut self) -> &mut Self {
        self.lock = Some(Lock::ShareMode);
        self
    }

    pub fn for_update(&mut self) -> &mut Self {
        self.lock = Some(Lock::ForUpdate);
        self
    }

    /// Skip the remaining listeners of the current compile.
    pub fn stop_propagation(&mut self) -> &mut Self {
        self.propagation_stopped = true;
        self
    }

    // ==================== compile ====================

    /// Table name used for logging and error context.
    pub fn table_name(&self) -> &str {
        match &self.source {
            Some(Source::Table(t)) => &t.name,
            Some(Source::Sub { alias, .. }) => alias,
            None => "",
        }
    }

    /// Fire listeners, then compile to SQL and the ordered bound values.
    ///
    /// Listeners may mutate the statement, so compiling twice applies their
    /// effects twice.
    pub fn to_sql(&mut self) -> OrmResult<(String, Vec<Value>)> {
        dispatch(self, EventType::BeforeToSql)?;
        let mut sql = Sql::new(&self.options);
        self.write_body(&mut sql)?;
        let (sql, values) = sql.finish();
        log_compiled(&self.options, Self::KIND, self.table_name(), &sql, values.len());
        Ok((sql, values))
    }

    /// Compile into an enclosing statement's buffer.
    pub(crate) fn write_nested(&mut self, sql: &mut Sql) -> OrmResult<()> {
        dispatch(self, EventType::BeforeToSql)?;
        self.write_body(sql)
    }

    fn write_body(&mut self, sql: &mut Sql) -> OrmResult<()> {
        if let Some(err) = &self.build_error {
            return Err(OrmError::validation(err.clone()));
        }
        if let Some((raw, args)) = &self.raw {
            sql.push_raw(raw, args)?;
            return Ok(());
        }
        if self.columns.is_empty() {
            return Err(OrmError::empty("select: no columns"));
        }

        sql.push("SELECT ");
        if self.distinct {
            sql.push("DISTINCT ");
        }
        if self.straight_join {
            sql.push("STRAIGHT_JOIN ");
        }
        if self.sql_no_cache {
            sql.push("SQL_NO_CACHE ");
        }

        let quoter = sql.quoter();
        for (i, col) in self.columns.iter().enumerate() {
            if i > 0 {
                sql.push(", ");
            }
            match col {
                Column::Raw(c) => {
                    sql.push(c);
                }
                Column::Quoted(c) => {
                    sql.push_ident(c)?;
                }
                Column::QuotedAlias(c, a) => {
                    sql.push(&quoter.quote_as(c, a)?);
                }
                Column::ExprAlias(e, a) => {
                    sql.push(&quoter.expr_alias(e, a)?);
                }
            }
        }

        match &mut self.source {
            Some(Source::Table(table)) => {
                sql.push(" FROM ").push_alias(table)?;
            }
            Some(Source::Sub { select, alias }) => {
                sql.push(" FROM (");
                select.write_nested(sql)?;
                sql.push(") AS ").push_ident(alias)?;
            }
            None => {}
        }

        for join in &mut self.joins {
            join.write(sql)?;
        }

        if !self.wheres.is_empty() {
            sql.push(" WHERE ");
            write_conditions(sql, &mut self.wheres)?;
        }

        write_list(sql, " GROUP BY ", &self.group_bys);

        if !self.havings.is_empty() {
            sql.push(" HAVING ");
            write_conditions(sql, &mut self.havings)?;
        }

        write_list(sql, " ORDER BY ", &self.order_bys);
        write_limit(sql, self.limit, self.offset);

        if let Some(lock) = self.lock {
            sql.push_char(' ').push(lock.as_str());
        }
        Ok(())
    }
}

impl Listenable for Select {
    const NAME: &'static str = "select";

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

impl SqlQb for Select {
    const KIND: &'static str = "select";

    fn table_name(&self) -> &str {
        Select::table_name(self)
    }

    fn to_sql(&mut self) -> OrmResult<(String, Vec<Value>)> {
        Select::to_sql(self)
    }
}
