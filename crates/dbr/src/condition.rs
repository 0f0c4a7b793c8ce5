//! WHERE / HAVING / ON conditions and the clause compiler.
//!
//! A clause is a flat sequence of [`Condition`]s. Each condition renders in its
//! own parentheses and is joined to the previous one with `AND`, or with `OR`
//! when flagged via [`Condition::or`]. Explicit parenthesis markers group a
//! run of conditions; their position is honoured exactly.
//!
//! # Example
//! ```ignore
//! use dbr::{Condition, arg};
//!
//! // ((`d` = ?) OR (`e` = ?)) AND (`f` = ?)
//! let conds = vec![
//!     Condition::parenthesis_open(),
//!     Condition::column("d", arg(1)),
//!     Condition::column("e", arg("wat")).or(),
//!     Condition::parenthesis_close(),
//!     Condition::column("f", arg(2)),
//! ];
//! ```

use crate::argument::{Argument, Operator};
use crate::error::{OrmError, OrmResult};
use crate::ident::Ident;
use crate::qb::Select;
use crate::sql::Sql;

#[derive(Debug, Clone)]
enum ConditionKind {
    /// `` (`col` <op> ?) ``
    Column { name: String, arg: Argument },
    /// Caller-supplied SQL, written verbatim.
    Raw { sql: String, args: Vec<Argument> },
    /// `` (`col` <op> (SELECT ...)) ``
    SubSelect {
        column: Option<String>,
        op: Operator,
        select: Box<Select>,
    },
    ParenthesisOpen,
    ParenthesisClose,
}

/// One element of a WHERE, HAVING or JOIN ... ON clause.
#[derive(Debug, Clone)]
pub struct Condition {
    kind: ConditionKind,
    or: bool,
}

impl Condition {
    fn new(kind: ConditionKind) -> Self {
        Self { kind, or: false }
    }

    /// Compare a column with an argument. The column name is quoted; dotted
    /// names like `p1.id` render as `` `p1`.`id` ``.
    pub fn column(name: impl Into<String>, arg: impl Into<Argument>) -> Self {
        Self::new(ConditionKind::Column {
            name: name.into(),
            arg: arg.into(),
        })
    }

    /// Raw SQL without arguments, e.g. `` `p2`.`id` = `p1`.`id` ``.
    pub fn raw(sql: impl Into<String>) -> Self {
        Self::new(ConditionKind::Raw {
            sql: sql.into(),
            args: Vec::new(),
        })
    }

    /// Raw SQL with `?` placeholders and the arguments that fill them.
    pub fn raw_args<I, A>(sql: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<Argument>,
    {
        Self::new(ConditionKind::Raw {
            sql: sql.into(),
            args: args.into_iter().map(Into::into).collect(),
        })
    }

    /// Column condition when `expr` is a plain identifier and exactly one
    /// argument is given; raw SQL otherwise.
    ///
    /// `expr("id", [arg(1)])` renders `` (`id` = ?) `` while
    /// `expr("id = ?", [arg(1)])` renders `(id = ?)`.
    pub fn expr<I, A>(expr: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<Argument>,
    {
        let expr = expr.into();
        let mut args: Vec<Argument> = args.into_iter().map(Into::into).collect();
        if args.len() == 1 && Ident::is_valid(&expr) {
            if let Some(arg) = args.pop() {
                return Self::column(expr, arg);
            }
        }
        Self::new(ConditionKind::Raw { sql: expr, args })
    }

    /// Compare a column against a sub-select: `` (`col` IN (SELECT ...)) ``.
    ///
    /// The sub-select's arguments are bound at this position. `IS NULL`,
    /// `IS NOT NULL`, `BETWEEN` and `NOT BETWEEN` fail the compile.
    pub fn sub_select(column: impl Into<String>, op: Operator, select: Select) -> Self {
        Self::new(ConditionKind::SubSelect {
            column: Some(column.into()),
            op,
            select: Box::new(select),
        })
    }

    /// `(EXISTS (SELECT ...))`
    pub fn exists(select: Select) -> Self {
        Self::new(ConditionKind::SubSelect {
            column: None,
            op: Operator::Exists,
            select: Box::new(select),
        })
    }

    /// `(NOT EXISTS (SELECT ...))`
    pub fn not_exists(select: Select) -> Self {
        Self::new(ConditionKind::SubSelect {
            column: None,
            op: Operator::NotExists,
            select: Box::new(select),
        })
    }

    /// Opening group marker.
    pub fn parenthesis_open() -> Self {
        Self::new(ConditionKind::ParenthesisOpen)
    }

    /// Closing group marker.
    pub fn parenthesis_close() -> Self {
        Self::new(ConditionKind::ParenthesisClose)
    }

    /// One equality condition per `(column, argument)` pair, in input order.
    /// `None` compares with `IS NULL`.
    pub fn eq_map<I, K>(pairs: I) -> Vec<Condition>
    where
        I: IntoIterator<Item = (K, Option<Argument>)>,
        K: Into<String>,
    {
        pairs
            .into_iter()
            .map(|(name, arg)| Self::column(name, arg.unwrap_or_else(Argument::null)))
            .collect()
    }

    /// Join to the previous condition with `OR` instead of `AND`.
    pub fn or(mut self) -> Self {
        self.or = true;
        self
    }

    pub fn is_or(&self) -> bool {
        self.or
    }

    fn write(&mut self, sql: &mut Sql) -> OrmResult<()> {
        match &mut self.kind {
            ConditionKind::Column { name, arg } => {
                sql.push_char('(').push_ident(name)?;
                arg.write_column_rhs(sql)?;
                sql.push_char(')');
            }
            ConditionKind::Raw { sql: raw, args } => {
                sql.push_char('(').push_raw(raw, args)?.push_char(')');
            }
            ConditionKind::SubSelect { column, op, select } => {
                if matches!(
                    op,
                    Operator::IsNull | Operator::IsNotNull | Operator::Between | Operator::NotBetween
                ) {
                    return Err(OrmError::validation(format!(
                        "operator {op} cannot compare against a sub-select"
                    )));
                }
                sql.push_char('(');
                if let Some(column) = column {
                    sql.push_ident(column)?.push_char(' ');
                }
                sql.push(op.as_str()).push(" (");
                select.write_nested(sql)?;
                sql.push("))");
            }
            ConditionKind::ParenthesisOpen | ConditionKind::ParenthesisClose => {
                return Err(OrmError::validation(
                    "parenthesis marker outside of a clause",
                ));
            }
        }
        Ok(())
    }
}

/// Compile a condition sequence into `sql`.
///
/// Writes nothing for an empty sequence. Unbalanced markers and empty groups
/// are validation errors.
pub(crate) fn write_conditions(sql: &mut Sql, conds: &mut [Condition]) -> OrmResult<()> {
    let mut depth = 0usize;
    let mut need_join = false;
    let mut group_empty = false;

    for cond in conds.iter_mut() {
        match cond.kind {
            ConditionKind::ParenthesisOpen => {
                if need_join {
                    sql.push(if cond.or { " OR " } else { " AND " });
                }
                sql.push_char('(');
                depth += 1;
                need_join = false;
                group_empty = true;
            }
            ConditionKind::ParenthesisClose => {
                if depth == 0 {
                    return Err(OrmError::validation(
                        "parenthesis close without matching open",
                    ));
                }
                if group_empty {
                    return Err(OrmError::validation("empty parenthesis group"));
                }
                sql.push_char(')');
                depth -= 1;
                need_join = true;
            }
            _ => {
                if need_join {
                    sql.push(if cond.or { " OR " } else { " AND " });
                }
                cond.write(sql)?;
                need_join = true;
                group_empty = false;
            }
        }
    }

    if depth != 0 {
        return Err(OrmError::validation(format!(
            "{depth} unclosed parenthesis group(s)"
        )));
    }
    Ok(())
}
