//! JOIN clauses for SELECT.

use crate::condition::{Condition, write_conditions};
use crate::error::OrmResult;
use crate::ident::Alias;
use crate::sql::Sql;

/// Join flavour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JoinKind {
    #[default]
    Inner,
    Left,
    Right,
}

impl JoinKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            JoinKind::Inner => "INNER JOIN",
            JoinKind::Left => "LEFT JOIN",
            JoinKind::Right => "RIGHT JOIN",
        }
    }
}

#[derive(Debug, Clone)]
enum Constraint {
    On(Vec<Condition>),
    Using(Vec<String>),
}

/// One joined table with its ON conditions or USING column list.
#[derive(Debug, Clone)]
pub struct Join {
    kind: JoinKind,
    table: Alias,
    constraint: Constraint,
}

impl Join {
    pub fn on(
        kind: JoinKind,
        table: impl Into<Alias>,
        conditions: impl IntoIterator<Item = Condition>,
    ) -> Self {
        Self {
            kind,
            table: table.into(),
            constraint: Constraint::On(conditions.into_iter().collect()),
        }
    }

    pub fn using<S: Into<String>>(
        kind: JoinKind,
        table: impl Into<Alias>,
        columns: impl IntoIterator<Item = S>,
    ) -> Self {
        Self {
            kind,
            table: table.into(),
            constraint: Constraint::Using(columns.into_iter().map(Into::into).collect()),
        }
    }

    pub fn kind(&self) -> JoinKind {
        self.kind
    }

    /// `` INNER JOIN `t` AS `a` ON (...) AND (...) `` or `` ... USING (`a`,`b`) ``
    pub(crate) fn write(&mut self, sql: &mut Sql) -> OrmResult<()> {
        sql.push_char(' ').push(self.kind.as_str()).push_char(' ');
        sql.push_alias(&self.table)?;
        match &mut self.constraint {
            Constraint::On(conds) if conds.is_empty() => {}
            Constraint::On(conds) => {
                sql.push(" ON ");
                write_conditions(sql, conds)?;
            }
            Constraint::Using(cols) if cols.is_empty() => {}
            Constraint::Using(cols) => {
                sql.push(" USING (").push_ident_list(cols)?.push_char(')');
            }
        }
        Ok(())
    }
}
