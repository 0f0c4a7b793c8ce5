//! Typed arguments bound to SQL placeholders.
//!
//! An [`Argument`] holds one value or an ordered list of values together with
//! the [`Operator`] used when it is compared against a column. Rendering rules:
//!
//! - comparison operators (`=`, `!=`, `<`, `<=`, `>`, `>=`, `LIKE`, `NOT LIKE`)
//!   emit one placeholder and bind one value
//! - `IN` / `NOT IN` emit a single `?` standing for the whole list and bind
//!   every value of it; a list holding NULLs renders `(?,NULL,?)` instead
//! - `BETWEEN` / `NOT BETWEEN` need exactly two values and emit `? AND ?`
//! - `IS NULL` / `IS NOT NULL` emit nothing and bind nothing
//! - a NULL value in a comparison slot is written as the literal `NULL`
//!
//! # Example
//! ```ignore
//! use dbr::{Argument, Operator, arg};
//!
//! let a = arg(33);
//! let b = Argument::int64s([33, 44]).operator(Operator::In);
//! let c = Argument::list([Some("x"), None, Some("y")]).operator(Operator::In);
//! ```

use std::fmt;

use bytes::Bytes;

use crate::error::{OrmError, OrmResult};
use crate::sql::Sql;
use crate::value::{ToValue, Value, escape_string, utf8};

/// Comparison operator carried by an [`Argument`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Operator {
    /// `=`
    #[default]
    Equal,
    /// `!=`
    NotEqual,
    /// `<`
    Less,
    /// `<=`
    LessOrEqual,
    /// `>`
    Greater,
    /// `>=`
    GreaterOrEqual,
    /// `LIKE`
    Like,
    /// `NOT LIKE`
    NotLike,
    /// `IN`, the whole list behind one placeholder
    In,
    /// `NOT IN`
    NotIn,
    /// `BETWEEN ? AND ?`
    Between,
    /// `NOT BETWEEN ? AND ?`
    NotBetween,
    /// `IS NULL`, no placeholder
    IsNull,
    /// `IS NOT NULL`, no placeholder
    IsNotNull,
    /// `EXISTS`, sub-selects only
    Exists,
    /// `NOT EXISTS`, sub-selects only
    NotExists,
}

impl Operator {
    /// SQL keyword or symbol.
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Equal => "=",
            Operator::NotEqual => "!=",
            Operator::Less => "<",
            Operator::LessOrEqual => "<=",
            Operator::Greater => ">",
            Operator::GreaterOrEqual => ">=",
            Operator::Like => "LIKE",
            Operator::NotLike => "NOT LIKE",
            Operator::In => "IN",
            Operator::NotIn => "NOT IN",
            Operator::Between => "BETWEEN",
            Operator::NotBetween => "NOT BETWEEN",
            Operator::IsNull => "IS NULL",
            Operator::IsNotNull => "IS NOT NULL",
            Operator::Exists => "EXISTS",
            Operator::NotExists => "NOT EXISTS",
        }
    }

    /// Number of placeholder slots an argument with this operator fills.
    pub fn placeholders(&self) -> usize {
        match self {
            Operator::IsNull | Operator::IsNotNull | Operator::Exists | Operator::NotExists => 0,
            Operator::Between | Operator::NotBetween => 2,
            _ => 1,
        }
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Operator::In | Operator::NotIn)
    }

    pub fn is_range(&self) -> bool {
        matches!(self, Operator::Between | Operator::NotBetween)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stored value. Text built from raw bytes stays unchecked until compile.
#[derive(Debug, Clone, PartialEq)]
enum Datum {
    Value(Value),
    Text(Bytes),
}

impl Datum {
    fn is_null(&self) -> bool {
        matches!(self, Datum::Value(Value::Null))
    }

    fn to_value(&self) -> OrmResult<Value> {
        match self {
            Datum::Value(v) => Ok(v.clone()),
            Datum::Text(b) => Ok(Value::String(utf8(b)?.to_string())),
        }
    }

    fn write_literal(&self, out: &mut String) -> OrmResult<()> {
        match self {
            Datum::Value(v) => v.write_literal(out),
            Datum::Text(b) => {
                escape_string(out, utf8(b)?);
                Ok(())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Data {
    One(Datum),
    Many(Vec<Datum>),
}

/// A value or list of values bound to placeholders, tagged with an operator.
///
/// Arguments are immutable apart from the operator, which is replaced
/// functionally via [`Argument::operator`].
#[derive(Debug, Clone, PartialEq)]
pub struct Argument {
    data: Data,
    op: Operator,
}

/// Create a scalar argument compared with `=`.
pub fn arg<T: ToValue>(value: T) -> Argument {
    Argument::new(value)
}

impl<T: ToValue> From<T> for Argument {
    fn from(value: T) -> Self {
        Argument::new(value)
    }
}

impl Argument {
    /// Scalar argument. `None` (or [`Value::Null`]) renders as the literal `NULL`.
    pub fn new<T: ToValue>(value: T) -> Self {
        Self {
            data: Data::One(Datum::Value(value.to_value())),
            op: Operator::Equal,
        }
    }

    /// `IS NULL`
    pub fn null() -> Self {
        Self {
            data: Data::One(Datum::Value(Value::Null)),
            op: Operator::IsNull,
        }
    }

    /// `IS NOT NULL`
    pub fn not_null() -> Self {
        Self {
            data: Data::One(Datum::Value(Value::Null)),
            op: Operator::IsNotNull,
        }
    }

    /// Ordered list of values. The operator stays `=` until set.
    ///
    /// An empty list is kept as is: it renders one placeholder and binds
    /// nothing, so the condition matches no rows.
    pub fn list<I, T>(values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: ToValue,
    {
        Self {
            data: Data::Many(
                values
                    .into_iter()
                    .map(|v| Datum::Value(v.to_value()))
                    .collect(),
            ),
            op: Operator::Equal,
        }
    }

    pub fn int64s(values: impl IntoIterator<Item = i64>) -> Self {
        Self::list(values)
    }

    pub fn float64s(values: impl IntoIterator<Item = f64>) -> Self {
        Self::list(values)
    }

    pub fn strings<S: Into<String>>(values: impl IntoIterator<Item = S>) -> Self {
        Self::list(values.into_iter().map(Into::into).collect::<Vec<String>>())
    }

    pub fn bools(values: impl IntoIterator<Item = bool>) -> Self {
        Self::list(values)
    }

    pub fn bytes_list<B: Into<Bytes>>(values: impl IntoIterator<Item = B>) -> Self {
        Self::list(values.into_iter().map(Into::into).collect::<Vec<Bytes>>())
    }

    /// Text taken from raw bytes. UTF-8 is checked when the statement compiles;
    /// invalid input fails the compile with a validation error.
    pub fn string_bytes(value: impl Into<Bytes>) -> Self {
        Self {
            data: Data::One(Datum::Text(value.into())),
            op: Operator::Equal,
        }
    }

    /// Return a copy compared with `op`.
    pub fn operator(mut self, op: Operator) -> Self {
        self.op = op;
        self
    }

    pub fn op(&self) -> Operator {
        self.op
    }

    /// Whether this is a single NULL value.
    pub fn is_null(&self) -> bool {
        matches!(&self.data, Data::One(d) if d.is_null())
    }

    /// Number of placeholder slots this argument fills in compiled SQL.
    pub fn placeholder_count(&self) -> usize {
        self.op.placeholders()
    }

    /// Number of stored values, NULLs included.
    pub fn value_count(&self) -> usize {
        self.datums().len()
    }

    fn datums(&self) -> &[Datum] {
        match &self.data {
            Data::One(d) => std::slice::from_ref(d),
            Data::Many(list) => list,
        }
    }

    fn first(&self) -> Option<&Datum> {
        self.datums().first()
    }

    /// Reject operator/value shapes that cannot be rendered.
    pub(crate) fn check(&self) -> OrmResult<()> {
        let n = self.value_count();
        match self.op {
            Operator::Exists | Operator::NotExists => Err(OrmError::validation(format!(
                "operator {} requires a sub-select",
                self.op
            ))),
            op if op.is_range() && n != 2 => Err(OrmError::validation(format!(
                "operator {op} requires exactly two values, got {n}"
            ))),
            Operator::IsNull | Operator::IsNotNull => Ok(()),
            op if !op.is_list() && !op.is_range() && n > 1 => {
                Err(OrmError::validation(format!(
                    "operator {op} cannot compare against a list of {n} values; use IN"
                )))
            }
            _ => Ok(()),
        }
    }

    /// Values bound when compared against a column; NULLs are written inline
    /// and therefore skipped.
    pub fn values(&self) -> OrmResult<Vec<Value>> {
        self.check()?;
        let mut out = Vec::with_capacity(self.value_count());
        if self.op.placeholders() > 0 {
            for d in self.datums().iter().filter(|d| !d.is_null()) {
                out.push(d.to_value()?);
            }
        }
        Ok(out)
    }

    /// Values bound behind caller-written `?` placeholders. Every slot binds,
    /// a NULL scalar included; IN lists bind their non-NULL entries.
    pub(crate) fn write_raw_values(&self, out: &mut Vec<Value>) -> OrmResult<()> {
        self.check()?;
        match self.op {
            Operator::IsNull | Operator::IsNotNull => {}
            op if op.is_list() => {
                for d in self.datums().iter().filter(|d| !d.is_null()) {
                    out.push(d.to_value()?);
                }
            }
            _ => {
                for d in self.datums() {
                    out.push(d.to_value()?);
                }
            }
        }
        Ok(())
    }

    /// Write ` <op> <placeholders>` after a column name.
    pub(crate) fn write_column_rhs(&self, sql: &mut Sql) -> OrmResult<()> {
        self.check()?;
        sql.push_char(' ').push(self.op.as_str());
        if self.op.placeholders() == 0 {
            return Ok(());
        }
        sql.push_char(' ');

        if self.op.is_list() {
            if sql.interpolating() {
                self.write_list_literal(sql.buf_mut())?;
            } else if self.is_null() {
                sql.push("(NULL)");
            } else if self.datums().iter().any(Datum::is_null) {
                // NULL entries stay inline so NOT IN keeps its meaning.
                sql.push_char('(');
                for (i, d) in self.datums().iter().enumerate() {
                    if i > 0 {
                        sql.push_char(',');
                    }
                    write_slot(sql, d)?;
                }
                sql.push_char(')');
            } else {
                sql.push_char('?');
                for d in self.datums().iter().filter(|d| !d.is_null()) {
                    sql.bind(d.to_value()?);
                }
            }
            return Ok(());
        }

        if self.op.is_range() {
            let d = self.datums();
            write_slot(sql, &d[0])?;
            sql.push(" AND ");
            return write_slot(sql, &d[1]);
        }

        match self.first() {
            Some(d) => write_slot(sql, d),
            // Empty list: one placeholder matching nothing.
            None if sql.interpolating() => {
                sql.push("NULL");
                Ok(())
            }
            None => {
                sql.push_char('?');
                Ok(())
            }
        }
    }

    /// Write a single value slot (INSERT VALUES, UPDATE SET).
    pub(crate) fn write_value(&self, sql: &mut Sql) -> OrmResult<()> {
        match self.datums() {
            [d] => write_slot(sql, d),
            other => Err(OrmError::validation(format!(
                "a value slot takes exactly one value, got {}",
                other.len()
            ))),
        }
    }

    /// Literal for placeholder slot `slot` of this argument.
    fn write_slot_literal(&self, slot: usize, out: &mut String) -> OrmResult<()> {
        if self.op.is_list() {
            return self.write_list_literal(out);
        }
        match self.datums().get(slot) {
            Some(d) => d.write_literal(out),
            None => {
                out.push_str("NULL");
                Ok(())
            }
        }
    }

    /// `('x',NULL,'y')`; an empty list becomes `(NULL)`.
    fn write_list_literal(&self, out: &mut String) -> OrmResult<()> {
        let datums = self.datums();
        out.push('(');
        if datums.is_empty() {
            out.push_str("NULL");
        }
        for (i, d) in datums.iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            d.write_literal(out)?;
        }
        out.push(')');
        Ok(())
    }
}

fn write_slot(sql: &mut Sql, d: &Datum) -> OrmResult<()> {
    if d.is_null() {
        sql.push("NULL");
    } else if sql.interpolating() {
        d.write_literal(sql.buf_mut())?;
    } else {
        sql.push_char('?');
        sql.bind(d.to_value()?);
    }
    Ok(())
}

/// An ordered collection of arguments for a raw SQL fragment.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Arguments(Vec<Argument>);

impl Arguments {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, arg: impl Into<Argument>) -> &mut Self {
        self.0.push(arg.into());
        self
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Argument> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[Argument] {
        &self.0
    }

    /// Total number of placeholder slots.
    pub fn placeholder_count(&self) -> usize {
        self.0.iter().map(Argument::placeholder_count).sum()
    }

    /// Flat list of bound values, one per filled placeholder slot.
    pub fn values(&self) -> OrmResult<Vec<Value>> {
        let mut out = Vec::with_capacity(self.0.len());
        for a in &self.0 {
            a.write_raw_values(&mut out)?;
        }
        Ok(out)
    }
}

impl From<Vec<Argument>> for Arguments {
    fn from(args: Vec<Argument>) -> Self {
        Self(args)
    }
}

impl FromIterator<Argument> for Arguments {
    fn from_iter<I: IntoIterator<Item = Argument>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Arguments {
    type Item = &'a Argument;
    type IntoIter = std::slice::Iter<'a, Argument>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl IntoIterator for Arguments {
    type Item = Argument;
    type IntoIter = std::vec::IntoIter<Argument>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Replace every `?` in `sql` with the literal of the next argument slot.
///
/// Placeholders inside quoted strings or back-tick identifiers are left
/// alone. `BETWEEN` arguments fill two placeholders, `IN` lists fill one
/// with a parenthesized list. A count mismatch is a validation error.
///
/// ```ignore
/// let args: Arguments = vec![arg(1), Argument::strings(["a", "b"]).operator(Operator::In)].into();
/// let sql = interpolate("SELECT * FROM x WHERE a = ? AND b IN ?", &args)?;
/// assert_eq!(sql, "SELECT * FROM x WHERE a = 1 AND b IN ('a','b')");
/// ```
pub fn interpolate(sql: &str, args: &Arguments) -> OrmResult<String> {
    let mut out = String::with_capacity(sql.len() + args.len() * 8);
    interpolate_into(&mut out, sql, args.as_slice())?;
    Ok(out)
}

pub(crate) fn interpolate_into(out: &mut String, sql: &str, args: &[Argument]) -> OrmResult<()> {
    for a in args {
        a.check()?;
    }
    let mut slots = args
        .iter()
        .flat_map(|a| (0..a.placeholder_count()).map(move |slot| (a, slot)));

    let mut quote: Option<char> = None;
    let mut escaped = false;
    for c in sql.chars() {
        if let Some(q) = quote {
            out.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' && q != '`' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '\'' | '"' | '`' => {
                quote = Some(c);
                out.push(c);
            }
            '?' => {
                let Some((a, slot)) = slots.next() else {
                    return Err(OrmError::validation(format!(
                        "more placeholders than arguments in '{sql}'"
                    )));
                };
                a.write_slot_literal(slot, out)?;
            }
            c => out.push(c),
        }
    }

    let left = slots.count();
    if left > 0 {
        return Err(OrmError::validation(format!(
            "{left} argument slot(s) left without placeholder in '{sql}'"
        )));
    }
    Ok(())
}
