//! Compile buffer shared by all statement builders.
//!
//! `Sql` accumulates SQL text and the bound values in the same pass, so the
//! value list always lines up with the emitted `?` placeholders. In
//! interpolation mode, values are written inline as literals and nothing is
//! bound.

use crate::argument::Argument;
use crate::error::OrmResult;
use crate::ident::{Alias, Quoter};
use crate::options::Options;
use crate::value::Value;

#[derive(Debug)]
pub(crate) struct Sql {
    buf: String,
    values: Vec<Value>,
    quoter: Quoter,
    interpolate: bool,
}

impl Sql {
    pub(crate) fn new(opts: &Options) -> Self {
        Self {
            buf: String::with_capacity(128),
            values: Vec::new(),
            quoter: opts.quoter(),
            interpolate: opts.interpolate,
        }
    }

    pub(crate) fn interpolating(&self) -> bool {
        self.interpolate
    }

    pub(crate) fn quoter(&self) -> Quoter {
        self.quoter
    }

    /// Append raw SQL.
    pub(crate) fn push(&mut self, sql: &str) -> &mut Self {
        self.buf.push_str(sql);
        self
    }

    pub(crate) fn push_char(&mut self, c: char) -> &mut Self {
        self.buf.push(c);
        self
    }

    /// Append a quoted identifier.
    pub(crate) fn push_ident(&mut self, name: &str) -> OrmResult<&mut Self> {
        self.quoter.write_quoted(&mut self.buf, name)?;
        Ok(self)
    }

    /// Append `` `a`,`b` `` (no space after the comma).
    pub(crate) fn push_ident_list<S: AsRef<str>>(&mut self, names: &[S]) -> OrmResult<&mut Self> {
        for (i, name) in names.iter().enumerate() {
            if i > 0 {
                self.buf.push(',');
            }
            self.quoter.write_quoted(&mut self.buf, name.as_ref())?;
        }
        Ok(self)
    }

    pub(crate) fn push_alias(&mut self, alias: &Alias) -> OrmResult<&mut Self> {
        alias.write_sql(&mut self.buf, &self.quoter)?;
        Ok(self)
    }

    /// Bind a value behind an already written placeholder.
    pub(crate) fn bind(&mut self, value: Value) -> &mut Self {
        self.values.push(value);
        self
    }

    /// Append a raw fragment with its own `?` placeholders.
    pub(crate) fn push_raw(&mut self, sql: &str, args: &[Argument]) -> OrmResult<&mut Self> {
        if self.interpolate {
            crate::argument::interpolate_into(&mut self.buf, sql, args)?;
        } else {
            self.buf.push_str(sql);
            for arg in args {
                arg.write_raw_values(&mut self.values)?;
            }
        }
        Ok(self)
    }

    /// Raw buffer access for literal writers.
    pub(crate) fn buf_mut(&mut self) -> &mut String {
        &mut self.buf
    }

    pub(crate) fn finish(self) -> (String, Vec<Value>) {
        (self.buf, self.values)
    }
}
