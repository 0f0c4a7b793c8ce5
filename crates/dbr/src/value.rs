//! Bound values handed to the execution collaborator.
//!
//! A compiled statement produces a flat `Vec<Value>` whose positions match the
//! `?` placeholders in its SQL text. Nullable inputs are modelled as `Option<T>`;
//! `None` converts to [`Value::Null`].

use bytes::Bytes;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{OrmError, OrmResult};

/// Format used when a timestamp is inlined as a literal.
pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A single bound value.
///
/// The JSON form is untagged: `null`, numbers, booleans and strings map to the
/// matching variant. [`Value::Time`] encodes as an RFC 3339 string and decodes
/// back as [`Value::String`]; callers that need the timestamp parse it again.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// SQL NULL.
    Null,
    Int(i64),
    Float(f64),
    Bool(bool),
    String(String),
    /// Raw bytes (BLOB / VARBINARY).
    Bytes(Bytes),
    /// Timestamp, always UTC.
    Time(DateTime<Utc>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Render the value as an inline SQL literal.
    ///
    /// Strings are single-quoted with MySQL backslash escapes. Byte values must
    /// be valid UTF-8 to be inlined.
    pub fn to_literal(&self) -> OrmResult<String> {
        let mut out = String::new();
        self.write_literal(&mut out)?;
        Ok(out)
    }

    pub(crate) fn write_literal(&self, out: &mut String) -> OrmResult<()> {
        match self {
            Value::Null => out.push_str("NULL"),
            Value::Int(i) => out.push_str(&i.to_string()),
            Value::Float(f) if !f.is_finite() => {
                return Err(OrmError::validation(format!(
                    "cannot inline non-finite float {f}"
                )));
            }
            Value::Float(f) => out.push_str(&f.to_string()),
            Value::Bool(b) => out.push(if *b { '1' } else { '0' }),
            Value::String(s) => escape_string(out, s),
            Value::Bytes(b) => escape_string(out, utf8(b)?),
            Value::Time(t) => {
                out.push('\'');
                out.push_str(&t.format(TIME_FORMAT).to_string());
                out.push('\'');
            }
        }
        Ok(())
    }
}

/// Validate that raw bytes are UTF-8 text.
pub(crate) fn utf8(b: &[u8]) -> OrmResult<&str> {
    std::str::from_utf8(b).map_err(|e| {
        OrmError::validation(format!(
            "invalid UTF-8 in string value at byte {}",
            e.valid_up_to()
        ))
    })
}

/// Write `s` as a single-quoted MySQL string literal.
pub(crate) fn escape_string(out: &mut String, s: &str) {
    out.reserve(s.len() + 2);
    out.push('\'');
    for c in s.chars() {
        match c {
            '\0' => out.push_str("\\0"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '"' => out.push_str("\\\""),
            '\x1a' => out.push_str("\\Z"),
            c => out.push(c),
        }
    }
    out.push('\'');
}

/// Conversion into a bound [`Value`].
pub trait ToValue {
    fn to_value(self) -> Value;
}

impl ToValue for Value {
    fn to_value(self) -> Value {
        self
    }
}

macro_rules! int_to_value {
    ($($t:ty),*) => {
        $(impl ToValue for $t {
            fn to_value(self) -> Value {
                Value::Int(i64::from(self))
            }
        })*
    };
}

int_to_value!(i8, i16, i32, i64, u8, u16, u32);

impl ToValue for f64 {
    fn to_value(self) -> Value {
        Value::Float(self)
    }
}

impl ToValue for f32 {
    fn to_value(self) -> Value {
        Value::Float(f64::from(self))
    }
}

impl ToValue for bool {
    fn to_value(self) -> Value {
        Value::Bool(self)
    }
}

impl ToValue for String {
    fn to_value(self) -> Value {
        Value::String(self)
    }
}

impl ToValue for &str {
    fn to_value(self) -> Value {
        Value::String(self.to_string())
    }
}

impl ToValue for &String {
    fn to_value(self) -> Value {
        Value::String(self.clone())
    }
}

impl ToValue for Bytes {
    fn to_value(self) -> Value {
        Value::Bytes(self)
    }
}

impl ToValue for Vec<u8> {
    fn to_value(self) -> Value {
        Value::Bytes(Bytes::from(self))
    }
}

impl ToValue for &[u8] {
    fn to_value(self) -> Value {
        Value::Bytes(Bytes::copy_from_slice(self))
    }
}

impl ToValue for DateTime<Utc> {
    fn to_value(self) -> Value {
        Value::Time(self)
    }
}

impl ToValue for NaiveDateTime {
    fn to_value(self) -> Value {
        Value::Time(self.and_utc())
    }
}

impl<T: ToValue> ToValue for Option<T> {
    fn to_value(self) -> Value {
        match self {
            Some(v) => v.to_value(),
            None => Value::Null,
        }
    }
}

macro_rules! from_to_value {
    ($($t:ty),*) => {
        $(impl From<$t> for Value {
            fn from(v: $t) -> Self {
                v.to_value()
            }
        })*
    };
}

from_to_value!(
    i8, i16, i32, i64, u8, u16, u32, f32, f64, bool, String, &str, Bytes, Vec<u8>,
    DateTime<Utc>, NaiveDateTime
);

impl<T: ToValue> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.to_value()
    }
}
