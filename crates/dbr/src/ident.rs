//! Identifier handling: parsing, validation, quoting and aliasing.
//!
//! This module provides [`Ident`] which represents a SQL identifier (schema/table/column),
//! supporting dotted notation and back-tick quoted parts, and [`Quoter`] which renders
//! identifiers with the configured quote character.
//!
//! - Plain parts are validated against: `[A-Za-z0-9_$]+`
//! - Quoted parts allow any characters except NUL and escape the quote as a doubled quote
//! - A trailing `*` part is allowed (`p1.*`) and rendered unquoted
//!
//! # Example
//! ```ignore
//! use dbr::{Ident, Quoter};
//!
//! let c = Ident::parse("t3.name")?;
//! assert_eq!(Quoter::default().ident(&c), "`t3`.`name`");
//! # Ok::<(), dbr::OrmError>(())
//! ```

use crate::error::{OrmError, OrmResult};

/// Default identifier quote character (MySQL).
pub const QUOTE: char = '`';

/// A part of a SQL identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentPart {
    /// Plain part: must match `[A-Za-z0-9_$]+`.
    Plain(String),
    /// Quoted part: allows any characters except NUL.
    Quoted(String),
    /// `*` wildcard, only valid as the last part.
    Star,
}

impl IdentPart {
    fn name(&self) -> &str {
        match self {
            IdentPart::Plain(s) | IdentPart::Quoted(s) => s,
            IdentPart::Star => "*",
        }
    }
}

/// A SQL identifier (column, table, or schema name).
///
/// Supports dotted notation (e.g., `schema.table.column`) and quoted parts
/// (e.g., `` `catalog product`.`sku` ``).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ident {
    pub parts: Vec<IdentPart>,
}

fn is_plain_char(c: char) -> bool {
    c == '_' || c == '$' || c.is_ascii_alphanumeric()
}

impl Ident {
    /// Parse an identifier string, supporting dotted and quoted forms.
    ///
    /// - Dotted: `schema.table.column`
    /// - Quoted: `` `schema`.`table` ``
    /// - Mixed: ``store.`website id` ``
    pub fn parse(s: &str) -> OrmResult<Self> {
        Self::parse_with(s, QUOTE)
    }

    /// Parse using a custom quote character.
    pub fn parse_with(s: &str, quote: char) -> OrmResult<Self> {
        if s.is_empty() {
            return Err(OrmError::validation("Identifier cannot be empty"));
        }
        if s.contains('\0') {
            return Err(OrmError::validation(
                "Identifier cannot contain NUL character",
            ));
        }

        let mut parts = Vec::new();
        let mut chars = s.chars().peekable();

        while chars.peek().is_some() {
            if !parts.is_empty() {
                if parts.last() == Some(&IdentPart::Star) {
                    return Err(OrmError::validation(format!(
                        "'*' must be the last part of identifier '{s}'"
                    )));
                }
                match chars.next() {
                    Some('.') => {
                        if chars.peek().is_none() {
                            return Err(OrmError::validation(format!(
                                "Trailing '.' in identifier '{s}'"
                            )));
                        }
                    }
                    Some(c) => {
                        return Err(OrmError::validation(format!(
                            "Expected '.' between identifier parts of '{s}', got '{c}'"
                        )));
                    }
                    None => break,
                }
            }

            if chars.peek() == Some(&quote) {
                chars.next();
                let mut name = String::new();
                loop {
                    match chars.next() {
                        Some(c) if c == quote => {
                            // Escaped quote: doubled
                            if chars.peek() == Some(&quote) {
                                chars.next();
                                name.push(quote);
                            } else {
                                break;
                            }
                        }
                        Some(c) => name.push(c),
                        None => {
                            return Err(OrmError::validation(format!(
                                "Unclosed quoted identifier '{s}'"
                            )));
                        }
                    }
                }
                if name.is_empty() {
                    return Err(OrmError::validation("Empty quoted identifier"));
                }
                parts.push(IdentPart::Quoted(name));
                continue;
            }

            if chars.peek() == Some(&'*') {
                chars.next();
                parts.push(IdentPart::Star);
                continue;
            }

            let mut name = String::new();
            while let Some(&c) = chars.peek() {
                if c == '.' {
                    break;
                }
                if !is_plain_char(c) {
                    return Err(OrmError::validation(format!(
                        "Invalid character '{c}' in identifier '{s}'"
                    )));
                }
                name.push(c);
                chars.next();
            }
            if name.is_empty() {
                return Err(OrmError::validation(format!(
                    "Empty identifier segment in '{s}'"
                )));
            }
            parts.push(IdentPart::Plain(name));
        }

        if parts.is_empty() {
            return Err(OrmError::validation("Empty identifier"));
        }

        Ok(Self { parts })
    }

    /// Whether `s` parses as an identifier.
    pub fn is_valid(s: &str) -> bool {
        Self::parse(s).is_ok()
    }

    /// Render the identifier with back-tick quotes.
    pub fn to_sql(&self) -> String {
        let mut out = String::new();
        self.write_sql(&mut out, QUOTE);
        out
    }

    pub(crate) fn write_sql(&self, out: &mut String, quote: char) {
        for (i, part) in self.parts.iter().enumerate() {
            if i > 0 {
                out.push('.');
            }
            if part == &IdentPart::Star {
                out.push('*');
                continue;
            }
            out.push(quote);
            for ch in part.name().chars() {
                if ch == quote {
                    out.push(quote);
                }
                out.push(ch);
            }
            out.push(quote);
        }
    }
}

/// Renders identifiers and aliases with a fixed quote character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quoter {
    quote: char,
}

impl Default for Quoter {
    fn default() -> Self {
        Self { quote: QUOTE }
    }
}

impl Quoter {
    /// Create a quoter for a custom quote character, e.g. `"` for ANSI SQL.
    pub fn new(quote: char) -> Self {
        Self { quote }
    }

    /// The quote character.
    pub fn quote_char(&self) -> char {
        self.quote
    }

    /// Render an already parsed identifier.
    pub fn ident(&self, ident: &Ident) -> String {
        let mut out = String::new();
        ident.write_sql(&mut out, self.quote);
        out
    }

    /// Parse and quote an identifier: `t3.name` becomes `` `t3`.`name` ``.
    ///
    /// Parts that are already quoted are not quoted twice.
    pub fn quote(&self, name: &str) -> OrmResult<String> {
        let mut out = String::new();
        self.write_quoted(&mut out, name)?;
        Ok(out)
    }

    pub(crate) fn write_quoted(&self, out: &mut String, name: &str) -> OrmResult<()> {
        Ident::parse_with(name, self.quote)?.write_sql(out, self.quote);
        Ok(())
    }

    /// Quote a name together with its alias: `` `name` AS `alias` ``.
    pub fn quote_as(&self, name: &str, alias: &str) -> OrmResult<String> {
        let mut out = self.quote(name)?;
        out.push_str(" AS ");
        self.write_quoted(&mut out, alias)?;
        Ok(out)
    }

    /// Alias an expression that is emitted verbatim: `` SUM(price) AS `total` ``.
    pub fn expr_alias(&self, expr: &str, alias: &str) -> OrmResult<String> {
        let mut out = String::with_capacity(expr.len() + alias.len() + 6);
        out.push_str(expr);
        out.push_str(" AS ");
        self.write_quoted(&mut out, alias)?;
        Ok(out)
    }
}

/// A table name with an optional alias, as used by FROM and JOIN.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alias {
    pub name: String,
    pub alias: Option<String>,
}

/// Create an aliased table reference: `` `name` AS `alias` ``.
pub fn alias(name: impl Into<String>, alias: impl Into<String>) -> Alias {
    Alias {
        name: name.into(),
        alias: Some(alias.into()),
    }
}

impl Alias {
    /// A table reference without alias.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            alias: None,
        }
    }

    /// Set the alias.
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub(crate) fn write_sql(&self, out: &mut String, quoter: &Quoter) -> OrmResult<()> {
        quoter.write_quoted(out, &self.name)?;
        if let Some(alias) = &self.alias {
            out.push_str(" AS ");
            quoter.write_quoted(out, alias)?;
        }
        Ok(())
    }
}

impl From<&str> for Alias {
    fn from(name: &str) -> Self {
        Alias::new(name)
    }
}

impl From<String> for Alias {
    fn from(name: String) -> Self {
        Alias::new(name)
    }
}

/// Split comma separated column lists and trim every entry.
///
/// `["a , b", "c"]` becomes `["a", "b", "c"]`; empty entries are dropped.
pub fn split_columns<I, S>(columns: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out = Vec::new();
    for col in columns {
        out.extend(
            col.as_ref()
                .split(',')
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(str::to_string),
        );
    }
    out
}
