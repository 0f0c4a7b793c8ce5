//! Formatting and logging options carried by every statement.

use crate::ident::{QUOTE, Quoter};

/// Per-statement formatting and logging configuration.
///
/// A statement owns its own copy. Build one template and clone it into as
/// many statements as needed; nothing is shared between them.
///
/// # Example
/// ```ignore
/// use dbr::{Options, Select};
///
/// let opts = Options::new().with_interpolate(true).with_max_log_sql_length(512);
/// let mut a = Select::new(["a"]).with_options(opts.clone());
/// let mut b = Select::new(["b"]).with_options(opts);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// Identifier quote character. Back-tick by default.
    pub quote: char,
    /// Inline argument literals instead of emitting `?` placeholders.
    pub interpolate: bool,
    /// Emit the compiled SQL on the `dbr.sql` tracing target.
    pub log_sql: bool,
    /// Truncate logged SQL to this many bytes. `None` logs it in full.
    pub max_log_sql_length: Option<usize>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            quote: QUOTE,
            interpolate: false,
            log_sql: true,
            max_log_sql_length: Some(200),
        }
    }
}

impl Options {
    /// Create options with defaults (back-tick quoting, placeholders, SQL logging on).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the identifier quote character.
    pub fn with_quote(mut self, quote: char) -> Self {
        self.quote = quote;
        self
    }

    /// Render arguments inline as literals.
    ///
    /// Compiled statements then return an empty value list.
    pub fn with_interpolate(mut self, interpolate: bool) -> Self {
        self.interpolate = interpolate;
        self
    }

    /// Enable or disable compiled SQL logging.
    pub fn with_log_sql(mut self, log_sql: bool) -> Self {
        self.log_sql = log_sql;
        self
    }

    /// Set maximum SQL length to log.
    pub fn with_max_log_sql_length(mut self, len: usize) -> Self {
        self.max_log_sql_length = Some(len);
        self
    }

    /// Log SQL without truncation.
    pub fn no_truncate(mut self) -> Self {
        self.max_log_sql_length = None;
        self
    }

    pub fn quoter(&self) -> Quoter {
        Quoter::new(self.quote)
    }

    pub(crate) fn truncate_sql<'a>(&self, sql: &'a str) -> &'a str {
        match self.max_log_sql_length {
            Some(max) => truncate_sql_bytes(sql, max),
            None => sql,
        }
    }
}

/// Truncate to at most `max_bytes`, backing off to a char boundary.
pub(crate) fn truncate_sql_bytes(sql: &str, max_bytes: usize) -> &str {
    if sql.len() <= max_bytes {
        return sql;
    }
    let mut end = max_bytes;
    while end > 0 && !sql.is_char_boundary(end) {
        end -= 1;
    }
    &sql[..end]
}
