//! Statement listeners: callbacks that mutate a statement right before it compiles.
//!
//! Listeners fire in registration order. A callback may stop propagation for
//! the current compile pass by setting the statement's `propagation_stopped`
//! flag; the flag is reset at the start of every pass. Listeners marked
//! [`Listen::once`] are removed after they fire.
//!
//! Listeners mutate the statement they are attached to, so compiling the same
//! statement twice applies their effects twice.
//!
//! # Example
//! ```ignore
//! use dbr::{Listen, Select};
//!
//! let mut s = Select::new(["a", "b"]);
//! s.from("tableA");
//! s.listeners.add(Listen::before_to_sql("order", |s: &mut Select| {
//!     s.order_by_desc(["col1"]);
//! }));
//! ```

use std::fmt;
use std::mem;
use std::sync::Arc;

use tracing::{debug, trace};

use crate::error::{OrmError, OrmResult};

/// Lifecycle events a listener can bind to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventType {
    /// Fired at the start of every compile.
    BeforeToSql,
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventType::BeforeToSql => f.write_str("before_to_sql"),
        }
    }
}

/// Listener callback.
pub type ListenFn<S> = Arc<dyn Fn(&mut S) + Send + Sync>;

/// A named listener.
pub struct Listen<S> {
    pub name: String,
    /// Event to fire on. A listener without an event fails the compile.
    pub event_type: Option<EventType>,
    /// Remove after the first invocation.
    pub once: bool,
    callback: ListenFn<S>,
}

impl<S> Listen<S> {
    /// Listener without an event type; set one with [`Listen::on`].
    pub fn new<F>(name: impl Into<String>, callback: F) -> Self
    where
        F: Fn(&mut S) + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            event_type: None,
            once: false,
            callback: Arc::new(callback),
        }
    }

    /// Listener fired before every compile.
    pub fn before_to_sql<F>(name: impl Into<String>, callback: F) -> Self
    where
        F: Fn(&mut S) + Send + Sync + 'static,
    {
        Self::new(name, callback).on(EventType::BeforeToSql)
    }

    pub fn on(mut self, event: EventType) -> Self {
        self.event_type = Some(event);
        self
    }

    /// Fire at most once.
    pub fn once(mut self) -> Self {
        self.once = true;
        self
    }
}

impl<S> Clone for Listen<S> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            event_type: self.event_type,
            once: self.once,
            callback: Arc::clone(&self.callback),
        }
    }
}

impl<S> fmt::Debug for Listen<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listen")
            .field("name", &self.name)
            .field("event_type", &self.event_type)
            .field("once", &self.once)
            .finish_non_exhaustive()
    }
}

/// Ordered listener registry of one statement.
pub struct Listeners<S> {
    list: Vec<Listen<S>>,
    expected: Vec<EventType>,
}

impl<S> Default for Listeners<S> {
    fn default() -> Self {
        Self {
            list: Vec::new(),
            expected: Vec::new(),
        }
    }
}

impl<S> Clone for Listeners<S> {
    fn clone(&self) -> Self {
        Self {
            list: self.list.clone(),
            expected: self.expected.clone(),
        }
    }
}

impl<S> fmt::Debug for Listeners<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listeners")
            .field("list", &self.list)
            .field("expected", &self.expected)
            .finish()
    }
}

impl<S> fmt::Display for Listeners<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, l) in self.list.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            f.write_str(&l.name)?;
        }
        Ok(())
    }
}

impl<S> Listeners<S> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a listener.
    pub fn add(&mut self, listen: Listen<S>) -> &mut Self {
        self.list.push(listen);
        self
    }

    /// Append several listeners, keeping their order.
    pub fn extend(&mut self, listens: impl IntoIterator<Item = Listen<S>>) -> &mut Self {
        self.list.extend(listens);
        self
    }

    /// Make `event` mandatory: dispatching it with no listener bound to it
    /// is an empty error.
    pub fn expect(&mut self, event: EventType) -> &mut Self {
        if !self.expected.contains(&event) {
            self.expected.push(event);
        }
        self
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.list.iter().map(|l| l.name.as_str())
    }

    fn check(&self, event: EventType) -> OrmResult<()> {
        if let Some(l) = self.list.iter().find(|l| l.event_type.is_none()) {
            return Err(OrmError::empty(format!(
                "listener '{}' has no event type",
                l.name
            )));
        }
        if self.expected.contains(&event)
            && !self.list.iter().any(|l| l.event_type == Some(event))
        {
            return Err(OrmError::empty(format!(
                "no listener registered for mandatory event {event}"
            )));
        }
        Ok(())
    }
}

/// Statements that carry a listener registry.
pub(crate) trait Listenable: Sized {
    const NAME: &'static str;

    fn listeners_mut(&mut self) -> &mut Listeners<Self>;

    fn propagation_stopped(&self) -> bool;

    fn set_propagation_stopped(&mut self, stopped: bool);
}

/// Fire every listener bound to `event` on `stmt`.
pub(crate) fn dispatch<S: Listenable>(stmt: &mut S, event: EventType) -> OrmResult<()> {
    let mut registry = mem::take(stmt.listeners_mut());
    if let Err(e) = registry.check(event) {
        *stmt.listeners_mut() = registry;
        return Err(e);
    }

    stmt.set_propagation_stopped(false);
    let mut fired_once = Vec::new();
    for (i, l) in registry.list.iter().enumerate() {
        if l.event_type != Some(event) {
            continue;
        }
        trace!(target: "dbr.sql", statement = S::NAME, listener = %l.name, %event, "dispatch listener");
        (l.callback)(stmt);
        if l.once {
            fired_once.push(i);
        }
        if stmt.propagation_stopped() {
            debug!(target: "dbr.sql", statement = S::NAME, listener = %l.name, %event, "propagation stopped");
            break;
        }
    }

    if !fired_once.is_empty() {
        let mut i = 0;
        registry.list.retain(|_| {
            let keep = !fired_once.contains(&i);
            i += 1;
            keep
        });
    }

    // Listeners registered by a callback during this pass.
    let added = mem::take(stmt.listeners_mut());
    registry.list.extend(added.list);
    for e in added.expected {
        registry.expect(e);
    }
    *stmt.listeners_mut() = registry;
    Ok(())
}
