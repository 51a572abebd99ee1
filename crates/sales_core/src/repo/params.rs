//! Named, typed query parameters.
//!
//! # Responsibility
//! - Turn model values into SQLite values bound by name (`:name`).
//!
//! # Invariants
//! - Every bound value becomes one parameter; `None` binds as `NULL`
//!   rather than dropping the parameter.
//! - Values never reach SQL text; callers pass `as_named()` to rusqlite.
//! - Text is bound verbatim: no quote rewriting or other escaping.

use chrono::NaiveDateTime;
use rusqlite::types::{ToSql, Value};

/// Text layout for stored timestamps; readable by rusqlite's chrono support.
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// Ordered set of named parameters for one statement.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NamedParams {
    entries: Vec<(&'static str, Value)>,
}

impl NamedParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn integer(self, name: &'static str, value: i64) -> Self {
        self.bind(name, Value::Integer(value))
    }

    pub fn real(self, name: &'static str, value: f64) -> Self {
        self.bind(name, Value::Real(value))
    }

    pub fn text(self, name: &'static str, value: &str) -> Self {
        self.bind(name, Value::Text(value.to_owned()))
    }

    pub fn opt_text(self, name: &'static str, value: Option<&str>) -> Self {
        let value = match value {
            Some(text) => Value::Text(text.to_owned()),
            None => Value::Null,
        };
        self.bind(name, value)
    }

    pub fn datetime(self, name: &'static str, value: NaiveDateTime) -> Self {
        self.bind(name, Value::Text(format_datetime(value)))
    }

    pub fn opt_datetime(self, name: &'static str, value: Option<NaiveDateTime>) -> Self {
        let value = match value {
            Some(timestamp) => Value::Text(format_datetime(timestamp)),
            None => Value::Null,
        };
        self.bind(name, value)
    }

    /// Returns the value bound to `name`, if any.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(current, _)| *current == name)
            .map(|(_, value)| value)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Borrows the parameters in the shape rusqlite binds by name.
    pub fn as_named(&self) -> Vec<(&str, &dyn ToSql)> {
        self.entries
            .iter()
            .map(|(name, value)| (*name, value as &dyn ToSql))
            .collect()
    }

    fn bind(mut self, name: &'static str, value: Value) -> Self {
        debug_assert!(name.starts_with(':'), "parameter `{name}` must start with ':'");
        // Rebinding a name replaces the earlier value.
        match self.entries.iter_mut().find(|(current, _)| *current == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
        self
    }
}

fn format_datetime(value: NaiveDateTime) -> String {
    value.format(DATETIME_FORMAT).to_string()
}
