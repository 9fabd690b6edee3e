//! Structured logging context for key-value fields
//!
//! `FieldValue` is the closed set of value kinds a field may hold, and
//! `LogContext` accumulates named fields for one log entry. Field names are
//! unique: adding a field under an existing name replaces the old value.

use super::entry::ERROR_FIELD;
use super::stack_error::{CallSite, ErrorValue, StackError};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet};
use std::error::Error;
use std::fmt;

/// Value type for structured logging fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    String(String),
    Int(i64),
    UInt(u64),
    Float(f64),
    Bool(bool),
    Error(ErrorValue),
    Null,
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::String(s) => write!(f, "{}", s),
            FieldValue::Int(i) => write!(f, "{}", i),
            FieldValue::UInt(u) => write!(f, "{}", u),
            FieldValue::Float(fl) => write!(f, "{}", fl),
            FieldValue::Bool(b) => write!(f, "{}", b),
            FieldValue::Error(e) => write!(f, "{}", e),
            FieldValue::Null => write!(f, "null"),
        }
    }
}

impl FieldValue {
    /// Field value for an error, keeping its call site when it has one
    pub fn from_error(err: &(dyn Error + 'static)) -> Self {
        FieldValue::Error(ErrorValue::from_error(err))
    }

    /// Convert to serde_json::Value for JSON serialization
    ///
    /// Errors become their message; the call site is emitted separately by
    /// the formatter.
    #[must_use]
    pub fn to_json_value(&self) -> serde_json::Value {
        match self {
            FieldValue::String(s) => serde_json::Value::String(s.clone()),
            FieldValue::Int(i) => serde_json::Value::Number((*i).into()),
            FieldValue::UInt(u) => serde_json::Value::Number((*u).into()),
            FieldValue::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            FieldValue::Bool(b) => serde_json::Value::Bool(*b),
            FieldValue::Error(e) => serde_json::Value::String(e.message.clone()),
            FieldValue::Null => serde_json::Value::Null,
        }
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::String(s)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::String(s.to_string())
    }
}

impl From<&String> for FieldValue {
    fn from(s: &String) -> Self {
        FieldValue::String(s.clone())
    }
}

impl From<i64> for FieldValue {
    fn from(i: i64) -> Self {
        FieldValue::Int(i)
    }
}

impl From<i32> for FieldValue {
    fn from(i: i32) -> Self {
        FieldValue::Int(i as i64)
    }
}

impl From<u64> for FieldValue {
    fn from(u: u64) -> Self {
        FieldValue::UInt(u)
    }
}

impl From<u32> for FieldValue {
    fn from(u: u32) -> Self {
        FieldValue::UInt(u as u64)
    }
}

impl From<usize> for FieldValue {
    fn from(u: usize) -> Self {
        FieldValue::UInt(u as u64)
    }
}

impl From<f64> for FieldValue {
    fn from(f: f64) -> Self {
        FieldValue::Float(f)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Bool(b)
    }
}

impl From<ErrorValue> for FieldValue {
    fn from(e: ErrorValue) -> Self {
        FieldValue::Error(e)
    }
}

impl From<StackError> for FieldValue {
    fn from(e: StackError) -> Self {
        FieldValue::from_error(&e)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(FieldValue::Null)
    }
}

/// Context for structured logging with key-value fields
///
/// Fields iterate in key order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LogContext {
    fields: BTreeMap<String, FieldValue>,
}

impl LogContext {
    /// Create a new empty log context
    pub fn new() -> Self {
        Self {
            fields: BTreeMap::new(),
        }
    }

    /// Add a field to the context
    pub fn with_field<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<FieldValue>,
    {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Add a field to the context (mutable version)
    pub fn add_field<K, V>(&mut self, key: K, value: V)
    where
        K: Into<String>,
        V: Into<FieldValue>,
    {
        self.fields.insert(key.into(), value.into());
    }

    /// Get a single field
    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }

    /// Get all fields
    pub fn fields(&self) -> &BTreeMap<String, FieldValue> {
        &self.fields
    }

    /// Check if context has any fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Fields in key order, each paired with the key its call site renders
    /// under
    ///
    /// The call site of the `err` field renders as `stacktrace`; that of any
    /// other error field `k` as `k.stacktrace`. A field whose own name equals
    /// one of those keys is renamed to `fields.<name>`, so no value hides
    /// another.
    pub(crate) fn rendered_fields(&self) -> Vec<RenderedField<'_>> {
        let generated: BTreeSet<String> = self
            .fields
            .iter()
            .filter_map(|(key, value)| match value {
                FieldValue::Error(ErrorValue {
                    call_site: Some(_), ..
                }) => Some(call_site_key(key)),
                _ => None,
            })
            .collect();

        self.fields
            .iter()
            .map(|(key, value)| {
                let call_site = match value {
                    FieldValue::Error(e) => e.call_site.as_ref().map(|site| (call_site_key(key), site)),
                    _ => None,
                };
                let key = if generated.contains(key.as_str()) {
                    Cow::Owned(format!("fields.{}", key))
                } else {
                    Cow::Borrowed(key.as_str())
                };
                RenderedField {
                    key,
                    value,
                    call_site,
                }
            })
            .collect()
    }

    /// Format fields as key=value pairs
    ///
    /// String values are quoted when they are empty or contain anything
    /// outside `A-Za-z0-9-._/@^+`; control characters are escaped, so the
    /// result is always a single line. An error carrying a call site adds a
    /// `stacktrace="file:function:line"` pair after it.
    pub fn format_fields(&self) -> String {
        let mut parts = Vec::with_capacity(self.fields.len());
        for field in self.rendered_fields() {
            let key = escape_controls(&field.key);
            match field.value {
                FieldValue::String(s) => parts.push(format!("{}={}", key, quote_if_needed(s))),
                FieldValue::Error(e) => parts.push(format!("{}={}", key, quote_if_needed(&e.message))),
                other => parts.push(format!("{}={}", key, other)),
            }
            if let Some((site_key, site)) = field.call_site {
                parts.push(format!(
                    "{}={}",
                    escape_controls(&site_key),
                    quote(&site.to_string())
                ));
            }
        }
        parts.join(" ")
    }
}

/// A field as formatters write it
pub(crate) struct RenderedField<'a> {
    pub key: Cow<'a, str>,
    pub value: &'a FieldValue,
    pub call_site: Option<(String, &'a CallSite)>,
}

fn call_site_key(field: &str) -> String {
    if field == ERROR_FIELD {
        "stacktrace".to_string()
    } else {
        format!("{}.stacktrace", field)
    }
}

impl fmt::Display for LogContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_fields())
    }
}

impl<K: Into<String>, V: Into<FieldValue>> FromIterator<(K, V)> for LogContext {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut ctx = LogContext::new();
        ctx.extend(iter);
        ctx
    }
}

impl<K: Into<String>, V: Into<FieldValue>> Extend<(K, V)> for LogContext {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.add_field(key, value);
        }
    }
}

impl IntoIterator for LogContext {
    type Item = (String, FieldValue);
    type IntoIter = std::collections::btree_map::IntoIter<String, FieldValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}

fn needs_quoting(value: &str) -> bool {
    value.is_empty()
        || !value.chars().all(|c| {
            c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '_' | '/' | '@' | '^' | '+')
        })
}

fn push_escaped(out: &mut String, c: char) {
    match c {
        '\n' => out.push_str("\\n"),
        '\r' => out.push_str("\\r"),
        '\t' => out.push_str("\\t"),
        c if c.is_control() => out.extend(c.escape_unicode()),
        c => out.push(c),
    }
}

/// Escape control characters, leaving everything else as is
pub(crate) fn escape_controls(value: &str) -> Cow<'_, str> {
    if !value.chars().any(char::is_control) {
        return Cow::Borrowed(value);
    }
    let mut out = String::with_capacity(value.len() + 4);
    for c in value.chars() {
        push_escaped(&mut out, c);
    }
    Cow::Owned(out)
}

pub(crate) fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            c => push_escaped(&mut out, c),
        }
    }
    out.push('"');
    out
}

pub(crate) fn quote_if_needed(value: &str) -> String {
    if needs_quoting(value) {
        quote(value)
    } else {
        value.to_string()
    }
}
