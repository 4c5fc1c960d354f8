//! Flat key/value form of a task, for transport and persistence layers.
//!
//! A [`TaskRecord`] maps field names to [`FieldValue`]s. Tasks always write
//! dates and timestamps as ISO-8601 text, but reading accepts either text or
//! already-typed values, and missing optional keys fall back to defaults so
//! older records keep loading.

use crate::error::{TaskError, TaskResult};
use crate::models::{Priority, Recurrence, Status, Task, TaskBuilder};
use crate::validators;
use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

pub const KEY_ID: &str = "id";
pub const KEY_TITLE: &str = "title";
pub const KEY_STATUS: &str = "status";
pub const KEY_CREATED: &str = "created_timestamp";
pub const KEY_COMPLETED: &str = "completed_timestamp";
pub const KEY_PRIORITY: &str = "priority";
pub const KEY_CATEGORY: &str = "category";
pub const KEY_DUE_DATE: &str = "due_date";
pub const KEY_RECURRENCE: &str = "recurrence";
pub const KEY_PARENT: &str = "parent_recurrence_id";

/// Every key a serialized task carries, in declaration order.
pub const RECORD_KEYS: [&str; 10] = [
    KEY_ID,
    KEY_TITLE,
    KEY_STATUS,
    KEY_CREATED,
    KEY_COMPLETED,
    KEY_PRIORITY,
    KEY_CATEGORY,
    KEY_DUE_DATE,
    KEY_RECURRENCE,
    KEY_PARENT,
];

/// Serialized task.
pub type TaskRecord = BTreeMap<String, FieldValue>;

/// A single record value.
///
/// Serializes untagged (strings, ISO dates, or `null`). Deserializing from
/// JSON only ever produces `Text` or `Null`; typed variants are for callers
/// that build records in code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Null,
    Text(String),
    Date(NaiveDate),
    DateTime(DateTime<Utc>),
}

impl FieldValue {
    fn kind(&self) -> &'static str {
        match self {
            FieldValue::Null => "null",
            FieldValue::Text(_) => "text",
            FieldValue::Date(_) => "date",
            FieldValue::DateTime(_) => "datetime",
        }
    }
}

impl<'de> Deserialize<'de> for FieldValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(Option::<String>::deserialize(deserializer)?
            .map(FieldValue::Text)
            .unwrap_or(FieldValue::Null))
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<NaiveDate> for FieldValue {
    fn from(d: NaiveDate) -> Self {
        FieldValue::Date(d)
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(dt: DateTime<Utc>) -> Self {
        FieldValue::DateTime(dt)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(FieldValue::Null)
    }
}

/// Render a timestamp the way records store it (RFC 3339, microseconds, `Z`).
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Parse an ISO-8601 timestamp. Offset-less values are taken as UTC.
pub fn parse_timestamp(text: &str) -> TaskResult<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Ok(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .map(|naive| naive.and_utc())
        .ok_or_else(|| TaskError::invalid_format(format!("Invalid timestamp '{}'", text)))
}

pub(crate) fn text_field<'a>(record: &'a TaskRecord, key: &str) -> TaskResult<Option<&'a str>> {
    match record.get(key) {
        None | Some(FieldValue::Null) => Ok(None),
        Some(FieldValue::Text(s)) => Ok(Some(s.as_str())),
        Some(other) => Err(TaskError::type_mismatch(format!(
            "'{}' must be text (got {})",
            key,
            other.kind()
        ))),
    }
}

pub(crate) fn date_field(record: &TaskRecord, key: &str) -> TaskResult<Option<NaiveDate>> {
    match record.get(key) {
        None | Some(FieldValue::Null) => Ok(None),
        Some(FieldValue::Date(d)) => Ok(Some(*d)),
        Some(FieldValue::DateTime(dt)) => Ok(Some(dt.date_naive())),
        Some(FieldValue::Text(s)) => validators::validate_due_date(Some(s)),
    }
}

pub(crate) fn timestamp_field(record: &TaskRecord, key: &str) -> TaskResult<Option<DateTime<Utc>>> {
    match record.get(key) {
        None | Some(FieldValue::Null) => Ok(None),
        Some(FieldValue::DateTime(dt)) => Ok(Some(*dt)),
        Some(FieldValue::Text(s)) if s.is_empty() => Ok(None),
        Some(FieldValue::Text(s)) => parse_timestamp(s).map(Some),
        Some(other) => Err(TaskError::type_mismatch(format!(
            "'{}' must be a timestamp (got {})",
            key,
            other.kind()
        ))),
    }
}

fn required_text<'a>(record: &'a TaskRecord, key: &str) -> TaskResult<&'a str> {
    text_field(record, key)?
        .ok_or_else(|| TaskError::invalid_value(format!("Missing required field '{}'", key)))
}

impl Task {
    /// Serialize into a flat record. Every key is present; unset optionals
    /// are `Null`.
    pub fn to_record(&self) -> TaskRecord {
        let mut record = TaskRecord::new();
        record.insert(KEY_ID.into(), self.id().into());
        record.insert(KEY_TITLE.into(), self.title().into());
        record.insert(KEY_STATUS.into(), self.status().as_str().into());
        record.insert(
            KEY_CREATED.into(),
            format_timestamp(&self.created_timestamp()).into(),
        );
        record.insert(
            KEY_COMPLETED.into(),
            self.completed_timestamp().map(|ts| format_timestamp(&ts)).into(),
        );
        record.insert(KEY_PRIORITY.into(), self.priority().as_str().into());
        record.insert(KEY_CATEGORY.into(), self.category().into());
        record.insert(
            KEY_DUE_DATE.into(),
            self.due_date().map(|d| d.format("%Y-%m-%d").to_string()).into(),
        );
        record.insert(
            KEY_RECURRENCE.into(),
            self.recurrence().map(|r| r.as_str()).into(),
        );
        record.insert(KEY_PARENT.into(), self.parent_recurrence_id().into());
        record
    }

    /// Rebuild a task from a record, validating fields in construction order.
    pub fn from_record(record: &TaskRecord) -> TaskResult<Task> {
        let id = required_text(record, KEY_ID)?;
        validators::validate_task_id(id)?;

        let title = required_text(record, KEY_TITLE)?;
        validators::validate_task_title(title.trim())?;

        let status = match text_field(record, KEY_STATUS)? {
            Some(s) => s.parse::<Status>()?,
            None => Status::default(),
        };

        let created = timestamp_field(record, KEY_CREATED)?;
        let completed = timestamp_field(record, KEY_COMPLETED)?;

        let priority = match text_field(record, KEY_PRIORITY)? {
            Some(p) => validators::validate_priority(p)?,
            None => Priority::default(),
        };

        let category = validators::validate_category(text_field(record, KEY_CATEGORY)?)?;
        let due_date = date_field(record, KEY_DUE_DATE)?;
        let recurrence: Option<Recurrence> =
            validators::validate_recurrence(text_field(record, KEY_RECURRENCE)?)?;
        let parent = text_field(record, KEY_PARENT)?;

        let mut builder = TaskBuilder::new(id, title)
            .status(status)
            .completed_timestamp(completed)
            .priority(priority)
            .category(category)
            .due_date(due_date)
            .recurrence(recurrence)
            .parent_recurrence_id(parent);
        if let Some(created) = created {
            builder = builder.created_timestamp(created);
        }
        builder.build()
    }

    pub fn to_json(&self) -> TaskResult<String> {
        Ok(serde_json::to_string(&self.to_record())?)
    }

    pub fn from_json(json: &str) -> TaskResult<Task> {
        let record: TaskRecord = serde_json::from_str(json)?;
        Task::from_record(&record)
    }
}

impl From<&Task> for TaskRecord {
    fn from(task: &Task) -> Self {
        task.to_record()
    }
}

impl TryFrom<&TaskRecord> for Task {
    type Error = TaskError;

    fn try_from(record: &TaskRecord) -> Result<Self, Self::Error> {
        Task::from_record(record)
    }
}
