//! Data models for the task manager.

use crate::error::{TaskError, TaskResult};
use crate::validators;
use chrono::{DateTime, Datelike, Duration, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Unique task identifier (`task-NNN`).
pub type TaskId = String;

/// The current local calendar date. Overdue checks compare against this.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Task priority levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::High, Priority::Medium, Priority::Low];

    pub fn from_name(name: &str) -> Option<Priority> {
        match name {
            "high" => Some(Priority::High),
            "medium" => Some(Priority::Medium),
            "low" => Some(Priority::Low),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Priority::High => "●",
            Priority::Medium => "◐",
            Priority::Low => "○",
        }
    }

    /// Sort rank: high is 0, low is 2.
    pub fn rank(&self) -> u8 {
        match self {
            Priority::High => 0,
            Priority::Medium => 1,
            Priority::Low => 2,
        }
    }

    pub fn next(&self) -> Priority {
        match self {
            Priority::Low => Priority::Medium,
            Priority::Medium => Priority::High,
            Priority::High => Priority::Low,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = TaskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        validators::validate_priority(s)
    }
}

/// Task status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    Pending,
    Completed,
}

impl Status {
    pub const ALL: [Status; 2] = [Status::Pending, Status::Completed];

    pub fn from_name(name: &str) -> Option<Status> {
        match name {
            "pending" => Some(Status::Pending),
            "completed" => Some(Status::Completed),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Pending => "pending",
            Status::Completed => "completed",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Status::Pending => "Pending",
            Status::Completed => "Completed",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Status::Pending => "○",
            Status::Completed => "✓",
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, Status::Completed)
    }

    pub fn toggle(&self) -> Status {
        match self {
            Status::Pending => Status::Completed,
            Status::Completed => Status::Pending,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = TaskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Status::from_name(s).ok_or_else(|| {
            TaskError::invalid_value(format!(
                "Status must be 'pending' or 'completed' (got '{}')",
                s
            ))
        })
    }
}

/// Recurrence pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Recurrence {
    Daily,
    Weekly,
    Monthly,
}

impl Recurrence {
    pub const ALL: [Recurrence; 3] = [Recurrence::Daily, Recurrence::Weekly, Recurrence::Monthly];

    pub fn from_name(name: &str) -> Option<Recurrence> {
        match name {
            "daily" => Some(Recurrence::Daily),
            "weekly" => Some(Recurrence::Weekly),
            "monthly" => Some(Recurrence::Monthly),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Recurrence::Daily => "daily",
            Recurrence::Weekly => "weekly",
            Recurrence::Monthly => "monthly",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Recurrence::Daily => "Daily",
            Recurrence::Weekly => "Weekly",
            Recurrence::Monthly => "Monthly",
        }
    }

    /// The occurrence following `date`. Monthly steps clamp the day to the
    /// length of the target month, so Jan 31 becomes Feb 28 (or 29).
    pub fn advance(&self, date: NaiveDate) -> Option<NaiveDate> {
        match self {
            Recurrence::Daily => date.checked_add_signed(Duration::days(1)),
            Recurrence::Weekly => date.checked_add_signed(Duration::days(7)),
            Recurrence::Monthly => add_one_month(date),
        }
    }
}

impl fmt::Display for Recurrence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Recurrence {
    type Err = TaskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        validators::validate_recurrence(Some(s))?
            .ok_or_else(|| TaskError::invalid_value("Recurrence cannot be empty"))
    }
}

fn add_one_month(date: NaiveDate) -> Option<NaiveDate> {
    let month0 = date.month0() + 1;
    let year = date.year() + (month0 / 12) as i32;
    let month = month0 % 12 + 1;
    let day = date.day().min(validators::days_in_month(year, month));
    NaiveDate::from_ymd_opt(year, month, day)
}

/// A task.
///
/// Fields are private so the ID and title stay fixed after construction and
/// status changes always go through [`Task::set_status`].
#[derive(Debug, Clone, PartialEq)]
pub struct Task {
    id: TaskId,
    title: String,
    status: Status,
    created_timestamp: DateTime<Utc>,
    completed_timestamp: Option<DateTime<Utc>>,
    priority: Priority,
    category: Option<String>,
    due_date: Option<NaiveDate>,
    recurrence: Option<Recurrence>,
    parent_recurrence_id: Option<TaskId>,
}

impl Task {
    /// Create a pending, medium-priority task with no scheduling metadata.
    pub fn new(id: impl Into<TaskId>, title: impl Into<String>) -> TaskResult<Self> {
        TaskBuilder::new(id, title).build()
    }

    pub fn builder(id: impl Into<TaskId>, title: impl Into<String>) -> TaskBuilder {
        TaskBuilder::new(id, title)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn created_timestamp(&self) -> DateTime<Utc> {
        self.created_timestamp
    }

    pub fn completed_timestamp(&self) -> Option<DateTime<Utc>> {
        self.completed_timestamp
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn due_date(&self) -> Option<NaiveDate> {
        self.due_date
    }

    pub fn recurrence(&self) -> Option<Recurrence> {
        self.recurrence
    }

    pub fn parent_recurrence_id(&self) -> Option<&str> {
        self.parent_recurrence_id.as_deref()
    }

    pub fn is_completed(&self) -> bool {
        self.status.is_complete()
    }

    pub fn is_pending(&self) -> bool {
        !self.is_completed()
    }

    pub fn has_due_date(&self) -> bool {
        self.due_date.is_some()
    }

    pub fn is_recurring(&self) -> bool {
        self.recurrence.is_some()
    }

    /// Set the status. Completing a task stamps `completed_timestamp` the
    /// first time only; reopening leaves the timestamp alone.
    pub fn set_status(&mut self, status: Status) {
        self.status = status;
        if status == Status::Completed && self.completed_timestamp.is_none() {
            self.completed_timestamp = Some(Utc::now());
        }
    }

    pub fn set_completed_timestamp(&mut self, timestamp: Option<DateTime<Utc>>) {
        self.completed_timestamp = timestamp;
    }

    pub fn set_priority(&mut self, priority: Priority) {
        self.priority = priority;
    }

    /// Set the category. An empty string clears it.
    pub fn set_category(&mut self, category: Option<&str>) -> TaskResult<()> {
        self.category = validators::validate_category(category)?;
        Ok(())
    }

    pub fn clear_category(&mut self) {
        self.category = None;
    }

    pub fn set_due_date(&mut self, due_date: Option<NaiveDate>) {
        self.due_date = due_date;
    }

    pub fn set_recurrence(&mut self, recurrence: Option<Recurrence>) {
        self.recurrence = recurrence;
    }

    pub fn set_parent_recurrence_id(&mut self, parent: Option<TaskId>) {
        self.parent_recurrence_id = parent;
    }

    /// Whether the due date is strictly before today. A task due today is not
    /// overdue, and completion is not taken into account.
    pub fn is_overdue(&self) -> bool {
        self.is_overdue_on(today())
    }

    pub fn is_overdue_on(&self, today: NaiveDate) -> bool {
        matches!(self.due_date, Some(due) if due < today)
    }

    pub fn is_due_on(&self, date: NaiveDate) -> bool {
        self.due_date == Some(date)
    }

    pub fn days_until_due(&self, today: NaiveDate) -> Option<i64> {
        self.due_date.map(|d| (d - today).num_days())
    }

    /// Next due date for a recurring task. `None` unless both the recurrence
    /// and the due date are set.
    pub fn next_recurrence_date(&self) -> Option<NaiveDate> {
        let recurrence = self.recurrence?;
        let due = self.due_date?;
        recurrence.advance(due)
    }

    /// Rebuild this task under a new ID. Storage uses this when it assigns IDs.
    pub(crate) fn with_id(mut self, id: TaskId) -> TaskResult<Self> {
        validators::validate_task_id(&id)?;
        self.id = id;
        Ok(self)
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}] {}", self.status.symbol(), self.id, self.title)?;
        if self.is_overdue() {
            write!(f, " [OVERDUE]")?;
        }
        Ok(())
    }
}

/// Typed construction of a [`Task`].
///
/// `build` validates every field in a fixed order and returns the first
/// failure; no task exists unless every check passes.
#[derive(Debug, Clone)]
pub struct TaskBuilder {
    id: TaskId,
    title: String,
    status: Status,
    created_timestamp: Option<DateTime<Utc>>,
    completed_timestamp: Option<DateTime<Utc>>,
    priority: Priority,
    category: Option<String>,
    due_date: Option<NaiveDate>,
    recurrence: Option<Recurrence>,
    parent_recurrence_id: Option<TaskId>,
}

impl TaskBuilder {
    pub fn new(id: impl Into<TaskId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            status: Status::default(),
            created_timestamp: None,
            completed_timestamp: None,
            priority: Priority::default(),
            category: None,
            due_date: None,
            recurrence: None,
            parent_recurrence_id: None,
        }
    }

    pub fn status(mut self, status: Status) -> Self {
        self.status = status;
        self
    }

    pub fn created_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.created_timestamp = Some(timestamp);
        self
    }

    pub fn completed_timestamp(mut self, timestamp: Option<DateTime<Utc>>) -> Self {
        self.completed_timestamp = timestamp;
        self
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn category(mut self, category: Option<impl Into<String>>) -> Self {
        self.category = category.map(Into::into);
        self
    }

    pub fn due_date(mut self, due_date: Option<NaiveDate>) -> Self {
        self.due_date = due_date;
        self
    }

    pub fn recurrence(mut self, recurrence: Option<Recurrence>) -> Self {
        self.recurrence = recurrence;
        self
    }

    pub fn parent_recurrence_id(mut self, parent: Option<impl Into<TaskId>>) -> Self {
        self.parent_recurrence_id = parent.map(Into::into);
        self
    }

    pub fn build(self) -> TaskResult<Task> {
        validators::validate_task_id(&self.id)?;
        validators::validate_task_title(self.title.trim())?;
        let category = validators::validate_category(self.category.as_deref())?;

        Ok(Task {
            id: self.id,
            title: self.title,
            status: self.status,
            created_timestamp: self.created_timestamp.unwrap_or_else(Utc::now),
            completed_timestamp: self.completed_timestamp,
            priority: self.priority,
            category,
            due_date: self.due_date,
            recurrence: self.recurrence,
            parent_recurrence_id: self.parent_recurrence_id,
        })
    }
}

/// Aggregate counts shown in the status bar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskStats {
    pub total: usize,
    pub pending: usize,
    pub completed: usize,
    pub overdue: usize,
    pub due_today: usize,
}

impl TaskStats {
    pub fn collect<'a>(tasks: impl IntoIterator<Item = &'a Task>, today: NaiveDate) -> Self {
        let mut stats = TaskStats::default();
        for task in tasks {
            stats.total += 1;
            match task.status() {
                Status::Pending => stats.pending += 1,
                Status::Completed => stats.completed += 1,
            }
            if task.is_pending() && task.is_overdue_on(today) {
                stats.overdue += 1;
            }
            if task.is_due_on(today) {
                stats.due_today += 1;
            }
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_task_defaults() {
        let task = Task::new("task-001", "Write report").unwrap();
        assert_eq!(task.id(), "task-001");
        assert_eq!(task.title(), "Write report");
        assert_eq!(task.status(), Status::Pending);
        assert_eq!(task.priority(), Priority::Medium);
        assert_eq!(task.category(), None);
        assert_eq!(task.completed_timestamp(), None);
        assert!(!task.is_overdue());
        assert_eq!(task.next_recurrence_date(), None);
    }

    #[test]
    fn test_construction_fails_fast_on_id_before_title() {
        // Both the ID and the title are bad; the ID is checked first.
        let err = Task::new("bogus", "   ").unwrap_err();
        assert!(err.to_string().contains("ID"));
    }

    #[test]
    fn test_construction_rejects_blank_and_long_titles() {
        assert!(matches!(Task::new("task-001", "  "), Err(TaskError::InvalidValue(_))));
        assert!(matches!(
            Task::new("task-001", "x".repeat(256)),
            Err(TaskError::InvalidValue(_))
        ));
        // Length is measured after trimming.
        let padded = format!("  {}  ", "x".repeat(255));
        assert!(Task::new("task-001", padded).is_ok());
    }

    #[test]
    fn test_construction_rejects_long_category() {
        let result = Task::builder("task-001", "Title")
            .category(Some("c".repeat(51)))
            .build();
        assert!(matches!(result, Err(TaskError::InvalidValue(_))));
    }

    #[test]
    fn test_empty_category_normalizes_to_none() {
        let task = Task::builder("task-001", "Title").category(Some("")).build().unwrap();
        assert_eq!(task.category(), None);

        let mut task = Task::builder("task-002", "Title")
            .category(Some("work"))
            .build()
            .unwrap();
        task.set_category(Some("")).unwrap();
        assert_eq!(task.category(), None);
    }

    #[test]
    fn test_set_status_stamps_once() {
        let mut task = Task::new("task-001", "Title").unwrap();
        task.set_status(Status::Completed);
        let first = task.completed_timestamp().expect("stamped on completion");

        task.set_status(Status::Completed);
        assert_eq!(task.completed_timestamp(), Some(first));

        // Reopening does not clear the stamp by itself.
        task.set_status(Status::Pending);
        assert_eq!(task.completed_timestamp(), Some(first));
    }

    #[test]
    fn test_is_overdue_is_strict() {
        let today = date(2025, 6, 15);
        let mut task = Task::new("task-001", "Title").unwrap();

        task.set_due_date(Some(date(2025, 6, 14)));
        assert!(task.is_overdue_on(today));

        task.set_due_date(Some(today));
        assert!(!task.is_overdue_on(today));

        task.set_due_date(Some(date(2025, 6, 16)));
        assert!(!task.is_overdue_on(today));

        task.set_due_date(None);
        assert!(!task.is_overdue_on(today));
    }

    #[test]
    fn test_next_recurrence_date() {
        let mut task = Task::builder("task-001", "Rent")
            .due_date(Some(date(2025, 1, 31)))
            .recurrence(Some(Recurrence::Monthly))
            .build()
            .unwrap();
        assert_eq!(task.next_recurrence_date(), Some(date(2025, 2, 28)));

        task.set_due_date(Some(date(2024, 1, 31)));
        assert_eq!(task.next_recurrence_date(), Some(date(2024, 2, 29)));

        task.set_due_date(Some(date(2025, 12, 15)));
        assert_eq!(task.next_recurrence_date(), Some(date(2026, 1, 15)));

        task.set_recurrence(Some(Recurrence::Daily));
        assert_eq!(task.next_recurrence_date(), Some(date(2025, 12, 16)));

        task.set_recurrence(Some(Recurrence::Weekly));
        assert_eq!(task.next_recurrence_date(), Some(date(2025, 12, 22)));

        task.set_due_date(None);
        assert_eq!(task.next_recurrence_date(), None);
    }

    #[test]
    fn test_recurrence_without_due_date() {
        let task = Task::builder("task-001", "Standup")
            .recurrence(Some(Recurrence::Daily))
            .build()
            .unwrap();
        assert!(task.is_recurring());
        assert_eq!(task.next_recurrence_date(), None);
    }

    #[test]
    fn test_enum_parsing() {
        assert_eq!("high".parse::<Priority>().unwrap(), Priority::High);
        assert!("HIGH".parse::<Priority>().is_err());
        assert_eq!("completed".parse::<Status>().unwrap(), Status::Completed);
        assert!("done".parse::<Status>().is_err());
        assert_eq!("monthly".parse::<Recurrence>().unwrap(), Recurrence::Monthly);
        assert!("".parse::<Recurrence>().is_err());
    }

    #[test]
    fn test_priority_rank_and_cycle() {
        assert!(Priority::High.rank() < Priority::Medium.rank());
        assert!(Priority::Medium.rank() < Priority::Low.rank());
        assert_eq!(Priority::Low.next(), Priority::Medium);
        assert_eq!(Priority::High.next(), Priority::Low);
    }

    #[test]
    fn test_display() {
        let mut task = Task::new("task-007", "Call mom").unwrap();
        assert_eq!(task.to_string(), "○ [task-007] Call mom");

        task.set_status(Status::Completed);
        task.set_due_date(Some(date(2000, 1, 1)));
        assert_eq!(task.to_string(), "✓ [task-007] Call mom [OVERDUE]");
    }

    #[test]
    fn test_task_stats() {
        let today = date(2025, 6, 15);
        let mut overdue = Task::new("task-001", "Late").unwrap();
        overdue.set_due_date(Some(date(2025, 6, 1)));
        let mut due_today = Task::new("task-002", "Today").unwrap();
        due_today.set_due_date(Some(today));
        let mut done = Task::new("task-003", "Done late").unwrap();
        done.set_due_date(Some(date(2025, 6, 1)));
        done.set_status(Status::Completed);

        let stats = TaskStats::collect([&overdue, &due_today, &done], today);
        assert_eq!(stats.total, 3);
        assert_eq!(stats.pending, 2);
        assert_eq!(stats.completed, 1);
        assert_eq!(stats.overdue, 1);
        assert_eq!(stats.due_today, 1);
    }
}
