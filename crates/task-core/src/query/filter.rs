//! Multi-criteria filtering with AND semantics.

use crate::models::{today, Priority, Status, Task};
use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet};

/// Group key used for tasks without a category.
pub const UNCATEGORIZED: &str = "uncategorized";

/// Filter criteria. Unset criteria never exclude a task.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    pub status: Option<Status>,
    pub priority: Option<Priority>,
    pub category: Option<String>,
    pub is_overdue: Option<bool>,
    pub has_due_date: Option<bool>,
    pub is_recurring: Option<bool>,
}

impl TaskFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(mut self, status: Status) -> Self {
        self.status = Some(status);
        self
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn overdue(mut self, overdue: bool) -> Self {
        self.is_overdue = Some(overdue);
        self
    }

    pub fn has_due_date(mut self, has_due_date: bool) -> Self {
        self.has_due_date = Some(has_due_date);
        self
    }

    pub fn recurring(mut self, recurring: bool) -> Self {
        self.is_recurring = Some(recurring);
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Whether `task` satisfies every set criterion, judging overdue against
    /// `today`.
    pub fn matches(&self, task: &Task, today: NaiveDate) -> bool {
        self.status.map_or(true, |s| task.status() == s)
            && self.priority.map_or(true, |p| task.priority() == p)
            && self
                .category
                .as_deref()
                .map_or(true, |c| task.category() == Some(c))
            && self
                .is_overdue
                .map_or(true, |o| task.is_overdue_on(today) == o)
            && self
                .has_due_date
                .map_or(true, |d| task.has_due_date() == d)
            && self
                .is_recurring
                .map_or(true, |r| task.is_recurring() == r)
    }
}

/// Tasks matching every criterion of `filter`, in input order.
pub fn filter_tasks<'a>(tasks: impl IntoIterator<Item = &'a Task>, filter: &TaskFilter) -> Vec<&'a Task> {
    filter_tasks_on(tasks, filter, today())
}

/// [`filter_tasks`] with an explicit reference date for the overdue check.
pub fn filter_tasks_on<'a>(
    tasks: impl IntoIterator<Item = &'a Task>,
    filter: &TaskFilter,
    today: NaiveDate,
) -> Vec<&'a Task> {
    tasks.into_iter().filter(|t| filter.matches(t, today)).collect()
}

pub fn filter_by_status_and_priority<'a>(
    tasks: impl IntoIterator<Item = &'a Task>,
    status: Status,
    priority: Priority,
) -> Vec<&'a Task> {
    filter_tasks(tasks, &TaskFilter::new().status(status).priority(priority))
}

pub fn filter_by_status_and_category<'a>(
    tasks: impl IntoIterator<Item = &'a Task>,
    status: Status,
    category: &str,
) -> Vec<&'a Task> {
    filter_tasks(tasks, &TaskFilter::new().status(status).category(category))
}

pub fn filter_by_priority_and_category<'a>(
    tasks: impl IntoIterator<Item = &'a Task>,
    priority: Priority,
    category: &str,
) -> Vec<&'a Task> {
    filter_tasks(tasks, &TaskFilter::new().priority(priority).category(category))
}

pub fn filter_pending_high_priority<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> Vec<&'a Task> {
    filter_by_status_and_priority(tasks, Status::Pending, Priority::High)
}

pub fn filter_pending_by_category<'a>(
    tasks: impl IntoIterator<Item = &'a Task>,
    category: &str,
) -> Vec<&'a Task> {
    filter_by_status_and_category(tasks, Status::Pending, category)
}

pub fn filter_completed_by_priority<'a>(
    tasks: impl IntoIterator<Item = &'a Task>,
    priority: Priority,
) -> Vec<&'a Task> {
    filter_by_status_and_priority(tasks, Status::Completed, priority)
}

pub fn filter_overdue_pending<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> Vec<&'a Task> {
    filter_tasks(tasks, &TaskFilter::new().overdue(true).status(Status::Pending))
}

pub fn filter_with_due_date_pending<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> Vec<&'a Task> {
    filter_tasks(tasks, &TaskFilter::new().has_due_date(true).status(Status::Pending))
}

pub fn filter_recurring_pending<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> Vec<&'a Task> {
    filter_tasks(tasks, &TaskFilter::new().recurring(true).status(Status::Pending))
}

/// Field a count can be grouped by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupField {
    Status,
    Priority,
    Category,
}

impl GroupField {
    pub fn from_name(name: &str) -> Option<GroupField> {
        match name {
            "status" => Some(GroupField::Status),
            "priority" => Some(GroupField::Priority),
            "category" => Some(GroupField::Category),
            _ => None,
        }
    }

    pub(crate) fn key_of(&self, task: &Task) -> String {
        match self {
            GroupField::Status => task.status().as_str().to_string(),
            GroupField::Priority => task.priority().as_str().to_string(),
            GroupField::Category => task.category().unwrap_or(UNCATEGORIZED).to_string(),
        }
    }
}

/// Count tasks per value of `field` (`status`, `priority`, or `category`).
/// Any other field name produces an empty map.
pub fn count_by<'a>(tasks: impl IntoIterator<Item = &'a Task>, field: &str) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    if let Some(field) = GroupField::from_name(field) {
        for task in tasks {
            *counts.entry(field.key_of(task)).or_insert(0) += 1;
        }
    }
    counts
}

/// Filter, then count the survivors grouped by `group_by`.
pub fn filter_and_count<'a>(
    tasks: impl IntoIterator<Item = &'a Task>,
    group_by: &str,
    filter: &TaskFilter,
) -> BTreeMap<String, usize> {
    count_by(filter_tasks(tasks, filter), group_by)
}

/// Filter values actually present in a task list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterOptions {
    pub statuses: BTreeSet<Status>,
    pub priorities: BTreeSet<Priority>,
    pub categories: BTreeSet<String>,
    pub has_overdue_tasks: bool,
    pub has_tasks_with_due_date: bool,
    pub has_recurring_tasks: bool,
}

pub fn filter_options<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> FilterOptions {
    let today = today();
    let mut options = FilterOptions::default();
    for task in tasks {
        options.statuses.insert(task.status());
        options.priorities.insert(task.priority());
        if let Some(category) = task.category() {
            options.categories.insert(category.to_string());
        }
        options.has_overdue_tasks |= task.is_overdue_on(today);
        options.has_tasks_with_due_date |= task.has_due_date();
        options.has_recurring_tasks |= task.is_recurring();
    }
    options
}
