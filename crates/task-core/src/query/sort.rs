//! Stable, non-mutating sorts over task sequences.
//!
//! Every function returns a new `Vec` and leaves tasks that compare equal in
//! their input order, so sorts can be layered: sort by the least significant
//! key first and the most significant key last.

use crate::models::{today, Status, Task};
use std::cmp::{Ordering, Reverse};

/// A field tasks can be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortField {
    Priority,
    Status,
    Title,
    DueDate,
    Created,
    Category,
}

impl SortField {
    pub const ALL: [SortField; 6] = [
        SortField::Created,
        SortField::Priority,
        SortField::DueDate,
        SortField::Status,
        SortField::Title,
        SortField::Category,
    ];

    pub fn from_name(name: &str) -> Option<SortField> {
        match name {
            "priority" => Some(SortField::Priority),
            "status" => Some(SortField::Status),
            "title" => Some(SortField::Title),
            "due_date" => Some(SortField::DueDate),
            "created" | "created_timestamp" => Some(SortField::Created),
            "category" => Some(SortField::Category),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::Priority => "priority",
            SortField::Status => "status",
            SortField::Title => "title",
            SortField::DueDate => "due_date",
            SortField::Created => "created",
            SortField::Category => "category",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortField::Priority => "Priority",
            SortField::Status => "Status",
            SortField::Title => "Title",
            SortField::DueDate => "Due date",
            SortField::Created => "Created",
            SortField::Category => "Category",
        }
    }

    pub fn next(&self) -> SortField {
        let idx = Self::ALL.iter().position(|f| f == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }
}

fn status_rank(status: Status) -> u8 {
    match status {
        Status::Pending => 0,
        Status::Completed => 1,
    }
}

fn stable_sort_by_key<'a, K: Ord>(
    tasks: impl IntoIterator<Item = &'a Task>,
    key: impl FnMut(&&'a Task) -> K,
) -> Vec<&'a Task> {
    let mut sorted: Vec<&Task> = tasks.into_iter().collect();
    sorted.sort_by_key(key);
    sorted
}

/// Split into (matching, rest), each keeping input order.
fn partition<'a>(
    tasks: impl IntoIterator<Item = &'a Task>,
    pred: impl Fn(&Task) -> bool,
) -> (Vec<&'a Task>, Vec<&'a Task>) {
    tasks.into_iter().partition(|t| pred(t))
}

/// High first when `descending`, low first otherwise.
pub fn sort_by_priority<'a>(tasks: impl IntoIterator<Item = &'a Task>, descending: bool) -> Vec<&'a Task> {
    if descending {
        stable_sort_by_key(tasks, |t| t.priority().rank())
    } else {
        stable_sort_by_key(tasks, |t| Reverse(t.priority().rank()))
    }
}

pub fn sort_by_status<'a>(tasks: impl IntoIterator<Item = &'a Task>, pending_first: bool) -> Vec<&'a Task> {
    if pending_first {
        stable_sort_by_key(tasks, |t| status_rank(t.status()))
    } else {
        stable_sort_by_key(tasks, |t| Reverse(status_rank(t.status())))
    }
}

/// Case-insensitive title order.
pub fn sort_by_title<'a>(tasks: impl IntoIterator<Item = &'a Task>, reverse: bool) -> Vec<&'a Task> {
    let mut sorted: Vec<&Task> = tasks.into_iter().collect();
    if reverse {
        sorted.sort_by_cached_key(|t| Reverse(t.title().to_lowercase()));
    } else {
        sorted.sort_by_cached_key(|t| t.title().to_lowercase());
    }
    sorted
}

/// Dated tasks ordered by due date. Ascending puts undated tasks after them,
/// descending puts undated tasks before them.
pub fn sort_by_due_date<'a>(tasks: impl IntoIterator<Item = &'a Task>, ascending: bool) -> Vec<&'a Task> {
    let (mut dated, undated) = partition(tasks, Task::has_due_date);
    if ascending {
        dated.sort_by_key(|t| t.due_date());
        dated.extend(undated);
        dated
    } else {
        dated.sort_by_key(|t| Reverse(t.due_date()));
        let mut sorted = undated;
        sorted.extend(dated);
        sorted
    }
}

pub fn sort_by_created_date<'a>(tasks: impl IntoIterator<Item = &'a Task>, ascending: bool) -> Vec<&'a Task> {
    if ascending {
        stable_sort_by_key(tasks, |t| t.created_timestamp())
    } else {
        stable_sort_by_key(tasks, |t| Reverse(t.created_timestamp()))
    }
}

/// Case-insensitive category order. Uncategorized tasks always come last.
pub fn sort_by_category<'a>(tasks: impl IntoIterator<Item = &'a Task>, reverse: bool) -> Vec<&'a Task> {
    let (mut categorized, uncategorized) = partition(tasks, |t| t.category().is_some());
    categorized.sort_by(|a, b| {
        let ord = compare_categories(a, b);
        if reverse {
            ord.reverse()
        } else {
            ord
        }
    });
    categorized.extend(uncategorized);
    categorized
}

fn compare_categories(a: &Task, b: &Task) -> Ordering {
    let a = a.category().unwrap_or_default().to_lowercase();
    let b = b.category().unwrap_or_default().to_lowercase();
    a.cmp(&b)
}

pub fn sort_by_recurrence<'a>(tasks: impl IntoIterator<Item = &'a Task>, recurring_first: bool) -> Vec<&'a Task> {
    let (mut recurring, mut one_off) = partition(tasks, Task::is_recurring);
    if recurring_first {
        recurring.extend(one_off);
        recurring
    } else {
        one_off.extend(recurring);
        one_off
    }
}

pub fn sort_by_completion_status<'a>(
    tasks: impl IntoIterator<Item = &'a Task>,
    completed_first: bool,
) -> Vec<&'a Task> {
    sort_by_status(tasks, !completed_first)
}

pub fn sort_overdue_first<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> Vec<&'a Task> {
    let today = today();
    let (mut overdue, rest) = partition(tasks, |t| t.is_overdue_on(today));
    overdue.extend(rest);
    overdue
}

pub fn sort_high_priority_first<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> Vec<&'a Task> {
    sort_by_priority(tasks, true)
}

pub fn sort_pending_first<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> Vec<&'a Task> {
    sort_by_status(tasks, true)
}

/// Sort by one field. `ascending` means low priority first, pending first,
/// A to Z, earliest date first, and oldest first.
pub fn sort_by_field<'a>(
    tasks: impl IntoIterator<Item = &'a Task>,
    field: SortField,
    ascending: bool,
) -> Vec<&'a Task> {
    match field {
        SortField::Priority => sort_by_priority(tasks, !ascending),
        SortField::Status => sort_by_status(tasks, ascending),
        SortField::Title => sort_by_title(tasks, !ascending),
        SortField::DueDate => sort_by_due_date(tasks, ascending),
        SortField::Created => sort_by_created_date(tasks, ascending),
        SortField::Category => sort_by_category(tasks, !ascending),
    }
}

fn sort_by_field_name<'a>(tasks: Vec<&'a Task>, field: &str, ascending: bool) -> Vec<&'a Task> {
    match SortField::from_name(field) {
        Some(field) => sort_by_field(tasks, field, ascending),
        None => tasks,
    }
}

/// Sort by up to three named fields, `primary` dominating.
///
/// Applies the tertiary sort first and the primary sort last; because each
/// pass is stable, earlier passes survive as tie-breakers. Unknown field
/// names are skipped.
pub fn multi_sort<'a>(
    tasks: impl IntoIterator<Item = &'a Task>,
    primary: &str,
    secondary: Option<&str>,
    tertiary: Option<&str>,
    ascending: bool,
) -> Vec<&'a Task> {
    let mut sorted: Vec<&Task> = tasks.into_iter().collect();
    if let Some(field) = tertiary {
        sorted = sort_by_field_name(sorted, field, ascending);
    }
    if let Some(field) = secondary {
        sorted = sort_by_field_name(sorted, field, ascending);
    }
    sort_by_field_name(sorted, primary, ascending)
}
