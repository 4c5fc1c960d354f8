//! Keyword search over task titles.

use super::filter::{filter_tasks, GroupField, TaskFilter};
use super::sort::{sort_by_field, SortField};
use crate::error::{TaskError, TaskResult};
use crate::models::{Priority, Task};
use std::collections::BTreeMap;

fn require_keyword(keyword: &str) -> TaskResult<()> {
    if keyword.trim().is_empty() {
        return Err(TaskError::EmptyKeyword);
    }
    Ok(())
}

/// Tasks whose title contains `keyword`, ignoring case, in input order.
/// Only titles are searched.
pub fn search_tasks<'a>(tasks: impl IntoIterator<Item = &'a Task>, keyword: &str) -> TaskResult<Vec<&'a Task>> {
    require_keyword(keyword)?;
    let needle = keyword.to_lowercase();
    Ok(tasks
        .into_iter()
        .filter(|t| t.title().to_lowercase().contains(&needle))
        .collect())
}

pub fn search_by_title<'a>(tasks: impl IntoIterator<Item = &'a Task>, keyword: &str) -> TaskResult<Vec<&'a Task>> {
    search_tasks(tasks, keyword)
}

/// Tasks whose whole title equals `title`, ignoring case.
pub fn search_by_title_exact<'a>(tasks: impl IntoIterator<Item = &'a Task>, title: &str) -> TaskResult<Vec<&'a Task>> {
    require_keyword(title)?;
    let wanted = title.to_lowercase();
    Ok(tasks
        .into_iter()
        .filter(|t| t.title().to_lowercase() == wanted)
        .collect())
}

pub fn search_by_category_and_keyword<'a>(
    tasks: impl IntoIterator<Item = &'a Task>,
    category: &str,
    keyword: &str,
) -> TaskResult<Vec<&'a Task>> {
    search_tasks(filter_tasks(tasks, &TaskFilter::new().category(category)), keyword)
}

pub fn search_by_priority_and_keyword<'a>(
    tasks: impl IntoIterator<Item = &'a Task>,
    priority: Priority,
    keyword: &str,
) -> TaskResult<Vec<&'a Task>> {
    search_tasks(filter_tasks(tasks, &TaskFilter::new().priority(priority)), keyword)
}

/// Keyword search narrowed by any filter criteria.
pub fn search_with_filters<'a>(
    tasks: impl IntoIterator<Item = &'a Task>,
    keyword: &str,
    filter: &TaskFilter,
) -> TaskResult<Vec<&'a Task>> {
    Ok(filter_tasks(search_tasks(tasks, keyword)?, filter))
}

/// Keyword search, then ordered by `sort_by` (`priority`, `status`, `title`,
/// or `due_date`). Any other name keeps the input order.
pub fn search_and_sort<'a>(
    tasks: impl IntoIterator<Item = &'a Task>,
    keyword: &str,
    sort_by: &str,
) -> TaskResult<Vec<&'a Task>> {
    let matches = search_tasks(tasks, keyword)?;
    let sorted = match SortField::from_name(sort_by) {
        Some(SortField::Priority) => sort_by_field(matches, SortField::Priority, false),
        Some(field @ (SortField::Status | SortField::Title | SortField::DueDate)) => {
            sort_by_field(matches, field, true)
        }
        _ => matches,
    };
    Ok(sorted)
}

/// Breakdown of the tasks matching a keyword.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchStats {
    pub total_matches: usize,
    pub by_status: BTreeMap<String, usize>,
    pub by_priority: BTreeMap<String, usize>,
    pub by_category: BTreeMap<String, usize>,
}

pub fn search_stats<'a>(tasks: impl IntoIterator<Item = &'a Task>, keyword: &str) -> TaskResult<SearchStats> {
    let matches = search_tasks(tasks, keyword)?;
    let mut stats = SearchStats {
        total_matches: matches.len(),
        ..Default::default()
    };
    for task in matches {
        *stats.by_status.entry(GroupField::Status.key_of(task)).or_insert(0) += 1;
        *stats.by_priority.entry(GroupField::Priority.key_of(task)).or_insert(0) += 1;
        *stats.by_category.entry(GroupField::Category.key_of(task)).or_insert(0) += 1;
    }
    Ok(stats)
}
