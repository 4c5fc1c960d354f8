//! Category helpers that take raw category names from callers.

use super::filter::UNCATEGORIZED;
use crate::error::TaskResult;
use crate::models::Task;
use crate::validators;
use std::collections::{BTreeMap, BTreeSet};

pub use crate::validators::validate_category;

/// Validate `category`, then keep the tasks filed under exactly that name.
/// An empty name matches nothing; use [`tasks_without_category`] for
/// uncategorized tasks.
pub fn filter_by_category<'a>(tasks: impl IntoIterator<Item = &'a Task>, category: &str) -> TaskResult<Vec<&'a Task>> {
    validators::validate_category(Some(category))?;
    Ok(tasks
        .into_iter()
        .filter(|t| t.category() == Some(category))
        .collect())
}

/// Tasks filed under any of `categories`. Every name is validated first.
pub fn filter_by_categories<'a>(
    tasks: impl IntoIterator<Item = &'a Task>,
    categories: &[&str],
) -> TaskResult<Vec<&'a Task>> {
    for category in categories {
        validators::validate_category(Some(category))?;
    }
    Ok(tasks
        .into_iter()
        .filter(|t| t.category().map_or(false, |c| categories.contains(&c)))
        .collect())
}

/// Distinct categories in use.
pub fn all_categories<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> BTreeSet<String> {
    tasks
        .into_iter()
        .filter_map(|t| t.category().map(str::to_string))
        .collect()
}

/// Task counts per category. Uncategorized tasks are counted under
/// `"uncategorized"`, and that key only appears when the count is non-zero.
pub fn category_summary<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> BTreeMap<String, usize> {
    let mut summary = BTreeMap::new();
    let mut uncategorized = 0;
    for task in tasks {
        match task.category() {
            Some(category) => *summary.entry(category.to_string()).or_insert(0) += 1,
            None => uncategorized += 1,
        }
    }
    if uncategorized > 0 {
        summary.insert(UNCATEGORIZED.to_string(), uncategorized);
    }
    summary
}

pub fn set_category(task: &mut Task, category: Option<&str>) -> TaskResult<()> {
    task.set_category(category)
}

pub fn remove_category(task: &mut Task) {
    task.clear_category();
}

/// Rename `old` to `new` on every task that has it. Both names are validated
/// before any task changes. Returns how many tasks were renamed.
pub fn rename_category<'a>(
    tasks: impl IntoIterator<Item = &'a mut Task>,
    old: &str,
    new: &str,
) -> TaskResult<usize> {
    validators::validate_category(Some(old))?;
    let new = validators::validate_category(Some(new))?;

    let mut renamed = 0;
    for task in tasks {
        if task.category() == Some(old) {
            task.set_category(new.as_deref())?;
            renamed += 1;
        }
    }
    if renamed > 0 {
        tracing::debug!(from = %old, to = ?new, renamed, "category renamed");
    }
    Ok(renamed)
}

pub fn tasks_with_category<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> Vec<&'a Task> {
    tasks.into_iter().filter(|t| t.category().is_some()).collect()
}

pub fn tasks_without_category<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> Vec<&'a Task> {
    tasks.into_iter().filter(|t| t.category().is_none()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TaskError;

    fn task(n: u32, category: Option<&str>) -> Task {
        Task::builder(format!("task-{:03}", n), "t").category(category).build().unwrap()
    }

    fn sample() -> Vec<Task> {
        vec![
            task(1, Some("work")),
            task(2, Some("home")),
            task(3, None),
            task(4, Some("work")),
        ]
    }

    fn ids(tasks: &[&Task]) -> Vec<String> {
        tasks.iter().map(|t| t.id().to_string()).collect()
    }

    #[test]
    fn test_filter_by_category() {
        let tasks = sample();
        assert_eq!(ids(&filter_by_category(&tasks, "work").unwrap()), vec!["task-001", "task-004"]);
        // Exact, case-sensitive match.
        assert!(filter_by_category(&tasks, "Work").unwrap().is_empty());
        assert!(matches!(
            filter_by_category(&tasks, &"w".repeat(51)),
            Err(TaskError::InvalidValue(_))
        ));
    }

    #[test]
    fn test_filter_by_empty_category_matches_nothing() {
        let tasks = sample();
        assert!(filter_by_category(&tasks, "").unwrap().is_empty());
        assert!(filter_by_categories(&tasks, &[""]).unwrap().is_empty());
    }

    #[test]
    fn test_filter_by_categories() {
        let tasks = sample();
        assert_eq!(
            ids(&filter_by_categories(&tasks, &["home", "work"]).unwrap()),
            vec!["task-001", "task-002", "task-004"]
        );
        assert!(filter_by_categories(&tasks, &[]).unwrap().is_empty());
        let long = "x".repeat(60);
        assert!(filter_by_categories(&tasks, &["home", &long]).is_err());
    }

    #[test]
    fn test_all_categories_and_summary() {
        let tasks = sample();
        let categories: Vec<String> = all_categories(&tasks).into_iter().collect();
        assert_eq!(categories, vec!["home", "work"]);

        let summary = category_summary(&tasks);
        assert_eq!(summary.get("work"), Some(&2));
        assert_eq!(summary.get("home"), Some(&1));
        assert_eq!(summary.get(UNCATEGORIZED), Some(&1));

        let categorized = vec![task(1, Some("a"))];
        assert!(!category_summary(&categorized).contains_key(UNCATEGORIZED));
    }

    #[test]
    fn test_set_and_remove_category() {
        let mut t = task(1, None);
        set_category(&mut t, Some("garden")).unwrap();
        assert_eq!(t.category(), Some("garden"));

        assert!(set_category(&mut t, Some(&"g".repeat(51))).is_err());
        assert_eq!(t.category(), Some("garden"));

        remove_category(&mut t);
        assert_eq!(t.category(), None);
    }

    #[test]
    fn test_rename_category() {
        let mut tasks = sample();
        let renamed = rename_category(tasks.iter_mut(), "work", "office").unwrap();
        assert_eq!(renamed, 2);
        assert_eq!(tasks[0].category(), Some("office"));
        assert_eq!(tasks[1].category(), Some("home"));
        assert_eq!(tasks[3].category(), Some("office"));
    }

    #[test]
    fn test_rename_category_validates_before_touching() {
        let mut tasks = sample();
        let result = rename_category(tasks.iter_mut(), "work", &"o".repeat(51));
        assert!(result.is_err());
        assert_eq!(tasks[0].category(), Some("work"));
    }

    #[test]
    fn test_partition_by_category() {
        let tasks = sample();
        assert_eq!(ids(&tasks_with_category(&tasks)), vec!["task-001", "task-002", "task-004"]);
        assert_eq!(ids(&tasks_without_category(&tasks)), vec!["task-003"]);
    }
}
