//! Priority helpers that take raw priority names from callers.

use super::filter::{filter_tasks, TaskFilter};
use crate::error::TaskResult;
use crate::models::{Priority, Task};
use crate::validators;

pub use super::sort::sort_by_priority;
pub use crate::validators::validate_priority;

/// Task counts per priority. Every level is always present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PrioritySummary {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

impl PrioritySummary {
    pub fn get(&self, priority: Priority) -> usize {
        match priority {
            Priority::High => self.high,
            Priority::Medium => self.medium,
            Priority::Low => self.low,
        }
    }

    pub fn total(&self) -> usize {
        self.high + self.medium + self.low
    }
}

/// Validate `priority`, then keep the tasks at that level.
pub fn filter_by_priority<'a>(tasks: impl IntoIterator<Item = &'a Task>, priority: &str) -> TaskResult<Vec<&'a Task>> {
    let priority = validators::validate_priority(priority)?;
    Ok(filter_tasks(tasks, &TaskFilter::new().priority(priority)))
}

pub fn priority_summary<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> PrioritySummary {
    let mut summary = PrioritySummary::default();
    for task in tasks {
        match task.priority() {
            Priority::High => summary.high += 1,
            Priority::Medium => summary.medium += 1,
            Priority::Low => summary.low += 1,
        }
    }
    summary
}

/// Validate `priority`, then set it on `task`. The task is untouched on error.
pub fn set_priority(task: &mut Task, priority: &str) -> TaskResult<()> {
    task.set_priority(validators::validate_priority(priority)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TaskError;
    use proptest::prelude::*;

    fn task(n: usize, priority: Priority) -> Task {
        Task::builder(format!("task-{:03}", n), "t").priority(priority).build().unwrap()
    }

    #[test]
    fn test_filter_by_priority_validates() {
        let tasks = vec![task(1, Priority::High), task(2, Priority::Low)];
        assert_eq!(filter_by_priority(&tasks, "high").unwrap().len(), 1);
        assert!(matches!(filter_by_priority(&tasks, "urgent"), Err(TaskError::InvalidValue(_))));
        assert!(matches!(filter_by_priority(&tasks, "High"), Err(TaskError::InvalidValue(_))));
    }

    #[test]
    fn test_priority_summary_zero_filled() {
        let empty: Vec<Task> = Vec::new();
        assert_eq!(priority_summary(&empty), PrioritySummary::default());

        let tasks = vec![task(1, Priority::High), task(2, Priority::High), task(3, Priority::Low)];
        let summary = priority_summary(&tasks);
        assert_eq!(summary.get(Priority::High), 2);
        assert_eq!(summary.get(Priority::Medium), 0);
        assert_eq!(summary.get(Priority::Low), 1);
        assert_eq!(summary.total(), 3);
    }

    #[test]
    fn test_set_priority() {
        let mut t = task(1, Priority::Medium);
        set_priority(&mut t, "low").unwrap();
        assert_eq!(t.priority(), Priority::Low);

        assert!(set_priority(&mut t, "none").is_err());
        assert_eq!(t.priority(), Priority::Low);
    }

    proptest! {
        #[test]
        fn test_priority_filters_partition_input(levels in prop::collection::vec(0u8..3, 0..50)) {
            let tasks: Vec<Task> = levels
                .iter()
                .enumerate()
                .map(|(i, l)| task(i + 1, Priority::ALL[*l as usize]))
                .collect();

            let mut seen: Vec<&str> = Vec::new();
            for p in Priority::ALL {
                let subset = filter_by_priority(&tasks, p.as_str()).unwrap();
                prop_assert!(subset.iter().all(|t| t.priority() == p));
                let expected: Vec<&str> = tasks.iter().filter(|t| t.priority() == p).map(|t| t.id()).collect();
                let got: Vec<&str> = subset.iter().map(|t| t.id()).collect();
                prop_assert_eq!(&got, &expected);
                seen.extend(got);
            }

            seen.sort_unstable();
            let mut all: Vec<&str> = tasks.iter().map(|t| t.id()).collect();
            all.sort_unstable();
            prop_assert_eq!(seen, all);
        }
    }
}
