//! Task service: CRUD and common queries over an owned [`TaskStorage`].

use crate::error::{TaskError, TaskResult};
use crate::models::{today, Priority, Recurrence, Status, Task};
use crate::query::{category, filter, priority, search, sort};
use crate::query::filter::TaskFilter;
use crate::query::sort::SortField;
use crate::storage::{TaskPatch, TaskStorage};
use chrono::{Duration, NaiveDate, Utc};

/// Everything needed to create a task except its ID, which storage assigns.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskDraft {
    pub title: String,
    pub status: Status,
    pub priority: Priority,
    pub category: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub recurrence: Option<Recurrence>,
}

impl TaskDraft {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            status: Status::Pending,
            priority: Priority::Medium,
            category: None,
            due_date: None,
            recurrence: None,
        }
    }

    pub fn status(mut self, status: Status) -> Self {
        self.status = status;
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
}

/// Completed versus pending counts.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CompletionStats {
    pub completed: usize,
    pub pending: usize,
    pub total: usize,
    /// Percentage of tasks completed, rounded to two decimals. Zero when
    /// there are no tasks.
    pub completion_percentage: f64,
}

impl CompletionStats {
    pub fn collect<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> Self {
        let mut stats = Self::default();
        for task in tasks {
            stats.total += 1;
            match task.status() {
                Status::Completed => stats.completed += 1,
                Status::Pending => stats.pending += 1,
            }
        }
        if stats.total > 0 {
            let ratio = stats.completed as f64 / stats.total as f64;
            stats.completion_percentage = (ratio * 10_000.0).round() / 100.0;
        }
        stats
    }
}

#[derive(Debug, Default)]
pub struct TaskService {
    storage: TaskStorage,
}

impl TaskService {
    pub fn new(storage: TaskStorage) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &TaskStorage {
        &self.storage
    }

    pub fn create_task(&mut self, draft: TaskDraft) -> TaskResult<&Task> {
        let task = Task::builder(self.storage.next_task_id(), draft.title)
            .status(draft.status)
            .created_timestamp(Utc::now())
            .priority(draft.priority)
            .category(draft.category)
            .due_date(draft.due_date)
            .recurrence(draft.recurrence)
            .build()?;
        let task = self.storage.create(task)?;
        tracing::info!(task_id = %task.id(), priority = %task.priority(), "task created");
        Ok(task)
    }

    pub fn get_task(&self, id: &str) -> Option<&Task> {
        self.storage.read(id)
    }

    /// All tasks in creation order.
    pub fn get_all_tasks(&self) -> &[Task] {
        self.storage.read_all()
    }

    pub fn update_task(&mut self, id: &str, patch: &TaskPatch) -> TaskResult<&Task> {
        if patch.is_empty() {
            tracing::warn!(task_id = %id, "empty patch");
        }
        self.storage.update(id, patch)
    }

    pub fn delete_task(&mut self, id: &str) -> bool {
        let deleted = self.storage.delete(id);
        if deleted {
            tracing::info!(task_id = %id, "task deleted");
        }
        deleted
    }

    /// All tasks ordered by `sort_by`. Without `reverse` that means
    /// high priority first, earliest due date first, pending first, A to Z,
    /// and oldest first.
    ///
    /// Status order is by lifecycle rather than by the status name, so pending
    /// tasks lead; alphabetical order would put completed ones first.
    pub fn list_all_tasks(&self, sort_by: SortField, reverse: bool) -> Vec<&Task> {
        let ascending = match sort_by {
            SortField::Priority => reverse,
            _ => !reverse,
        };
        sort::sort_by_field(self.get_all_tasks(), sort_by, ascending)
    }

    pub fn filter_by_status(&self, status: Status) -> Vec<&Task> {
        filter::filter_tasks(self.get_all_tasks(), &TaskFilter::new().status(status))
    }

    pub fn filter_by_priority(&self, priority: &str) -> TaskResult<Vec<&Task>> {
        priority::filter_by_priority(self.get_all_tasks(), priority)
    }

    pub fn filter_by_category(&self, category: &str) -> TaskResult<Vec<&Task>> {
        category::filter_by_category(self.get_all_tasks(), category)
    }

    /// Pending tasks whose due date has passed.
    pub fn overdue_tasks(&self) -> Vec<&Task> {
        self.overdue_tasks_on(today())
    }

    pub fn overdue_tasks_on(&self, today: NaiveDate) -> Vec<&Task> {
        filter::filter_tasks_on(
            self.get_all_tasks(),
            &TaskFilter::new().status(Status::Pending).overdue(true),
            today,
        )
    }

    /// Pending tasks due between today and `days` from now, inclusive.
    pub fn upcoming_tasks(&self, days: u32) -> Vec<&Task> {
        self.upcoming_tasks_on(days, today())
    }

    pub fn upcoming_tasks_on(&self, days: u32, today: NaiveDate) -> Vec<&Task> {
        let cutoff = today + Duration::days(i64::from(days));
        self.get_all_tasks()
            .iter()
            .filter(|t| t.is_pending())
            .filter(|t| matches!(t.due_date(), Some(due) if today <= due && due <= cutoff))
            .collect()
    }

    /// Complete a task. Completing an already completed task keeps its
    /// original completion time.
    pub fn mark_complete(&mut self, id: &str) -> TaskResult<&Task> {
        let task = self.storage.update(id, &TaskPatch::new().status(Status::Completed))?;
        tracing::info!(task_id = %id, "task completed");
        Ok(task)
    }

    /// Reopen a task and clear its completion time.
    pub fn mark_pending(&mut self, id: &str) -> TaskResult<&Task> {
        let patch = TaskPatch::new().status(Status::Pending).completed_timestamp(None);
        let task = self.storage.update(id, &patch)?;
        tracing::info!(task_id = %id, "task reopened");
        Ok(task)
    }

    /// Flip between pending and completed.
    pub fn toggle_complete(&mut self, id: &str) -> TaskResult<&Task> {
        let status = self
            .get_task(id)
            .map(Task::status)
            .ok_or_else(|| TaskError::NotFound(id.to_string()))?;
        match status {
            Status::Pending => self.mark_complete(id),
            Status::Completed => self.mark_pending(id),
        }
    }

    /// Rename a category on every task. Returns how many tasks changed.
    pub fn rename_category(&mut self, old: &str, new: &str) -> TaskResult<usize> {
        category::rename_category(self.storage.read_all_mut().iter_mut(), old, new)
    }

    pub fn task_count(&self) -> usize {
        self.storage.len()
    }

    pub fn completion_stats(&self) -> CompletionStats {
        CompletionStats::collect(self.get_all_tasks())
    }

    pub fn clear_all_tasks(&mut self) {
        self.storage.clear();
        tracing::info!("all tasks cleared");
    }

    pub fn search_tasks(&self, keyword: &str) -> TaskResult<Vec<&Task>> {
        search::search_tasks(self.get_all_tasks(), keyword)
    }

    pub fn search_tasks_with_filters(&self, keyword: &str, filter: &TaskFilter) -> TaskResult<Vec<&Task>> {
        search::search_with_filters(self.get_all_tasks(), keyword, filter)
    }
}
