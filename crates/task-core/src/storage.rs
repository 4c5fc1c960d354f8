//! In-memory task storage.

use crate::error::{TaskError, TaskResult};
use crate::models::{Priority, Recurrence, Status, Task, TaskId};
use crate::record::{self, TaskRecord};
use crate::validators;
use chrono::{DateTime, NaiveDate, Utc};

/// Partial update for a task.
///
/// Only mutable attributes are representable. For the optional attributes,
/// `Some(None)` clears the value and `None` leaves it untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskPatch {
    pub status: Option<Status>,
    pub completed_timestamp: Option<Option<DateTime<Utc>>>,
    pub priority: Option<Priority>,
    pub category: Option<Option<String>>,
    pub due_date: Option<Option<NaiveDate>>,
    pub recurrence: Option<Option<Recurrence>>,
    pub parent_recurrence_id: Option<Option<TaskId>>,
}

impl TaskPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(mut self, status: Status) -> Self {
        self.status = Some(status);
        self
    }

    pub fn completed_timestamp(mut self, timestamp: Option<DateTime<Utc>>) -> Self {
        self.completed_timestamp = Some(timestamp);
        self
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn category(mut self, category: Option<impl Into<String>>) -> Self {
        self.category = Some(category.map(Into::into));
        self
    }

    pub fn due_date(mut self, due_date: Option<NaiveDate>) -> Self {
        self.due_date = Some(due_date);
        self
    }

    pub fn recurrence(mut self, recurrence: Option<Recurrence>) -> Self {
        self.recurrence = Some(recurrence);
        self
    }

    pub fn parent_recurrence_id(mut self, parent: Option<impl Into<TaskId>>) -> Self {
        self.parent_recurrence_id = Some(parent.map(Into::into));
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Build a patch from raw field values.
    ///
    /// `id` and `created_timestamp` are dropped without error; they can never
    /// change. `title` and unknown keys are rejected.
    pub fn from_record(fields: &TaskRecord) -> TaskResult<Self> {
        let mut patch = TaskPatch::new();
        for key in fields.keys() {
            match key.as_str() {
                record::KEY_ID | record::KEY_CREATED => {
                    tracing::debug!(field = %key, "ignoring patch of immutable field");
                }
                record::KEY_STATUS => {
                    let value = record::text_field(fields, key)?.unwrap_or_default();
                    patch.status = Some(value.parse()?);
                }
                record::KEY_COMPLETED => {
                    patch.completed_timestamp = Some(record::timestamp_field(fields, key)?);
                }
                record::KEY_PRIORITY => {
                    let value = record::text_field(fields, key)?.unwrap_or_default();
                    patch.priority = Some(validators::validate_priority(value)?);
                }
                record::KEY_CATEGORY => {
                    let value = record::text_field(fields, key)?;
                    patch.category = Some(validators::validate_category(value)?);
                }
                record::KEY_DUE_DATE => {
                    patch.due_date = Some(record::date_field(fields, key)?);
                }
                record::KEY_RECURRENCE => {
                    let value = record::text_field(fields, key)?;
                    patch.recurrence = Some(validators::validate_recurrence(value)?);
                }
                record::KEY_PARENT => {
                    let value = record::text_field(fields, key)?;
                    patch.parent_recurrence_id = Some(value.map(str::to_string));
                }
                record::KEY_TITLE => {
                    tracing::warn!(field = %key, "rejected patch of task title");
                    return Err(TaskError::invalid_value("Title cannot be changed after creation"));
                }
                other => {
                    tracing::warn!(field = %other, "rejected patch of unknown field");
                    return Err(TaskError::invalid_value(format!("Unknown task field '{}'", other)));
                }
            }
        }
        Ok(patch)
    }

    /// Apply to a task. Everything that can fail is checked before the task
    /// is touched.
    pub fn apply(&self, task: &mut Task) -> TaskResult<()> {
        let category = match &self.category {
            Some(value) => Some(validators::validate_category(value.as_deref())?),
            None => None,
        };

        if let Some(status) = self.status {
            task.set_status(status);
        }
        if let Some(timestamp) = self.completed_timestamp {
            task.set_completed_timestamp(timestamp);
        }
        if let Some(priority) = self.priority {
            task.set_priority(priority);
        }
        if let Some(category) = category {
            task.set_category(category.as_deref())?;
        }
        if let Some(due_date) = self.due_date {
            task.set_due_date(due_date);
        }
        if let Some(recurrence) = self.recurrence {
            task.set_recurrence(recurrence);
        }
        if let Some(parent) = &self.parent_recurrence_id {
            task.set_parent_recurrence_id(parent.clone());
        }
        Ok(())
    }
}

/// Ordered, in-memory task collection with sequential ID assignment.
///
/// IDs are never reused while the storage lives, even after a delete;
/// [`TaskStorage::clear`] starts the sequence over.
#[derive(Debug, Default)]
pub struct TaskStorage {
    tasks: Vec<Task>,
    counter: u64,
}

impl TaskStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn format_id(n: u64) -> TaskId {
        format!("{}{:03}", validators::TASK_ID_PREFIX, n)
    }

    /// Store a task under the next ID, whatever ID it carried before.
    pub fn create(&mut self, task: Task) -> TaskResult<&Task> {
        let id = Self::format_id(self.counter + 1);
        let task = task.with_id(id)?;
        self.counter += 1;
        tracing::debug!(task_id = %task.id(), "task stored");
        self.tasks.push(task);
        Ok(&self.tasks[self.tasks.len() - 1])
    }

    pub fn read(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id() == id)
    }

    pub(crate) fn read_mut(&mut self, id: &str) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id() == id)
    }

    /// All tasks in creation order.
    pub fn read_all(&self) -> &[Task] {
        &self.tasks
    }

    pub(crate) fn read_all_mut(&mut self) -> &mut [Task] {
        &mut self.tasks
    }

    pub fn update(&mut self, id: &str, patch: &TaskPatch) -> TaskResult<&Task> {
        let task = self
            .read_mut(id)
            .ok_or_else(|| TaskError::NotFound(id.to_string()))?;
        if let Err(e) = patch.apply(task) {
            tracing::warn!(task_id = %id, error = %e, "patch rejected");
            return Err(e);
        }
        tracing::debug!(task_id = %id, "task updated");
        Ok(&*task)
    }

    pub fn delete(&mut self, id: &str) -> bool {
        match self.tasks.iter().position(|t| t.id() == id) {
            Some(index) => {
                self.tasks.remove(index);
                tracing::debug!(task_id = %id, "task deleted");
                true
            }
            None => false,
        }
    }

    /// Drop every task and restart ID assignment.
    pub fn clear(&mut self) {
        self.tasks.clear();
        self.counter = 0;
    }

    /// The ID the next `create` will assign.
    pub fn next_task_id(&self) -> TaskId {
        Self::format_id(self.counter + 1)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::FieldValue;

    fn draft(title: &str) -> Task {
        Task::new("task-000", title).unwrap()
    }

    #[test]
    fn test_create_assigns_sequential_ids() {
        let mut storage = TaskStorage::new();
        assert_eq!(storage.next_task_id(), "task-001");

        assert_eq!(storage.create(draft("One")).unwrap().id(), "task-001");
        assert_eq!(storage.create(draft("Two")).unwrap().id(), "task-002");
        assert_eq!(storage.next_task_id(), "task-003");
        assert_eq!(storage.len(), 2);
    }

    #[test]
    fn test_ids_not_reused_after_delete() {
        let mut storage = TaskStorage::new();
        storage.create(draft("One")).unwrap();
        storage.create(draft("Two")).unwrap();

        assert!(storage.delete("task-002"));
        assert!(!storage.delete("task-002"));
        assert_eq!(storage.create(draft("Three")).unwrap().id(), "task-003");
    }

    #[test]
    fn test_clear_resets_counter() {
        let mut storage = TaskStorage::new();
        storage.create(draft("One")).unwrap();
        storage.clear();
        assert!(storage.is_empty());
        assert_eq!(storage.create(draft("Again")).unwrap().id(), "task-001");
    }

    #[test]
    fn test_read_all_keeps_creation_order() {
        let mut storage = TaskStorage::new();
        for title in ["a", "b", "c"] {
            storage.create(draft(title)).unwrap();
        }
        storage.delete("task-002");
        let titles: Vec<_> = storage.read_all().iter().map(|t| t.title()).collect();
        assert_eq!(titles, vec!["a", "c"]);
        assert!(storage.read("task-002").is_none());
        assert_eq!(storage.read("task-003").unwrap().title(), "c");
    }

    #[test]
    fn test_update_missing_task() {
        let mut storage = TaskStorage::new();
        let err = storage
            .update("task-404", &TaskPatch::new().priority(Priority::High))
            .unwrap_err();
        assert_eq!(err, TaskError::NotFound("task-404".to_string()));
    }

    #[test]
    fn test_update_applies_patch() {
        let mut storage = TaskStorage::new();
        storage.create(draft("Patch me")).unwrap();

        let due = NaiveDate::from_ymd_opt(2025, 5, 1);
        let patch = TaskPatch::new()
            .priority(Priority::Low)
            .category(Some("errands"))
            .due_date(due)
            .recurrence(Some(Recurrence::Weekly));
        let task = storage.update("task-001", &patch).unwrap();

        assert_eq!(task.priority(), Priority::Low);
        assert_eq!(task.category(), Some("errands"));
        assert_eq!(task.due_date(), due);
        assert_eq!(task.recurrence(), Some(Recurrence::Weekly));
        assert_eq!(task.title(), "Patch me");
    }

    #[test]
    fn test_update_is_all_or_nothing() {
        let mut storage = TaskStorage::new();
        storage.create(draft("Keep me")).unwrap();

        let patch = TaskPatch::new()
            .status(Status::Completed)
            .category(Some("x".repeat(51)));
        assert!(storage.update("task-001", &patch).is_err());

        let task = storage.read("task-001").unwrap();
        assert_eq!(task.status(), Status::Pending);
        assert_eq!(task.completed_timestamp(), None);
    }

    #[test]
    fn test_patch_from_record() {
        let mut fields = TaskRecord::new();
        fields.insert("id".into(), "task-999".into());
        fields.insert("created_timestamp".into(), "2020-01-01T00:00:00Z".into());
        fields.insert("priority".into(), "high".into());
        fields.insert("category".into(), FieldValue::Null);

        let patch = TaskPatch::from_record(&fields).unwrap();
        assert_eq!(patch.priority, Some(Priority::High));
        assert_eq!(patch.category, Some(None));
        assert_eq!(patch.status, None);
    }

    #[test]
    fn test_patch_from_record_rejects_title_and_unknown_fields() {
        let mut fields = TaskRecord::new();
        fields.insert("title".into(), "New title".into());
        assert!(matches!(
            TaskPatch::from_record(&fields),
            Err(TaskError::InvalidValue(_))
        ));

        let mut fields = TaskRecord::new();
        fields.insert("colour".into(), "red".into());
        assert!(matches!(
            TaskPatch::from_record(&fields),
            Err(TaskError::InvalidValue(_))
        ));
    }

    #[test]
    fn test_immutable_fields_survive_record_patch() {
        let mut storage = TaskStorage::new();
        let created = storage.create(draft("Stable")).unwrap().created_timestamp();

        let mut fields = TaskRecord::new();
        fields.insert("id".into(), "task-777".into());
        fields.insert("created_timestamp".into(), "2001-01-01T00:00:00Z".into());
        let patch = TaskPatch::from_record(&fields).unwrap();
        assert!(patch.is_empty());

        let task = storage.update("task-001", &patch).unwrap();
        assert_eq!(task.id(), "task-001");
        assert_eq!(task.created_timestamp(), created);
    }
}
