//! Application state and logic.

use crate::config::Config;
use crossterm::event::{KeyCode, KeyEvent};
use std::collections::BTreeMap;
use task_core::query::{category, filter, search, sort, SortField, TaskFilter};
use task_core::{
    today, validators, CompletionStats, Recurrence, Status, Task, TaskDraft, TaskId, TaskPatch, TaskResult,
    TaskService, TaskStats,
};

pub struct App {
    pub service: TaskService,
    pub config: Config,
    pub view: View,
    /// IDs of the tasks the current view shows, in display order.
    pub visible: Vec<TaskId>,
    /// Number of leading `visible` entries that are overdue (agenda view).
    pub overdue_count: usize,
    pub selected_index: usize,
    pub filter: Filter,
    pub sort_field: SortField,
    pub sort_ascending: bool,
    pub editing: bool,
    pub input_buffer: String,
    pub input_field: InputField,
    pub message: Option<String>,
    pub show_help: bool,
    pub show_completed: bool,
    pub stats: TaskStats,
    pub completion: CompletionStats,
    pub categories: BTreeMap<String, usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    List,
    Board,
    Categories,
    Agenda,
}

#[derive(Debug, Clone, Default)]
pub struct Filter {
    pub status: Option<Status>,
    pub search: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputField {
    None,
    TaskTitle,
    Category,
    DueDate,
    RenameCategory,
    Search,
}

impl App {
    pub fn new(config: Config) -> Self {
        let mut app = Self {
            service: TaskService::default(),
            view: View::List,
            visible: Vec::new(),
            overdue_count: 0,
            selected_index: 0,
            filter: Filter::default(),
            sort_field: config.sorting.field(),
            sort_ascending: config.sorting.ascending,
            editing: false,
            input_buffer: String::new(),
            input_field: InputField::None,
            message: None,
            show_help: false,
            show_completed: config.display.show_completed,
            stats: TaskStats::default(),
            completion: CompletionStats::default(),
            categories: BTreeMap::new(),
            config,
        };
        app.refresh();
        app
    }

    /// Recompute the visible tasks and the statistics.
    pub fn refresh(&mut self) {
        let today = today();
        let all = self.service.get_all_tasks();

        let mut criteria = TaskFilter::new();
        if let Some(status) = self.filter.status {
            criteria = criteria.status(status);
        } else if !self.show_completed && self.view != View::Board {
            criteria = criteria.status(Status::Pending);
        }

        let mut overdue_count = 0;
        let tasks: Vec<&Task> = match self.view {
            View::Agenda => {
                let mut tasks = self.service.overdue_tasks_on(today);
                overdue_count = tasks.len();
                tasks.extend(self.service.upcoming_tasks_on(self.config.filters.upcoming_days, today));
                tasks
            }
            _ => filter::filter_tasks_on(all, &criteria, today),
        };

        let tasks = if self.filter.search.trim().is_empty() || self.view == View::Agenda {
            tasks
        } else {
            search::search_tasks(tasks, &self.filter.search).unwrap_or_default()
        };

        let tasks = match self.view {
            View::List => sort::sort_by_field(tasks, self.sort_field, self.sort_ascending),
            View::Board => sort::sort_pending_first(tasks),
            View::Categories => sort::sort_by_category(tasks, false),
            View::Agenda => tasks,
        };

        self.visible = tasks.iter().map(|t| t.id().to_string()).collect();
        self.overdue_count = overdue_count;
        self.stats = TaskStats::collect(all, today);
        self.completion = self.service.completion_stats();
        self.categories = category::category_summary(all);

        if self.selected_index >= self.visible.len() {
            self.selected_index = self.visible.len().saturating_sub(1);
        }
    }

    /// Tasks the current view shows, in display order.
    pub fn visible_tasks(&self) -> Vec<&Task> {
        self.visible
            .iter()
            .filter_map(|id| self.service.get_task(id))
            .collect()
    }

    pub fn selected_id(&self) -> Option<TaskId> {
        self.visible.get(self.selected_index).cloned()
    }

    pub fn can_quit(&self) -> bool {
        !self.editing
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        self.message = None;

        if self.show_help {
            self.show_help = false;
            return;
        }

        if self.editing {
            self.handle_edit_key(key);
            return;
        }

        match key.code {
            KeyCode::Char('j') | KeyCode::Down => self.move_selection(1),
            KeyCode::Char('k') | KeyCode::Up => self.move_selection(-1),
            KeyCode::Char('g') => self.selected_index = 0,
            KeyCode::Char('G') => self.selected_index = self.visible.len().saturating_sub(1),
            KeyCode::Char('1') => self.switch_view(View::List),
            KeyCode::Char('2') => self.switch_view(View::Board),
            KeyCode::Char('3') => self.switch_view(View::Categories),
            KeyCode::Char('4') => self.switch_view(View::Agenda),
            KeyCode::Char('a') => self.start_input(InputField::TaskTitle, String::new()),
            KeyCode::Enter | KeyCode::Char(' ') => self.toggle_complete(),
            KeyCode::Char('d') => self.delete_selected(),
            KeyCode::Char('p') => self.cycle_priority(),
            KeyCode::Char('r') => self.cycle_recurrence(),
            KeyCode::Char('C') => self.start_edit_category(),
            KeyCode::Char('D') => self.start_edit_due_date(),
            KeyCode::Char('R') => self.start_rename_category(),
            KeyCode::Char('/') => self.start_input(InputField::Search, self.filter.search.clone()),
            KeyCode::Char('f') => self.cycle_status_filter(),
            KeyCode::Char('s') => self.cycle_sort_field(),
            KeyCode::Char('S') => self.toggle_sort_direction(),
            KeyCode::Char('c') => self.toggle_show_completed(),
            KeyCode::Char('?') => self.show_help = true,
            KeyCode::Esc => {
                self.filter = Filter::default();
                self.refresh();
            }
            _ => {}
        }
    }

    fn handle_edit_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                if self.input_field == InputField::Search {
                    self.filter.search.clear();
                    self.refresh();
                }
                self.stop_input();
            }
            KeyCode::Enter => self.finish_editing(),
            KeyCode::Backspace => {
                self.input_buffer.pop();
                self.live_search();
            }
            KeyCode::Char(c) => {
                self.input_buffer.push(c);
                self.live_search();
            }
            _ => {}
        }
    }

    fn live_search(&mut self) {
        if self.input_field == InputField::Search {
            self.filter.search = self.input_buffer.clone();
            self.refresh();
        }
    }

    fn start_input(&mut self, field: InputField, initial: String) {
        self.editing = true;
        self.input_field = field;
        self.input_buffer = initial;
    }

    fn stop_input(&mut self) {
        self.editing = false;
        self.input_buffer.clear();
        self.input_field = InputField::None;
    }

    fn finish_editing(&mut self) {
        let input = std::mem::take(&mut self.input_buffer);
        let field = self.input_field;
        self.stop_input();

        match field {
            InputField::TaskTitle => {
                if input.trim().is_empty() {
                    return;
                }
                let draft = TaskDraft::new(input)
                    .priority(self.config.defaults.default_priority)
                    .category(self.config.defaults.default_category.clone());
                let outcome = self
                    .service
                    .create_task(draft)
                    .map(|t| format!("Created {}", t.id()));
                self.report(outcome);
            }
            InputField::Category => {
                let Some(id) = self.selected_id() else { return };
                let patch = TaskPatch::new().category(Some(input.trim()));
                let outcome = self.service.update_task(&id, &patch).map(|t| {
                    format!("Category: {}", t.category().unwrap_or("none"))
                });
                self.report(outcome);
            }
            InputField::DueDate => {
                let Some(id) = self.selected_id() else { return };
                let outcome = validators::validate_due_date(Some(input.trim())).and_then(|due| {
                    let task = self.service.update_task(&id, &TaskPatch::new().due_date(due))?;
                    Ok(match task.due_date() {
                        Some(date) => format!("Due: {}", self.config.display.format_date(date)),
                        None => "Due date cleared".to_string(),
                    })
                });
                self.report(outcome);
            }
            InputField::RenameCategory => {
                let Some(old) = self.selected_category() else { return };
                let outcome = self
                    .service
                    .rename_category(&old, input.trim())
                    .map(|n| format!("Renamed {} on {} task(s)", old, n));
                self.report(outcome);
            }
            InputField::Search => {
                self.filter.search = input;
                self.refresh();
            }
            InputField::None => {}
        }
    }

    /// Show the outcome of an action and refresh the views.
    fn report(&mut self, outcome: TaskResult<String>) {
        self.message = Some(match outcome {
            Ok(message) => message,
            Err(e) => e.to_string(),
        });
        self.refresh();
    }

    fn move_selection(&mut self, delta: i32) {
        let len = self.visible.len();
        if len == 0 {
            return;
        }
        let new_idx = self.selected_index as i32 + delta;
        self.selected_index = new_idx.clamp(0, len as i32 - 1) as usize;
    }

    fn switch_view(&mut self, view: View) {
        self.view = view;
        self.selected_index = 0;
        self.refresh();
    }

    fn selected_category(&self) -> Option<String> {
        let id = self.selected_id()?;
        self.service.get_task(&id)?.category().map(str::to_string)
    }

    fn start_edit_category(&mut self) {
        if self.selected_id().is_some() {
            let current = self.selected_category().unwrap_or_default();
            self.start_input(InputField::Category, current);
        }
    }

    fn start_edit_due_date(&mut self) {
        let Some(id) = self.selected_id() else { return };
        let current = self
            .service
            .get_task(&id)
            .and_then(Task::due_date)
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default();
        self.start_input(InputField::DueDate, current);
    }

    fn start_rename_category(&mut self) {
        match self.selected_category() {
            Some(current) => self.start_input(InputField::RenameCategory, current),
            None => self.message = Some("Selected task has no category".to_string()),
        }
    }

    fn toggle_complete(&mut self) {
        let Some(id) = self.selected_id() else { return };
        let outcome = self
            .service
            .toggle_complete(&id)
            .map(|t| format!("Status: {}", t.status().label()));
        self.report(outcome);
    }

    fn delete_selected(&mut self) {
        let Some(id) = self.selected_id() else { return };
        if self.service.delete_task(&id) {
            self.message = Some(format!("Deleted {}", id));
        }
        self.refresh();
    }

    fn cycle_priority(&mut self) {
        let Some(id) = self.selected_id() else { return };
        let Some(next) = self.service.get_task(&id).map(|t| t.priority().next()) else { return };
        let outcome = self
            .service
            .update_task(&id, &TaskPatch::new().priority(next))
            .map(|t| format!("Priority: {}", t.priority().label()));
        self.report(outcome);
    }

    fn cycle_recurrence(&mut self) {
        let Some(id) = self.selected_id() else { return };
        let Some(current) = self.service.get_task(&id).map(Task::recurrence) else { return };
        let next = match current {
            None => Some(Recurrence::Daily),
            Some(Recurrence::Daily) => Some(Recurrence::Weekly),
            Some(Recurrence::Weekly) => Some(Recurrence::Monthly),
            Some(Recurrence::Monthly) => None,
        };
        let outcome = self
            .service
            .update_task(&id, &TaskPatch::new().recurrence(next))
            .map(|t| format!("Repeats: {}", t.recurrence().map_or("never", |r| r.label())));
        self.report(outcome);
    }

    fn cycle_status_filter(&mut self) {
        self.filter.status = match self.filter.status {
            None => Some(Status::Pending),
            Some(Status::Pending) => Some(Status::Completed),
            Some(Status::Completed) => None,
        };
        self.message = Some(format!(
            "Filter: {}",
            self.filter.status.map_or("all", |s| s.label())
        ));
        self.refresh();
    }

    fn cycle_sort_field(&mut self) {
        self.sort_field = self.sort_field.next();
        self.message = Some(format!("Sort: {}", self.sort_field.label()));
        self.refresh();
    }

    fn toggle_sort_direction(&mut self) {
        self.sort_ascending = !self.sort_ascending;
        self.message = Some(if self.sort_ascending {
            "Ascending".to_string()
        } else {
            "Descending".to_string()
        });
        self.refresh();
    }

    fn toggle_show_completed(&mut self) {
        self.show_completed = !self.show_completed;
        self.refresh();
        self.message = Some(if self.show_completed {
            "Showing completed tasks".to_string()
        } else {
            "Hiding completed tasks".to_string()
        });
    }

    /// Copy the session's view preferences into the config so they can be
    /// saved on exit.
    pub fn remember_preferences(&mut self) {
        self.config.sorting.default_sort = self.sort_field.as_str().to_string();
        self.config.sorting.ascending = self.sort_ascending;
        self.config.display.show_completed = self.show_completed;
    }

    pub fn visible_by_status(&self, status: Status) -> Vec<&Task> {
        self.visible_tasks()
            .into_iter()
            .filter(|t| t.status() == status)
            .collect()
    }
}
