//! Stateless queries over task sequences.
//!
//! Every query takes any iterator of `&Task` and returns a `Vec<&Task>` (or a
//! summary), so they chain: filter, then search, then sort.

pub mod category;
pub mod filter;
pub mod priority;
pub mod search;
pub mod sort;

pub use filter::{filter_tasks, filter_tasks_on, FilterOptions, GroupField, TaskFilter, UNCATEGORIZED};
pub use priority::PrioritySummary;
pub use search::{search_tasks, SearchStats};
pub use sort::{multi_sort, sort_by_field, SortField};
