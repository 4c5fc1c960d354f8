//! Configuration for task manager.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt::Write;
use std::path::PathBuf;
use task_core::query::SortField;
use task_core::Priority;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub defaults: DefaultsConfig,
    #[serde(default)]
    pub sorting: SortingConfig,
    #[serde(default)]
    pub filters: FilterConfig,
}

impl Config {
    /// Load from the config dir. A missing or unreadable file gives the
    /// defaults.
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(_) => return Self::default(),
        };
        match toml::from_str::<Config>(&content) {
            Ok(config) => config.validated(),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "invalid config, using defaults");
                Self::default()
            }
        }
    }

    /// Replace settings that would fail at render time with their defaults.
    pub fn validated(mut self) -> Self {
        if !self.display.date_format_is_valid() {
            tracing::warn!(format = %self.display.date_format, "invalid date format, using default");
            self.display.date_format = default_date_format();
        }
        self
    }

    pub fn save(&self) -> anyhow::Result<()> {
        if let Some(path) = Self::config_path() {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let content = toml::to_string_pretty(self)?;
            std::fs::write(path, content)?;
        }
        Ok(())
    }

    pub fn config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "task-manager")
            .map(|d| d.config_dir().join("config.toml"))
    }

    pub fn log_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "task-manager")
            .map(|d| d.data_dir().join("task-manager.log"))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default)]
    pub show_completed: bool,
    #[serde(default = "default_true")]
    pub show_category: bool,
    #[serde(default = "default_true")]
    pub show_due_date: bool,
    #[serde(default = "default_date_format")]
    pub date_format: String,
}

const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d";

fn default_true() -> bool { true }
fn default_date_format() -> String { DEFAULT_DATE_FORMAT.to_string() }

impl DisplayConfig {
    /// Format with the configured pattern, or ISO when the pattern cannot
    /// render a date.
    pub fn format_date(&self, date: NaiveDate) -> String {
        let mut out = String::new();
        match write!(out, "{}", date.format(&self.date_format)) {
            Ok(()) => out,
            Err(_) => date.format(DEFAULT_DATE_FORMAT).to_string(),
        }
    }

    fn date_format_is_valid(&self) -> bool {
        let mut out = String::new();
        let sample = NaiveDate::default();
        write!(out, "{}", sample.format(&self.date_format)).is_ok()
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            show_completed: false,
            show_category: true,
            show_due_date: true,
            date_format: default_date_format(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DefaultsConfig {
    #[serde(default)]
    pub default_priority: Priority,
    #[serde(default)]
    pub default_category: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SortingConfig {
    #[serde(default = "default_sort_field")]
    pub default_sort: String,
    #[serde(default = "default_true")]
    pub ascending: bool,
}

fn default_sort_field() -> String { SortField::Created.as_str().to_string() }

impl SortingConfig {
    /// The configured sort field. Unknown names fall back to creation order.
    pub fn field(&self) -> SortField {
        SortField::from_name(&self.default_sort).unwrap_or(SortField::Created)
    }
}

impl Default for SortingConfig {
    fn default() -> Self {
        Self {
            default_sort: default_sort_field(),
            ascending: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterConfig {
    #[serde(default = "default_upcoming_days")]
    pub upcoming_days: u32,
}

fn default_upcoming_days() -> u32 { 7 }

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            upcoming_days: default_upcoming_days(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_gives_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert!(!config.display.show_completed);
        assert_eq!(config.display.date_format, "%Y-%m-%d");
        assert_eq!(config.defaults.default_priority, Priority::Medium);
        assert_eq!(config.sorting.field(), SortField::Created);
        assert_eq!(config.filters.upcoming_days, 7);
    }

    #[test]
    fn test_partial_sections() {
        let config: Config = toml::from_str(
            r#"
            [defaults]
            default_priority = "high"
            default_category = "work"

            [sorting]
            default_sort = "due_date"
            ascending = false
            "#,
        )
        .unwrap();
        assert_eq!(config.defaults.default_priority, Priority::High);
        assert_eq!(config.defaults.default_category.as_deref(), Some("work"));
        assert_eq!(config.sorting.field(), SortField::DueDate);
        assert!(!config.sorting.ascending);
        assert!(config.display.show_due_date);
    }

    #[test]
    fn test_unknown_sort_field_falls_back() {
        let sorting = SortingConfig {
            default_sort: "urgency".to_string(),
            ascending: true,
        };
        assert_eq!(sorting.field(), SortField::Created);
    }

    #[test]
    fn test_bad_date_format_falls_back() {
        let mut config = Config::default();
        config.display.date_format = "%Q".to_string();
        let due = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        assert_eq!(config.display.format_date(due), "2025-01-01");

        // Time fields cannot render from a bare date either.
        config.display.date_format = "%H:%M".to_string();
        assert_eq!(config.display.format_date(due), "2025-01-01");

        let config = config.validated();
        assert_eq!(config.display.date_format, "%Y-%m-%d");
    }

    #[test]
    fn test_good_date_format_kept() {
        let mut config = Config::default();
        config.display.date_format = "%d/%m/%Y".to_string();
        let config = config.validated();
        assert_eq!(config.display.date_format, "%d/%m/%Y");
        let due = NaiveDate::from_ymd_opt(2025, 3, 9).unwrap();
        assert_eq!(config.display.format_date(due), "09/03/2025");
    }

    #[test]
    fn test_round_trip() {
        let config = Config::default();
        let text = toml::to_string_pretty(&config).unwrap();
        let back: Config = toml::from_str(&text).unwrap();
        assert_eq!(back.sorting.default_sort, config.sorting.default_sort);
        assert_eq!(back.defaults.default_priority, config.defaults.default_priority);
    }
}
