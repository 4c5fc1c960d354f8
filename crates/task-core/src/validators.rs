//! Field-level validation for task data.
//!
//! Every validator is a pure function: it either returns the normalized value
//! or the first constraint it violates. Nothing here holds state, so the same
//! checks run at task construction and again wherever a query accepts a raw
//! value from a caller.

use crate::error::{TaskError, TaskResult};
use crate::models::{Priority, Recurrence};
use chrono::NaiveDate;

/// Maximum title length in characters.
pub const MAX_TITLE_LEN: usize = 255;
/// Maximum category length in characters.
pub const MAX_CATEGORY_LEN: usize = 50;
/// Prefix every task ID starts with.
pub const TASK_ID_PREFIX: &str = "task-";

/// Validate a priority name (`high`, `medium`, `low`). Case-sensitive.
pub fn validate_priority(value: &str) -> TaskResult<Priority> {
    Priority::from_name(value).ok_or_else(|| {
        TaskError::invalid_value(format!(
            "Invalid priority. Must be high, medium, or low (got '{}')",
            value
        ))
    })
}

/// Validate a category. `None` and `""` are valid and normalize to `None`.
pub fn validate_category(value: Option<&str>) -> TaskResult<Option<String>> {
    match value {
        None | Some("") => Ok(None),
        Some(category) => {
            let len = category.chars().count();
            if len > MAX_CATEGORY_LEN {
                return Err(TaskError::invalid_value(format!(
                    "Category must be {} characters or less (got {} characters)",
                    MAX_CATEGORY_LEN, len
                )));
            }
            Ok(Some(category.to_string()))
        }
    }
}

/// Validate a due date string in strict `YYYY-MM-DD` form.
///
/// Shape problems (wrong separators, non-digits, month outside 1-12, day 0)
/// are `InvalidFormat`. A well-formed date whose day does not exist in that
/// month, such as `2023-02-29`, is `InvalidValue`.
pub fn validate_due_date(value: Option<&str>) -> TaskResult<Option<NaiveDate>> {
    let text = match value {
        None | Some("") => return Ok(None),
        Some(text) => text,
    };

    let format_error =
        || TaskError::invalid_format(format!("Invalid date format. Use YYYY-MM-DD (got '{}')", text));

    let bytes = text.as_bytes();
    let shaped = bytes.len() == 10
        && bytes[4] == b'-'
        && bytes[7] == b'-'
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit());
    if !shaped {
        return Err(format_error());
    }

    let year: i32 = text[0..4].parse().map_err(|_| format_error())?;
    let month: u32 = text[5..7].parse().map_err(|_| format_error())?;
    let day: u32 = text[8..10].parse().map_err(|_| format_error())?;
    if !(1..=12).contains(&month) || day == 0 {
        return Err(format_error());
    }

    let max_day = days_in_month(year, month);
    if day > max_day {
        return Err(TaskError::invalid_value(format!(
            "Invalid date. {}/{}/{} does not exist",
            month, day, year
        )));
    }

    NaiveDate::from_ymd_opt(year, month, day)
        .map(Some)
        .ok_or_else(format_error)
}

/// Validate a recurrence name. `None` and `""` mean "not recurring".
pub fn validate_recurrence(value: Option<&str>) -> TaskResult<Option<Recurrence>> {
    match value {
        None | Some("") => Ok(None),
        Some(name) => Recurrence::from_name(name).map(Some).ok_or_else(|| {
            TaskError::invalid_value(format!(
                "Invalid recurrence. Must be daily, weekly, or monthly (got '{}')",
                name
            ))
        }),
    }
}

/// Validate a task title: 1-255 characters with at least one non-whitespace
/// character.
pub fn validate_task_title(title: &str) -> TaskResult<()> {
    let len = title.chars().count();
    if len == 0 || len > MAX_TITLE_LEN {
        return Err(TaskError::invalid_value(format!(
            "Title must be 1-{} characters (got {})",
            MAX_TITLE_LEN, len
        )));
    }
    if title.trim().is_empty() {
        return Err(TaskError::invalid_value("Title cannot be whitespace only"));
    }
    Ok(())
}

/// Validate a task ID of the form `task-NNN`.
pub fn validate_task_id(id: &str) -> TaskResult<()> {
    let digits = id.strip_prefix(TASK_ID_PREFIX).ok_or_else(|| {
        TaskError::invalid_value(format!("ID must start with '{}' (got '{}')", TASK_ID_PREFIX, id))
    })?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(TaskError::invalid_value(format!(
            "ID format must be 'task-NNN' where NNN is a number (got '{}')",
            id
        )));
    }
    Ok(())
}

/// Gregorian leap year rule.
pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Number of days in `month` (1-12) of `year`. Returns 0 for an invalid month.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_priority() {
        assert_eq!(validate_priority("high").unwrap(), Priority::High);
        assert_eq!(validate_priority("medium").unwrap(), Priority::Medium);
        assert_eq!(validate_priority("low").unwrap(), Priority::Low);

        // No case folding.
        assert!(matches!(validate_priority("High"), Err(TaskError::InvalidValue(_))));
        assert!(matches!(validate_priority("urgent"), Err(TaskError::InvalidValue(_))));
        assert!(matches!(validate_priority(""), Err(TaskError::InvalidValue(_))));
    }

    #[test]
    fn test_validate_category_boundaries() {
        assert_eq!(validate_category(None).unwrap(), None);
        assert_eq!(validate_category(Some("")).unwrap(), None);
        assert_eq!(validate_category(Some("work")).unwrap(), Some("work".to_string()));

        let fifty = "a".repeat(50);
        assert_eq!(validate_category(Some(&fifty)).unwrap(), Some(fifty.clone()));

        let fifty_one = "a".repeat(51);
        assert!(matches!(
            validate_category(Some(&fifty_one)),
            Err(TaskError::InvalidValue(_))
        ));
    }

    #[test]
    fn test_validate_due_date_valid() {
        assert_eq!(validate_due_date(None).unwrap(), None);
        assert_eq!(validate_due_date(Some("")).unwrap(), None);
        assert_eq!(
            validate_due_date(Some("2025-01-31")).unwrap(),
            NaiveDate::from_ymd_opt(2025, 1, 31)
        );
        assert_eq!(
            validate_due_date(Some("2024-02-29")).unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 29)
        );
    }

    #[test]
    fn test_validate_due_date_bad_format() {
        for text in ["2025/01/31", "25-01-31", "2025-1-31", "tomorrow", "2025-01-31x", "2025-13-01", "2025-01-00"] {
            assert!(
                matches!(validate_due_date(Some(text)), Err(TaskError::InvalidFormat(_))),
                "{} should be a format error",
                text
            );
        }
    }

    #[test]
    fn test_validate_due_date_nonexistent_day() {
        for text in ["2023-02-29", "2025-02-30", "2025-04-31", "2100-02-29"] {
            assert!(
                matches!(validate_due_date(Some(text)), Err(TaskError::InvalidValue(_))),
                "{} should not exist",
                text
            );
        }
        // 2000 is divisible by 400.
        assert!(validate_due_date(Some("2000-02-29")).is_ok());
    }

    #[test]
    fn test_validate_recurrence() {
        assert_eq!(validate_recurrence(None).unwrap(), None);
        assert_eq!(validate_recurrence(Some("")).unwrap(), None);
        assert_eq!(validate_recurrence(Some("weekly")).unwrap(), Some(Recurrence::Weekly));
        assert!(matches!(
            validate_recurrence(Some("yearly")),
            Err(TaskError::InvalidValue(_))
        ));
    }

    #[test]
    fn test_validate_task_title() {
        assert!(validate_task_title("Buy milk").is_ok());
        assert!(validate_task_title(&"x".repeat(255)).is_ok());

        assert!(matches!(validate_task_title(""), Err(TaskError::InvalidValue(_))));
        assert!(matches!(validate_task_title("   \t"), Err(TaskError::InvalidValue(_))));
        assert!(matches!(
            validate_task_title(&"x".repeat(256)),
            Err(TaskError::InvalidValue(_))
        ));
    }

    #[test]
    fn test_validate_task_id() {
        assert!(validate_task_id("task-001").is_ok());
        assert!(validate_task_id("task-1234").is_ok());

        assert!(validate_task_id("001").is_err());
        assert!(validate_task_id("task-").is_err());
        assert!(validate_task_id("task-01a").is_err());
        assert!(validate_task_id("task-001-2").is_err());
        assert!(validate_task_id("Task-001").is_err());
    }

    #[test]
    fn test_days_in_month() {
        assert_eq!(days_in_month(2025, 1), 31);
        assert_eq!(days_in_month(2025, 2), 28);
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(1900, 2), 28);
        assert_eq!(days_in_month(2000, 2), 29);
        assert_eq!(days_in_month(2025, 4), 30);
        assert_eq!(days_in_month(2025, 13), 0);
    }
}
