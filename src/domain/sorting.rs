use crate::domain::task::Task;
use crate::error::KanbanError;
use icu_collator::{Collator, CollatorOptions};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Keys a list can be sorted by
///
/// Each key carries its own direction: `Name` and `Created` sort ascending,
/// `Updated` sorts newest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Name,
    Created,
    Updated,
}

impl FromStr for SortOrder {
    type Err = KanbanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "name" => Ok(SortOrder::Name),
            "created" => Ok(SortOrder::Created),
            "updated" => Ok(SortOrder::Updated),
            _ => Err(KanbanError::InvalidSortOrder(s.to_string())),
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name => write!(f, "name"),
            Self::Created => write!(f, "created"),
            Self::Updated => write!(f, "updated"),
        }
    }
}

/// Sorts tasks in place by the given key.
///
/// The sort is stable, so tasks that compare equal keep their relative order.
///
/// # Examples
/// ```
/// use kanban_core::domain::sorting::{sort_tasks, SortOrder};
/// use kanban_core::domain::task::Task;
///
/// let mut tasks = vec![
///     Task::new("Zebra".to_string(), String::new()),
///     Task::new("Apple".to_string(), String::new()),
///     Task::new("Banana".to_string(), String::new()),
/// ];
///
/// sort_tasks(&mut tasks, SortOrder::Name);
/// assert_eq!(tasks[0].name, "Apple");
/// ```
pub fn sort_tasks(tasks: &mut [Task], order: SortOrder) {
    match order {
        SortOrder::Name => {
            let collator = name_collator();
            tasks.sort_by(|a, b| compare_names(collator.as_ref(), &a.name, &b.name));
        }
        SortOrder::Created => tasks.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
        SortOrder::Updated => tasks.sort_by(|a, b| b.updated_at.cmp(&a.updated_at)),
    }
}

/// Root-locale collator with default (tertiary) strength
fn name_collator() -> Option<Collator> {
    match Collator::try_new(&Default::default(), CollatorOptions::new()) {
        Ok(collator) => Some(collator),
        Err(e) => {
            log::warn!(
                "[kanban.sort.name] Collator unavailable, sorting by lowercase code point: {:?}",
                e
            );
            None
        }
    }
}

/// Locale-aware name comparison
///
/// Accented letters sort next to their base letter and, for otherwise equal
/// names, lowercase sorts before uppercase.
fn compare_names(collator: Option<&Collator>, a: &str, b: &str) -> Ordering {
    match collator {
        Some(collator) => collator.compare(a, b),
        None => a
            .chars()
            .flat_map(char::to_lowercase)
            .cmp(b.chars().flat_map(char::to_lowercase))
            .then_with(|| b.cmp(a)),
    }
}
