use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::model::state::{AppState, Filter};
use crate::model::todo::Priority;

/// Dashboard counts over the whole list, independent of filter, search and sort
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoStats {
    pub total: usize,
    pub completed: usize,
    pub active: usize,
    /// Rounded percentage of completed todos; 0 for an empty list
    pub percent_completed: u32,
    /// Active todos per priority
    pub high_priority: usize,
    pub medium_priority: usize,
    pub low_priority: usize,
    pub overdue: usize,
}

impl TodoStats {
    pub fn has_todos(&self) -> bool {
        self.total > 0
    }

    pub fn can_clear_completed(&self) -> bool {
        self.completed > 0
    }

    pub fn can_mark_all_completed(&self) -> bool {
        self.active > 0
    }

    /// Badge count shown next to a filter button
    pub fn count_for(&self, filter: Filter) -> usize {
        match filter {
            Filter::All => self.total,
            Filter::Active => self.active,
            Filter::Completed => self.completed,
            Filter::High => self.high_priority,
            Filter::Medium => self.medium_priority,
            Filter::Low => self.low_priority,
        }
    }
}

/// Stats as of the current moment
pub fn compute_stats(state: &AppState) -> TodoStats {
    compute_stats_at(state, Utc::now())
}

/// Stats with overdue measured against `now`
pub fn compute_stats_at(state: &AppState, now: DateTime<Utc>) -> TodoStats {
    let mut stats = TodoStats {
        total: state.items.len(),
        ..Default::default()
    };

    for todo in &state.items {
        if todo.completed {
            stats.completed += 1;
            continue;
        }
        match todo.priority {
            Priority::High => stats.high_priority += 1,
            Priority::Medium => stats.medium_priority += 1,
            Priority::Low => stats.low_priority += 1,
        }
        if todo.is_overdue_at(now) {
            stats.overdue += 1;
        }
    }

    stats.active = stats.total - stats.completed;
    stats.percent_completed = percent(stats.completed, stats.total);
    stats
}

fn percent(part: usize, whole: usize) -> u32 {
    if whole == 0 {
        return 0;
    }
    // Half rounds up, as the dashboard always has
    (part as f64 / whole as f64 * 100.0).round() as u32
}
