use std::cmp::Ordering;
use std::sync::LazyLock;

use icu_collator::options::CollatorOptions;
use icu_collator::{Collator, CollatorBorrowed};
use log::warn;

use crate::model::state::{AppState, Filter, SortBy};
use crate::model::todo::Todo;

/// What the list area should show
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListView<'a> {
    /// There are no todos at all
    NoTodos,
    /// Todos exist, but filter and search hid every one
    NoMatches,
    /// The visible todos, in display order
    Todos(Vec<&'a Todo>),
}

/// The todos to display: filter, then search, then a stable sort.
///
/// Sorting never changes which todos pass; equal sort keys keep their
/// insertion order.
pub fn compute_visible_todos(state: &AppState) -> Vec<&Todo> {
    let query = state.search_query.to_lowercase();

    let mut todos: Vec<&Todo> = state
        .items
        .iter()
        .filter(|t| matches_filter(t, state.filter))
        .filter(|t| matches_search(t, &query))
        .collect();

    sort_todos(&mut todos, state.sort_by);
    todos
}

/// Status-only view: `active` and `completed` apply, any other filter
/// returns everything. No search, insertion order.
pub fn compute_filtered_todos(state: &AppState) -> Vec<&Todo> {
    state
        .items
        .iter()
        .filter(|t| match state.filter {
            Filter::Active => !t.completed,
            Filter::Completed => t.completed,
            _ => true,
        })
        .collect()
}

/// Decide between the two empty states and the list itself
pub fn compute_list_view(state: &AppState) -> ListView<'_> {
    if state.items.is_empty() {
        return ListView::NoTodos;
    }
    let visible = compute_visible_todos(state);
    if visible.is_empty() {
        ListView::NoMatches
    } else {
        ListView::Todos(visible)
    }
}

pub fn matches_filter(todo: &Todo, filter: Filter) -> bool {
    match filter {
        Filter::All => true,
        Filter::Active => !todo.completed,
        Filter::Completed => todo.completed,
        Filter::High | Filter::Medium | Filter::Low => Some(todo.priority) == filter.priority(),
    }
}

/// `query` must already be lower-cased. An empty query matches everything.
fn matches_search(todo: &Todo, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    todo.text.to_lowercase().contains(query)
        || (!todo.notes.is_empty() && todo.notes.to_lowercase().contains(query))
}

fn sort_todos(todos: &mut [&Todo], sort_by: SortBy) {
    // slice::sort_by is stable
    match sort_by {
        SortBy::Priority => todos.sort_by_key(|t| t.priority.rank()),
        SortBy::Name => todos.sort_by(|a, b| compare_names(&a.text, &b.text)),
        SortBy::Date => todos.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
    }
}

/// Root-locale collator at the default (tertiary) strength
static NAME_COLLATOR: LazyLock<Option<CollatorBorrowed<'static>>> = LazyLock::new(|| {
    Collator::try_new(Default::default(), CollatorOptions::default())
        .map_err(|e| warn!("name collator unavailable, sorting by case-folded text: {e}"))
        .ok()
});

/// Natural-language ordering for todo text.
///
/// Accents and case only break ties between otherwise equal letters, so
/// "éclair" sorts among the e's and "apple" sorts just before "Apple".
pub fn compare_names(a: &str, b: &str) -> Ordering {
    match NAME_COLLATOR.as_ref() {
        Some(collator) => collator.compare(a, b),
        None => a.to_lowercase().cmp(&b.to_lowercase()).then_with(|| b.cmp(a)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::todo::{Priority, TodoId};
    use chrono::{Duration, TimeZone, Utc};
    use pretty_assertions::assert_eq;

    fn todo(id: TodoId, text: &str, priority: Priority, completed: bool) -> Todo {
        let base = Utc.with_ymd_and_hms(2025, 5, 1, 12, 0, 0).unwrap();
        let mut t = Todo::new(
            id,
            text.into(),
            priority,
            None,
            String::new(),
            base + Duration::minutes(id),
        );
        t.completed = completed;
        t
    }

    fn sample_state() -> AppState {
        AppState {
            items: vec![
                todo(1, "Write report", Priority::High, false),
                todo(2, "buy groceries", Priority::Low, true),
                todo(3, "Call plumber", Priority::Medium, false),
                todo(4, "Book flights", Priority::High, true),
                todo(5, "answer email", Priority::Low, false),
            ],
            ..Default::default()
        }
    }

    fn visible_ids(state: &AppState) -> Vec<TodoId> {
        compute_visible_todos(state).iter().map(|t| t.id).collect()
    }

    #[test]
    fn default_view_is_newest_first() {
        assert_eq!(visible_ids(&sample_state()), vec![5, 4, 3, 2, 1]);
    }

    #[test]
    fn status_filters() {
        let mut state = sample_state();
        state.filter = Filter::Active;
        assert_eq!(visible_ids(&state), vec![5, 3, 1]);
        state.filter = Filter::Completed;
        assert_eq!(visible_ids(&state), vec![4, 2]);
    }

    #[test]
    fn priority_filter_ignores_completion() {
        let mut state = sample_state();
        state.filter = Filter::High;
        assert_eq!(visible_ids(&state), vec![4, 1]);
        state.filter = Filter::Low;
        assert_eq!(visible_ids(&state), vec![5, 2]);
    }

    #[test]
    fn priority_sort_is_stable() {
        let mut state = sample_state();
        state.sort_by = SortBy::Priority;
        // Equal priorities keep insertion order: 1 before 4, 2 before 5
        assert_eq!(visible_ids(&state), vec![1, 4, 3, 2, 5]);
    }

    #[test]
    fn name_sort_is_case_insensitive() {
        let mut state = sample_state();
        state.sort_by = SortBy::Name;
        let texts: Vec<&str> = compute_visible_todos(&state)
            .iter()
            .map(|t| t.text.as_str())
            .collect();
        assert_eq!(
            texts,
            vec![
                "answer email",
                "Book flights",
                "buy groceries",
                "Call plumber",
                "Write report"
            ]
        );
    }

    #[test]
    fn compare_names_puts_lowercase_first_on_case_ties() {
        assert_eq!(compare_names("apple", "Apple"), Ordering::Less);
        assert_eq!(compare_names("Apple", "apple"), Ordering::Greater);
        assert_eq!(compare_names("apple", "apple"), Ordering::Equal);
        assert_eq!(compare_names("Banana", "apple"), Ordering::Greater);
    }

    #[test]
    fn name_sort_places_accented_letters_with_their_base_letter() {
        let state = AppState {
            items: vec![
                todo(1, "zebra", Priority::Medium, false),
                todo(2, "éclair", Priority::Medium, false),
                todo(3, "Eagle", Priority::Medium, false),
            ],
            sort_by: SortBy::Name,
            ..Default::default()
        };
        let texts: Vec<&str> = compute_visible_todos(&state)
            .iter()
            .map(|t| t.text.as_str())
            .collect();
        assert_eq!(texts, vec!["Eagle", "éclair", "zebra"]);
    }

    #[test]
    fn compare_names_sorts_punctuation_before_letters() {
        assert_eq!(compare_names("~later", "apple"), Ordering::Less);
        assert_eq!(compare_names("ecole", "école"), Ordering::Less);
        assert_eq!(compare_names("école", "ecrire"), Ordering::Less);
    }

    #[test]
    fn date_sort_keeps_order_for_equal_timestamps() {
        let mut state = sample_state();
        let same = state.items[0].created_at;
        for todo in &mut state.items {
            todo.created_at = same;
            todo.updated_at = same;
        }
        assert_eq!(visible_ids(&state), vec![1, 2, 3, 4, 5]);
        state.filter = Filter::Active;
        assert_eq!(visible_ids(&state), vec![1, 3, 5]);
    }

    #[test]
    fn name_sort_keeps_order_for_equal_text() {
        let state = AppState {
            items: vec![
                todo(7, "Pay rent", Priority::Low, false),
                todo(3, "call mom", Priority::High, false),
                todo(9, "Pay rent", Priority::High, true),
                todo(1, "Pay rent", Priority::Medium, false),
            ],
            sort_by: SortBy::Name,
            ..Default::default()
        };
        assert_eq!(visible_ids(&state), vec![3, 7, 9, 1]);
    }

    #[test]
    fn search_matches_text_and_notes_case_insensitively() {
        let mut state = sample_state();
        state.items[2].notes = "Kitchen sink EMAIL".into();
        state.search_query = "Email".into();
        assert_eq!(visible_ids(&state), vec![5, 3]);
    }

    #[test]
    fn search_is_not_trimmed() {
        let mut state = sample_state();
        state.search_query = " report".into();
        assert_eq!(visible_ids(&state), vec![1]);
        state.search_query = "report ".into();
        assert!(visible_ids(&state).is_empty());
    }

    #[test]
    fn filter_and_search_combine() {
        let mut state = sample_state();
        state.filter = Filter::Completed;
        state.search_query = "BOOK".into();
        assert_eq!(visible_ids(&state), vec![4]);
        state.filter = Filter::Active;
        assert!(visible_ids(&state).is_empty());
    }

    #[test]
    fn visible_is_idempotent() {
        let mut state = sample_state();
        state.sort_by = SortBy::Name;
        state.search_query = "e".into();
        assert_eq!(compute_visible_todos(&state), compute_visible_todos(&state));
    }

    #[test]
    fn filtered_view_ignores_priority_filters_and_search() {
        let mut state = sample_state();
        state.search_query = "nothing matches".into();
        state.filter = Filter::High;
        assert_eq!(compute_filtered_todos(&state).len(), 5);
        state.filter = Filter::Active;
        let ids: Vec<TodoId> = compute_filtered_todos(&state).iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 3, 5]);
    }

    #[test]
    fn list_view_empty_states() {
        let mut state = AppState::default();
        assert_eq!(compute_list_view(&state), ListView::NoTodos);

        state = sample_state();
        state.search_query = "xyz".into();
        assert_eq!(compute_list_view(&state), ListView::NoMatches);

        state.search_query.clear();
        match compute_list_view(&state) {
            ListView::Todos(todos) => assert_eq!(todos.len(), 5),
            other => panic!("expected todos, got {:?}", other),
        }
    }
}
