use std::cell::Cell;

use chrono::{DateTime, NaiveDate, Utc};
use log::{debug, warn};

use crate::model::state::{AppState, Filter, SortBy};
use crate::model::todo::{Priority, Todo, TodoId};
use crate::ops::stats::TodoStats;

// ---------------------------------------------------------------------------
// Time
// ---------------------------------------------------------------------------

/// Source of "now" for timestamps and id generation
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Cell<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        ManualClock {
            now: Cell::new(start),
        }
    }

    pub fn set(&self, now: DateTime<Utc>) {
        self.now.set(now);
    }

    pub fn advance(&self, by: chrono::Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        self.now.get()
    }
}

// ---------------------------------------------------------------------------
// Actions
// ---------------------------------------------------------------------------

/// Fields to overwrite on an existing todo. `None` leaves a field unchanged;
/// `due_date: Some(None)` clears the due date.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoPatch {
    pub text: Option<String>,
    pub priority: Option<Priority>,
    pub due_date: Option<Option<NaiveDate>>,
    pub notes: Option<String>,
}

/// Every transition the store knows about
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Show or hide the form. Hiding also leaves edit mode.
    SetIsAddingTodo(bool),
    SetEditingId(Option<TodoId>),
    /// Append a todo. Text is assumed trimmed and non-empty.
    AddTodo {
        text: String,
        priority: Option<Priority>,
        due_date: Option<NaiveDate>,
        notes: Option<String>,
    },
    DeleteTodo(TodoId),
    UpdateTodo {
        id: TodoId,
        patch: TodoPatch,
    },
    ToggleTodo(TodoId),
    SetFilter(Filter),
    SetSearchQuery(String),
    SetDarkMode(bool),
    SetSortBy(SortBy),
    ClearCompleted,
    /// Complete every todo, regardless of filter or search
    MarkAllCompleted,
    /// Replace all items, e.g. when restoring a saved list
    LoadTodos(Vec<Todo>),
}

impl Action {
    /// Shorthand for an `AddTodo` with default priority, no due date or notes
    pub fn add(text: impl Into<String>) -> Action {
        Action::AddTodo {
            text: text.into(),
            priority: None,
            due_date: None,
            notes: None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Action::SetIsAddingTodo(_) => "set_is_adding_todo",
            Action::SetEditingId(_) => "set_editing_id",
            Action::AddTodo { .. } => "add_todo",
            Action::DeleteTodo(_) => "delete_todo",
            Action::UpdateTodo { .. } => "update_todo",
            Action::ToggleTodo(_) => "toggle_todo",
            Action::SetFilter(_) => "set_filter",
            Action::SetSearchQuery(_) => "set_search_query",
            Action::SetDarkMode(_) => "set_dark_mode",
            Action::SetSortBy(_) => "set_sort_by",
            Action::ClearCompleted => "clear_completed",
            Action::MarkAllCompleted => "mark_all_completed",
            Action::LoadTodos(_) => "load_todos",
        }
    }

    /// The question a front end should ask before dispatching this action.
    /// The store itself never asks.
    pub fn confirmation_prompt(&self, stats: &TodoStats) -> Option<String> {
        match self {
            Action::ClearCompleted => {
                Some(format!("Delete {} completed todo(s)?", stats.completed))
            }
            Action::MarkAllCompleted => Some(format!(
                "Mark all {} active todo(s) as completed?",
                stats.active
            )),
            Action::DeleteTodo(_) => Some("Delete this todo?".to_string()),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

/// Holds the application state. `dispatch` is the only way to change it.
#[derive(Debug)]
pub struct Store<C: Clock = SystemClock> {
    state: AppState,
    clock: C,
    /// Highest id handed out or loaded so far
    last_id: TodoId,
}

impl Store<SystemClock> {
    pub fn new() -> Self {
        Store::with_clock(SystemClock)
    }
}

impl Default for Store<SystemClock> {
    fn default() -> Self {
        Store::new()
    }
}

impl<C: Clock> Store<C> {
    pub fn with_clock(clock: C) -> Self {
        Store::from_state(AppState::default(), clock)
    }

    /// Resume from an existing state
    pub fn from_state(state: AppState, clock: C) -> Self {
        let last_id = max_id(&state.items);
        Store {
            state,
            clock,
            last_id,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn into_state(self) -> AppState {
        self.state
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Apply one action to the held state
    pub fn dispatch(&mut self, action: Action) {
        debug!("dispatch {}", action.name());
        let now = self.clock.now();

        match action {
            Action::SetIsAddingTodo(visible) => {
                self.state.is_adding_todo = visible;
                if !visible {
                    self.state.editing_id = None;
                }
            }
            Action::SetEditingId(id) => {
                self.state.editing_id = id;
            }
            Action::AddTodo {
                text,
                priority,
                due_date,
                notes,
            } => {
                let id = self.next_id(now);
                self.state.items.push(Todo::new(
                    id,
                    text,
                    priority.unwrap_or_default(),
                    due_date,
                    notes.unwrap_or_default(),
                    now,
                ));
                self.close_form();
            }
            Action::DeleteTodo(id) => {
                self.state.items.retain(|t| t.id != id);
            }
            Action::UpdateTodo { id, patch } => {
                if let Some(todo) = self.state.find_mut(id) {
                    apply_patch(todo, patch);
                    todo.touch(now);
                }
                self.close_form();
            }
            Action::ToggleTodo(id) => {
                if let Some(todo) = self.state.find_mut(id) {
                    todo.completed = !todo.completed;
                    todo.touch(now);
                }
            }
            Action::SetFilter(filter) => {
                self.state.filter = filter;
            }
            Action::SetSearchQuery(query) => {
                self.state.search_query = query;
            }
            Action::SetDarkMode(dark) => {
                self.state.dark_mode = dark;
            }
            Action::SetSortBy(sort_by) => {
                self.state.sort_by = sort_by;
            }
            Action::ClearCompleted => {
                self.state.items.retain(|t| !t.completed);
            }
            Action::MarkAllCompleted => {
                for todo in &mut self.state.items {
                    todo.completed = true;
                    todo.touch(now);
                }
            }
            Action::LoadTodos(items) => {
                self.last_id = self.last_id.max(max_id(&items));
                self.state.items = items;
            }
        }
    }

    /// Apply several actions in order
    pub fn dispatch_all(&mut self, actions: impl IntoIterator<Item = Action>) {
        for action in actions {
            self.dispatch(action);
        }
    }

    fn close_form(&mut self) {
        self.state.is_adding_todo = false;
        self.state.editing_id = None;
    }

    /// Millisecond timestamp, bumped past the last id so ids stay strictly
    /// increasing within one millisecond or across a clock step backwards.
    ///
    /// Once `TodoId::MAX` is taken, ids fall back to the lowest positive id
    /// not in use.
    fn next_id(&mut self, now: DateTime<Utc>) -> TodoId {
        match self.last_id.checked_add(1) {
            Some(next) => {
                let id = now.timestamp_millis().max(next);
                self.last_id = id;
                id
            }
            None => {
                warn!("todo ids exhausted past {}, reusing a free id", TodoId::MAX);
                (1..TodoId::MAX)
                    .find(|id| self.state.find(*id).is_none())
                    .unwrap_or(TodoId::MAX)
            }
        }
    }
}

fn apply_patch(todo: &mut Todo, patch: TodoPatch) {
    if let Some(text) = patch.text {
        todo.text = text;
    }
    if let Some(priority) = patch.priority {
        todo.priority = priority;
    }
    if let Some(due_date) = patch.due_date {
        todo.due_date = due_date;
    }
    if let Some(notes) = patch.notes {
        todo.notes = notes;
    }
}

fn max_id(items: &[Todo]) -> TodoId {
    items.iter().map(|t| t.id).max().unwrap_or(0)
}
