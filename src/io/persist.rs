//! Restoring the todo list at startup and saving it after every change.
//!
//! Two keys are kept: the todo list under [`TODOS_KEY`] and the dark-mode
//! preference under [`DARK_MODE_KEY`], each as JSON. Anything unreadable at
//! startup is logged and skipped so a damaged file never keeps the list from
//! opening; it is simply overwritten on the next save.

use log::{info, warn};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::io::config_io::default_data_dir;
use crate::io::storage::{FileStorage, KeyValueStorage, StorageError};
use crate::model::config::AppConfig;
use crate::model::state::AppState;
use crate::model::todo::Todo;
use crate::ops::stats::{TodoStats, compute_stats_at};
use crate::ops::store::{Action, Clock, Store, SystemClock};
use crate::ops::visible::{ListView, compute_list_view, compute_visible_todos};

pub const TODOS_KEY: &str = "todos";
pub const DARK_MODE_KEY: &str = "darkMode";

// ---------------------------------------------------------------------------
// Load
// ---------------------------------------------------------------------------

/// Read and parse a JSON value. Missing, unreadable or malformed values all
/// come back as `None`.
fn read_json<T, S>(storage: &S, key: &str) -> Option<T>
where
    T: DeserializeOwned,
    S: KeyValueStorage + ?Sized,
{
    let raw = match storage.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            warn!("could not read saved {key}: {e}");
            return None;
        }
    };
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("ignoring unreadable saved {key}: {e}");
            None
        }
    }
}

pub fn read_todos<S: KeyValueStorage + ?Sized>(storage: &S) -> Option<Vec<Todo>> {
    read_json(storage, TODOS_KEY)
}

pub fn read_dark_mode<S: KeyValueStorage + ?Sized>(storage: &S) -> Option<bool> {
    read_json(storage, DARK_MODE_KEY)
}

/// Restore saved todos and the dark-mode preference into `store`.
/// Whatever cannot be read leaves the store's current value in place.
pub fn load_into<S, C>(storage: &S, store: &mut Store<C>)
where
    S: KeyValueStorage + ?Sized,
    C: Clock,
{
    if let Some(items) = read_todos(storage) {
        info!("restored {} saved todos", items.len());
        store.dispatch(Action::LoadTodos(items));
    }
    if let Some(dark_mode) = read_dark_mode(storage) {
        store.dispatch(Action::SetDarkMode(dark_mode));
    }
}

// ---------------------------------------------------------------------------
// Save
// ---------------------------------------------------------------------------

/// Which keys a save actually wrote
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SaveOutcome {
    pub todos: bool,
    pub dark_mode: bool,
}

/// Writes each key only when its value differs from the last one written
#[derive(Debug, Clone, Default)]
pub struct Persister {
    pretty: bool,
    saved_items: Option<Vec<Todo>>,
    saved_dark_mode: Option<bool>,
}

impl Persister {
    pub fn new(pretty: bool) -> Self {
        Persister {
            pretty,
            ..Default::default()
        }
    }

    /// Treat `state` as already matching what storage holds
    pub fn mark_saved(&mut self, state: &AppState) {
        self.saved_items = Some(state.items.clone());
        self.saved_dark_mode = Some(state.dark_mode);
    }

    pub fn save<S: KeyValueStorage + ?Sized>(
        &mut self,
        storage: &mut S,
        state: &AppState,
    ) -> Result<SaveOutcome, StorageError> {
        let mut outcome = SaveOutcome::default();

        if self.saved_items.as_deref() != Some(state.items.as_slice()) {
            let json = self.to_json(TODOS_KEY, &state.items)?;
            storage.set(TODOS_KEY, &json)?;
            self.saved_items = Some(state.items.clone());
            outcome.todos = true;
        }

        if self.saved_dark_mode != Some(state.dark_mode) {
            let json = self.to_json(DARK_MODE_KEY, &state.dark_mode)?;
            storage.set(DARK_MODE_KEY, &json)?;
            self.saved_dark_mode = Some(state.dark_mode);
            outcome.dark_mode = true;
        }

        Ok(outcome)
    }

    fn to_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<String, StorageError> {
        let result = if self.pretty {
            serde_json::to_string_pretty(value)
        } else {
            serde_json::to_string(value)
        };
        result.map_err(|e| StorageError::SerializeError {
            key: key.to_string(),
            source: e,
        })
    }
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// A store wired to storage: loads on open, saves after every dispatch
#[derive(Debug)]
pub struct Session<S: KeyValueStorage, C: Clock = SystemClock> {
    store: Store<C>,
    storage: S,
    persister: Persister,
}

impl<S: KeyValueStorage> Session<S, SystemClock> {
    pub fn open(storage: S, pretty: bool) -> Self {
        Session::open_with_clock(storage, SystemClock, pretty)
    }
}

impl Session<FileStorage, SystemClock> {
    /// Open file storage in the configured (or default) data directory
    pub fn from_config(config: &AppConfig) -> Result<Self, StorageError> {
        let dir = config
            .storage
            .dir
            .clone()
            .unwrap_or_else(default_data_dir);
        let storage = FileStorage::open(dir)?;
        Ok(Session::open(storage, config.storage.pretty))
    }
}

impl<S: KeyValueStorage, C: Clock> Session<S, C> {
    pub fn open_with_clock(storage: S, clock: C, pretty: bool) -> Self {
        let mut store = Store::with_clock(clock);
        load_into(&storage, &mut store);

        let mut persister = Persister::new(pretty);
        persister.mark_saved(store.state());

        Session {
            store,
            storage,
            persister,
        }
    }

    /// Apply `action`, then save whatever it changed. A failed save is
    /// reported, but the state change stands.
    pub fn dispatch(&mut self, action: Action) -> Result<SaveOutcome, StorageError> {
        self.store.dispatch(action);
        self.persister.save(&mut self.storage, self.store.state())
    }

    pub fn state(&self) -> &AppState {
        self.store.state()
    }

    pub fn store(&self) -> &Store<C> {
        &self.store
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn visible_todos(&self) -> Vec<&Todo> {
        compute_visible_todos(self.store.state())
    }

    pub fn list_view(&self) -> ListView<'_> {
        compute_list_view(self.store.state())
    }

    /// Stats with overdue measured by the session's clock
    pub fn stats(&self) -> TodoStats {
        compute_stats_at(self.store.state(), self.store.clock().now())
    }

    pub fn into_parts(self) -> (Store<C>, S) {
        (self.store, self.storage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::storage::MemoryStorage;
    use crate::model::todo::Priority;
    use crate::ops::store::ManualClock;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    fn clock() -> ManualClock {
        ManualClock::new(Utc.with_ymd_and_hms(2025, 5, 14, 9, 0, 0).unwrap())
    }

    fn saved_todo() -> Todo {
        Todo::new(
            100,
            "saved".into(),
            Priority::Low,
            None,
            String::new(),
            Utc.with_ymd_and_hms(2025, 5, 1, 9, 0, 0).unwrap(),
        )
    }

    #[test]
    fn load_restores_todos_and_dark_mode() {
        let mut storage = MemoryStorage::new();
        let json = serde_json::to_string(&vec![saved_todo()]).unwrap();
        storage.set(TODOS_KEY, &json).unwrap();
        storage.set(DARK_MODE_KEY, "true").unwrap();

        let mut store = Store::with_clock(clock());
        load_into(&storage, &mut store);
        assert_eq!(store.state().items, vec![saved_todo()]);
        assert!(store.state().dark_mode);
    }

    #[test]
    fn load_swallows_malformed_values() {
        let mut storage = MemoryStorage::new();
        storage.set(TODOS_KEY, "not json {{{").unwrap();
        storage.set(DARK_MODE_KEY, "\"maybe\"").unwrap();

        let mut store = Store::with_clock(clock());
        load_into(&storage, &mut store);
        assert!(store.state().items.is_empty());
        assert!(!store.state().dark_mode);
    }

    #[test]
    fn load_with_empty_storage_keeps_defaults() {
        let storage = MemoryStorage::new();
        let mut store = Store::with_clock(clock());
        load_into(&storage, &mut store);
        assert_eq!(store.state(), &AppState::default());
    }

    #[test]
    fn persister_writes_only_changed_keys() {
        let mut storage = MemoryStorage::new();
        let mut persister = Persister::new(false);
        let mut state = AppState::default();

        let first = persister.save(&mut storage, &state).unwrap();
        assert_eq!(
            first,
            SaveOutcome {
                todos: true,
                dark_mode: true
            }
        );

        state.search_query = "milk".into();
        assert_eq!(persister.save(&mut storage, &state).unwrap(), SaveOutcome::default());

        state.dark_mode = true;
        let outcome = persister.save(&mut storage, &state).unwrap();
        assert!(!outcome.todos);
        assert!(outcome.dark_mode);
        assert_eq!(storage.get(DARK_MODE_KEY).unwrap().as_deref(), Some("true"));
        assert_eq!(storage.writes(), 3);
    }

    #[test]
    fn pretty_output_is_multiline() {
        let mut storage = MemoryStorage::new();
        let mut persister = Persister::new(true);
        let state = AppState {
            items: vec![saved_todo()],
            ..Default::default()
        };
        persister.save(&mut storage, &state).unwrap();
        let raw = storage.get(TODOS_KEY).unwrap().unwrap();
        assert!(raw.contains('\n'));
        assert_eq!(read_todos(&storage), Some(vec![saved_todo()]));
    }

    #[test]
    fn session_saves_after_dispatch() {
        let mut session = Session::open_with_clock(MemoryStorage::new(), clock(), false);
        assert_eq!(session.storage().writes(), 0);

        let outcome = session.dispatch(Action::add("Buy milk")).unwrap();
        assert!(outcome.todos);
        let saved = read_todos(session.storage()).unwrap();
        assert_eq!(saved, session.state().items);

        let outcome = session.dispatch(Action::SetSearchQuery("milk".into())).unwrap();
        assert_eq!(outcome, SaveOutcome::default());
        assert_eq!(session.visible_todos().len(), 1);
    }

    #[test]
    fn session_reopens_with_saved_list() {
        let mut session = Session::open_with_clock(MemoryStorage::new(), clock(), false);
        session.dispatch(Action::add("one")).unwrap();
        session.dispatch(Action::SetDarkMode(true)).unwrap();
        let (store, storage) = session.into_parts();

        let reopened = Session::open_with_clock(storage, clock(), false);
        assert_eq!(reopened.state().items, store.state().items);
        assert!(reopened.state().dark_mode);
        assert_eq!(reopened.stats().total, 1);
    }
}
