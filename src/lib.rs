//! State store and view derivations for a single-user todo list.
//!
//! Data flows one way: an [`Action`] goes into [`Store::dispatch`], the store
//! produces the next [`AppState`], and the pure functions in [`ops::visible`]
//! and [`ops::stats`] compute what to display from it. [`io::persist`] keeps
//! the list and the dark-mode preference in key-value storage between runs.
//!
//! ```
//! use tasklist::{Action, Filter, SortBy, Store, compute_stats, compute_visible_todos};
//!
//! let mut store = Store::new();
//! store.dispatch(Action::add("Call plumber"));
//! store.dispatch(Action::add("Buy milk"));
//! store.dispatch(Action::SetFilter(Filter::Active));
//! store.dispatch(Action::SetSortBy(SortBy::Name));
//!
//! let visible = compute_visible_todos(store.state());
//! assert_eq!(visible.len(), 2);
//! assert_eq!(visible[0].text, "Buy milk");
//! assert_eq!(compute_stats(store.state()).active, 2);
//! ```

pub mod io;
pub mod model;
pub mod ops;
pub mod util;

pub use io::persist::Session;
pub use model::{AppState, Filter, Priority, SortBy, Todo, TodoId};
pub use ops::form::TodoDraft;
pub use ops::stats::{TodoStats, compute_stats, compute_stats_at};
pub use ops::store::{Action, Clock, ManualClock, Store, SystemClock, TodoPatch};
pub use ops::visible::{ListView, compute_filtered_todos, compute_list_view, compute_visible_todos};
