use serde::{Deserialize, Serialize};

use crate::model::todo::{Priority, Todo, TodoId};

/// Which todos the list shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Filter {
    #[default]
    All,
    Active,
    Completed,
    High,
    Medium,
    Low,
}

impl Filter {
    pub const ALL: [Filter; 6] = [
        Filter::All,
        Filter::Active,
        Filter::Completed,
        Filter::High,
        Filter::Medium,
        Filter::Low,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Filter::All => "all",
            Filter::Active => "active",
            Filter::Completed => "completed",
            Filter::High => "high",
            Filter::Medium => "medium",
            Filter::Low => "low",
        }
    }

    pub fn parse_filter(s: &str) -> Option<Filter> {
        Filter::ALL.into_iter().find(|f| f.as_str() == s)
    }

    /// The priority a priority filter selects, `None` for status filters
    pub fn priority(self) -> Option<Priority> {
        match self {
            Filter::High => Some(Priority::High),
            Filter::Medium => Some(Priority::Medium),
            Filter::Low => Some(Priority::Low),
            Filter::All | Filter::Active | Filter::Completed => None,
        }
    }
}

/// List ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortBy {
    /// Newest first
    #[default]
    Date,
    /// High, medium, low
    Priority,
    /// Alphabetical by text
    Name,
}

impl SortBy {
    pub const ALL: [SortBy; 3] = [SortBy::Date, SortBy::Priority, SortBy::Name];

    pub fn as_str(self) -> &'static str {
        match self {
            SortBy::Date => "date",
            SortBy::Priority => "priority",
            SortBy::Name => "name",
        }
    }

    pub fn parse_sort(s: &str) -> Option<SortBy> {
        SortBy::ALL.into_iter().find(|s2| s2.as_str() == s)
    }

    /// Human label for the sort menu
    pub fn label(self) -> &'static str {
        match self {
            SortBy::Date => "Newest First",
            SortBy::Priority => "By Priority",
            SortBy::Name => "Alphabetically",
        }
    }
}

/// The application state owned by the store
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    /// All todos in creation order
    pub items: Vec<Todo>,
    pub filter: Filter,
    /// Whether the create/edit form is showing
    pub is_adding_todo: bool,
    /// Todo being edited; `None` means the form creates a new todo
    pub editing_id: Option<TodoId>,
    /// Case-insensitive substring matched against text and notes
    pub search_query: String,
    /// Display preference only
    pub dark_mode: bool,
    pub sort_by: SortBy,
}

impl AppState {
    pub fn find(&self, id: TodoId) -> Option<&Todo> {
        self.items.iter().find(|t| t.id == id)
    }

    pub fn find_mut(&mut self, id: TodoId) -> Option<&mut Todo> {
        self.items.iter_mut().find(|t| t.id == id)
    }

    /// The todo the form is editing, if `editing_id` still points at one
    pub fn editing_todo(&self) -> Option<&Todo> {
        self.editing_id.and_then(|id| self.find(id))
    }
}
