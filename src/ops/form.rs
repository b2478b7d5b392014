use chrono::NaiveDate;

use crate::model::state::AppState;
use crate::model::todo::{Priority, Todo, TodoId};
use crate::ops::store::{Action, TodoPatch};
use crate::util::unicode::{clamp_graphemes, grapheme_len};

/// Maximum todo text length, in graphemes, after trimming
pub const MAX_TEXT_LEN: usize = 500;
/// Maximum notes length, in graphemes
pub const MAX_NOTES_LEN: usize = 200;

/// Error type for form submission
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DraftError {
    #[error("todo text is empty")]
    EmptyText,
    #[error("todo text is {0} characters, the limit is {max}", max = MAX_TEXT_LEN)]
    TextTooLong(usize),
    #[error("notes are {0} characters, the limit is {max}", max = MAX_NOTES_LEN)]
    NotesTooLong(usize),
}

/// The contents of the create/edit form before it is submitted.
///
/// The store trusts whatever it is given; this is where empty or oversized
/// input gets turned away.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoDraft {
    pub text: String,
    pub priority: Priority,
    pub due_date: Option<NaiveDate>,
    pub notes: String,
}

impl TodoDraft {
    /// Pre-fill from an existing todo
    pub fn from_todo(todo: &Todo) -> Self {
        TodoDraft {
            text: todo.text.clone(),
            priority: todo.priority,
            due_date: todo.due_date,
            notes: todo.notes.clone(),
        }
    }

    /// The draft the form should open with: the edited todo when the state
    /// is in edit mode and that todo still exists, a blank draft otherwise.
    pub fn for_state(state: &AppState) -> Self {
        state
            .editing_todo()
            .map(TodoDraft::from_todo)
            .unwrap_or_default()
    }

    /// Replace the text, truncated to the input limit
    pub fn set_text(&mut self, text: &str) {
        self.text = clamp_graphemes(text, MAX_TEXT_LEN);
    }

    /// Replace the notes, truncated to the input limit
    pub fn set_notes(&mut self, notes: &str) {
        self.notes = clamp_graphemes(notes, MAX_NOTES_LEN);
    }

    /// Whether the save button should be enabled
    pub fn can_save(&self) -> bool {
        !self.text.trim().is_empty()
    }

    pub fn validate(&self) -> Result<(), DraftError> {
        let text = self.text.trim();
        if text.is_empty() {
            return Err(DraftError::EmptyText);
        }
        let text_len = grapheme_len(text);
        if text_len > MAX_TEXT_LEN {
            return Err(DraftError::TextTooLong(text_len));
        }
        let notes_len = grapheme_len(&self.notes);
        if notes_len > MAX_NOTES_LEN {
            return Err(DraftError::NotesTooLong(notes_len));
        }
        Ok(())
    }

    /// Turn the draft into the action a save should dispatch: an update of
    /// every field when `editing` is set, otherwise a new todo.
    pub fn into_action(self, editing: Option<TodoId>) -> Result<Action, DraftError> {
        self.validate()?;
        let text = self.text.trim().to_string();

        Ok(match editing {
            Some(id) => Action::UpdateTodo {
                id,
                patch: TodoPatch {
                    text: Some(text),
                    priority: Some(self.priority),
                    due_date: Some(self.due_date),
                    notes: Some(self.notes),
                },
            },
            None => Action::AddTodo {
                text,
                priority: Some(self.priority),
                due_date: self.due_date,
                notes: Some(self.notes),
            },
        })
    }
}

/// Actions for closing the form without saving
pub fn cancel_actions() -> [Action; 2] {
    [Action::SetIsAddingTodo(false), Action::SetEditingId(None)]
}

/// Actions for opening the form on an existing todo
pub fn begin_edit_actions(id: TodoId) -> [Action; 2] {
    [Action::SetEditingId(Some(id)), Action::SetIsAddingTodo(true)]
}
