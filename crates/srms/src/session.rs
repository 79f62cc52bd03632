//! Typed command dispatch over a [`RecordStore`].
//!
//! A front end turns each user action into a [`Command`] and hands it to
//! [`Session::dispatch`]. The session validates form input, asks for
//! confirmation before deleting, tracks the edit form and the search text,
//! and answers with what happened plus the list to display.

use tracing::{debug, info};

use crate::config::DisplayConfig;
use crate::error::Result;
use crate::record::{RecordId, RequiredField, StudentFields, StudentRecord};
use crate::storage::KeyValueStore;
use crate::store::RecordStore;
use crate::view::View;

/// Question asked before a record is deleted.
pub const DELETE_PROMPT: &str = "Are you sure you want to delete this record?";

/// A synchronous yes/no prompt.
pub trait Confirm {
    /// Ask `prompt` and return whether the user agreed.
    fn confirm(&mut self, prompt: &str) -> bool;
}

impl<F: FnMut(&str) -> bool> Confirm for F {
    fn confirm(&mut self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// Answers yes to every prompt.
#[derive(Debug, Clone, Copy, Default)]
pub struct AssumeYes;

impl Confirm for AssumeYes {
    fn confirm(&mut self, _prompt: &str) -> bool {
        true
    }
}

/// A user action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Submit the form in add mode.
    SubmitAdd(StudentFields),
    /// Load a record into the form for editing.
    BeginEdit(RecordId),
    /// Submit the form in edit mode for `id`.
    SubmitEdit {
        /// The record being edited.
        id: RecordId,
        /// The new field values.
        fields: StudentFields,
    },
    /// Leave edit mode without saving.
    CancelEdit,
    /// Delete a record, subject to confirmation.
    DeleteRequested(RecordId),
    /// The search box changed.
    SearchChanged(String),
}

/// What a command did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// A record was created.
    Added(StudentRecord),
    /// A record's fields were replaced.
    Updated(StudentRecord),
    /// A record was deleted.
    Deleted(RecordId),
    /// The form now holds this record's fields.
    EditStarted {
        /// The record being edited.
        id: RecordId,
        /// Values to prefill the form with.
        fields: StudentFields,
    },
    /// Edit mode was left without saving.
    EditCancelled,
    /// The form was incomplete; nothing was stored.
    Rejected(RequiredField),
    /// The referenced record no longer exists; nothing changed.
    NotFound(RecordId),
    /// The user declined the delete confirmation.
    DeleteDeclined(RecordId),
    /// The list was filtered by the search text.
    Filtered {
        /// Number of matching records.
        matches: usize,
    },
}

impl Outcome {
    /// Whether the command changed stored data.
    #[must_use]
    pub fn changed_store(&self) -> bool {
        matches!(self, Self::Added(_) | Self::Updated(_) | Self::Deleted(_))
    }
}

/// Whether the form adds a new record or edits an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormMode {
    /// Submitting creates a record.
    #[default]
    Add,
    /// Submitting updates the given record.
    Edit(RecordId),
}

impl FormMode {
    /// Label for the submit button.
    #[must_use]
    pub fn submit_label(self) -> &'static str {
        match self {
            Self::Add => "Add Student",
            Self::Edit(_) => "Update Student",
        }
    }
}

/// Result of dispatching a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// What happened.
    pub outcome: Outcome,
    /// The list to display afterwards, filtered by the current search.
    pub view: View,
}

/// Routes commands to a record store and keeps the form and search state.
#[derive(Debug)]
pub struct Session<S, C> {
    store: RecordStore<S>,
    confirm: C,
    display: DisplayConfig,
    search: String,
    mode: FormMode,
}

impl<S: KeyValueStore, C: Confirm> Session<S, C> {
    /// Create a session over `store`.
    pub fn new(store: RecordStore<S>, confirm: C, display: DisplayConfig) -> Self {
        Self {
            store,
            confirm,
            display,
            search: String::new(),
            mode: FormMode::Add,
        }
    }

    /// Handle one command.
    ///
    /// # Errors
    ///
    /// Returns an error only if the durable write behind a mutation fails.
    /// Stale ids, incomplete forms and declined confirmations are reported
    /// through [`Outcome`].
    pub fn dispatch(&mut self, command: Command) -> Result<Response> {
        debug!("Dispatching {:?}", command);
        let outcome = match command {
            Command::SubmitAdd(fields) => self.submit_add(fields)?,
            Command::BeginEdit(id) => self.begin_edit(id),
            Command::SubmitEdit { id, fields } => self.submit_edit(id, fields)?,
            Command::CancelEdit => {
                self.mode = FormMode::Add;
                Outcome::EditCancelled
            }
            Command::DeleteRequested(id) => self.delete(id)?,
            Command::SearchChanged(text) => {
                self.search = text;
                Outcome::Filtered {
                    matches: self.store.find_by_name(&self.search).len(),
                }
            }
        };

        Ok(Response {
            outcome,
            view: self.view(),
        })
    }

    /// The list as currently displayed.
    #[must_use]
    pub fn view(&self) -> View {
        View::render(self.store.find_by_name(&self.search), &self.display)
    }

    /// The current search text.
    #[must_use]
    pub fn search(&self) -> &str {
        &self.search
    }

    /// The current form mode.
    #[must_use]
    pub fn mode(&self) -> FormMode {
        self.mode
    }

    /// The underlying record store.
    #[must_use]
    pub fn store(&self) -> &RecordStore<S> {
        &self.store
    }

    fn submit_add(&mut self, fields: StudentFields) -> Result<Outcome> {
        if let Some(missing) = fields.first_missing() {
            info!("Rejected new record: {} is required", missing);
            return Ok(Outcome::Rejected(missing));
        }
        Ok(Outcome::Added(self.store.add(fields)?))
    }

    fn begin_edit(&mut self, id: RecordId) -> Outcome {
        match self.store.get(id) {
            Some(record) => {
                self.mode = FormMode::Edit(id);
                Outcome::EditStarted {
                    id,
                    fields: record.fields(),
                }
            }
            None => Outcome::NotFound(id),
        }
    }

    fn submit_edit(&mut self, id: RecordId, fields: StudentFields) -> Result<Outcome> {
        if let Some(missing) = fields.first_missing() {
            info!("Rejected edit of {}: {} is required", id, missing);
            return Ok(Outcome::Rejected(missing));
        }

        let outcome = match self.store.update(id, fields)? {
            Some(record) => Outcome::Updated(record),
            None => Outcome::NotFound(id),
        };
        if self.mode == FormMode::Edit(id) {
            self.mode = FormMode::Add;
        }
        Ok(outcome)
    }

    fn delete(&mut self, id: RecordId) -> Result<Outcome> {
        if !self.confirm.confirm(DELETE_PROMPT) {
            return Ok(Outcome::DeleteDeclined(id));
        }

        let removed = self.store.remove(id)?;
        if self.mode == FormMode::Edit(id) {
            self.mode = FormMode::Add;
        }
        Ok(if removed {
            Outcome::Deleted(id)
        } else {
            Outcome::NotFound(id)
        })
    }
}
