//! Event vocabulary for the dashboard
//!
//! Commands are the bridge between raw key input and state changes: the
//! key mapping layer emits `CommandEvent`s, the controller applies them to
//! the view model. Keeping the vocabulary in one place prevents view
//! concerns from leaking into the key mapping.

/// The four interactive regions of the dashboard.
///
/// Each pane owns its own transient alert slot, so feedback for one
/// operation never clobbers feedback for another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pane {
    /// Save form (key + value inputs)
    Save,
    /// Full listing of the store
    Entries,
    /// Delete form (key input)
    Delete,
    /// Aggregate statistics view
    Stats,
}

/// The three focusable text inputs, in Tab order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputField {
    SaveKey,
    SaveValue,
    DeleteKey,
}

impl InputField {
    /// Next field in Tab order (wraps around).
    pub fn next(self) -> Self {
        match self {
            InputField::SaveKey => InputField::SaveValue,
            InputField::SaveValue => InputField::DeleteKey,
            InputField::DeleteKey => InputField::SaveKey,
        }
    }

    /// Previous field in Tab order (wraps around).
    pub fn previous(self) -> Self {
        match self {
            InputField::SaveKey => InputField::DeleteKey,
            InputField::SaveValue => InputField::SaveKey,
            InputField::DeleteKey => InputField::SaveValue,
        }
    }

    /// The pane this input belongs to.
    pub fn pane(self) -> Pane {
        match self {
            InputField::SaveKey | InputField::SaveValue => Pane::Save,
            InputField::DeleteKey => Pane::Delete,
        }
    }
}

/// Severity of a transient alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertKind {
    Success,
    Error,
}

/// Events produced by the key mapping layer and applied by the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandEvent {
    /// Insert a character into the focused input
    InsertCharRequested { ch: char },

    /// Delete the character before the end of the focused input
    DeleteCharRequested,

    /// Move focus to the next input field
    FocusNextRequested,

    /// Move focus to the previous input field
    FocusPreviousRequested,

    /// Submit the save form (key + value)
    SaveRequested,

    /// Submit the delete form
    DeleteEntryRequested,

    /// Reload the full listing
    RefreshEntriesRequested,

    /// Fetch aggregate statistics
    FetchStatsRequested,

    /// Quit the application
    QuitRequested,
}
