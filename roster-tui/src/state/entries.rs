//! Registry entries: a list nested under one registry, edited in place.
//!
//! Writes carry a sequence number from the moment they start; their outcome
//! only settles the edit or the new-entry input that is still waiting for
//! that number.

use super::list::ListView;
use super::next_seq;
use roster_core::{EntryDraft, EntryId, Registry, RegistryEntry, RegistryId};

/// Entry reads only take a page window, so the table has no sort columns.
pub const ENTRY_SORT_COLUMNS: &[&str] = &[];

/// A row being edited in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineEdit {
    pub entry_id: EntryId,
    pub value: String,
    /// Value when editing started.
    pub original: String,
    /// Sequence of the update in flight; the value is frozen meanwhile.
    pending: Option<u64>,
}

impl InlineEdit {
    pub fn is_updating(&self) -> bool {
        self.pending.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InlineCommit {
    /// Nothing to send; edit mode was left without a call.
    Unchanged,
    Update {
        entry_id: EntryId,
        seq: u64,
        draft: EntryDraft,
    },
}

/// Which input of the entries screen receives keystrokes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EntryFocus {
    #[default]
    Table,
    NewEntry,
    Inline,
}

#[derive(Debug, Clone)]
pub struct EntriesView {
    pub registry: Option<Registry>,
    pub list: ListView<RegistryEntry>,
    pub editing: Option<InlineEdit>,
    /// Text of the "add entry" input.
    pub new_value: String,
    pub focus: EntryFocus,
    creating: Option<u64>,
}

impl EntriesView {
    pub fn new(limit: u32) -> Self {
        Self {
            registry: None,
            list: ListView::new(limit, ENTRY_SORT_COLUMNS),
            editing: None,
            new_value: String::new(),
            focus: EntryFocus::Table,
            creating: None,
        }
    }

    /// Switch to another registry's entries, starting at page 1.
    pub fn open(&mut self, registry: Registry) {
        let limit = self.list.params.limit;
        *self = Self::new(limit);
        self.registry = Some(registry);
    }

    pub fn registry_id(&self) -> Option<RegistryId> {
        self.registry.as_ref().map(|r| r.id)
    }

    // ------------------------------------------------------------------------
    // Inline editing
    // ------------------------------------------------------------------------

    pub fn begin_edit(&mut self, entry: &RegistryEntry) {
        self.editing = Some(InlineEdit {
            entry_id: entry.id,
            value: entry.value.clone(),
            original: entry.value.clone(),
            pending: None,
        });
        self.focus = EntryFocus::Inline;
    }

    pub fn begin_edit_selected(&mut self) -> bool {
        match self.list.selected_row().cloned() {
            Some(entry) => {
                self.begin_edit(&entry);
                true
            }
            None => false,
        }
    }

    pub fn edit_value(&mut self, value: impl Into<String>) {
        if let Some(edit) = self.editing.as_mut().filter(|e| !e.is_updating()) {
            edit.value = value.into();
        }
    }

    pub fn is_editing(&self, entry_id: EntryId) -> bool {
        self.editing.as_ref().is_some_and(|e| e.entry_id == entry_id)
    }

    /// Decide what committing the inline edit means. A blank or unchanged
    /// value leaves edit mode right away; a changed one stays in edit mode
    /// until [`finish_commit`](Self::finish_commit). `None` while an update
    /// is already in flight.
    pub fn commit(&mut self) -> Option<InlineCommit> {
        let edit = self.editing.as_mut()?;
        if edit.is_updating() {
            return None;
        }
        let trimmed = edit.value.trim();
        if trimmed.is_empty() || trimmed == edit.original {
            self.cancel_edit();
            return Some(InlineCommit::Unchanged);
        }
        let seq = next_seq();
        edit.pending = Some(seq);
        Some(InlineCommit::Update {
            entry_id: edit.entry_id,
            seq,
            draft: EntryDraft {
                value: edit.value.clone(),
            },
        })
    }

    /// Settle the update `seq` of `entry_id`. A failed update keeps the
    /// edited value for another try. Returns `false` when no edit is waiting
    /// for it.
    pub fn finish_commit(&mut self, entry_id: EntryId, seq: u64, succeeded: bool) -> bool {
        let Some(edit) = self
            .editing
            .as_mut()
            .filter(|e| e.entry_id == entry_id && e.pending == Some(seq))
        else {
            return false;
        };
        if succeeded {
            self.cancel_edit();
        } else {
            edit.pending = None;
        }
        true
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
        self.focus = EntryFocus::Table;
    }

    // ------------------------------------------------------------------------
    // New entry
    // ------------------------------------------------------------------------

    pub fn focus_new_entry(&mut self) {
        self.cancel_edit();
        self.focus = EntryFocus::NewEntry;
    }

    pub fn is_creating(&self) -> bool {
        self.creating.is_some()
    }

    /// The sequence and draft to create, unless the input is blank or a
    /// create is already running. The service trims and validates it.
    pub fn begin_create(&mut self) -> Option<(u64, EntryDraft)> {
        if self.is_creating() || self.new_value.trim().is_empty() {
            return None;
        }
        let seq = next_seq();
        self.creating = Some(seq);
        Some((
            seq,
            EntryDraft {
                value: self.new_value.clone(),
            },
        ))
    }

    /// Settle the create `seq`. Returns `false` when the input was not
    /// waiting for it.
    pub fn finish_create(&mut self, seq: u64, succeeded: bool) -> bool {
        if self.creating != Some(seq) {
            return false;
        }
        self.creating = None;
        if succeeded {
            self.new_value.clear();
            self.focus = EntryFocus::Table;
        }
        true
    }

    /// Text under the cursor for the focused input. Frozen while its write
    /// is in flight.
    pub fn input_mut(&mut self) -> Option<&mut String> {
        match self.focus {
            EntryFocus::Table => None,
            EntryFocus::NewEntry if self.creating.is_some() => None,
            EntryFocus::NewEntry => Some(&mut self.new_value),
            EntryFocus::Inline => self
                .editing
                .as_mut()
                .filter(|e| !e.is_updating())
                .map(|e| &mut e.value),
        }
    }
}
