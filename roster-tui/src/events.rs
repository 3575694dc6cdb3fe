//! Event types for the console event loop.
//!
//! Key input and ticks come from the terminal; everything else is the outcome
//! of a background [`Task`](crate::tasks::Task) reporting back.

use crate::service::ServiceResult;
use crate::state::list::LoadTicket;
use crossterm::event::KeyEvent;
use roster_core::{
    EntryId, FieldDefinition, Page, Registry, RegistryEntry, RegistryId, TeamMember,
    UploadResponse,
};
use roster_storage::ResourceFamily;
use std::sync::Arc;

/// Outcome of a list read, already rendered to a message on failure.
pub type LoadOutcome<R> = Result<Arc<Page<R>>, String>;

#[derive(Debug)]
pub enum TuiEvent {
    Input(KeyEvent),
    Tick,
    Resize {
        width: u16,
        height: u16,
    },
    LoggedIn(ServiceResult<()>),
    TeamMembersLoaded {
        ticket: LoadTicket,
        outcome: LoadOutcome<TeamMember>,
    },
    FieldsLoaded {
        ticket: LoadTicket,
        outcome: LoadOutcome<FieldDefinition>,
    },
    RegistriesLoaded {
        ticket: LoadTicket,
        outcome: LoadOutcome<Registry>,
    },
    EntriesLoaded {
        registry_id: RegistryId,
        ticket: LoadTicket,
        outcome: LoadOutcome<RegistryEntry>,
    },
    /// A create or update submitted from a form.
    Saved {
        family: ResourceFamily,
        /// Sequence of the submission, see [`Submission`](crate::state::form::Submission).
        seq: u64,
        updated: bool,
        result: ServiceResult<()>,
    },
    Deleted {
        family: ResourceFamily,
        result: ServiceResult<()>,
    },
    EntryCreated {
        registry_id: RegistryId,
        seq: u64,
        result: ServiceResult<()>,
    },
    EntryUpdated {
        registry_id: RegistryId,
        entry_id: EntryId,
        seq: u64,
        result: ServiceResult<()>,
    },
    /// Photo upload with the uploaded size in bytes.
    PhotoUploaded(Result<(UploadResponse, usize), String>),
}
