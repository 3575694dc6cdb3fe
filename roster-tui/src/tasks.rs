//! Background work started by the console.
//!
//! State transitions return [`Task`]s instead of awaiting anything. The event
//! loop spawns each one and feeds the resulting [`TuiEvent`] back, so a slow
//! request never blocks input or the other views.

use crate::events::TuiEvent;
use crate::service::ResourceService;
use crate::state::form::Submission;
use crate::state::list::LoadTicket;
use roster_core::{
    EntryDraft, EntryId, FieldDefinition, FieldId, LoginRequest, Registry, RegistryId,
    TeamMember, TeamMemberId,
};
use roster_storage::ResourceFamily;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;

#[derive(Debug, Clone)]
pub enum Task {
    Login(LoginRequest),
    LoadTeamMembers(LoadTicket),
    LoadFields(LoadTicket),
    LoadRegistries(LoadTicket),
    LoadEntries {
        registry_id: RegistryId,
        ticket: LoadTicket,
    },
    SaveTeamMember(Submission<TeamMember>),
    SaveField(Submission<FieldDefinition>),
    SaveRegistry(Submission<Registry>),
    DeleteTeamMember(TeamMemberId),
    DeleteField(FieldId),
    DeleteRegistry(RegistryId),
    CreateEntry {
        registry_id: RegistryId,
        seq: u64,
        draft: EntryDraft,
    },
    UpdateEntry {
        registry_id: RegistryId,
        entry_id: EntryId,
        seq: u64,
        draft: EntryDraft,
    },
    DeleteEntry {
        registry_id: RegistryId,
        entry_id: EntryId,
    },
    UploadPhoto(PathBuf),
}

/// Run one task to completion.
pub async fn run(service: &ResourceService, task: Task) -> TuiEvent {
    match task {
        Task::Login(request) => {
            TuiEvent::LoggedIn(service.login(&request.username, &request.password).await)
        }
        Task::LoadTeamMembers(ticket) => {
            let outcome = service.team_members(&ticket.params).await;
            TuiEvent::TeamMembersLoaded {
                ticket,
                outcome: outcome.map_err(|e| e.to_string()),
            }
        }
        Task::LoadFields(ticket) => {
            let outcome = service.fields(&ticket.params).await;
            TuiEvent::FieldsLoaded {
                ticket,
                outcome: outcome.map_err(|e| e.to_string()),
            }
        }
        Task::LoadRegistries(ticket) => {
            let outcome = service.registries(&ticket.params).await;
            TuiEvent::RegistriesLoaded {
                ticket,
                outcome: outcome.map_err(|e| e.to_string()),
            }
        }
        Task::LoadEntries {
            registry_id,
            ticket,
        } => {
            let outcome = service.registry_entries(registry_id, &ticket.params).await;
            TuiEvent::EntriesLoaded {
                registry_id,
                ticket,
                outcome: outcome.map_err(|e| e.to_string()),
            }
        }
        Task::SaveTeamMember(Submission { seq, id, draft }) => {
            let result = match id {
                Some(id) => service.update_team_member(id, &draft).await.map(drop),
                None => service.create_team_member(&draft).await.map(drop),
            };
            TuiEvent::Saved {
                family: ResourceFamily::TeamMembers,
                seq,
                updated: id.is_some(),
                result,
            }
        }
        Task::SaveField(Submission { seq, id, draft }) => {
            let result = match id {
                Some(id) => service.update_field(id, &draft).await.map(drop),
                None => service.create_field(&draft).await.map(drop),
            };
            TuiEvent::Saved {
                family: ResourceFamily::Fields,
                seq,
                updated: id.is_some(),
                result,
            }
        }
        Task::SaveRegistry(Submission { seq, id, draft }) => {
            let result = match id {
                Some(id) => service.update_registry(id, &draft).await.map(drop),
                None => service.create_registry(&draft).await.map(drop),
            };
            TuiEvent::Saved {
                family: ResourceFamily::Registries,
                seq,
                updated: id.is_some(),
                result,
            }
        }
        Task::DeleteTeamMember(id) => TuiEvent::Deleted {
            family: ResourceFamily::TeamMembers,
            result: service.delete_team_member(id).await,
        },
        Task::DeleteField(id) => TuiEvent::Deleted {
            family: ResourceFamily::Fields,
            result: service.delete_field(id).await,
        },
        Task::DeleteRegistry(id) => TuiEvent::Deleted {
            family: ResourceFamily::Registries,
            result: service.delete_registry(id).await,
        },
        Task::CreateEntry {
            registry_id,
            seq,
            draft,
        } => TuiEvent::EntryCreated {
            registry_id,
            seq,
            result: service
                .create_registry_entry(registry_id, &draft)
                .await
                .map(drop),
        },
        Task::UpdateEntry {
            registry_id,
            entry_id,
            seq,
            draft,
        } => TuiEvent::EntryUpdated {
            registry_id,
            entry_id,
            seq,
            result: service
                .update_registry_entry(registry_id, entry_id, &draft)
                .await
                .map(drop),
        },
        Task::DeleteEntry {
            registry_id,
            entry_id,
        } => TuiEvent::Deleted {
            family: ResourceFamily::RegistryEntries,
            result: service.delete_registry_entry(registry_id, entry_id).await,
        },
        Task::UploadPhoto(path) => TuiEvent::PhotoUploaded(upload_photo(service, path).await),
    }
}

async fn upload_photo(
    service: &ResourceService,
    path: PathBuf,
) -> Result<(roster_core::UploadResponse, usize), String> {
    let bytes = tokio::fs::read(&path)
        .await
        .map_err(|e| format!("Cannot read {}: {e}", path.display()))?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload".to_string());
    let size = bytes.len();
    service
        .upload(&file_name, bytes)
        .await
        .map(|response| (response, size))
        .map_err(|e| e.to_string())
}

/// Spawn every task; each reports through `sender` when done.
pub fn spawn_all(
    service: &Arc<ResourceService>,
    sender: &mpsc::Sender<TuiEvent>,
    tasks: Vec<Task>,
) {
    for task in tasks {
        let service = Arc::clone(service);
        let sender = sender.clone();
        tokio::spawn(async move {
            let event = run(&service, task).await;
            if sender.send(event).await.is_err() {
                tracing::debug!("event loop gone; dropping task outcome");
            }
        });
    }
}
