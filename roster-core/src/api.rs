//! Contract of the remote roster API.
//!
//! One operation per resource family and verb. Implementations attach the
//! current bearer token themselves; callers only see typed results and the
//! three failure shapes of [`ApiError`].

use crate::entities::{
    EntryInput, FieldDefinition, FieldInput, LoginRequest, LoginResponse, Registry, RegistryEntry,
    RegistryInput, TeamMember, TeamMemberInput, UploadResponse,
};
use crate::identity::{EntryId, FieldId, RegistryId, TeamMemberId};
use crate::paging::{ListParams, Page, PageWindow};
use async_trait::async_trait;

/// Why a call failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The server answered with a non-2xx status (or an unreadable body).
    #[error("{message}")]
    Server { status: u16, message: String },

    /// The request went out but no response came back.
    #[error("No response from server: {0}")]
    Network(String),

    /// The request could not be built or sent.
    #[error("Request could not be sent: {0}")]
    Request(String),
}

impl ApiError {
    pub fn server(status: u16, message: impl Into<String>) -> Self {
        Self::Server {
            status,
            message: message.into(),
        }
    }

    /// Fallback wording when the server sent no usable message.
    pub fn generic_server(status: u16) -> Self {
        Self::server(status, format!("Request failed with status code {status}"))
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Server { status, .. } => Some(*status),
            Self::Network(_) | Self::Request(_) => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[async_trait]
pub trait RosterApi: Send + Sync {
    async fn login(&self, credentials: &LoginRequest) -> ApiResult<LoginResponse>;

    // Team members
    async fn list_team_members(&self, params: &ListParams) -> ApiResult<Page<TeamMember>>;
    async fn get_team_member(&self, id: TeamMemberId) -> ApiResult<TeamMember>;
    async fn create_team_member(&self, input: &TeamMemberInput) -> ApiResult<TeamMember>;
    async fn update_team_member(
        &self,
        id: TeamMemberId,
        input: &TeamMemberInput,
    ) -> ApiResult<TeamMember>;
    async fn delete_team_member(&self, id: TeamMemberId) -> ApiResult<()>;

    // Field definitions
    async fn list_fields(&self, params: &ListParams) -> ApiResult<Vec<FieldDefinition>>;
    async fn get_field(&self, id: FieldId) -> ApiResult<FieldDefinition>;
    async fn create_field(&self, input: &FieldInput) -> ApiResult<FieldDefinition>;
    async fn update_field(&self, id: FieldId, input: &FieldInput) -> ApiResult<FieldDefinition>;
    async fn delete_field(&self, id: FieldId) -> ApiResult<()>;

    // Registries
    async fn list_registries(&self, params: &ListParams) -> ApiResult<Vec<Registry>>;
    async fn get_registry(&self, id: RegistryId) -> ApiResult<Registry>;
    async fn create_registry(&self, input: &RegistryInput) -> ApiResult<Registry>;
    async fn update_registry(&self, id: RegistryId, input: &RegistryInput) -> ApiResult<Registry>;
    async fn delete_registry(&self, id: RegistryId) -> ApiResult<()>;

    // Registry entries
    async fn list_registry_entries(
        &self,
        registry_id: RegistryId,
        window: PageWindow,
    ) -> ApiResult<Page<RegistryEntry>>;
    async fn create_registry_entry(
        &self,
        registry_id: RegistryId,
        input: &EntryInput,
    ) -> ApiResult<RegistryEntry>;
    async fn update_registry_entry(
        &self,
        registry_id: RegistryId,
        entry_id: EntryId,
        input: &EntryInput,
    ) -> ApiResult<RegistryEntry>;
    async fn delete_registry_entry(&self, registry_id: RegistryId, entry_id: EntryId)
        -> ApiResult<()>;

    /// Store a file and return its public URL.
    async fn upload(&self, file_name: &str, bytes: Vec<u8>) -> ApiResult<UploadResponse>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_error_displays_its_message() {
        let err = ApiError::server(409, "Name already taken");
        assert_eq!(err.to_string(), "Name already taken");
        assert_eq!(err.status(), Some(409));
    }

    #[test]
    fn generic_server_message_mentions_status() {
        assert_eq!(
            ApiError::generic_server(500).to_string(),
            "Request failed with status code 500"
        );
        assert!(ApiError::generic_server(401).is_unauthorized());
        assert_eq!(ApiError::Network("timeout".into()).status(), None);
    }
}
