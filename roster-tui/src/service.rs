//! Cached reads and invalidating mutations over a [`RosterApi`].
//!
//! Reads go through one [`QueryCache`] per resource family. Mutations
//! validate their draft first, so nothing invalid reaches the network, and
//! invalidate the affected family only after the server accepted the change
//! and before the result is returned. Failed mutations leave every cache
//! untouched.

use crate::credentials::{CredentialError, CredentialStore};
use roster_core::{
    ApiError, ApiResult, EntryDraft, EntryId, FieldDefinition, FieldDraft, FieldId, ListParams,
    LoginRequest, Page, Registry, RegistryDraft, RegistryEntry, RegistryId, RosterApi,
    TeamMember, TeamMemberDraft, TeamMemberId, UploadResponse, Validate, ValidationErrors,
};
use roster_storage::{CacheStats, QueryCache, QueryKey, QueryPrefix, ResourceFamily};
use std::future::Future;
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationErrors),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("Credential store error: {0}")]
    Credentials(#[from] CredentialError),
}

impl ServiceError {
    pub fn validation_errors(&self) -> Option<&ValidationErrors> {
        match self {
            Self::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

pub struct ResourceService {
    api: Arc<dyn RosterApi>,
    credentials: Arc<CredentialStore>,
    team_members: QueryCache<Page<TeamMember>>,
    fields: QueryCache<Page<FieldDefinition>>,
    registries: QueryCache<Page<Registry>>,
    entries: QueryCache<Page<RegistryEntry>>,
}

impl ResourceService {
    pub fn new(api: Arc<dyn RosterApi>, credentials: Arc<CredentialStore>) -> Self {
        Self {
            api,
            credentials,
            team_members: QueryCache::new(),
            fields: QueryCache::new(),
            registries: QueryCache::new(),
            entries: QueryCache::new(),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.credentials.get_token().is_some()
    }

    // ========================================================================
    // AUTH
    // ========================================================================

    pub async fn login(&self, username: &str, password: &str) -> ServiceResult<()> {
        let request = LoginRequest {
            username: username.trim().to_string(),
            password: password.to_string(),
        };
        let response = self.api.login(&request).await.inspect_err(|err| {
            tracing::warn!(status = ?err.status(), "login rejected");
        })?;
        self.credentials.set_token(response.token)?;
        self.clear_caches();
        tracing::info!(username = %request.username, "signed in");
        Ok(())
    }

    /// Drop the token and everything read with it.
    pub fn logout(&self) -> ServiceResult<()> {
        self.credentials.clear_token()?;
        self.clear_caches();
        tracing::info!("signed out");
        Ok(())
    }

    fn clear_caches(&self) {
        self.team_members.invalidate_all();
        self.fields.invalidate_all();
        self.registries.invalidate_all();
        self.entries.invalidate_all();
    }

    // ========================================================================
    // READS
    // ========================================================================

    pub async fn team_members(&self, params: &ListParams) -> ApiResult<Arc<Page<TeamMember>>> {
        let key = QueryKey::team_members(params.clone());
        self.team_members
            .query(&key, || self.api.list_team_members(params))
            .await
    }

    pub async fn fields(&self, params: &ListParams) -> ApiResult<Arc<Page<FieldDefinition>>> {
        let key = QueryKey::fields(params.clone());
        self.fields
            .query(&key, || async {
                let all = self.api.list_fields(params).await?;
                Ok::<_, ApiError>(Page::refine(all, params))
            })
            .await
    }

    pub async fn registries(&self, params: &ListParams) -> ApiResult<Arc<Page<Registry>>> {
        let key = QueryKey::registries(params.clone());
        self.registries
            .query(&key, || async {
                let all = self.api.list_registries(params).await?;
                Ok::<_, ApiError>(Page::refine(all, params))
            })
            .await
    }

    pub async fn registry_entries(
        &self,
        registry_id: RegistryId,
        params: &ListParams,
    ) -> ApiResult<Arc<Page<RegistryEntry>>> {
        let key = QueryKey::registry_entries(registry_id, params.clone());
        self.entries
            .query(&key, || {
                self.api
                    .list_registry_entries(registry_id, params.page_window())
            })
            .await
    }

    pub async fn registry(&self, id: RegistryId) -> ApiResult<Registry> {
        self.api.get_registry(id).await
    }

    // ========================================================================
    // MUTATIONS
    // ========================================================================

    pub async fn create_team_member(&self, draft: &TeamMemberDraft) -> ServiceResult<TeamMember> {
        let input = draft.validate()?;
        self.mutate(
            "create",
            &[ResourceFamily::TeamMembers.into()],
            self.api.create_team_member(&input),
        )
        .await
    }

    pub async fn update_team_member(
        &self,
        id: TeamMemberId,
        draft: &TeamMemberDraft,
    ) -> ServiceResult<TeamMember> {
        let input = draft.validate()?;
        self.mutate(
            "update",
            &[ResourceFamily::TeamMembers.into()],
            self.api.update_team_member(id, &input),
        )
        .await
    }

    pub async fn delete_team_member(&self, id: TeamMemberId) -> ServiceResult<()> {
        self.mutate(
            "delete",
            &[ResourceFamily::TeamMembers.into()],
            self.api.delete_team_member(id),
        )
        .await
    }

    pub async fn create_field(&self, draft: &FieldDraft) -> ServiceResult<FieldDefinition> {
        let input = draft.validate()?;
        self.mutate(
            "create",
            &[ResourceFamily::Fields.into()],
            self.api.create_field(&input),
        )
        .await
    }

    pub async fn update_field(
        &self,
        id: FieldId,
        draft: &FieldDraft,
    ) -> ServiceResult<FieldDefinition> {
        let input = draft.validate()?;
        self.mutate(
            "update",
            &[ResourceFamily::Fields.into()],
            self.api.update_field(id, &input),
        )
        .await
    }

    pub async fn delete_field(&self, id: FieldId) -> ServiceResult<()> {
        self.mutate(
            "delete",
            &[ResourceFamily::Fields.into()],
            self.api.delete_field(id),
        )
        .await
    }

    pub async fn create_registry(&self, draft: &RegistryDraft) -> ServiceResult<Registry> {
        let input = draft.validate()?;
        self.mutate(
            "create",
            &[ResourceFamily::Registries.into()],
            self.api.create_registry(&input),
        )
        .await
    }

    pub async fn update_registry(
        &self,
        id: RegistryId,
        draft: &RegistryDraft,
    ) -> ServiceResult<Registry> {
        let input = draft.validate()?;
        self.mutate(
            "update",
            &[ResourceFamily::Registries.into()],
            self.api.update_registry(id, &input),
        )
        .await
    }

    /// Deleting a registry also drops its entry pages.
    pub async fn delete_registry(&self, id: RegistryId) -> ServiceResult<()> {
        self.mutate(
            "delete",
            &[
                ResourceFamily::Registries.into(),
                QueryPrefix::registry_entries(id),
            ],
            self.api.delete_registry(id),
        )
        .await
    }

    /// Only the owning registry's entry pages are invalidated; a cached
    /// `entriesCount` on the registry list stays as read until its next fetch.
    pub async fn create_registry_entry(
        &self,
        registry_id: RegistryId,
        draft: &EntryDraft,
    ) -> ServiceResult<RegistryEntry> {
        let input = draft.validate()?;
        self.mutate(
            "create",
            &[QueryPrefix::registry_entries(registry_id)],
            self.api.create_registry_entry(registry_id, &input),
        )
        .await
    }

    pub async fn update_registry_entry(
        &self,
        registry_id: RegistryId,
        entry_id: EntryId,
        draft: &EntryDraft,
    ) -> ServiceResult<RegistryEntry> {
        let input = draft.validate()?;
        self.mutate(
            "update",
            &[QueryPrefix::registry_entries(registry_id)],
            self.api.update_registry_entry(registry_id, entry_id, &input),
        )
        .await
    }

    pub async fn delete_registry_entry(
        &self,
        registry_id: RegistryId,
        entry_id: EntryId,
    ) -> ServiceResult<()> {
        self.mutate(
            "delete",
            &[QueryPrefix::registry_entries(registry_id)],
            self.api.delete_registry_entry(registry_id, entry_id),
        )
        .await
    }

    /// Upload runs outside any form submit and touches no cache.
    pub async fn upload(&self, file_name: &str, bytes: Vec<u8>) -> ApiResult<UploadResponse> {
        let size = bytes.len();
        let response = self.api.upload(file_name, bytes).await?;
        tracing::info!(file_name, size, "file uploaded");
        Ok(response)
    }

    async fn mutate<T>(
        &self,
        action: &'static str,
        prefixes: &[QueryPrefix],
        call: impl Future<Output = ApiResult<T>>,
    ) -> ServiceResult<T> {
        match call.await {
            Ok(value) => {
                for prefix in prefixes {
                    let removed = self.invalidate(prefix);
                    tracing::debug!(action, %prefix, removed, "invalidated after mutation");
                }
                tracing::info!(action, "mutation applied");
                Ok(value)
            }
            Err(err) => {
                tracing::warn!(action, error = %err, "mutation failed; caches untouched");
                Err(err.into())
            }
        }
    }

    fn invalidate(&self, prefix: &QueryPrefix) -> usize {
        match prefix.family {
            ResourceFamily::TeamMembers => self.team_members.invalidate(*prefix),
            ResourceFamily::Fields => self.fields.invalidate(*prefix),
            ResourceFamily::Registries => self.registries.invalidate(*prefix),
            ResourceFamily::RegistryEntries => self.entries.invalidate(*prefix),
        }
    }

    // ========================================================================
    // DIAGNOSTICS
    // ========================================================================

    pub fn cache_stats(&self) -> Vec<(ResourceFamily, CacheStats)> {
        vec![
            (ResourceFamily::TeamMembers, self.team_members.stats()),
            (ResourceFamily::Fields, self.fields.stats()),
            (ResourceFamily::Registries, self.registries.stats()),
            (ResourceFamily::RegistryEntries, self.entries.stats()),
        ]
    }

    pub fn cached_team_members(&self, params: &ListParams) -> Option<Arc<Page<TeamMember>>> {
        self.team_members
            .peek(&QueryKey::team_members(params.clone()))
    }

    pub fn cached_registries(&self, params: &ListParams) -> Option<Arc<Page<Registry>>> {
        self.registries.peek(&QueryKey::registries(params.clone()))
    }

    pub fn cached_entries(
        &self,
        registry_id: RegistryId,
        params: &ListParams,
    ) -> Option<Arc<Page<RegistryEntry>>> {
        self.entries
            .peek(&QueryKey::registry_entries(registry_id, params.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roster_core::{EntityIdType, Role};
    use roster_test_utils::{MockRosterApi, Operation};

    fn service() -> (Arc<MockRosterApi>, ResourceService) {
        let api = Arc::new(MockRosterApi::seeded());
        let service = ResourceService::new(api.clone(), Arc::new(CredentialStore::in_memory()));
        (api, service)
    }

    fn member_draft(name: &str) -> TeamMemberDraft {
        TeamMemberDraft {
            name: name.to_string(),
            role: Some(Role::Designer),
            age: "31".to_string(),
            photo: None,
        }
    }

    #[tokio::test]
    async fn repeated_reads_hit_the_network_once() {
        let (api, service) = service();
        let params = ListParams::default();

        let first = service.team_members(&params).await.unwrap();
        let second = service.team_members(&params).await.unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(api.call_count(Operation::ListTeamMembers), 1);
        assert_eq!(first.len(), 3);
        assert_eq!(first.total_pages, 1);
    }

    #[tokio::test]
    async fn successful_create_invalidates_before_returning() {
        let (api, service) = service();
        let params = ListParams::default();
        let before = service.team_members(&params).await.unwrap();

        service.create_team_member(&member_draft("Ana Lima")).await.unwrap();
        assert!(service.cached_team_members(&params).is_none());

        let after = service.team_members(&params).await.unwrap();
        assert_eq!(before.len() + 1, after.len());
        assert_eq!(api.call_count(Operation::ListTeamMembers), 2);
    }

    #[tokio::test]
    async fn invalid_draft_never_reaches_the_network() {
        let (api, service) = service();
        let err = service
            .create_team_member(&member_draft("J"))
            .await
            .unwrap_err();

        assert!(err.validation_errors().is_some());
        assert_eq!(api.total_calls(), 0);
    }

    #[tokio::test]
    async fn failed_mutation_keeps_cached_pages() {
        let (api, service) = service();
        let params = ListParams::default();
        let before = service.fields(&params).await.unwrap();

        api.fail_next(Operation::CreateField, ApiError::server(500, "boom"));
        let draft = FieldDraft {
            name: "badge".into(),
            label: "Badge".into(),
            ..FieldDraft::default()
        };
        let err = service.create_field(&draft).await.unwrap_err();
        assert_eq!(err.to_string(), "boom");

        let after = service.fields(&params).await.unwrap();
        assert!(Arc::ptr_eq(&before, &after));
        assert_eq!(api.call_count(Operation::ListFields), 1);
    }

    #[tokio::test]
    async fn deleting_a_registry_drops_its_entry_pages() {
        let (_api, service) = service();
        let params = ListParams::default();
        let id = RegistryId::new(1);
        service.registries(&params).await.unwrap();
        service.registry_entries(id, &params).await.unwrap();

        service.delete_registry(id).await.unwrap();

        assert!(service.cached_registries(&params).is_none());
        assert!(service.cached_entries(id, &params).is_none());
    }

    #[tokio::test]
    async fn logout_clears_token_and_every_cache() {
        let (_api, service) = service();
        service.login("admin", "secret").await.unwrap();
        assert!(service.is_authenticated());

        let params = ListParams::default();
        service.team_members(&params).await.unwrap();
        service.registries(&params).await.unwrap();

        service.logout().unwrap();
        assert!(!service.is_authenticated());
        assert!(service.cached_team_members(&params).is_none());
        assert!(service.cached_registries(&params).is_none());
    }

    #[tokio::test]
    async fn upload_returns_the_stored_url() {
        let (api, service) = service();
        let response = service.upload("face.png", vec![1, 2, 3]).await.unwrap();
        assert!(response.url.ends_with("/face.png"));
        assert_eq!(api.call_count(Operation::Upload), 1);
    }
}
