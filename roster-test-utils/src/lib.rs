//! Roster Test Utilities
//!
//! Shared test infrastructure for the roster workspace:
//! - An in-memory [`MockRosterApi`] that records every call
//! - Failure injection per operation
//! - Fixtures mirroring a small seeded backend
//! - Proptest generators for drafts and list parameters

pub use roster_core::{
    ApiError, ApiResult, EntityIdType, EntryId, EntryInput, FieldDefinition, FieldId, FieldInput,
    FieldType, ListParams, LoginRequest, LoginResponse, Page, PageWindow, Registry, RegistryEntry,
    RegistryId, RegistryInput, Role, RosterApi, TeamMember, TeamMemberId, TeamMemberInput,
    UploadResponse,
};

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard};

pub const VALID_USERNAME: &str = "admin";
pub const VALID_PASSWORD: &str = "secret";
pub const VALID_TOKEN: &str = "token-admin";
pub const UPLOAD_BASE_URL: &str = "https://cdn.roster.test/uploads";

// ============================================================================
// RECORDED CALLS
// ============================================================================

/// Operation names used for failure injection and call counting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Login,
    ListTeamMembers,
    GetTeamMember,
    CreateTeamMember,
    UpdateTeamMember,
    DeleteTeamMember,
    ListFields,
    GetField,
    CreateField,
    UpdateField,
    DeleteField,
    ListRegistries,
    GetRegistry,
    CreateRegistry,
    UpdateRegistry,
    DeleteRegistry,
    ListEntries,
    CreateEntry,
    UpdateEntry,
    DeleteEntry,
    Upload,
}

/// One request the mock received, with its payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Login(LoginRequest),
    ListTeamMembers(ListParams),
    GetTeamMember(TeamMemberId),
    CreateTeamMember(TeamMemberInput),
    UpdateTeamMember(TeamMemberId, TeamMemberInput),
    DeleteTeamMember(TeamMemberId),
    ListFields(ListParams),
    GetField(FieldId),
    CreateField(FieldInput),
    UpdateField(FieldId, FieldInput),
    DeleteField(FieldId),
    ListRegistries(ListParams),
    GetRegistry(RegistryId),
    CreateRegistry(RegistryInput),
    UpdateRegistry(RegistryId, RegistryInput),
    DeleteRegistry(RegistryId),
    ListEntries(RegistryId, PageWindow),
    CreateEntry(RegistryId, EntryInput),
    UpdateEntry(RegistryId, EntryId, EntryInput),
    DeleteEntry(RegistryId, EntryId),
    Upload(String),
}

impl Call {
    pub fn operation(&self) -> Operation {
        match self {
            Call::Login(_) => Operation::Login,
            Call::ListTeamMembers(_) => Operation::ListTeamMembers,
            Call::GetTeamMember(_) => Operation::GetTeamMember,
            Call::CreateTeamMember(_) => Operation::CreateTeamMember,
            Call::UpdateTeamMember(..) => Operation::UpdateTeamMember,
            Call::DeleteTeamMember(_) => Operation::DeleteTeamMember,
            Call::ListFields(_) => Operation::ListFields,
            Call::GetField(_) => Operation::GetField,
            Call::CreateField(_) => Operation::CreateField,
            Call::UpdateField(..) => Operation::UpdateField,
            Call::DeleteField(_) => Operation::DeleteField,
            Call::ListRegistries(_) => Operation::ListRegistries,
            Call::GetRegistry(_) => Operation::GetRegistry,
            Call::CreateRegistry(_) => Operation::CreateRegistry,
            Call::UpdateRegistry(..) => Operation::UpdateRegistry,
            Call::DeleteRegistry(_) => Operation::DeleteRegistry,
            Call::ListEntries(..) => Operation::ListEntries,
            Call::CreateEntry(..) => Operation::CreateEntry,
            Call::UpdateEntry(..) => Operation::UpdateEntry,
            Call::DeleteEntry(..) => Operation::DeleteEntry,
            Call::Upload(_) => Operation::Upload,
        }
    }
}

// ============================================================================
// MOCK API
// ============================================================================

#[derive(Debug, Default)]
struct MockState {
    members: Vec<TeamMember>,
    fields: Vec<FieldDefinition>,
    registries: Vec<Registry>,
    entries: Vec<RegistryEntry>,
    next_id: u64,
    calls: Vec<Call>,
    failures: HashMap<Operation, VecDeque<ApiError>>,
}

impl MockState {
    fn allocate_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn record(&mut self, call: Call) -> ApiResult<()> {
        let operation = call.operation();
        self.calls.push(call);
        match self.failures.get_mut(&operation).and_then(VecDeque::pop_front) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn entries_count(&self, registry_id: RegistryId) -> u64 {
        self.entries
            .iter()
            .filter(|e| e.registry_id == registry_id)
            .count() as u64
    }

    fn refresh_counts(&mut self) {
        let counts: Vec<u64> = self
            .registries
            .iter()
            .map(|r| self.entries_count(r.id))
            .collect();
        for (registry, count) in self.registries.iter_mut().zip(counts) {
            registry.entries_count = count;
        }
    }
}

fn not_found(what: &str) -> ApiError {
    ApiError::server(404, format!("{what} not found"))
}

/// In-memory stand-in for the HTTP backend.
///
/// Behaves like the real server: it paginates team members and entries,
/// computes `entriesCount`, and rejects bad credentials with a 401.
#[derive(Debug, Default)]
pub struct MockRosterApi {
    state: Mutex<MockState>,
}

impl MockRosterApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// A backend holding the [`fixtures`] data.
    pub fn seeded() -> Self {
        let api = Self::new();
        {
            let mut state = api.lock();
            state.members = fixtures::team_members();
            state.fields = fixtures::fields();
            state.registries = fixtures::registries();
            state.entries = fixtures::entries();
            state.next_id = 100;
            state.refresh_counts();
        }
        api
    }

    /// Make the next call of `operation` fail with `err`.
    pub fn fail_next(&self, operation: Operation, err: ApiError) {
        self.lock()
            .failures
            .entry(operation)
            .or_default()
            .push_back(err);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.lock().calls.clone()
    }

    pub fn call_count(&self, operation: Operation) -> usize {
        self.lock()
            .calls
            .iter()
            .filter(|c| c.operation() == operation)
            .count()
    }

    pub fn total_calls(&self) -> usize {
        self.lock().calls.len()
    }

    pub fn clear_calls(&self) {
        self.lock().calls.clear();
    }

    pub fn team_members(&self) -> Vec<TeamMember> {
        self.lock().members.clone()
    }

    pub fn entries_of(&self, registry_id: RegistryId) -> Vec<RegistryEntry> {
        self.lock()
            .entries
            .iter()
            .filter(|e| e.registry_id == registry_id)
            .cloned()
            .collect()
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl RosterApi for MockRosterApi {
    async fn login(&self, credentials: &LoginRequest) -> ApiResult<LoginResponse> {
        self.lock().record(Call::Login(credentials.clone()))?;
        if credentials.username == VALID_USERNAME && credentials.password == VALID_PASSWORD {
            Ok(LoginResponse {
                token: VALID_TOKEN.to_string(),
            })
        } else {
            Err(ApiError::server(401, "Invalid credentials"))
        }
    }

    async fn list_team_members(&self, params: &ListParams) -> ApiResult<Page<TeamMember>> {
        let members = {
            let mut state = self.lock();
            state.record(Call::ListTeamMembers(params.clone()))?;
            state.members.clone()
        };
        tokio::task::yield_now().await;
        Ok(Page::refine(members, params))
    }

    async fn get_team_member(&self, id: TeamMemberId) -> ApiResult<TeamMember> {
        let mut state = self.lock();
        state.record(Call::GetTeamMember(id))?;
        state
            .members
            .iter()
            .find(|m| m.id == id)
            .cloned()
            .ok_or_else(|| not_found("Team member"))
    }

    async fn create_team_member(&self, input: &TeamMemberInput) -> ApiResult<TeamMember> {
        let mut state = self.lock();
        state.record(Call::CreateTeamMember(input.clone()))?;
        let member = TeamMember {
            id: TeamMemberId::new(state.allocate_id()),
            name: input.name.clone(),
            role: input.role,
            age: input.age,
            photo: input.photo.clone(),
        };
        state.members.push(member.clone());
        Ok(member)
    }

    async fn update_team_member(
        &self,
        id: TeamMemberId,
        input: &TeamMemberInput,
    ) -> ApiResult<TeamMember> {
        let mut state = self.lock();
        state.record(Call::UpdateTeamMember(id, input.clone()))?;
        let member = state
            .members
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or_else(|| not_found("Team member"))?;
        member.name = input.name.clone();
        member.role = input.role;
        member.age = input.age;
        member.photo = input.photo.clone();
        Ok(member.clone())
    }

    async fn delete_team_member(&self, id: TeamMemberId) -> ApiResult<()> {
        let mut state = self.lock();
        state.record(Call::DeleteTeamMember(id))?;
        let before = state.members.len();
        state.members.retain(|m| m.id != id);
        if state.members.len() == before {
            return Err(not_found("Team member"));
        }
        Ok(())
    }

    async fn list_fields(&self, params: &ListParams) -> ApiResult<Vec<FieldDefinition>> {
        let fields = {
            let mut state = self.lock();
            state.record(Call::ListFields(params.clone()))?;
            state.fields.clone()
        };
        tokio::task::yield_now().await;
        Ok(fields)
    }

    async fn get_field(&self, id: FieldId) -> ApiResult<FieldDefinition> {
        let mut state = self.lock();
        state.record(Call::GetField(id))?;
        state
            .fields
            .iter()
            .find(|f| f.id == id)
            .cloned()
            .ok_or_else(|| not_found("Field"))
    }

    async fn create_field(&self, input: &FieldInput) -> ApiResult<FieldDefinition> {
        let mut state = self.lock();
        state.record(Call::CreateField(input.clone()))?;
        let field = FieldDefinition {
            id: FieldId::new(state.allocate_id()),
            name: input.name.clone(),
            label: input.label.clone(),
            field_type: input.field_type,
            required: input.required,
            default_value: input.default_value.clone(),
        };
        state.fields.push(field.clone());
        Ok(field)
    }

    async fn update_field(&self, id: FieldId, input: &FieldInput) -> ApiResult<FieldDefinition> {
        let mut state = self.lock();
        state.record(Call::UpdateField(id, input.clone()))?;
        let field = state
            .fields
            .iter_mut()
            .find(|f| f.id == id)
            .ok_or_else(|| not_found("Field"))?;
        field.name = input.name.clone();
        field.label = input.label.clone();
        field.field_type = input.field_type;
        field.required = input.required;
        field.default_value = input.default_value.clone();
        Ok(field.clone())
    }

    async fn delete_field(&self, id: FieldId) -> ApiResult<()> {
        let mut state = self.lock();
        state.record(Call::DeleteField(id))?;
        let before = state.fields.len();
        state.fields.retain(|f| f.id != id);
        if state.fields.len() == before {
            return Err(not_found("Field"));
        }
        Ok(())
    }

    async fn list_registries(&self, params: &ListParams) -> ApiResult<Vec<Registry>> {
        let registries = {
            let mut state = self.lock();
            state.record(Call::ListRegistries(params.clone()))?;
            state.registries.clone()
        };
        tokio::task::yield_now().await;
        Ok(registries)
    }

    async fn get_registry(&self, id: RegistryId) -> ApiResult<Registry> {
        let mut state = self.lock();
        state.record(Call::GetRegistry(id))?;
        state
            .registries
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or_else(|| not_found("Registry"))
    }

    async fn create_registry(&self, input: &RegistryInput) -> ApiResult<Registry> {
        let mut state = self.lock();
        state.record(Call::CreateRegistry(input.clone()))?;
        let registry = Registry {
            id: RegistryId::new(state.allocate_id()),
            name: input.name.clone(),
            entries_count: 0,
        };
        state.registries.push(registry.clone());
        Ok(registry)
    }

    async fn update_registry(&self, id: RegistryId, input: &RegistryInput) -> ApiResult<Registry> {
        let mut state = self.lock();
        state.record(Call::UpdateRegistry(id, input.clone()))?;
        let registry = state
            .registries
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| not_found("Registry"))?;
        registry.name = input.name.clone();
        Ok(registry.clone())
    }

    async fn delete_registry(&self, id: RegistryId) -> ApiResult<()> {
        let mut state = self.lock();
        state.record(Call::DeleteRegistry(id))?;
        let before = state.registries.len();
        state.registries.retain(|r| r.id != id);
        if state.registries.len() == before {
            return Err(not_found("Registry"));
        }
        state.entries.retain(|e| e.registry_id != id);
        Ok(())
    }

    async fn list_registry_entries(
        &self,
        registry_id: RegistryId,
        window: PageWindow,
    ) -> ApiResult<Page<RegistryEntry>> {
        let entries = {
            let mut state = self.lock();
            state.record(Call::ListEntries(registry_id, window))?;
            if !state.registries.iter().any(|r| r.id == registry_id) {
                return Err(not_found("Registry"));
            }
            state
                .entries
                .iter()
                .filter(|e| e.registry_id == registry_id)
                .cloned()
                .collect::<Vec<_>>()
        };
        tokio::task::yield_now().await;
        let params = ListParams {
            page: window.page,
            limit: window.limit,
            ..ListParams::default()
        };
        Ok(Page::refine(entries, &params))
    }

    async fn create_registry_entry(
        &self,
        registry_id: RegistryId,
        input: &EntryInput,
    ) -> ApiResult<RegistryEntry> {
        let mut state = self.lock();
        state.record(Call::CreateEntry(registry_id, input.clone()))?;
        if !state.registries.iter().any(|r| r.id == registry_id) {
            return Err(not_found("Registry"));
        }
        let entry = RegistryEntry {
            id: EntryId::new(state.allocate_id()),
            value: input.value.clone(),
            registry_id,
        };
        state.entries.push(entry.clone());
        state.refresh_counts();
        Ok(entry)
    }

    async fn update_registry_entry(
        &self,
        registry_id: RegistryId,
        entry_id: EntryId,
        input: &EntryInput,
    ) -> ApiResult<RegistryEntry> {
        let mut state = self.lock();
        state.record(Call::UpdateEntry(registry_id, entry_id, input.clone()))?;
        let entry = state
            .entries
            .iter_mut()
            .find(|e| e.id == entry_id && e.registry_id == registry_id)
            .ok_or_else(|| not_found("Entry"))?;
        entry.value = input.value.clone();
        Ok(entry.clone())
    }

    async fn delete_registry_entry(
        &self,
        registry_id: RegistryId,
        entry_id: EntryId,
    ) -> ApiResult<()> {
        let mut state = self.lock();
        state.record(Call::DeleteEntry(registry_id, entry_id))?;
        let before = state.entries.len();
        state
            .entries
            .retain(|e| !(e.id == entry_id && e.registry_id == registry_id));
        if state.entries.len() == before {
            return Err(not_found("Entry"));
        }
        state.refresh_counts();
        Ok(())
    }

    async fn upload(&self, file_name: &str, bytes: Vec<u8>) -> ApiResult<UploadResponse> {
        self.lock().record(Call::Upload(file_name.to_string()))?;
        if bytes.is_empty() {
            return Err(ApiError::server(400, "Empty file"));
        }
        Ok(UploadResponse {
            url: format!("{UPLOAD_BASE_URL}/{file_name}"),
        })
    }
}

// ============================================================================
// FIXTURES
// ============================================================================

pub mod fixtures {
    //! Seed data for the mock backend.

    use super::*;

    pub fn team_members() -> Vec<TeamMember> {
        vec![
            member(1, "John Doe", Role::Developer, 30),
            member(2, "Jane Smith", Role::Designer, 28),
            member(3, "Mike Johnson", Role::Manager, 35),
        ]
    }

    pub fn member(id: u64, name: &str, role: Role, age: u8) -> TeamMember {
        TeamMember {
            id: TeamMemberId::new(id),
            name: name.to_string(),
            role,
            age,
            photo: None,
        }
    }

    pub fn fields() -> Vec<FieldDefinition> {
        vec![
            field(1, "email", "Email Address", FieldType::Email, true),
            field(2, "phone", "Phone Number", FieldType::Phone, false),
            field(3, "department", "Department", FieldType::Dropdown, true),
        ]
    }

    pub fn field(
        id: u64,
        name: &str,
        label: &str,
        field_type: FieldType,
        required: bool,
    ) -> FieldDefinition {
        FieldDefinition {
            id: FieldId::new(id),
            name: name.to_string(),
            label: label.to_string(),
            field_type,
            required,
            default_value: None,
        }
    }

    pub fn registries() -> Vec<Registry> {
        vec![
            Registry {
                id: RegistryId::new(1),
                name: "Roles".to_string(),
                entries_count: 0,
            },
            Registry {
                id: RegistryId::new(2),
                name: "Departments".to_string(),
                entries_count: 0,
            },
        ]
    }

    pub fn entries() -> Vec<RegistryEntry> {
        let roles = ["Lead", "Member", "Observer"]
            .iter()
            .enumerate()
            .map(|(i, v)| entry(10 + i as u64, v, 1));
        let departments = ["Engineering", "Design", "Sales", "Support", "Finance"]
            .iter()
            .enumerate()
            .map(|(i, v)| entry(20 + i as u64, v, 2));
        roles.chain(departments).collect()
    }

    pub fn entry(id: u64, value: &str, registry_id: u64) -> RegistryEntry {
        RegistryEntry {
            id: EntryId::new(id),
            value: value.to_string(),
            registry_id: RegistryId::new(registry_id),
        }
    }
}

// ============================================================================
// PROPTEST GENERATORS
// ============================================================================

pub mod generators {
    //! Proptest strategies for roster drafts and list parameters.

    use super::*;
    use proptest::prelude::*;
    use roster_core::{EntryDraft, SortOrder, TeamMemberDraft, AGE_MAX, AGE_MIN};

    pub fn arb_role() -> impl Strategy<Value = Role> {
        prop_oneof![
            Just(Role::Developer),
            Just(Role::Designer),
            Just(Role::Manager)
        ]
    }

    /// Drafts that pass validation.
    pub fn arb_valid_member_draft() -> impl Strategy<Value = TeamMemberDraft> {
        ("[A-Z][a-z]{1,12}( [A-Z][a-z]{1,12})?", arb_role(), AGE_MIN..=AGE_MAX).prop_map(
            |(name, role, age)| TeamMemberDraft {
                name,
                role: Some(role),
                age: age.to_string(),
                photo: None,
            },
        )
    }

    pub fn arb_entry_draft() -> impl Strategy<Value = EntryDraft> {
        (" {0,2}", "[a-z]{1,10}", " {0,2}").prop_map(|(l, v, r)| EntryDraft {
            value: format!("{l}{v}{r}"),
        })
    }

    pub fn arb_list_params() -> impl Strategy<Value = ListParams> {
        (
            1u32..5,
            1u32..20,
            prop::option::of(prop_oneof![Just("name".to_string()), Just("age".to_string())]),
            prop::bool::ANY,
        )
            .prop_map(|(page, limit, sort_by, desc)| ListParams {
                page,
                limit,
                sort_by,
                sort_order: if desc { SortOrder::Desc } else { SortOrder::Asc },
                filter: None,
            })
    }
}
