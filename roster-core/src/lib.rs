//! Roster Core - Entity Types
//!
//! Data model, validation schemas and the remote API contract shared by the
//! cache, the console and the test utilities. No I/O happens here.

pub mod api;
pub mod entities;
pub mod enums;
pub mod identity;
pub mod paging;
pub mod validation;

pub use api::{ApiError, ApiResult, RosterApi};
pub use entities::{
    EntryInput, EntryListResponse, FieldDefinition, FieldInput, LoginRequest, LoginResponse,
    Registry, RegistryEntry, RegistryInput, TeamMember, TeamMemberInput, TeamMemberListResponse,
    UploadResponse,
};
pub use enums::{FieldType, ParseEnumError, Role, SortOrder};
pub use identity::{EntityIdType, EntryId, FieldId, RegistryId, TeamMemberId};
pub use paging::{ListParams, Listable, Page, PageWindow, SortKey, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
pub use validation::{
    EntryDraft, FieldDraft, FieldError, RegistryDraft, TeamMemberDraft, Validate,
    ValidationErrors, AGE_MAX, AGE_MIN, NAME_MIN_CHARS,
};
