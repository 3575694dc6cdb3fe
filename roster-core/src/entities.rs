//! Entity and payload types exchanged with the roster API.

use crate::enums::{FieldType, Role};
use crate::identity::{EntryId, FieldId, RegistryId, TeamMemberId};
use serde::{Deserialize, Serialize};

// ============================================================================
// STORED RECORDS
// ============================================================================

/// A person on the team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamMember {
    pub id: TeamMemberId,
    pub name: String,
    pub role: Role,
    pub age: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
}

/// A custom attribute schema entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDefinition {
    pub id: FieldId,
    pub name: String,
    pub label: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
}

/// A named grouping of lookup entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registry {
    pub id: RegistryId,
    pub name: String,
    /// Computed by the server; only ever refreshed by a new read.
    #[serde(default)]
    pub entries_count: u64,
}

/// A value owned by exactly one registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistryEntry {
    pub id: EntryId,
    pub value: String,
    pub registry_id: RegistryId,
}

// ============================================================================
// WRITE PAYLOADS
// ============================================================================

/// Body of a team member create or update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamMemberInput {
    pub name: String,
    pub role: Role,
    pub age: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldInput {
    pub name: String,
    pub label: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryInput {
    pub name: String,
}

/// Body of an entry create or update. The owning registry travels in the
/// path, never in the body, so an update cannot move an entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryInput {
    pub value: String,
}

// ============================================================================
// AUTH AND UPLOAD
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResponse {
    pub url: String,
}

// ============================================================================
// LIST RESPONSES
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMemberListResponse {
    pub team_members: Vec<TeamMember>,
    pub total_pages: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryListResponse {
    pub entries: Vec<RegistryEntry>,
    pub total_pages: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::EntityIdType;

    #[test]
    fn field_definition_uses_wire_names() {
        let json = r#"{"id":1,"name":"email","label":"Email Address","type":"email","required":true}"#;
        let field: FieldDefinition = serde_json::from_str(json).unwrap();
        assert_eq!(field.field_type, FieldType::Email);
        assert!(field.default_value.is_none());

        let input = FieldInput {
            name: "phone".into(),
            label: "Phone".into(),
            field_type: FieldType::Phone,
            required: false,
            default_value: Some("n/a".into()),
        };
        let value = serde_json::to_value(&input).unwrap();
        assert_eq!(value["type"], "phone");
        assert_eq!(value["defaultValue"], "n/a");
    }

    #[test]
    fn registry_tolerates_missing_count() {
        let registry: Registry = serde_json::from_str(r#"{"id":2,"name":"Departments"}"#).unwrap();
        assert_eq!(registry.id.get(), 2);
        assert_eq!(registry.entries_count, 0);
    }

    #[test]
    fn entry_list_response_decodes() {
        let json = r#"{"entries":[{"id":5,"value":"widget","registryId":2}],"totalPages":3}"#;
        let page: EntryListResponse = serde_json::from_str(json).unwrap();
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.entries[0].registry_id, RegistryId::new(2));
    }
}
