//! Client-side validation schemas.
//!
//! Each resource has a draft type holding raw form input. Validating a draft
//! either yields the payload to send or the complete list of field errors, so
//! a form can show every violation at once and nothing reaches the network.

use crate::entities::{
    EntryInput, FieldDefinition, FieldInput, Registry, RegistryEntry, RegistryInput, TeamMember,
    TeamMemberInput,
};
use crate::enums::{FieldType, Role};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const NAME_MIN_CHARS: usize = 2;
pub const AGE_MIN: u8 = 18;
pub const AGE_MAX: u8 = 100;

/// One violated rule on one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Every violation found in a draft.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ValidationErrors {
    pub errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: &str, message: impl Into<String>) {
        self.errors.push(FieldError::new(field, message));
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// First message reported for `field`, for inline display.
    pub fn message_for(&self, field: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    fn into_result<T>(self, value: impl FnOnce() -> T) -> Result<T, ValidationErrors> {
        if self.errors.is_empty() {
            Ok(value())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .errors
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect();
        write!(f, "Validation failed: {}", parts.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

/// A schema check turning raw input into a request payload.
pub trait Validate {
    type Output;

    fn validate(&self) -> Result<Self::Output, ValidationErrors>;
}

fn check_min_chars(errors: &mut ValidationErrors, field: &str, label: &str, value: &str) {
    if value.trim().chars().count() < NAME_MIN_CHARS {
        errors.push(
            field,
            format!("{label} must be at least {NAME_MIN_CHARS} characters"),
        );
    }
}

/// Uploaded photos come back as absolute URLs; a local path never does.
fn looks_like_url(value: &str) -> bool {
    value.starts_with("http://") || value.starts_with("https://")
}

fn optional_text(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

// ============================================================================
// TEAM MEMBER
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TeamMemberDraft {
    pub name: String,
    pub role: Option<Role>,
    /// Raw text from the age input.
    pub age: String,
    pub photo: Option<String>,
}

impl From<&TeamMember> for TeamMemberDraft {
    fn from(member: &TeamMember) -> Self {
        Self {
            name: member.name.clone(),
            role: Some(member.role),
            age: member.age.to_string(),
            photo: member.photo.clone(),
        }
    }
}

impl Validate for TeamMemberDraft {
    type Output = TeamMemberInput;

    fn validate(&self) -> Result<TeamMemberInput, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_min_chars(&mut errors, "name", "Name", &self.name);

        if self.role.is_none() {
            errors.push("role", "Role is required");
        }

        let age = match self.age.trim().parse::<i64>() {
            Ok(age) if age < i64::from(AGE_MIN) => {
                errors.push("age", format!("Age must be at least {AGE_MIN}"));
                None
            }
            Ok(age) if age > i64::from(AGE_MAX) => {
                errors.push("age", format!("Age must be at most {AGE_MAX}"));
                None
            }
            Ok(age) => u8::try_from(age).ok(),
            Err(_) => {
                errors.push("age", "Age must be a whole number");
                None
            }
        };

        let photo = self.photo.as_deref().and_then(optional_text);
        if let Some(url) = photo.as_deref() {
            if !looks_like_url(url) {
                errors.push("photo", "Photo must be an uploaded URL (press Ctrl+U to upload)");
            }
        }

        errors.into_result(|| TeamMemberInput {
            name: self.name.trim().to_string(),
            role: self.role.unwrap_or(Role::Developer),
            age: age.unwrap_or(AGE_MIN),
            photo,
        })
    }
}

// ============================================================================
// FIELD DEFINITION
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FieldDraft {
    pub name: String,
    pub label: String,
    pub field_type: FieldType,
    pub required: bool,
    pub default_value: String,
}

impl From<&FieldDefinition> for FieldDraft {
    fn from(field: &FieldDefinition) -> Self {
        Self {
            name: field.name.clone(),
            label: field.label.clone(),
            field_type: field.field_type,
            required: field.required,
            default_value: field.default_value.clone().unwrap_or_default(),
        }
    }
}

impl Validate for FieldDraft {
    type Output = FieldInput;

    fn validate(&self) -> Result<FieldInput, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_min_chars(&mut errors, "name", "Name", &self.name);
        check_min_chars(&mut errors, "label", "Label", &self.label);

        errors.into_result(|| FieldInput {
            name: self.name.trim().to_string(),
            label: self.label.trim().to_string(),
            field_type: self.field_type,
            required: self.required,
            default_value: optional_text(&self.default_value),
        })
    }
}

// ============================================================================
// REGISTRY
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RegistryDraft {
    pub name: String,
}

impl From<&Registry> for RegistryDraft {
    fn from(registry: &Registry) -> Self {
        Self {
            name: registry.name.clone(),
        }
    }
}

impl Validate for RegistryDraft {
    type Output = RegistryInput;

    fn validate(&self) -> Result<RegistryInput, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_min_chars(&mut errors, "name", "Name", &self.name);
        errors.into_result(|| RegistryInput {
            name: self.name.trim().to_string(),
        })
    }
}

// ============================================================================
// REGISTRY ENTRY
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EntryDraft {
    pub value: String,
}

impl From<&RegistryEntry> for EntryDraft {
    fn from(entry: &RegistryEntry) -> Self {
        Self {
            value: entry.value.clone(),
        }
    }
}

impl Validate for EntryDraft {
    type Output = EntryInput;

    fn validate(&self) -> Result<EntryInput, ValidationErrors> {
        let value = self.value.trim();
        if value.is_empty() {
            let mut errors = ValidationErrors::new();
            errors.push("value", "Value is required");
            return Err(errors);
        }
        Ok(EntryInput {
            value: value.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member_draft(name: &str, age: &str) -> TeamMemberDraft {
        TeamMemberDraft {
            name: name.to_string(),
            role: Some(Role::Developer),
            age: age.to_string(),
            photo: None,
        }
    }

    #[test]
    fn single_char_name_is_rejected() {
        let errors = member_draft("J", "30").validate().unwrap_err();
        assert_eq!(errors.message_for("name"), Some("Name must be at least 2 characters"));
    }

    #[test]
    fn two_char_name_passes() {
        let input = member_draft("Jo", "30").validate().unwrap();
        assert_eq!(input.name, "Jo");
        assert_eq!(input.age, 30);
    }

    #[test]
    fn all_violations_are_reported_together() {
        let draft = TeamMemberDraft {
            name: String::new(),
            role: None,
            age: "17".into(),
            photo: Some("not a url".into()),
        };
        let errors = draft.validate().unwrap_err();
        assert_eq!(errors.len(), 4);
        assert!(errors.message_for("role").is_some());
        assert_eq!(errors.message_for("age"), Some("Age must be at least 18"));
        assert!(errors.message_for("photo").is_some());
    }

    #[test]
    fn age_must_be_numeric() {
        let errors = member_draft("Jane", "thirty").validate().unwrap_err();
        assert_eq!(errors.message_for("age"), Some("Age must be a whole number"));
    }

    #[test]
    fn local_photo_path_must_be_uploaded_first() {
        let mut draft = member_draft("Ana", "31");
        draft.photo = Some("/home/ana/face.png".into());
        let errors = draft.validate().unwrap_err();
        assert!(errors.message_for("photo").is_some());

        draft.photo = Some("https://cdn.roster.test/uploads/face.png".into());
        assert_eq!(
            draft.validate().unwrap().photo.as_deref(),
            Some("https://cdn.roster.test/uploads/face.png")
        );
    }

    #[test]
    fn blank_photo_is_treated_as_absent() {
        let mut draft = member_draft("Jane", "28");
        draft.photo = Some("   ".into());
        assert_eq!(draft.validate().unwrap().photo, None);
    }

    #[test]
    fn field_draft_defaults_and_trims() {
        let draft = FieldDraft {
            name: " email ".into(),
            label: "Email Address".into(),
            ..FieldDraft::default()
        };
        let input = draft.validate().unwrap();
        assert_eq!(input.name, "email");
        assert_eq!(input.field_type, FieldType::Text);
        assert!(!input.required);
        assert_eq!(input.default_value, None);
    }

    #[test]
    fn entry_value_is_trimmed() {
        let draft = EntryDraft {
            value: " widget ".into(),
        };
        assert_eq!(draft.validate().unwrap().value, "widget");
        assert!(EntryDraft { value: "   ".into() }.validate().is_err());
    }
}
