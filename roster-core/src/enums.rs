//! Enum types for roster entities.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// TEAM MEMBER ROLE
// ============================================================================

/// Fixed set of roles a team member may hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[serde(alias = "Developer")]
    Developer,
    #[serde(alias = "Designer")]
    Designer,
    #[serde(alias = "Manager")]
    Manager,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Developer, Role::Designer, Role::Manager];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Developer => "developer",
            Role::Designer => "designer",
            Role::Manager => "manager",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Role::Developer => "Developer",
            Role::Designer => "Designer",
            Role::Manager => "Manager",
        }
    }

    /// Cycle to the next role, used by select-style inputs.
    pub fn next(self) -> Role {
        match self {
            Role::Developer => Role::Designer,
            Role::Designer => Role::Manager,
            Role::Manager => Role::Developer,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_token(s).as_str() {
            "developer" => Ok(Role::Developer),
            "designer" => Ok(Role::Designer),
            "manager" => Ok(Role::Manager),
            _ => Err(ParseEnumError::new("role", s)),
        }
    }
}

// ============================================================================
// FIELD TYPE
// ============================================================================

/// Input type of a custom field definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    #[default]
    Text,
    Number,
    Date,
    Dropdown,
    Email,
    Phone,
    Image,
    File,
}

impl FieldType {
    pub const ALL: [FieldType; 8] = [
        FieldType::Text,
        FieldType::Number,
        FieldType::Date,
        FieldType::Dropdown,
        FieldType::Email,
        FieldType::Phone,
        FieldType::Image,
        FieldType::File,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Number => "number",
            FieldType::Date => "date",
            FieldType::Dropdown => "dropdown",
            FieldType::Email => "email",
            FieldType::Phone => "phone",
            FieldType::Image => "image",
            FieldType::File => "file",
        }
    }

    pub fn next(self) -> FieldType {
        let index = Self::ALL.iter().position(|t| *t == self).unwrap_or(0);
        Self::ALL[(index + 1) % Self::ALL.len()]
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldType {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = normalize_token(s);
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == normalized)
            .ok_or_else(|| ParseEnumError::new("field type", s))
    }
}

// ============================================================================
// SORT ORDER
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }

    pub fn flipped(self) -> SortOrder {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error when parsing an unknown enum token.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid {kind}: {value}")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

impl ParseEnumError {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

fn normalize_token(s: &str) -> String {
    s.trim().to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_accepts_capitalized_wire_values() {
        let role: Role = serde_json::from_str("\"Designer\"").unwrap();
        assert_eq!(role, Role::Designer);
        assert_eq!(serde_json::to_string(&role).unwrap(), "\"designer\"");
    }

    #[test]
    fn field_type_cycles_through_all_variants() {
        let mut current = FieldType::Text;
        for _ in 0..FieldType::ALL.len() {
            current = current.next();
        }
        assert_eq!(current, FieldType::Text);
    }

    #[test]
    fn parse_rejects_unknown_tokens() {
        assert!("intern".parse::<Role>().is_err());
        assert_eq!(" Email ".parse::<FieldType>().unwrap(), FieldType::Email);
    }
}
