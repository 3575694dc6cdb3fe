//! Query keys and invalidation prefixes.

use roster_core::{ListParams, RegistryId};
use std::fmt;

/// A resource collection with its own endpoints and cache namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceFamily {
    TeamMembers,
    Fields,
    Registries,
    RegistryEntries,
}

impl ResourceFamily {
    pub fn name(&self) -> &'static str {
        match self {
            ResourceFamily::TeamMembers => "teamMembers",
            ResourceFamily::Fields => "fields",
            ResourceFamily::Registries => "registries",
            ResourceFamily::RegistryEntries => "registryEntries",
        }
    }

    pub fn all() -> &'static [ResourceFamily] {
        &[
            ResourceFamily::TeamMembers,
            ResourceFamily::Fields,
            ResourceFamily::Registries,
            ResourceFamily::RegistryEntries,
        ]
    }
}

impl fmt::Display for ResourceFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Everything that determines the result of one list read.
///
/// Two reads with equal keys are interchangeable.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    pub family: ResourceFamily,
    /// Owning registry; only set for [`ResourceFamily::RegistryEntries`].
    pub registry_id: Option<RegistryId>,
    pub params: ListParams,
}

impl QueryKey {
    pub fn team_members(params: ListParams) -> Self {
        Self {
            family: ResourceFamily::TeamMembers,
            registry_id: None,
            params,
        }
    }

    pub fn fields(params: ListParams) -> Self {
        Self {
            family: ResourceFamily::Fields,
            registry_id: None,
            params,
        }
    }

    pub fn registries(params: ListParams) -> Self {
        Self {
            family: ResourceFamily::Registries,
            registry_id: None,
            params,
        }
    }

    pub fn registry_entries(registry_id: RegistryId, params: ListParams) -> Self {
        Self {
            family: ResourceFamily::RegistryEntries,
            registry_id: Some(registry_id),
            params,
        }
    }

    pub fn matches(&self, prefix: &QueryPrefix) -> bool {
        if self.family != prefix.family {
            return false;
        }
        match prefix.registry_id {
            Some(registry_id) => self.registry_id == Some(registry_id),
            None => true,
        }
    }

    /// The narrowest prefix covering this key.
    pub fn prefix(&self) -> QueryPrefix {
        QueryPrefix {
            family: self.family,
            registry_id: self.registry_id,
        }
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.family)?;
        if let Some(registry_id) = self.registry_id {
            write!(f, "/{registry_id}")?;
        }
        write!(
            f,
            "[page={},limit={},sort={}:{}",
            self.params.page,
            self.params.limit,
            self.params.sort_by.as_deref().unwrap_or("-"),
            self.params.sort_order
        )?;
        if let Some(filter) = &self.params.filter {
            write!(f, ",filter={filter:?}")?;
        }
        f.write_str("]")
    }
}

/// Selects a set of keys for invalidation: a whole family, or the entries
/// of one registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct QueryPrefix {
    pub family: ResourceFamily,
    pub registry_id: Option<RegistryId>,
}

impl QueryPrefix {
    pub fn family(family: ResourceFamily) -> Self {
        Self {
            family,
            registry_id: None,
        }
    }

    pub fn registry_entries(registry_id: RegistryId) -> Self {
        Self {
            family: ResourceFamily::RegistryEntries,
            registry_id: Some(registry_id),
        }
    }
}

impl From<ResourceFamily> for QueryPrefix {
    fn from(family: ResourceFamily) -> Self {
        Self::family(family)
    }
}

impl fmt::Display for QueryPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.registry_id {
            Some(registry_id) => write!(f, "{}/{}", self.family, registry_id),
            None => write!(f, "{}", self.family),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roster_core::{EntityIdType, SortOrder};

    #[test]
    fn family_prefix_matches_every_parameter_combination() {
        let prefix = QueryPrefix::family(ResourceFamily::TeamMembers);
        let sorted = QueryKey::team_members(ListParams {
            sort_by: Some("age".into()),
            sort_order: SortOrder::Desc,
            ..ListParams::default()
        });
        assert!(QueryKey::team_members(ListParams::default()).matches(&prefix));
        assert!(sorted.matches(&prefix));
        assert!(!QueryKey::fields(ListParams::default()).matches(&prefix));
    }

    #[test]
    fn entry_prefix_is_scoped_to_its_registry() {
        let two = QueryKey::registry_entries(RegistryId::new(2), ListParams::default());
        let three = QueryKey::registry_entries(RegistryId::new(3), ListParams::default());
        let prefix = QueryPrefix::registry_entries(RegistryId::new(2));
        assert!(two.matches(&prefix));
        assert!(!three.matches(&prefix));
        assert!(three.matches(&QueryPrefix::family(ResourceFamily::RegistryEntries)));
    }

    #[test]
    fn display_is_readable_in_logs() {
        let key = QueryKey::registry_entries(RegistryId::new(2), ListParams::default());
        assert_eq!(key.to_string(), "registryEntries/2[page=1,limit=10,sort=-:asc]");
    }
}
