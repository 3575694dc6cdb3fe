//! Navigation and view switching utilities.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum View {
    TeamMembers,
    Fields,
    Registries,
    /// Entries of one registry; reached from the registries tab only.
    RegistryEntries,
}

impl View {
    pub fn title(&self) -> &'static str {
        match self {
            View::TeamMembers => "Team Members",
            View::Fields => "Fields",
            View::Registries => "Registries",
            View::RegistryEntries => "Registry Entries",
        }
    }

    /// Views shown as tabs, in order.
    pub fn tabs() -> &'static [View] {
        &[View::TeamMembers, View::Fields, View::Registries]
    }

    /// The tab this view belongs to.
    pub fn tab(&self) -> View {
        match self {
            View::RegistryEntries => View::Registries,
            other => *other,
        }
    }

    pub fn index(&self) -> usize {
        let tab = self.tab();
        Self::tabs().iter().position(|v| *v == tab).unwrap_or(0)
    }

    pub fn from_index(index: usize) -> Option<View> {
        Self::tabs().get(index).copied()
    }

    pub fn next(&self) -> View {
        let tabs = Self::tabs();
        tabs[(self.index() + 1) % tabs.len()]
    }

    pub fn previous(&self) -> View {
        let tabs = Self::tabs();
        let idx = self.index();
        let prev = if idx == 0 { tabs.len() - 1 } else { idx - 1 };
        tabs[prev]
    }
}

/// Where the shell sends the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    View(View),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tabs_cycle_in_both_directions() {
        assert_eq!(View::TeamMembers.next(), View::Fields);
        assert_eq!(View::Registries.next(), View::TeamMembers);
        assert_eq!(View::TeamMembers.previous(), View::Registries);
    }

    #[test]
    fn entries_belong_to_the_registries_tab() {
        assert_eq!(View::RegistryEntries.index(), View::Registries.index());
        assert_eq!(View::RegistryEntries.next(), View::TeamMembers);
        assert_eq!(View::from_index(3), None);
    }
}
