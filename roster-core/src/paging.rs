//! List parameters and paged results.
//!
//! Team members and registry entries are paginated by the server. Fields and
//! registries come back as plain arrays, so [`Page::refine`] applies the same
//! filter, sort and page window locally to keep every list view uniform.

use crate::entities::{FieldDefinition, Registry, RegistryEntry, TeamMember};
use crate::enums::SortOrder;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const MAX_PAGE_SIZE: u32 = 100;

/// Parameters that shape a list read. Part of every query key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    /// 1-based page number.
    pub page: u32,
    pub limit: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<String>,
    pub sort_order: SortOrder,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
}

impl Default for ListParams {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_SIZE,
            sort_by: None,
            sort_order: SortOrder::Asc,
            filter: None,
        }
    }
}

impl ListParams {
    pub fn with_limit(limit: u32) -> Self {
        Self {
            limit: limit.clamp(1, MAX_PAGE_SIZE),
            ..Self::default()
        }
    }

    /// Pagination only; entry reads take no sort or filter.
    pub fn page_window(&self) -> PageWindow {
        PageWindow {
            page: self.page,
            limit: self.limit,
        }
    }
}

/// The `page`/`limit` pair sent to the entries endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageWindow {
    pub page: u32,
    pub limit: u32,
}

/// One page of rows plus the server's page count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_pages: u32,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total_pages: u32) -> Self {
        Self { items, total_pages }
    }

    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            total_pages: 1,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T: Listable> Page<T> {
    /// Filter, sort and window an unpaged collection.
    pub fn refine(mut items: Vec<T>, params: &ListParams) -> Self {
        if let Some(filter) = params.filter.as_deref().map(str::trim).filter(|f| !f.is_empty()) {
            let needle = filter.to_lowercase();
            items.retain(|item| item.search_text().to_lowercase().contains(&needle));
        }

        if let Some(field) = params.sort_by.as_deref() {
            items.sort_by(|a, b| {
                let ordering = match (a.sort_key(field), b.sort_key(field)) {
                    (Some(a), Some(b)) => a.cmp(&b),
                    (Some(_), None) => Ordering::Less,
                    (None, Some(_)) => Ordering::Greater,
                    (None, None) => Ordering::Equal,
                };
                match params.sort_order {
                    SortOrder::Asc => ordering,
                    SortOrder::Desc => ordering.reverse(),
                }
            });
        }

        let limit = params.limit.max(1) as usize;
        let total_pages = items.len().div_ceil(limit).max(1) as u32;
        let start = (params.page.max(1) as usize - 1) * limit;
        let items = items.into_iter().skip(start).take(limit).collect();
        Self { items, total_pages }
    }
}

/// Comparable projection of a column value.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum SortKey {
    Number(i64),
    Flag(bool),
    Text(String),
}

/// A row type that can be filtered and sorted locally.
pub trait Listable {
    /// Text matched by the filter box.
    fn search_text(&self) -> &str;

    /// Value of the named column, or `None` for unknown columns.
    fn sort_key(&self, field: &str) -> Option<SortKey>;
}

impl Listable for TeamMember {
    fn search_text(&self) -> &str {
        &self.name
    }

    fn sort_key(&self, field: &str) -> Option<SortKey> {
        match field {
            "name" => Some(SortKey::Text(self.name.to_lowercase())),
            "role" => Some(SortKey::Text(self.role.as_str().to_string())),
            "age" => Some(SortKey::Number(i64::from(self.age))),
            _ => None,
        }
    }
}

impl Listable for FieldDefinition {
    fn search_text(&self) -> &str {
        &self.label
    }

    fn sort_key(&self, field: &str) -> Option<SortKey> {
        match field {
            "name" => Some(SortKey::Text(self.name.to_lowercase())),
            "label" => Some(SortKey::Text(self.label.to_lowercase())),
            "type" => Some(SortKey::Text(self.field_type.as_str().to_string())),
            "required" => Some(SortKey::Flag(self.required)),
            _ => None,
        }
    }
}

impl Listable for Registry {
    fn search_text(&self) -> &str {
        &self.name
    }

    fn sort_key(&self, field: &str) -> Option<SortKey> {
        match field {
            "name" => Some(SortKey::Text(self.name.to_lowercase())),
            "entriesCount" => Some(SortKey::Number(self.entries_count as i64)),
            _ => None,
        }
    }
}

impl Listable for RegistryEntry {
    fn search_text(&self) -> &str {
        &self.value
    }

    fn sort_key(&self, field: &str) -> Option<SortKey> {
        match field {
            "value" => Some(SortKey::Text(self.value.to_lowercase())),
            _ => None,
        }
    }
}
