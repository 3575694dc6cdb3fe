//! List view state machine, shared by every resource table.
//!
//! Parameter changes only edit [`ListParams`]; the caller then starts a read
//! with [`ListView::begin_load`] and hands the outcome to
//! [`ListView::apply_load`] together with the ticket it got. A ticket is
//! honoured only if no newer read was started in between, so a slow response
//! for parameters the user already left can never overwrite the table.

use super::form::{FormMode, FormResource, FormState};
use super::next_seq;
use roster_core::{ListParams, Page, SortOrder, MAX_PAGE_SIZE};
use std::sync::Arc;

/// Page sizes offered by the size toggle.
pub const PAGE_SIZES: [u32; 4] = [5, 10, 20, 50];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Idle,
    Loading,
    Ready,
    /// The read failed; no rows are shown.
    Failed(String),
}

/// Identifies one started read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    seq: u64,
    pub params: ListParams,
}

/// Which form, if any, is open over the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenForm<Id> {
    None,
    Create,
    Edit(Id),
}

#[derive(Debug, Clone)]
pub struct ListView<R: FormResource> {
    pub params: ListParams,
    pub rows: Vec<R>,
    pub total_pages: u32,
    pub state: LoadState,
    pub selected: Option<usize>,
    pub form: Option<FormState<R>>,
    pub pending_delete: Option<R>,
    /// Sortable columns, cycled by the sort key.
    pub sort_columns: &'static [&'static str],
    /// Sequence of the latest started read; zero before the first.
    issued: u64,
}

impl<R: FormResource> ListView<R> {
    pub fn new(limit: u32, sort_columns: &'static [&'static str]) -> Self {
        Self {
            params: ListParams::with_limit(limit),
            rows: Vec::new(),
            total_pages: 1,
            state: LoadState::Idle,
            selected: None,
            form: None,
            pending_delete: None,
            sort_columns,
            issued: 0,
        }
    }

    // ------------------------------------------------------------------------
    // Parameters. Each returns whether the query changed.
    // ------------------------------------------------------------------------

    pub fn set_page(&mut self, page: u32) -> bool {
        let page = page.clamp(1, self.total_pages.max(1));
        if page == self.params.page {
            return false;
        }
        self.params.page = page;
        true
    }

    pub fn next_page(&mut self) -> bool {
        self.set_page(self.params.page.saturating_add(1))
    }

    pub fn prev_page(&mut self) -> bool {
        self.set_page(self.params.page.saturating_sub(1))
    }

    /// A new page size starts over at page 1.
    pub fn set_limit(&mut self, limit: u32) -> bool {
        let limit = limit.clamp(1, MAX_PAGE_SIZE);
        if limit == self.params.limit {
            return false;
        }
        self.params.limit = limit;
        self.params.page = 1;
        true
    }

    pub fn cycle_limit(&mut self) -> bool {
        let next = PAGE_SIZES
            .iter()
            .copied()
            .find(|size| *size > self.params.limit)
            .unwrap_or(PAGE_SIZES[0]);
        self.set_limit(next)
    }

    /// Same column flips the direction; a new column sorts ascending.
    pub fn sort_by(&mut self, field: &str) -> bool {
        if self.params.sort_by.as_deref() == Some(field) {
            self.params.sort_order = self.params.sort_order.flipped();
        } else {
            self.params.sort_by = Some(field.to_string());
            self.params.sort_order = SortOrder::Asc;
        }
        true
    }

    pub fn set_sort_order(&mut self, order: SortOrder) -> bool {
        if self.params.sort_order == order {
            return false;
        }
        self.params.sort_order = order;
        true
    }

    /// Move to the next sortable column, ascending.
    pub fn cycle_sort(&mut self) -> bool {
        if self.sort_columns.is_empty() {
            return false;
        }
        let next = match self.params.sort_by.as_deref() {
            Some(current) => self
                .sort_columns
                .iter()
                .position(|c| *c == current)
                .map(|i| (i + 1) % self.sort_columns.len())
                .unwrap_or(0),
            None => 0,
        };
        self.sort_by(self.sort_columns[next])
    }

    /// A new filter starts over at page 1.
    pub fn set_filter(&mut self, text: &str) -> bool {
        let filter = Some(text.trim()).filter(|t| !t.is_empty()).map(str::to_string);
        if filter == self.params.filter {
            return false;
        }
        self.params.filter = filter;
        self.params.page = 1;
        true
    }

    // ------------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------------

    pub fn begin_load(&mut self) -> LoadTicket {
        self.issued = next_seq();
        self.state = LoadState::Loading;
        LoadTicket {
            seq: self.issued,
            params: self.params.clone(),
        }
    }

    pub fn is_current(&self, ticket: &LoadTicket) -> bool {
        ticket.seq == self.issued && ticket.params == self.params
    }

    /// Apply a finished read. Returns `false` when the ticket was superseded
    /// and the outcome dropped.
    pub fn apply_load(
        &mut self,
        ticket: &LoadTicket,
        outcome: Result<Arc<Page<R>>, String>,
    ) -> bool {
        if !self.is_current(ticket) {
            tracing::debug!(
                seq = ticket.seq,
                current = self.issued,
                "dropping superseded list response"
            );
            return false;
        }
        match outcome {
            Ok(page) => {
                self.rows = page.items.clone();
                self.total_pages = page.total_pages.max(1);
                self.state = LoadState::Ready;
                self.selected = match self.selected {
                    _ if self.rows.is_empty() => None,
                    Some(i) => Some(i.min(self.rows.len() - 1)),
                    None => Some(0),
                };
            }
            Err(message) => {
                self.rows.clear();
                self.selected = None;
                self.state = LoadState::Failed(message);
            }
        }
        true
    }

    /// Step back to the last page after a read reported fewer pages than
    /// the one shown, e.g. once its only row was deleted. Returns whether a
    /// reload is needed.
    pub fn clamp_page(&mut self) -> bool {
        if self.state != LoadState::Ready || self.params.page <= self.total_pages {
            return false;
        }
        tracing::debug!(
            page = self.params.page,
            total_pages = self.total_pages,
            "page beyond the last one; stepping back"
        );
        self.params.page = self.total_pages;
        true
    }

    // ------------------------------------------------------------------------
    // Selection
    // ------------------------------------------------------------------------

    pub fn selected_row(&self) -> Option<&R> {
        self.selected.and_then(|i| self.rows.get(i))
    }

    pub fn select_next(&mut self) {
        if self.rows.is_empty() {
            self.selected = None;
            return;
        }
        self.selected = Some(match self.selected {
            Some(i) => (i + 1) % self.rows.len(),
            None => 0,
        });
    }

    pub fn select_previous(&mut self) {
        if self.rows.is_empty() {
            self.selected = None;
            return;
        }
        self.selected = Some(match self.selected {
            Some(0) | None => self.rows.len() - 1,
            Some(i) => i - 1,
        });
    }

    // ------------------------------------------------------------------------
    // Forms and deletion
    // ------------------------------------------------------------------------

    pub fn open_form(&self) -> OpenForm<R::Id> {
        match self.form.as_ref().map(|f| &f.mode) {
            None => OpenForm::None,
            Some(FormMode::Create) => OpenForm::Create,
            Some(FormMode::Edit(record)) => OpenForm::Edit(record.id()),
        }
    }

    /// Replaces any form already open.
    pub fn open_create(&mut self) {
        self.form = Some(FormState::create());
    }

    pub fn open_edit(&mut self, record: &R) {
        self.form = Some(FormState::seeded(record));
    }

    /// Edit the highlighted row, if there is one.
    pub fn open_edit_selected(&mut self) -> bool {
        match self.selected_row().cloned() {
            Some(record) => {
                self.open_edit(&record);
                true
            }
            None => false,
        }
    }

    /// Close after success or cancel, whatever the form's state.
    pub fn close_form(&mut self) {
        self.form = None;
    }

    pub fn request_delete(&mut self) -> bool {
        self.pending_delete = self.selected_row().cloned();
        self.pending_delete.is_some()
    }

    /// The record to delete, once the user confirmed.
    pub fn confirm_delete(&mut self) -> Option<R> {
        self.pending_delete.take()
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roster_core::{EntityIdType, Registry, RegistryId};

    fn registry(id: u64) -> Registry {
        Registry {
            id: RegistryId::new(id),
            name: format!("Registry {id}"),
            entries_count: 0,
        }
    }

    fn loaded(rows: usize, total_pages: u32) -> ListView<Registry> {
        let mut view = ListView::new(10, &["name", "entriesCount"]);
        let ticket = view.begin_load();
        let page = Page::new((1..=rows as u64).map(registry).collect(), total_pages);
        assert!(view.apply_load(&ticket, Ok(Arc::new(page))));
        view
    }

    #[test]
    fn paging_is_bounded_by_total_pages() {
        let mut view = loaded(3, 2);
        assert!(!view.prev_page());
        assert!(view.next_page());
        assert_eq!(view.params.page, 2);
        assert!(!view.next_page());
        assert!(!view.set_page(9));
        assert_eq!(view.params.page, 2);
    }

    #[test]
    fn limit_and_filter_reset_to_first_page() {
        let mut view = loaded(3, 3);
        view.set_page(3);
        assert!(view.set_limit(20));
        assert_eq!(view.params.page, 1);

        view.set_page(2);
        assert!(view.set_filter("  dep "));
        assert_eq!(view.params.filter.as_deref(), Some("dep"));
        assert_eq!(view.params.page, 1);
        assert!(!view.set_filter("dep"));
        assert!(view.set_filter("   "));
        assert_eq!(view.params.filter, None);
    }

    #[test]
    fn sorting_same_column_flips_direction() {
        let mut view = loaded(1, 1);
        view.sort_by("name");
        assert_eq!(view.params.sort_order, SortOrder::Asc);
        view.sort_by("name");
        assert_eq!(view.params.sort_order, SortOrder::Desc);
        view.sort_by("entriesCount");
        assert_eq!(view.params.sort_by.as_deref(), Some("entriesCount"));
        assert_eq!(view.params.sort_order, SortOrder::Asc);
    }

    #[test]
    fn cycle_sort_walks_the_columns() {
        let mut view = loaded(1, 1);
        view.cycle_sort();
        assert_eq!(view.params.sort_by.as_deref(), Some("name"));
        view.cycle_sort();
        assert_eq!(view.params.sort_by.as_deref(), Some("entriesCount"));
        view.cycle_sort();
        assert_eq!(view.params.sort_by.as_deref(), Some("name"));
    }

    #[test]
    fn superseded_response_is_dropped() {
        let mut view = ListView::<Registry>::new(10, &["name"]);
        let first = view.begin_load();
        view.sort_by("name");
        let second = view.begin_load();

        let newer = Page::new(vec![registry(2), registry(1)], 1);
        assert!(view.apply_load(&second, Ok(Arc::new(newer))));
        let older = Page::new(vec![registry(1), registry(2)], 1);
        assert!(!view.apply_load(&first, Ok(Arc::new(older))));

        assert_eq!(view.rows[0].id, RegistryId::new(2));
        assert_eq!(view.state, LoadState::Ready);
    }

    #[test]
    fn rebuilt_view_never_accepts_an_older_ticket() {
        let mut old = ListView::<Registry>::new(10, &["name"]);
        let stale = old.begin_load();

        let mut rebuilt = ListView::<Registry>::new(10, &["name"]);
        let fresh = rebuilt.begin_load();
        assert_eq!(stale.params, fresh.params);
        assert!(!rebuilt.apply_load(&stale, Ok(Arc::new(Page::new(vec![registry(9)], 1)))));
        assert_eq!(rebuilt.state, LoadState::Loading);
        assert!(rebuilt.apply_load(&fresh, Ok(Arc::new(Page::new(vec![registry(1)], 1)))));
    }

    #[test]
    fn shrinking_page_count_steps_back() {
        let mut view = loaded(3, 3);
        view.set_page(3);
        assert!(!view.clamp_page());

        let ticket = view.begin_load();
        view.apply_load(&ticket, Ok(Arc::new(Page::new(Vec::new(), 2))));
        assert!(view.clamp_page());
        assert_eq!(view.params.page, 2);
        assert!(!view.clamp_page());
    }

    #[test]
    fn failed_read_hides_rows() {
        let mut view = loaded(3, 1);
        let ticket = view.begin_load();
        view.apply_load(&ticket, Err("No response from server".into()));
        assert!(view.rows.is_empty());
        assert_eq!(view.selected, None);
        assert_eq!(view.state, LoadState::Failed("No response from server".into()));
    }

    #[test]
    fn forms_open_and_close_unconditionally() {
        let mut view = loaded(2, 1);
        assert_eq!(view.open_form(), OpenForm::None);
        view.open_create();
        assert_eq!(view.open_form(), OpenForm::Create);

        view.select_next();
        assert!(view.open_edit_selected());
        assert_eq!(view.open_form(), OpenForm::Edit(RegistryId::new(2)));

        view.form.as_mut().unwrap().begin_submit();
        view.close_form();
        assert_eq!(view.open_form(), OpenForm::None);
    }

    #[test]
    fn delete_needs_confirmation() {
        let mut view = loaded(2, 1);
        assert!(view.request_delete());
        view.cancel_delete();
        assert!(view.confirm_delete().is_none());

        view.request_delete();
        assert_eq!(view.confirm_delete().map(|r| r.id), Some(RegistryId::new(1)));
    }
}
