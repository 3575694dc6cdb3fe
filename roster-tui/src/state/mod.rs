//! Application state and view state definitions.
//!
//! [`App`] owns every view's state and turns input and task outcomes into
//! state changes plus the next [`Task`]s to spawn. Nothing here awaits, so
//! the whole console can be driven by tests without a terminal.

pub mod entries;
pub mod form;
pub mod list;
pub mod shell;

use crate::config::TuiConfig;
use crate::events::TuiEvent;
use crate::keys::{map_key, map_text_key, Action, TextAction};
use crate::nav::{Route, View};
use crate::notifications::{NotificationLevel, Notifications};
use crate::service::{ResourceService, ServiceResult};
use crate::tasks::Task;
use crate::theme::SynthBruteTheme;
use crossterm::event::KeyEvent;
use entries::{EntriesView, EntryFocus, InlineCommit};
use form::{save_message, FormResource, FormState, Submission};
use list::ListView;
use roster_core::{FieldDefinition, Registry, RegistryEntry, TeamMember};
use roster_storage::ResourceFamily;
use shell::Shell;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

pub const TEAM_MEMBER_SORT_COLUMNS: &[&str] = &["name", "role", "age"];
pub const FIELD_SORT_COLUMNS: &[&str] = &["name", "label", "type", "required"];
pub const REGISTRY_SORT_COLUMNS: &[&str] = &["name", "entriesCount"];

static SEQUENCE: AtomicU64 = AtomicU64::new(1);

/// Process-wide sequence for reads and writes in flight. Never reused, so a
/// result can only be matched by the state that started it, across logouts
/// and rebuilt views included.
pub(crate) fn next_seq() -> u64 {
    SEQUENCE.fetch_add(1, Ordering::Relaxed)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Modal {
    Help,
    ConfirmDelete { message: String },
}

pub struct App {
    pub config: TuiConfig,
    pub theme: SynthBruteTheme,
    pub service: Arc<ResourceService>,
    pub shell: Shell,
    pub active_view: View,

    pub team_members: ListView<TeamMember>,
    pub fields: ListView<FieldDefinition>,
    pub registries: ListView<Registry>,
    pub entries: EntriesView,

    pub notifications: Notifications,
    pub modal: Option<Modal>,
    /// Text of the filter prompt while it is open.
    pub filter_input: Option<String>,
    pub should_quit: bool,
}

impl App {
    pub fn new(config: TuiConfig, service: Arc<ResourceService>) -> Self {
        let limit = config.page_size;
        let shell = Shell::new(service.is_authenticated());
        let theme =
            SynthBruteTheme::named(&config.theme.name).unwrap_or_else(SynthBruteTheme::synthbrute);
        Self {
            config,
            theme,
            service,
            shell,
            active_view: View::TeamMembers,
            team_members: ListView::new(limit, TEAM_MEMBER_SORT_COLUMNS),
            fields: ListView::new(limit, FIELD_SORT_COLUMNS),
            registries: ListView::new(limit, REGISTRY_SORT_COLUMNS),
            entries: EntriesView::new(limit),
            notifications: Notifications::default(),
            modal: None,
            filter_input: None,
            should_quit: false,
        }
    }

    /// Reads to issue once the event loop is running.
    pub fn start(&mut self) -> Vec<Task> {
        if self.active_view == View::RegistryEntries && self.entries.registry.is_none() {
            self.active_view = View::Registries;
        }
        self.load_active()
    }

    pub fn route(&self) -> Route {
        self.shell.route(self.active_view)
    }

    pub fn notify(&mut self, level: NotificationLevel, message: impl Into<String>) {
        self.notifications.push(level, message);
    }

    // ========================================================================
    // EVENTS
    // ========================================================================

    pub fn apply_event(&mut self, event: TuiEvent) -> Vec<Task> {
        match event {
            TuiEvent::Input(key) => self.handle_key(key),
            TuiEvent::Tick | TuiEvent::Resize { .. } => Vec::new(),
            TuiEvent::LoggedIn(result) => self.on_logged_in(result),
            TuiEvent::TeamMembersLoaded { ticket, outcome } => {
                let clamped = self.team_members.apply_load(&ticket, outcome)
                    && self.team_members.clamp_page();
                self.load_if(clamped && self.active_view == View::TeamMembers)
            }
            TuiEvent::FieldsLoaded { ticket, outcome } => {
                let clamped =
                    self.fields.apply_load(&ticket, outcome) && self.fields.clamp_page();
                self.load_if(clamped && self.active_view == View::Fields)
            }
            TuiEvent::RegistriesLoaded { ticket, outcome } => {
                let clamped =
                    self.registries.apply_load(&ticket, outcome) && self.registries.clamp_page();
                self.load_if(clamped && self.active_view == View::Registries)
            }
            TuiEvent::EntriesLoaded {
                registry_id,
                ticket,
                outcome,
            } => {
                if self.entries.registry_id() != Some(registry_id) {
                    tracing::debug!(%registry_id, "dropping entries of a registry no longer open");
                    return Vec::new();
                }
                let list = &mut self.entries.list;
                let clamped = list.apply_load(&ticket, outcome) && list.clamp_page();
                self.load_if(clamped && self.active_view == View::RegistryEntries)
            }
            TuiEvent::Saved {
                family,
                seq,
                updated,
                result,
            } => self.on_saved(family, seq, updated, result),
            TuiEvent::Deleted { family, result } => self.on_deleted(family, result),
            TuiEvent::EntryCreated {
                registry_id,
                seq,
                result,
            } => {
                let open = self.entries.registry_id() == Some(registry_id);
                if !(open && self.entries.finish_create(seq, result.is_ok())) {
                    tracing::debug!(%registry_id, seq, "entry create settled elsewhere");
                }
                self.report_entry_result("create", open, result)
            }
            TuiEvent::EntryUpdated {
                registry_id,
                entry_id,
                seq,
                result,
            } => {
                let open = self.entries.registry_id() == Some(registry_id);
                if !(open && self.entries.finish_commit(entry_id, seq, result.is_ok())) {
                    tracing::debug!(%registry_id, %entry_id, seq, "entry update settled elsewhere");
                }
                self.report_entry_result("update", open, result)
            }
            TuiEvent::PhotoUploaded(result) => {
                let outcome = self
                    .team_members
                    .form
                    .as_mut()
                    .map(|form| form.finish_photo_upload(result));
                match outcome {
                    Some(Ok(message)) => self.notify(NotificationLevel::Success, message),
                    Some(Err(message)) => self.notify(NotificationLevel::Error, message),
                    None => tracing::debug!("photo upload finished after its form closed"),
                }
                Vec::new()
            }
        }
    }

    fn on_logged_in(&mut self, result: ServiceResult<()>) -> Vec<Task> {
        match result {
            Ok(()) => {
                self.shell.login_succeeded();
                self.notify(NotificationLevel::Success, "Signed in");
                self.load_active()
            }
            Err(err) => {
                let message = err.to_string();
                self.shell.login_failed(message.clone());
                self.notify(NotificationLevel::Error, message);
                Vec::new()
            }
        }
    }

    fn on_saved(
        &mut self,
        family: ResourceFamily,
        seq: u64,
        updated: bool,
        result: ServiceResult<()>,
    ) -> Vec<Task> {
        let outcome = match family {
            ResourceFamily::TeamMembers => finish_form(&mut self.team_members, seq, &result),
            ResourceFamily::Fields => finish_form(&mut self.fields, seq, &result),
            ResourceFamily::Registries => finish_form(&mut self.registries, seq, &result),
            ResourceFamily::RegistryEntries => None,
        };
        let outcome = outcome.unwrap_or_else(|| {
            tracing::debug!(%family, seq, "save finished after its form moved on");
            save_message(noun(family), updated, result.as_ref().map(|_| ()))
        });
        match outcome {
            Ok(message) => {
                self.notify(NotificationLevel::Success, message);
                self.reload(family)
            }
            Err(message) => {
                self.notify(NotificationLevel::Error, message);
                Vec::new()
            }
        }
    }

    fn on_deleted(&mut self, family: ResourceFamily, result: ServiceResult<()>) -> Vec<Task> {
        match result {
            Ok(()) => {
                self.notify(
                    NotificationLevel::Success,
                    format!("{} deleted successfully", noun(family)),
                );
                self.reload(family)
            }
            Err(err) => {
                self.notify(
                    NotificationLevel::Error,
                    format!("Failed to delete {}: {err}", noun(family).to_lowercase()),
                );
                Vec::new()
            }
        }
    }

    /// Entries are only refetched when the written registry is still open.
    fn report_entry_result(
        &mut self,
        verb: &str,
        open: bool,
        result: ServiceResult<()>,
    ) -> Vec<Task> {
        match result {
            Ok(()) => {
                self.notify(
                    NotificationLevel::Success,
                    format!("Entry {verb}d successfully"),
                );
                if open {
                    self.reload(ResourceFamily::RegistryEntries)
                } else {
                    Vec::new()
                }
            }
            Err(err) => {
                self.notify(
                    NotificationLevel::Error,
                    format!("Failed to {verb} entry: {err}"),
                );
                Vec::new()
            }
        }
    }

    // ========================================================================
    // INPUT
    // ========================================================================

    pub fn handle_key(&mut self, key: KeyEvent) -> Vec<Task> {
        if self.route() == Route::Login {
            return map_text_key(key)
                .map(|action| self.login_key(action))
                .unwrap_or_default();
        }
        if self.modal.is_some() {
            return map_key(key)
                .map(|action| self.modal_key(action))
                .unwrap_or_default();
        }
        if self.filter_input.is_some() {
            return map_text_key(key)
                .map(|action| self.filter_key(action))
                .unwrap_or_default();
        }
        if self.form_open() {
            return map_text_key(key)
                .map(|action| self.form_key(action))
                .unwrap_or_default();
        }
        if self.active_view == View::RegistryEntries && self.entries.focus != EntryFocus::Table {
            return map_text_key(key)
                .map(|action| self.entry_input_key(action))
                .unwrap_or_default();
        }
        map_key(key)
            .map(|action| self.handle_action(action))
            .unwrap_or_default()
    }

    fn login_key(&mut self, action: TextAction) -> Vec<Task> {
        let form = &mut self.shell.login;
        match action {
            TextAction::Input(c) => form.input_mut().push(c),
            TextAction::Backspace => {
                form.input_mut().pop();
            }
            TextAction::NextField | TextAction::PrevField | TextAction::Cycle => {
                form.toggle_focus()
            }
            TextAction::Submit => {
                if let Some(request) = self.shell.begin_login() {
                    return vec![Task::Login(request)];
                }
            }
            TextAction::Cancel => self.should_quit = true,
            TextAction::Upload => {}
        }
        Vec::new()
    }

    fn modal_key(&mut self, action: Action) -> Vec<Task> {
        match (self.modal.take(), action) {
            (Some(Modal::ConfirmDelete { .. }), Action::Confirm) => self.confirm_delete(),
            (Some(Modal::ConfirmDelete { .. }), Action::Cancel | Action::Quit) => {
                self.cancel_delete();
                Vec::new()
            }
            (Some(Modal::Help), Action::Confirm | Action::Cancel | Action::OpenHelp) => Vec::new(),
            (modal, _) => {
                self.modal = modal;
                Vec::new()
            }
        }
    }

    fn filter_key(&mut self, action: TextAction) -> Vec<Task> {
        let Some(input) = self.filter_input.as_mut() else {
            return Vec::new();
        };
        match action {
            TextAction::Input(c) => input.push(c),
            TextAction::Backspace => {
                input.pop();
            }
            TextAction::Submit => {
                let text = input.clone();
                self.filter_input = None;
                let changed = match self.active_view {
                    View::TeamMembers => self.team_members.set_filter(&text),
                    View::Fields => self.fields.set_filter(&text),
                    View::Registries => self.registries.set_filter(&text),
                    View::RegistryEntries => false,
                };
                if changed {
                    return self.load_active();
                }
            }
            TextAction::Cancel => self.filter_input = None,
            TextAction::NextField | TextAction::PrevField | TextAction::Cycle => {}
            TextAction::Upload => {}
        }
        Vec::new()
    }

    fn form_open(&self) -> bool {
        match self.active_view {
            View::TeamMembers => self.team_members.form.is_some(),
            View::Fields => self.fields.form.is_some(),
            View::Registries => self.registries.form.is_some(),
            View::RegistryEntries => false,
        }
    }

    fn form_key(&mut self, action: TextAction) -> Vec<Task> {
        match self.active_view {
            View::TeamMembers => {
                if action == TextAction::Upload {
                    return self
                        .team_members
                        .form
                        .as_mut()
                        .and_then(FormState::begin_photo_upload)
                        .map(|path| vec![Task::UploadPhoto(path)])
                        .unwrap_or_default();
                }
                drive_form(&mut self.team_members, action)
                    .map(|s| vec![Task::SaveTeamMember(s)])
                    .unwrap_or_default()
            }
            View::Fields => drive_form(&mut self.fields, action)
                .map(|s| vec![Task::SaveField(s)])
                .unwrap_or_default(),
            View::Registries => drive_form(&mut self.registries, action)
                .map(|s| vec![Task::SaveRegistry(s)])
                .unwrap_or_default(),
            View::RegistryEntries => Vec::new(),
        }
    }

    fn entry_input_key(&mut self, action: TextAction) -> Vec<Task> {
        let Some(registry_id) = self.entries.registry_id() else {
            return Vec::new();
        };
        match action {
            TextAction::Input(c) => {
                if let Some(text) = self.entries.input_mut() {
                    text.push(c);
                }
            }
            TextAction::Backspace => {
                if let Some(text) = self.entries.input_mut() {
                    text.pop();
                }
            }
            TextAction::Submit => match self.entries.focus {
                EntryFocus::NewEntry => {
                    if let Some((seq, draft)) = self.entries.begin_create() {
                        return vec![Task::CreateEntry {
                            registry_id,
                            seq,
                            draft,
                        }];
                    }
                }
                EntryFocus::Inline => match self.entries.commit() {
                    Some(InlineCommit::Update {
                        entry_id,
                        seq,
                        draft,
                    }) => {
                        return vec![Task::UpdateEntry {
                            registry_id,
                            entry_id,
                            seq,
                            draft,
                        }];
                    }
                    Some(InlineCommit::Unchanged) | None => {}
                },
                EntryFocus::Table => {}
            },
            TextAction::Cancel => {
                self.entries.cancel_edit();
            }
            TextAction::NextField | TextAction::PrevField | TextAction::Cycle => {}
            TextAction::Upload => {}
        }
        Vec::new()
    }

    pub fn handle_action(&mut self, action: Action) -> Vec<Task> {
        match action {
            Action::Quit => {
                self.should_quit = true;
                Vec::new()
            }
            Action::NextView => self.switch_view(self.active_view.next()),
            Action::PrevView => self.switch_view(self.active_view.previous()),
            Action::SwitchView(index) => match View::from_index(index) {
                Some(view) => self.switch_view(view),
                None => Vec::new(),
            },
            Action::MoveDown => {
                match self.active_view {
                    View::TeamMembers => self.team_members.select_next(),
                    View::Fields => self.fields.select_next(),
                    View::Registries => self.registries.select_next(),
                    View::RegistryEntries => self.entries.list.select_next(),
                }
                Vec::new()
            }
            Action::MoveUp => {
                match self.active_view {
                    View::TeamMembers => self.team_members.select_previous(),
                    View::Fields => self.fields.select_previous(),
                    View::Registries => self.registries.select_previous(),
                    View::RegistryEntries => self.entries.list.select_previous(),
                }
                Vec::new()
            }
            Action::NextPage => {
                let changed = match self.active_view {
                    View::TeamMembers => self.team_members.next_page(),
                    View::Fields => self.fields.next_page(),
                    View::Registries => self.registries.next_page(),
                    View::RegistryEntries => self.entries.list.next_page(),
                };
                self.load_if(changed)
            }
            Action::PrevPage => {
                let changed = match self.active_view {
                    View::TeamMembers => self.team_members.prev_page(),
                    View::Fields => self.fields.prev_page(),
                    View::Registries => self.registries.prev_page(),
                    View::RegistryEntries => self.entries.list.prev_page(),
                };
                self.load_if(changed)
            }
            Action::PageSize => {
                let changed = match self.active_view {
                    View::TeamMembers => self.team_members.cycle_limit(),
                    View::Fields => self.fields.cycle_limit(),
                    View::Registries => self.registries.cycle_limit(),
                    View::RegistryEntries => self.entries.list.cycle_limit(),
                };
                self.load_if(changed)
            }
            Action::Sort => {
                let changed = match self.active_view {
                    View::TeamMembers => self.team_members.cycle_sort(),
                    View::Fields => self.fields.cycle_sort(),
                    View::Registries => self.registries.cycle_sort(),
                    View::RegistryEntries => false,
                };
                self.load_if(changed)
            }
            Action::ToggleSortOrder => {
                let changed = match self.active_view {
                    View::TeamMembers => flip_sort(&mut self.team_members),
                    View::Fields => flip_sort(&mut self.fields),
                    View::Registries => flip_sort(&mut self.registries),
                    View::RegistryEntries => false,
                };
                self.load_if(changed)
            }
            Action::NewItem => {
                match self.active_view {
                    View::TeamMembers => self.team_members.open_create(),
                    View::Fields => self.fields.open_create(),
                    View::Registries => self.registries.open_create(),
                    View::RegistryEntries => self.entries.focus_new_entry(),
                }
                Vec::new()
            }
            Action::EditItem => {
                match self.active_view {
                    View::TeamMembers => self.team_members.open_edit_selected(),
                    View::Fields => self.fields.open_edit_selected(),
                    View::Registries => self.registries.open_edit_selected(),
                    View::RegistryEntries => self.entries.begin_edit_selected(),
                };
                Vec::new()
            }
            Action::DeleteItem => {
                self.modal = match self.active_view {
                    View::TeamMembers => request_delete(&mut self.team_members),
                    View::Fields => request_delete(&mut self.fields),
                    View::Registries => request_delete(&mut self.registries),
                    View::RegistryEntries => request_delete(&mut self.entries.list),
                };
                Vec::new()
            }
            Action::ManageEntries => self.manage_entries(),
            Action::Confirm => match self.active_view {
                View::Registries => self.manage_entries(),
                _ => self.handle_action(Action::EditItem),
            },
            Action::Back | Action::Cancel => {
                if self.active_view == View::RegistryEntries {
                    self.switch_view(View::Registries)
                } else {
                    Vec::new()
                }
            }
            Action::OpenFilter => {
                self.filter_input = match self.active_view {
                    View::TeamMembers => Some(self.team_members.params.filter.clone()),
                    View::Fields => Some(self.fields.params.filter.clone()),
                    View::Registries => Some(self.registries.params.filter.clone()),
                    View::RegistryEntries => None,
                }
                .map(Option::unwrap_or_default);
                Vec::new()
            }
            Action::OpenHelp => {
                self.modal = Some(Modal::Help);
                Vec::new()
            }
            Action::Refresh => self.load_active(),
            Action::Logout => {
                self.logout();
                Vec::new()
            }
        }
    }

    // ========================================================================
    // NAVIGATION
    // ========================================================================

    fn switch_view(&mut self, view: View) -> Vec<Task> {
        self.active_view = view;
        self.load_active()
    }

    fn manage_entries(&mut self) -> Vec<Task> {
        let Some(registry) = self.registries.selected_row().cloned() else {
            return Vec::new();
        };
        self.entries.open(registry);
        self.switch_view(View::RegistryEntries)
    }

    /// Drop the session and every view's data.
    pub fn logout(&mut self) {
        if let Err(err) = self.service.logout() {
            tracing::warn!(error = %err, "failed to clear stored token");
            self.notify(NotificationLevel::Warning, err.to_string());
        }
        self.shell.logged_out();
        let limit = self.config.page_size;
        self.team_members = ListView::new(limit, TEAM_MEMBER_SORT_COLUMNS);
        self.fields = ListView::new(limit, FIELD_SORT_COLUMNS);
        self.registries = ListView::new(limit, REGISTRY_SORT_COLUMNS);
        self.entries = EntriesView::new(limit);
        self.modal = None;
        self.filter_input = None;
        self.active_view = View::TeamMembers;
        self.notify(NotificationLevel::Info, "Signed out");
    }

    // ========================================================================
    // READS
    // ========================================================================

    fn load_if(&mut self, changed: bool) -> Vec<Task> {
        if changed {
            self.load_active()
        } else {
            Vec::new()
        }
    }

    /// Start a read for the visible view. Served from cache when possible.
    pub fn load_active(&mut self) -> Vec<Task> {
        if !self.shell.is_authenticated() {
            return Vec::new();
        }
        let task = match self.active_view {
            View::TeamMembers => Task::LoadTeamMembers(self.team_members.begin_load()),
            View::Fields => Task::LoadFields(self.fields.begin_load()),
            View::Registries => Task::LoadRegistries(self.registries.begin_load()),
            View::RegistryEntries => match self.entries.registry_id() {
                Some(registry_id) => Task::LoadEntries {
                    registry_id,
                    ticket: self.entries.list.begin_load(),
                },
                None => return Vec::new(),
            },
        };
        vec![task]
    }

    /// Refetch a family after a write, if it is on screen.
    fn reload(&mut self, family: ResourceFamily) -> Vec<Task> {
        let visible = matches!(
            (family, self.active_view),
            (ResourceFamily::TeamMembers, View::TeamMembers)
                | (ResourceFamily::Fields, View::Fields)
                | (ResourceFamily::Registries, View::Registries)
                | (ResourceFamily::RegistryEntries, View::RegistryEntries)
        );
        self.load_if(visible)
    }

    // ========================================================================
    // DELETION
    // ========================================================================

    fn confirm_delete(&mut self) -> Vec<Task> {
        let task = match self.active_view {
            View::TeamMembers => self
                .team_members
                .confirm_delete()
                .map(|r| Task::DeleteTeamMember(r.id)),
            View::Fields => self.fields.confirm_delete().map(|r| Task::DeleteField(r.id)),
            View::Registries => self
                .registries
                .confirm_delete()
                .map(|r| Task::DeleteRegistry(r.id)),
            View::RegistryEntries => {
                self.entries
                    .list
                    .confirm_delete()
                    .map(|r: RegistryEntry| Task::DeleteEntry {
                        registry_id: r.registry_id,
                        entry_id: r.id,
                    })
            }
        };
        task.into_iter().collect()
    }

    fn cancel_delete(&mut self) {
        self.team_members.cancel_delete();
        self.fields.cancel_delete();
        self.registries.cancel_delete();
        self.entries.list.cancel_delete();
    }
}

// ============================================================================
// HELPERS
// ============================================================================

fn noun(family: ResourceFamily) -> &'static str {
    match family {
        ResourceFamily::TeamMembers => TeamMember::NOUN,
        ResourceFamily::Fields => FieldDefinition::NOUN,
        ResourceFamily::Registries => Registry::NOUN,
        ResourceFamily::RegistryEntries => RegistryEntry::NOUN,
    }
}

fn flip_sort<R: FormResource>(view: &mut ListView<R>) -> bool {
    if view.params.sort_by.is_none() {
        return false;
    }
    let order = view.params.sort_order.flipped();
    view.set_sort_order(order)
}

fn request_delete<R: FormResource>(view: &mut ListView<R>) -> Option<Modal> {
    if !view.request_delete() {
        return None;
    }
    let record = view.pending_delete.as_ref()?;
    Some(Modal::ConfirmDelete {
        message: format!(
            "Delete {} #{}? This cannot be undone.",
            R::NOUN.to_lowercase(),
            record.id()
        ),
    })
}

/// Apply a text action to the open form. Returns a submission once the
/// draft passed validation.
fn drive_form<R: FormResource>(
    view: &mut ListView<R>,
    action: TextAction,
) -> Option<Submission<R>> {
    let form = view.form.as_mut()?;
    match action {
        TextAction::Input(c) => form.input(c),
        TextAction::Backspace => form.backspace(),
        TextAction::NextField => form.focus_next(),
        TextAction::PrevField => form.focus_previous(),
        TextAction::Cycle => form.cycle(),
        TextAction::Submit => return form.begin_submit(),
        TextAction::Cancel => view.close_form(),
        TextAction::Upload => {}
    }
    None
}

/// Settle the open form if it is the one waiting for `seq`.
fn finish_form<R: FormResource>(
    view: &mut ListView<R>,
    seq: u64,
    result: &ServiceResult<()>,
) -> Option<Result<String, String>> {
    let outcome = view
        .form
        .as_mut()?
        .finish_submit(seq, result.as_ref().map(|_| ()))?;
    if outcome.is_ok() {
        view.close_form();
    }
    Some(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ThemeConfig;
    use crate::credentials::CredentialStore;
    use crossterm::event::{KeyCode, KeyModifiers};
    use roster_core::Role;
    use roster_test_utils::{fixtures, MockRosterApi};

    fn config() -> TuiConfig {
        TuiConfig {
            api_base_url: "http://localhost:3000/api".into(),
            request_timeout_ms: 1000,
            page_size: 10,
            credentials_path: "creds.json".into(),
            persistence_path: "state.json".into(),
            log_path: "roster.log".into(),
            theme: ThemeConfig {
                name: "synthbrute".into(),
            },
        }
    }

    fn app(authenticated: bool) -> App {
        let credentials = Arc::new(CredentialStore::in_memory());
        if authenticated {
            credentials.set_token("token-admin").unwrap();
        }
        let api = Arc::new(MockRosterApi::seeded());
        App::new(config(), Arc::new(ResourceService::new(api, credentials)))
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn unauthenticated_start_loads_nothing() {
        let mut app = app(false);
        assert!(app.start().is_empty());
        assert_eq!(app.route(), Route::Login);
    }

    #[test]
    fn login_keys_fill_the_form() {
        let mut app = app(false);
        for c in "admin".chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
        app.handle_key(key(KeyCode::Tab));
        for c in "secret".chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
        let tasks = app.handle_key(key(KeyCode::Enter));
        assert!(matches!(tasks.as_slice(), [Task::Login(r)] if r.username == "admin"));
    }

    #[test]
    fn switching_views_starts_a_read() {
        let mut app = app(true);
        let tasks = app.handle_action(Action::SwitchView(1));
        assert_eq!(app.active_view, View::Fields);
        assert!(matches!(tasks.as_slice(), [Task::LoadFields(_)]));
    }

    #[test]
    fn delete_asks_first() {
        let mut app = app(true);
        app.team_members.rows = vec![fixtures::member(1, "John Doe", Role::Developer, 30)];
        app.team_members.selected = Some(0);

        assert!(app.handle_action(Action::DeleteItem).is_empty());
        assert!(matches!(app.modal, Some(Modal::ConfirmDelete { .. })));

        let tasks = app.handle_key(key(KeyCode::Esc));
        assert!(tasks.is_empty());
        assert!(app.modal.is_none());
        assert!(app.team_members.pending_delete.is_none());

        app.handle_action(Action::DeleteItem);
        let tasks = app.handle_key(key(KeyCode::Char('y')));
        assert!(matches!(tasks.as_slice(), [Task::DeleteTeamMember(_)]));
    }

    #[test]
    fn entries_filter_prompt_is_not_offered() {
        let mut app = app(true);
        app.active_view = View::RegistryEntries;
        app.handle_action(Action::OpenFilter);
        assert!(app.filter_input.is_none());
    }

    #[test]
    fn logout_returns_to_login() {
        let mut app = app(true);
        app.active_view = View::Registries;
        app.logout();
        assert_eq!(app.route(), Route::Login);
        assert!(!app.service.is_authenticated());
        assert!(app.load_active().is_empty());
    }
}
