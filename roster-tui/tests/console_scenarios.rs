//! End-to-end console flows against the in-memory backend.
//!
//! Each test drives [`App`] with keys and actions, runs the tasks it asks
//! for, and feeds the outcomes back, in whatever order the test chooses.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use roster_core::{ApiError, EntityIdType, EntryInput, RegistryId, SortOrder};
use roster_test_utils::{Call, MockRosterApi, Operation};
use roster_tui::config::{ThemeConfig, TuiConfig};
use roster_tui::credentials::{CredentialStore, FileTokenStorage};
use roster_tui::keys::Action;
use roster_tui::nav::{Route, View};
use roster_tui::notifications::NotificationLevel;
use roster_tui::service::ResourceService;
use roster_tui::state::list::LoadState;
use roster_tui::state::App;
use roster_tui::tasks::{self, Task};
use std::sync::Arc;

fn config() -> TuiConfig {
    TuiConfig {
        api_base_url: "http://localhost:3000/api".to_string(),
        request_timeout_ms: 5_000,
        page_size: 10,
        credentials_path: "tmp/roster-credentials.json".into(),
        persistence_path: "tmp/roster-tui.json".into(),
        log_path: "tmp/roster-tui.log".into(),
        theme: ThemeConfig {
            name: "synthbrute".to_string(),
        },
    }
}

fn harness(authenticated: bool) -> (Arc<MockRosterApi>, App) {
    let api = Arc::new(MockRosterApi::seeded());
    let credentials = Arc::new(CredentialStore::in_memory());
    if authenticated {
        credentials.set_token("token-admin").unwrap();
    }
    let service = Arc::new(ResourceService::new(api.clone(), credentials));
    (api, App::new(config(), service))
}

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn type_text(app: &mut App, text: &str) -> Vec<Task> {
    text.chars()
        .flat_map(|c| app.handle_key(key(KeyCode::Char(c))))
        .collect()
}

/// Run tasks and their follow-ups until nothing is left.
async fn settle(app: &mut App, tasks: Vec<Task>) {
    let service = Arc::clone(&app.service);
    let mut queue = tasks;
    while !queue.is_empty() {
        let mut next = Vec::new();
        for task in queue {
            let event = tasks::run(&service, task).await;
            next.extend(app.apply_event(event));
        }
        queue = next;
    }
}

fn latest(app: &App) -> (NotificationLevel, String) {
    let note = app.notifications.latest().expect("a notification");
    (note.level, note.message.clone())
}

#[tokio::test]
async fn sorting_by_age_desc_drops_the_stale_ascending_page() {
    let (api, mut app) = harness(true);
    let start = app.start();
    settle(&mut app, start).await;
    assert_eq!(app.team_members.rows.len(), 3);
    assert_eq!(app.team_members.total_pages, 1);
    assert_eq!(app.team_members.params.page, 1);
    assert_eq!(app.team_members.params.limit, 10);

    // name, role, then age ascending
    app.handle_action(Action::Sort);
    app.handle_action(Action::Sort);
    let ascending = app.handle_action(Action::Sort);
    assert_eq!(app.team_members.params.sort_by.as_deref(), Some("age"));
    let descending = app.handle_action(Action::ToggleSortOrder);
    assert_eq!(app.team_members.params.sort_order, SortOrder::Desc);

    settle(&mut app, descending).await;
    settle(&mut app, ascending).await;

    let ages: Vec<u8> = app.team_members.rows.iter().map(|m| m.age).collect();
    assert_eq!(ages, vec![35, 30, 28]);
    assert!(api.calls().iter().any(|call| matches!(
        call,
        Call::ListTeamMembers(p)
            if p.sort_by.as_deref() == Some("age") && p.sort_order == SortOrder::Desc
    )));
}

#[tokio::test]
async fn new_entry_is_trimmed_and_only_its_registry_is_invalidated() {
    let (api, mut app) = harness(true);
    let tasks = app.handle_action(Action::SwitchView(2));
    settle(&mut app, tasks).await;
    let registries_params = app.registries.params.clone();
    let cached_registries = app.service.cached_registries(&registries_params).unwrap();

    app.handle_action(Action::MoveDown);
    let tasks = app.handle_action(Action::ManageEntries);
    settle(&mut app, tasks).await;
    assert_eq!(app.active_view, View::RegistryEntries);
    assert_eq!(app.entries.registry_id(), Some(RegistryId::new(2)));
    assert_eq!(app.entries.list.rows.len(), 5);
    let entries_params = app.entries.list.params.clone();

    app.handle_action(Action::NewItem);
    assert!(type_text(&mut app, " widget ").is_empty());
    let tasks = app.handle_key(key(KeyCode::Enter));
    assert_eq!(tasks.len(), 1);

    let service = Arc::clone(&app.service);
    let event = tasks::run(&service, tasks.into_iter().next().unwrap()).await;
    assert!(api.calls().contains(&Call::CreateEntry(
        RegistryId::new(2),
        EntryInput {
            value: "widget".to_string()
        }
    )));
    assert!(service
        .cached_entries(RegistryId::new(2), &entries_params)
        .is_none());
    let still_cached = service.cached_registries(&registries_params).unwrap();
    assert!(Arc::ptr_eq(&cached_registries, &still_cached));
    assert_eq!(still_cached.items[1].entries_count, 5);

    let reload = app.apply_event(event);
    settle(&mut app, reload).await;
    assert!(app.entries.new_value.is_empty());
    assert!(app.entries.list.rows.iter().any(|e| e.value == "widget"));
    assert_eq!(
        latest(&app),
        (
            NotificationLevel::Success,
            "Entry created successfully".to_string()
        )
    );
}

#[tokio::test]
async fn unchanged_inline_edit_makes_no_calls() {
    let (api, mut app) = harness(true);
    let tasks = app.handle_action(Action::SwitchView(2));
    settle(&mut app, tasks).await;
    let tasks = app.handle_action(Action::ManageEntries);
    settle(&mut app, tasks).await;
    api.clear_calls();

    app.handle_action(Action::EditItem);
    assert!(app.entries.editing.is_some());
    type_text(&mut app, "  ");
    let tasks = app.handle_key(key(KeyCode::Enter));

    assert!(tasks.is_empty());
    assert!(app.entries.editing.is_none());
    assert_eq!(api.total_calls(), 0);
}

#[tokio::test]
async fn changed_inline_edit_updates_the_entry() {
    let (api, mut app) = harness(true);
    let tasks = app.handle_action(Action::SwitchView(2));
    settle(&mut app, tasks).await;
    let tasks = app.handle_action(Action::ManageEntries);
    settle(&mut app, tasks).await;

    app.handle_action(Action::EditItem);
    type_text(&mut app, "s");
    let tasks = app.handle_key(key(KeyCode::Enter));
    settle(&mut app, tasks).await;

    assert_eq!(api.call_count(Operation::UpdateEntry), 1);
    assert!(app.entries.editing.is_none());
    assert_eq!(app.entries.list.rows[0].value, "Leads");
}

#[tokio::test]
async fn invalid_login_stays_on_login() {
    let (api, mut app) = harness(false);
    assert_eq!(app.route(), Route::Login);

    type_text(&mut app, "admin");
    app.handle_key(key(KeyCode::Tab));
    type_text(&mut app, "wrong");
    let tasks = app.handle_key(key(KeyCode::Enter));
    settle(&mut app, tasks).await;

    assert_eq!(api.call_count(Operation::Login), 1);
    assert!(!app.service.is_authenticated());
    assert!(!app.shell.is_authenticated());
    assert_eq!(app.route(), Route::Login);
    assert_eq!(
        latest(&app),
        (NotificationLevel::Error, "Invalid credentials".to_string())
    );
    assert_eq!(api.call_count(Operation::ListTeamMembers), 0);
}

#[tokio::test]
async fn valid_login_opens_the_console() {
    let (api, mut app) = harness(false);
    type_text(&mut app, "admin");
    app.handle_key(key(KeyCode::Tab));
    type_text(&mut app, "secret");
    let tasks = app.handle_key(key(KeyCode::Enter));
    settle(&mut app, tasks).await;

    assert!(app.service.is_authenticated());
    assert_eq!(app.route(), Route::View(View::TeamMembers));
    assert_eq!(api.call_count(Operation::ListTeamMembers), 1);
    assert_eq!(app.team_members.state, LoadState::Ready);
}

#[tokio::test]
async fn one_character_name_never_reaches_the_network() {
    let (api, mut app) = harness(true);
    let start = app.start();
    settle(&mut app, start).await;
    api.clear_calls();

    app.handle_action(Action::NewItem);
    type_text(&mut app, "J");
    app.handle_key(key(KeyCode::Tab));
    app.handle_key(key(KeyCode::Right));
    app.handle_key(key(KeyCode::Tab));
    type_text(&mut app, "30");
    let tasks = app.handle_key(key(KeyCode::Enter));

    assert!(tasks.is_empty());
    assert_eq!(api.total_calls(), 0);
    let form = app.team_members.form.as_ref().unwrap();
    assert_eq!(
        form.errors().message_for("name"),
        Some("Name must be at least 2 characters")
    );
    assert!(!form.is_submitting());

    app.handle_key(key(KeyCode::BackTab));
    app.handle_key(key(KeyCode::BackTab));
    type_text(&mut app, "o");
    let tasks = app.handle_key(key(KeyCode::Enter));
    settle(&mut app, tasks).await;
    assert_eq!(api.call_count(Operation::CreateTeamMember), 1);
    assert!(app.team_members.form.is_none());
    assert!(app.team_members.rows.iter().any(|m| m.name == "Jo"));
}

#[tokio::test]
async fn failed_update_keeps_form_and_cache() {
    let (api, mut app) = harness(true);
    let start = app.start();
    settle(&mut app, start).await;
    let params = app.team_members.params.clone();
    let cached = app.service.cached_team_members(&params).unwrap();

    api.fail_next(
        Operation::UpdateTeamMember,
        ApiError::server(500, "Database unavailable"),
    );
    app.handle_action(Action::EditItem);
    type_text(&mut app, "!");
    let tasks = app.handle_key(key(KeyCode::Enter));
    assert_eq!(tasks.len(), 1);
    settle(&mut app, tasks).await;

    let form = app.team_members.form.as_ref().unwrap();
    assert!(!form.is_submitting());
    assert_eq!(form.draft.name, "John Doe!");
    assert_eq!(
        latest(&app),
        (
            NotificationLevel::Error,
            "Failed to update team member: Database unavailable".to_string()
        )
    );
    let still_cached = app.service.cached_team_members(&params).unwrap();
    assert!(Arc::ptr_eq(&cached, &still_cached));
}

#[tokio::test]
async fn confirmed_delete_refetches_the_list() {
    let (api, mut app) = harness(true);
    let tasks = app.handle_action(Action::SwitchView(1));
    settle(&mut app, tasks).await;
    assert_eq!(app.fields.rows.len(), 3);

    app.handle_action(Action::DeleteItem);
    assert!(app.modal.is_some());
    let tasks = app.handle_key(key(KeyCode::Enter));
    settle(&mut app, tasks).await;

    assert!(app.modal.is_none());
    assert_eq!(api.call_count(Operation::DeleteField), 1);
    assert_eq!(api.call_count(Operation::ListFields), 2);
    assert_eq!(app.fields.rows.len(), 2);
}

#[tokio::test]
async fn failed_read_shows_an_error_state() {
    let (api, mut app) = harness(true);
    api.fail_next(
        Operation::ListRegistries,
        ApiError::Network("connection refused".to_string()),
    );
    let tasks = app.handle_action(Action::SwitchView(2));
    settle(&mut app, tasks).await;

    assert!(app.registries.rows.is_empty());
    assert!(matches!(app.registries.state, LoadState::Failed(_)));

    let tasks = app.handle_action(Action::Refresh);
    settle(&mut app, tasks).await;
    assert_eq!(app.registries.state, LoadState::Ready);
    assert_eq!(app.registries.rows.len(), 2);
}

#[tokio::test]
async fn entries_of_a_closed_registry_are_dropped() {
    let (_api, mut app) = harness(true);
    let tasks = app.handle_action(Action::SwitchView(2));
    settle(&mut app, tasks).await;

    let first = app.handle_action(Action::ManageEntries);
    app.handle_action(Action::Back);
    app.handle_action(Action::MoveDown);
    let second = app.handle_action(Action::ManageEntries);

    settle(&mut app, second).await;
    settle(&mut app, first).await;
    assert_eq!(app.entries.registry_id(), Some(RegistryId::new(2)));
    assert!(app
        .entries
        .list
        .rows
        .iter()
        .all(|e| e.registry_id == RegistryId::new(2)));
}

#[tokio::test]
async fn stored_token_restores_the_session() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("credentials.json");
    std::fs::write(&path, r#"{"authToken":"token-admin","theme":"dark"}"#).unwrap();

    let credentials = Arc::new(CredentialStore::new(Box::new(FileTokenStorage::new(&path))));
    assert_eq!(credentials.load().unwrap().as_deref(), Some("token-admin"));
    let service = Arc::new(ResourceService::new(
        Arc::new(MockRosterApi::seeded()),
        credentials,
    ));
    let mut app = App::new(config(), service);
    assert_eq!(app.route(), Route::View(View::TeamMembers));

    app.handle_key(KeyEvent::new(KeyCode::Char('l'), KeyModifiers::CONTROL));
    assert_eq!(app.route(), Route::Login);
    let stored = std::fs::read_to_string(&path).unwrap();
    assert!(!stored.contains("token-admin"));
    assert!(stored.contains("dark"));
}

#[tokio::test]
async fn late_update_failure_leaves_the_next_form_submitting() {
    let (api, mut app) = harness(true);
    let start = app.start();
    settle(&mut app, start).await;

    app.handle_action(Action::EditItem);
    type_text(&mut app, "!");
    let update = app.handle_key(key(KeyCode::Enter));
    assert_eq!(update.len(), 1);
    app.handle_key(key(KeyCode::Esc));
    assert!(app.team_members.form.is_none());

    app.handle_action(Action::NewItem);
    type_text(&mut app, "Bo");
    app.handle_key(key(KeyCode::Tab));
    app.handle_key(key(KeyCode::Right));
    app.handle_key(key(KeyCode::Tab));
    type_text(&mut app, "41");
    let create = app.handle_key(key(KeyCode::Enter));
    assert_eq!(create.len(), 1);

    api.fail_next(Operation::UpdateTeamMember, ApiError::server(500, "boom"));
    settle(&mut app, update).await;

    let form = app.team_members.form.as_ref().unwrap();
    assert!(form.is_submitting());
    assert_eq!(form.draft.name, "Bo");
    assert_eq!(
        latest(&app),
        (
            NotificationLevel::Error,
            "Failed to update team member: boom".to_string()
        )
    );

    settle(&mut app, create).await;
    assert!(app.team_members.form.is_none());
    assert_eq!(
        latest(&app),
        (
            NotificationLevel::Success,
            "Team member created successfully".to_string()
        )
    );
}

#[tokio::test]
async fn second_enter_on_a_saving_entry_sends_nothing() {
    let (api, mut app) = harness(true);
    let tasks = app.handle_action(Action::SwitchView(2));
    settle(&mut app, tasks).await;
    let tasks = app.handle_action(Action::ManageEntries);
    settle(&mut app, tasks).await;

    app.handle_action(Action::EditItem);
    type_text(&mut app, "s");
    let first = app.handle_key(key(KeyCode::Enter));
    assert_eq!(first.len(), 1);
    assert!(app.handle_key(key(KeyCode::Enter)).is_empty());
    type_text(&mut app, "x");
    assert_eq!(app.entries.editing.as_ref().unwrap().value, "Leads");

    settle(&mut app, first).await;
    assert_eq!(api.call_count(Operation::UpdateEntry), 1);
    assert!(app.entries.editing.is_none());
    assert_eq!(app.entries.list.rows[0].value, "Leads");
}

#[tokio::test]
async fn late_entry_update_keeps_a_newer_edit() {
    let (_api, mut app) = harness(true);
    let tasks = app.handle_action(Action::SwitchView(2));
    settle(&mut app, tasks).await;
    let tasks = app.handle_action(Action::ManageEntries);
    settle(&mut app, tasks).await;

    app.handle_action(Action::EditItem);
    type_text(&mut app, "s");
    let update = app.handle_key(key(KeyCode::Enter));
    app.handle_key(key(KeyCode::Esc));
    app.handle_action(Action::EditItem);
    type_text(&mut app, "x");

    settle(&mut app, update).await;
    let edit = app.entries.editing.as_ref().unwrap();
    assert_eq!(edit.value, "Leadx");
    assert!(!edit.is_updating());
    assert_eq!(app.entries.list.rows[0].value, "Leads");
}

#[tokio::test]
async fn late_entry_create_keeps_another_registrys_input() {
    let (api, mut app) = harness(true);
    let tasks = app.handle_action(Action::SwitchView(2));
    settle(&mut app, tasks).await;
    let tasks = app.handle_action(Action::ManageEntries);
    settle(&mut app, tasks).await;
    assert_eq!(app.entries.registry_id(), Some(RegistryId::new(1)));

    app.handle_action(Action::NewItem);
    type_text(&mut app, "Guest");
    let create = app.handle_key(key(KeyCode::Enter));
    assert_eq!(create.len(), 1);
    app.handle_key(key(KeyCode::Esc));

    let tasks = app.handle_action(Action::Back);
    settle(&mut app, tasks).await;
    app.handle_action(Action::MoveDown);
    let tasks = app.handle_action(Action::ManageEntries);
    settle(&mut app, tasks).await;
    app.handle_action(Action::NewItem);
    type_text(&mut app, "draft");
    api.clear_calls();

    let service = Arc::clone(&app.service);
    let event = tasks::run(&service, create.into_iter().next().unwrap()).await;
    let reload = app.apply_event(event);

    assert!(reload.is_empty());
    assert_eq!(app.entries.registry_id(), Some(RegistryId::new(2)));
    assert_eq!(app.entries.new_value, "draft");
    assert!(!app.entries.is_creating());
    assert_eq!(
        latest(&app),
        (
            NotificationLevel::Success,
            "Entry created successfully".to_string()
        )
    );
    assert!(api.calls().contains(&Call::CreateEntry(
        RegistryId::new(1),
        EntryInput {
            value: "Guest".to_string()
        }
    )));
}

#[tokio::test]
async fn read_started_before_logout_is_ignored_after_login() {
    let (_api, mut app) = harness(true);
    let stale = app.start();
    assert_eq!(stale.len(), 1);

    app.handle_key(KeyEvent::new(KeyCode::Char('l'), KeyModifiers::CONTROL));
    assert_eq!(app.route(), Route::Login);
    type_text(&mut app, "admin");
    app.handle_key(key(KeyCode::Tab));
    type_text(&mut app, "secret");
    let login = app.handle_key(key(KeyCode::Enter));
    assert_eq!(login.len(), 1);

    let service = Arc::clone(&app.service);
    let signed_in = tasks::run(&service, login.into_iter().next().unwrap()).await;
    let fresh = app.apply_event(signed_in);
    assert_eq!(fresh.len(), 1);

    let old = tasks::run(&service, stale.into_iter().next().unwrap()).await;
    assert!(app.apply_event(old).is_empty());
    assert_eq!(app.team_members.state, LoadState::Loading);
    assert!(app.team_members.rows.is_empty());

    settle(&mut app, fresh).await;
    assert_eq!(app.team_members.state, LoadState::Ready);
    assert_eq!(app.team_members.rows.len(), 3);
}

#[tokio::test]
async fn page_past_the_end_steps_back_to_the_last_page() {
    let (api, mut app) = harness(true);
    let tasks = app.handle_action(Action::SwitchView(1));
    settle(&mut app, tasks).await;
    assert_eq!(app.fields.rows.len(), 3);

    // another client deleted enough rows to lose page 2
    app.fields.total_pages = 2;
    let tasks = app.handle_action(Action::NextPage);
    assert_eq!(app.fields.params.page, 2);
    settle(&mut app, tasks).await;

    assert_eq!(app.fields.params.page, 1);
    assert_eq!(app.fields.total_pages, 1);
    assert_eq!(app.fields.rows.len(), 3);
    assert_eq!(app.fields.state, LoadState::Ready);
    assert!(api.calls().iter().any(|call| matches!(
        call,
        Call::ListFields(p) if p.page == 2
    )));
}
