//! Create/edit form state.
//!
//! A form is seeded with a record (edit) or not (create). Submission is
//! refused while one is already in flight and while the draft fails its
//! schema; the draft survives a failed submit untouched so the user can fix
//! it and retry.

use super::next_seq;
use crate::service::ServiceError;
use roster_core::{
    EntryDraft, EntryId, FieldDefinition, FieldDraft, FieldId, FieldType, Registry,
    RegistryDraft, RegistryEntry, RegistryId, Role, TeamMember, TeamMemberDraft, TeamMemberId,
    UploadResponse, Validate, ValidationErrors,
};
use std::fmt;
use std::path::PathBuf;

// ============================================================================
// RESOURCE BINDING
// ============================================================================

/// A record type that can be created and edited through a form.
pub trait FormResource: Clone + fmt::Debug {
    type Id: Copy + PartialEq + fmt::Display + fmt::Debug;
    type Draft: Validate + DraftFields + Default + Clone + fmt::Debug + for<'a> From<&'a Self>;

    /// Capitalized singular noun for notifications.
    const NOUN: &'static str;

    fn id(&self) -> Self::Id;
}

impl FormResource for TeamMember {
    type Id = TeamMemberId;
    type Draft = TeamMemberDraft;
    const NOUN: &'static str = "Team member";

    fn id(&self) -> TeamMemberId {
        self.id
    }
}

impl FormResource for FieldDefinition {
    type Id = FieldId;
    type Draft = FieldDraft;
    const NOUN: &'static str = "Field";

    fn id(&self) -> FieldId {
        self.id
    }
}

impl FormResource for Registry {
    type Id = RegistryId;
    type Draft = RegistryDraft;
    const NOUN: &'static str = "Registry";

    fn id(&self) -> RegistryId {
        self.id
    }
}

impl FormResource for RegistryEntry {
    type Id = EntryId;
    type Draft = EntryDraft;
    const NOUN: &'static str = "Entry";

    fn id(&self) -> EntryId {
        self.id
    }
}

// ============================================================================
// DRAFT FIELDS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Text,
    Choice,
    Toggle,
}

#[derive(Debug, Clone, Copy)]
pub struct FormField {
    /// Name used by validation errors.
    pub key: &'static str,
    pub label: &'static str,
    pub kind: InputKind,
}

const fn text(key: &'static str, label: &'static str) -> FormField {
    FormField {
        key,
        label,
        kind: InputKind::Text,
    }
}

/// Row-by-row access to a draft for rendering and key input.
pub trait DraftFields {
    const FIELDS: &'static [FormField];

    fn display(&self, index: usize) -> String;

    /// Editable text behind a text row.
    fn text_mut(&mut self, index: usize) -> Option<&mut String>;

    /// Advance a choice or toggle row.
    fn cycle(&mut self, _index: usize) {}
}

impl DraftFields for TeamMemberDraft {
    const FIELDS: &'static [FormField] = &[
        text("name", "Name"),
        FormField {
            key: "role",
            label: "Role",
            kind: InputKind::Choice,
        },
        text("age", "Age"),
        text("photo", "Photo"),
    ];

    fn display(&self, index: usize) -> String {
        match index {
            0 => self.name.clone(),
            1 => self.role.map(|r| r.label().to_string()).unwrap_or_default(),
            2 => self.age.clone(),
            3 => self.photo.clone().unwrap_or_default(),
            _ => String::new(),
        }
    }

    fn text_mut(&mut self, index: usize) -> Option<&mut String> {
        match index {
            0 => Some(&mut self.name),
            2 => Some(&mut self.age),
            3 => Some(self.photo.get_or_insert_with(String::new)),
            _ => None,
        }
    }

    fn cycle(&mut self, index: usize) {
        if index == 1 {
            self.role = Some(self.role.map_or(Role::Developer, Role::next));
        }
    }
}

impl DraftFields for FieldDraft {
    const FIELDS: &'static [FormField] = &[
        text("name", "Name"),
        text("label", "Label"),
        FormField {
            key: "type",
            label: "Type",
            kind: InputKind::Choice,
        },
        FormField {
            key: "required",
            label: "Required",
            kind: InputKind::Toggle,
        },
        text("defaultValue", "Default value"),
    ];

    fn display(&self, index: usize) -> String {
        match index {
            0 => self.name.clone(),
            1 => self.label.clone(),
            2 => self.field_type.as_str().to_string(),
            3 => if self.required { "yes" } else { "no" }.to_string(),
            4 => self.default_value.clone(),
            _ => String::new(),
        }
    }

    fn text_mut(&mut self, index: usize) -> Option<&mut String> {
        match index {
            0 => Some(&mut self.name),
            1 => Some(&mut self.label),
            4 => Some(&mut self.default_value),
            _ => None,
        }
    }

    fn cycle(&mut self, index: usize) {
        match index {
            2 => self.field_type = FieldType::next(self.field_type),
            3 => self.required = !self.required,
            _ => {}
        }
    }
}

impl DraftFields for RegistryDraft {
    const FIELDS: &'static [FormField] = &[text("name", "Name")];

    fn display(&self, index: usize) -> String {
        if index == 0 {
            self.name.clone()
        } else {
            String::new()
        }
    }

    fn text_mut(&mut self, index: usize) -> Option<&mut String> {
        (index == 0).then_some(&mut self.name)
    }
}

impl DraftFields for EntryDraft {
    const FIELDS: &'static [FormField] = &[text("value", "Value")];

    fn display(&self, index: usize) -> String {
        if index == 0 {
            self.value.clone()
        } else {
            String::new()
        }
    }

    fn text_mut(&mut self, index: usize) -> Option<&mut String> {
        (index == 0).then_some(&mut self.value)
    }
}

// ============================================================================
// FORM STATE
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode<R> {
    Create,
    Edit(R),
}

/// What to send once the draft passed validation.
#[derive(Debug, Clone)]
pub struct Submission<R: FormResource> {
    /// Matches the outcome back to the form that sent it.
    pub seq: u64,
    /// `Some` for an update.
    pub id: Option<R::Id>,
    pub draft: R::Draft,
}

impl<R: FormResource> Submission<R> {
    pub fn is_update(&self) -> bool {
        self.id.is_some()
    }
}

/// Notification text for a finished save: `Ok` on success, `Err` otherwise.
pub fn save_message(
    noun: &str,
    updated: bool,
    result: Result<(), &ServiceError>,
) -> Result<String, String> {
    let verb = if updated { "update" } else { "create" };
    match result {
        Ok(()) => Ok(format!("{noun} {verb}d successfully")),
        Err(ServiceError::Validation(errors)) => {
            Err(format!("Please fix the highlighted fields ({})", errors.len()))
        }
        Err(err) => Err(format!("Failed to {verb} {}: {err}", noun.to_lowercase())),
    }
}

#[derive(Debug, Clone)]
pub struct FormState<R: FormResource> {
    pub draft: R::Draft,
    pub mode: FormMode<R>,
    pub errors: ValidationErrors,
    pub focus: usize,
    pub photo: PhotoUpload,
    /// Sequence of the submission in flight.
    pending: Option<u64>,
}

impl<R: FormResource> FormState<R> {
    pub fn create() -> Self {
        Self {
            draft: R::Draft::default(),
            mode: FormMode::Create,
            errors: ValidationErrors::new(),
            focus: 0,
            photo: PhotoUpload::Idle,
            pending: None,
        }
    }

    pub fn seeded(record: &R) -> Self {
        Self {
            draft: R::Draft::from(record),
            mode: FormMode::Edit(record.clone()),
            ..Self::create()
        }
    }

    pub fn is_edit(&self) -> bool {
        matches!(self.mode, FormMode::Edit(_))
    }

    pub fn title(&self) -> String {
        match &self.mode {
            FormMode::Create => format!("New {}", R::NOUN.to_lowercase()),
            FormMode::Edit(record) => format!("Edit {} #{}", R::NOUN.to_lowercase(), record.id()),
        }
    }

    pub fn is_submitting(&self) -> bool {
        self.pending.is_some()
    }

    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    /// Run the schema and keep its errors for inline display.
    pub fn validate(&mut self) -> bool {
        match self.draft.validate() {
            Ok(_) => {
                self.errors = ValidationErrors::new();
                true
            }
            Err(errors) => {
                self.errors = errors;
                false
            }
        }
    }

    /// Lock the form for one submission, or refuse.
    pub fn begin_submit(&mut self) -> Option<Submission<R>> {
        if self.is_submitting() || !self.validate() {
            return None;
        }
        let seq = next_seq();
        self.pending = Some(seq);
        let id = match &self.mode {
            FormMode::Create => None,
            FormMode::Edit(record) => Some(record.id()),
        };
        Some(Submission {
            seq,
            id,
            draft: self.draft.clone(),
        })
    }

    /// Unlock the form if `seq` is the submission it is waiting for.
    ///
    /// Returns the notification text, `Ok` when the form should close and
    /// `Err` when it stays open for a retry, or `None` for an outcome that
    /// belongs to another submission.
    pub fn finish_submit(
        &mut self,
        seq: u64,
        result: Result<(), &ServiceError>,
    ) -> Option<Result<String, String>> {
        if self.pending != Some(seq) {
            return None;
        }
        self.pending = None;
        if let Err(ServiceError::Validation(errors)) = result {
            self.errors = errors.clone();
        }
        Some(save_message(R::NOUN, self.is_edit(), result))
    }

    pub fn focused_field(&self) -> &'static FormField {
        let fields = <R::Draft as DraftFields>::FIELDS;
        &fields[self.focus.min(fields.len() - 1)]
    }

    pub fn focus_next(&mut self) {
        let len = <R::Draft as DraftFields>::FIELDS.len();
        self.focus = (self.focus + 1) % len;
    }

    pub fn focus_previous(&mut self) {
        let len = <R::Draft as DraftFields>::FIELDS.len();
        self.focus = if self.focus == 0 { len - 1 } else { self.focus - 1 };
    }

    pub fn input(&mut self, c: char) {
        if self.is_submitting() {
            return;
        }
        match self.focused_field().kind {
            InputKind::Text => {
                if let Some(text) = self.draft.text_mut(self.focus) {
                    text.push(c);
                }
            }
            InputKind::Choice | InputKind::Toggle if c == ' ' => self.draft.cycle(self.focus),
            InputKind::Choice | InputKind::Toggle => {}
        }
    }

    pub fn backspace(&mut self) {
        if self.is_submitting() {
            return;
        }
        if let Some(text) = self.draft.text_mut(self.focus) {
            text.pop();
        }
    }

    pub fn cycle(&mut self) {
        if !self.is_submitting() {
            self.draft.cycle(self.focus);
        }
    }
}

// ============================================================================
// PHOTO UPLOAD
// ============================================================================

/// Upload state of a team member's photo. Uploads run immediately on
/// request, independent of the form's submit.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PhotoUpload {
    #[default]
    Idle,
    Uploading {
        file_name: String,
    },
    Ready {
        url: String,
        size: usize,
    },
    Failed(String),
}

impl FormState<TeamMember> {
    /// The local file named in the photo field, if an upload may start.
    pub fn begin_photo_upload(&mut self) -> Option<PathBuf> {
        if matches!(self.photo, PhotoUpload::Uploading { .. }) {
            return None;
        }
        let raw = self.draft.photo.as_deref().map(str::trim).unwrap_or_default();
        if raw.is_empty() || raw.starts_with("http://") || raw.starts_with("https://") {
            return None;
        }
        let path = PathBuf::from(raw);
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| raw.to_string());
        self.photo = PhotoUpload::Uploading { file_name };
        Some(path)
    }

    /// Fill the photo field with the stored URL, or leave it unset.
    pub fn finish_photo_upload(
        &mut self,
        result: Result<(UploadResponse, usize), String>,
    ) -> Result<String, String> {
        match result {
            Ok((response, size)) => {
                self.draft.photo = Some(response.url.clone());
                self.photo = PhotoUpload::Ready {
                    url: response.url,
                    size,
                };
                Ok("Photo uploaded".to_string())
            }
            Err(message) => {
                self.draft.photo = None;
                self.photo = PhotoUpload::Failed(message.clone());
                Err(format!("Photo upload failed: {message}"))
            }
        }
    }

    pub fn photo_preview(&self) -> Option<String> {
        match &self.photo {
            PhotoUpload::Idle => None,
            PhotoUpload::Uploading { file_name } => Some(format!("Uploading {file_name}...")),
            PhotoUpload::Ready { url, size } => Some(format!("Preview: {url} ({size} bytes)")),
            PhotoUpload::Failed(message) => Some(format!("Upload failed: {message}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roster_core::{ApiError, EntityIdType};

    fn member() -> TeamMember {
        TeamMember {
            id: TeamMemberId::new(7),
            name: "Jane Smith".into(),
            role: Role::Designer,
            age: 28,
            photo: None,
        }
    }

    #[test]
    fn seeded_form_is_in_edit_mode() {
        let form = FormState::seeded(&member());
        assert!(form.is_edit());
        assert_eq!(form.draft.name, "Jane Smith");
        assert_eq!(form.draft.age, "28");
        assert_eq!(form.title(), "Edit team member #7");
    }

    #[test]
    fn invalid_draft_is_not_submitted() {
        let mut form = FormState::<TeamMember>::create();
        form.draft.name = "J".into();
        assert!(form.begin_submit().is_none());
        assert!(!form.is_submitting());
        assert_eq!(
            form.errors().message_for("name"),
            Some("Name must be at least 2 characters")
        );
    }

    #[test]
    fn second_submit_is_refused_while_in_flight() {
        let mut form = FormState::seeded(&member());
        let submission = form.begin_submit().unwrap();
        assert_eq!(submission.id, Some(TeamMemberId::new(7)));
        assert!(submission.is_update());
        assert!(form.is_submitting());
        assert!(form.begin_submit().is_none());

        let message = form.finish_submit(submission.seq, Ok(())).unwrap().unwrap();
        assert_eq!(message, "Team member updated successfully");
        assert!(!form.is_submitting());
    }

    #[test]
    fn failed_submit_keeps_the_draft() {
        let mut form = FormState::<Registry>::create();
        form.draft.name = "Locations".into();
        let submission = form.begin_submit().unwrap();

        let err = ServiceError::Api(ApiError::server(409, "Name already taken"));
        let message = form.finish_submit(submission.seq, Err(&err)).unwrap().unwrap_err();
        assert_eq!(message, "Failed to create registry: Name already taken");
        assert_eq!(form.draft.name, "Locations");
        assert!(!form.is_submitting());
    }

    #[test]
    fn outcome_of_another_submission_is_ignored() {
        let mut earlier = FormState::seeded(&member());
        let stale = earlier.begin_submit().unwrap();

        let mut form = FormState::<TeamMember>::create();
        form.draft = TeamMemberDraft::from(&member());
        let current = form.begin_submit().unwrap();
        assert_ne!(stale.seq, current.seq);

        let err = ServiceError::Api(ApiError::server(500, "boom"));
        assert!(form.finish_submit(stale.seq, Err(&err)).is_none());
        assert!(form.is_submitting());
        assert!(form.finish_submit(current.seq, Ok(())).is_some());
        assert!(!form.is_submitting());
    }

    #[test]
    fn save_wording_follows_the_submission() {
        let err = ServiceError::Api(ApiError::server(500, "boom"));
        assert_eq!(
            save_message("Team member", true, Err(&err)),
            Err("Failed to update team member: boom".to_string())
        );
        assert_eq!(
            save_message("Field", false, Ok(())),
            Ok("Field created successfully".to_string())
        );
    }

    #[test]
    fn field_form_defaults_and_cycles() {
        let mut form = FormState::<FieldDefinition>::create();
        assert_eq!(form.draft.field_type, FieldType::Text);
        assert!(!form.draft.required);

        form.focus = 2;
        form.cycle();
        assert_eq!(form.draft.field_type, FieldType::Number);
        form.focus_next();
        form.input(' ');
        assert!(form.draft.required);
    }

    #[test]
    fn typing_goes_to_the_focused_text_row() {
        let mut form = FormState::<TeamMember>::create();
        for c in "Al".chars() {
            form.input(c);
        }
        form.focus_next();
        form.input('x');
        form.cycle();
        form.focus_next();
        form.input('4');
        form.input('0');
        form.backspace();

        assert_eq!(form.draft.name, "Al");
        assert_eq!(form.draft.role, Some(Role::Developer));
        assert_eq!(form.draft.age, "4");
    }

    #[test]
    fn photo_upload_fills_the_field() {
        let mut form = FormState::<TeamMember>::create();
        form.draft.photo = Some("/tmp/face.png".into());
        let path = form.begin_photo_upload().unwrap();
        assert_eq!(path, PathBuf::from("/tmp/face.png"));
        assert!(form.begin_photo_upload().is_none());

        let response = UploadResponse {
            url: "https://cdn.example.com/face.png".into(),
        };
        form.finish_photo_upload(Ok((response, 1024))).unwrap();
        assert_eq!(form.draft.photo.as_deref(), Some("https://cdn.example.com/face.png"));
        assert_eq!(
            form.photo_preview().as_deref(),
            Some("Preview: https://cdn.example.com/face.png (1024 bytes)")
        );
    }

    #[test]
    fn failed_upload_leaves_photo_unset() {
        let mut form = FormState::<TeamMember>::create();
        form.draft.photo = Some("face.png".into());
        form.begin_photo_upload().unwrap();
        let message = form.finish_photo_upload(Err("No response from server".into()));
        assert!(message.is_err());
        assert_eq!(form.draft.photo, None);
    }

    #[test]
    fn urls_are_not_uploaded_again() {
        let mut form = FormState::<TeamMember>::create();
        form.draft.photo = Some("https://cdn.example.com/a.png".into());
        assert!(form.begin_photo_upload().is_none());
    }
}
