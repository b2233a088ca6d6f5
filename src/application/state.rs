//! Application state for the terminal resume builder.
//!
//! `App` wires the services together and holds everything the UI needs to
//! render a frame: the active screen, the wizard position, the selected
//! field, input buffers and status messages.

use super::dashboard::{ResumeLibrary, SavedResume};
use super::export::{ExportController, PreviewState};
use super::router::{Route, Router};
use super::session::SessionService;
use super::store::DocumentStore;
use super::templates::TemplateLibrary;
use super::wizard::{NextOutcome, WizardController};
use crate::config::AppConfig;
use crate::domain::{
    render, split_comma_list, PersonalInfo, RecordFields, RenderedResume, ResumeDocument, SectionKey,
    SectionValue, TemplateConfig, TemplateKind,
};
use crate::infrastructure::{
    ExportOptions, FileKeyValueStore, FileRepository, HostedIdentityProvider, IdentityProvider, KeyValueStore,
    LocalIdentityProvider, PdfRenderer, PrintPdfRenderer, DEFAULT_AUTH_ENDPOINT,
};
use std::path::PathBuf;
use std::rc::Rc;

/// Represents the current mode of the application.
///
/// The mode determines how keyboard input is interpreted and which
/// prompt, if any, is shown in the status bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    /// Navigation between steps, fields and screens
    Normal,
    /// A form field is being edited
    Editing,
    /// Help screen is displayed
    Help,
    /// Prompting for a title before saving to the dashboard
    SaveTitle,
    /// Prompting for a name for a new custom template
    TemplateName,
    /// Prompting for a JSON file to import
    ImportFile,
    /// Prompting for a JSON file to export to
    ExportFile,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthField {
    #[default]
    Email,
    Password,
}

/// Sign-in screen state.
#[derive(Debug, Clone, Default)]
pub struct AuthForm {
    pub email: String,
    pub password: String,
    pub focus: AuthField,
    /// Register a new account instead of signing in
    pub registering: bool,
    pub error: Option<String>,
}

impl AuthForm {
    pub fn focused_mut(&mut self) -> &mut String {
        match self.focus {
            AuthField::Email => &mut self.email,
            AuthField::Password => &mut self.password,
        }
    }
}

/// One row of the form for the active step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldView {
    pub key: &'static str,
    pub label: &'static str,
    pub value: String,
}

const ACCENT_PALETTE: [&str; 5] = ["#1f4e79", "#7a1f1f", "#1f6b3a", "#5b2a86", "#000000"];

/// Main application state.
pub struct App {
    /// Screen currently shown
    pub route: Route,
    /// Current application mode
    pub mode: AppMode,
    pub store: DocumentStore,
    pub session: SessionService,
    pub wizard: WizardController,
    pub router: Router,
    pub library: ResumeLibrary,
    pub templates: TemplateLibrary,
    pub exporter: ExportController,
    renderer: Box<dyn PdfRenderer>,
    /// Directory receiving exported PDFs
    pub export_dir: PathBuf,
    pub preview: PreviewState,
    /// Index into `templates.all()`
    pub template_index: usize,
    /// Selected entry within a list section
    pub selected_item: usize,
    /// Selected field within the current entry
    pub selected_field: usize,
    /// Current input buffer (for editing mode)
    pub input: String,
    /// Cursor position within the active buffer, in bytes
    pub cursor_position: usize,
    /// Input buffer for title, name and filename prompts
    pub prompt_input: String,
    /// Temporary status message to display
    pub status_message: Option<String>,
    /// Scroll position in help text
    pub help_scroll: usize,
    pub auth: AuthForm,
    pub dashboard_selected: usize,
    pub admin_selected: usize,
    /// Set once the user completes the last step
    pub submitted: bool,
    /// Export asked for; the event loop runs it after drawing
    pub export_requested: bool,
}

impl App {
    /// Builds the application from configuration, using file-backed storage.
    pub fn new(config: &AppConfig) -> Self {
        let storage: Rc<dyn KeyValueStore> = Rc::new(FileKeyValueStore::new(&config.data_dir));

        let provider: Box<dyn IdentityProvider> = match &config.auth_api_key {
            Some(key) => {
                let endpoint = config.auth_endpoint.as_deref().unwrap_or(DEFAULT_AUTH_ENDPOINT);
                match HostedIdentityProvider::new(endpoint, key.as_str(), storage.clone()) {
                    Ok(hosted) => {
                        tracing::info!(endpoint, "using hosted identity provider");
                        Box::new(hosted)
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "hosted identity unavailable, using local accounts");
                        Box::new(LocalIdentityProvider::new(storage.clone()))
                    }
                }
            }
            None => Box::new(LocalIdentityProvider::new(storage.clone())),
        };

        Self::with_services(storage, provider, Box::new(PrintPdfRenderer), config)
    }

    /// Builds the application around explicitly supplied services.
    pub fn with_services(
        storage: Rc<dyn KeyValueStore>,
        provider: Box<dyn IdentityProvider>,
        renderer: Box<dyn PdfRenderer>,
        config: &AppConfig,
    ) -> Self {
        let mut store = DocumentStore::open(storage.clone());
        let mut session = SessionService::new(provider, storage.clone());
        session.restore(&mut store);
        let wizard = WizardController::new(&store.get());
        let router = Router::new(config.admin_emails.clone());
        let route = router.resolve(Route::ResumeForm, session.current());

        Self {
            route,
            mode: AppMode::Normal,
            store,
            session,
            wizard,
            router,
            library: ResumeLibrary::new(storage.clone()),
            templates: TemplateLibrary::new(storage),
            exporter: ExportController::new(config.export_settle, ExportOptions::default()),
            renderer,
            export_dir: config.export_dir.clone(),
            preview: PreviewState::default(),
            template_index: 0,
            selected_item: 0,
            selected_field: 0,
            input: String::new(),
            cursor_position: 0,
            prompt_input: String::new(),
            status_message: None,
            help_scroll: 0,
            auth: AuthForm::default(),
            dashboard_selected: 0,
            admin_selected: 0,
            submitted: false,
            export_requested: false,
        }
    }

    // ---------------------------------------------------------------------
    // Screens and session
    // ---------------------------------------------------------------------

    /// Switches screen, applying the access rules.
    pub fn navigate(&mut self, requested: Route) {
        let route = self.router.resolve(requested, self.session.current());
        if route != requested {
            tracing::debug!(requested = requested.path(), resolved = route.path(), "route redirected");
        }
        if route != self.route {
            self.wizard.commit_buffers(&mut self.store);
        }
        self.route = route;
        self.mode = AppMode::Normal;
        self.dashboard_selected = 0;
        self.admin_selected = 0;
    }

    pub fn is_admin(&self) -> bool {
        self.router.is_admin(self.session.current())
    }

    /// Signs in or registers with the credentials in the auth form.
    pub fn submit_auth(&mut self) {
        let email = self.auth.email.clone();
        let password = self.auth.password.clone();
        let result = if self.auth.registering {
            self.session.register(&email, &password, &mut self.store)
        } else {
            self.session.login(&email, &password, &mut self.store)
        };

        match result {
            Ok(identity) => {
                self.auth = AuthForm::default();
                self.reload_form();
                self.navigate(Route::ResumeForm);
                self.status_message = Some(format!("Signed in as {}", identity.email));
            }
            Err(e) => {
                self.auth.password.clear();
                self.auth.error = Some(e.to_string());
            }
        }
        self.cursor_position = self.auth.focused_mut().len();
    }

    pub fn logout(&mut self) {
        self.session.logout(&mut self.store);
        self.auth = AuthForm::default();
        self.reload_form();
        self.navigate(Route::Login);
        self.status_message = Some("Signed out".to_string());
    }

    /// Resets the wizard and form selection after the document was replaced.
    fn reload_form(&mut self) {
        self.wizard.restart(&self.store.get());
        self.selected_item = 0;
        self.selected_field = 0;
        self.submitted = false;
        self.preview.scroll = 0;
    }

    // ---------------------------------------------------------------------
    // Wizard navigation
    // ---------------------------------------------------------------------

    pub fn active_section(&self) -> SectionKey {
        self.wizard.active_section()
    }

    pub fn next_step(&mut self) {
        match self.wizard.next(&mut self.store) {
            Ok(NextOutcome::Advanced(_)) => {
                self.reset_selection();
                self.status_message = None;
            }
            Ok(NextOutcome::Submitted) => {
                self.submitted = true;
                self.status_message = Some("Resume complete! Ctrl+P exports it as PDF".to_string());
            }
            Err(e) => {
                if self.active_section().is_record_list() {
                    self.selected_item = e.index().saturating_sub(1);
                    self.selected_field = 0;
                }
                self.status_message = Some(e.to_string());
            }
        }
    }

    pub fn previous_step(&mut self) {
        self.wizard.back(&mut self.store);
        self.reset_selection();
        self.status_message = None;
    }

    pub fn jump_to_step(&mut self, index: isize) {
        self.wizard.go_to(index, &mut self.store);
        self.reset_selection();
        self.status_message = None;
    }

    fn reset_selection(&mut self) {
        self.selected_item = 0;
        self.selected_field = 0;
    }

    // ---------------------------------------------------------------------
    // Form fields
    // ---------------------------------------------------------------------

    /// Number of entries in the active list section.
    pub fn item_count(&self) -> usize {
        let section = self.active_section();
        if section.is_record_list() {
            self.store.get().section_len(section)
        } else {
            0
        }
    }

    /// Fields shown for the active step.
    pub fn current_fields(&self) -> Vec<FieldView> {
        let section = self.active_section();
        let document = self.store.get();

        if section == SectionKey::PersonalInfo {
            return PersonalInfo::FIELDS
                .iter()
                .map(|f| FieldView {
                    key: f.key,
                    label: f.label,
                    value: document.personal_info.value(f.key).unwrap_or_default().to_string(),
                })
                .collect();
        }

        if section.is_comma_list() {
            let label = if section == SectionKey::Skills {
                "Skills (comma separated)"
            } else {
                "Hobbies (comma separated)"
            };
            return vec![FieldView {
                key: "list",
                label,
                value: self.wizard.buffer(section).unwrap_or_default().to_string(),
            }];
        }

        let value = document.section(section);
        let fields = match value.records() {
            Some(list) if self.selected_item < list.len() => list
                .fields()
                .iter()
                .map(|f| FieldView {
                    key: f.key,
                    label: f.label,
                    value: list.value_at(self.selected_item, f.key).unwrap_or_default().to_string(),
                })
                .collect(),
            _ => Vec::new(),
        };
        fields
    }

    pub fn move_field(&mut self, delta: isize) {
        let count = self.current_fields().len();
        if count == 0 {
            return;
        }
        self.selected_field = (self.selected_field as isize + delta).clamp(0, count as isize - 1) as usize;
    }

    pub fn move_item(&mut self, delta: isize) {
        let count = self.item_count();
        if count == 0 {
            return;
        }
        self.selected_item = (self.selected_item as isize + delta).clamp(0, count as isize - 1) as usize;
        self.selected_field = self.selected_field.min(self.current_fields().len().saturating_sub(1));
    }

    /// Switches to editing mode for the selected field.
    pub fn start_editing(&mut self) {
        let fields = self.current_fields();
        let Some(field) = fields.get(self.selected_field) else {
            if self.active_section().is_record_list() {
                self.status_message = Some("No entries yet. Press 'a' to add one".to_string());
            }
            return;
        };
        self.mode = AppMode::Editing;
        self.input = field.value.clone();
        self.cursor_position = self.input.len();
        self.status_message = None;
    }

    /// Writes the input buffer to the selected field and returns to normal mode.
    pub fn finish_editing(&mut self) {
        let value = std::mem::take(&mut self.input);
        self.apply_field_value(&value);
        self.mode = AppMode::Normal;
        self.cursor_position = 0;

        // Move to the next field after editing
        let count = self.current_fields().len();
        if self.selected_field + 1 < count {
            self.selected_field += 1;
        }
    }

    pub fn cancel_editing(&mut self) {
        self.mode = AppMode::Normal;
        self.input.clear();
        self.cursor_position = 0;
    }

    /// Read-modify-write of the whole section holding the selected field.
    pub fn apply_field_value(&mut self, value: &str) {
        let section = self.active_section();
        let Some(key) = self.current_fields().get(self.selected_field).map(|f| f.key) else {
            return;
        };

        if section.is_comma_list() {
            self.wizard.set_buffer(section, value);
            return;
        }

        let updated = if section == SectionKey::PersonalInfo {
            let mut info = self.store.get().personal_info.clone();
            info.set_value(key, value);
            SectionValue::PersonalInfo(info)
        } else {
            let mut updated = self.store.get().section(section);
            if let Some(list) = updated.records_mut() {
                list.set_value_at(self.selected_item, key, value);
            }
            updated
        };
        self.store.update(updated);
    }

    /// Appends an empty entry to the active list section and selects it.
    pub fn add_item(&mut self) {
        let section = self.active_section();
        let mut updated = self.store.get().section(section);
        let Some(list) = updated.records_mut() else {
            return;
        };
        list.push_empty();
        let len = list.len();
        self.store.update(updated);
        self.selected_item = len - 1;
        self.selected_field = 0;
        self.status_message = Some(format!("Added {} entry #{}", section, len));
    }

    /// Removes the selected entry from the active list section.
    pub fn remove_item(&mut self) {
        let section = self.active_section();
        let mut updated = self.store.get().section(section);
        let Some(list) = updated.records_mut() else {
            return;
        };
        if !list.remove_at(self.selected_item) {
            return;
        }
        let len = list.len();
        self.store.update(updated);
        self.selected_item = self.selected_item.min(len.saturating_sub(1));
        self.selected_field = 0;
        self.status_message = Some(format!("Removed {} entry", section));
    }

    // ---------------------------------------------------------------------
    // Preview and export
    // ---------------------------------------------------------------------

    /// The document as the preview shows it, including uncommitted list buffers.
    pub fn preview_document(&self) -> ResumeDocument {
        let mut document = (*self.store.get()).clone();
        if let Some(buffer) = self.wizard.buffer(SectionKey::Skills) {
            document.skills = split_comma_list(buffer);
        }
        if let Some(buffer) = self.wizard.buffer(SectionKey::Hobbies) {
            document.hobbies = split_comma_list(buffer);
        }
        document
    }

    pub fn active_template(&self) -> TemplateConfig {
        let all = self.templates.all();
        all.get(self.template_index)
            .cloned()
            .unwrap_or_else(|| TemplateConfig::builtin(TemplateKind::Classic))
    }

    pub fn cycle_template(&mut self) {
        let count = self.templates.all().len();
        self.template_index = (self.template_index + 1) % count.max(1);
        self.status_message = Some(format!("Template: {}", self.active_template().name));
    }

    pub fn rendered_preview(&self) -> RenderedResume {
        render(&self.preview_document(), &self.active_template())
    }

    pub fn toggle_preview(&mut self) {
        self.preview.visible = !self.preview.visible;
    }

    pub fn scroll_preview(&mut self, delta: i32) {
        self.preview.scroll = (i32::from(self.preview.scroll) + delta).clamp(0, i32::from(u16::MAX)) as u16;
    }

    /// Queues an export for the event loop, which owns the terminal.
    pub fn request_export(&mut self) {
        self.export_requested = true;
        self.status_message = Some("Exporting...".to_string());
    }

    pub fn take_export_request(&mut self) -> bool {
        std::mem::take(&mut self.export_requested)
    }

    /// Exports the preview to `resume.pdf` in the export directory.
    ///
    /// `frame` draws the export view with the overridden preview state
    /// before the PDF is captured.
    pub fn export_pdf(&mut self, frame: &mut dyn FnMut(&RenderedResume, PreviewState)) {
        self.wizard.commit_buffers(&mut self.store);
        let document = self.preview_document();
        let template = self.active_template();

        let result = self.exporter.export(
            &document,
            &template,
            &mut self.preview,
            self.renderer.as_ref(),
            &self.export_dir,
            frame,
        );
        self.status_message = Some(match result {
            Ok(path) => format!("Exported to {}", path.display()),
            Err(e) => format!("Export failed: {}", e),
        });
    }

    // ---------------------------------------------------------------------
    // Prompts: dashboard title, template name, JSON import/export
    // ---------------------------------------------------------------------

    fn start_prompt(&mut self, mode: AppMode, initial: String) {
        self.mode = mode;
        self.prompt_input = initial;
        self.cursor_position = self.prompt_input.len();
        self.status_message = None;
    }

    pub fn start_save_title(&mut self) {
        let initial = self
            .store
            .get()
            .personal_info
            .value("title")
            .unwrap_or("My resume")
            .to_string();
        self.start_prompt(AppMode::SaveTitle, initial);
    }

    pub fn start_template_name(&mut self) {
        self.start_prompt(AppMode::TemplateName, String::new());
    }

    pub fn start_import_file(&mut self) {
        self.start_prompt(AppMode::ImportFile, "resume.json".to_string());
    }

    pub fn start_export_file(&mut self) {
        self.start_prompt(AppMode::ExportFile, "resume.json".to_string());
    }

    pub fn cancel_prompt(&mut self) {
        self.mode = AppMode::Normal;
        self.prompt_input.clear();
        self.cursor_position = 0;
    }

    /// Completes whichever prompt is open.
    pub fn finish_prompt(&mut self) {
        let text = std::mem::take(&mut self.prompt_input);
        let mode = self.mode;
        self.mode = AppMode::Normal;
        self.cursor_position = 0;

        match mode {
            AppMode::SaveTitle => self.save_to_dashboard(&text),
            AppMode::TemplateName => self.create_custom_template(&text),
            AppMode::ImportFile => {
                let filename = if text.trim().is_empty() { "resume.json" } else { text.trim() };
                let result = FileRepository::load_resume(filename);
                self.set_import_result(result.map_err(|e| e.to_string()));
            }
            AppMode::ExportFile => {
                self.wizard.commit_buffers(&mut self.store);
                let filename = if text.trim().is_empty() { "resume.json" } else { text.trim() };
                let result = FileRepository::save_resume(&self.store.get(), filename);
                self.set_export_result(result.map_err(|e| e.to_string()));
            }
            AppMode::Normal | AppMode::Editing | AppMode::Help => {}
        }
    }

    /// Processes the result of a JSON import.
    pub fn set_import_result(&mut self, result: Result<(ResumeDocument, String), String>) {
        match result {
            Ok((document, filename)) => {
                self.store.replace_all(document);
                self.reload_form();
                self.status_message = Some(format!("Imported {}", filename));
            }
            Err(error) => {
                self.status_message = Some(format!("Import failed: {}", error));
            }
        }
    }

    /// Processes the result of a JSON export.
    pub fn set_export_result(&mut self, result: Result<String, String>) {
        self.status_message = Some(match result {
            Ok(filename) => format!("Saved to {}", filename),
            Err(error) => format!("Save failed: {}", error),
        });
    }

    // ---------------------------------------------------------------------
    // Dashboard
    // ---------------------------------------------------------------------

    pub fn saved_resumes(&self) -> Vec<SavedResume> {
        match self.session.current() {
            Some(identity) => self.library.list(&identity.uid),
            None => Vec::new(),
        }
    }

    pub fn save_to_dashboard(&mut self, title: &str) {
        let Some(owner) = self.session.current().map(|i| i.uid.clone()) else {
            return;
        };
        self.wizard.commit_buffers(&mut self.store);
        let template = self.active_template().name;
        self.status_message = Some(match self.library.save_current(&owner, title, &template, &self.store.get()) {
            Ok(saved) => format!("Saved \"{}\" to dashboard", saved.title),
            Err(e) => format!("Save failed: {}", e),
        });
    }

    pub fn move_dashboard_selection(&mut self, delta: isize) {
        let count = self.saved_resumes().len();
        if count > 0 {
            self.dashboard_selected = (self.dashboard_selected as isize + delta).clamp(0, count as isize - 1) as usize;
        }
    }

    /// Loads the selected saved resume into the form.
    pub fn open_selected_resume(&mut self) {
        let Some(id) = self.saved_resumes().get(self.dashboard_selected).map(|r| r.id) else {
            return;
        };
        let Some(saved) = self.library.load(id) else {
            self.status_message = Some("Saved resume no longer exists".to_string());
            return;
        };
        if let Some(index) = self
            .templates
            .all()
            .iter()
            .position(|t| t.name.eq_ignore_ascii_case(&saved.template))
        {
            self.template_index = index;
        }
        self.store.replace_all(saved.document);
        self.reload_form();
        self.navigate(Route::ResumeForm);
        self.status_message = Some(format!("Opened \"{}\"", saved.title));
    }

    pub fn delete_selected_resume(&mut self) {
        let Some(saved) = self.saved_resumes().into_iter().nth(self.dashboard_selected) else {
            return;
        };
        self.status_message = Some(match self.library.delete(saved.id) {
            Ok(_) => format!("Deleted \"{}\"", saved.title),
            Err(e) => format!("Delete failed: {}", e),
        });
        self.dashboard_selected = self.dashboard_selected.saturating_sub(1);
    }

    // ---------------------------------------------------------------------
    // Admin: custom templates
    // ---------------------------------------------------------------------

    pub fn custom_templates(&self) -> Vec<TemplateConfig> {
        self.templates.custom()
    }

    pub fn move_admin_selection(&mut self, delta: isize) {
        let count = self.custom_templates().len();
        if count > 0 {
            self.admin_selected = (self.admin_selected as isize + delta).clamp(0, count as isize - 1) as usize;
        }
    }

    /// Creates a custom template based on the active one.
    pub fn create_custom_template(&mut self, name: &str) {
        let config = TemplateConfig {
            name: name.to_string(),
            ..self.active_template()
        };
        self.status_message = Some(match self.templates.save(config) {
            Ok(()) => format!("Template \"{}\" saved", name.trim()),
            Err(e) => e.to_string(),
        });
    }

    /// Applies a change to the selected custom template and saves it.
    fn modify_selected_template(&mut self, change: impl FnOnce(&mut TemplateConfig)) {
        let Some(mut config) = self.custom_templates().into_iter().nth(self.admin_selected) else {
            return;
        };
        change(&mut config);
        let name = config.name.clone();
        self.status_message = Some(match self.templates.save(config) {
            Ok(()) => format!("Template \"{}\" updated", name),
            Err(e) => e.to_string(),
        });
    }

    pub fn toggle_template_headings(&mut self) {
        self.modify_selected_template(|c| c.uppercase_headings = !c.uppercase_headings);
    }

    pub fn cycle_template_accent(&mut self) {
        self.modify_selected_template(|c| {
            let next = ACCENT_PALETTE
                .iter()
                .position(|a| a.eq_ignore_ascii_case(&c.accent))
                .map_or(0, |i| (i + 1) % ACCENT_PALETTE.len());
            c.accent = ACCENT_PALETTE[next].to_string();
        });
    }

    pub fn toggle_template_base(&mut self) {
        self.modify_selected_template(|c| {
            c.base = match c.base {
                TemplateKind::Classic => TemplateKind::Modern,
                TemplateKind::Modern => TemplateKind::Classic,
            };
        });
    }

    pub fn delete_selected_template(&mut self) {
        let Some(config) = self.custom_templates().into_iter().nth(self.admin_selected) else {
            return;
        };
        self.status_message = Some(match self.templates.delete(&config.name) {
            Ok(_) => format!("Deleted template \"{}\"", config.name),
            Err(e) => e.to_string(),
        });
        self.admin_selected = self.admin_selected.saturating_sub(1);
        self.template_index = 0;
    }
}


#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;
    use crate::infrastructure::MemoryKeyValueStore;

    fn section_index(section: SectionKey) -> isize {
        SectionKey::ALL.iter().position(|s| *s == section).unwrap() as isize
    }

    #[test]
    fn test_starts_on_login_when_signed_out() {
        let app = app();
        assert_eq!(app.route, Route::Login);
        assert!(matches!(app.mode, AppMode::Normal));
    }

    #[test]
    fn test_register_moves_to_form() {
        let app = signed_in_app();
        assert_eq!(app.route, Route::ResumeForm);
        assert!(app.status_message.unwrap().contains("ada@example.com"));
    }

    #[test]
    fn test_failed_login_stays_on_login() {
        let mut app = app();
        app.auth.email = "ghost@example.com".to_string();
        app.auth.password = "whatever".to_string();
        app.submit_auth();

        assert_eq!(app.route, Route::Login);
        assert_eq!(app.auth.error.as_deref(), Some("Invalid email or password"));
        assert!(app.auth.password.is_empty());
    }

    #[test]
    fn test_edit_personal_info_field() {
        let mut app = signed_in_app();
        app.selected_field = 0;
        app.start_editing();
        assert!(matches!(app.mode, AppMode::Editing));

        app.input = "Ada Lovelace".to_string();
        app.finish_editing();

        assert!(matches!(app.mode, AppMode::Normal));
        assert_eq!(app.store.get().personal_info.name.as_deref(), Some("Ada Lovelace"));
        assert_eq!(app.selected_field, 1);
    }

    #[test]
    fn test_cancel_editing_keeps_value() {
        let mut app = signed_in_app();
        app.start_editing();
        app.input = "typo".to_string();
        app.cancel_editing();

        assert!(app.store.get().personal_info.name.is_none());
        assert!(app.input.is_empty());
    }

    #[test]
    fn test_add_edit_remove_entries() {
        let mut app = signed_in_app();
        app.jump_to_step(section_index(SectionKey::Education));

        app.start_editing();
        assert!(matches!(app.mode, AppMode::Normal));
        assert!(app.status_message.as_ref().unwrap().contains("add"));

        app.add_item();
        app.add_item();
        assert_eq!(app.item_count(), 2);
        assert_eq!(app.selected_item, 1);

        app.start_editing();
        app.input = "MIT".to_string();
        app.finish_editing();
        assert_eq!(app.store.get().education[1].institution.as_deref(), Some("MIT"));

        app.remove_item();
        assert_eq!(app.item_count(), 1);
        assert_eq!(app.selected_item, 0);
    }

    #[test]
    fn test_invalid_dates_block_next_and_select_item() {
        let mut app = signed_in_app();
        app.jump_to_step(section_index(SectionKey::WorkExperience));
        app.add_item();
        app.add_item();

        app.selected_item = 1;
        app.selected_field = 3; // start
        app.apply_field_value("2023-01");
        app.selected_field = 4; // end
        app.apply_field_value("2022-01");
        app.selected_item = 0;

        let step = app.wizard.current_step();
        app.next_step();

        assert_eq!(app.wizard.current_step(), step);
        assert_eq!(app.selected_item, 1);
        assert!(app.status_message.unwrap().contains("#2"));
    }

    #[test]
    fn test_skills_buffer_and_preview() {
        let mut app = signed_in_app();
        app.jump_to_step(section_index(SectionKey::Skills));
        app.start_editing();
        app.input = " Go,  Rust ,,TypeScript".to_string();
        app.finish_editing();

        // Preview sees the buffer before it is committed
        assert!(app.store.get().skills.is_empty());
        assert_eq!(app.preview_document().skills, vec!["Go", "Rust", "TypeScript"]);

        app.next_step();
        assert_eq!(app.store.get().skills, vec!["Go", "Rust", "TypeScript"]);
    }

    #[test]
    fn test_submit_at_last_step() {
        let mut app = signed_in_app();
        app.jump_to_step(100);
        app.next_step();

        assert!(app.submitted);
        assert_eq!(app.wizard.current_step(), 7);
    }

    #[test]
    fn test_switching_accounts_resets_form() {
        let storage: Rc<dyn KeyValueStore> = Rc::new(MemoryKeyValueStore::new());
        let mut app = app_with_storage(storage);
        signed_in(&mut app, "ada@example.com");
        app.apply_field_value("Ada");
        assert!(!app.store.get().is_empty());

        app.logout();
        assert_eq!(app.route, Route::Login);
        signed_in(&mut app, "bob@example.com");

        assert!(app.store.get().is_empty());
        assert_eq!(app.wizard.current_step(), 0);
    }

    #[test]
    fn test_cycle_template() {
        let mut app = signed_in_app();
        assert_eq!(app.active_template().name, "Classic");
        app.cycle_template();
        assert_eq!(app.active_template().name, "Modern");
        app.cycle_template();
        assert_eq!(app.active_template().name, "Classic");
    }

    #[test]
    fn test_export_reports_path() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut app = signed_in_app();
        app.export_dir = dir.path().to_path_buf();
        app.preview.scroll = 4;
        app.request_export();
        assert!(app.take_export_request());
        assert!(!app.take_export_request());

        let mut seen = Vec::new();
        app.export_pdf(&mut |_, state| seen.push(state));

        assert_eq!(seen, vec![PreviewState { visible: true, scroll: 0 }]);
        assert!(app.status_message.unwrap().contains("resume.pdf"));
        assert!(dir.path().join("resume.pdf").exists());
        assert_eq!(app.preview.scroll, 4);
        assert!(!app.exporter.is_in_flight());
    }

    #[test]
    fn test_dashboard_save_and_open() {
        let mut app = signed_in_app();
        app.apply_field_value("Ada");
        app.cycle_template();
        assert_eq!(app.active_template().name, "Modern");
        app.start_save_title();
        assert!(matches!(app.mode, AppMode::SaveTitle));
        app.prompt_input = "Backend".to_string();
        app.finish_prompt();

        assert_eq!(app.saved_resumes().len(), 1);
        assert_eq!(app.saved_resumes()[0].template, "Modern");

        app.jump_to_step(0);
        app.apply_field_value("Changed");
        app.cycle_template();
        assert_eq!(app.active_template().name, "Classic");
        app.navigate(Route::Dashboard);
        assert_eq!(app.route, Route::Dashboard);
        app.open_selected_resume();

        assert_eq!(app.route, Route::ResumeForm);
        assert_eq!(app.store.get().personal_info.name.as_deref(), Some("Ada"));
        assert_eq!(app.active_template().name, "Modern");

        app.navigate(Route::Dashboard);
        app.delete_selected_resume();
        assert!(app.saved_resumes().is_empty());
    }

    #[test]
    fn test_admin_requires_admin_account() {
        let mut app = signed_in_app();
        app.navigate(Route::Admin);
        assert_eq!(app.route, Route::ResumeForm);

        app.logout();
        signed_in(&mut app, "boss@example.com");
        app.navigate(Route::Admin);
        assert_eq!(app.route, Route::Admin);
    }

    #[test]
    fn test_custom_template_lifecycle() {
        let mut app = signed_in_app();
        app.create_custom_template("Compact");
        assert_eq!(app.custom_templates().len(), 1);

        app.toggle_template_headings();
        app.cycle_template_accent();
        app.toggle_template_base();
        let custom = &app.custom_templates()[0];
        assert!(!custom.uppercase_headings);
        assert_eq!(custom.accent, "#1f4e79");
        assert_eq!(custom.base, TemplateKind::Modern);

        app.delete_selected_template();
        assert!(app.custom_templates().is_empty());
    }

    #[test]
    fn test_import_result_handling() {
        let mut app = signed_in_app();
        let mut doc = ResumeDocument::default();
        doc.hobbies = vec!["Chess".to_string()];

        app.set_import_result(Ok((doc, "in.json".to_string())));
        assert_eq!(app.store.get().hobbies, vec!["Chess".to_string()]);
        assert_eq!(app.wizard.buffer(SectionKey::Hobbies), Some("Chess"));

        app.set_import_result(Err("No such file".to_string()));
        assert!(app.status_message.unwrap().contains("Import failed: No such file"));
    }
}
