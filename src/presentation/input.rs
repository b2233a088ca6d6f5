use crate::application::{App, AppMode, AuthField, Route};
use crossterm::event::{KeyCode, KeyModifiers};

pub struct InputHandler;

impl InputHandler {
    /// Whether the key should end the program in the current state.
    ///
    /// Plain `q` is text on the sign-in screen, so there only Ctrl+Q quits.
    pub fn should_quit(app: &App, key: KeyCode, modifiers: KeyModifiers) -> bool {
        if !matches!(app.mode, AppMode::Normal) {
            return false;
        }
        match key {
            KeyCode::Char('q') if modifiers.contains(KeyModifiers::CONTROL) => true,
            KeyCode::Char('q') => app.route != Route::Login,
            _ => false,
        }
    }

    pub fn handle_key_event(app: &mut App, key: KeyCode, modifiers: KeyModifiers) {
        match app.mode {
            AppMode::Normal => match app.route {
                Route::Login => Self::handle_login(app, key, modifiers),
                Route::ResumeForm => Self::handle_form(app, key, modifiers),
                Route::Dashboard => Self::handle_dashboard(app, key, modifiers),
                Route::Admin => Self::handle_admin(app, key, modifiers),
            },
            AppMode::Editing => Self::handle_editing_mode(app, key),
            AppMode::Help => Self::handle_help_mode(app, key),
            AppMode::SaveTitle | AppMode::TemplateName | AppMode::ImportFile | AppMode::ExportFile => {
                Self::handle_prompt_mode(app, key)
            }
        }
    }

    /// Shortcuts available on every signed-in screen. Returns true if handled.
    fn handle_global(app: &mut App, key: KeyCode, modifiers: KeyModifiers) -> bool {
        if modifiers.contains(KeyModifiers::CONTROL) {
            match key {
                KeyCode::Char('f') => app.navigate(Route::ResumeForm),
                KeyCode::Char('d') => app.navigate(Route::Dashboard),
                KeyCode::Char('a') => {
                    app.navigate(Route::Admin);
                    if app.route != Route::Admin {
                        app.status_message = Some("Admin access required".to_string());
                    }
                }
                KeyCode::Char('l') => app.logout(),
                _ => return false,
            }
            return true;
        }
        if key == KeyCode::Char('?') {
            app.mode = AppMode::Help;
            app.help_scroll = 0;
            return true;
        }
        false
    }

    fn handle_login(app: &mut App, key: KeyCode, modifiers: KeyModifiers) {
        if modifiers.contains(KeyModifiers::CONTROL) {
            if key == KeyCode::Char('r') {
                app.auth.registering = !app.auth.registering;
                app.auth.error = None;
            }
            return;
        }
        match key {
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
                app.auth.focus = match app.auth.focus {
                    AuthField::Email => AuthField::Password,
                    AuthField::Password => AuthField::Email,
                };
                app.cursor_position = app.auth.focused_mut().len();
            }
            KeyCode::Enter => {
                if app.auth.focus == AuthField::Email {
                    app.auth.focus = AuthField::Password;
                    app.cursor_position = app.auth.password.len();
                } else {
                    app.submit_auth();
                }
            }
            KeyCode::Esc => {
                app.auth.error = None;
            }
            _ => edit_text(app.auth.focused_mut(), &mut app.cursor_position, key),
        }
    }

    fn handle_form(app: &mut App, key: KeyCode, modifiers: KeyModifiers) {
        if Self::handle_global(app, key, modifiers) {
            return;
        }
        if modifiers.contains(KeyModifiers::CONTROL) {
            match key {
                KeyCode::Char('n') => app.next_step(),
                KeyCode::Char('b') => app.previous_step(),
                KeyCode::Char('p') => app.request_export(),
                KeyCode::Char('s') => app.start_save_title(),
                KeyCode::Char('o') => app.start_import_file(),
                KeyCode::Char('e') => app.start_export_file(),
                _ => {}
            }
            return;
        }

        match key {
            KeyCode::Tab => app.next_step(),
            KeyCode::BackTab => app.previous_step(),
            KeyCode::F(n @ 1..=8) => app.jump_to_step(isize::from(n) - 1),
            KeyCode::Up | KeyCode::Char('k') => app.move_field(-1),
            KeyCode::Down | KeyCode::Char('j') => app.move_field(1),
            KeyCode::Left | KeyCode::Char('h') | KeyCode::Char('[') => app.move_item(-1),
            KeyCode::Right | KeyCode::Char('l') | KeyCode::Char(']') => app.move_item(1),
            KeyCode::Enter => app.start_editing(),
            KeyCode::Char('a') => app.add_item(),
            KeyCode::Char('d') => app.remove_item(),
            KeyCode::Char('t') => app.cycle_template(),
            KeyCode::Char('p') => app.toggle_preview(),
            KeyCode::PageUp => app.scroll_preview(-5),
            KeyCode::PageDown => app.scroll_preview(5),
            KeyCode::Esc => app.status_message = None,
            _ => {}
        }
    }

    fn handle_dashboard(app: &mut App, key: KeyCode, modifiers: KeyModifiers) {
        if Self::handle_global(app, key, modifiers) {
            return;
        }
        match key {
            KeyCode::Up | KeyCode::Char('k') => app.move_dashboard_selection(-1),
            KeyCode::Down | KeyCode::Char('j') => app.move_dashboard_selection(1),
            KeyCode::Enter => app.open_selected_resume(),
            KeyCode::Char('d') | KeyCode::Delete => app.delete_selected_resume(),
            KeyCode::Esc => app.navigate(Route::ResumeForm),
            _ => {}
        }
    }

    fn handle_admin(app: &mut App, key: KeyCode, modifiers: KeyModifiers) {
        if Self::handle_global(app, key, modifiers) {
            return;
        }
        match key {
            KeyCode::Up | KeyCode::Char('k') => app.move_admin_selection(-1),
            KeyCode::Down | KeyCode::Char('j') => app.move_admin_selection(1),
            KeyCode::Char('n') => app.start_template_name(),
            KeyCode::Char('u') => app.toggle_template_headings(),
            KeyCode::Char('c') => app.cycle_template_accent(),
            KeyCode::Char('b') => app.toggle_template_base(),
            KeyCode::Char('d') | KeyCode::Delete => app.delete_selected_template(),
            KeyCode::Esc => app.navigate(Route::ResumeForm),
            _ => {}
        }
    }

    fn handle_editing_mode(app: &mut App, key: KeyCode) {
        match key {
            KeyCode::Enter => app.finish_editing(),
            KeyCode::Esc => app.cancel_editing(),
            _ => edit_text(&mut app.input, &mut app.cursor_position, key),
        }
    }

    fn handle_help_mode(app: &mut App, key: KeyCode) {
        match key {
            KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q') => {
                app.mode = AppMode::Normal;
            }
            KeyCode::Up | KeyCode::Char('k') => {
                app.help_scroll = app.help_scroll.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                app.help_scroll += 1;
            }
            KeyCode::PageUp => {
                app.help_scroll = app.help_scroll.saturating_sub(5);
            }
            KeyCode::PageDown => {
                app.help_scroll += 5;
            }
            KeyCode::Home => {
                app.help_scroll = 0;
            }
            _ => {}
        }
    }

    fn handle_prompt_mode(app: &mut App, key: KeyCode) {
        match key {
            KeyCode::Enter => app.finish_prompt(),
            KeyCode::Esc => app.cancel_prompt(),
            _ => edit_text(&mut app.prompt_input, &mut app.cursor_position, key),
        }
    }
}

/// Applies a line-editing key to `buffer`. The cursor is a byte offset
/// kept on a char boundary.
fn edit_text(buffer: &mut String, cursor: &mut usize, key: KeyCode) {
    *cursor = (*cursor).min(buffer.len());
    match key {
        KeyCode::Backspace => {
            if let Some((i, _)) = buffer[..*cursor].char_indices().next_back() {
                buffer.remove(i);
                *cursor = i;
            }
        }
        KeyCode::Delete => {
            if *cursor < buffer.len() {
                buffer.remove(*cursor);
            }
        }
        KeyCode::Left => {
            if let Some((i, _)) = buffer[..*cursor].char_indices().next_back() {
                *cursor = i;
            }
        }
        KeyCode::Right => {
            if let Some(c) = buffer[*cursor..].chars().next() {
                *cursor += c.len_utf8();
            }
        }
        KeyCode::Home => *cursor = 0,
        KeyCode::End => *cursor = buffer.len(),
        KeyCode::Char(c) => {
            buffer.insert(*cursor, c);
            *cursor += c.len_utf8();
        }
        _ => {}
    }
}
