use crate::application::{App, AppMode, AuthField, PreviewState, Route, STEPS, EXPORT_FILE_NAME};
use crate::domain::{Block as ResumeBlock, RenderedResume};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Tabs, Wrap},
    Frame,
};

pub fn render_ui(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(f.area());

    render_header(f, app, chunks[0]);
    match app.route {
        Route::Login => render_login(f, app, chunks[1]),
        Route::ResumeForm => render_form_screen(f, app, chunks[1]),
        Route::Dashboard => render_dashboard(f, app, chunks[1]),
        Route::Admin => render_admin(f, app, chunks[1]),
    }
    render_status_bar(f, app, chunks[2]);

    if matches!(app.mode, AppMode::Help) {
        render_help_popup(f, app.help_scroll);
    }
}

fn render_header(f: &mut Frame, app: &App, area: Rect) {
    let user = app
        .session
        .current()
        .map(|i| i.email.as_str())
        .unwrap_or("signed out");
    let header = Paragraph::new(format!(
        "tresume - Resume Builder | {} | {} | Template: {}",
        app.route.title(),
        user,
        app.active_template().name
    ))
    .style(Style::default().fg(Color::Cyan));
    f.render_widget(header, area);
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn render_login(f: &mut Frame, app: &App, area: Rect) {
    let form = &app.auth;
    let focus_style = |field: AuthField| {
        if form.focus == field {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        }
    };

    let mut lines = vec![
        Line::from(if form.registering { "Create an account" } else { "Sign in" })
            .style(Style::default().add_modifier(Modifier::BOLD)),
        Line::from(""),
        Line::from(vec![
            Span::styled("Email:    ", focus_style(AuthField::Email)),
            Span::raw(form.email.clone()),
        ]),
        Line::from(vec![
            Span::styled("Password: ", focus_style(AuthField::Password)),
            Span::raw("*".repeat(form.password.chars().count())),
        ]),
        Line::from(""),
    ];
    if let Some(error) = &form.error {
        lines.push(Line::from(Span::styled(error.clone(), Style::default().fg(Color::Red))));
    }

    let title = if form.registering { "Register" } else { "Login" };
    let widget = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(title))
        .wrap(Wrap { trim: false });
    f.render_widget(widget, centered(area, 60, 10));
}

fn render_form_screen(f: &mut Frame, app: &App, area: Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    let titles: Vec<String> = STEPS
        .iter()
        .enumerate()
        .map(|(i, s)| format!("F{} {}", i + 1, s.title()))
        .collect();
    let tabs = Tabs::new(titles)
        .select(app.wizard.current_step())
        .block(Block::default().borders(Borders::ALL).title(format!(
            "Step {}/{}",
            app.wizard.current_step() + 1,
            app.wizard.step_count()
        )))
        .highlight_style(Style::default().bg(Color::Blue).fg(Color::White));
    f.render_widget(tabs, rows[0]);

    if app.preview.visible {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(rows[1]);
        render_form(f, app, columns[0]);
        render_preview(f, app, columns[1]);
    } else {
        render_form(f, app, rows[1]);
    }
}

fn render_form(f: &mut Frame, app: &App, area: Rect) {
    let section = app.active_section();
    let title = if section.is_record_list() {
        match app.item_count() {
            0 => format!("{} (no entries)", section),
            n => format!("{} (entry {}/{})", section, app.selected_item + 1, n),
        }
    } else {
        section.to_string()
    };

    let fields = app.current_fields();
    if fields.is_empty() {
        let hint = Paragraph::new("No entries yet. Press 'a' to add one.")
            .block(Block::default().borders(Borders::ALL).title(title));
        f.render_widget(hint, area);
        return;
    }

    let rows: Vec<Row> = fields
        .iter()
        .enumerate()
        .map(|(i, field)| {
            let selected = i == app.selected_field;
            let value = if selected && matches!(app.mode, AppMode::Editing) {
                format!("{}_", app.input)
            } else {
                field.value.clone()
            };
            let style = if selected {
                Style::default().bg(Color::Blue).fg(Color::White)
            } else {
                Style::default()
            };
            Row::new(vec![
                Cell::from(field.label).style(Style::default().fg(Color::Yellow)),
                Cell::from(value),
            ])
            .style(style)
        })
        .collect();

    let table = Table::new(rows, [Constraint::Length(18), Constraint::Min(10)])
        .block(Block::default().borders(Borders::ALL).title(title))
        .column_spacing(1);
    f.render_widget(table, area);
}

/// Styled terminal lines for a rendered resume.
pub fn preview_lines(resume: &RenderedResume) -> Vec<Line<'static>> {
    let (r, g, b) = resume.accent;
    let accent = Style::default().fg(Color::Rgb(r, g, b));

    resume
        .blocks
        .iter()
        .map(|block| match block {
            ResumeBlock::Title(t) => Line::from(Span::styled(t.clone(), accent.add_modifier(Modifier::BOLD))),
            ResumeBlock::Subtitle(t) => Line::from(t.clone()),
            ResumeBlock::Heading(t) => {
                Line::from(Span::styled(t.clone(), accent.add_modifier(Modifier::BOLD | Modifier::UNDERLINED)))
            }
            ResumeBlock::Entry { title, meta } => {
                let mut spans = vec![Span::styled(title.clone(), Style::default().add_modifier(Modifier::BOLD))];
                if let Some(meta) = meta {
                    spans.push(Span::styled(format!("  {}", meta), Style::default().fg(Color::DarkGray)));
                }
                Line::from(spans)
            }
            ResumeBlock::Line(t) => Line::from(t.clone()),
            ResumeBlock::Bullet(t) => Line::from(format!("  • {}", t)),
            ResumeBlock::Spacer => Line::from(""),
        })
        .collect()
}

fn render_preview(f: &mut Frame, app: &App, area: Rect) {
    let resume = app.rendered_preview();
    let preview = Paragraph::new(preview_lines(&resume))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("Preview ({})", resume.template)),
        )
        .wrap(Wrap { trim: false })
        .scroll((app.preview.scroll, 0));
    f.render_widget(preview, area);
}

/// Full-screen view of the resume drawn while an export captures it.
pub fn render_export_frame(f: &mut Frame, resume: &RenderedResume, state: PreviewState) {
    let area = f.area();
    f.render_widget(Clear, area);
    if !state.visible {
        return;
    }
    let preview = Paragraph::new(preview_lines(resume))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("Exporting {} ({})", EXPORT_FILE_NAME, resume.template)),
        )
        .wrap(Wrap { trim: false })
        .scroll((state.scroll, 0));
    f.render_widget(preview, area);
}

fn render_dashboard(f: &mut Frame, app: &App, area: Rect) {
    let saved = app.saved_resumes();
    let block = Block::default().borders(Borders::ALL).title("Saved resumes");
    if saved.is_empty() {
        let empty = Paragraph::new("Nothing saved yet. Press Ctrl+S on the form to save a resume.").block(block);
        f.render_widget(empty, area);
        return;
    }

    let header = Row::new(vec!["Title", "Template", "Saved", "Name"]).style(Style::default().fg(Color::Yellow));
    let rows: Vec<Row> = saved
        .iter()
        .enumerate()
        .map(|(i, r)| {
            let style = if i == app.dashboard_selected {
                Style::default().bg(Color::Blue).fg(Color::White)
            } else {
                Style::default()
            };
            Row::new(vec![
                r.title.clone(),
                r.template.clone(),
                r.saved_at.format("%Y-%m-%d %H:%M").to_string(),
                r.document.personal_info.name.clone().unwrap_or_default(),
            ])
            .style(style)
        })
        .collect();

    let table = Table::new(
        rows,
        [Constraint::Min(20), Constraint::Length(12), Constraint::Length(17), Constraint::Min(12)],
    )
        .header(header)
        .block(block)
        .column_spacing(2);
    f.render_widget(table, area);
}

fn render_admin(f: &mut Frame, app: &App, area: Rect) {
    let custom = app.custom_templates();
    let block = Block::default().borders(Borders::ALL).title("Custom templates");
    if custom.is_empty() {
        let empty = Paragraph::new("No custom templates. Press 'n' to create one from the active template.")
            .block(block);
        f.render_widget(empty, area);
        return;
    }

    let header = Row::new(vec!["Name", "Base", "Accent", "Headings"]).style(Style::default().fg(Color::Yellow));
    let rows: Vec<Row> = custom
        .iter()
        .enumerate()
        .map(|(i, t)| {
            let style = if i == app.admin_selected {
                Style::default().bg(Color::Blue).fg(Color::White)
            } else {
                Style::default()
            };
            Row::new(vec![
                t.name.clone(),
                t.base.name().to_string(),
                t.accent.clone(),
                if t.uppercase_headings { "UPPER" } else { "Title" }.to_string(),
            ])
            .style(style)
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Min(16),
            Constraint::Length(10),
            Constraint::Length(10),
            Constraint::Length(10),
        ],
    )
    .header(header)
    .block(block)
    .column_spacing(2);
    f.render_widget(table, area);
}

fn normal_hint(route: Route) -> &'static str {
    match route {
        Route::Login => "Tab: switch field | Enter: submit | Ctrl+R: login/register | Ctrl+Q: quit",
        Route::ResumeForm => {
            "Tab/Shift+Tab: next/back | Enter: edit | a/d: add/delete | t: template | Ctrl+P: PDF | ?: help | q: quit"
        }
        Route::Dashboard => "Enter: open | d: delete | Esc: back to form | ?: help | q: quit",
        Route::Admin => "n: new | u: headings | c: accent | b: base | d: delete | Esc: back | q: quit",
    }
}

fn render_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let input_text = match app.mode {
        AppMode::Normal => match &app.status_message {
            Some(status) => status.clone(),
            None => normal_hint(app.route).to_string(),
        },
        AppMode::Editing => format!("Editing: {} (Enter to save, Esc to cancel)", app.input),
        AppMode::Help => "↑↓/jk: scroll | PgUp/PgDn: fast scroll | Home: top | Esc/q: close help".to_string(),
        AppMode::SaveTitle => format!("Save to dashboard as: {} (Enter to save, Esc to cancel)", app.prompt_input),
        AppMode::TemplateName => format!("New template name: {} (Enter to create, Esc to cancel)", app.prompt_input),
        AppMode::ImportFile => format!("Import JSON from: {} (Enter to import, Esc to cancel)", app.prompt_input),
        AppMode::ExportFile => format!("Export JSON as: {} (Enter to export, Esc to cancel)", app.prompt_input),
    };

    let input = Paragraph::new(input_text)
        .block(Block::default().borders(Borders::ALL).title("Status"))
        .style(match app.mode {
            AppMode::Normal => Style::default(),
            AppMode::Editing => Style::default().fg(Color::Green),
            AppMode::Help => Style::default().fg(Color::Cyan),
            AppMode::SaveTitle | AppMode::TemplateName => Style::default().fg(Color::Yellow),
            AppMode::ImportFile | AppMode::ExportFile => Style::default().fg(Color::Magenta),
        });
    f.render_widget(input, area);
}

fn render_help_popup(f: &mut Frame, scroll: usize) {
    let area = f.area();
    let popup_area = Rect {
        x: area.width / 10,
        y: area.height / 10,
        width: area.width * 4 / 5,
        height: area.height * 4 / 5,
    };

    f.render_widget(Clear, popup_area);

    let help_lines: Vec<&str> = HELP_TEXT.lines().collect();
    let visible_height = popup_area.height.saturating_sub(2) as usize;

    let start_line = scroll.min(help_lines.len().saturating_sub(visible_height));
    let end_line = (start_line + visible_height).min(help_lines.len());

    let visible_text = help_lines[start_line..end_line].join("\n");

    let help_widget = Paragraph::new(visible_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("tresume Help (Line {}/{})", start_line + 1, help_lines.len()))
                .style(Style::default().fg(Color::Cyan)),
        )
        .style(Style::default().fg(Color::White));

    f.render_widget(help_widget, popup_area);
}

const HELP_TEXT: &str = r#"TRESUME KEYBOARD REFERENCE

=== RESUME STEPS ===
Tab / Ctrl+N    Validate this step and go to the next one
Shift+Tab       Go back one step (Ctrl+B also works)
F1 .. F8        Jump straight to a step
                Personal Info, Education, Work Experience, Skills,
                Projects, Hobbies, Achievements, Certifications

=== EDITING ===
↑↓ or j/k       Select a field
←→ or h/l       Select an entry in list sections ([ and ] also work)
Enter           Edit the selected field, Enter again to keep it
Esc             Cancel the edit
a               Add an entry to the current section
d               Delete the selected entry
                Skills and hobbies are typed as one comma separated line
                Dates use YYYY-MM or YYYY-MM-DD; leave the end date empty
                for "Present"

=== PREVIEW AND EXPORT ===
t               Cycle through templates (built-in and custom)
p               Show or hide the preview pane
PgUp/PgDn       Scroll the preview
Ctrl+P          Export the preview to resume.pdf
Ctrl+E          Export the resume data as JSON
Ctrl+O          Import resume data from JSON

=== ACCOUNT AND SCREENS ===
Ctrl+S          Save a copy to your dashboard
Ctrl+D          Open the dashboard (Enter: open, d: delete)
Ctrl+F          Back to the resume form
Ctrl+A          Template administration (admin accounts only)
Ctrl+L          Sign out; the working resume is cleared

=== HELP NAVIGATION ===
↑↓ or j/k       Scroll help text up/down one line
Page Up/Down    Scroll help text up/down 5 lines
Home            Jump to top of help text
Esc/?/q         Close this help window

q quits from any screen except sign-in, where Ctrl+Q quits."#;
