//! Visual templates.
//!
//! A template turns a [`ResumeDocument`] into a flat list of [`Block`]s.
//! The terminal preview and the PDF exporter both draw from that list, so
//! what the user sees is what gets exported.

use super::models::{RecordFields, ResumeDocument, SectionKey};
use super::services::{description_lines, format_date_range, format_month};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TemplateKind {
    Classic,
    Modern,
}

impl TemplateKind {
    pub fn name(self) -> &'static str {
        match self {
            TemplateKind::Classic => "Classic",
            TemplateKind::Modern => "Modern",
        }
    }
}

/// Template settings. Built-in templates use [`TemplateConfig::builtin`];
/// custom ones are created from the admin screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateConfig {
    pub name: String,
    pub base: TemplateKind,
    /// Hex colour such as `#1f4e79`.
    pub accent: String,
    pub section_order: Vec<SectionKey>,
    pub uppercase_headings: bool,
}

impl TemplateConfig {
    pub fn builtin(kind: TemplateKind) -> Self {
        match kind {
            TemplateKind::Classic => Self {
                name: kind.name().to_string(),
                base: kind,
                accent: "#000000".to_string(),
                section_order: SectionKey::ALL[1..].to_vec(),
                uppercase_headings: true,
            },
            TemplateKind::Modern => Self {
                name: kind.name().to_string(),
                base: kind,
                accent: "#1f4e79".to_string(),
                section_order: vec![
                    SectionKey::WorkExperience,
                    SectionKey::Projects,
                    SectionKey::Skills,
                    SectionKey::Education,
                    SectionKey::Certifications,
                    SectionKey::Achievements,
                    SectionKey::Hobbies,
                ],
                uppercase_headings: false,
            },
        }
    }

    /// Accent colour as RGB components in `0.0..=1.0`. Falls back to black.
    pub fn accent_rgb(&self) -> (f32, f32, f32) {
        let hex = self.accent.trim_start_matches('#');
        let channel = |range: std::ops::Range<usize>| {
            hex.get(range)
                .and_then(|c| u8::from_str_radix(c, 16).ok())
                .map(|c| f32::from(c) / 255.0)
        };
        match (hex.len(), channel(0..2), channel(2..4), channel(4..6)) {
            (6, Some(r), Some(g), Some(b)) => (r, g, b),
            _ => (0.0, 0.0, 0.0),
        }
    }
}

/// One renderable unit of a resume.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// The candidate's name.
    Title(String),
    /// Headline and contact lines under the name.
    Subtitle(String),
    /// A section heading.
    Heading(String),
    /// An entry header, e.g. position and company, with an optional date line.
    Entry { title: String, meta: Option<String> },
    Line(String),
    Bullet(String),
    Spacer,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedResume {
    pub template: String,
    pub accent: (u8, u8, u8),
    pub blocks: Vec<Block>,
}

impl RenderedResume {
    /// Plain-text rendering, one line per block.
    pub fn to_plain_text(&self) -> String {
        let mut out = String::new();
        for block in &self.blocks {
            match block {
                Block::Title(t) | Block::Subtitle(t) | Block::Heading(t) | Block::Line(t) => {
                    out.push_str(t);
                }
                Block::Entry { title, meta } => {
                    out.push_str(title);
                    if let Some(meta) = meta {
                        out.push_str(" (");
                        out.push_str(meta);
                        out.push(')');
                    }
                }
                Block::Bullet(t) => {
                    out.push_str("- ");
                    out.push_str(t);
                }
                Block::Spacer => {}
            }
            out.push('\n');
        }
        out
    }
}

/// Renders a document with the given template configuration.
///
/// Sections with no content are skipped entirely.
pub fn render(document: &ResumeDocument, config: &TemplateConfig) -> RenderedResume {
    let mut blocks = Vec::new();
    render_header(document, config.base, &mut blocks);

    for section in &config.section_order {
        if *section == SectionKey::PersonalInfo || document.section_len(*section) == 0 {
            continue;
        }
        let heading = if config.uppercase_headings {
            section.title().to_uppercase()
        } else {
            section.title().to_string()
        };
        blocks.push(Block::Spacer);
        blocks.push(Block::Heading(heading));
        render_section(document, *section, config.base, &mut blocks);
    }

    let (r, g, b) = config.accent_rgb();
    RenderedResume {
        template: config.name.clone(),
        accent: (to_byte(r), to_byte(g), to_byte(b)),
        blocks,
    }
}

fn render_header(document: &ResumeDocument, kind: TemplateKind, blocks: &mut Vec<Block>) {
    let info = &document.personal_info;
    if let Some(name) = info.value("name") {
        blocks.push(Block::Title(name.to_string()));
    }
    if let Some(title) = info.value("title") {
        blocks.push(Block::Subtitle(title.to_string()));
    }

    let contacts: Vec<&str> = ["email", "phone", "linkedin", "github"]
        .iter()
        .filter_map(|key| info.value(key))
        .collect();
    match kind {
        TemplateKind::Classic if !contacts.is_empty() => {
            blocks.push(Block::Subtitle(contacts.join(" | ")));
        }
        TemplateKind::Modern => {
            blocks.extend(contacts.iter().map(|c| Block::Subtitle(c.to_string())));
        }
        _ => {}
    }

    if let Some(summary) = info.value("summary") {
        blocks.push(Block::Spacer);
        if kind == TemplateKind::Modern {
            blocks.push(Block::Heading("Profile".to_string()));
        }
        blocks.extend(description_lines(summary).into_iter().map(Block::Line));
    }
}

fn render_section(document: &ResumeDocument, section: SectionKey, kind: TemplateKind, blocks: &mut Vec<Block>) {
    match section {
        SectionKey::PersonalInfo => {}
        SectionKey::Education => {
            for entry in &document.education {
                let degree = join_present(&[entry.value("degree"), entry.value("field_of_study")], ", ");
                let title = entry_title(kind, degree, entry.value("institution"));
                let dates = format_date_range(entry.value("start_date"), entry.value("end_date"));
                let meta = Some(join_present(
                    &[dates.as_deref(), entry.value("location"), entry.value("grade")],
                    " | ",
                ))
                .filter(|m| !m.is_empty());
                blocks.push(Block::Entry { title, meta });
                push_description(entry.value("description"), blocks);
            }
        }
        SectionKey::WorkExperience => {
            for entry in &document.work_experience {
                let title = entry_title(kind, join_present(&[entry.value("position")], ""), entry.value("company"));
                let dates = format_date_range(entry.value("start_date"), entry.value("end_date"));
                let meta = Some(join_present(&[dates.as_deref(), entry.value("location")], " | "))
                    .filter(|m| !m.is_empty());
                blocks.push(Block::Entry { title, meta });
                push_description(entry.value("description"), blocks);
            }
        }
        SectionKey::Projects => {
            for entry in &document.projects {
                let title = entry_title(kind, join_present(&[entry.value("name")], ""), entry.value("role"));
                let meta = format_date_range(entry.value("start_date"), entry.value("end_date"));
                blocks.push(Block::Entry { title, meta });
                if let Some(tech) = entry.value("technologies") {
                    blocks.push(Block::Line(format!("Technologies: {tech}")));
                }
                if let Some(link) = entry.value("link") {
                    blocks.push(Block::Line(link.to_string()));
                }
                push_description(entry.value("description"), blocks);
            }
        }
        SectionKey::Achievements => {
            for entry in &document.achievements {
                let title = join_present(&[entry.value("title")], "");
                let meta = entry.value("date").map(format_month);
                blocks.push(Block::Entry { title, meta });
                push_description(entry.value("description"), blocks);
            }
        }
        SectionKey::Certifications => {
            for entry in &document.certifications {
                let title = entry_title(kind, join_present(&[entry.value("name")], ""), entry.value("issuer"));
                let meta = match (entry.value("issue_date"), entry.value("expiration_date")) {
                    (Some(issued), Some(expires)) => Some(format!(
                        "Issued {} | Expires {}",
                        format_month(issued),
                        format_month(expires)
                    )),
                    (Some(issued), None) => Some(format!("Issued {}", format_month(issued))),
                    (None, Some(expires)) => Some(format!("Expires {}", format_month(expires))),
                    (None, None) => None,
                };
                blocks.push(Block::Entry { title, meta });
                if let Some(id) = entry.value("credential_id") {
                    blocks.push(Block::Line(format!("Credential ID: {id}")));
                }
                if let Some(url) = entry.value("credential_url") {
                    blocks.push(Block::Line(url.to_string()));
                }
            }
        }
        SectionKey::Skills | SectionKey::Hobbies => {
            let items = if section == SectionKey::Skills {
                &document.skills
            } else {
                &document.hobbies
            };
            match kind {
                TemplateKind::Classic => blocks.extend(items.iter().cloned().map(Block::Bullet)),
                TemplateKind::Modern => blocks.push(Block::Line(items.join(" · "))),
            }
        }
    }
}

fn to_byte(channel: f32) -> u8 {
    (channel * 255.0).round().clamp(0.0, 255.0) as u8
}

fn entry_title(kind: TemplateKind, primary: String, secondary: Option<&str>) -> String {
    match (primary.is_empty(), secondary) {
        (true, Some(s)) => s.to_string(),
        (false, Some(s)) if kind == TemplateKind::Classic => format!("{primary}, {s}"),
        (false, Some(s)) => format!("{primary} @ {s}"),
        (_, None) => primary,
    }
}

fn join_present(parts: &[Option<&str>], sep: &str) -> String {
    parts.iter().flatten().copied().collect::<Vec<_>>().join(sep)
}

fn push_description(text: Option<&str>, blocks: &mut Vec<Block>) {
    if let Some(text) = text {
        blocks.extend(description_lines(text).into_iter().map(Block::Bullet));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{PersonalInfo, WorkEntry};

    fn sample() -> ResumeDocument {
        ResumeDocument {
            personal_info: PersonalInfo {
                name: Some("Ada Lovelace".to_string()),
                title: Some("Engineer".to_string()),
                email: Some("ada@example.com".to_string()),
                phone: Some("555-0100".to_string()),
                ..Default::default()
            },
            work_experience: vec![WorkEntry {
                company: Some("Analytical Engines".to_string()),
                position: Some("Programmer".to_string()),
                start_date: Some("2021-03".to_string()),
                description: Some("- Wrote the first program\n- Debugged the mill".to_string()),
                ..Default::default()
            }],
            skills: vec!["Rust".to_string(), "Math".to_string()],
            ..Default::default()
        }
    }

    #[test]
    fn test_classic_layout() {
        let rendered = render(&sample(), &TemplateConfig::builtin(TemplateKind::Classic));

        assert_eq!(rendered.blocks[0], Block::Title("Ada Lovelace".to_string()));
        assert!(rendered
            .blocks
            .contains(&Block::Subtitle("ada@example.com | 555-0100".to_string())));
        assert!(rendered.blocks.contains(&Block::Heading("WORK EXPERIENCE".to_string())));
        assert!(rendered.blocks.contains(&Block::Entry {
            title: "Programmer, Analytical Engines".to_string(),
            meta: Some("Mar 2021 - Present".to_string()),
        }));
        assert!(rendered.blocks.contains(&Block::Bullet("Rust".to_string())));
    }

    #[test]
    fn test_modern_layout() {
        let rendered = render(&sample(), &TemplateConfig::builtin(TemplateKind::Modern));

        assert!(rendered.blocks.contains(&Block::Heading("Work Experience".to_string())));
        assert!(rendered.blocks.contains(&Block::Line("Rust · Math".to_string())));
        assert!(rendered.blocks.contains(&Block::Subtitle("555-0100".to_string())));
        assert_eq!(rendered.accent, (0x1f, 0x4e, 0x79));
    }

    #[test]
    fn test_empty_sections_are_skipped() {
        let text = render(&sample(), &TemplateConfig::builtin(TemplateKind::Classic)).to_plain_text();
        assert!(!text.contains("EDUCATION"));
        assert!(!text.contains("CERTIFICATIONS"));
        assert!(text.contains("- Wrote the first program"));
    }

    #[test]
    fn test_custom_order_is_respected() {
        let mut config = TemplateConfig::builtin(TemplateKind::Classic);
        config.section_order = vec![SectionKey::Skills, SectionKey::WorkExperience];

        let rendered = render(&sample(), &config);
        let headings: Vec<_> = rendered
            .blocks
            .iter()
            .filter_map(|b| match b {
                Block::Heading(h) => Some(h.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(headings, vec!["SKILLS", "WORK EXPERIENCE"]);
    }

    #[test]
    fn test_education_meta_lists_location_and_grade() {
        let doc = ResumeDocument {
            education: vec![crate::domain::models::EducationEntry {
                institution: Some("MIT".to_string()),
                degree: Some("BSc".to_string()),
                location: Some("Cambridge".to_string()),
                grade: Some("3.9".to_string()),
                start_date: Some("2016-09".to_string()),
                end_date: Some("2020-06".to_string()),
                ..Default::default()
            }],
            ..Default::default()
        };
        let rendered = render(&doc, &TemplateConfig::builtin(TemplateKind::Classic));

        assert!(rendered.blocks.contains(&Block::Entry {
            title: "BSc, MIT".to_string(),
            meta: Some("Sep 2016 - Jun 2020 | Cambridge | 3.9".to_string()),
        }));
    }

    #[test]
    fn test_empty_document_renders_nothing() {
        let rendered = render(&ResumeDocument::default(), &TemplateConfig::builtin(TemplateKind::Modern));
        assert!(rendered.blocks.is_empty());
    }

    #[test]
    fn test_bad_accent_falls_back_to_black() {
        let mut config = TemplateConfig::builtin(TemplateKind::Modern);
        config.accent = "teal".to_string();
        assert_eq!(config.accent_rgb(), (0.0, 0.0, 0.0));
    }
}
