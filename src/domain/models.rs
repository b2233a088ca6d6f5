//! Resume document model.
//!
//! The document is a fixed set of sections. Every section is always present
//! (possibly empty) and every record field is an optional string, so a
//! partially written document on disk still loads into a complete value.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Describes one editable field of a record: its key and a display label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub key: &'static str,
    pub label: &'static str,
}

/// Uniform access to the named optional fields of a record type.
///
/// Record types stay explicit structs; this trait only lets the form
/// layer walk their fields without knowing each shape.
pub trait RecordFields: Default + Clone {
    const FIELDS: &'static [FieldSpec];

    fn field(&self, key: &str) -> Option<&Option<String>>;

    fn field_mut(&mut self, key: &str) -> Option<&mut Option<String>>;

    /// Returns the field value, treating blank strings as unset.
    fn value(&self, key: &str) -> Option<&str> {
        self.field(key)
            .and_then(|v| v.as_deref())
            .filter(|v| !v.trim().is_empty())
    }

    /// Sets a field. Blank input clears it. Returns false for unknown keys.
    fn set_value(&mut self, key: &str, value: &str) -> bool {
        match self.field_mut(key) {
            Some(slot) => {
                *slot = if value.trim().is_empty() {
                    None
                } else {
                    Some(value.to_string())
                };
                true
            }
            None => false,
        }
    }

    fn is_blank(&self) -> bool {
        Self::FIELDS.iter().all(|f| self.value(f.key).is_none())
    }
}

/// Records that carry a start/end (or issue/expiration) date pair.
pub trait DatedRecord {
    fn date_range(&self) -> (Option<&str>, Option<&str>);
}

macro_rules! record_fields {
    ($ty:ty { $($field:ident => $label:literal),+ $(,)? }) => {
        impl RecordFields for $ty {
            const FIELDS: &'static [FieldSpec] = &[
                $(FieldSpec { key: stringify!($field), label: $label }),+
            ];

            fn field(&self, key: &str) -> Option<&Option<String>> {
                match key {
                    $(stringify!($field) => Some(&self.$field),)+
                    _ => None,
                }
            }

            fn field_mut(&mut self, key: &str) -> Option<&mut Option<String>> {
                match key {
                    $(stringify!($field) => Some(&mut self.$field),)+
                    _ => None,
                }
            }
        }
    };
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersonalInfo {
    pub name: Option<String>,
    pub title: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub linkedin: Option<String>,
    pub github: Option<String>,
    pub summary: Option<String>,
}

record_fields!(PersonalInfo {
    name => "Full name",
    title => "Professional title",
    email => "Email",
    phone => "Phone",
    linkedin => "LinkedIn",
    github => "GitHub",
    summary => "Summary",
});

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EducationEntry {
    pub institution: Option<String>,
    pub degree: Option<String>,
    pub field_of_study: Option<String>,
    pub location: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    #[serde(alias = "gpa")]
    pub grade: Option<String>,
    pub description: Option<String>,
}

record_fields!(EducationEntry {
    institution => "Institution",
    degree => "Degree",
    field_of_study => "Field of study",
    location => "Location",
    start_date => "Start (YYYY-MM)",
    end_date => "End (YYYY-MM)",
    grade => "Grade",
    description => "Description",
});

impl DatedRecord for EducationEntry {
    fn date_range(&self) -> (Option<&str>, Option<&str>) {
        (self.value("start_date"), self.value("end_date"))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WorkEntry {
    pub company: Option<String>,
    #[serde(alias = "title")]
    pub position: Option<String>,
    pub location: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub description: Option<String>,
}

record_fields!(WorkEntry {
    company => "Company",
    position => "Position",
    location => "Location",
    start_date => "Start (YYYY-MM)",
    end_date => "End (YYYY-MM)",
    description => "Description",
});

impl DatedRecord for WorkEntry {
    fn date_range(&self) -> (Option<&str>, Option<&str>) {
        (self.value("start_date"), self.value("end_date"))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectEntry {
    pub name: Option<String>,
    pub role: Option<String>,
    #[serde(alias = "url")]
    pub link: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub technologies: Option<String>,
    pub description: Option<String>,
}

record_fields!(ProjectEntry {
    name => "Project name",
    role => "Role",
    link => "Link",
    start_date => "Start (YYYY-MM)",
    end_date => "End (YYYY-MM)",
    technologies => "Technologies",
    description => "Description",
});

impl DatedRecord for ProjectEntry {
    fn date_range(&self) -> (Option<&str>, Option<&str>) {
        (self.value("start_date"), self.value("end_date"))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AchievementEntry {
    #[serde(alias = "name")]
    pub title: Option<String>,
    pub date: Option<String>,
    pub description: Option<String>,
}

record_fields!(AchievementEntry {
    title => "Title",
    date => "Date (YYYY-MM)",
    description => "Description",
});

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CertificationEntry {
    pub name: Option<String>,
    #[serde(alias = "issuingBody")]
    pub issuer: Option<String>,
    pub issue_date: Option<String>,
    pub expiration_date: Option<String>,
    pub credential_id: Option<String>,
    pub credential_url: Option<String>,
}

record_fields!(CertificationEntry {
    name => "Certification",
    issuer => "Issuer",
    issue_date => "Issued (YYYY-MM)",
    expiration_date => "Expires (YYYY-MM)",
    credential_id => "Credential ID",
    credential_url => "Credential URL",
});

impl DatedRecord for CertificationEntry {
    fn date_range(&self) -> (Option<&str>, Option<&str>) {
        (self.value("issue_date"), self.value("expiration_date"))
    }
}

/// The root aggregate: the user's complete resume content.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResumeDocument {
    pub personal_info: PersonalInfo,
    pub education: Vec<EducationEntry>,
    pub work_experience: Vec<WorkEntry>,
    pub skills: Vec<String>,
    pub projects: Vec<ProjectEntry>,
    pub hobbies: Vec<String>,
    pub achievements: Vec<AchievementEntry>,
    pub certifications: Vec<CertificationEntry>,
}

/// Names one top-level field of [`ResumeDocument`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SectionKey {
    PersonalInfo,
    Education,
    WorkExperience,
    Skills,
    Projects,
    Hobbies,
    Achievements,
    Certifications,
}

impl SectionKey {
    pub const ALL: [SectionKey; 8] = [
        SectionKey::PersonalInfo,
        SectionKey::Education,
        SectionKey::WorkExperience,
        SectionKey::Skills,
        SectionKey::Projects,
        SectionKey::Hobbies,
        SectionKey::Achievements,
        SectionKey::Certifications,
    ];

    pub fn title(self) -> &'static str {
        match self {
            SectionKey::PersonalInfo => "Personal Info",
            SectionKey::Education => "Education",
            SectionKey::WorkExperience => "Work Experience",
            SectionKey::Skills => "Skills",
            SectionKey::Projects => "Projects",
            SectionKey::Hobbies => "Hobbies",
            SectionKey::Achievements => "Achievements",
            SectionKey::Certifications => "Certifications",
        }
    }

    /// Sections edited as a comma-separated text buffer.
    pub fn is_comma_list(self) -> bool {
        matches!(self, SectionKey::Skills | SectionKey::Hobbies)
    }

    /// Sections holding an ordered sequence of records.
    pub fn is_record_list(self) -> bool {
        !self.is_comma_list() && self != SectionKey::PersonalInfo
    }
}

impl fmt::Display for SectionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// A replacement value for exactly one section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionValue {
    PersonalInfo(PersonalInfo),
    Education(Vec<EducationEntry>),
    WorkExperience(Vec<WorkEntry>),
    Skills(Vec<String>),
    Projects(Vec<ProjectEntry>),
    Hobbies(Vec<String>),
    Achievements(Vec<AchievementEntry>),
    Certifications(Vec<CertificationEntry>),
}

impl SectionValue {
    pub fn key(&self) -> SectionKey {
        match self {
            SectionValue::PersonalInfo(_) => SectionKey::PersonalInfo,
            SectionValue::Education(_) => SectionKey::Education,
            SectionValue::WorkExperience(_) => SectionKey::WorkExperience,
            SectionValue::Skills(_) => SectionKey::Skills,
            SectionValue::Projects(_) => SectionKey::Projects,
            SectionValue::Hobbies(_) => SectionKey::Hobbies,
            SectionValue::Achievements(_) => SectionKey::Achievements,
            SectionValue::Certifications(_) => SectionKey::Certifications,
        }
    }

    /// Record-list view of the value, `None` for personal info and plain lists.
    pub fn records(&self) -> Option<&dyn RecordList> {
        match self {
            SectionValue::Education(v) => Some(v),
            SectionValue::WorkExperience(v) => Some(v),
            SectionValue::Projects(v) => Some(v),
            SectionValue::Achievements(v) => Some(v),
            SectionValue::Certifications(v) => Some(v),
            _ => None,
        }
    }

    pub fn records_mut(&mut self) -> Option<&mut dyn RecordList> {
        match self {
            SectionValue::Education(v) => Some(v),
            SectionValue::WorkExperience(v) => Some(v),
            SectionValue::Projects(v) => Some(v),
            SectionValue::Achievements(v) => Some(v),
            SectionValue::Certifications(v) => Some(v),
            _ => None,
        }
    }
}

/// Object-safe editing surface over a `Vec` of records.
pub trait RecordList {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn fields(&self) -> &'static [FieldSpec];

    fn value_at(&self, index: usize, key: &str) -> Option<&str>;

    fn set_value_at(&mut self, index: usize, key: &str, value: &str) -> bool;

    fn push_empty(&mut self);

    fn remove_at(&mut self, index: usize) -> bool;
}

impl<T: RecordFields> RecordList for Vec<T> {
    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn fields(&self) -> &'static [FieldSpec] {
        T::FIELDS
    }

    fn value_at(&self, index: usize, key: &str) -> Option<&str> {
        self.get(index).and_then(|r| r.value(key))
    }

    fn set_value_at(&mut self, index: usize, key: &str, value: &str) -> bool {
        self.get_mut(index)
            .map(|r| r.set_value(key, value))
            .unwrap_or(false)
    }

    fn push_empty(&mut self) {
        self.push(T::default());
    }

    fn remove_at(&mut self, index: usize) -> bool {
        if index < Vec::len(self) {
            self.remove(index);
            true
        } else {
            false
        }
    }
}

impl ResumeDocument {
    /// Returns a copy of one section.
    pub fn section(&self, key: SectionKey) -> SectionValue {
        match key {
            SectionKey::PersonalInfo => SectionValue::PersonalInfo(self.personal_info.clone()),
            SectionKey::Education => SectionValue::Education(self.education.clone()),
            SectionKey::WorkExperience => SectionValue::WorkExperience(self.work_experience.clone()),
            SectionKey::Skills => SectionValue::Skills(self.skills.clone()),
            SectionKey::Projects => SectionValue::Projects(self.projects.clone()),
            SectionKey::Hobbies => SectionValue::Hobbies(self.hobbies.clone()),
            SectionKey::Achievements => SectionValue::Achievements(self.achievements.clone()),
            SectionKey::Certifications => SectionValue::Certifications(self.certifications.clone()),
        }
    }

    /// Replaces one whole section, leaving the others untouched.
    pub fn replace_section(&mut self, value: SectionValue) {
        match value {
            SectionValue::PersonalInfo(v) => self.personal_info = v,
            SectionValue::Education(v) => self.education = v,
            SectionValue::WorkExperience(v) => self.work_experience = v,
            SectionValue::Skills(v) => self.skills = v,
            SectionValue::Projects(v) => self.projects = v,
            SectionValue::Hobbies(v) => self.hobbies = v,
            SectionValue::Achievements(v) => self.achievements = v,
            SectionValue::Certifications(v) => self.certifications = v,
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == ResumeDocument::default()
    }

    /// Number of entries in a section; personal info counts as one when any field is set.
    pub fn section_len(&self, key: SectionKey) -> usize {
        match key {
            SectionKey::PersonalInfo => usize::from(!self.personal_info.is_blank()),
            SectionKey::Education => self.education.len(),
            SectionKey::WorkExperience => self.work_experience.len(),
            SectionKey::Skills => self.skills.len(),
            SectionKey::Projects => self.projects.len(),
            SectionKey::Hobbies => self.hobbies.len(),
            SectionKey::Achievements => self.achievements.len(),
            SectionKey::Certifications => self.certifications.len(),
        }
    }
}
