//! Forward-navigation rules for date-bearing sections.
//!
//! Rules run over the whole section at once, not only the last edited item.

use super::errors::ValidationError;
use super::models::{DatedRecord, ResumeDocument, SectionKey};
use chrono::NaiveDate;

/// Parses a `YYYY-MM` month (or a full `YYYY-MM-DD` date).
///
/// Months resolve to their first day so they order correctly against each
/// other and against full dates.
pub fn parse_month(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(&format!("{value}-01"), "%Y-%m-%d"))
        .ok()
}

/// Validates one section of the document.
///
/// Sections without date pairs always pass.
pub fn validate_section(document: &ResumeDocument, section: SectionKey) -> Result<(), ValidationError> {
    match section {
        SectionKey::Education => check_date_order(section, &document.education),
        SectionKey::WorkExperience => check_date_order(section, &document.work_experience),
        SectionKey::Projects => check_date_order(section, &document.projects),
        SectionKey::Certifications => check_date_order(section, &document.certifications),
        SectionKey::PersonalInfo
        | SectionKey::Skills
        | SectionKey::Hobbies
        | SectionKey::Achievements => Ok(()),
    }
}

fn check_date_order<T: DatedRecord>(section: SectionKey, items: &[T]) -> Result<(), ValidationError> {
    for (i, item) in items.iter().enumerate() {
        let index = i + 1;
        let (Some(start), Some(end)) = item.date_range() else {
            continue;
        };

        let start_date = parse_month(start).ok_or_else(|| ValidationError::InvalidDate {
            section,
            index,
            value: start.to_string(),
        })?;
        let end_date = parse_month(end).ok_or_else(|| ValidationError::InvalidDate {
            section,
            index,
            value: end.to_string(),
        })?;

        if end_date < start_date {
            return Err(ValidationError::DateOrder { section, index });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{CertificationEntry, EducationEntry, ProjectEntry, WorkEntry};

    fn work(start: &str, end: &str) -> WorkEntry {
        WorkEntry {
            start_date: Some(start.to_string()),
            end_date: Some(end.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_parse_month_formats() {
        assert_eq!(parse_month("2023-01"), NaiveDate::from_ymd_opt(2023, 1, 1));
        assert_eq!(parse_month(" 2023-07-15 "), NaiveDate::from_ymd_opt(2023, 7, 15));
        assert_eq!(parse_month("2023-13"), None);
        assert_eq!(parse_month("last year"), None);
    }

    #[test]
    fn test_end_before_start_reports_one_based_index() {
        let mut doc = ResumeDocument::default();
        doc.work_experience = vec![work("2019-01", "2020-01"), work("2023-01", "2022-01")];

        let err = validate_section(&doc, SectionKey::WorkExperience).unwrap_err();
        assert_eq!(
            err,
            ValidationError::DateOrder {
                section: SectionKey::WorkExperience,
                index: 2
            }
        );
        assert!(err.to_string().contains("#2"));
    }

    #[test]
    fn test_end_after_start_passes() {
        let mut doc = ResumeDocument::default();
        doc.education = vec![EducationEntry {
            start_date: Some("2023-01".to_string()),
            end_date: Some("2024-01".to_string()),
            ..Default::default()
        }];
        assert!(validate_section(&doc, SectionKey::Education).is_ok());
    }

    #[test]
    fn test_same_month_passes() {
        let mut doc = ResumeDocument::default();
        doc.work_experience = vec![work("2023-01", "2023-01")];
        assert!(validate_section(&doc, SectionKey::WorkExperience).is_ok());
    }

    #[test]
    fn test_missing_end_date_is_skipped() {
        let mut doc = ResumeDocument::default();
        doc.projects = vec![ProjectEntry {
            start_date: Some("2023-01".to_string()),
            end_date: Some("  ".to_string()),
            ..Default::default()
        }];
        assert!(validate_section(&doc, SectionKey::Projects).is_ok());
    }

    #[test]
    fn test_certification_expiration_before_issue() {
        let mut doc = ResumeDocument::default();
        doc.certifications = vec![CertificationEntry {
            issue_date: Some("2022-06".to_string()),
            expiration_date: Some("2021-06".to_string()),
            ..Default::default()
        }];

        let err = validate_section(&doc, SectionKey::Certifications).unwrap_err();
        assert_eq!(err.section(), SectionKey::Certifications);
        assert_eq!(err.index(), 1);
    }

    #[test]
    fn test_unparsable_date_blocks() {
        let mut doc = ResumeDocument::default();
        doc.work_experience = vec![work("spring", "2022-01")];

        let err = validate_section(&doc, SectionKey::WorkExperience).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidDate { ref value, .. } if value == "spring"));
    }

    #[test]
    fn test_other_sections_always_pass() {
        let mut doc = ResumeDocument::default();
        // Invalid dates elsewhere do not affect these sections
        doc.work_experience = vec![work("2023-01", "2022-01")];

        for section in [
            SectionKey::PersonalInfo,
            SectionKey::Skills,
            SectionKey::Hobbies,
            SectionKey::Achievements,
        ] {
            assert!(validate_section(&doc, section).is_ok());
        }
        assert!(validate_section(&doc, SectionKey::WorkExperience).is_err());
    }
}
