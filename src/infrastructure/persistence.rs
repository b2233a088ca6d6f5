use crate::domain::{ResumeDocument, StorageError};
use std::fs;

/// Imports and exports a single resume document as a standalone JSON file.
pub struct FileRepository;

impl FileRepository {
    pub fn save_resume(document: &ResumeDocument, filename: &str) -> Result<String, StorageError> {
        let json = serde_json::to_string_pretty(document)?;
        fs::write(filename, json)?;
        Ok(filename.to_string())
    }

    pub fn load_resume(filename: &str) -> Result<(ResumeDocument, String), StorageError> {
        let content = fs::read_to_string(filename)?;
        let document = serde_json::from_str::<ResumeDocument>(&content)?;
        Ok((document, filename.to_string()))
    }
}
