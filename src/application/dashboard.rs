//! Saved resumes shown on the dashboard.

use crate::domain::{ResumeDocument, StorageError};
use crate::infrastructure::{load_json_or_default, save_json, KeyValueStore, SAVED_RESUMES_KEY};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedResume {
    pub id: u64,
    pub owner: String,
    pub title: String,
    /// Name of the template active when saved
    #[serde(default)]
    pub template: String,
    pub saved_at: DateTime<Utc>,
    pub document: ResumeDocument,
}

pub struct ResumeLibrary {
    storage: Rc<dyn KeyValueStore>,
}

impl ResumeLibrary {
    pub fn new(storage: Rc<dyn KeyValueStore>) -> Self {
        Self { storage }
    }

    fn all(&self) -> Vec<SavedResume> {
        load_json_or_default(self.storage.as_ref(), SAVED_RESUMES_KEY)
    }

    /// Stores a snapshot of `document` under a new id.
    pub fn save_current(
        &self,
        owner: &str,
        title: &str,
        template: &str,
        document: &ResumeDocument,
    ) -> Result<SavedResume, StorageError> {
        let mut all = self.all();
        let id = all.iter().map(|r| r.id).max().map_or(1, |max| max + 1);
        let title = match title.trim() {
            "" => format!("Resume {id}"),
            t => t.to_string(),
        };

        let saved = SavedResume {
            id,
            owner: owner.to_string(),
            title,
            template: template.to_string(),
            saved_at: Utc::now(),
            document: document.clone(),
        };
        all.push(saved.clone());
        save_json(self.storage.as_ref(), SAVED_RESUMES_KEY, &all)?;
        tracing::info!(id, owner, "saved resume");
        Ok(saved)
    }

    /// Resumes owned by `owner`, newest first.
    pub fn list(&self, owner: &str) -> Vec<SavedResume> {
        let mut mine: Vec<_> = self.all().into_iter().filter(|r| r.owner == owner).collect();
        mine.sort_by(|a, b| b.saved_at.cmp(&a.saved_at).then(b.id.cmp(&a.id)));
        mine
    }

    pub fn load(&self, id: u64) -> Option<SavedResume> {
        self.all().into_iter().find(|r| r.id == id)
    }

    pub fn delete(&self, id: u64) -> Result<bool, StorageError> {
        let mut all = self.all();
        let before = all.len();
        all.retain(|r| r.id != id);
        if all.len() == before {
            return Ok(false);
        }
        save_json(self.storage.as_ref(), SAVED_RESUMES_KEY, &all)?;
        Ok(true)
    }
}
