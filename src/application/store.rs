//! Resume document store.
//!
//! Holds the current immutable snapshot of the user's resume and mirrors
//! every change to durable storage. Listeners registered with
//! [`DocumentStore::subscribe`] see each new snapshot.

use crate::domain::{ResumeDocument, SectionKey, SectionValue};
use crate::infrastructure::{read_json, save_json, KeyValueStore, RESUME_KEY};
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&ResumeDocument)>;

pub struct DocumentStore {
    storage: Rc<dyn KeyValueStore>,
    snapshot: Rc<ResumeDocument>,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
}

impl DocumentStore {
    /// Opens the store, restoring the last persisted document.
    ///
    /// Missing or malformed content yields an empty document; this never fails.
    pub fn open(storage: Rc<dyn KeyValueStore>) -> Self {
        let document = match read_json::<ResumeDocument>(storage.as_ref(), RESUME_KEY) {
            Ok(Some(document)) => {
                tracing::debug!("restored resume from storage");
                document
            }
            Ok(None) => ResumeDocument::default(),
            Err(e) => {
                tracing::warn!(error = %e, "stored resume unreadable, starting empty");
                ResumeDocument::default()
            }
        };

        Self {
            storage,
            snapshot: Rc::new(document),
            listeners: Vec::new(),
            next_subscription: 0,
        }
    }

    /// Returns the current snapshot.
    pub fn get(&self) -> Rc<ResumeDocument> {
        Rc::clone(&self.snapshot)
    }

    /// Replaces one whole section and persists the full document.
    ///
    /// Callers pass complete values; list sections are never merged.
    /// Skills and hobbies are normalized so they never hold blank entries.
    pub fn update(&mut self, value: SectionValue) {
        let value = match value {
            SectionValue::Skills(items) => SectionValue::Skills(normalize_list(items)),
            SectionValue::Hobbies(items) => SectionValue::Hobbies(normalize_list(items)),
            other => other,
        };
        let key = value.key();

        let mut next = (*self.snapshot).clone();
        next.replace_section(value);
        tracing::debug!(section = %key, "section updated");
        self.commit(next);
    }

    /// Replaces the whole document, e.g. when loading a saved resume.
    pub fn replace_all(&mut self, document: ResumeDocument) {
        let mut next = ResumeDocument::default();
        for key in SectionKey::ALL {
            next.replace_section(document.section(key));
        }
        next.skills = normalize_list(next.skills);
        next.hobbies = normalize_list(next.hobbies);
        self.commit(next);
    }

    /// Replaces the document with the empty default.
    pub fn reset(&mut self) {
        tracing::info!("resume reset to empty");
        self.commit(ResumeDocument::default());
    }

    /// Resets the document and removes it from durable storage.
    pub fn clear_persisted(&mut self) {
        self.snapshot = Rc::new(ResumeDocument::default());
        if let Err(e) = self.storage.remove(RESUME_KEY) {
            tracing::error!(error = %e, "failed to remove stored resume");
        }
        self.notify();
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&ResumeDocument) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }

    fn commit(&mut self, document: ResumeDocument) {
        if let Err(e) = save_json(self.storage.as_ref(), RESUME_KEY, &document) {
            // The in-memory snapshot stays authoritative for this session.
            tracing::error!(error = %e, "failed to persist resume");
        }
        self.snapshot = Rc::new(document);
        self.notify();
    }

    fn notify(&mut self) {
        let snapshot = Rc::clone(&self.snapshot);
        for (_, listener) in &mut self.listeners {
            listener(&snapshot);
        }
    }
}

fn normalize_list(items: Vec<String>) -> Vec<String> {
    items
        .into_iter()
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect()
}
