//! Step wizard controller.
//!
//! Drives the user through a fixed sequence of resume sections. Forward
//! navigation is gated on the active section's validation; backward
//! navigation and direct jumps are always allowed. Comma-separated sections
//! are edited through raw text buffers that reach the store only when the
//! user navigates.

use super::store::DocumentStore;
use crate::domain::{
    join_comma_list, split_comma_list, validate_section, ResumeDocument, SectionKey, SectionValue,
    ValidationError,
};

/// The wizard steps, in order. Each step edits one section.
pub const STEPS: [SectionKey; 8] = SectionKey::ALL;

/// Result of a successful forward navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextOutcome {
    /// Moved to the given step index.
    Advanced(usize),
    /// Already at the last step; the resume is complete.
    Submitted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WizardController {
    current: usize,
    skills_buffer: String,
    hobbies_buffer: String,
}

impl WizardController {
    /// Creates a controller at the first step with buffers seeded from `document`.
    pub fn new(document: &ResumeDocument) -> Self {
        let mut wizard = Self {
            current: 0,
            skills_buffer: String::new(),
            hobbies_buffer: String::new(),
        };
        wizard.sync_buffers(document);
        wizard
    }

    pub fn step_count(&self) -> usize {
        STEPS.len()
    }

    pub fn current_step(&self) -> usize {
        self.current
    }

    pub fn active_section(&self) -> SectionKey {
        STEPS[self.current]
    }

    pub fn is_last_step(&self) -> bool {
        self.current + 1 == STEPS.len()
    }

    /// Jumps to a step, clamping out-of-range indices. Never validates.
    pub fn go_to(&mut self, index: isize, store: &mut DocumentStore) {
        self.commit_buffers(store);
        let last = STEPS.len() as isize - 1;
        self.current = index.clamp(0, last) as usize;
    }

    /// Validates the active section and moves forward.
    ///
    /// On failure the step is unchanged. At the last step the call reports
    /// [`NextOutcome::Submitted`] and stays put.
    pub fn next(&mut self, store: &mut DocumentStore) -> Result<NextOutcome, ValidationError> {
        let section = self.active_section();
        if let Err(e) = validate_section(&store.get(), section) {
            tracing::debug!(%section, error = %e, "forward navigation blocked");
            return Err(e);
        }

        self.commit_buffers(store);
        if self.is_last_step() {
            tracing::info!("resume submitted");
            return Ok(NextOutcome::Submitted);
        }
        self.current += 1;
        Ok(NextOutcome::Advanced(self.current))
    }

    /// Moves back one step, floored at the first. Never validates.
    pub fn back(&mut self, store: &mut DocumentStore) {
        self.commit_buffers(store);
        self.current = self.current.saturating_sub(1);
    }

    /// Raw edit-buffer text for a comma-separated section.
    pub fn buffer(&self, section: SectionKey) -> Option<&str> {
        match section {
            SectionKey::Skills => Some(&self.skills_buffer),
            SectionKey::Hobbies => Some(&self.hobbies_buffer),
            _ => None,
        }
    }

    /// Replaces an edit buffer. Ignored for sections that have none.
    pub fn set_buffer(&mut self, section: SectionKey, text: impl Into<String>) {
        match section {
            SectionKey::Skills => self.skills_buffer = text.into(),
            SectionKey::Hobbies => self.hobbies_buffer = text.into(),
            _ => {}
        }
    }

    /// Reloads both buffers from committed document values.
    pub fn sync_buffers(&mut self, document: &ResumeDocument) {
        self.skills_buffer = join_comma_list(&document.skills);
        self.hobbies_buffer = join_comma_list(&document.hobbies);
    }

    /// Writes pending buffers to the store. Unchanged lists are not rewritten.
    pub fn commit_buffers(&mut self, store: &mut DocumentStore) {
        let document = store.get();

        let skills = split_comma_list(&self.skills_buffer);
        if skills != document.skills {
            store.update(SectionValue::Skills(skills));
        }
        let hobbies = split_comma_list(&self.hobbies_buffer);
        if hobbies != document.hobbies {
            store.update(SectionValue::Hobbies(hobbies));
        }
    }

    /// Returns to the first step and reloads buffers, e.g. after the
    /// document was replaced from outside the wizard.
    pub fn restart(&mut self, document: &ResumeDocument) {
        self.current = 0;
        self.sync_buffers(document);
    }
}
