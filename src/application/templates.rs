//! Custom template configurations managed from the admin screen.

use crate::domain::{TemplateConfig, TemplateError, TemplateKind};
use crate::infrastructure::{load_json_or_default, save_json, KeyValueStore, CUSTOM_TEMPLATES_KEY};
use std::collections::HashSet;
use std::rc::Rc;

pub struct TemplateLibrary {
    storage: Rc<dyn KeyValueStore>,
}

impl TemplateLibrary {
    pub fn new(storage: Rc<dyn KeyValueStore>) -> Self {
        Self { storage }
    }

    pub fn custom(&self) -> Vec<TemplateConfig> {
        load_json_or_default(self.storage.as_ref(), CUSTOM_TEMPLATES_KEY)
    }

    /// Built-in templates followed by custom ones.
    pub fn all(&self) -> Vec<TemplateConfig> {
        let mut all = vec![
            TemplateConfig::builtin(TemplateKind::Classic),
            TemplateConfig::builtin(TemplateKind::Modern),
        ];
        all.extend(self.custom());
        all
    }

    /// Adds a template or replaces the custom template with the same name.
    pub fn save(&self, config: TemplateConfig) -> Result<(), TemplateError> {
        let name = config.name.trim();
        if name.is_empty() {
            return Err(TemplateError::EmptyName);
        }
        if [TemplateKind::Classic, TemplateKind::Modern]
            .iter()
            .any(|k| k.name().eq_ignore_ascii_case(name))
        {
            return Err(TemplateError::Reserved(name.to_string()));
        }
        let mut seen = HashSet::new();
        if let Some(dup) = config.section_order.iter().find(|s| !seen.insert(**s)) {
            return Err(TemplateError::DuplicateSection(*dup));
        }

        let config = TemplateConfig {
            name: name.to_string(),
            ..config
        };
        let mut custom = self.custom();
        match custom.iter_mut().find(|c| c.name == config.name) {
            Some(existing) => *existing = config,
            None => custom.push(config),
        }
        save_json(self.storage.as_ref(), CUSTOM_TEMPLATES_KEY, &custom)?;
        Ok(())
    }

    pub fn delete(&self, name: &str) -> Result<bool, TemplateError> {
        let mut custom = self.custom();
        let before = custom.len();
        custom.retain(|c| c.name != name);
        if custom.len() == before {
            return Ok(false);
        }
        save_json(self.storage.as_ref(), CUSTOM_TEMPLATES_KEY, &custom)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SectionKey;
    use crate::infrastructure::MemoryKeyValueStore;

    fn library() -> TemplateLibrary {
        TemplateLibrary::new(Rc::new(MemoryKeyValueStore::new()))
    }

    fn custom(name: &str) -> TemplateConfig {
        TemplateConfig {
            name: name.to_string(),
            ..TemplateConfig::builtin(TemplateKind::Modern)
        }
    }

    #[test]
    fn test_builtins_always_listed() {
        let lib = library();
        let names: Vec<_> = lib.all().into_iter().map(|t| t.name).collect();
        assert_eq!(names, vec!["Classic", "Modern"]);
    }

    #[test]
    fn test_save_replaces_by_name() {
        let lib = library();
        lib.save(custom("Compact")).unwrap();

        let mut updated = custom("Compact");
        updated.accent = "#aa0000".to_string();
        lib.save(updated).unwrap();

        let customs = lib.custom();
        assert_eq!(customs.len(), 1);
        assert_eq!(customs[0].accent, "#aa0000");
        assert_eq!(lib.all().len(), 3);
    }

    #[test]
    fn test_rejects_invalid_configs() {
        let lib = library();
        assert!(matches!(lib.save(custom("  ")), Err(TemplateError::EmptyName)));
        assert!(matches!(lib.save(custom("classic")), Err(TemplateError::Reserved(_))));

        let mut dup = custom("Dup");
        dup.section_order = vec![SectionKey::Skills, SectionKey::Skills];
        assert!(matches!(
            lib.save(dup),
            Err(TemplateError::DuplicateSection(SectionKey::Skills))
        ));
    }

    #[test]
    fn test_delete() {
        let lib = library();
        lib.save(custom("Compact")).unwrap();
        assert!(lib.delete("Compact").unwrap());
        assert!(!lib.delete("Compact").unwrap());
        assert!(lib.custom().is_empty());
    }
}
