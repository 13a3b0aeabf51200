//! In-memory template registry.
//!
//! Owns the template list and the single current template for a running
//! session. Same snapshot discipline as the rest of the engine: operations
//! return a new store, persistence collaborators only ever see
//! already-normalized templates.

use tracing::info;

use listx_core::error::{Error, Result};
use listx_core::models::Template;

use listx_core::defaults::CLONE_NAME_SUFFIX;

/// Template registry with exactly one current template.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateStore {
    templates: Vec<Template>,
    current: usize,
}

impl TemplateStore {
    /// Store seeded with the built-in default template.
    pub fn new() -> Self {
        Self {
            templates: vec![Template::default_template()],
            current: 0,
        }
    }

    pub fn templates(&self) -> &[Template] {
        &self.templates
    }

    pub fn current_template(&self) -> &Template {
        &self.templates[self.current]
    }

    fn position(&self, name: &str) -> Option<usize> {
        let name = name.trim().to_uppercase();
        self.templates.iter().position(|t| t.name == name)
    }

    /// Add a template (normalized first). A template of the same name is
    /// replaced; either way the added template becomes current.
    pub fn add_template(&self, template: &Template) -> Self {
        let template = template.normalized();
        let mut store = self.clone();

        match store.position(&template.name) {
            Some(index) => {
                store.templates[index] = template;
                store.current = index;
            }
            None => {
                store.templates.push(template);
                store.current = store.templates.len() - 1;
            }
        }

        info!(op = "add_template", template = %store.current_template().name, "template saved");
        store
    }

    /// Make the named template current.
    pub fn apply_template(&self, name: &str) -> Result<Self> {
        let index = self
            .position(name)
            .ok_or_else(|| Error::TemplateNotFound(name.to_string()))?;

        let mut store = self.clone();
        store.current = index;
        info!(op = "apply_template", template = %store.current_template().name, "template applied");
        Ok(store)
    }

    /// Delete the named template. The last remaining template cannot be
    /// deleted; when the current one goes, the first survivor takes over.
    pub fn delete_template(&self, name: &str) -> Result<Self> {
        let index = self
            .position(name)
            .ok_or_else(|| Error::TemplateNotFound(name.to_string()))?;

        if self.templates.len() <= 1 {
            return Err(Error::InvalidInput(
                "impossible de supprimer le dernier template".to_string(),
            ));
        }

        let mut store = self.clone();
        let removed = store.templates.remove(index);
        if store.current == index {
            store.current = 0;
        } else if store.current > index {
            store.current -= 1;
        }

        info!(op = "delete_template", template = %removed.name, "template deleted");
        Ok(store)
    }

    /// Duplicate a template under a new name (default: " (COPIE)" suffix)
    /// and make the copy current.
    pub fn clone_template(&self, name: &str, new_name: Option<&str>) -> Result<Self> {
        let index = self
            .position(name)
            .ok_or_else(|| Error::TemplateNotFound(name.to_string()))?;

        let source = &self.templates[index];
        let mut copy = source.clone();
        copy.name = match new_name {
            Some(new_name) => new_name.to_string(),
            None => format!("{}{}", source.name, CLONE_NAME_SUFFIX),
        };

        Ok(self.add_template(&copy))
    }

    /// Serialize the template list for the persistence collaborator.
    pub fn export_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.templates)?)
    }

    /// Replace the whole store from a serialized template list. The list
    /// must be non-empty; its first template becomes current.
    pub fn import_json(json: &str) -> Result<Self> {
        let templates: Vec<Template> = serde_json::from_str(json)?;
        if templates.is_empty() {
            return Err(Error::InvalidInput(
                "la liste de templates est vide".to_string(),
            ));
        }

        let templates: Vec<Template> = templates.iter().map(Template::normalized).collect();
        info!(op = "import_templates", count = templates.len(), "templates imported");
        Ok(Self {
            templates,
            current: 0,
        })
    }
}

impl Default for TemplateStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_seeded_with_default() {
        let store = TemplateStore::new();
        assert_eq!(store.templates().len(), 1);
        assert_eq!(store.current_template().name, "PAR D\u{c9}FAUT");
    }

    #[test]
    fn test_add_template_becomes_current() {
        let store = TemplateStore::new();
        let mut template = Template::default_template();
        template.name = "chantier".into();

        let store = store.add_template(&template);
        assert_eq!(store.templates().len(), 2);
        assert_eq!(store.current_template().name, "CHANTIER");
    }

    #[test]
    fn test_add_template_replaces_same_name() {
        let store = TemplateStore::new();
        let mut template = Template::default_template();
        template.name = "CHANTIER".into();
        let store = store.add_template(&template);

        let mut edited = template.clone();
        edited.fields_labels
            .insert(listx_core::FieldId::new("AFFAIRE"), "DOSSIER".to_string());
        let store = store.add_template(&edited);

        assert_eq!(store.templates().len(), 2);
        assert_eq!(
            store
                .current_template()
                .fields_labels
                .get(&listx_core::FieldId::new("AFFAIRE"))
                .unwrap(),
            "DOSSIER"
        );
    }

    #[test]
    fn test_apply_template() {
        let mut template = Template::default_template();
        template.name = "CHANTIER".into();
        let store = TemplateStore::new().add_template(&template);

        let store = store.apply_template("par d\u{e9}faut").unwrap();
        assert_eq!(store.current_template().name, "PAR D\u{c9}FAUT");
    }

    #[test]
    fn test_apply_unknown_template() {
        let err = TemplateStore::new().apply_template("MYSTERE").unwrap_err();
        assert!(matches!(err, Error::TemplateNotFound(_)));
    }

    #[test]
    fn test_delete_last_template_refused() {
        let store = TemplateStore::new();
        let err = store.delete_template("PAR D\u{c9}FAUT").unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_delete_current_falls_back_to_first() {
        let mut template = Template::default_template();
        template.name = "CHANTIER".into();
        let store = TemplateStore::new().add_template(&template);
        assert_eq!(store.current_template().name, "CHANTIER");

        let store = store.delete_template("CHANTIER").unwrap();
        assert_eq!(store.templates().len(), 1);
        assert_eq!(store.current_template().name, "PAR D\u{c9}FAUT");
    }

    #[test]
    fn test_clone_template_default_suffix() {
        let store = TemplateStore::new()
            .clone_template("PAR D\u{c9}FAUT", None)
            .unwrap();
        assert_eq!(store.current_template().name, "PAR D\u{c9}FAUT (COPIE)");
        assert_eq!(store.templates().len(), 2);
    }

    #[test]
    fn test_export_import_roundtrip() {
        let mut template = Template::default_template();
        template.name = "CHANTIER".into();
        let store = TemplateStore::new().add_template(&template);

        let json = store.export_json().unwrap();
        let imported = TemplateStore::import_json(&json).unwrap();
        assert_eq!(imported.templates().len(), 2);
        assert_eq!(imported.current_template().name, "PAR D\u{c9}FAUT");
    }

    #[test]
    fn test_import_empty_list_rejected() {
        let err = TemplateStore::import_json("[]").unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }
}
