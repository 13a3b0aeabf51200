//! Export column derivation.
//!
//! Turns a template's display zone into the ordered `(label, value)` pairs
//! the Excel/PDF renderers consume. The renderers themselves are external
//! collaborators; nothing here mutates engine state.

use serde::Serialize;

use listx_core::fields::FieldId;
use listx_core::models::{Document, Template};

/// One export column: the document key it reads, its header label, and
/// whether it is one of the two synthetic system columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportHeader {
    /// Lowercase document key the column reads (`nom` and `nomComplet` for
    /// the system columns).
    pub field: String,
    pub label: String,
    #[serde(rename = "isSystem", skip_serializing_if = "std::ops::Not::not")]
    pub is_system: bool,
}

/// Derive the export headers from the display zone: active fields plus the
/// two system columns, in display order, with label overrides applied.
pub fn export_headers(template: &Template) -> Vec<ExportHeader> {
    template
        .display_order
        .iter()
        .filter(|id| template.active_fields.contains(id) || id.is_system())
        .map(|id| {
            if id.is_description() {
                return ExportHeader {
                    field: "nom".to_string(),
                    label: "DESCRIPTION DU DOCUMENT".to_string(),
                    is_system: true,
                };
            }
            if id.is_filename() {
                return ExportHeader {
                    field: "nomComplet".to_string(),
                    label: "NOM FICHIER".to_string(),
                    is_system: true,
                };
            }
            ExportHeader {
                field: id.as_value_key(),
                label: template.label_for(id),
                is_system: false,
            }
        })
        .collect()
}

/// A document's values in display order (active fields only), with the
/// description appended last.
pub fn document_values(document: &Document, template: &Template) -> Vec<String> {
    let mut values: Vec<String> = template
        .display_order
        .iter()
        .filter(|id| template.active_fields.contains(id))
        .map(|id| {
            document
                .field_value(id)
                .unwrap_or_default()
                .to_string()
        })
        .collect();

    values.push(document.nom.clone());
    values
}
