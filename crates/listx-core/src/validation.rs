//! Validation for templates, fields and documents.
//!
//! Validation never throws: every check returns a [`ValidationReport`] the
//! caller can render inline, so a failed check is an ordinary value and the
//! mutation it guards is simply not applied.

use serde::Serialize;

use crate::defaults::{
    FIELD_NAME_MAX_LEN, FIELD_NAME_SIMILARITY_DISTANCE, MAX_TEMPLATE_FIELDS,
    SELECT_OPTIONS_MAX, SELECT_OPTIONS_MIN, TEMPLATE_NAME_MAX_LEN,
};
use crate::fields::{FieldDef, FieldId, FieldKind, MANDATORY_DOCUMENT_FIELDS};
use crate::models::{Document, Template};

// =============================================================================
// REPORT
// =============================================================================

/// Structured validation result: `valid` plus the accumulated messages.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<String>,
}

impl ValidationReport {
    /// Report with no findings.
    pub fn ok() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
        }
    }

    /// Report carrying a single finding.
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            valid: false,
            errors: vec![error.into()],
        }
    }

    /// Record a finding.
    pub fn push(&mut self, error: impl Into<String>) {
        self.valid = false;
        self.errors.push(error.into());
    }

    /// Fold another report's findings into this one.
    pub fn merge(&mut self, other: ValidationReport) {
        if !other.valid {
            self.valid = false;
            self.errors.extend(other.errors);
        }
    }
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self::ok()
    }
}

// =============================================================================
// PRIMITIVES
// =============================================================================

/// Normalize user text to its canonical form: trimmed, uppercased.
pub fn normalize_text(value: &str) -> String {
    value.trim().to_uppercase()
}

/// Validate a free-text value: non-blank, within `max_len` after trimming.
pub fn validate_text(value: &str, max_len: usize) -> ValidationReport {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return ValidationReport::failed("le champ ne peut pas \u{ea}tre vide");
    }
    if trimmed.chars().count() > max_len {
        return ValidationReport::failed(format!(
            "le champ ne peut pas d\u{e9}passer {} caract\u{e8}res",
            max_len
        ));
    }
    ValidationReport::ok()
}

/// Validate a select field's option list: bounded count, non-blank,
/// duplicate-free after normalization.
pub fn validate_select_options(options: &[String]) -> ValidationReport {
    let mut report = ValidationReport::ok();

    if options.len() < SELECT_OPTIONS_MIN {
        report.push(format!(
            "un champ select doit avoir au moins {} options",
            SELECT_OPTIONS_MIN
        ));
    }
    if options.len() > SELECT_OPTIONS_MAX {
        report.push(format!(
            "un champ select ne peut pas avoir plus de {} options",
            SELECT_OPTIONS_MAX
        ));
    }
    if options.iter().any(|o| o.trim().is_empty()) {
        report.push("toutes les options doivent \u{ea}tre non vides");
    }

    let mut seen = Vec::new();
    for option in options {
        let normalized = normalize_text(option);
        if seen.contains(&normalized) {
            report.push("les options ne peuvent pas contenir de doublons");
            break;
        }
        seen.push(normalized);
    }

    report
}

// =============================================================================
// FIELD / TEMPLATE / DOCUMENT
// =============================================================================

/// Validate one field definition.
pub fn validate_field(field: &FieldDef) -> ValidationReport {
    let mut report = ValidationReport::ok();
    report.merge(validate_text(&field.label, FIELD_NAME_MAX_LEN));

    if field.kind == FieldKind::Select {
        report.merge(validate_select_options(&field.options));
    }

    report
}

/// Validate a whole template: name, field count, per-field checks, zone
/// integrity, duplicate custom field names.
pub fn validate_template(template: &Template) -> ValidationReport {
    let mut report = ValidationReport::ok();

    let name_check = validate_text(&template.name, TEMPLATE_NAME_MAX_LEN);
    if !name_check.valid {
        for error in name_check.errors {
            report.push(format!("nom du template : {}", error));
        }
    }

    let user_fields: Vec<&FieldId> = template
        .display_order
        .iter()
        .chain(template.filename_order.iter())
        .filter(|id| !id.is_system())
        .collect();
    let mut distinct: Vec<&FieldId> = Vec::new();
    for id in user_fields {
        if !distinct.contains(&id) {
            distinct.push(id);
        }
    }
    if distinct.is_empty() {
        report.push("le template doit contenir au moins 1 champ");
    }
    if distinct.len() > MAX_TEMPLATE_FIELDS {
        report.push(format!(
            "le template ne peut pas contenir plus de {} champs",
            MAX_TEMPLATE_FIELDS
        ));
    }

    let catalog = template.catalog();
    for id in &distinct {
        if !catalog.contains(id) {
            report.push(format!("champ inconnu : {}", id));
        }
    }

    if template.filename_order.iter().any(|id| id.is_filename()) {
        report.push("le nom de fichier ne peut pas se contenir lui-m\u{ea}me");
    }

    let mut names = Vec::new();
    for field in &template.custom_fields {
        let field_report = validate_field(field);
        if !field_report.valid {
            for error in field_report.errors {
                report.push(format!("champ {} : {}", field.label, error));
            }
        }
        let normalized = normalize_text(&field.label);
        if names.contains(&normalized) {
            report.push(format!(
                "le nom de champ \"{}\" est utilis\u{e9} plusieurs fois",
                field.label
            ));
        }
        names.push(normalized);
    }

    report
}

/// Validate a document against a template before it enters the collection:
/// every mandatory field that is active (the category field always is) plus
/// the description must be filled, and every value key must resolve in the
/// catalog.
pub fn validate_document(document: &Document, template: &Template) -> ValidationReport {
    let mut report = ValidationReport::ok();
    let catalog = template.catalog();

    for id in MANDATORY_DOCUMENT_FIELDS {
        let id = FieldId::new(id);
        let required = template.active_fields.contains(&id)
            || id == template.category_field();
        if !required {
            continue;
        }
        let blank = document
            .field_value(&id)
            .map(|v| v.trim().is_empty())
            .unwrap_or(true);
        if blank {
            report.push(format!("champ obligatoire manquant : {}", id));
        }
    }

    if document.nom.trim().is_empty() {
        report.push("champ obligatoire manquant : description");
    }

    for (id, _) in document.values.iter() {
        if !catalog.contains(id) {
            report.push(format!("champ inconnu : {}", id));
        }
    }

    report
}

// =============================================================================
// NAME SIMILARITY
// =============================================================================

/// Whether two field names are equal or nearly so (Levenshtein distance at
/// most [`FIELD_NAME_SIMILARITY_DISTANCE`] after case folding). Used to warn
/// before creating a near-duplicate custom field.
pub fn field_names_similar(a: &str, b: &str) -> bool {
    let a = a.trim().to_lowercase();
    let b = b.trim().to_lowercase();
    if a == b {
        return true;
    }
    levenshtein(&a, &b) <= FIELD_NAME_SIMILARITY_DISTANCE
}

/// Classic dynamic-programming Levenshtein distance, rolling one row.
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut current = vec![0usize; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        current[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            current[j + 1] = (prev[j + 1] + 1)
                .min(current[j] + 1)
                .min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut current);
    }

    prev[b.len()]
}
