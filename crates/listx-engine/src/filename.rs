//! File name generation.
//!
//! Pure functions from (document, template) to the derived strings. Callers
//! own storing the result back onto the document; the numbering engine does
//! exactly that after every structural change.

use listx_core::defaults::{DOC_NUMBER_SEPARATOR, FILENAME_SEPARATOR};
use listx_core::fields::FieldId;
use listx_core::models::{Document, Template};

/// Generate a document's file name from the filename zone ordering.
///
/// Walks `filename_order` excluding the file-name system field itself. The
/// description token is deferred to the end; blank values are skipped. When
/// nothing at all produced a token, falls back to the raw description so a
/// described document never gets an empty name. Active-field membership is
/// deliberately not consulted: the filename zone already states what the
/// name contains.
pub fn generate_filename(document: &Document, template: &Template) -> String {
    let mut has_description = false;

    let parts: Vec<&str> = template
        .filename_order
        .iter()
        .filter(|id| !id.is_filename())
        .filter_map(|id| {
            if id.is_description() {
                has_description = true;
                return None;
            }
            match document.field_value(id) {
                Some(value) if !value.trim().is_empty() => Some(value),
                _ => None,
            }
        })
        .collect();

    let prefix = parts.join(FILENAME_SEPARATOR);
    let description = if has_description { document.nom.trim() } else { "" };

    if !description.is_empty() {
        if prefix.is_empty() {
            return description.to_string();
        }
        return format!("{prefix}{FILENAME_SEPARATOR}{description}");
    }

    if !prefix.is_empty() {
        return prefix;
    }

    document.nom.clone()
}

/// Generate the compact document number: active filename-zone values joined
/// with underscores. The legacy `NOM` pseudo-field is skipped.
pub fn generate_doc_number(document: &Document, template: &Template) -> String {
    let parts: Vec<&str> = template
        .filename_order
        .iter()
        .filter(|id| id.as_str() != "NOM" && template.active_fields.contains(id))
        .filter_map(|id| match document.field_value(id) {
            Some(value) if !value.trim().is_empty() => Some(value),
            _ => None,
        })
        .collect();

    parts.join(DOC_NUMBER_SEPARATOR)
}

/// Strip path components and replace characters unsafe on common file
/// systems. Export-facing callers run generated names through this before
/// touching a disk.
pub fn sanitize_filename(filename: &str) -> String {
    let name = filename.rsplit(['/', '\\']).next().unwrap_or(filename);

    let sanitized: String = name
        .chars()
        .map(|c| match c {
            '<' | '>' | ':' | '"' | '|' | '?' | '*' | '\0' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    sanitized.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use listx_core::fields::{DESCRIPTION_FIELD, FILENAME_FIELD};

    fn template_with_filename_order(ids: &[&str]) -> Template {
        let mut template = Template::default_template();
        template.filename_order = ids.iter().map(FieldId::new).collect();
        template
    }

    fn doc(values: &[(&str, &str)], nom: &str) -> Document {
        let mut d = Document::new();
        for (k, v) in values {
            d.values.set(FieldId::new(k), v.to_string());
        }
        d.nom = nom.to_string();
        d
    }

    #[test]
    fn test_generate_filename_joins_in_zone_order() {
        let template = template_with_filename_order(&["AFFAIRE", "PHASE", DESCRIPTION_FIELD]);
        let d = doc(&[("AFFAIRE", "X"), ("PHASE", "PRO")], "BILAN");
        assert_eq!(generate_filename(&d, &template), "X - PRO - BILAN");
    }

    #[test]
    fn test_generate_filename_skips_blank_values() {
        let template = template_with_filename_order(&["AFFAIRE", "LOT", "PHASE"]);
        let d = doc(&[("AFFAIRE", "X"), ("LOT", "  "), ("PHASE", "PRO")], "BILAN");
        assert_eq!(generate_filename(&d, &template), "X - PRO");
    }

    #[test]
    fn test_generate_filename_description_deferred_to_end() {
        let template = template_with_filename_order(&[DESCRIPTION_FIELD, "AFFAIRE"]);
        let d = doc(&[("AFFAIRE", "X")], "BILAN");
        assert_eq!(generate_filename(&d, &template), "X - BILAN");
    }

    #[test]
    fn test_generate_filename_description_alone() {
        let template = template_with_filename_order(&[DESCRIPTION_FIELD]);
        let d = doc(&[], "BILAN");
        assert_eq!(generate_filename(&d, &template), "BILAN");
    }

    #[test]
    fn test_generate_filename_excludes_filename_field() {
        let template = template_with_filename_order(&[FILENAME_FIELD, "AFFAIRE"]);
        let mut d = doc(&[("AFFAIRE", "X")], "BILAN");
        d.nom_complet = "RECURSION".into();
        assert_eq!(generate_filename(&d, &template), "X");
    }

    #[test]
    fn test_generate_filename_falls_back_to_description() {
        let template = template_with_filename_order(&["AFFAIRE"]);
        let d = doc(&[], "BILAN");
        assert_eq!(generate_filename(&d, &template), "BILAN");
    }

    #[test]
    fn test_generate_filename_empty_without_description() {
        let template = template_with_filename_order(&["AFFAIRE"]);
        let d = doc(&[], "");
        assert_eq!(generate_filename(&d, &template), "");
    }

    #[test]
    fn test_generate_doc_number_active_fields_only() {
        let mut template = template_with_filename_order(&["AFFAIRE", "PHASE", "LOT"]);
        template.active_fields = vec![FieldId::new("AFFAIRE"), FieldId::new("PHASE")];
        let d = doc(&[("AFFAIRE", "X"), ("PHASE", "PRO"), ("LOT", "L1")], "BILAN");
        assert_eq!(generate_doc_number(&d, &template), "X_PRO");
    }

    #[test]
    fn test_sanitize_filename_strips_paths_and_specials() {
        assert_eq!(sanitize_filename("a/b\\X - PRO: v2?"), "X - PRO_ v2_");
        assert_eq!(sanitize_filename("  NOTE  "), "NOTE");
    }
}
