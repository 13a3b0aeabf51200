//! Form-order merge: reconcile the two zone orderings into one form order.
//!
//! The display zone and the filename zone are edited independently; the
//! data-entry form has to show a single coherent sequence that respects the
//! relative positioning intent expressed in either zone, instead of blindly
//! concatenating them or letting two "truths" about field order diverge.

use listx_core::fields::{FieldId, MANDATORY_FORM_FIELDS};
use listx_core::models::Template;

/// Merge a template's two zone orderings into the data-entry form order.
///
/// The filename order is the base; each display-only field is inserted next
/// to its nearest display-order neighbor already present in the result
/// (after the predecessor when one exists, else before the successor, else
/// at the end). System fields are excluded; mandatory form fields are
/// appended when absent from both zones. Deterministic: display-only fields
/// are processed in display order.
pub fn merge_form_fields_order(template: &Template) -> Vec<FieldId> {
    let zone_display: Vec<FieldId> = template
        .display_order
        .iter()
        .filter(|id| !id.is_system())
        .cloned()
        .collect();
    let zone_filename: Vec<FieldId> = template
        .filename_order
        .iter()
        .filter(|id| !id.is_system())
        .cloned()
        .collect();

    // One empty zone means there is nothing to reconcile.
    if zone_display.is_empty() {
        return ensure_mandatory(zone_filename);
    }
    if zone_filename.is_empty() {
        return ensure_mandatory(zone_display);
    }

    let mut result = zone_filename;

    let display_only: Vec<FieldId> = zone_display
        .iter()
        .filter(|id| !result.contains(id))
        .cloned()
        .collect();

    for field in display_only {
        let index_in_display = zone_display
            .iter()
            .position(|id| *id == field)
            .unwrap_or(0);

        let predecessor = zone_display[..index_in_display]
            .iter()
            .rev()
            .find(|id| result.contains(id));
        let successor = zone_display[index_in_display + 1..]
            .iter()
            .find(|id| result.contains(id));

        let insert_index = if let Some(predecessor) = predecessor {
            result.iter().position(|id| id == predecessor).map(|i| i + 1)
        } else if let Some(successor) = successor {
            result.iter().position(|id| id == successor)
        } else {
            None
        };

        match insert_index {
            Some(i) => result.insert(i, field),
            None => result.push(field),
        }
    }

    ensure_mandatory(result)
}

fn ensure_mandatory(mut fields: Vec<FieldId>) -> Vec<FieldId> {
    for id in MANDATORY_FORM_FIELDS {
        let id = FieldId::new(id);
        if !fields.contains(&id) {
            fields.push(id);
        }
    }
    fields
}
