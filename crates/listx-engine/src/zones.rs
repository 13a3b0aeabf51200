//! Zone-order mutation operations.
//!
//! Every operation takes a template snapshot and returns a new one, holding
//! three invariants at all times: a field identifier never appears twice in
//! a zone; the two system fields never leave the display zone; a field gone
//! from both zones also leaves the active set.

use tracing::{debug, warn};

use listx_core::error::{Error, Result};
use listx_core::fields::{FieldDef, FieldId};
use listx_core::models::Template;
use listx_core::validation::{field_names_similar, normalize_text};

/// The two editable zones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Zone {
    Display,
    Filename,
}

impl Zone {
    fn name(self) -> &'static str {
        match self {
            Self::Display => "display",
            Self::Filename => "filename",
        }
    }
}

fn order_of(template: &Template, zone: Zone) -> &Vec<FieldId> {
    match zone {
        Zone::Display => &template.display_order,
        Zone::Filename => &template.filename_order,
    }
}

fn order_of_mut(template: &mut Template, zone: Zone) -> &mut Vec<FieldId> {
    match zone {
        Zone::Display => &mut template.display_order,
        Zone::Filename => &mut template.filename_order,
    }
}

/// Drop a field from the active set when it no longer appears in either
/// zone. System fields never sit in the active set to begin with.
fn sync_active_fields(template: &mut Template, id: &FieldId) {
    let still_in_zone =
        template.display_order.contains(id) || template.filename_order.contains(id);
    if !still_in_zone {
        template.active_fields.retain(|f| f != id);
    }
}

/// Add a field from the available pool to both zones.
///
/// Appends to each zone it is absent from, registers it active, and seeds
/// the label override from the catalog for non-custom fields.
pub fn add_field_to_zones(template: &Template, id: &FieldId) -> Result<Template> {
    let mut t = template.clone();

    let field = t
        .catalog()
        .get_field(id)
        .cloned()
        .ok_or_else(|| Error::FieldNotFound(id.to_string()))?;

    if !field.is_custom && !t.fields_labels.contains_key(id) {
        t.fields_labels.insert(id.clone(), field.label.clone());
    }

    if !t.display_order.contains(id) {
        t.display_order.push(id.clone());
    }
    if !id.is_filename() && !t.filename_order.contains(id) {
        t.filename_order.push(id.clone());
    }
    if !id.is_system() && !t.active_fields.contains(id) {
        t.active_fields.push(id.clone());
    }

    t.touch();
    Ok(t)
}

/// Remove a field from the display zone only.
///
/// System fields stay put: the call is a no-op for them.
pub fn remove_from_display(template: &Template, id: &FieldId) -> Template {
    if id.is_system() {
        debug!(op = "remove_from_display", field_id = %id, "system field, ignored");
        return template.clone();
    }

    let mut t = template.clone();
    t.display_order.retain(|f| f != id);
    sync_active_fields(&mut t, id);
    t.touch();
    t
}

/// Remove a field from the filename zone only.
pub fn remove_from_filename(template: &Template, id: &FieldId) -> Template {
    let mut t = template.clone();
    t.filename_order.retain(|f| f != id);
    sync_active_fields(&mut t, id);
    t.touch();
    t
}

/// Reposition `id` at `target`'s place within one zone (the other zone is
/// untouched). Both identifiers must already be members of that zone.
pub fn reorder_within_zone(
    template: &Template,
    zone: Zone,
    id: &FieldId,
    target: &FieldId,
) -> Result<Template> {
    let order = order_of(template, zone);
    let from = order
        .iter()
        .position(|f| f == id)
        .ok_or_else(|| Error::FieldNotFound(id.to_string()))?;
    let to = order
        .iter()
        .position(|f| f == target)
        .ok_or_else(|| Error::FieldNotFound(target.to_string()))?;

    let mut t = template.clone();
    if from != to {
        let order = order_of_mut(&mut t, zone);
        let moved = order.remove(from);
        order.insert(to, moved);
        debug!(op = "reorder_within_zone", zone = zone.name(), field_id = %id, "field moved");
    }
    t.touch();
    Ok(t)
}

/// Overwrite the filename zone with a copy of the display zone (the
/// file-name system field never crosses over).
pub fn copy_display_to_filename(template: &Template) -> Template {
    let mut t = template.clone();
    t.filename_order = t
        .display_order
        .iter()
        .filter(|id| !id.is_filename())
        .cloned()
        .collect();
    t.touch();
    t
}

/// Overwrite the display zone with a copy of the filename zone, then
/// restore the system fields the filename zone cannot carry.
pub fn copy_filename_to_display(template: &Template) -> Template {
    let mut t = template.clone();
    t.display_order = t.filename_order.clone();
    t = t.normalized();
    t.touch();
    t
}

/// Copy the description system field from display into the filename zone
/// without leaving display — the only field shared between both zones'
/// editing flows. Inserts before `target` when given, else appends.
pub fn copy_description_to_filename(template: &Template, target: Option<&FieldId>) -> Template {
    let description = FieldId::new(listx_core::fields::DESCRIPTION_FIELD);
    if template.filename_order.contains(&description) {
        return template.clone();
    }

    let mut t = template.clone();
    let index = target
        .and_then(|target| t.filename_order.iter().position(|f| f == target))
        .unwrap_or(t.filename_order.len());
    t.filename_order.insert(index, description);
    t.touch();
    t
}

/// Create a user-defined text field from a label. The label must be
/// non-blank and the derived identifier unused; a near-duplicate of an
/// existing field name is allowed but logged.
pub fn add_custom_field(template: &Template, label: &str) -> Result<Template> {
    let label = normalize_text(label);
    if label.is_empty() {
        return Err(Error::InvalidInput(
            "le nom du champ ne peut pas \u{ea}tre vide".to_string(),
        ));
    }

    let field = FieldDef::custom(&label);
    if template.catalog().contains(&field.id) {
        return Err(Error::InvalidInput(format!(
            "un champ nomm\u{e9} \"{}\" existe d\u{e9}j\u{e0}",
            label
        )));
    }

    let mut t = template.clone();
    let similar = t
        .catalog()
        .all_fields()
        .iter()
        .find(|f| field_names_similar(&f.label, &label))
        .map(|f| f.label.clone());
    if let Some(similar) = similar {
        warn!(
            op = "add_custom_field",
            field_id = %field.id,
            "label close to existing field {}",
            similar
        );
    }

    t.fields_labels.insert(field.id.clone(), field.label.clone());
    t.custom_fields.push(field);
    t.touch();
    Ok(t)
}

/// Delete a user-defined field everywhere: definition, both zones, active
/// set, labels, legacy ordering.
pub fn remove_custom_field(template: &Template, id: &FieldId) -> Result<Template> {
    if !template.custom_fields.iter().any(|f| &f.id == id) {
        return Err(Error::FieldNotFound(id.to_string()));
    }

    let mut t = template.clone();
    t.custom_fields.retain(|f| &f.id != id);
    t.display_order.retain(|f| f != id);
    t.filename_order.retain(|f| f != id);
    t.active_fields.retain(|f| f != id);
    t.legacy_order.retain(|f| f != id);
    t.fields_labels.remove(id);
    t.touch();
    Ok(t)
}

/// Override a field's display label (uppercased). Custom field definitions
/// keep their label in sync.
pub fn set_field_label(template: &Template, id: &FieldId, label: &str) -> Result<Template> {
    let label = normalize_text(label);
    if label.is_empty() {
        return Err(Error::InvalidInput(
            "le libell\u{e9} ne peut pas \u{ea}tre vide".to_string(),
        ));
    }
    if !template.catalog().contains(id) {
        return Err(Error::FieldNotFound(id.to_string()));
    }

    let mut t = template.clone();
    t.fields_labels.insert(id.clone(), label.clone());
    for field in &mut t.custom_fields {
        if &field.id == id {
            field.label = label.clone();
        }
    }
    t.touch();
    Ok(t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use listx_core::fields::{DESCRIPTION_FIELD, FILENAME_FIELD};

    fn base_template() -> Template {
        let mut template = Template::new("TEST");
        template.display_order = vec![
            FieldId::new("AFFAIRE"),
            FieldId::new("NATURE"),
            FieldId::new(DESCRIPTION_FIELD),
            FieldId::new(FILENAME_FIELD),
        ];
        template.filename_order = vec![FieldId::new("AFFAIRE"), FieldId::new("NATURE")];
        template.active_fields = vec![FieldId::new("AFFAIRE"), FieldId::new("NATURE")];
        template
    }

    #[test]
    fn test_add_field_to_both_zones() {
        let t = add_field_to_zones(&base_template(), &FieldId::new("LOT")).unwrap();
        assert!(t.display_order.contains(&FieldId::new("LOT")));
        assert!(t.filename_order.contains(&FieldId::new("LOT")));
        assert!(t.active_fields.contains(&FieldId::new("LOT")));
        assert_eq!(t.fields_labels.get(&FieldId::new("LOT")).unwrap(), "LOT");
    }

    #[test]
    fn test_add_field_twice_keeps_zones_duplicate_free() {
        let t = add_field_to_zones(&base_template(), &FieldId::new("LOT")).unwrap();
        let t = add_field_to_zones(&t, &FieldId::new("LOT")).unwrap();
        assert_eq!(
            t.display_order.iter().filter(|id| **id == FieldId::new("LOT")).count(),
            1
        );
        assert_eq!(
            t.filename_order.iter().filter(|id| **id == FieldId::new("LOT")).count(),
            1
        );
    }

    #[test]
    fn test_add_unknown_field_rejected() {
        let err = add_field_to_zones(&base_template(), &FieldId::new("FANTOME")).unwrap_err();
        assert!(matches!(err, Error::FieldNotFound(_)));
    }

    #[test]
    fn test_remove_from_one_zone_keeps_active() {
        let t = remove_from_filename(&base_template(), &FieldId::new("NATURE"));
        assert!(!t.filename_order.contains(&FieldId::new("NATURE")));
        assert!(t.display_order.contains(&FieldId::new("NATURE")));
        assert!(t.active_fields.contains(&FieldId::new("NATURE")));
    }

    #[test]
    fn test_remove_from_both_zones_drops_active() {
        let t = remove_from_filename(&base_template(), &FieldId::new("NATURE"));
        let t = remove_from_display(&t, &FieldId::new("NATURE"));
        assert!(!t.active_fields.contains(&FieldId::new("NATURE")));
    }

    #[test]
    fn test_remove_system_field_from_display_is_noop() {
        let base = base_template();
        let t = remove_from_display(&base, &FieldId::new(DESCRIPTION_FIELD));
        assert_eq!(t.display_order, base.display_order);
    }

    #[test]
    fn test_reorder_within_zone() {
        let t = reorder_within_zone(
            &base_template(),
            Zone::Filename,
            &FieldId::new("NATURE"),
            &FieldId::new("AFFAIRE"),
        )
        .unwrap();
        assert_eq!(
            t.filename_order,
            vec![FieldId::new("NATURE"), FieldId::new("AFFAIRE")]
        );
        // Other zone untouched.
        assert_eq!(t.display_order, base_template().display_order);
    }

    #[test]
    fn test_reorder_unknown_target_rejected() {
        let err = reorder_within_zone(
            &base_template(),
            Zone::Filename,
            &FieldId::new("NATURE"),
            &FieldId::new("LOT"),
        )
        .unwrap_err();
        assert!(matches!(err, Error::FieldNotFound(_)));
    }

    #[test]
    fn test_copy_display_to_filename_filters_filename_field() {
        let t = copy_display_to_filename(&base_template());
        assert_eq!(
            t.filename_order,
            vec![
                FieldId::new("AFFAIRE"),
                FieldId::new("NATURE"),
                FieldId::new(DESCRIPTION_FIELD),
            ]
        );
    }

    #[test]
    fn test_copy_filename_to_display_restores_system_fields() {
        let t = copy_filename_to_display(&base_template());
        assert!(t.display_order.contains(&FieldId::new(DESCRIPTION_FIELD)));
        assert!(t.display_order.contains(&FieldId::new(FILENAME_FIELD)));
        assert_eq!(t.display_order[0], FieldId::new("AFFAIRE"));
    }

    #[test]
    fn test_copy_description_to_filename_keeps_display() {
        let t = copy_description_to_filename(&base_template(), None);
        assert!(t.filename_order.contains(&FieldId::new(DESCRIPTION_FIELD)));
        assert!(t.display_order.contains(&FieldId::new(DESCRIPTION_FIELD)));
    }

    #[test]
    fn test_copy_description_at_position() {
        let t = copy_description_to_filename(&base_template(), Some(&FieldId::new("NATURE")));
        assert_eq!(
            t.filename_order,
            vec![
                FieldId::new("AFFAIRE"),
                FieldId::new(DESCRIPTION_FIELD),
                FieldId::new("NATURE"),
            ]
        );
    }

    #[test]
    fn test_copy_description_twice_is_noop() {
        let t = copy_description_to_filename(&base_template(), None);
        let again = copy_description_to_filename(&t, None);
        assert_eq!(again.filename_order, t.filename_order);
    }

    #[test]
    fn test_add_custom_field() {
        let t = add_custom_field(&base_template(), "r\u{e9}f\u{e9}rence client").unwrap();
        assert_eq!(t.custom_fields.len(), 1);
        let field = &t.custom_fields[0];
        assert!(field.id.is_custom());
        assert_eq!(field.label, "R\u{c9}F\u{c9}RENCE CLIENT");
        assert!(t.fields_labels.contains_key(&field.id));
    }

    #[test]
    fn test_add_custom_field_duplicate_rejected() {
        let t = add_custom_field(&base_template(), "REPERE").unwrap();
        let err = add_custom_field(&t, "repere").unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_add_custom_field_blank_rejected() {
        let err = add_custom_field(&base_template(), "   ").unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_remove_custom_field_purges_everywhere() {
        let t = add_custom_field(&base_template(), "REPERE").unwrap();
        let id = t.custom_fields[0].id.clone();
        let t = add_field_to_zones(&t, &id).unwrap();

        let t = remove_custom_field(&t, &id).unwrap();
        assert!(t.custom_fields.is_empty());
        assert!(!t.display_order.contains(&id));
        assert!(!t.filename_order.contains(&id));
        assert!(!t.active_fields.contains(&id));
        assert!(!t.fields_labels.contains_key(&id));
    }

    #[test]
    fn test_set_field_label_syncs_custom_def() {
        let t = add_custom_field(&base_template(), "REPERE").unwrap();
        let id = t.custom_fields[0].id.clone();
        let t = set_field_label(&t, &id, "rep\u{e8}re chantier").unwrap();
        assert_eq!(t.fields_labels.get(&id).unwrap(), "REP\u{c8}RE CHANTIER");
        assert_eq!(t.custom_fields[0].label, "REP\u{c8}RE CHANTIER");
    }
}
