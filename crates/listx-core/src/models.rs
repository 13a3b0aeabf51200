//! Core data models for the listx document register.
//!
//! These types are shared across the listx crates and represent the domain
//! entities: templates (two independently ordered field zones plus labels
//! and custom fields), documents (typed field values plus the two derived
//! strings), and the ordered document collection.
//!
//! All of them follow an immutable-update discipline: engine operations take
//! a snapshot and return a new snapshot, never mutate in place.

use chrono::{DateTime, Utc};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

use crate::fields::{
    FieldCatalog, FieldDef, FieldId, BUILTIN_FIELDS, CATEGORY_FIELD, SYSTEM_FIELD_IDS,
};

// =============================================================================
// NUMBERING MODE
// =============================================================================

/// The two document-numbering modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum NumberingMode {
    /// Each category owns a hundreds block: category `i`, document `k`
    /// gets `i*100 + k`.
    #[default]
    ByCategory,

    /// Flat sequential numbering across the category-grouped walk.
    Global,
}

impl fmt::Display for NumberingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ByCategory => write!(f, "by_category"),
            Self::Global => write!(f, "global"),
        }
    }
}

impl std::str::FromStr for NumberingMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "by_category" | "bycategory" => Ok(Self::ByCategory),
            "global" => Ok(Self::Global),
            _ => Err(format!("Invalid numbering mode: {}", s)),
        }
    }
}

// =============================================================================
// TEMPLATE
// =============================================================================

fn default_now() -> DateTime<Utc> {
    Utc::now()
}

/// A template: which fields a record carries, in which order they appear in
/// exports (`display_order`) and in generated file names (`filename_order`),
/// plus label overrides and user-created fields.
///
/// Wire shape matches the legacy persistence format: `fieldsOrderDisplay`,
/// `fieldsOrderFilename`, `fieldsOrder` (legacy single ordering, written on
/// save and honored on load when the split orders are absent),
/// `activeFields`, `fieldsLabels`, `customFields`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    pub name: String,

    /// Data-entry / export column order. Always contains both system fields.
    #[serde(rename = "fieldsOrderDisplay", default)]
    pub display_order: Vec<FieldId>,

    /// File-name token order. Never contains the file-name system field.
    #[serde(rename = "fieldsOrderFilename", default)]
    pub filename_order: Vec<FieldId>,

    /// Legacy alias of the display order, kept for backward compatibility.
    #[serde(rename = "fieldsOrder", default, skip_serializing_if = "Vec::is_empty")]
    pub legacy_order: Vec<FieldId>,

    /// Fields currently usable on documents.
    #[serde(rename = "activeFields", default)]
    pub active_fields: Vec<FieldId>,

    /// Display label overrides, field id → label.
    #[serde(rename = "fieldsLabels", default)]
    pub fields_labels: BTreeMap<FieldId, String>,

    /// User-created fields, template-scoped.
    #[serde(rename = "customFields", default)]
    pub custom_fields: Vec<FieldDef>,

    #[serde(rename = "dateCreation", default = "default_now")]
    pub created_at: DateTime<Utc>,

    #[serde(rename = "dateModification", default = "default_now")]
    pub modified_at: DateTime<Utc>,
}

impl Template {
    /// Empty template carrying only the system fields in the display zone.
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        let mut template = Self {
            name: name.into().trim().to_uppercase(),
            display_order: Vec::new(),
            filename_order: Vec::new(),
            legacy_order: Vec::new(),
            active_fields: Vec::new(),
            fields_labels: BTreeMap::new(),
            custom_fields: Vec::new(),
            created_at: now,
            modified_at: now,
        };
        template.ensure_system_fields();
        template
    }

    /// The built-in default template: every built-in field, in catalog
    /// order, in both zones.
    pub fn default_template() -> Self {
        let ids: Vec<FieldId> = BUILTIN_FIELDS.iter().map(|f| f.id.clone()).collect();
        let mut template = Self::new("PAR D\u{c9}FAUT");
        template.display_order = ids.clone();
        template.filename_order = ids.clone();
        template.active_fields = ids;
        template.fields_labels = BUILTIN_FIELDS
            .iter()
            .map(|f| (f.id.clone(), f.label.clone()))
            .collect();
        template.ensure_system_fields();
        template.legacy_order = template.display_order.clone();
        template
    }

    /// Catalog scoped to this template's custom fields.
    pub fn catalog(&self) -> FieldCatalog<'_> {
        FieldCatalog::new(&self.custom_fields)
    }

    /// The field whose value groups documents into numbering categories.
    pub fn category_field(&self) -> FieldId {
        FieldId::new(CATEGORY_FIELD)
    }

    /// Display label for a field: override first, then custom field label,
    /// then the catalog, then the id itself.
    pub fn label_for(&self, id: &FieldId) -> String {
        if let Some(label) = self.fields_labels.get(id) {
            return label.clone();
        }
        if let Some(field) = self.custom_fields.iter().find(|f| &f.id == id) {
            return field.label.clone();
        }
        self.catalog()
            .label_for(id)
            .map(|l| l.to_string())
            .unwrap_or_else(|| id.as_str().to_string())
    }

    /// Refresh the modification timestamp.
    pub fn touch(&mut self) {
        self.modified_at = Utc::now();
    }

    /// Return a cleaned snapshot upholding every template invariant:
    /// split orders backfilled from the legacy ordering, zones
    /// duplicate-free, the file-name system field kept out of the filename
    /// zone, both system fields present in the display zone, custom fields
    /// flagged, `active_fields` restricted to zone members, and the legacy
    /// alias re-synced from the display order.
    pub fn normalized(&self) -> Self {
        let mut t = self.clone();
        t.name = t.name.trim().to_uppercase();

        if t.display_order.is_empty() {
            t.display_order = t.legacy_order.clone();
        }
        if t.filename_order.is_empty() {
            t.filename_order = t.legacy_order.clone();
        }

        t.display_order = dedupe(&t.display_order);
        t.filename_order = dedupe(&t.filename_order)
            .into_iter()
            .filter(|id| !id.is_filename())
            .collect();

        t.ensure_system_fields();

        for field in &mut t.custom_fields {
            field.is_custom = true;
        }

        let in_zone = |id: &FieldId| {
            t.display_order.contains(id) || t.filename_order.contains(id)
        };
        t.active_fields = dedupe(&t.active_fields)
            .into_iter()
            .filter(|id| !id.is_system() && in_zone(id))
            .collect();

        t.legacy_order = t.display_order.clone();
        t
    }

    fn ensure_system_fields(&mut self) {
        for id in SYSTEM_FIELD_IDS {
            let id = FieldId::new(id);
            if !self.display_order.contains(&id) {
                self.display_order.push(id);
            }
        }
    }
}

fn dedupe(ids: &[FieldId]) -> Vec<FieldId> {
    let mut seen = Vec::with_capacity(ids.len());
    for id in ids {
        if !seen.contains(id) {
            seen.push(id.clone());
        }
    }
    seen
}

// =============================================================================
// DOCUMENT VALUES
// =============================================================================

/// Typed map of a document's field values.
///
/// Keys are canonical [`FieldId`]s in memory; on the wire the map flattens
/// into the document object under lowercase keys, matching the legacy flat
/// format.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentValues(BTreeMap<FieldId, String>);

impl DocumentValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &FieldId) -> Option<&str> {
        self.0.get(id).map(|v| v.as_str())
    }

    pub fn set(&mut self, id: FieldId, value: impl Into<String>) {
        self.0.insert(id, value.into());
    }

    pub fn iter(&self) -> impl Iterator<Item = (&FieldId, &str)> {
        self.0.iter().map(|(k, v)| (k, v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(FieldId, String)> for DocumentValues {
    fn from_iter<I: IntoIterator<Item = (FieldId, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Serialize for DocumentValues {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (id, value) in &self.0 {
            map.serialize_entry(&id.as_value_key(), value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for DocumentValues {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ValuesVisitor;

        impl<'de> Visitor<'de> for ValuesVisitor {
            type Value = DocumentValues;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of field keys to string values")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut values = BTreeMap::new();
                while let Some((key, value)) =
                    access.next_entry::<String, serde_json::Value>()?
                {
                    // Tolerate scalar non-strings from legacy files; skip
                    // anything structured.
                    let value = match value {
                        serde_json::Value::String(s) => s,
                        serde_json::Value::Number(n) => n.to_string(),
                        serde_json::Value::Bool(b) => b.to_string(),
                        _ => continue,
                    };
                    values.insert(FieldId::new(key), value);
                }
                Ok(DocumentValues(values))
            }
        }

        deserializer.deserialize_map(ValuesVisitor)
    }
}

// =============================================================================
// DOCUMENT
// =============================================================================

/// One document record: field values, free-text description, and the two
/// derived strings.
///
/// `numero` and `nom_complet` are never edited directly. They are stale the
/// instant any structural change lands on the collection, until the
/// renumbering step runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,

    /// Field values, flattened to lowercase keys on the wire.
    #[serde(flatten)]
    pub values: DocumentValues,

    /// Free-text description (what the description system field maps to).
    #[serde(default)]
    pub nom: String,

    /// Derived document code, assigned by the numbering engine.
    #[serde(default)]
    pub numero: String,

    /// Derived file name, assigned by the filename generator.
    #[serde(rename = "nomComplet", default)]
    pub nom_complet: String,
}

impl Document {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            values: DocumentValues::new(),
            nom: String::new(),
            numero: String::new(),
            nom_complet: String::new(),
        }
    }

    /// Resolve a field against this document, including the derived and
    /// system mappings: `DESCRIPTION` → description, `NOM_FICHIER` →
    /// computed name, `NUMERO` → code.
    pub fn field_value(&self, id: &FieldId) -> Option<&str> {
        if id.is_description() {
            return Some(self.nom.as_str());
        }
        if id.is_filename() {
            return Some(self.nom_complet.as_str());
        }
        if id.as_str() == "NUMERO" {
            return Some(self.numero.as_str());
        }
        self.values.get(id)
    }

    /// The document's category: the value of the designated category field,
    /// empty when unset.
    pub fn category(&self, category_field: &FieldId) -> String {
        self.field_value(category_field)
            .unwrap_or_default()
            .trim()
            .to_uppercase()
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// DOCUMENT COLLECTION
// =============================================================================

/// Ordered sequence of documents.
///
/// Category grouping is derived, never stored: scanning the sequence records
/// each category value's first position of appearance, and that first-seen
/// order is the authoritative category ordering.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentCollection {
    documents: Vec<Document>,
}

impl DocumentCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_documents(documents: Vec<Document>) -> Self {
        Self { documents }
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn into_documents(self) -> Vec<Document> {
        self.documents
    }

    pub fn iter(&self) -> impl Iterator<Item = &Document> {
        self.documents.iter()
    }

    pub fn get(&self, id: Uuid) -> Option<&Document> {
        self.documents.iter().find(|d| d.id == id)
    }

    pub fn position(&self, id: Uuid) -> Option<usize> {
        self.documents.iter().position(|d| d.id == id)
    }

    /// Distinct category values in first-seen order.
    pub fn category_order(&self, category_field: &FieldId) -> Vec<String> {
        let mut seen = Vec::new();
        for doc in &self.documents {
            let category = doc.category(category_field);
            if !seen.contains(&category) {
                seen.push(category);
            }
        }
        seen
    }

    /// Documents of one category, in sequence order.
    pub fn documents_in_category<'a>(
        &'a self,
        category_field: &FieldId,
        category: &str,
    ) -> Vec<&'a Document> {
        self.documents
            .iter()
            .filter(|d| d.category(category_field) == category)
            .collect()
    }
}

impl FromIterator<Document> for DocumentCollection {
    fn from_iter<I: IntoIterator<Item = Document>>(iter: I) -> Self {
        Self {
            documents: iter.into_iter().collect(),
        }
    }
}

// =============================================================================
// PROJECT SNAPSHOT
// =============================================================================

/// The consistency snapshot handed to the persistence collaborator: a frozen
/// template, the document collection, and the numbering mode that produced
/// the current codes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,

    pub nom: String,

    #[serde(rename = "templateSnapshot")]
    pub template: Template,

    #[serde(default)]
    pub documents: DocumentCollection,

    #[serde(rename = "numberingMode", default)]
    pub numbering_mode: NumberingMode,

    #[serde(rename = "dateCreation", default = "default_now")]
    pub created_at: DateTime<Utc>,

    #[serde(rename = "dateModification", default = "default_now")]
    pub modified_at: DateTime<Utc>,
}

impl Project {
    /// New empty project frozen onto a template snapshot.
    pub fn from_template(nom: impl Into<String>, template: &Template) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            nom: nom.into(),
            template: template.normalized(),
            documents: DocumentCollection::new(),
            numbering_mode: NumberingMode::default(),
            created_at: now,
            modified_at: now,
        }
    }

    pub fn touch(&mut self) {
        self.modified_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::{DESCRIPTION_FIELD, FILENAME_FIELD};
    use serde_json::json;
    use std::str::FromStr;

    fn doc(values: &[(&str, &str)], nom: &str) -> Document {
        let mut d = Document::new();
        for (k, v) in values {
            d.values.set(FieldId::new(k), v.to_string());
        }
        d.nom = nom.to_string();
        d
    }

    #[test]
    fn test_numbering_mode_roundtrip() {
        for mode in [NumberingMode::ByCategory, NumberingMode::Global] {
            assert_eq!(NumberingMode::from_str(&mode.to_string()).unwrap(), mode);
        }
        assert_eq!(NumberingMode::default(), NumberingMode::ByCategory);
    }

    #[test]
    fn test_template_new_carries_system_fields() {
        let template = Template::new("chantier");
        assert_eq!(template.name, "CHANTIER");
        assert!(template.display_order.contains(&FieldId::new(DESCRIPTION_FIELD)));
        assert!(template.display_order.contains(&FieldId::new(FILENAME_FIELD)));
        assert!(template.filename_order.is_empty());
    }

    #[test]
    fn test_default_template_zones() {
        let template = Template::default_template();
        assert_eq!(template.active_fields.len(), 11);
        assert!(template.filename_order.contains(&FieldId::new("AFFAIRE")));
        assert!(!template.filename_order.contains(&FieldId::new(FILENAME_FIELD)));
        assert_eq!(template.label_for(&FieldId::new("NUMERO")), "NUM\u{c9}RO DOC");
    }

    #[test]
    fn test_template_legacy_order_backfill() {
        let json = json!({
            "name": "ancien",
            "fieldsOrder": ["AFFAIRE", "PHASE", "NATURE"],
            "activeFields": ["AFFAIRE", "PHASE", "NATURE"],
            "fieldsLabels": {"AFFAIRE": "AFFAIRE"}
        });
        let template: Template = serde_json::from_value(json).unwrap();
        let template = template.normalized();

        assert_eq!(template.name, "ANCIEN");
        assert_eq!(
            template.display_order,
            vec![
                FieldId::new("AFFAIRE"),
                FieldId::new("PHASE"),
                FieldId::new("NATURE"),
                FieldId::new(DESCRIPTION_FIELD),
                FieldId::new(FILENAME_FIELD),
            ]
        );
        assert_eq!(
            template.filename_order,
            vec![
                FieldId::new("AFFAIRE"),
                FieldId::new("PHASE"),
                FieldId::new("NATURE"),
            ]
        );
        assert_eq!(template.legacy_order, template.display_order);
    }

    #[test]
    fn test_template_normalized_drops_zoneless_active_fields() {
        let mut template = Template::default_template();
        template.active_fields.push(FieldId::new("CUSTOM_FANTOME"));
        let template = template.normalized();
        assert!(!template.active_fields.contains(&FieldId::new("CUSTOM_FANTOME")));
    }

    #[test]
    fn test_template_normalized_dedupes_zones() {
        let mut template = Template::default_template();
        template.display_order.push(FieldId::new("AFFAIRE"));
        template.filename_order.push(FieldId::new(FILENAME_FIELD));
        let template = template.normalized();

        let affaires = template
            .display_order
            .iter()
            .filter(|id| **id == FieldId::new("AFFAIRE"))
            .count();
        assert_eq!(affaires, 1);
        assert!(!template.filename_order.iter().any(|id| id.is_filename()));
    }

    #[test]
    fn test_document_flat_wire_shape() {
        let mut d = doc(&[("AFFAIRE", "X12"), ("PHASE", "PRO")], "BILAN");
        d.numero = "101".into();
        d.nom_complet = "X12 - PRO".into();

        let value = serde_json::to_value(&d).unwrap();
        assert_eq!(value["affaire"], "X12");
        assert_eq!(value["phase"], "PRO");
        assert_eq!(value["nom"], "BILAN");
        assert_eq!(value["numero"], "101");
        assert_eq!(value["nomComplet"], "X12 - PRO");

        let back: Document = serde_json::from_value(value).unwrap();
        assert_eq!(back, d);
    }

    #[test]
    fn test_document_field_value_system_mappings() {
        let mut d = doc(&[("AFFAIRE", "X12")], "BILAN");
        d.numero = "203".into();
        d.nom_complet = "X12 - BILAN".into();

        assert_eq!(d.field_value(&FieldId::new(DESCRIPTION_FIELD)), Some("BILAN"));
        assert_eq!(d.field_value(&FieldId::new(FILENAME_FIELD)), Some("X12 - BILAN"));
        assert_eq!(d.field_value(&FieldId::new("NUMERO")), Some("203"));
        assert_eq!(d.field_value(&FieldId::new("AFFAIRE")), Some("X12"));
        assert_eq!(d.field_value(&FieldId::new("LOT")), None);
    }

    #[test]
    fn test_collection_category_order_first_seen() {
        let category = FieldId::new(CATEGORY_FIELD);
        let collection = DocumentCollection::from_documents(vec![
            doc(&[("NATURE", "NOT")], "A"),
            doc(&[("NATURE", "NDC")], "B"),
            doc(&[("NATURE", "NOT")], "C"),
            doc(&[("NATURE", "PLN")], "D"),
        ]);

        assert_eq!(collection.category_order(&category), vec!["NOT", "NDC", "PLN"]);
        assert_eq!(
            collection.documents_in_category(&category, "NOT").len(),
            2
        );
    }

    #[test]
    fn test_project_snapshot_roundtrip() {
        let project = Project::from_template("TOUR A", &Template::default_template());
        let json = serde_json::to_string(&project).unwrap();
        let back: Project = serde_json::from_str(&json).unwrap();
        assert_eq!(back, project);
    }
}
