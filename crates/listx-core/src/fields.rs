//! Field identifiers and the field catalog.
//!
//! Every ordering in a template is a sequence of [`FieldId`]s. The identifier
//! is an interned-string newtype normalized to a canonical uppercase form, so
//! ad-hoc string keys can never address a value the catalog does not know
//! about: lookups against documents go through [`FieldId::as_value_key`] and
//! are validated against the [`FieldCatalog`] at the operation boundary.
//!
//! The catalog itself is pure data: built-in fields, the two synthetic system
//! fields, and whatever custom fields a template carries.

use once_cell::sync::Lazy;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

// =============================================================================
// WELL-KNOWN IDENTIFIERS
// =============================================================================

/// Identifier of the description system field (maps to a document's
/// free-text description).
pub const DESCRIPTION_FIELD: &str = "DESCRIPTION";

/// Identifier of the computed file-name system field (maps to a document's
/// `nomComplet`).
pub const FILENAME_FIELD: &str = "NOM_FICHIER";

/// System field identifiers, in default display order.
pub const SYSTEM_FIELD_IDS: &[&str] = &[DESCRIPTION_FIELD, FILENAME_FIELD];

/// The field whose value groups documents into numbering categories.
pub const CATEGORY_FIELD: &str = "NATURE";

/// Fields the data-entry form always carries even when absent from both
/// zone orderings.
pub const MANDATORY_FORM_FIELDS: &[&str] = &[CATEGORY_FIELD];

/// Fields a document must fill before it can be added to a collection.
pub const MANDATORY_DOCUMENT_FIELDS: &[&str] =
    &["AFFAIRE", "PHASE", "NATURE", "FORMAT", "INDICE"];

/// Prefix distinguishing user-created field identifiers from built-ins.
pub const CUSTOM_FIELD_PREFIX: &str = "CUSTOM_";

// =============================================================================
// FIELD IDENTIFIER
// =============================================================================

/// Interned field identifier.
///
/// Canonical form is the trimmed, uppercased input; construction normalizes,
/// so two `FieldId`s built from `"lot"` and `" LOT "` compare equal. The
/// canonical string is what templates persist; documents key their values by
/// the lowercase [`FieldId::as_value_key`] form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldId(String);

impl FieldId {
    /// Build an identifier, normalizing to canonical uppercase.
    pub fn new(raw: impl AsRef<str>) -> Self {
        Self(raw.as_ref().trim().to_uppercase())
    }

    /// Derive the identifier for a user-created field from its label:
    /// `CUSTOM_` plus the uppercased label with whitespace runs collapsed
    /// to underscores.
    pub fn custom(label: &str) -> Self {
        let body: String = label
            .trim()
            .to_uppercase()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("_");
        Self(format!("{CUSTOM_FIELD_PREFIX}{body}"))
    }

    /// Canonical (uppercase) form.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Lowercase key under which documents store this field's value.
    pub fn as_value_key(&self) -> String {
        self.0.to_lowercase()
    }

    /// Whether this is one of the two synthetic system fields.
    pub fn is_system(&self) -> bool {
        SYSTEM_FIELD_IDS.contains(&self.0.as_str())
    }

    /// Whether this is the description system field.
    pub fn is_description(&self) -> bool {
        self.0 == DESCRIPTION_FIELD
    }

    /// Whether this is the computed file-name system field.
    pub fn is_filename(&self) -> bool {
        self.0 == FILENAME_FIELD
    }

    /// Whether this is a user-created field.
    pub fn is_custom(&self) -> bool {
        self.0.starts_with(CUSTOM_FIELD_PREFIX)
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FieldId {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl AsRef<str> for FieldId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Serialize for FieldId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for FieldId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::new(raw))
    }
}

// =============================================================================
// FIELD KIND
// =============================================================================

/// Input kind of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Free text input.
    #[default]
    Text,

    /// Single-select with a fixed option list.
    Select,

    /// Numeric input.
    Number,

    /// Date input.
    Date,

    /// Derived value, never edited directly (the document code).
    #[serde(rename = "readonly")]
    ReadOnly,
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Select => write!(f, "select"),
            Self::Number => write!(f, "number"),
            Self::Date => write!(f, "date"),
            Self::ReadOnly => write!(f, "readonly"),
        }
    }
}

impl std::str::FromStr for FieldKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            // Legacy autocomplete inputs are plain text to the engine.
            "text" | "text-with-autocomplete" => Ok(Self::Text),
            "select" => Ok(Self::Select),
            "number" => Ok(Self::Number),
            "date" => Ok(Self::Date),
            "readonly" => Ok(Self::ReadOnly),
            _ => Err(format!("Invalid field kind: {}", s)),
        }
    }
}

// =============================================================================
// FIELD DEFINITION
// =============================================================================

/// Per-field metadata: identifier, display label, input kind and, for
/// selects, the option list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDef {
    pub id: FieldId,
    pub label: String,
    #[serde(rename = "type", default)]
    pub kind: FieldKind,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    #[serde(skip)]
    pub is_custom: bool,
    #[serde(skip)]
    pub is_system: bool,
}

impl FieldDef {
    /// Built-in catalog field.
    pub fn builtin(id: &str, label: &str, kind: FieldKind) -> Self {
        Self {
            id: FieldId::new(id),
            label: label.to_string(),
            kind,
            options: Vec::new(),
            is_custom: false,
            is_system: false,
        }
    }

    /// Built-in select field with its option list.
    pub fn builtin_select(id: &str, label: &str, options: &[&str]) -> Self {
        Self {
            options: options.iter().map(|o| o.to_string()).collect(),
            ..Self::builtin(id, label, FieldKind::Select)
        }
    }

    /// User-created text field; the identifier is derived from the label.
    pub fn custom(label: &str) -> Self {
        Self {
            id: FieldId::custom(label),
            label: label.trim().to_uppercase(),
            kind: FieldKind::Text,
            options: Vec::new(),
            is_custom: true,
            is_system: false,
        }
    }

    fn system(id: &str, label: &str) -> Self {
        Self {
            id: FieldId::new(id),
            label: label.to_string(),
            kind: FieldKind::Text,
            options: Vec::new(),
            is_custom: false,
            is_system: true,
        }
    }
}

// =============================================================================
// CATALOG
// =============================================================================

/// Built-in fields every template can draw from.
pub static BUILTIN_FIELDS: Lazy<Vec<FieldDef>> = Lazy::new(|| {
    vec![
        FieldDef::builtin("AFFAIRE", "AFFAIRE", FieldKind::Text),
        FieldDef::builtin_select(
            "PHASE",
            "PHASE",
            &["DIAG", "APS", "APD", "AVP", "PRO", "DCE", "ACT", "EXE"],
        ),
        FieldDef::builtin("LOT", "LOT", FieldKind::Text),
        FieldDef::builtin("EMETTEUR", "\u{c9}METTEUR", FieldKind::Text),
        FieldDef::builtin_select(
            "NATURE",
            "NATURE",
            &["NOT", "NDC", "PLN", "SYN", "SCH", "LST"],
        ),
        FieldDef::builtin_select("ETAT", "ETAT", &["ACTUEL", "PROJET"]),
        FieldDef::builtin("NUMERO", "NUM\u{c9}RO DOC", FieldKind::ReadOnly),
        FieldDef::builtin("ZONE", "ZONE", FieldKind::Text),
        FieldDef::builtin("NIVEAU", "NIVEAU", FieldKind::Text),
        FieldDef::builtin_select("FORMAT", "FORMAT", &["A0+", "A0", "A1", "A2", "A3", "A4"]),
        FieldDef::builtin("INDICE", "INDICE", FieldKind::Text),
    ]
});

/// The two synthetic system fields. Always present in the display zone,
/// never removable from it.
pub static SYSTEM_FIELDS: Lazy<Vec<FieldDef>> = Lazy::new(|| {
    vec![
        FieldDef::system(DESCRIPTION_FIELD, "DESCRIPTION DU DOCUMENT"),
        FieldDef::system(FILENAME_FIELD, "NOM FICHIER"),
    ]
});

/// Lookup facade over built-ins, one template's custom fields, and the
/// system fields. Pure data, no logic beyond lookup.
#[derive(Debug, Clone, Copy)]
pub struct FieldCatalog<'a> {
    custom: &'a [FieldDef],
}

impl<'a> FieldCatalog<'a> {
    /// Catalog scoped to a template's custom fields.
    pub fn new(custom: &'a [FieldDef]) -> Self {
        Self { custom }
    }

    /// Catalog with built-in and system fields only.
    pub fn builtin_only() -> Self {
        Self { custom: &[] }
    }

    /// Look up a field definition. Resolution order: built-in, custom,
    /// system.
    pub fn get_field(&self, id: &FieldId) -> Option<&FieldDef> {
        BUILTIN_FIELDS
            .iter()
            .find(|f| &f.id == id)
            .or_else(|| self.custom.iter().find(|f| &f.id == id))
            .or_else(|| SYSTEM_FIELDS.iter().find(|f| &f.id == id))
    }

    /// Whether the identifier resolves at all.
    pub fn contains(&self, id: &FieldId) -> bool {
        self.get_field(id).is_some()
    }

    /// Catalog label for a field, if known.
    pub fn label_for(&self, id: &FieldId) -> Option<&str> {
        self.get_field(id).map(|f| f.label.as_str())
    }

    /// Every known field, built-ins first, then customs, then the
    /// description system field (the only system field a user can place).
    pub fn all_fields(&self) -> Vec<&FieldDef> {
        let mut out: Vec<&FieldDef> = BUILTIN_FIELDS.iter().collect();
        for field in self.custom {
            if !out.iter().any(|f| f.id == field.id) {
                out.push(field);
            }
        }
        if let Some(description) = SYSTEM_FIELDS.iter().find(|f| f.id.is_description()) {
            if !out.iter().any(|f| f.id == description.id) {
                out.push(description);
            }
        }
        out
    }
}
