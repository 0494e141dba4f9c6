use serde::{Deserialize, Serialize};

use crate::validation::{FieldErrors, Validate, require};

use super::{EntityKind, Record, RecordId, any_field_contains, optional_cell};

/// A tracked piece of equipment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub id: RecordId,
    pub name: String,
    pub serial_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<RecordId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supplier_id: Option<RecordId>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AssetDraft {
    pub name: String,
    pub serial_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<RecordId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supplier_id: Option<RecordId>,
}

impl Validate for AssetDraft {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        require(&mut errors, "name", "Name", &self.name);
        require(&mut errors, "serialNumber", "Serial number", &self.serial_number);
        errors.into_result()
    }
}

impl Record for Asset {
    type Draft = AssetDraft;

    const KIND: EntityKind = EntityKind::Assets;

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn matches(&self, needle: &str) -> bool {
        any_field_contains(
            [
                self.name.as_str(),
                self.serial_number.as_str(),
                self.category.as_deref().unwrap_or(""),
            ],
            needle,
        )
    }

    fn from_draft(id: RecordId, draft: AssetDraft) -> Self {
        Self {
            id,
            name: draft.name.trim().to_string(),
            serial_number: draft.serial_number.trim().to_string(),
            category: draft.category,
            owner_id: draft.owner_id,
            supplier_id: draft.supplier_id,
        }
    }

    fn columns() -> &'static [&'static str] {
        &["ID", "Name", "Serial", "Category", "Owner"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone(),
            self.serial_number.clone(),
            optional_cell(&self.category),
            self.owner_id
                .as_ref()
                .map(RecordId::to_string)
                .unwrap_or_else(|| "-".to_string()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_serial_number() {
        let asset = Asset::from_draft(
            RecordId::from(3),
            AssetDraft {
                name: "Laptop".to_string(),
                serial_number: "SN-88XQ".to_string(),
                ..Default::default()
            },
        );
        assert!(asset.matches("88xq"));
        assert!(asset.matches("lap"));
        assert!(!asset.matches("printer"));
    }
}
