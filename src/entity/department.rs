use serde::{Deserialize, Serialize};

use crate::validation::{FieldErrors, Validate, require};

use super::{EntityKind, Record, RecordId, any_field_contains, optional_cell};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Department {
    pub id: RecordId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DepartmentDraft {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Validate for DepartmentDraft {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        require(&mut errors, "name", "Name", &self.name);
        errors.into_result()
    }
}

impl Record for Department {
    type Draft = DepartmentDraft;

    const KIND: EntityKind = EntityKind::Departments;

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn matches(&self, needle: &str) -> bool {
        any_field_contains(
            [self.name.as_str(), self.description.as_deref().unwrap_or("")],
            needle,
        )
    }

    fn from_draft(id: RecordId, draft: DepartmentDraft) -> Self {
        Self {
            id,
            name: draft.name.trim().to_string(),
            description: draft.description,
        }
    }

    fn columns() -> &'static [&'static str] {
        &["ID", "Name", "Description"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone(),
            optional_cell(&self.description),
        ]
    }
}
