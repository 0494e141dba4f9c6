use serde::{Deserialize, Serialize};

use crate::validation::{FieldErrors, Validate, require};

use super::{EntityKind, Record, RecordId, any_field_contains, optional_cell};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: RecordId,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department_id: Option<RecordId>,
}

impl Employee {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EmployeeDraft {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department_id: Option<RecordId>,
}

impl Validate for EmployeeDraft {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        require(&mut errors, "firstName", "First name", &self.first_name);
        require(&mut errors, "lastName", "Last name", &self.last_name);
        require(&mut errors, "email", "Email", &self.email);
        errors.into_result()
    }
}

impl Record for Employee {
    type Draft = EmployeeDraft;

    const KIND: EntityKind = EntityKind::Employees;

    fn id(&self) -> &RecordId {
        &self.id
    }

    // "ann lee" must match on the joined name, not just on either half
    fn matches(&self, needle: &str) -> bool {
        any_field_contains([self.full_name().as_str(), self.email.as_str()], needle)
    }

    fn from_draft(id: RecordId, draft: EmployeeDraft) -> Self {
        Self {
            id,
            first_name: draft.first_name.trim().to_string(),
            last_name: draft.last_name.trim().to_string(),
            email: draft.email.trim().to_string(),
            phone: draft.phone,
            position: draft.position,
            department_id: draft.department_id,
        }
    }

    fn columns() -> &'static [&'static str] {
        &["ID", "Name", "Email", "Position", "Department"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.full_name(),
            self.email.clone(),
            optional_cell(&self.position),
            self.department_id
                .as_ref()
                .map(RecordId::to_string)
                .unwrap_or_else(|| "-".to_string()),
        ]
    }
}
