use serde::{Deserialize, Serialize};

use crate::validation::{FieldErrors, Validate, require};

use super::{Contact, EntityKind, Record, RecordId, any_field_contains};

/// A person or organisation that owns tracked assets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Owner {
    pub id: RecordId,
    pub name: String,
    #[serde(flatten)]
    pub contact: Contact,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OwnerDraft {
    pub name: String,
    #[serde(flatten)]
    pub contact: Contact,
}

impl Validate for OwnerDraft {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        require(&mut errors, "name", "Name", &self.name);
        require(&mut errors, "email", "Email", &self.contact.email);
        errors.into_result()
    }
}

impl Record for Owner {
    type Draft = OwnerDraft;

    const KIND: EntityKind = EntityKind::Owners;

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn matches(&self, needle: &str) -> bool {
        let [email, phone, address] = self.contact.fields();
        any_field_contains([self.name.as_str(), email, phone, address], needle)
    }

    fn from_draft(id: RecordId, draft: OwnerDraft) -> Self {
        Self {
            id,
            name: draft.name.trim().to_string(),
            contact: draft.contact,
        }
    }

    fn columns() -> &'static [&'static str] {
        &["ID", "Name", "Email", "Phone", "Address"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone(),
            self.contact.email.clone(),
            self.contact.phone.clone(),
            self.contact.address.clone(),
        ]
    }
}
