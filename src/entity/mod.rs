//! Record types served by the asset and HR services.
//!
//! The list controller treats records as opaque apart from their id and a
//! search predicate; everything else here exists for submission and display.

mod asset;
mod department;
mod employee;
mod owner;
mod supplier;

use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::StewardError;
use crate::validation::Validate;

pub use asset::{Asset, AssetDraft};
pub use department::{Department, DepartmentDraft};
pub use employee::{Employee, EmployeeDraft};
pub use owner::{Owner, OwnerDraft};
pub use supplier::{Supplier, SupplierDraft};

/// Stable server-assigned identifier.
///
/// Services disagree on whether ids are numbers or strings, so both are
/// accepted; the value is kept in its textual form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<u64> for RecordId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl From<&str> for RecordId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl std::str::FromStr for RecordId {
    type Err = StewardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed.contains('/') {
            return Err(StewardError::InvalidInput(format!("invalid record id '{s}'")));
        }
        Ok(Self(trimmed.to_string()))
    }
}

impl Serialize for RecordId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Number(u64),
            Text(String),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Number(n) => RecordId(n.to_string()),
            RawId::Text(s) => RecordId(s),
        })
    }
}

/// The record collections exposed by the services.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum EntityKind {
    #[value(alias = "department")]
    Departments,
    #[value(alias = "employee")]
    Employees,
    #[value(alias = "owner")]
    Owners,
    #[value(alias = "supplier")]
    Suppliers,
    #[value(alias = "asset")]
    Assets,
}

crate::named_kinds!(EntityKind, StewardError::UnknownEntity, {
    Departments => ("departments", "department"),
    Employees => ("employees", "employee"),
    Owners => ("owners", "owner"),
    Suppliers => ("suppliers", "supplier"),
    Assets => ("assets", "asset"),
});

impl EntityKind {
    /// Rows per page when no override is configured.
    pub fn default_page_size(&self) -> u32 {
        match self {
            EntityKind::Employees => 10,
            _ => 12,
        }
    }

    /// Collection path relative to the service base URL.
    pub fn path(&self) -> &'static str {
        self.as_str()
    }
}

/// A record type the list controller can page, search and mutate.
pub trait Record:
    Clone + fmt::Debug + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// Payload submitted on create and update.
    type Draft: Clone + fmt::Debug + Serialize + DeserializeOwned + Validate + Send + Sync + 'static;

    const KIND: EntityKind;

    fn id(&self) -> &RecordId;

    /// Whether the record matches an already lower-cased, trimmed needle.
    fn matches(&self, needle: &str) -> bool;

    /// Materialise a record from a draft, as a server does on create.
    fn from_draft(id: RecordId, draft: Self::Draft) -> Self;

    /// Table headings for [`Record::cells`].
    fn columns() -> &'static [&'static str];

    fn cells(&self) -> Vec<String>;
}

/// Case-insensitive substring test across several fields.
///
/// `needle` must already be lower-cased.
pub(crate) fn any_field_contains<'a>(
    fields: impl IntoIterator<Item = &'a str>,
    needle: &str,
) -> bool {
    fields
        .into_iter()
        .any(|field| field.to_lowercase().contains(needle))
}

/// Contact details shared by owners and suppliers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
}

impl Contact {
    pub(crate) fn fields(&self) -> [&str; 3] {
        [&self.email, &self.phone, &self.address]
    }
}

pub(crate) fn optional_cell(value: &Option<String>) -> String {
    value.clone().unwrap_or_else(|| "-".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_id_accepts_numbers_and_strings() {
        let numeric: RecordId = serde_json::from_str("42").unwrap();
        let textual: RecordId = serde_json::from_str("\"a-17\"").unwrap();

        assert_eq!(numeric, RecordId::from(42));
        assert_eq!(textual.as_str(), "a-17");
        assert_eq!(serde_json::to_string(&numeric).unwrap(), "\"42\"");
    }

    #[test]
    fn test_record_id_from_str_rejects_paths() {
        assert!("12".parse::<RecordId>().is_ok());
        assert!("".parse::<RecordId>().is_err());
        assert!("1/../2".parse::<RecordId>().is_err());
    }

    #[test]
    fn test_entity_kind_paths_and_parsing() {
        assert_eq!(EntityKind::Owners.path(), "owners");
        assert_eq!("supplier".parse::<EntityKind>().unwrap(), EntityKind::Suppliers);
        assert_eq!("Assets".parse::<EntityKind>().unwrap(), EntityKind::Assets);
        assert!(matches!(
            "widgets".parse::<EntityKind>(),
            Err(StewardError::UnknownEntity(_))
        ));
        assert_eq!(EntityKind::ALL.len(), 5);
    }

    #[test]
    fn test_any_field_contains_is_case_insensitive() {
        assert!(any_field_contains(["Acme Corp", ""], "acme"));
        assert!(!any_field_contains(["Beta LLC"], "acme"));
    }
}
