//! Inventory type definitions

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

/// Property the filter groups records by
pub const DEVICE_TYPE_FIELD: &str = "Device Type";

/// Selection value meaning "everything"
pub const WILDCARD: &str = "all";

// ============================================================================
// Records
// ============================================================================

/// Synthetic record identifier, `<unique id>.<tag>`
///
/// The tag is copied from the section marker and is unrelated to the record's
/// `Device Type` property.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    /// Join a unique id and a section tag
    pub fn new(unique: &str, tag: &str) -> Self {
        Self(format!("{unique}.{tag}"))
    }

    /// Tag taken from the section marker
    #[must_use]
    pub fn tag(&self) -> &str {
        self.0.split_once('.').map_or("", |(_, tag)| tag)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Properties of one hardware component
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InventoryRecord(BTreeMap<String, String>);

impl InventoryRecord {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a property, replacing any earlier value for the key
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Value of the `Device Type` property
    #[must_use]
    pub fn device_type(&self) -> Option<&str> {
        self.get(DEVICE_TYPE_FIELD)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Copy of the record restricted to the selected fields
    ///
    /// Selected fields the record does not have are left out.
    #[must_use]
    pub fn project(&self, fields: &Selection) -> Self {
        match fields {
            Selection::All => self.clone(),
            Selection::Only(_) => Self(
                self.0
                    .iter()
                    .filter(|(key, _)| fields.contains(key))
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect(),
            ),
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for InventoryRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Records keyed by their synthetic id
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InventorySet(BTreeMap<RecordId, InventoryRecord>);

/// Filter output; same shape as a parsed set
pub type TargetSet = InventorySet;

impl InventorySet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a record, handing it back if the id is already taken
    pub(crate) fn try_insert(
        &mut self,
        id: RecordId,
        record: InventoryRecord,
    ) -> Result<(), RecordId> {
        if self.0.contains_key(&id) {
            return Err(id);
        }
        self.0.insert(id, record);
        Ok(())
    }

    pub(crate) fn get_mut(&mut self, id: &RecordId) -> Option<&mut InventoryRecord> {
        self.0.get_mut(id)
    }

    #[must_use]
    pub fn get(&self, id: &RecordId) -> Option<&InventoryRecord> {
        self.0.get(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &RecordId> {
        self.0.keys()
    }

    pub fn records(&self) -> impl Iterator<Item = &InventoryRecord> {
        self.0.values()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&RecordId, &InventoryRecord)> {
        self.0.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(RecordId, InventoryRecord)> for InventorySet {
    fn from_iter<I: IntoIterator<Item = (RecordId, InventoryRecord)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

// ============================================================================
// Selection
// ============================================================================

/// Either every value, or an explicit set of values
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Selection {
    #[default]
    All,
    Only(BTreeSet<String>),
}

impl Selection {
    /// Build a selection from user input; `all` anywhere in the list wins
    pub fn from_values<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values: BTreeSet<String> = values.into_iter().map(Into::into).collect();
        if values.contains(WILDCARD) {
            Selection::All
        } else {
            Selection::Only(values)
        }
    }

    #[must_use]
    pub fn is_all(&self) -> bool {
        matches!(self, Selection::All)
    }

    /// Whether `value` is selected
    #[must_use]
    pub fn contains(&self, value: &str) -> bool {
        match self {
            Selection::All => true,
            Selection::Only(values) => values.contains(value),
        }
    }
}

/// Which records and which of their fields to keep
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Criteria {
    /// Device types matched against the `Device Type` property
    pub types: Selection,
    /// Field names kept in each selected record
    pub fields: Selection,
}

impl Criteria {
    pub fn new(types: Selection, fields: Selection) -> Self {
        Self { types, fields }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nic() -> InventoryRecord {
        [
            ("Device Type", "NIC"),
            ("Product Name", "Example NIC"),
            ("PCI Vendor ID", "14e4"),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_record_id_tag() {
        let id = RecordId::new("6f1c9a52-0b7e-4a63-9d55-2f1e3f1e2c11", "NIC.Slot.1-1-1");
        assert_eq!(id.tag(), "NIC.Slot.1-1-1");
        assert_eq!(
            id.as_str(),
            "6f1c9a52-0b7e-4a63-9d55-2f1e3f1e2c11.NIC.Slot.1-1-1"
        );
        assert_eq!(id.to_string(), id.as_str());
    }

    #[test]
    fn test_selection_wildcard_anywhere() {
        assert!(Selection::from_values(["NIC", "all"]).is_all());
        assert!(Selection::from_values(["all"]).is_all());
        assert!(!Selection::from_values(["NIC", "FC"]).is_all());
        assert!(!Selection::from_values(["ALL"]).is_all());
    }

    #[test]
    fn test_selection_contains() {
        let only = Selection::from_values(["NIC", "FC"]);
        assert!(only.contains("NIC"));
        assert!(!only.contains("CPU"));
        assert!(!only.contains(""));
        assert!(Selection::All.contains("anything"));
    }

    #[test]
    fn test_project_all_keeps_record() {
        assert_eq!(nic().project(&Selection::All), nic());
    }

    #[test]
    fn test_project_subset() {
        let projected = nic().project(&Selection::from_values(["Product Name", "Serial Number"]));

        assert_eq!(
            projected.iter().collect::<Vec<_>>(),
            vec![("Product Name", "Example NIC")]
        );
        assert_eq!(projected.get("Serial Number"), None);
    }

    #[test]
    fn test_record_serializes_as_object() {
        let record: InventoryRecord = [("Device Type", "FC")].into_iter().collect();
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"Device Type":"FC"}"#);
    }

    #[test]
    fn test_set_serializes_keyed_by_id() {
        let id = RecordId::new("u1", "FC.Slot.2-1");
        let set: InventorySet = [(id, nic().project(&Selection::from_values(["Device Type"])))]
            .into_iter()
            .collect();

        let json = serde_json::to_value(&set).unwrap();
        assert_eq!(json["u1.FC.Slot.2-1"]["Device Type"], "NIC");
    }
}
