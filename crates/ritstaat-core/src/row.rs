//! Data rows and the field map that reads them

use crate::cell::RawValue;
use std::collections::BTreeMap;

/// One line of source data (e.g. one workday's time entry)
///
/// Keys are row properties such as `begin_time` or `end_km`; which column id
/// reads which property is decided by a [`FieldMap`].
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Row {
    values: BTreeMap<String, RawValue>,
}

impl Row {
    /// Create an empty row
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with<K: Into<String>, V: Into<RawValue>>(mut self, key: K, value: V) -> Self {
        self.insert(key, value);
        self
    }

    /// Set a property
    pub fn insert<K: Into<String>, V: Into<RawValue>>(&mut self, key: K, value: V) {
        self.values.insert(key.into(), value.into());
    }

    /// Raw value of a property
    pub fn get(&self, key: &str) -> Option<&RawValue> {
        self.values.get(key)
    }

    /// Numeric value of a property (missing or unreadable is 0)
    pub fn number(&self, key: &str) -> f64 {
        self.values.get(key).map_or(0.0, RawValue::as_number)
    }

    /// Iterate over all properties
    pub fn iter(&self) -> impl Iterator<Item = (&str, &RawValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of properties
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if the row has no properties
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>, V: Into<RawValue>> FromIterator<(K, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut row = Row::new();
        for (k, v) in iter {
            row.insert(k, v);
        }
        row
    }
}

/// Mapping from data-column id to the row property it reads
///
/// Passed into evaluation rather than baked in, so the engine can serve rows of
/// a different shape. Ids without an entry read the property of the same name.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct FieldMap {
    fields: BTreeMap<String, String>,
}

impl FieldMap {
    /// Map with no entries: every id reads the property of the same name
    pub fn identity() -> Self {
        Self {
            fields: BTreeMap::new(),
        }
    }

    /// Builder-style entry
    pub fn with<I: Into<String>, P: Into<String>>(mut self, id: I, property: P) -> Self {
        self.fields.insert(id.into(), property.into());
        self
    }

    /// Row property read by a column id
    pub fn property_for<'a>(&'a self, id: &'a str) -> &'a str {
        self.fields.get(id).map_or(id, String::as_str)
    }

    /// Numeric value of a data column in a row
    pub fn resolve(&self, id: &str, row: &Row) -> f64 {
        row.number(self.property_for(id))
    }

    /// Iterate over explicit entries as `(id, property)`
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// The trip-sheet schema: Dutch column ids over the row properties of a time
/// entry.
impl Default for FieldMap {
    fn default() -> Self {
        Self::identity()
            .with("ritnummer", "ritnummer")
            .with("volgnummer", "volgnummer")
            .with("chauffeur", "chauffeur")
            .with("datum", "date")
            .with("begin_tijd", "begin_time")
            .with("eind_tijd", "end_time")
            .with("pauze", "break")
            .with("correctie", "correction")
            .with("begin_km", "begin_km")
            .with("eind_km", "end_km")
            .with("overnachting", "overnight_allowance")
            .with("overige_kosten", "other_costs")
    }
}
