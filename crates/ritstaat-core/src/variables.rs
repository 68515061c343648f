//! System variables

use std::collections::BTreeMap;

/// Well-known system variable names
pub mod names {
    /// Hourly rate
    pub const TARIEF_PER_UUR: &str = "tarief_per_uur";
    /// Rate per driven kilometre
    pub const TARIEF_PER_KM: &str = "tarief_per_km";
    /// Flat rate per trip
    pub const VAST_TARIEF: &str = "vast_tarief";
    /// ISO week number of the reporting period
    pub const WEEKNUMMER: &str = "weeknummer";
}

/// Named numeric scalars available to every formula of a template
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct SystemVariables {
    values: BTreeMap<String, f64>,
}

impl SystemVariables {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with<S: Into<String>>(mut self, name: S, value: f64) -> Self {
        self.insert(name, value);
        self
    }

    /// Set a variable
    pub fn insert<S: Into<String>>(&mut self, name: S, value: f64) {
        self.values.insert(name.into(), value);
    }

    /// Value of a variable
    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }

    /// Check if a variable is defined
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Variable names in sorted order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Iterate over `(name, value)` in sorted order
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Number of variables
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if no variables are defined
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for SystemVariables {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        let mut vars = SystemVariables::new();
        for (name, value) in iter {
            vars.insert(name, value);
        }
        vars
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_variables() {
        let vars = SystemVariables::new()
            .with(names::TARIEF_PER_UUR, 42.5)
            .with(names::WEEKNUMMER, 12.0);

        assert_eq!(vars.get("tarief_per_uur"), Some(42.5));
        assert_eq!(vars.get("tarief_per_km"), None);
        assert!(vars.contains("weeknummer"));
        assert_eq!(
            vars.names().collect::<Vec<_>>(),
            vec!["tarief_per_uur", "weeknummer"]
        );
    }
}
