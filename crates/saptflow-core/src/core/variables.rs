use std::collections::HashMap;
use tracing::debug;

/// Named scalar variables published by a run for downstream consumers.
///
/// A store is created by the caller, passed to the workflow by `&mut`, and read
/// afterwards. The workflow writes each label once per run; re-assignment from later
/// runs overwrites the previous value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VariableStore {
    values: HashMap<String, f64>,
}

impl VariableStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_variable(&mut self, label: &str, value: f64) {
        if let Some(previous) = self.values.insert(label.to_string(), value) {
            debug!(label, previous, value, "Overwriting existing variable.");
        }
    }

    pub fn get_variable(&self, label: &str) -> Option<f64> {
        self.values.get(label).copied()
    }

    pub fn has_variable(&self, label: &str) -> bool {
        self.values.contains_key(label)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_and_get_variable() {
        let mut store = VariableStore::new();
        store.set_variable("DFT MONOMERA", -76.4);
        assert_eq!(store.get_variable("DFT MONOMERA"), Some(-76.4));
        assert!(store.has_variable("DFT MONOMERA"));
        assert_eq!(store.get_variable("DFT MONOMERB"), None);
    }

    #[test]
    fn set_variable_overwrites_previous_value() {
        let mut store = VariableStore::new();
        store.set_variable("Exch10", 1.0);
        store.set_variable("Exch10", 2.0);
        assert_eq!(store.get_variable("Exch10"), Some(2.0));
        assert_eq!(store.len(), 1);
    }
}
