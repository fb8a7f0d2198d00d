use std::collections::HashSet;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
#[error("Label '{0}' is already present in the result table")]
pub struct DuplicateLabelError(pub String);

/// An ordered, append-only mapping from labels to scalar results.
///
/// Entries keep their insertion order and a label can only be inserted once; existing
/// values are never overwritten.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultTable {
    entries: Vec<(String, f64)>,
    labels: HashSet<String>,
}

impl ResultTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, label: impl Into<String>, value: f64) -> Result<(), DuplicateLabelError> {
        let label = label.into();
        if !self.labels.insert(label.clone()) {
            return Err(DuplicateLabelError(label));
        }
        self.entries.push((label, value));
        Ok(())
    }

    /// Appends every entry of `other`, in order. Nothing is inserted if any label collides.
    pub fn extend(&mut self, other: ResultTable) -> Result<(), DuplicateLabelError> {
        if let Some((label, _)) = other.entries.iter().find(|(l, _)| self.labels.contains(l)) {
            return Err(DuplicateLabelError(label.clone()));
        }
        for (label, value) in other.entries {
            self.labels.insert(label.clone());
            self.entries.push((label, value));
        }
        Ok(())
    }

    pub fn get(&self, label: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, value)| *value)
    }

    pub fn contains(&self, label: &str) -> bool {
        self.labels.contains(label)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(label, value)| (label.as_str(), *value))
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(label, _)| label.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
