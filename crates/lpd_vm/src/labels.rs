use crate::error::ExecError;
use std::collections::HashMap;

/// Label name -> index of the `NULL` instruction that declares it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelTable {
    marks: HashMap<String, usize>,
}

impl LabelTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a mark. Duplicates keep the first declaration.
    pub fn declare(&mut self, name: &str, index: usize) {
        self.marks.entry(name.to_string()).or_insert(index);
    }

    pub fn get(&self, name: &str) -> Option<usize> {
        self.marks.get(name).copied()
    }

    pub fn resolve(&self, name: &str) -> Result<usize, ExecError> {
        self.get(name)
            .ok_or_else(|| ExecError::UnresolvedLabel(name.to_string()))
    }

    pub fn len(&self) -> usize {
        self.marks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.marks.is_empty()
    }

    /// Marks ordered by instruction index.
    pub fn sorted(&self) -> Vec<(&str, usize)> {
        let mut v: Vec<(&str, usize)> = self
            .marks
            .iter()
            .map(|(k, &i)| (k.as_str(), i))
            .collect();
        v.sort_by_key(|&(name, i)| (i, name));
        v
    }
}
