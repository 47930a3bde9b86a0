//! Selection model: an ordered set of selected layer ids.
//!
//! Only the id list is stored. The single selection is derived from it, so
//! "single selection is set iff exactly one id is selected" cannot drift.

#[cfg(test)]
#[path = "selection_test.rs"]
mod selection_test;

/// Ordered, duplicate-free set of selected layer ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: Vec<String>,
}

impl Selection {
    #[must_use]
    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    /// The sole selected id when exactly one layer is selected.
    #[must_use]
    pub fn primary(&self) -> Option<&str> {
        match self.ids.as_slice() {
            [only] => Some(only.as_str()),
            _ => None,
        }
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|s| s == id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Select exactly `id`, or nothing.
    pub fn set_single(&mut self, id: Option<&str>) {
        self.ids.clear();
        if let Some(id) = id {
            self.ids.push(id.to_owned());
        }
    }

    /// Replace the selection. Later duplicates are dropped.
    pub fn set_many<I, S>(&mut self, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ids.clear();
        for id in ids {
            let id = id.into();
            if !self.contains(&id) {
                self.ids.push(id);
            }
        }
    }

    /// Append `id` unless already selected. Returns whether it was added.
    pub fn add(&mut self, id: &str) -> bool {
        if self.contains(id) {
            return false;
        }
        self.ids.push(id.to_owned());
        true
    }

    /// Returns whether `id` was selected.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.ids.len();
        self.ids.retain(|s| s != id);
        self.ids.len() != before
    }

    /// Add `id` if absent, remove it if present.
    pub fn toggle(&mut self, id: &str) {
        if !self.remove(id) {
            self.ids.push(id.to_owned());
        }
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Keep only ids for which `keep` returns true.
    pub fn retain(&mut self, mut keep: impl FnMut(&str) -> bool) {
        self.ids.retain(|s| keep(s));
    }
}
