/// Set of selected event ids, kept in the order they were selected
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: Vec<String>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a selection from ids, dropping duplicates
    pub fn from_ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut selection = Self::new();
        for id in ids {
            let id = id.into();
            if !selection.contains(&id) {
                selection.ids.push(id);
            }
        }
        selection
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|selected| selected == id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    /// Select an unselected id, or unselect a selected one
    pub fn toggle(&mut self, id: &str) {
        if self.contains(id) {
            self.ids.retain(|selected| selected != id);
        } else {
            self.ids.push(id.to_string());
        }
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Keep only the ids accepted by `keep`
    pub fn retain<F: FnMut(&str) -> bool>(&mut self, mut keep: F) {
        self.ids.retain(|id| keep(id));
    }

    /// Whether every one of `visible` is selected (vacuously true for none)
    pub fn covers(&self, visible: &[&str]) -> bool {
        visible.iter().all(|id| self.contains(id))
    }

    /// Whether a non-empty visible list is fully selected
    pub fn is_all_selected(&self, visible: &[&str]) -> bool {
        !visible.is_empty() && self.covers(visible)
    }

    /// Select exactly the visible ids, or clear everything if they already are selected.
    ///
    /// Ids outside `visible` never survive this call.
    pub fn select_all(&mut self, visible: &[&str]) {
        if self.covers(visible) {
            self.clear();
        } else {
            *self = Self::from_ids(visible.iter().copied());
        }
    }
}
