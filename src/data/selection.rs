//! State Selection Module
//! The set of state names picked in the sidebar filter.

/// States chosen by the user, kept in the order they were picked.
///
/// An empty selection means "no filter": every state is shown.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StateSelection {
    states: Vec<String>,
}

impl StateSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn contains(&self, state: &str) -> bool {
        self.states.iter().any(|s| s == state)
    }

    /// Add a state. Returns false if it was already selected.
    pub fn insert(&mut self, state: impl Into<String>) -> bool {
        let state = state.into();
        if self.contains(&state) {
            return false;
        }
        self.states.push(state);
        true
    }

    /// Remove a state. Returns false if it was not selected.
    pub fn remove(&mut self, state: &str) -> bool {
        let before = self.states.len();
        self.states.retain(|s| s != state);
        self.states.len() != before
    }

    /// Flip membership of a state.
    pub fn toggle(&mut self, state: &str) {
        if !self.remove(state) {
            self.states.push(state.to_string());
        }
    }

    pub fn clear(&mut self) {
        self.states.clear();
    }

    /// Selected names joined for chart headings, e.g. "California, Texas".
    pub fn label(&self) -> String {
        self.states.join(", ")
    }
}

impl<S: Into<String>> FromIterator<S> for StateSelection {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut selection = Self::new();
        for state in iter {
            selection.insert(state);
        }
        selection
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicates_are_ignored() {
        let selection: StateSelection = ["Texas", "Iowa", "Texas"].into_iter().collect();
        assert_eq!(selection.len(), 2);
        assert_eq!(selection.label(), "Texas, Iowa");
    }

    #[test]
    fn toggle_adds_then_removes() {
        let mut selection = StateSelection::new();
        selection.toggle("California");
        assert!(selection.contains("California"));
        selection.toggle("California");
        assert!(selection.is_empty());
    }

    #[test]
    fn label_is_empty_without_selection() {
        assert_eq!(StateSelection::new().label(), "");
    }
}
