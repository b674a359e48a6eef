use crate::corpus::{Scope, Verse};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum View {
    #[default]
    Reading,
    RootMap,
    About,
}

impl View {
    pub const ALL: [View; 3] = [View::Reading, View::RootMap, View::About];

    pub fn label(self) -> &'static str {
        match self {
            Self::Reading => "Surahs",
            Self::RootMap => "Root Map",
            Self::About => "About",
        }
    }
}

/// Selection state shared by the reading view and the root map: at most one
/// root filter, the verse scope, and the active view.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Selection {
    root_filter: Option<String>,
    scope: Scope,
    view: View,
}

impl Selection {
    pub fn new(scope: Scope) -> Self {
        Self {
            scope,
            ..Self::default()
        }
    }

    pub fn root_filter(&self) -> Option<&str> {
        self.root_filter.as_deref()
    }

    pub fn scope(&self) -> Scope {
        self.scope
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn set_view(&mut self, view: View) {
        self.view = view;
    }

    /// Selecting the active root clears the filter; any other root replaces it.
    pub fn toggle_root(&mut self, root_id: &str) -> Option<&str> {
        if self.root_filter.as_deref() == Some(root_id) {
            self.root_filter = None;
        } else {
            self.root_filter = Some(root_id.to_owned());
        }
        self.root_filter.as_deref()
    }

    pub fn set_root_filter(&mut self, root_id: Option<String>) {
        self.root_filter = root_id.filter(|id| !id.is_empty());
    }

    /// Returns whether the scope actually changed.
    pub fn set_scope(&mut self, scope: Scope) -> bool {
        if self.scope == scope {
            return false;
        }
        self.scope = scope;
        true
    }

    pub fn is_selected(&self, root_id: &str) -> bool {
        self.root_filter.as_deref() == Some(root_id)
    }

    /// Verses that pass the root filter; everything when no root is selected.
    pub fn filter_verses<'a>(&self, verses: Vec<&'a Verse>) -> Vec<&'a Verse> {
        match self.root_filter.as_deref() {
            Some(root_id) => verses
                .into_iter()
                .filter(|verse| verse.has_root(root_id))
                .collect(),
            None => verses,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn verse(number: u32, roots: &[&str]) -> Verse {
        Verse {
            number,
            roots: roots.iter().map(|root| root.to_string()).collect(),
            ..Verse::default()
        }
    }

    #[test]
    fn toggling_the_same_root_twice_clears_the_filter() {
        let mut selection = Selection::default();
        assert_eq!(selection.toggle_root("k-t-b"), Some("k-t-b"));
        assert!(selection.is_selected("k-t-b"));
        assert_eq!(selection.toggle_root("k-t-b"), None);
        assert_eq!(selection.root_filter(), None);
    }

    #[test]
    fn toggling_another_root_replaces_the_filter() {
        let mut selection = Selection::default();
        selection.toggle_root("a");
        assert_eq!(selection.toggle_root("b"), Some("b"));
        assert!(!selection.is_selected("a"));

        selection.set_root_filter(Some(String::new()));
        assert_eq!(selection.root_filter(), None);
    }

    #[test]
    fn scope_change_is_reported_once() {
        let mut selection = Selection::new(Scope::Surah(0));
        assert!(!selection.set_scope(Scope::Surah(0)));
        assert!(selection.set_scope(Scope::All));
        assert_eq!(selection.scope(), Scope::All);
    }

    #[test]
    fn root_filter_restricts_verses() {
        let verses = [verse(1, &["a", "b"]), verse(2, &["c"]), verse(3, &["a"])];
        let mut selection = Selection::default();
        assert_eq!(selection.filter_verses(verses.iter().collect()).len(), 3);

        selection.toggle_root("a");
        let numbers = selection
            .filter_verses(verses.iter().collect())
            .iter()
            .map(|verse| verse.number)
            .collect::<Vec<_>>();
        assert_eq!(numbers, [1, 3]);
    }

    #[test]
    fn view_labels_follow_tab_order() {
        let labels = View::ALL.map(View::label);
        assert_eq!(labels, ["Surahs", "Root Map", "About"]);
    }
}
