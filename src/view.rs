use std::collections::BTreeSet;

use strum::IntoEnumIterator;
use tracing::debug;

use crate::catalog::{Catalog, FileKind, FolderId};

/// Session-local browsing state.
///
/// The selected folder does not have to be expanded; the two are only tied
/// together by [`ViewState::select_folder`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    selected: FolderId,
    expanded: BTreeSet<FolderId>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            selected: FolderId::Documents,
            expanded: BTreeSet::from([FolderId::Documents]),
        }
    }
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> FolderId {
        self.selected
    }

    pub fn is_expanded(&self, folder: FolderId) -> bool {
        self.expanded.contains(&folder)
    }

    pub fn expanded(&self) -> &BTreeSet<FolderId> {
        &self.expanded
    }

    /// Selects `folder` and flips its expansion.
    pub fn select_folder(&mut self, folder: FolderId) {
        self.selected = folder;
        self.toggle_expanded(folder);
        debug!("selected {folder}, expanded {:?}", self.expanded);
    }

    pub fn toggle_expanded(&mut self, folder: FolderId) {
        if !self.expanded.remove(&folder) {
            self.expanded.insert(folder);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SidebarEntry {
    pub folder: FolderId,
    pub label: &'static str,
    pub expanded: bool,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRow {
    pub kind: FileKind,
    pub name: String,
    pub size: String,
    pub modified: String,
}

/// Everything the renderer needs for one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowserView {
    pub sidebar: Vec<SidebarEntry>,
    pub header: &'static str,
    pub rows: Vec<FileRow>,
}

pub fn project(state: &ViewState, catalog: &Catalog) -> BrowserView {
    let sidebar = FolderId::iter()
        .map(|folder| SidebarEntry {
            folder,
            label: folder.label(),
            expanded: state.is_expanded(folder),
            selected: state.selected() == folder,
        })
        .collect();

    let rows = catalog
        .records_for(state.selected())
        .iter()
        .map(|record| FileRow {
            kind: record.kind,
            name: record.name.clone(),
            size: record.size.clone(),
            modified: record.modified.clone(),
        })
        .collect();

    BrowserView {
        sidebar,
        header: state.selected().label(),
        rows,
    }
}


#[cfg(test)]
mod props {
    use std::collections::HashSet;

    use proptest::prelude::*;

    use super::*;

    fn folder() -> impl Strategy<Value = FolderId> {
        prop_oneof![
            Just(FolderId::Documents),
            Just(FolderId::Images),
            Just(FolderId::Music),
        ]
    }

    proptest! {
        #[test]
        fn test_state_matches_model(clicks in prop::collection::vec(folder(), 0..200)) {
            let mut state = ViewState::new();
            let mut selected = FolderId::Documents;
            let mut expanded = HashSet::from([FolderId::Documents]);

            for folder in clicks {
                state.select_folder(folder);

                selected = folder;
                if !expanded.remove(&folder) {
                    expanded.insert(folder);
                }

                prop_assert_eq!(state.selected(), selected);
                for f in FolderId::iter() {
                    prop_assert_eq!(state.is_expanded(f), expanded.contains(&f), "expansion mismatch for {}", f);
                }
            }
        }

        #[test]
        fn test_projection_never_touches_catalog(clicks in prop::collection::vec(folder(), 0..50)) {
            let catalog = Catalog::seed();
            let pristine = catalog.clone();
            let mut state = ViewState::new();

            for folder in clicks {
                state.select_folder(folder);
                let view = project(&state, &catalog);
                prop_assert_eq!(view.rows.len(), catalog.records_for(state.selected()).len());
            }

            prop_assert_eq!(&catalog, &pristine);
            for f in FolderId::iter() {
                prop_assert_eq!(catalog.records_for(f), pristine.records_for(f));
            }
        }
    }
}
