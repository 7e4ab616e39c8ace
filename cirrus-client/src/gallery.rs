//! Headless state for the gallery grid and the full-screen viewer.
//!
//! None of this talks to the network; a UI layer drives it from input events
//! and renders from the getters.

use cirrus_model::{DisplayConstraints, MediaResource};

/// Resources ticked in the gallery grid. Ids are unique and keep the order
/// in which they were first selected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: Vec<String>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_selected(&mut self, id: impl Into<String>, checked: bool) {
        let id = id.into();
        if checked {
            if !self.ids.contains(&id) {
                self.ids.push(id);
            }
        } else {
            self.ids.retain(|selected| *selected != id);
        }
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.ids.iter().any(|selected| selected == id)
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// "Save your creation?" dialog shown after an edit produced a new asset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreationDialog {
    creation: Option<String>,
}

impl CreationDialog {
    pub fn open(&mut self, creation_id: impl Into<String>) {
        self.creation = Some(creation_id.into());
    }

    /// Mirrors the dialog's open-change callback: closing drops the pending
    /// creation, opening is driven by [`CreationDialog::open`] only.
    pub fn on_open_change(&mut self, is_open: bool) {
        if !is_open {
            self.creation = None;
        }
    }

    pub fn is_open(&self) -> bool {
        self.creation.is_some()
    }

    pub fn creation(&self) -> Option<&str> {
        self.creation.as_deref()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewerTab {
    Enhance,
    Crop,
    Filters,
}

impl ViewerTab {
    pub const ALL: [ViewerTab; 3] =
        [ViewerTab::Enhance, ViewerTab::Crop, ViewerTab::Filters];

    pub fn label(self) -> &'static str {
        match self {
            ViewerTab::Enhance => "Enhance",
            ViewerTab::Crop => "Crop",
            ViewerTab::Filters => "Filters",
        }
    }
}

/// Side sheets and the deletion dialog of the viewer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewerPanels {
    filters_open: bool,
    info_open: bool,
    deletion_open: bool,
    tab: Option<ViewerTab>,
}

impl ViewerPanels {
    pub fn open_filters(&mut self) {
        self.filters_open = true;
    }

    pub fn open_info(&mut self) {
        self.info_open = true;
    }

    pub fn request_deletion(&mut self) {
        self.deletion_open = true;
    }

    pub fn on_deletion_open_change(&mut self, is_open: bool) {
        if !is_open {
            self.deletion_open = false;
        }
    }

    pub fn close_menus(&mut self) {
        self.filters_open = false;
        self.info_open = false;
        self.deletion_open = false;
    }

    /// Click anywhere on the page. Clicks inside panels marked as excluded
    /// (the sheets and the dialog) leave everything open.
    pub fn on_outside_click(&mut self, target_excluded: bool) {
        if !target_excluded {
            self.close_menus();
        }
    }

    pub fn select_tab(&mut self, tab: ViewerTab) {
        self.tab = Some(tab);
    }

    pub fn tab(&self) -> Option<ViewerTab> {
        self.tab
    }

    pub fn is_filters_open(&self) -> bool {
        self.filters_open
    }

    pub fn is_info_open(&self) -> bool {
        self.info_open
    }

    pub fn is_deletion_open(&self) -> bool {
        self.deletion_open
    }

    pub fn any_open(&self) -> bool {
        self.filters_open || self.info_open || self.deletion_open
    }
}

/// Viewer for a single resource.
#[derive(Debug, Clone)]
pub struct MediaViewer {
    resource: MediaResource,
    pub panels: ViewerPanels,
}

impl MediaViewer {
    pub fn new(resource: MediaResource) -> Self {
        Self {
            resource,
            panels: ViewerPanels::default(),
        }
    }

    pub fn resource(&self) -> &MediaResource {
        &self.resource
    }

    pub fn constraints(&self) -> DisplayConstraints {
        self.resource.display_constraints()
    }
}
