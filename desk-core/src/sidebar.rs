use shared_types::{SidebarCategory, SidebarConfig};

use crate::config::DeskConfig;
use crate::route::Route;
use crate::session::SessionState;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SidebarEntry {
    pub name: String,
    pub route: Route,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SidebarSection {
    pub category: SidebarCategory,
    pub entries: Vec<SidebarEntry>,
}

/// Rendered sidebar: category headers with their page links, in
/// [`SidebarCategory::ORDERED`] order. At most one entry is selected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sidebar {
    sections: Vec<SidebarSection>,
}

impl Sidebar {
    pub fn build(config: &SidebarConfig, active: Option<&str>) -> Self {
        let sections = SidebarCategory::ORDERED
            .into_iter()
            .filter_map(|category| {
                let items = config.items(category)?;
                let entries = items
                    .iter()
                    .map(|item| SidebarEntry {
                        name: item.name.clone(),
                        route: Route::page(&item.name),
                        selected: active.is_none() && item.selected,
                    })
                    .collect();
                Some(SidebarSection { category, entries })
            })
            .collect();

        let mut sidebar = Self { sections };
        if let Some(page) = active {
            sidebar.select(page);
        }
        sidebar
    }

    pub fn sections(&self) -> &[SidebarSection] {
        &self.sections
    }

    /// Move the highlight to `page`. Returns false when no entry matches, in
    /// which case nothing stays highlighted.
    pub fn select(&mut self, page: &str) -> bool {
        let mut found = false;
        for entry in self.sections.iter_mut().flat_map(|s| s.entries.iter_mut()) {
            // duplicate names across categories: first one wins
            entry.selected = !found && entry.name == page;
            found |= entry.selected;
        }
        found
    }

    pub fn clear_selection(&mut self) {
        for entry in self.sections.iter_mut().flat_map(|s| s.entries.iter_mut()) {
            entry.selected = false;
        }
    }

    pub fn selected(&self) -> Option<&str> {
        self.sections
            .iter()
            .flat_map(|s| s.entries.iter())
            .find(|e| e.selected)
            .map(|e| e.name.as_str())
    }

    /// Entry names in display order
    pub fn entry_names(&self) -> Vec<&str> {
        self.sections
            .iter()
            .flat_map(|s| s.entries.iter().map(|e| e.name.as_str()))
            .collect()
    }
}

/// First entry of the default category, else the configured fallback page
pub fn default_page(sidebar: Option<&SidebarConfig>, config: &DeskConfig) -> String {
    sidebar
        .and_then(|s| s.items(config.default_category))
        .and_then(|items| items.first())
        .map(|item| item.name.clone())
        .unwrap_or_else(|| config.fallback_page.clone())
}

/// Route parameter, else the last visited page, else [`default_page`]
pub fn resolve_initial_page(
    route: &Route,
    session: &SessionState,
    sidebar: Option<&SidebarConfig>,
    config: &DeskConfig,
) -> String {
    route
        .page_name()
        .or_else(|| session.last_page())
        .map(ToString::to_string)
        .unwrap_or_else(|| default_page(sidebar, config))
}
