//! Shared types between the desk controller and the web front-end
//!
//! These types are used by both:
//! - `desk-core` (native Rust, tested under tokio)
//! - `desk-ui` Dioxus components (WASM)
//!
//! Serializable with serde for JSON over HTTP

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

// ============================================================================
// RPC Methods
// ============================================================================

/// Server method names, called as `POST /api/method/<name>`
pub mod methods {
    pub const GET_DESK_SIDEBAR_ITEMS: &str = "frappe.desk.desktop.get_desk_sidebar_items";
    pub const GET_DESKTOP_PAGE: &str = "frappe.desk.desktop.get_desktop_page";
    pub const SAVE_CUSTOMIZATION: &str = "frappe.desk.desktop.save_customization";
}

/// Response envelope; every method answers `{"message": ...}`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct RpcResponse<T> {
    #[serde(default)]
    pub message: Option<T>,
    /// Server-side exception text, when the call failed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exc: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GetDesktopPageRequest {
    pub page: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SaveCustomizationRequest {
    pub page: String,
    pub config: CustomizationConfig,
}

// ============================================================================
// Sidebar
// ============================================================================

/// Sidebar groupings, declared in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SidebarCategory {
    Modules,
    Domains,
    Places,
    Administration,
}

impl SidebarCategory {
    pub const ORDERED: [SidebarCategory; 4] = [
        SidebarCategory::Modules,
        SidebarCategory::Domains,
        SidebarCategory::Places,
        SidebarCategory::Administration,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SidebarCategory::Modules => "Modules",
            SidebarCategory::Domains => "Domains",
            SidebarCategory::Places => "Places",
            SidebarCategory::Administration => "Administration",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ORDERED.into_iter().find(|c| c.as_str() == value)
    }
}

impl std::fmt::Display for SidebarCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SidebarItem {
    pub name: String,
    #[serde(default, deserialize_with = "bool_or_int")]
    pub selected: bool,
}

impl SidebarItem {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            selected: false,
        }
    }
}

/// Sidebar configuration as returned by the server.
///
/// Keys the desk does not recognise are dropped while decoding. A category
/// that is present with no items is kept, so its header still renders.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(
    from = "BTreeMap<String, Vec<SidebarItem>>",
    into = "BTreeMap<String, Vec<SidebarItem>>"
)]
pub struct SidebarConfig {
    categories: BTreeMap<SidebarCategory, Vec<SidebarItem>>,
}

impl SidebarConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_category(mut self, category: SidebarCategory, items: Vec<SidebarItem>) -> Self {
        self.categories.insert(category, items);
        self
    }

    pub fn items(&self, category: SidebarCategory) -> Option<&[SidebarItem]> {
        self.categories.get(&category).map(Vec::as_slice)
    }

    /// Categories present in the config, in display order
    pub fn iter(&self) -> impl Iterator<Item = (SidebarCategory, &[SidebarItem])> {
        self.categories.iter().map(|(c, items)| (*c, items.as_slice()))
    }

    pub fn contains_page(&self, name: &str) -> bool {
        self.categories
            .values()
            .flatten()
            .any(|item| item.name == name)
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

impl From<BTreeMap<String, Vec<SidebarItem>>> for SidebarConfig {
    fn from(raw: BTreeMap<String, Vec<SidebarItem>>) -> Self {
        let categories = raw
            .into_iter()
            .filter_map(|(key, items)| SidebarCategory::parse(&key).map(|c| (c, items)))
            .collect();
        Self { categories }
    }
}

impl From<SidebarConfig> for BTreeMap<String, Vec<SidebarItem>> {
    fn from(config: SidebarConfig) -> Self {
        config
            .categories
            .into_iter()
            .map(|(c, items)| (c.as_str().to_string(), items))
            .collect()
    }
}

// ============================================================================
// Page Data
// ============================================================================

/// The three widget sections a page may carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionKind {
    Charts,
    Shortcuts,
    Cards,
}

impl SectionKind {
    /// Render order on a page
    pub const ALL: [SectionKind; 3] = [
        SectionKind::Charts,
        SectionKind::Shortcuts,
        SectionKind::Cards,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            SectionKind::Charts => "charts",
            SectionKind::Shortcuts => "shortcuts",
            SectionKind::Cards => "cards",
        }
    }
}

/// A single widget descriptor.
///
/// Only `label` and `hidden` are interpreted by the desk; every other field
/// is carried through untouched so saving does not lose server data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Widget {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(
        default,
        deserialize_with = "bool_or_int",
        skip_serializing_if = "std::ops::Not::not"
    )]
    pub hidden: bool,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Widget {
    pub fn labeled(label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WidgetSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default)]
    pub items: Vec<Widget>,
}

impl WidgetSection {
    pub fn new(items: Vec<Widget>) -> Self {
        Self { label: None, items }
    }

    pub fn has_items(&self) -> bool {
        !self.items.is_empty()
    }
}

/// Content of one workspace page
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageData {
    #[serde(default, deserialize_with = "bool_or_int")]
    pub allow_customization: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub charts: Option<WidgetSection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shortcuts: Option<WidgetSection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cards: Option<WidgetSection>,
}

impl PageData {
    pub fn section(&self, kind: SectionKind) -> Option<&WidgetSection> {
        match kind {
            SectionKind::Charts => self.charts.as_ref(),
            SectionKind::Shortcuts => self.shortcuts.as_ref(),
            SectionKind::Cards => self.cards.as_ref(),
        }
    }

    pub fn section_mut(&mut self, kind: SectionKind) -> &mut Option<WidgetSection> {
        match kind {
            SectionKind::Charts => &mut self.charts,
            SectionKind::Shortcuts => &mut self.shortcuts,
            SectionKind::Cards => &mut self.cards,
        }
    }

    /// Decode a `get_desktop_page` message.
    ///
    /// `null`, a missing message and `{}` all mean the page does not exist.
    pub fn from_message(message: Option<serde_json::Value>) -> Result<Option<Self>, serde_json::Error> {
        match message {
            None | Some(serde_json::Value::Null) => Ok(None),
            Some(serde_json::Value::Object(map)) if map.is_empty() => Ok(None),
            Some(value) => serde_json::from_value(value).map(Some),
        }
    }
}

// ============================================================================
// Customization
// ============================================================================

/// Widget layout sent back to the server on save.
/// Groups the page does not render are left out entirely.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomizationConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub charts: Option<Vec<Widget>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shortcuts: Option<Vec<Widget>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cards: Option<Vec<Widget>>,
}

impl CustomizationConfig {
    pub fn set(&mut self, kind: SectionKind, widgets: Vec<Widget>) {
        let slot = match kind {
            SectionKind::Charts => &mut self.charts,
            SectionKind::Shortcuts => &mut self.shortcuts,
            SectionKind::Cards => &mut self.cards,
        };
        *slot = Some(widgets);
    }

    pub fn get(&self, kind: SectionKind) -> Option<&[Widget]> {
        match kind {
            SectionKind::Charts => self.charts.as_deref(),
            SectionKind::Shortcuts => self.shortcuts.as_deref(),
            SectionKind::Cards => self.cards.as_deref(),
        }
    }

    /// Sections included in this config, in render order
    pub fn kinds(&self) -> Vec<SectionKind> {
        SectionKind::ALL
            .into_iter()
            .filter(|kind| self.get(*kind).is_some())
            .collect()
    }
}

/// The server sends flags as either JSON booleans or 0/1 integers
fn bool_or_int<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(i64),
        Null(()),
    }

    Ok(match Flag::deserialize(deserializer)? {
        Flag::Bool(b) => b,
        Flag::Int(i) => i != 0,
        Flag::Null(()) => false,
    })
}
