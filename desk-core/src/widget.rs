//! Widget groups
//!
//! A group is a titled collection of same-type widgets. The desk only
//! decides which groups exist and what they may do; the front-end draws
//! them. Edits are accepted only in edit mode and only when the group's
//! options allow that kind of change.

use shared_types::{SectionKind, Widget, WidgetSection};

use crate::error::DeskError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WidgetKind {
    Chart,
    Shortcut,
    Links,
}

impl WidgetKind {
    pub fn for_section(section: SectionKind) -> Self {
        match section {
            SectionKind::Charts => WidgetKind::Chart,
            SectionKind::Shortcuts => WidgetKind::Shortcut,
            SectionKind::Cards => WidgetKind::Links,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WidgetKind::Chart => "chart",
            WidgetKind::Shortcut => "shortcut",
            WidgetKind::Links => "links",
        }
    }
}

/// Permission flags handed to a group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WidgetGroupOptions {
    pub allow_sorting: bool,
    pub allow_create: bool,
    pub allow_delete: bool,
    pub allow_hiding: bool,
    pub allow_edit: bool,
}

impl WidgetGroupOptions {
    pub fn for_section(section: SectionKind, allow_customization: bool, is_mobile: bool) -> Self {
        let allow_sorting = allow_customization && !is_mobile;
        match section {
            SectionKind::Charts | SectionKind::Shortcuts => Self {
                allow_sorting,
                allow_create: allow_customization,
                allow_delete: allow_customization,
                allow_hiding: false,
                allow_edit: true,
            },
            SectionKind::Cards => Self {
                allow_sorting,
                allow_create: false,
                allow_delete: false,
                allow_hiding: allow_customization,
                allow_edit: false,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LegendItem {
    pub color: &'static str,
    pub description: &'static str,
}

/// Indicator colours used on link cards
pub const CARD_LEGEND: [LegendItem; 3] = [
    LegendItem {
        color: "blue",
        description: "Important",
    },
    LegendItem {
        color: "orange",
        description: "No Records Created",
    },
    LegendItem {
        color: "red",
        description: "Has Open Entries",
    },
];

#[derive(Debug, Clone, PartialEq)]
pub struct WidgetGroup {
    section: SectionKind,
    kind: WidgetKind,
    title: String,
    columns: u8,
    options: WidgetGroupOptions,
    widgets: Vec<Widget>,
    editing: bool,
}

impl WidgetGroup {
    pub fn from_section(
        section: SectionKind,
        data: &WidgetSection,
        page_name: &str,
        allow_customization: bool,
        is_mobile: bool,
    ) -> Self {
        let title = data
            .label
            .clone()
            .filter(|l| !l.is_empty())
            .unwrap_or_else(|| match section {
                SectionKind::Charts => format!("{page_name} Dashboard"),
                SectionKind::Shortcuts => "Your Shortcuts".to_string(),
                SectionKind::Cards => "Reports & Masters".to_string(),
            });

        Self {
            section,
            kind: WidgetKind::for_section(section),
            title,
            columns: match section {
                SectionKind::Charts => 1,
                SectionKind::Shortcuts | SectionKind::Cards => 3,
            },
            options: WidgetGroupOptions::for_section(section, allow_customization, is_mobile),
            widgets: data.items.clone(),
            editing: false,
        }
    }

    pub fn section(&self) -> SectionKind {
        self.section
    }

    pub fn kind(&self) -> WidgetKind {
        self.kind
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn columns(&self) -> u8 {
        self.columns
    }

    pub fn options(&self) -> WidgetGroupOptions {
        self.options
    }

    pub fn widgets(&self) -> &[Widget] {
        &self.widgets
    }

    /// Widgets shown outside edit mode
    pub fn visible_widgets(&self) -> impl Iterator<Item = &Widget> {
        let editing = self.editing;
        self.widgets.iter().filter(move |w| editing || !w.hidden)
    }

    pub fn is_editing(&self) -> bool {
        self.editing
    }

    pub fn legend(&self) -> &'static [LegendItem] {
        match self.kind {
            WidgetKind::Links => &CARD_LEGEND,
            _ => &[],
        }
    }

    pub fn customize(&mut self) {
        self.editing = true;
    }

    /// Current widget list, in display order, as it would be persisted
    pub fn widget_config(&self) -> Vec<Widget> {
        self.widgets.clone()
    }

    pub fn move_widget(&mut self, from: usize, to: usize) -> Result<(), DeskError> {
        self.ensure_allowed(self.options.allow_sorting, "sorting")?;
        self.ensure_index(from)?;
        self.ensure_index(to)?;
        let widget = self.widgets.remove(from);
        self.widgets.insert(to, widget);
        Ok(())
    }

    pub fn add_widget(&mut self, widget: Widget) -> Result<(), DeskError> {
        self.ensure_allowed(self.options.allow_create, "creating widgets")?;
        self.widgets.push(widget);
        Ok(())
    }

    pub fn remove_widget(&mut self, index: usize) -> Result<Widget, DeskError> {
        self.ensure_allowed(self.options.allow_delete, "deleting widgets")?;
        self.ensure_index(index)?;
        Ok(self.widgets.remove(index))
    }

    pub fn set_hidden(&mut self, index: usize, hidden: bool) -> Result<(), DeskError> {
        self.ensure_allowed(self.options.allow_hiding, "hiding widgets")?;
        self.ensure_index(index)?;
        self.widgets[index].hidden = hidden;
        Ok(())
    }

    pub fn update_widget(&mut self, index: usize, widget: Widget) -> Result<(), DeskError> {
        self.ensure_allowed(self.options.allow_edit, "editing widgets")?;
        self.ensure_index(index)?;
        self.widgets[index] = widget;
        Ok(())
    }

    fn ensure_allowed(&self, allowed: bool, action: &str) -> Result<(), DeskError> {
        if !self.editing {
            return Err(DeskError::WidgetEdit(format!(
                "{} group is not in edit mode",
                self.section.key()
            )));
        }
        if !allowed {
            return Err(DeskError::WidgetEdit(format!(
                "{action} is not allowed in the {} group",
                self.section.key()
            )));
        }
        Ok(())
    }

    fn ensure_index(&self, index: usize) -> Result<(), DeskError> {
        if index >= self.widgets.len() {
            return Err(DeskError::WidgetEdit(format!(
                "no widget at position {index} in the {} group",
                self.section.key()
            )));
        }
        Ok(())
    }
}
