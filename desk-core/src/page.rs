//! A single workspace page
//!
//! Lifecycle: `Loading → Rendered ⇄ Customizing`, with `Failed` and
//! `Missing` as terminal outcomes of a fetch. Every fetch is split into a
//! `begin_*` call that hands out a [`PageTicket`] and a `finish_*` call that
//! applies the response. Each reload takes a new generation, so only the
//! response to the latest request is ever applied.

use std::cell::Cell;
use std::rc::Rc;

use shared_types::{CustomizationConfig, PageData, SectionKind};

use crate::api::{DeskApi, RetryPolicy};
use crate::error::DeskError;
use crate::layout::LayoutSubscription;
use crate::widget::WidgetGroup;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageState {
    Loading,
    Rendered,
    Customizing,
    Failed(String),
    Missing,
}

/// Hands out fetch generations. Pages sharing a source never reuse a
/// generation, even across instances with the same name.
#[derive(Debug, Clone, Default)]
pub struct GenerationSource {
    last: Rc<Cell<u64>>,
}

impl GenerationSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next(&self) -> u64 {
        let next = self.last.get() + 1;
        self.last.set(next);
        next
    }
}

/// Identifies one in-flight page fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageTicket {
    page: String,
    generation: u64,
}

impl PageTicket {
    pub fn page(&self) -> &str {
        &self.page
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Identifies one in-flight save, with the layout being sent
#[derive(Debug, Clone, PartialEq)]
pub struct SaveTicket {
    page: String,
    generation: u64,
    config: CustomizationConfig,
}

impl SaveTicket {
    pub fn page(&self) -> &str {
        &self.page
    }

    pub fn config(&self) -> &CustomizationConfig {
        &self.config
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageOutcome {
    Rendered,
    /// The server has no data for this page
    Missing,
    Failed(DeskError),
    /// A newer request superseded this one; the response was dropped
    Stale,
}

#[derive(Debug)]
pub struct DesktopPage {
    name: String,
    state: PageState,
    data: Option<PageData>,
    groups: Vec<WidgetGroup>,
    visible: bool,
    generation: u64,
    generations: GenerationSource,
    render_revision: u64,
    is_mobile: bool,
    layout: Option<LayoutSubscription>,
}

impl DesktopPage {
    pub fn new(name: impl Into<String>, is_mobile: bool, layout: Option<LayoutSubscription>) -> Self {
        Self {
            name: name.into(),
            state: PageState::Loading,
            data: None,
            groups: Vec::new(),
            visible: false,
            generation: 0,
            generations: GenerationSource::new(),
            render_revision: 0,
            is_mobile,
            layout,
        }
    }

    /// Draw generations from `generations` instead of a private counter
    pub fn with_generations(mut self, generations: GenerationSource) -> Self {
        self.generations = generations;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> &PageState {
        &self.state
    }

    pub fn data(&self) -> Option<&PageData> {
        self.data.as_ref()
    }

    pub fn groups(&self) -> &[WidgetGroup] {
        &self.groups
    }

    pub fn group_mut(&mut self, section: SectionKind) -> Option<&mut WidgetGroup> {
        self.groups.iter_mut().find(|g| g.section() == section)
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_customizing(&self) -> bool {
        self.state == PageState::Customizing
    }

    pub fn allow_customization(&self) -> bool {
        self.data.as_ref().is_some_and(|d| d.allow_customization)
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Bumped whenever the groups are rebuilt; the UI keys re-renders on it
    pub fn render_revision(&self) -> u64 {
        self.render_revision
    }

    pub fn show(&mut self) {
        self.visible = true;
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }

    /// Drop rendered content and start a fresh fetch. Leaves customize mode.
    pub fn begin_reload(&mut self) -> PageTicket {
        self.generation = self.generations.next();
        self.state = PageState::Loading;
        self.data = None;
        self.groups.clear();
        self.render_revision += 1;

        tracing::debug!(page = %self.name, generation = self.generation, "Page reload started");

        PageTicket {
            page: self.name.clone(),
            generation: self.generation,
        }
    }

    pub fn finish_reload(
        &mut self,
        ticket: PageTicket,
        result: Result<Option<PageData>, DeskError>,
    ) -> PageOutcome {
        if ticket.page != self.name || ticket.generation != self.generation {
            tracing::debug!(
                page = %self.name,
                generation = ticket.generation,
                latest = self.generation,
                "Dropping stale page response"
            );
            return PageOutcome::Stale;
        }

        match result {
            Ok(Some(data)) => {
                self.data = Some(data);
                self.state = PageState::Rendered;
                self.rebuild_groups();
                tracing::debug!(page = %self.name, groups = self.groups.len(), outcome = "rendered", "Page loaded");
                PageOutcome::Rendered
            }
            Ok(None) => {
                self.state = PageState::Missing;
                tracing::warn!(page = %self.name, outcome = "missing", "Page has no data");
                PageOutcome::Missing
            }
            Err(e) => {
                self.state = PageState::Failed(e.to_string());
                tracing::error!(page = %self.name, error = %e, outcome = "failed", "Page fetch failed");
                PageOutcome::Failed(e)
            }
        }
    }

    /// Rebuild groups from the data already fetched. While customizing the
    /// groups (and any unsaved edits) are kept; only the revision moves.
    /// Returns false when there is nothing to render yet.
    pub fn refresh(&mut self) -> bool {
        match self.state {
            PageState::Rendered => {
                self.rebuild_groups();
                true
            }
            PageState::Customizing => {
                self.render_revision += 1;
                true
            }
            _ => false,
        }
    }

    /// Enter customize mode. `Ok(false)` when already customizing.
    pub fn customize(&mut self) -> Result<bool, DeskError> {
        match self.state {
            PageState::Customizing => Ok(false),
            PageState::Rendered if !self.allow_customization() => {
                Err(DeskError::CustomizationNotAllowed(self.name.clone()))
            }
            PageState::Rendered => {
                for group in &mut self.groups {
                    group.customize();
                }
                self.state = PageState::Customizing;
                tracing::info!(page = %self.name, "Entered customize mode");
                Ok(true)
            }
            _ => Err(DeskError::NotRendered(self.name.clone())),
        }
    }

    /// Current layout of every rendered group
    pub fn customization_config(&self) -> CustomizationConfig {
        let mut config = CustomizationConfig::default();
        for group in &self.groups {
            config.set(group.section(), group.widget_config());
        }
        config
    }

    pub fn begin_save(&self) -> Result<SaveTicket, DeskError> {
        if !self.is_customizing() {
            return Err(DeskError::NotCustomizing(self.name.clone()));
        }
        Ok(SaveTicket {
            page: self.name.clone(),
            generation: self.generation,
            config: self.customization_config(),
        })
    }

    /// Apply the server's answer to a save. On success a reload ticket is
    /// returned, unless a reload was already started while saving. On
    /// failure the page stays in customize mode.
    pub fn finish_save(
        &mut self,
        ticket: SaveTicket,
        result: Result<(), DeskError>,
    ) -> Result<Option<PageTicket>, DeskError> {
        if let Err(e) = result {
            tracing::error!(page = %self.name, error = %e, "Saving customization failed");
            return Err(e);
        }

        tracing::info!(page = %self.name, sections = ?ticket.config.kinds(), "Customization saved");

        if ticket.generation != self.generation {
            return Ok(None);
        }
        Ok(Some(self.begin_reload()))
    }

    /// Revert unsaved edits by refetching
    pub fn discard(&mut self) -> PageTicket {
        self.begin_reload()
    }

    /// Apply pending layout notifications. Returns true if the page re-rendered.
    pub fn handle_layout_changes(&mut self) -> bool {
        let Some(layout) = self.layout.as_mut() else {
            return false;
        };
        if layout.drain().is_empty() {
            return false;
        }
        self.refresh()
    }

    pub async fn reload<A: DeskApi + ?Sized>(&mut self, api: &A, retry: RetryPolicy) -> PageOutcome {
        let ticket = self.begin_reload();
        let result = retry
            .run("get_desktop_page", || api.get_desktop_page(ticket.page()))
            .await;
        self.finish_reload(ticket, result)
    }

    pub async fn save_customization<A: DeskApi + ?Sized>(
        &mut self,
        api: &A,
        retry: RetryPolicy,
    ) -> Result<PageOutcome, DeskError> {
        let ticket = self.begin_save()?;
        let result = api.save_customization(ticket.page(), ticket.config()).await;
        match self.finish_save(ticket, result)? {
            Some(reload) => {
                let result = retry
                    .run("get_desktop_page", || api.get_desktop_page(reload.page()))
                    .await;
                Ok(self.finish_reload(reload, result))
            }
            None => Ok(PageOutcome::Stale),
        }
    }

    fn rebuild_groups(&mut self) {
        let Some(data) = self.data.as_ref() else {
            self.groups.clear();
            return;
        };

        self.groups = SectionKind::ALL
            .into_iter()
            .filter_map(|kind| {
                let section = data.section(kind).filter(|s| s.has_items())?;
                Some(WidgetGroup::from_section(
                    kind,
                    section,
                    &self.name,
                    data.allow_customization,
                    self.is_mobile,
                ))
            })
            .collect();
        self.render_revision += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{LayoutChange, LayoutNotifier};
    use shared_types::{Widget, WidgetSection};

    fn items(n: usize) -> WidgetSection {
        WidgetSection::new((0..n).map(|i| Widget::labeled(format!("w{i}"))).collect())
    }

    #[test]
    fn shared_source_keeps_generations_unique() {
        let source = GenerationSource::new();
        let mut first = DesktopPage::new("Home", false, None).with_generations(source.clone());
        let mut second = DesktopPage::new("Home", false, None).with_generations(source);

        let a = first.begin_reload();
        let b = second.begin_reload();
        assert_ne!(a.generation(), b.generation());
        assert_eq!(second.finish_reload(a, Ok(None)), PageOutcome::Stale);
    }

    fn loaded(data: PageData) -> DesktopPage {
        let mut page = DesktopPage::new("Home", false, None);
        let ticket = page.begin_reload();
        assert_eq!(page.finish_reload(ticket, Ok(Some(data))), PageOutcome::Rendered);
        page
    }

    #[test]
    fn only_present_sections_become_groups() {
        let page = loaded(PageData {
            allow_customization: true,
            shortcuts: Some(items(3)),
            cards: Some(WidgetSection::default()),
            ..PageData::default()
        });

        assert_eq!(page.groups().len(), 1);
        assert_eq!(page.groups()[0].section(), SectionKind::Shortcuts);
        assert_eq!(page.groups()[0].columns(), 3);
    }

    #[test]
    fn customize_is_idempotent() {
        let mut page = loaded(PageData {
            allow_customization: true,
            charts: Some(items(1)),
            ..PageData::default()
        });

        assert_eq!(page.customize(), Ok(true));
        assert_eq!(page.customize(), Ok(false));
        assert!(page.groups().iter().all(|g| g.is_editing()));
    }

    #[test]
    fn customize_requires_permission_and_data() {
        let mut loading = DesktopPage::new("Home", false, None);
        assert_eq!(loading.customize(), Err(DeskError::NotRendered("Home".into())));

        let mut locked = loaded(PageData {
            shortcuts: Some(items(1)),
            ..PageData::default()
        });
        assert!(matches!(locked.customize(), Err(DeskError::CustomizationNotAllowed(_))));
    }

    #[test]
    fn stale_responses_are_dropped() {
        let mut page = DesktopPage::new("Home", false, None);
        let first = page.begin_reload();
        let second = page.begin_reload();

        let late = PageData {
            charts: Some(items(1)),
            ..PageData::default()
        };
        assert_eq!(page.finish_reload(first, Ok(Some(late))), PageOutcome::Stale);
        assert_eq!(page.state(), &PageState::Loading);

        let fresh = PageData {
            shortcuts: Some(items(2)),
            ..PageData::default()
        };
        assert_eq!(page.finish_reload(second, Ok(Some(fresh))), PageOutcome::Rendered);
        assert_eq!(page.groups()[0].section(), SectionKind::Shortcuts);
    }

    #[test]
    fn failed_save_keeps_customize_mode() {
        let mut page = loaded(PageData {
            allow_customization: true,
            shortcuts: Some(items(2)),
            ..PageData::default()
        });
        page.customize().unwrap();

        let ticket = page.begin_save().unwrap();
        let result = page.finish_save(ticket, Err(DeskError::Transport("offline".into())));
        assert!(result.is_err());
        assert!(page.is_customizing());
    }

    #[test]
    fn save_requires_customize_mode() {
        let page = loaded(PageData {
            allow_customization: true,
            shortcuts: Some(items(2)),
            ..PageData::default()
        });
        assert!(matches!(page.begin_save(), Err(DeskError::NotCustomizing(_))));
    }

    #[test]
    fn refresh_keeps_unsaved_edits_while_customizing() {
        let mut page = loaded(PageData {
            allow_customization: true,
            shortcuts: Some(items(3)),
            ..PageData::default()
        });
        page.customize().unwrap();
        page.group_mut(SectionKind::Shortcuts)
            .unwrap()
            .move_widget(2, 0)
            .unwrap();

        let before = page.render_revision();
        assert!(page.refresh());
        assert!(page.render_revision() > before);
        assert_eq!(
            page.groups()[0].widgets()[0].label.as_deref(),
            Some("w2")
        );
    }

    #[test]
    fn layout_changes_trigger_refresh() {
        let notifier = LayoutNotifier::new();
        let mut page = DesktopPage::new("Home", false, Some(notifier.subscribe()));
        let ticket = page.begin_reload();
        page.finish_reload(
            ticket,
            Ok(Some(PageData {
                charts: Some(items(1)),
                ..PageData::default()
            })),
        );

        assert!(!page.handle_layout_changes());
        let before = page.render_revision();
        notifier.notify(LayoutChange::FullWidthToggled);
        assert!(page.handle_layout_changes());
        assert!(page.render_revision() > before);

        drop(page);
        assert_eq!(notifier.subscriber_count(), 0);
    }
}
