//! The desk: sidebar, page registry and navigation
//!
//! Pages are created on first visit and kept for the rest of the session,
//! so returning to a page never refetches it. Exactly one page is current
//! and visible at a time.

use std::collections::{HashMap, HashSet};

use shared_types::{PageData, SidebarConfig};

use crate::api::{DeskApi, RetryPolicy};
use crate::config::DeskConfig;
use crate::error::DeskError;
use crate::layout::{LayoutChange, LayoutNotifier};
use crate::page::{DesktopPage, GenerationSource, PageOutcome, PageTicket, SaveTicket};
use crate::route::Route;
use crate::session::SessionState;
use crate::sidebar::{resolve_initial_page, Sidebar};

pub const SAVED_NOTICE: &str = "Customizations Saved Successfully";

#[derive(Debug)]
pub struct Desktop {
    config: DeskConfig,
    retry: RetryPolicy,
    session: SessionState,
    route: Route,
    sidebar_config: Option<SidebarConfig>,
    sidebar: Option<Sidebar>,
    pages: HashMap<String, DesktopPage>,
    /// Pages the server reported as gone during this session
    missing: HashSet<String>,
    current: Option<String>,
    layout: LayoutNotifier,
    generations: GenerationSource,
    notices: Vec<String>,
}

impl Desktop {
    pub fn new(config: DeskConfig, session: SessionState, route: Route) -> Self {
        let retry = RetryPolicy::new(config.fetch_attempts);
        Self {
            config,
            retry,
            session,
            route,
            sidebar_config: None,
            sidebar: None,
            pages: HashMap::new(),
            missing: HashSet::new(),
            current: None,
            layout: LayoutNotifier::new(),
            generations: GenerationSource::new(),
            notices: Vec::new(),
        }
    }

    pub fn config(&self) -> &DeskConfig {
        &self.config
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    /// Session state to persist after any navigation
    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    pub fn sidebar(&self) -> Option<&Sidebar> {
        self.sidebar.as_ref()
    }

    pub fn is_initialized(&self) -> bool {
        self.sidebar_config.is_some()
    }

    pub fn layout_notifier(&self) -> &LayoutNotifier {
        &self.layout
    }

    pub fn current_page_name(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn current_page(&self) -> Option<&DesktopPage> {
        self.current.as_ref().and_then(|name| self.pages.get(name))
    }

    pub fn current_page_mut(&mut self) -> Option<&mut DesktopPage> {
        self.current.as_ref().and_then(|name| self.pages.get_mut(name))
    }

    pub fn page(&self, name: &str) -> Option<&DesktopPage> {
        self.pages.get(name)
    }

    /// Every loaded page, sorted by name
    pub fn pages(&self) -> Vec<&DesktopPage> {
        let mut pages: Vec<_> = self.pages.values().collect();
        pages.sort_by(|a, b| a.name().cmp(b.name()));
        pages
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn visible_pages(&self) -> Vec<&str> {
        self.pages
            .values()
            .filter(|p| p.is_visible())
            .map(|p| p.name())
            .collect()
    }

    /// Notices queued for display, oldest first
    pub fn take_notices(&mut self) -> Vec<String> {
        std::mem::take(&mut self.notices)
    }

    /// Install the sidebar configuration and show the initial page.
    ///
    /// Returns the fetch ticket for the initial page when it has to be
    /// loaded. A missing configuration is fatal for the desk.
    pub fn apply_sidebar(
        &mut self,
        result: Result<Option<SidebarConfig>, DeskError>,
    ) -> Result<Option<PageTicket>, DeskError> {
        let sidebar_config = match result {
            Ok(Some(config)) if !config.is_empty() => config,
            Ok(_) => {
                tracing::error!("Sidebar configuration missing from server response");
                return Err(DeskError::SidebarUnavailable);
            }
            Err(e) => {
                tracing::error!(error = %e, "Sidebar configuration request failed");
                return Err(DeskError::SidebarUnavailable);
            }
        };

        let page = resolve_initial_page(
            &self.route,
            &self.session,
            Some(&sidebar_config),
            &self.config,
        );
        self.sidebar_config = Some(sidebar_config);

        let ticket = self.show_page(&page);
        if let Some(config) = self.sidebar_config.as_ref() {
            self.sidebar = Some(Sidebar::build(config, self.current.as_deref()));
        }

        tracing::info!(page = %page, "Desk initialized");
        Ok(ticket)
    }

    /// Switch to `name`, creating the page on first visit.
    ///
    /// Returns a fetch ticket only when a new page was created.
    pub fn show_page(&mut self, name: &str) -> Option<PageTicket> {
        if let Some(previous) = self.current.take() {
            if previous != name {
                if let Some(page) = self.pages.get_mut(&previous) {
                    page.hide();
                }
            }
        }

        if let Some(sidebar) = self.sidebar.as_mut() {
            sidebar.select(name);
        }

        self.current = Some(name.to_string());
        self.session.remember(name);
        self.route = Route::page(name);
        self.missing.remove(name);

        if let Some(page) = self.pages.get_mut(name) {
            page.show();
            tracing::debug!(page = %name, "Showing loaded page");
            return None;
        }

        let mut page = DesktopPage::new(name, self.config.is_mobile, Some(self.layout.subscribe()))
            .with_generations(self.generations.clone());
        page.show();
        let ticket = page.begin_reload();
        self.pages.insert(name.to_string(), page);
        tracing::info!(page = %name, "Created page");
        Some(ticket)
    }

    /// Apply a page fetch. A page with no data is dropped from the registry;
    /// if it is still current the session forgets it and the route falls
    /// back to the bare workspace route.
    pub fn complete_page_fetch(
        &mut self,
        ticket: PageTicket,
        result: Result<Option<PageData>, DeskError>,
    ) -> PageOutcome {
        let name = ticket.page().to_string();
        let Some(page) = self.pages.get_mut(&name) else {
            tracing::debug!(page = %name, "Dropping response for closed page");
            return PageOutcome::Stale;
        };

        let outcome = page.finish_reload(ticket, result);
        if outcome == PageOutcome::Missing {
            tracing::warn!(error = %DeskError::PageNotFound(name.clone()), "Dropping page");
            self.pages.remove(&name);
            self.missing.insert(name.clone());

            if self.current.as_deref() == Some(name.as_str()) {
                self.current = None;
                self.session.forget();
                self.route = Route::workspace();
                if let Some(sidebar) = self.sidebar.as_mut() {
                    sidebar.clear_selection();
                }
                tracing::info!(page = %name, "Falling back to workspace route");
            }
        }
        outcome
    }

    /// React to a route change from outside the desk.
    ///
    /// Non-workspace routes are ignored, as is a route resolving to the
    /// page already shown. A bare route whose default page the server
    /// already reported missing shows nothing.
    pub fn follow_route(&mut self, route: Route) -> Option<PageTicket> {
        if !route.is_workspace() || !self.is_initialized() {
            return None;
        }

        let page = resolve_initial_page(
            &route,
            &self.session,
            self.sidebar_config.as_ref(),
            &self.config,
        );
        if self.current.as_deref() == Some(page.as_str()) {
            self.route = Route::page(&page);
            return None;
        }
        if route_is_bare(&route) && self.missing.contains(&page) {
            tracing::warn!(page = %page, "Default page is missing, nothing to show");
            self.route = route;
            return None;
        }
        self.show_page(&page)
    }

    /// Tear a page down; its layout subscription goes with it
    pub fn close_page(&mut self, name: &str) -> bool {
        let removed = self.pages.remove(name).is_some();
        if removed && self.current.as_deref() == Some(name) {
            self.current = None;
        }
        removed
    }

    /// Broadcast a layout change; returns how many pages re-rendered
    pub fn notify_layout_change(&mut self, change: LayoutChange) -> usize {
        self.layout.notify(change);
        self.pages
            .values_mut()
            .map(|page| page.handle_layout_changes())
            .filter(|refreshed| *refreshed)
            .count()
    }

    pub fn customize(&mut self) -> Result<bool, DeskError> {
        self.require_current_mut()?.customize()
    }

    pub fn reload_current(&mut self) -> Result<PageTicket, DeskError> {
        Ok(self.require_current_mut()?.begin_reload())
    }

    pub fn discard_customization(&mut self) -> Result<PageTicket, DeskError> {
        Ok(self.require_current_mut()?.discard())
    }

    pub fn begin_save(&self) -> Result<SaveTicket, DeskError> {
        let page = self
            .current_page()
            .ok_or_else(|| DeskError::UnknownPage(self.current.clone().unwrap_or_default()))?;
        page.begin_save()
    }

    pub fn finish_save(
        &mut self,
        ticket: SaveTicket,
        result: Result<(), DeskError>,
    ) -> Result<Option<PageTicket>, DeskError> {
        let page = self
            .pages
            .get_mut(ticket.page())
            .ok_or_else(|| DeskError::UnknownPage(ticket.page().to_string()))?;
        let reload = page.finish_save(ticket, result)?;
        self.notices.push(SAVED_NOTICE.to_string());
        Ok(reload)
    }

    // ------------------------------------------------------------------
    // Async drivers
    // ------------------------------------------------------------------

    /// Fetch the sidebar, show the initial page and load it
    pub async fn initialize<A: DeskApi + ?Sized>(
        &mut self,
        api: &A,
    ) -> Result<Option<PageOutcome>, DeskError> {
        let result = self
            .retry
            .run("get_desk_sidebar_items", || api.get_desk_sidebar_items())
            .await;
        match self.apply_sidebar(result)? {
            Some(ticket) => Ok(Some(self.fetch_page(api, ticket).await)),
            None => Ok(None),
        }
    }

    /// Show `name`, loading it if this is the first visit
    pub async fn open_page<A: DeskApi + ?Sized>(&mut self, api: &A, name: &str) -> Option<PageOutcome> {
        let ticket = self.show_page(name)?;
        Some(self.fetch_page(api, ticket).await)
    }

    pub async fn navigate<A: DeskApi + ?Sized>(&mut self, api: &A, route: Route) -> Option<PageOutcome> {
        let ticket = self.follow_route(route)?;
        Some(self.fetch_page(api, ticket).await)
    }

    pub async fn reload<A: DeskApi + ?Sized>(&mut self, api: &A) -> Result<PageOutcome, DeskError> {
        let ticket = self.reload_current()?;
        Ok(self.fetch_page(api, ticket).await)
    }

    pub async fn discard<A: DeskApi + ?Sized>(&mut self, api: &A) -> Result<PageOutcome, DeskError> {
        let ticket = self.discard_customization()?;
        Ok(self.fetch_page(api, ticket).await)
    }

    /// Persist the current page's layout, then reload it
    pub async fn save_customization<A: DeskApi + ?Sized>(
        &mut self,
        api: &A,
    ) -> Result<PageOutcome, DeskError> {
        let ticket = self.begin_save()?;
        let result = api.save_customization(ticket.page(), ticket.config()).await;
        match self.finish_save(ticket, result)? {
            Some(reload) => Ok(self.fetch_page(api, reload).await),
            None => Ok(PageOutcome::Stale),
        }
    }

    pub async fn fetch_page<A: DeskApi + ?Sized>(&mut self, api: &A, ticket: PageTicket) -> PageOutcome {
        let result = self
            .retry
            .run("get_desktop_page", || api.get_desktop_page(ticket.page()))
            .await;
        self.complete_page_fetch(ticket, result)
    }

    fn require_current_mut(&mut self) -> Result<&mut DesktopPage, DeskError> {
        let name = self.current.clone().unwrap_or_default();
        self.pages
            .get_mut(&name)
            .ok_or(DeskError::UnknownPage(name))
    }
}

fn route_is_bare(route: &Route) -> bool {
    route.is_workspace() && route.page_name().is_none()
}
