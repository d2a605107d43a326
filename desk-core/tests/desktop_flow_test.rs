//! Desk Flow Integration Tests
//!
//! Drives the desktop through initialization, navigation and the
//! customize/save/discard cycle against an in-memory server.

use std::cell::RefCell;
use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::json;

use desk_core::{
    DeskApi, DeskConfig, DeskError, Desktop, DialogAction, ErrorDialog, LayoutChange,
    PageOutcome, PageState, Route, SessionState, SAVED_NOTICE,
};
use shared_types::{
    CustomizationConfig, PageData, SectionKind, SidebarCategory, SidebarConfig, SidebarItem,
};

#[derive(Default)]
struct FakeDeskApi {
    sidebar: Option<SidebarConfig>,
    pages: RefCell<HashMap<String, PageData>>,
    page_fetches: RefCell<HashMap<String, usize>>,
    saved: RefCell<Vec<(String, CustomizationConfig)>>,
    /// Transport failures to return before answering page fetches
    failures_left: RefCell<usize>,
    reject_saves: bool,
}

impl FakeDeskApi {
    fn new(sidebar: SidebarConfig) -> Self {
        Self {
            sidebar: Some(sidebar),
            ..Self::default()
        }
    }

    fn with_page(self, name: &str, data: serde_json::Value) -> Self {
        let data: PageData = serde_json::from_value(data).expect("Invalid page fixture");
        self.pages.borrow_mut().insert(name.to_string(), data);
        self
    }

    fn fetches(&self, page: &str) -> usize {
        self.page_fetches.borrow().get(page).copied().unwrap_or(0)
    }
}

#[async_trait(?Send)]
impl DeskApi for FakeDeskApi {
    async fn get_desk_sidebar_items(&self) -> Result<Option<SidebarConfig>, DeskError> {
        Ok(self.sidebar.clone())
    }

    async fn get_desktop_page(&self, page: &str) -> Result<Option<PageData>, DeskError> {
        *self
            .page_fetches
            .borrow_mut()
            .entry(page.to_string())
            .or_default() += 1;

        let mut failures = self.failures_left.borrow_mut();
        if *failures > 0 {
            *failures -= 1;
            return Err(DeskError::Transport("connection reset".to_string()));
        }

        Ok(self.pages.borrow().get(page).cloned())
    }

    async fn save_customization(
        &self,
        page: &str,
        config: &CustomizationConfig,
    ) -> Result<(), DeskError> {
        if self.reject_saves {
            return Err(DeskError::Transport("HTTP error: 500".to_string()));
        }
        self.saved
            .borrow_mut()
            .push((page.to_string(), config.clone()));
        Ok(())
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn sidebar() -> SidebarConfig {
    serde_json::from_value(json!({
        "Modules": [{"name": "Home"}, {"name": "Accounts"}],
        "Domains": [{"name": "Manufacturing"}],
    }))
    .expect("Invalid sidebar fixture")
}

fn shortcut_items(n: usize) -> serde_json::Value {
    json!({
        "items": (0..n)
            .map(|i| json!({"label": format!("Shortcut {i}"), "type": "DocType"}))
            .collect::<Vec<_>>()
    })
}

fn fresh_desktop() -> Desktop {
    Desktop::new(DeskConfig::default(), SessionState::default(), Route::workspace())
}

fn standard_api() -> FakeDeskApi {
    FakeDeskApi::new(sidebar())
        .with_page(
            "Home",
            json!({"allow_customization": true, "shortcuts": shortcut_items(3)}),
        )
        .with_page(
            "Accounts",
            json!({
                "allow_customization": true,
                "charts": {"label": "Accounts Charts", "items": [{"label": "Profit and Loss"}]},
                "shortcuts": shortcut_items(2),
                "cards": {"items": [{"label": "Masters", "links": []}]},
            }),
        )
        .with_page("Manufacturing", json!({"cards": {"items": [{"label": "BOM"}]}}))
}

#[tokio::test]
async fn test_initial_page_defaults_to_first_module() {
    init_tracing();
    let api = standard_api();
    let mut desk = fresh_desktop();

    let outcome = desk.initialize(&api).await.expect("Initialization failed");

    assert_eq!(outcome, Some(PageOutcome::Rendered));
    assert_eq!(desk.current_page_name(), Some("Home"));
    assert_eq!(desk.route(), &Route::page("Home"));
    assert_eq!(desk.session().last_page(), Some("Home"));

    let sidebar = desk.sidebar().expect("Sidebar not built");
    let categories: Vec<_> = sidebar.sections().iter().map(|s| s.category).collect();
    assert_eq!(categories, vec![SidebarCategory::Modules, SidebarCategory::Domains]);
    assert_eq!(sidebar.selected(), Some("Home"));
}

#[tokio::test]
async fn test_initial_page_prefers_route_then_session() {
    let api = standard_api();

    let mut from_route = Desktop::new(
        DeskConfig::default(),
        SessionState::with_last_page("Accounts"),
        Route::parse("#workspace/Manufacturing"),
    );
    from_route.initialize(&api).await.unwrap();
    assert_eq!(from_route.current_page_name(), Some("Manufacturing"));

    let mut from_session = Desktop::new(
        DeskConfig::default(),
        SessionState::with_last_page("Accounts"),
        Route::workspace(),
    );
    from_session.initialize(&api).await.unwrap();
    assert_eq!(from_session.current_page_name(), Some("Accounts"));
}

#[tokio::test]
async fn test_shortcuts_only_page_renders_one_group() {
    let api = standard_api();
    let mut desk = fresh_desktop();
    desk.initialize(&api).await.unwrap();

    let page = desk.current_page().unwrap();
    assert_eq!(page.state(), &PageState::Rendered);
    assert_eq!(page.groups().len(), 1);

    let group = &page.groups()[0];
    assert_eq!(group.section(), SectionKind::Shortcuts);
    assert_eq!(group.columns(), 3);
    assert_eq!(group.widgets().len(), 3);
    assert_eq!(group.title(), "Your Shortcuts");
}

#[tokio::test]
async fn test_full_page_builds_groups_in_order() {
    let api = standard_api();
    let mut desk = fresh_desktop();
    desk.initialize(&api).await.unwrap();
    desk.open_page(&api, "Accounts").await;

    let page = desk.current_page().unwrap();
    let sections: Vec<_> = page.groups().iter().map(|g| g.section()).collect();
    assert_eq!(
        sections,
        vec![SectionKind::Charts, SectionKind::Shortcuts, SectionKind::Cards]
    );
    assert_eq!(page.groups()[0].title(), "Accounts Charts");
    assert_eq!(page.groups()[2].legend().len(), 3);
}

#[tokio::test]
async fn test_switching_pages_shows_exactly_one() {
    let api = standard_api();
    let mut desk = fresh_desktop();
    desk.initialize(&api).await.unwrap();

    desk.open_page(&api, "Accounts").await;
    assert_eq!(desk.visible_pages(), vec!["Accounts"]);
    assert!(!desk.page("Home").unwrap().is_visible());
    assert_eq!(desk.sidebar().unwrap().selected(), Some("Accounts"));
    assert_eq!(desk.session().last_page(), Some("Accounts"));
    assert_eq!(desk.route(), &Route::page("Accounts"));

    desk.open_page(&api, "Manufacturing").await;
    assert_eq!(desk.visible_pages(), vec!["Manufacturing"]);
}

#[tokio::test]
async fn test_revisiting_page_does_not_refetch() {
    let api = standard_api();
    let mut desk = fresh_desktop();
    desk.initialize(&api).await.unwrap();

    desk.open_page(&api, "Accounts").await;
    let revisit = desk.open_page(&api, "Home").await;

    assert_eq!(revisit, None);
    assert_eq!(api.fetches("Home"), 1);
    assert_eq!(api.fetches("Accounts"), 1);
    assert_eq!(desk.page_count(), 2);
}

#[tokio::test]
async fn test_customize_twice_transitions_once() {
    let api = standard_api();
    let mut desk = fresh_desktop();
    desk.initialize(&api).await.unwrap();

    assert_eq!(desk.customize(), Ok(true));
    assert_eq!(desk.customize(), Ok(false));
    assert!(desk.current_page().unwrap().is_customizing());
}

#[tokio::test]
async fn test_customize_rejected_when_not_allowed() {
    let api = standard_api();
    let mut desk = fresh_desktop();
    desk.initialize(&api).await.unwrap();
    desk.open_page(&api, "Manufacturing").await;

    assert_eq!(
        desk.customize(),
        Err(DeskError::CustomizationNotAllowed("Manufacturing".to_string()))
    );
}

#[tokio::test]
async fn test_save_sends_only_present_groups_and_reloads() {
    let api = standard_api();
    let mut desk = fresh_desktop();
    desk.initialize(&api).await.unwrap();
    desk.customize().unwrap();

    desk.current_page_mut()
        .unwrap()
        .group_mut(SectionKind::Shortcuts)
        .unwrap()
        .move_widget(2, 0)
        .unwrap();

    let outcome = desk.save_customization(&api).await.expect("Save failed");
    assert_eq!(outcome, PageOutcome::Rendered);

    let saved = api.saved.borrow();
    assert_eq!(saved.len(), 1);
    let (page, config) = &saved[0];
    assert_eq!(page, "Home");
    assert_eq!(config.kinds(), vec![SectionKind::Shortcuts]);

    let body = serde_json::to_value(config).unwrap();
    assert!(body.get("charts").is_none());
    assert!(body.get("cards").is_none());
    assert_eq!(body["shortcuts"][0]["label"], "Shortcut 2");
    assert_eq!(body["shortcuts"][0]["type"], "DocType");

    assert_eq!(api.fetches("Home"), 2);
    assert!(!desk.current_page().unwrap().is_customizing());
    assert_eq!(desk.take_notices(), vec![SAVED_NOTICE.to_string()]);
}

#[tokio::test]
async fn test_failed_save_stays_in_customize_mode() {
    let mut api = standard_api();
    api.reject_saves = true;
    let mut desk = fresh_desktop();
    desk.initialize(&api).await.unwrap();
    desk.customize().unwrap();

    let result = desk.save_customization(&api).await;

    assert!(matches!(result, Err(DeskError::Transport(_))));
    assert!(desk.current_page().unwrap().is_customizing());
    assert!(desk.take_notices().is_empty());
    assert_eq!(api.fetches("Home"), 1);
}

#[tokio::test]
async fn test_discard_refetches_canonical_layout() {
    let api = standard_api();
    let mut desk = fresh_desktop();
    desk.initialize(&api).await.unwrap();
    desk.customize().unwrap();

    let group = desk
        .current_page_mut()
        .unwrap()
        .group_mut(SectionKind::Shortcuts)
        .unwrap();
    group.remove_widget(0).unwrap();
    assert_eq!(group.widgets().len(), 2);

    assert_eq!(desk.discard(&api).await, Ok(PageOutcome::Rendered));

    let page = desk.current_page().unwrap();
    assert!(!page.is_customizing());
    assert_eq!(page.groups()[0].widgets().len(), 3);
    assert_eq!(api.fetches("Home"), 2);
    assert!(api.saved.borrow().is_empty());
}

#[tokio::test]
async fn test_missing_page_clears_session_and_route() {
    let api = standard_api();
    let mut desk = Desktop::new(
        DeskConfig::default(),
        SessionState::with_last_page("Deleted Workspace"),
        Route::workspace(),
    );

    let outcome = desk.initialize(&api).await.unwrap();

    assert_eq!(outcome, Some(PageOutcome::Missing));
    assert_eq!(desk.session(), &SessionState::default());
    assert_eq!(desk.route(), &Route::workspace());
    assert!(desk.current_page().is_none());
    assert!(desk.page("Deleted Workspace").is_none());

    let follow = desk.navigate(&api, Route::workspace()).await;
    assert_eq!(follow, Some(PageOutcome::Rendered));
    assert_eq!(desk.current_page_name(), Some("Home"));
}

#[tokio::test]
async fn test_sidebar_unavailable_is_fatal() {
    let api = FakeDeskApi::default();
    let mut desk = fresh_desktop();

    let err = desk.initialize(&api).await.unwrap_err();

    assert_eq!(err, DeskError::SidebarUnavailable);
    assert_eq!(
        ErrorDialog::for_error(&err).primary_action,
        Some(DialogAction::Reload)
    );
    assert_eq!(desk.page_count(), 0);
}

#[tokio::test]
async fn test_transport_errors_are_retried_then_reported() {
    let api = standard_api();
    *api.failures_left.borrow_mut() = 1;
    let mut desk = fresh_desktop();

    assert_eq!(desk.initialize(&api).await.unwrap(), Some(PageOutcome::Rendered));
    assert_eq!(api.fetches("Home"), 2);

    *api.failures_left.borrow_mut() = 5;
    let outcome = desk.open_page(&api, "Accounts").await.unwrap();
    assert!(matches!(outcome, PageOutcome::Failed(DeskError::Transport(_))));
    assert!(matches!(
        desk.current_page().unwrap().state(),
        PageState::Failed(_)
    ));

    *api.failures_left.borrow_mut() = 0;
    assert_eq!(desk.reload(&api).await, Ok(PageOutcome::Rendered));
}

#[tokio::test]
async fn test_stale_response_is_discarded_after_rapid_reload() {
    let api = standard_api();
    let mut desk = fresh_desktop();
    desk.initialize(&api).await.unwrap();

    let first = desk.reload_current().unwrap();
    let second = desk.reload_current().unwrap();

    let old_data = api.get_desktop_page("Accounts").await;
    assert_eq!(desk.complete_page_fetch(first, old_data), PageOutcome::Stale);
    assert_eq!(desk.current_page().unwrap().state(), &PageState::Loading);

    let data = api.get_desktop_page("Home").await;
    assert_eq!(desk.complete_page_fetch(second, data), PageOutcome::Rendered);
    assert_eq!(
        desk.current_page().unwrap().groups()[0].section(),
        SectionKind::Shortcuts
    );
}

#[tokio::test]
async fn test_late_missing_response_for_hidden_page_is_ignored_for_navigation() {
    let api = standard_api();
    let mut desk = fresh_desktop();
    desk.initialize(&api).await.unwrap();

    let gone = desk.show_page("Retired").expect("New page should need a fetch");
    desk.open_page(&api, "Accounts").await;

    let outcome = desk.complete_page_fetch(gone, Ok(None));
    assert_eq!(outcome, PageOutcome::Missing);
    assert_eq!(desk.current_page_name(), Some("Accounts"));
    assert_eq!(desk.session().last_page(), Some("Accounts"));
    assert_eq!(desk.route(), &Route::page("Accounts"));
}

#[tokio::test]
async fn test_layout_change_refreshes_and_close_unsubscribes() {
    let api = standard_api();
    let mut desk = fresh_desktop();
    desk.initialize(&api).await.unwrap();
    desk.open_page(&api, "Accounts").await;

    let before = desk.current_page().unwrap().render_revision();
    assert_eq!(desk.notify_layout_change(LayoutChange::FullWidthToggled), 2);
    assert!(desk.current_page().unwrap().render_revision() > before);
    assert_eq!(api.fetches("Accounts"), 1);

    assert!(desk.close_page("Home"));
    assert_eq!(desk.layout_notifier().subscriber_count(), 1);
    assert_eq!(desk.notify_layout_change(LayoutChange::Resized), 1);
}

#[tokio::test]
async fn test_response_for_closed_page_is_dropped() {
    let api = standard_api();
    let mut desk = fresh_desktop();
    desk.initialize(&api).await.unwrap();

    let ticket = desk.show_page("Accounts").expect("New page should need a fetch");
    assert!(desk.close_page("Accounts"));

    let data = api.get_desktop_page("Accounts").await;
    assert_eq!(desk.complete_page_fetch(ticket, data), PageOutcome::Stale);
    assert!(desk.page("Accounts").is_none());
}

#[tokio::test]
async fn test_late_response_does_not_land_on_reopened_page() {
    let api = standard_api();
    let mut desk = fresh_desktop();
    desk.initialize(&api).await.unwrap();

    let old = desk.show_page("Accounts").expect("New page should need a fetch");
    assert!(desk.close_page("Accounts"));
    let fresh = desk.show_page("Accounts").expect("Reopened page should need a fetch");
    assert_ne!(old.generation(), fresh.generation());

    let late = api.get_desktop_page("Manufacturing").await;
    assert_eq!(desk.complete_page_fetch(old, late), PageOutcome::Stale);
    assert_eq!(desk.current_page().unwrap().state(), &PageState::Loading);

    let data = api.get_desktop_page("Accounts").await;
    assert_eq!(desk.complete_page_fetch(fresh, data), PageOutcome::Rendered);
    assert_eq!(desk.current_page().unwrap().groups().len(), 3);
}

#[tokio::test]
async fn test_missing_page_reopened_ignores_late_response() {
    let api = standard_api();
    let mut desk = fresh_desktop();
    desk.initialize(&api).await.unwrap();

    let first = desk.show_page("Retired").expect("New page should need a fetch");
    let duplicate = first.clone();
    assert_eq!(desk.complete_page_fetch(first, Ok(None)), PageOutcome::Missing);
    assert!(desk.page("Retired").is_none());

    let reopened = desk.show_page("Retired").expect("Evicted page should be recreated");
    assert!(reopened.generation() > duplicate.generation());

    let late = api.get_desktop_page("Home").await;
    assert_eq!(desk.complete_page_fetch(duplicate, late), PageOutcome::Stale);
    assert_eq!(desk.page("Retired").unwrap().state(), &PageState::Loading);
}

#[tokio::test]
async fn test_mobile_disables_sorting() {
    let api = standard_api();
    let config = DeskConfig {
        is_mobile: true,
        ..DeskConfig::default()
    };
    let mut desk = Desktop::new(config, SessionState::default(), Route::workspace());
    desk.initialize(&api).await.unwrap();

    let options = desk.current_page().unwrap().groups()[0].options();
    assert!(!options.allow_sorting);
    assert!(options.allow_create);
}

#[test]
fn test_sidebar_fixture_decodes() {
    let config = sidebar();
    assert!(config.contains_page("Manufacturing"));
    assert_eq!(
        config.items(SidebarCategory::Modules).unwrap(),
        &[SidebarItem::new("Home"), SidebarItem::new("Accounts")]
    );
}
