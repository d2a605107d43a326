//! Desk shell: sidebar, page area and the browser plumbing around them

use desk_core::{DeskConfig, Desktop, DialogAction, ErrorDialog, LayoutChange, Route};
use dioxus::prelude::*;

use crate::components::{ErrorDialogView, LoadingState, NoticeToast, DEFAULT_TOKENS};
use crate::interop::{
    current_route, is_mobile_viewport, load_session, on_hash_change, on_resize, persist_session,
    reload_document, set_route,
};

mod effects;
pub mod page;
pub mod sidebar;

pub use page::{GroupEdit, PageView, WidgetGroupView};
pub use sidebar::SidebarView;

fn browser_config() -> DeskConfig {
    DeskConfig {
        is_mobile: is_mobile_viewport(),
        ..DeskConfig::default()
    }
}

#[component]
pub fn DeskView() -> Element {
    let mut desk = use_signal(|| Desktop::new(browser_config(), load_session(), current_route()));
    let mut fatal = use_signal(|| None::<ErrorDialog>);
    let mut page_error = use_signal(|| None::<ErrorDialog>);
    let mut notices = use_signal(Vec::<String>::new);
    let mut pending_route = use_signal(|| None::<Route>);
    let mut full_width = use_signal(|| false);

    use_effect(move || {
        spawn(async move {
            effects::initialize_desk(desk, fatal, page_error).await;
        });
    });

    use_effect(move || {
        on_hash_change(move |route| pending_route.set(Some(route)));
        on_resize(move || {
            desk.write().notify_layout_change(LayoutChange::Resized);
        });
    });

    // Hash changes from the browser (back/forward, typed URLs)
    use_effect(move || {
        let Some(route) = pending_route() else {
            return;
        };
        pending_route.set(None);

        let ticket = desk.write().follow_route(route);
        if let Some(ticket) = ticket {
            spawn(effects::load_page(desk, page_error, ticket));
        }
    });

    // Mirror navigation into localStorage and the location hash
    use_effect(move || {
        let desk = desk.read();
        persist_session(desk.session());
        if desk.is_initialized() {
            set_route(desk.route());
        }
    });

    let desk_ref = desk.read();
    let sidebar = desk_ref.sidebar().cloned();
    let page_names: Vec<String> = desk_ref.pages().iter().map(|p| p.name().to_string()).collect();
    let has_current = desk_ref.current_page().is_some();
    drop(desk_ref);

    let container_style = if full_width() {
        "display: flex; min-height: 100vh; width: 100%;"
    } else {
        "display: flex; min-height: 100vh; max-width: 1200px; margin: 0 auto;"
    };

    rsx! {
        style { {DEFAULT_TOKENS} }

        div {
            class: "desk-container",
            style: "{container_style}",

            if let Some(sidebar) = sidebar {
                SidebarView {
                    sidebar,
                    on_select: move |name: String| {
                        let ticket = desk.write().show_page(&name);
                        if let Some(ticket) = ticket {
                            spawn(effects::load_page(desk, page_error, ticket));
                        }
                    },
                }
            }

            main {
                class: "desk-body",
                style: "flex: 1; min-width: 0;",

                div {
                    style: "display: flex; justify-content: flex-end; padding: 0.5rem 1.5rem 0;",
                    button {
                        class: "btn-secondary",
                        style: "padding: 0.25rem 0.6rem; font-size: 0.75rem; background: transparent; color: var(--text-muted); border: 1px solid var(--border-color); border-radius: var(--radius-sm); cursor: pointer;",
                        onclick: move |_| {
                            full_width.toggle();
                            desk.write().notify_layout_change(LayoutChange::FullWidthToggled);
                        },
                        if full_width() { "Fixed Width" } else { "Full Width" }
                    }
                }

                if fatal.read().is_none() && !has_current && page_names.is_empty() {
                    LoadingState { label: "Loading desk..." }
                }

                for name in page_names {
                    PageView {
                        key: "{name}",
                        name: name.clone(),
                        desk,
                        page_error,
                        notices,
                    }
                }
            }
        }

        if let Some(dialog) = fatal() {
            ErrorDialogView {
                dialog,
                on_action: move |action: DialogAction| match action {
                    DialogAction::Reload => reload_document(),
                    DialogAction::Retry => {
                        fatal.set(None);
                        spawn(effects::initialize_desk(desk, fatal, page_error));
                    }
                },
                on_dismiss: move |_| fatal.set(None),
            }
        } else if let Some(dialog) = page_error() {
            ErrorDialogView {
                dialog,
                on_action: move |action: DialogAction| {
                    page_error.set(None);
                    match action {
                        DialogAction::Retry => {
                            spawn(effects::reload_current(desk, page_error));
                        }
                        DialogAction::Reload => reload_document(),
                    }
                },
                on_dismiss: move |_| page_error.set(None),
            }
        }

        for (i, message) in notices().into_iter().enumerate() {
            NoticeToast {
                key: "{i}-{message}",
                message,
                on_expire: move |_| {
                    let mut queue = notices.write();
                    if !queue.is_empty() {
                        queue.remove(0);
                    }
                },
            }
        }
    }
}
