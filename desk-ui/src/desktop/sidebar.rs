use desk_core::Sidebar;
use dioxus::prelude::*;

use crate::interop::hash_for_route;

#[component]
pub fn SidebarView(sidebar: Sidebar, on_select: Callback<String>) -> Element {
    rsx! {
        nav {
            class: "desk-sidebar",
            style: "width: 14rem; flex-shrink: 0; padding: 1rem 0.5rem; background: var(--sidebar-bg); border-right: 1px solid var(--border-color); overflow-y: auto;",

            for section in sidebar.sections().iter() {
                div {
                    key: "{section.category}",
                    class: "sidebar-section",
                    style: "margin-bottom: 1rem;",

                    div {
                        class: "sidebar-label",
                        style: "padding: 0 0.5rem 0.25rem; font-size: 0.7rem; text-transform: uppercase; letter-spacing: 0.05em; color: var(--text-muted);",
                        "{section.category}"
                    }

                    for entry in section.entries.iter() {
                        {
                            let name = entry.name.clone();
                            let href = hash_for_route(&entry.route);
                            let class = if entry.selected { "sidebar-item selected" } else { "sidebar-item" };
                            rsx! {
                                a {
                                    key: "{entry.name}",
                                    class: "{class}",
                                    href: "{href}",
                                    style: "display: block; padding: 0.35rem 0.5rem; border-radius: var(--radius-sm); color: inherit; text-decoration: none; font-size: 0.875rem;",
                                    onclick: move |evt| {
                                        evt.prevent_default();
                                        on_select.call(name.clone());
                                    },
                                    "{entry.name}"
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}
