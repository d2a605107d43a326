//! A single desk page: customize toolbar plus its widget groups

use desk_core::{DeskError, Desktop, ErrorDialog, PageState, WidgetGroup, WidgetKind};
use dioxus::prelude::*;
use shared_types::{SectionKind, Widget};

use crate::components::LoadingState;
use crate::desktop::effects;
use crate::interop::prompt_text;

/// An edit made from a widget group's toolbar while customizing
#[derive(Debug, Clone, PartialEq)]
pub enum GroupEdit {
    Move { from: usize, to: usize },
    Remove(usize),
    ToggleHidden(usize),
    Rename { index: usize, label: String },
    Add(Widget),
}

impl GroupEdit {
    pub fn apply(self, group: &mut WidgetGroup) -> Result<(), DeskError> {
        match self {
            GroupEdit::Move { from, to } => group.move_widget(from, to),
            GroupEdit::Remove(index) => group.remove_widget(index).map(|_| ()),
            GroupEdit::ToggleHidden(index) => {
                let hidden = group
                    .widgets()
                    .get(index)
                    .map(|w| w.hidden)
                    .ok_or_else(|| DeskError::WidgetEdit(format!("no widget at {index}")))?;
                group.set_hidden(index, !hidden)
            }
            GroupEdit::Rename { index, label } => {
                let mut widget = group
                    .widgets()
                    .get(index)
                    .cloned()
                    .ok_or_else(|| DeskError::WidgetEdit(format!("no widget at {index}")))?;
                widget.label = Some(label);
                group.update_widget(index, widget)
            }
            GroupEdit::Add(widget) => group.add_widget(widget),
        }
    }
}

fn apply_edit(mut desk: Signal<Desktop>, section: SectionKind, edit: GroupEdit) -> Result<(), DeskError> {
    let mut desk = desk.write();
    let page = desk
        .current_page_mut()
        .ok_or_else(|| DeskError::UnknownPage(String::new()))?;
    let group = page
        .group_mut(section)
        .ok_or_else(|| DeskError::WidgetEdit(format!("page has no {} section", section.key())))?;
    edit.apply(group)
}

#[component]
pub fn PageView(
    name: String,
    desk: Signal<Desktop>,
    page_error: Signal<Option<ErrorDialog>>,
    notices: Signal<Vec<String>>,
) -> Element {
    let desk_ref = desk.read();
    let Some(page) = desk_ref.page(&name) else {
        return rsx! {};
    };

    let display = if page.is_visible() { "block" } else { "none" };
    let customizing = page.is_customizing();
    let can_customize = page.allow_customization() && matches!(page.state(), PageState::Rendered);
    let sections: Vec<SectionKind> = page.groups().iter().map(|g| g.section()).collect();
    let revision = page.render_revision();
    let state = page.state().clone();
    drop(desk_ref);

    let mut page_error_for_customize = page_error;

    rsx! {
        div {
            class: "desk-page",
            "data-page": "{name}",
            style: "display: {display}; padding: 1.5rem;",

            div {
                class: "desk-page-header",
                style: "display: flex; align-items: center; justify-content: space-between; margin-bottom: 1rem;",
                h2 { style: "margin: 0; font-size: 1.25rem;", "{name}" }

                if customizing {
                    div {
                        class: "customize-options",
                        style: "display: flex; gap: 0.5rem;",
                        button {
                            class: "btn-primary",
                            style: "padding: 0.35rem 0.8rem; background: var(--accent-bg); color: var(--accent-text); border: none; border-radius: var(--radius-md); cursor: pointer;",
                            onclick: move |_| {
                                spawn(effects::save_customization(desk, page_error, notices));
                            },
                            "Save"
                        }
                        button {
                            class: "btn-secondary",
                            style: "padding: 0.35rem 0.8rem; background: transparent; color: var(--text-secondary); border: 1px solid var(--border-color); border-radius: var(--radius-md); cursor: pointer;",
                            onclick: move |_| {
                                spawn(effects::discard(desk, page_error));
                            },
                            "Discard"
                        }
                    }
                } else if can_customize {
                    a {
                        class: "customize-link",
                        href: "#",
                        style: "font-size: 0.8rem; color: var(--text-muted);",
                        onclick: move |evt| {
                            evt.prevent_default();
                            let result = desk.write().customize();
                            if let Err(e) = result {
                                page_error_for_customize.set(Some(ErrorDialog::for_error(&e)));
                            }
                        },
                        "Customize Workspace"
                    }
                }
            }

            match state {
                PageState::Loading => rsx! { LoadingState { label: "Loading..." } },
                PageState::Failed(message) => rsx! {
                    div {
                        class: "desk-page-failed",
                        style: "padding: 2rem; text-align: center; color: var(--text-secondary);",
                        p { "{message}" }
                        button {
                            class: "btn-secondary",
                            style: "padding: 0.35rem 0.8rem; border: 1px solid var(--border-color); border-radius: var(--radius-md); background: transparent; cursor: pointer;",
                            onclick: move |_| {
                                spawn(effects::reload_current(desk, page_error));
                            },
                            "Retry"
                        }
                    }
                },
                PageState::Missing => rsx! {},
                PageState::Rendered | PageState::Customizing => rsx! {
                    for section in sections {
                        WidgetGroupView {
                            key: "{name}-{section:?}-{revision}",
                            page: name.clone(),
                            section,
                            desk,
                            page_error,
                        }
                    }
                },
            }
        }
    }
}

#[component]
pub fn WidgetGroupView(
    page: String,
    section: SectionKind,
    desk: Signal<Desktop>,
    page_error: Signal<Option<ErrorDialog>>,
) -> Element {
    let group = desk
        .read()
        .page(&page)
        .and_then(|p| p.groups().iter().find(|g| g.section() == section).cloned());
    let Some(group) = group else {
        return rsx! {};
    };

    let mut page_error = page_error;
    let mut edit = move |edit: GroupEdit| {
        if let Err(e) = apply_edit(desk, section, edit) {
            page_error.set(Some(ErrorDialog::for_error(&e)));
        }
    };

    let options = group.options();
    let editing = group.is_editing();
    let count = group.widgets().len();
    let group_class = if editing { "widget-group editing" } else { "widget-group" };
    let columns = group.columns();
    let kind = group.kind().as_str();
    let title = group.title().to_string();
    let is_links = group.kind() == WidgetKind::Links;

    rsx! {
        section {
            class: "{group_class}",
            "data-kind": "{kind}",
            style: "margin-bottom: 1.5rem;",

            div {
                style: "display: flex; align-items: center; justify-content: space-between; margin-bottom: 0.5rem;",
                h3 { style: "margin: 0; font-size: 0.95rem; color: var(--text-secondary);", "{title}" }
                if editing && options.allow_create {
                    button {
                        class: "btn-secondary",
                        style: "padding: 0.2rem 0.6rem; font-size: 0.75rem; border: 1px solid var(--border-color); border-radius: var(--radius-sm); background: transparent; cursor: pointer;",
                        onclick: move |_| {
                            if let Some(label) = prompt_text("Label") {
                                edit(GroupEdit::Add(Widget::labeled(label)));
                            }
                        },
                        "+ Add"
                    }
                }
            }

            div {
                class: "widget-grid",
                style: "display: grid; grid-template-columns: repeat({columns}, minmax(0, 1fr)); gap: 0.75rem;",

                for (index, widget) in group.widgets().iter().enumerate().filter(|(_, w)| editing || !w.hidden) {
                    div {
                        key: "{index}",
                        class: if widget.hidden { "widget hidden-widget" } else { "widget" },
                        style: "padding: 0.75rem 1rem; background: var(--window-bg); border: 1px solid var(--border-color); border-radius: var(--radius-md); box-shadow: var(--shadow-sm);",

                        div { style: "font-weight: 500;", {widget.label.clone().unwrap_or_else(|| "Untitled".to_string())} }

                        if is_links {
                            WidgetLinks { widget: widget.clone() }
                        }

                        if editing {
                            div {
                                class: "widget-controls",
                                style: "display: flex; gap: 0.25rem; margin-top: 0.5rem; font-size: 0.75rem;",
                                if options.allow_sorting && index > 0 {
                                    button { onclick: move |_| edit(GroupEdit::Move { from: index, to: index - 1 }), "←" }
                                }
                                if options.allow_sorting && index + 1 < count {
                                    button { onclick: move |_| edit(GroupEdit::Move { from: index, to: index + 1 }), "→" }
                                }
                                if options.allow_hiding {
                                    button {
                                        onclick: move |_| edit(GroupEdit::ToggleHidden(index)),
                                        if widget.hidden { "Show" } else { "Hide" }
                                    }
                                }
                                if options.allow_edit {
                                    button {
                                        onclick: move |_| {
                                            if let Some(label) = prompt_text("Label") {
                                                edit(GroupEdit::Rename { index, label });
                                            }
                                        },
                                        "Edit"
                                    }
                                }
                                if options.allow_delete {
                                    button { onclick: move |_| edit(GroupEdit::Remove(index)), "Remove" }
                                }
                            }
                        }
                    }
                }
            }

            if is_links {
                div {
                    class: "legend",
                    style: "display: flex; gap: 1rem; margin-top: 0.75rem; font-size: 0.75rem; color: var(--text-muted);",
                    for item in group.legend().iter() {
                        div {
                            key: "{item.color}",
                            class: "legend-item",
                            style: "display: flex; align-items: center; gap: 0.35rem;",
                            span {
                                class: "indicator {item.color}",
                                style: "display: inline-block; width: 0.5rem; height: 0.5rem; border-radius: 50%; background: var(--indicator-{item.color});",
                            }
                            "{item.description}"
                        }
                    }
                }
            }
        }
    }
}

/// Link list carried by a card widget
#[component]
fn WidgetLinks(widget: Widget) -> Element {
    let links: Vec<String> = widget
        .extra
        .get("links")
        .and_then(|links| links.as_array())
        .map(|links| {
            links
                .iter()
                .filter_map(|link| link.get("label").and_then(|l| l.as_str()))
                .map(ToString::to_string)
                .collect()
        })
        .unwrap_or_default();

    rsx! {
        ul {
            style: "margin: 0.5rem 0 0; padding-left: 1rem; font-size: 0.8rem; color: var(--text-secondary);",
            for (i, link) in links.iter().enumerate() {
                li { key: "{i}", "{link}" }
            }
        }
    }
}
