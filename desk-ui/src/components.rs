use desk_core::{DialogAction, ErrorDialog};
use dioxus::prelude::*;
use gloo_timers::future::TimeoutFuture;

const NOTICE_TIMEOUT_MS: u32 = 3_000;

#[component]
pub fn LoadingState(label: String) -> Element {
    rsx! {
        div {
            class: "desk-loading",
            style: "display: flex; align-items: center; justify-content: center; padding: 3rem; color: var(--text-muted, #6b7280);",
            "{label}"
        }
    }
}

/// Blocking dialog; the primary action decides what dismissing it does
#[component]
pub fn ErrorDialogView(dialog: ErrorDialog, on_action: Callback<DialogAction>, on_dismiss: Callback<()>) -> Element {
    rsx! {
        div {
            class: "desk-modal-backdrop",
            style: "position: fixed; inset: 0; z-index: 100; display: flex; align-items: center; justify-content: center; background: rgba(0, 0, 0, 0.5);",

            div {
                class: "desk-modal",
                role: "alertdialog",
                style: "width: min(28rem, 90vw); background: var(--window-bg, #1f2937); border: 1px solid var(--border-color, #374151); border-top: 4px solid var(--danger-bg, #ef4444); border-radius: var(--radius-lg, 12px); box-shadow: var(--shadow-lg); padding: 1.25rem;",

                h3 { style: "margin: 0 0 0.75rem; font-size: 1rem;", "{dialog.title}" }
                p { style: "margin: 0 0 1.25rem; font-size: 0.875rem; color: var(--text-secondary, #9ca3af);", "{dialog.message}" }

                div {
                    style: "display: flex; justify-content: flex-end; gap: 0.5rem;",
                    button {
                        class: "btn-secondary",
                        style: "padding: 0.4rem 0.9rem; background: transparent; color: var(--text-secondary); border: 1px solid var(--border-color); border-radius: var(--radius-md, 8px); cursor: pointer;",
                        onclick: move |_| on_dismiss.call(()),
                        "Close"
                    }
                    if let Some(action) = dialog.primary_action {
                        button {
                            class: "btn-primary",
                            style: "padding: 0.4rem 0.9rem; background: var(--accent-bg, #3b82f6); color: var(--accent-text, white); border: none; border-radius: var(--radius-md, 8px); cursor: pointer;",
                            onclick: move |_| on_action.call(action),
                            "{action.label()}"
                        }
                    }
                }
            }
        }
    }
}

/// Transient message, dismissed after a few seconds
#[component]
pub fn NoticeToast(message: String, on_expire: Callback<()>) -> Element {
    use_effect(move || {
        spawn(async move {
            TimeoutFuture::new(NOTICE_TIMEOUT_MS).await;
            on_expire.call(());
        });
    });

    rsx! {
        div {
            class: "desk-notice",
            style: "position: fixed; right: 1.5rem; bottom: 1.5rem; z-index: 90; padding: 0.75rem 1rem; background: var(--success-bg, #10b981); color: white; border-radius: var(--radius-md, 8px); box-shadow: var(--shadow-md); font-size: 0.875rem;",
            "{message}"
        }
    }
}

// ============================================================================
// Default CSS Tokens
// ============================================================================

pub const DEFAULT_TOKENS: &str = r#"
:root {
    --bg-primary: #f8fafc;
    --bg-secondary: #ffffff;
    --text-primary: #0f172a;
    --text-secondary: #475569;
    --text-muted: #64748b;
    --accent-bg: #2563eb;
    --accent-text: #ffffff;
    --border-color: #cbd5e1;
    --window-bg: var(--bg-secondary);
    --sidebar-bg: #f1f5f9;
    --hover-bg: rgba(15, 23, 42, 0.08);
    --selected-bg: rgba(37, 99, 235, 0.12);
    --danger-bg: #dc2626;
    --success-bg: #059669;

    --indicator-blue: #3b82f6;
    --indicator-orange: #f59e0b;
    --indicator-red: #ef4444;

    --radius-sm: 4px;
    --radius-md: 8px;
    --radius-lg: 12px;

    --shadow-sm: 0 1px 2px rgba(0, 0, 0, 0.1);
    --shadow-md: 0 4px 6px rgba(0, 0, 0, 0.15);
    --shadow-lg: 0 10px 40px rgba(0, 0, 0, 0.2);
}

* {
    box-sizing: border-box;
}

body {
    margin: 0;
    padding: 0;
    font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
    background: var(--bg-primary);
    color: var(--text-primary);
}

.sidebar-item:hover {
    background: var(--hover-bg);
}

.sidebar-item.selected {
    background: var(--selected-bg);
    font-weight: 600;
}

.widget-group.editing .widget {
    cursor: grab;
    outline: 1px dashed var(--border-color);
}

.widget.hidden-widget {
    opacity: 0.45;
}

.customize-options span {
    cursor: pointer;
}

@media (max-width: 768px) {
    .desk-container {
        flex-direction: column !important;
    }

    .desk-sidebar {
        width: 100% !important;
    }

    .widget-grid {
        grid-template-columns: 1fr !important;
    }
}
"#;
