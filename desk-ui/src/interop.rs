//! Browser glue: localStorage, the location hash and window events

use desk_core::{Route, SessionState};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::window;

/// localStorage key holding the last visited page
pub const LAST_PAGE_KEY: &str = "current_desk_page";

/// Viewports narrower than this get the mobile layout
pub const MOBILE_BREAKPOINT_PX: u32 = 768;

fn local_storage() -> Option<web_sys::Storage> {
    window().and_then(|w| w.local_storage().ok().flatten())
}

pub fn session_from_stored(stored: Option<String>) -> SessionState {
    match stored.map(|s| s.trim().to_string()) {
        Some(page) if !page.is_empty() => SessionState::with_last_page(page),
        _ => SessionState::default(),
    }
}

pub fn load_session() -> SessionState {
    session_from_stored(local_storage().and_then(|s| s.get_item(LAST_PAGE_KEY).ok().flatten()))
}

pub fn persist_session(session: &SessionState) {
    let Some(storage) = local_storage() else {
        return;
    };

    let result = match session.last_page() {
        Some(page) => storage.set_item(LAST_PAGE_KEY, page),
        None => storage.remove_item(LAST_PAGE_KEY),
    };
    if result.is_err() {
        dioxus_logger::tracing::warn!("Failed to persist desk session state");
    }
}

/// Route from the current location hash, segments URI-decoded
pub fn current_route() -> Route {
    let hash = window()
        .and_then(|w| w.location().hash().ok())
        .unwrap_or_default();
    route_from_hash(&hash)
}

pub fn route_from_hash(hash: &str) -> Route {
    let decoded: Vec<String> = hash
        .trim_start_matches('#')
        .split('/')
        .map(|segment| {
            js_sys::decode_uri_component(segment)
                .map(String::from)
                .unwrap_or_else(|_| segment.to_string())
        })
        .collect();
    Route::parse(&decoded.join("/"))
}

pub fn hash_for_route(route: &Route) -> String {
    let encoded: Vec<String> = route
        .segments()
        .iter()
        .map(|segment| String::from(js_sys::encode_uri_component(segment)))
        .collect();
    format!("#{}", encoded.join("/"))
}

/// Point the location hash at `route`; no-op when it already does
pub fn set_route(route: &Route) {
    let Some(location) = window().map(|w| w.location()) else {
        return;
    };
    let target = hash_for_route(route);
    if location.hash().ok().as_deref() == Some(target.as_str()) {
        return;
    }
    if let Err(e) = location.set_hash(&target) {
        dioxus_logger::tracing::warn!("Failed to update route: {:?}", e);
    }
}

/// Call `on_change` with the new route whenever the hash changes
pub fn on_hash_change(mut on_change: impl FnMut(Route) + 'static) {
    listen_window("hashchange", move || on_change(current_route()));
}

pub fn on_resize(on_resize: impl FnMut() + 'static) {
    listen_window("resize", on_resize);
}

fn listen_window(event: &str, mut handler: impl FnMut() + 'static) {
    let Some(window) = window() else {
        return;
    };

    let closure = Closure::wrap(Box::new(move |_e: web_sys::Event| handler()) as Box<dyn FnMut(web_sys::Event)>);
    if let Err(e) = window.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref()) {
        dioxus_logger::tracing::error!("Failed to add {} listener: {:?}", event, e);
        return;
    }
    // Listeners live as long as the document
    closure.forget();
}

pub fn is_mobile_viewport() -> bool {
    window()
        .and_then(|w| w.inner_width().ok())
        .and_then(|width| width.as_f64())
        .map(|width| (width as u32) < MOBILE_BREAKPOINT_PX)
        .unwrap_or(false)
}

/// Ask the user for a single line of text; `None` when cancelled or blank
pub fn prompt_text(message: &str) -> Option<String> {
    let answer = window()?.prompt_with_message(message).ok().flatten()?;
    let answer = answer.trim();
    (!answer.is_empty()).then(|| answer.to_string())
}

pub fn reload_document() {
    if let Some(window) = window() {
        if let Err(e) = window.location().reload() {
            dioxus_logger::tracing::error!("Failed to reload: {:?}", e);
        }
    }
}
