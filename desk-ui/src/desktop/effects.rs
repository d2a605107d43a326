use desk_core::{DeskApi, Desktop, ErrorDialog, PageOutcome, PageTicket};
use dioxus::prelude::{ReadableExt, Signal, WritableExt};
use dioxus_logger::tracing::{debug, info, warn};

use crate::api::HttpDeskApi;

pub async fn initialize_desk(
    mut desk: Signal<Desktop>,
    mut fatal: Signal<Option<ErrorDialog>>,
    page_error: Signal<Option<ErrorDialog>>,
) {
    if desk.read().is_initialized() {
        return;
    }

    let api = HttpDeskApi;
    let retry = desk.read().retry_policy();
    let result = retry
        .run("get_desk_sidebar_items", || api.get_desk_sidebar_items())
        .await;

    let applied = desk.write().apply_sidebar(result);
    match applied {
        Ok(Some(ticket)) => load_page(desk, page_error, ticket).await,
        Ok(None) => {}
        Err(e) => fatal.set(Some(ErrorDialog::for_error(&e))),
    }
}

/// Fetch the page named by `ticket` and hand the result back to the desk
pub async fn load_page(
    mut desk: Signal<Desktop>,
    mut page_error: Signal<Option<ErrorDialog>>,
    ticket: PageTicket,
) {
    let api = HttpDeskApi;
    let retry = desk.read().retry_policy();
    let result = retry
        .run("get_desktop_page", || api.get_desktop_page(ticket.page()))
        .await;

    let page = ticket.page().to_string();
    let outcome = desk.write().complete_page_fetch(ticket, result);
    match outcome {
        PageOutcome::Rendered => info!("Rendered desk page {}", page),
        PageOutcome::Missing => warn!("Desk page {} no longer exists", page),
        PageOutcome::Stale => debug!("Ignored stale response for {}", page),
        PageOutcome::Failed(e) => page_error.set(Some(ErrorDialog::for_error(&e))),
    }
}

pub async fn save_customization(
    mut desk: Signal<Desktop>,
    mut page_error: Signal<Option<ErrorDialog>>,
    mut notices: Signal<Vec<String>>,
) {
    let ticket = match desk.read().begin_save() {
        Ok(ticket) => ticket,
        Err(e) => {
            page_error.set(Some(ErrorDialog::for_error(&e)));
            return;
        }
    };

    let api = HttpDeskApi;
    let result = api.save_customization(ticket.page(), ticket.config()).await;

    let finished = desk.write().finish_save(ticket, result);
    let fresh = desk.write().take_notices();
    notices.write().extend(fresh);

    match finished {
        Ok(Some(reload)) => load_page(desk, page_error, reload).await,
        Ok(None) => debug!("Page changed while saving, skipping reload"),
        Err(e) => page_error.set(Some(ErrorDialog::for_error(&e))),
    }
}

pub async fn discard(mut desk: Signal<Desktop>, mut page_error: Signal<Option<ErrorDialog>>) {
    let ticket = desk.write().discard_customization();
    match ticket {
        Ok(ticket) => load_page(desk, page_error, ticket).await,
        Err(e) => page_error.set(Some(ErrorDialog::for_error(&e))),
    }
}

pub async fn reload_current(mut desk: Signal<Desktop>, mut page_error: Signal<Option<ErrorDialog>>) {
    let ticket = desk.write().reload_current();
    match ticket {
        Ok(ticket) => load_page(desk, page_error, ticket).await,
        Err(e) => page_error.set(Some(ErrorDialog::for_error(&e))),
    }
}
