//! Workspace desk controller
//!
//! UI-agnostic state for the desk: the sidebar, the registry of loaded
//! pages, initial-page resolution and the customize/save/discard cycle.
//! Front-ends drive it either through the sans-IO `begin_*`/`finish_*`
//! pairs or through the async helpers that take a [`DeskApi`].

pub mod api;
pub mod config;
pub mod desktop;
pub mod error;
pub mod layout;
pub mod page;
pub mod route;
pub mod session;
pub mod sidebar;
pub mod widget;

pub use api::{DeskApi, RetryPolicy};
pub use config::DeskConfig;
pub use desktop::{Desktop, SAVED_NOTICE};
pub use error::{DeskError, DialogAction, ErrorDialog};
pub use layout::{LayoutChange, LayoutNotifier, LayoutSubscription};
pub use page::{DesktopPage, GenerationSource, PageOutcome, PageState, PageTicket, SaveTicket};
pub use route::Route;
pub use session::SessionState;
pub use sidebar::{Sidebar, SidebarEntry, SidebarSection};
pub use widget::{WidgetGroup, WidgetGroupOptions, WidgetKind};
