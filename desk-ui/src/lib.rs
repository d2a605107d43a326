//! Dioxus web front-end for the workspace desk

pub mod api;
pub mod components;
pub mod desktop;
pub mod interop;

pub use api::HttpDeskApi;
pub use components::*;
pub use desktop::*;
