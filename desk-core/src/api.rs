//! Server calls the desk depends on
//!
//! The transport is supplied by the embedding front-end (HTTP in the
//! browser, an in-memory fake in tests). Calls are not `Send`: the desk
//! runs on a single-threaded event loop.

use std::future::Future;

use async_trait::async_trait;
use shared_types::{CustomizationConfig, PageData, SidebarConfig};

use crate::error::DeskError;

#[async_trait(?Send)]
pub trait DeskApi {
    /// `Ok(None)` when the server answered without a configuration
    async fn get_desk_sidebar_items(&self) -> Result<Option<SidebarConfig>, DeskError>;

    /// `Ok(None)` when the page does not exist
    async fn get_desktop_page(&self, page: &str) -> Result<Option<PageData>, DeskError>;

    async fn save_customization(
        &self,
        page: &str,
        config: &CustomizationConfig,
    ) -> Result<(), DeskError>;
}

#[async_trait(?Send)]
impl<A: DeskApi + ?Sized> DeskApi for std::rc::Rc<A> {
    async fn get_desk_sidebar_items(&self) -> Result<Option<SidebarConfig>, DeskError> {
        (**self).get_desk_sidebar_items().await
    }

    async fn get_desktop_page(&self, page: &str) -> Result<Option<PageData>, DeskError> {
        (**self).get_desktop_page(page).await
    }

    async fn save_customization(
        &self,
        page: &str,
        config: &CustomizationConfig,
    ) -> Result<(), DeskError> {
        (**self).save_customization(page, config).await
    }
}

/// Repeats retryable failures a bounded number of times, then reports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    attempts: u32,
}

impl RetryPolicy {
    pub fn new(attempts: u32) -> Self {
        Self {
            attempts: attempts.max(1),
        }
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub async fn run<T, F, Fut>(&self, operation: &str, mut call: F) -> Result<T, DeskError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, DeskError>>,
    {
        let mut attempt = 1;
        loop {
            match call().await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_retryable() && attempt < self.attempts => {
                    tracing::warn!(operation, attempt, error = %e, "Retrying desk request");
                    attempt += 1;
                }
                Err(e) => {
                    tracing::error!(operation, attempt, error = %e, "Desk request failed");
                    return Err(e);
                }
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(1)
    }
}
