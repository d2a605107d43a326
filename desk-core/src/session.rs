use serde::{Deserialize, Serialize};

/// Client-side state that outlives a page load.
///
/// The desk never reads storage itself; the embedder loads this value,
/// passes it into [`crate::Desktop::new`] and persists whatever
/// [`crate::Desktop::session`] holds after each navigation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_page: Option<String>,
}

impl SessionState {
    pub fn with_last_page(page: impl Into<String>) -> Self {
        Self {
            last_page: Some(page.into()),
        }
    }

    pub fn last_page(&self) -> Option<&str> {
        self.last_page.as_deref().filter(|p| !p.is_empty())
    }

    pub fn remember(&mut self, page: &str) {
        self.last_page = Some(page.to_string());
    }

    pub fn forget(&mut self) {
        self.last_page = None;
    }
}
