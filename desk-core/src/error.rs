use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeskError {
    #[error("sidebar configuration unavailable")]
    SidebarUnavailable,

    #[error("page '{0}' does not exist")]
    PageNotFound(String),

    #[error("request failed: {0}")]
    Transport(String),

    #[error("malformed response: {0}")]
    Decode(String),

    #[error("page '{0}' does not allow customization")]
    CustomizationNotAllowed(String),

    #[error("page '{0}' is not in customize mode")]
    NotCustomizing(String),

    #[error("page '{0}' has not finished loading")]
    NotRendered(String),

    #[error("unknown page '{0}'")]
    UnknownPage(String),

    #[error("widget edit rejected: {0}")]
    WidgetEdit(String),
}

impl DeskError {
    /// Errors worth repeating the request for
    pub fn is_retryable(&self) -> bool {
        matches!(self, DeskError::Transport(_))
    }
}

impl From<serde_json::Error> for DeskError {
    fn from(e: serde_json::Error) -> Self {
        DeskError::Decode(e.to_string())
    }
}

/// A blocking, user-dismissable dialog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorDialog {
    pub title: String,
    pub message: String,
    pub primary_action: Option<DialogAction>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogAction {
    /// Reload the whole document
    Reload,
    /// Re-fetch the current page
    Retry,
}

impl DialogAction {
    pub fn label(&self) -> &'static str {
        match self {
            DialogAction::Reload => "Reload",
            DialogAction::Retry => "Retry",
        }
    }
}

impl ErrorDialog {
    pub fn for_error(error: &DeskError) -> Self {
        match error {
            DeskError::SidebarUnavailable => Self {
                title: "Couldn't Load Desk".to_string(),
                message: "Something went wrong while loading Desk. Please reload the page. \
                          If the problem persists, contact the Administrator"
                    .to_string(),
                primary_action: Some(DialogAction::Reload),
            },
            DeskError::Transport(_) | DeskError::Decode(_) => Self {
                title: "Couldn't Load Page".to_string(),
                message: error.to_string(),
                primary_action: Some(DialogAction::Retry),
            },
            other => Self {
                title: "Desk Error".to_string(),
                message: other.to_string(),
                primary_action: None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sidebar_failure_offers_reload() {
        let dialog = ErrorDialog::for_error(&DeskError::SidebarUnavailable);
        assert_eq!(dialog.title, "Couldn't Load Desk");
        assert_eq!(dialog.primary_action, Some(DialogAction::Reload));
    }

    #[test]
    fn only_transport_errors_retry() {
        assert!(DeskError::Transport("timeout".into()).is_retryable());
        assert!(!DeskError::Decode("bad json".into()).is_retryable());
        assert!(!DeskError::SidebarUnavailable.is_retryable());
    }
}
