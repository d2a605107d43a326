use std::fmt;

/// First route segment of every desk page
pub const WORKSPACE_SEGMENT: &str = "workspace";

/// A desk route: `workspace` or `workspace/<page>`
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Route {
    segments: Vec<String>,
}

impl Route {
    /// The bare `workspace` route
    pub fn workspace() -> Self {
        Self {
            segments: vec![WORKSPACE_SEGMENT.to_string()],
        }
    }

    pub fn page(page: &str) -> Self {
        Self {
            segments: vec![WORKSPACE_SEGMENT.to_string(), page.to_string()],
        }
    }

    /// Parse a route string; leading `#`, `desk#` and slashes are ignored.
    /// Segments are expected to be already decoded.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        let trimmed = trimmed
            .strip_prefix("desk#")
            .unwrap_or(trimmed)
            .trim_start_matches('#')
            .trim_matches('/');

        let segments = trimmed
            .split('/')
            .filter(|s| !s.is_empty())
            .map(ToString::to_string)
            .collect();

        Self { segments }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn is_workspace(&self) -> bool {
        self.segments.first().map(String::as_str) == Some(WORKSPACE_SEGMENT)
    }

    /// The page a workspace route points at, if any
    pub fn page_name(&self) -> Option<&str> {
        if !self.is_workspace() {
            return None;
        }
        self.segments.get(1).map(String::as_str)
    }

    /// Link target for a sidebar entry
    pub fn href(&self) -> String {
        format!("desk#{self}")
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("/"))
    }
}
