use shared_types::SidebarCategory;

/// Page shown when the sidebar has no usable default
pub const DEFAULT_FALLBACK_PAGE: &str = "Website";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeskConfig {
    /// Page opened when neither route, session nor sidebar name one
    pub fallback_page: String,
    /// Category whose first entry is the default page
    pub default_category: SidebarCategory,
    /// Attempts per fetch before a transport error is reported
    pub fetch_attempts: u32,
    /// Mobile layouts disable widget sorting
    pub is_mobile: bool,
}

impl Default for DeskConfig {
    fn default() -> Self {
        Self {
            fallback_page: DEFAULT_FALLBACK_PAGE.to_string(),
            default_category: SidebarCategory::Modules,
            fetch_attempts: 2,
            is_mobile: false,
        }
    }
}

impl DeskConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; missing keys keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let defaults = Self::default();

        let default_category = match lookup("DESK_DEFAULT_CATEGORY") {
            Some(raw) => SidebarCategory::parse(raw.trim()).ok_or_else(|| {
                anyhow::anyhow!(
                    "Invalid DESK_DEFAULT_CATEGORY '{raw}'. Expected one of Modules, Domains, Places, Administration"
                )
            })?,
            None => defaults.default_category,
        };

        let fetch_attempts: u32 = env_parse(&lookup, "DESK_FETCH_ATTEMPTS", defaults.fetch_attempts)?;
        if fetch_attempts == 0 {
            anyhow::bail!("DESK_FETCH_ATTEMPTS must be at least 1");
        }

        Ok(Self {
            fallback_page: lookup("DESK_FALLBACK_PAGE")
                .filter(|s| !s.trim().is_empty())
                .unwrap_or(defaults.fallback_page),
            default_category,
            fetch_attempts,
            is_mobile: env_parse(&lookup, "DESK_MOBILE", defaults.is_mobile)?,
        })
    }
}

fn env_parse<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> anyhow::Result<T>
where
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(val) => val
            .trim()
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("Failed to parse env var {key}={val}: {e}")),
        None => Ok(default),
    }
}
