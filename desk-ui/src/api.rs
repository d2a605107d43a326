use async_trait::async_trait;
use desk_core::{DeskApi, DeskError};
use gloo_net::http::Request;
use serde::de::DeserializeOwned;
use serde::Serialize;
use shared_types::{
    methods, CustomizationConfig, GetDesktopPageRequest, PageData, RpcResponse,
    SaveCustomizationRequest, SidebarConfig,
};
use std::sync::OnceLock;

/// Get the API base URL based on current environment
/// - In development (localhost): use http://localhost:8000
/// - In production: use same origin (the desk is served by the API host)
fn get_api_base() -> String {
    let hostname = web_sys::window()
        .and_then(|w| w.location().hostname().ok())
        .unwrap_or_default();

    if hostname == "localhost" || hostname == "127.0.0.1" {
        "http://localhost:8000".to_string()
    } else {
        "".to_string()
    }
}

/// Lazy-static equivalent for WASM - computed at first use
static API_BASE_CACHE: OnceLock<String> = OnceLock::new();

/// Get the cached API base URL
pub fn api_base() -> &'static str {
    API_BASE_CACHE.get_or_init(get_api_base).as_str()
}

pub fn method_url(method: &str) -> String {
    format!("{}/api/method/{}", api_base(), method)
}

/// Desk server calls over HTTP
#[derive(Debug, Clone, Copy, Default)]
pub struct HttpDeskApi;

impl HttpDeskApi {
    async fn call<B, T>(&self, method: &str, body: &B) -> Result<Option<T>, DeskError>
    where
        B: Serialize,
        T: DeserializeOwned,
    {
        let url = method_url(method);

        let response = Request::post(&url)
            .json(body)
            .map_err(|e| DeskError::Transport(format!("Failed to serialize request: {e}")))?
            .send()
            .await
            .map_err(|e| DeskError::Transport(format!("Request failed: {e}")))?;

        if !response.ok() {
            return Err(DeskError::Transport(format!(
                "HTTP error: {}",
                response.status()
            )));
        }

        let data: RpcResponse<T> = response
            .json()
            .await
            .map_err(|e| DeskError::Decode(format!("Failed to parse JSON: {e}")))?;

        if let Some(exc) = data.exc {
            return Err(DeskError::Transport(format!("Server error: {exc}")));
        }

        Ok(data.message)
    }
}

#[async_trait(?Send)]
impl DeskApi for HttpDeskApi {
    async fn get_desk_sidebar_items(&self) -> Result<Option<SidebarConfig>, DeskError> {
        self.call(methods::GET_DESK_SIDEBAR_ITEMS, &serde_json::json!({}))
            .await
    }

    async fn get_desktop_page(&self, page: &str) -> Result<Option<PageData>, DeskError> {
        let request = GetDesktopPageRequest {
            page: page.to_string(),
        };
        let message: Option<serde_json::Value> =
            self.call(methods::GET_DESKTOP_PAGE, &request).await?;
        Ok(PageData::from_message(message)?)
    }

    async fn save_customization(
        &self,
        page: &str,
        config: &CustomizationConfig,
    ) -> Result<(), DeskError> {
        let request = SaveCustomizationRequest {
            page: page.to_string(),
            config: config.clone(),
        };
        let _: Option<serde_json::Value> = self.call(methods::SAVE_CUSTOMIZATION, &request).await?;
        Ok(())
    }
}
