//! Platform adapters picked at compile time.
//!
//! - **Web** (WASM): `navigator.geolocation`, `localStorage` (with the `web`
//!   feature), `navigator.clipboard`, `window.location`
//! - **Native**: no position sensor, in-memory preferences, no clipboard

use std::time::Duration;

pub async fn sleep(duration: Duration) {
    #[cfg(target_arch = "wasm32")]
    gloo_timers::future::sleep(duration).await;
    #[cfg(not(target_arch = "wasm32"))]
    tokio::time::sleep(duration).await;
}

/// Position source for the location sharing controller.
pub fn make_geolocation() -> impl api::Geolocation + 'static {
    #[cfg(target_arch = "wasm32")]
    {
        crate::geolocation::BrowserGeolocation::new()
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        api::UnsupportedGeolocation
    }
}

/// Preference storage for one-time notices.
pub fn make_preferences() -> impl store::Preferences {
    #[cfg(all(target_arch = "wasm32", feature = "web"))]
    {
        store::LocalStoragePreferences::new()
    }
    #[cfg(not(all(target_arch = "wasm32", feature = "web")))]
    {
        store::MemoryPreferences::new()
    }
}

/// `scheme://host:port` of the current page, empty when unknown.
pub fn page_origin() -> String {
    #[cfg(target_arch = "wasm32")]
    {
        web_sys::window()
            .and_then(|w| w.location().origin().ok())
            .unwrap_or_default()
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        String::new()
    }
}

/// Navigate the whole page (sign-in redirects).
pub fn redirect(url: &str) {
    #[cfg(target_arch = "wasm32")]
    {
        if let Some(window) = web_sys::window() {
            if let Err(e) = window.location().set_href(url) {
                tracing::error!("Failed to navigate to {url}: {e:?}");
            }
        }
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        tracing::info!("open {url} to continue");
    }
}

pub async fn copy_to_clipboard(text: &str) -> Result<(), String> {
    #[cfg(target_arch = "wasm32")]
    {
        let window = web_sys::window().ok_or_else(|| "no window".to_string())?;
        let promise = window.navigator().clipboard().write_text(text);
        wasm_bindgen_futures::JsFuture::from(promise)
            .await
            .map(|_| ())
            .map_err(|e| format!("{e:?}"))
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = text;
        Err("Clipboard is not available on this platform".to_string())
    }
}
