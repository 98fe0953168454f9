//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Input events (folded into a polled snapshot)
//! - Offline cache registration

pub mod input;

pub use input::InputState;

/// Script path of the offline cache worker
pub const SERVICE_WORKER_URL: &str = "./service-worker.js";

/// Register the offline cache worker, if the browser supports it
#[cfg(target_arch = "wasm32")]
pub fn register_service_worker() {
    use wasm_bindgen::JsValue;
    use wasm_bindgen_futures::JsFuture;

    let Some(window) = web_sys::window() else {
        return;
    };
    let navigator = window.navigator();
    // Older browsers and insecure origins have no `serviceWorker`
    let has_support = js_sys::Reflect::has(&navigator, &JsValue::from_str("serviceWorker"))
        .unwrap_or(false);
    if !has_support {
        log::info!("Service workers unsupported; skipping offline cache");
        return;
    }

    let promise = navigator.service_worker().register(SERVICE_WORKER_URL);
    wasm_bindgen_futures::spawn_local(async move {
        match JsFuture::from(promise).await {
            Ok(_) => log::info!("Service worker registered"),
            Err(e) => log::warn!("Service worker registration failed: {:?}", e),
        }
    });
}

#[cfg(test)]
mod tests {
    const WORKER: &str = include_str!("../../static/service-worker.js");
    const TRUNK: &str = include_str!("../../Trunk.toml");

    #[test]
    fn test_worker_precaches_the_bundle() {
        let pkg = env!("CARGO_PKG_NAME");
        assert!(WORKER.contains(&format!("{}.js", pkg)));
        assert!(WORKER.contains(&format!("{}_bg.wasm", pkg)));
        // Bundle names are only stable without file hashing
        assert!(TRUNK.contains("filehash = false"));
    }

    #[test]
    fn test_worker_serves_start_url_offline() {
        let manifest: serde_json::Value =
            serde_json::from_str(include_str!("../../static/manifest.json")).unwrap();
        let start_url = manifest["start_url"].as_str().unwrap();
        // start_url has a query string, so lookups must ignore it
        assert!(start_url.contains('?'));
        assert!(WORKER.contains("ignoreSearch: true"));
        // Network responses are kept for later offline starts
        assert!(WORKER.contains("cache.put("));
    }
}
