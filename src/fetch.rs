//! Cross-platform HTTP GET.
//!
//! On WASM requests go through the browser's `fetch` and are awaited on the
//! page's event loop. Natively each request runs on its own thread with a
//! blocking `reqwest` client. Either way the result is handed to a callback,
//! which is expected to forward it to the UI thread over a channel.

use thiserror::Error;

/// Failure to retrieve a remote resource.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Network(String),
    #[error("server responded with status {0}")]
    Status(u16),
}

/// Fetches `url` in the background and calls `on_done` with the body.
pub fn spawn_fetch<F>(url: String, on_done: F)
where
    F: FnOnce(Result<Vec<u8>, FetchError>) + Send + 'static,
{
    #[cfg(target_arch = "wasm32")]
    {
        wasm_bindgen_futures::spawn_local(async move {
            on_done(fetch_bytes(&url).await);
        });
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        std::thread::spawn(move || {
            on_done(fetch_bytes_blocking(&url));
        });
    }
}

#[cfg(target_arch = "wasm32")]
async fn fetch_bytes(url: &str) -> Result<Vec<u8>, FetchError> {
    use wasm_bindgen::JsCast;
    use wasm_bindgen_futures::JsFuture;

    let opts = web_sys::RequestInit::new();
    opts.set_method("GET");
    opts.set_mode(web_sys::RequestMode::Cors);

    let request = web_sys::Request::new_with_str_and_init(url, &opts).map_err(js_error)?;
    let window =
        web_sys::window().ok_or_else(|| FetchError::Network("no window".to_string()))?;

    let response = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(js_error)?;
    let response: web_sys::Response = response.dyn_into().map_err(js_error)?;

    if !response.ok() {
        return Err(FetchError::Status(response.status()));
    }

    let buffer = JsFuture::from(response.array_buffer().map_err(js_error)?)
        .await
        .map_err(js_error)?;
    Ok(js_sys::Uint8Array::new(&buffer).to_vec())
}

#[cfg(target_arch = "wasm32")]
fn js_error(value: wasm_bindgen::JsValue) -> FetchError {
    FetchError::Network(format!("{:?}", value))
}

#[cfg(not(target_arch = "wasm32"))]
fn fetch_bytes_blocking(url: &str) -> Result<Vec<u8>, FetchError> {
    let response =
        reqwest::blocking::get(url).map_err(|e| FetchError::Network(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status(status.as_u16()));
    }

    response
        .bytes()
        .map(|bytes| bytes.to_vec())
        .map_err(|e| FetchError::Network(e.to_string()))
}
