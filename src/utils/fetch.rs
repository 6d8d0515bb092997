//! Network requests with timeout support.

use js_sys::{Array, Object, Promise};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, RequestMode, Response};

use heedless_core::FetchError;

use crate::config::FETCH_TIMEOUT_MS;

// =============================================================================
// Deadline
// =============================================================================

/// Await `promise`, giving up after `timeout_ms`.
///
/// The timer settles with a private marker object, so any value the promise
/// produces (`undefined` included) is told apart from the deadline. The timer
/// is cleared once either side wins.
pub async fn with_deadline(promise: Promise, timeout_ms: i32) -> Result<JsValue, FetchError> {
    let window = web_sys::window().ok_or(FetchError::NoWindow)?;

    let marker = JsValue::from(Object::new());
    let mut timer_id = None;
    let timer = Promise::new(&mut |resolve, _| {
        timer_id = window
            .set_timeout_with_callback_and_timeout_and_arguments_1(&resolve, timeout_ms, &marker)
            .ok();
    });

    let settled = JsFuture::from(Promise::race(&Array::of2(&promise, &timer))).await;
    if let Some(id) = timer_id {
        window.clear_timeout_with_handle(id);
    }

    match settled {
        Ok(value) if Object::is(&value, &marker) => Err(FetchError::Timeout),
        Ok(value) => Ok(value),
        Err(e) => Err(FetchError::Network(rejection_message(&e))),
    }
}

fn rejection_message(reason: &JsValue) -> String {
    reason
        .as_string()
        .or_else(|| reason.dyn_ref::<js_sys::Error>()?.message().as_string())
        .unwrap_or_else(|| "fetch rejected".to_string())
}

// =============================================================================
// Fetch Functions
// =============================================================================

/// POST a JSON body and return the response text.
///
/// Non-2xx statuses are errors. Times out after `FETCH_TIMEOUT_MS`.
pub async fn post_json(
    url: &str,
    headers: &[(&str, &str)],
    body: &str,
) -> Result<String, FetchError> {
    let window = web_sys::window().ok_or(FetchError::NoWindow)?;

    let opts = RequestInit::new();
    opts.set_method("POST");
    opts.set_mode(RequestMode::Cors);
    opts.set_body(&JsValue::from_str(body));

    let request =
        Request::new_with_str_and_init(url, &opts).map_err(|_| FetchError::RequestCreationFailed)?;
    let request_headers = request.headers();
    request_headers
        .set("Content-Type", "application/json")
        .map_err(|_| FetchError::RequestCreationFailed)?;
    for (name, value) in headers {
        request_headers
            .set(name, value)
            .map_err(|_| FetchError::RequestCreationFailed)?;
    }

    let value = with_deadline(window.fetch_with_request(&request), FETCH_TIMEOUT_MS).await?;
    let response: Response = value
        .dyn_into()
        .map_err(|_| FetchError::InvalidResponse("not a Response".to_string()))?;

    if !response.ok() {
        return Err(FetchError::Http(response.status()));
    }

    let text = response
        .text()
        .map_err(|_| FetchError::InvalidResponse("body not readable".to_string()))?;
    JsFuture::from(text)
        .await
        .map_err(|_| FetchError::InvalidResponse("body not readable".to_string()))?
        .as_string()
        .ok_or_else(|| FetchError::InvalidResponse("body is not text".to_string()))
}
