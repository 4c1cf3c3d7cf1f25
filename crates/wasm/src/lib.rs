use std::sync::Mutex;

use image_crop_core::bridge::StateBridge;
use image_crop_core::widget::{ClientEvent, ImageCrop};
use image_crop_protocol::event::{CROPPED_IMAGE_EVENT, CroppedImage};
use wasm_bindgen::prelude::*;

// Widgets live behind a process-wide lock: the host may drive them from
// any thread, and the cached data URI must never be read mid-update.
static WIDGETS: Mutex<Vec<ImageCrop>> = Mutex::new(Vec::new());

/// Create a widget for the image at `src`. Returns a handle for later calls.
#[wasm_bindgen]
pub fn create_widget(src: &str) -> usize {
    let mut widgets = WIDGETS.lock().unwrap();
    let handle = widgets.len();
    widgets.push(ImageCrop::new(src));
    handle
}

/// Set a property by its client key. `value` is JSON-encoded.
#[wasm_bindgen]
pub fn set_prop(handle: usize, key: &str, value: &str) -> Result<(), JsError> {
    let parsed: serde_json::Value =
        serde_json::from_str(value).map_err(|e| JsError::new(&e.to_string()))?;
    let mut widgets = WIDGETS.lock().unwrap();
    let widget = widgets
        .get_mut(handle)
        .ok_or_else(|| JsError::new("invalid widget handle"))?;
    widget.bridge_mut().set_raw(key, parsed);
    Ok(())
}

/// Read a property back as JSON, or `null` if never set.
#[wasm_bindgen]
pub fn get_prop(handle: usize, key: &str) -> Result<String, JsError> {
    let widgets = WIDGETS.lock().unwrap();
    let widget = widgets
        .get(handle)
        .ok_or_else(|| JsError::new("invalid widget handle"))?;
    let value = widget
        .bridge()
        .get_raw(key)
        .cloned()
        .unwrap_or(serde_json::Value::Null);
    serde_json::to_string(&value).map_err(|e| JsError::new(&e.to_string()))
}

/// Drain pending property updates as a JSON array of `{key, value}` pairs
/// for the host to apply to the client element.
#[wasm_bindgen]
pub fn take_updates(handle: usize) -> Result<String, JsError> {
    let mut widgets = WIDGETS.lock().unwrap();
    let widget = widgets
        .get_mut(handle)
        .ok_or_else(|| JsError::new("invalid widget handle"))?;
    let updates: Vec<serde_json::Value> = widget
        .take_updates()
        .into_iter()
        .map(|u| serde_json::json!({ "key": u.key, "value": u.value }))
        .collect();
    serde_json::to_string(&updates).map_err(|e| JsError::new(&e.to_string()))
}

/// Dispatch a client event envelope (DOM event name + JSON detail).
/// Returns whether the widget recognized the event.
#[wasm_bindgen]
pub fn dispatch_event(handle: usize, name: &str, detail: &str) -> Result<bool, JsError> {
    let detail: serde_json::Value =
        serde_json::from_str(detail).map_err(|e| JsError::new(&e.to_string()))?;
    let mut widgets = WIDGETS.lock().unwrap();
    let widget = widgets
        .get_mut(handle)
        .ok_or_else(|| JsError::new("invalid widget handle"))?;
    Ok(widget.handle_event(&ClientEvent::new(name, detail)))
}

/// Shorthand for the one event the client element actually fires: wraps
/// `data_uri` in a `cropped-image` envelope and dispatches it.
#[wasm_bindgen]
pub fn dispatch_cropped_image(handle: usize, data_uri: &str) -> Result<(), JsError> {
    let payload = CroppedImage {
        cropped_image_data_uri: data_uri.to_owned(),
    };
    let detail = serde_json::to_value(&payload).map_err(|e| JsError::new(&e.to_string()))?;
    let mut widgets = WIDGETS.lock().unwrap();
    let widget = widgets
        .get_mut(handle)
        .ok_or_else(|| JsError::new("invalid widget handle"))?;
    widget.handle_event(&ClientEvent::new(CROPPED_IMAGE_EVENT, detail));
    Ok(())
}

/// The last cropped image as a data URI (initially the source).
#[wasm_bindgen]
pub fn cropped_image_data_uri(handle: usize) -> Result<String, JsError> {
    let widgets = WIDGETS.lock().unwrap();
    let widget = widgets
        .get(handle)
        .ok_or_else(|| JsError::new("invalid widget handle"))?;
    Ok(widget.cropped_image_data_uri().to_owned())
}

/// Decode the cached data URI into raw image bytes. An empty byte array
/// means nothing has been cropped or uploaded yet.
#[wasm_bindgen]
pub fn cropped_image_bytes(handle: usize) -> Result<Vec<u8>, JsError> {
    let widgets = WIDGETS.lock().unwrap();
    let widget = widgets
        .get(handle)
        .ok_or_else(|| JsError::new("invalid widget handle"))?;
    let bytes = widget
        .cropped_image_base64()
        .map_err(|e| JsError::new(&e.to_string()))?;
    Ok(bytes.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_dispatch_updates_the_cache() {
        let handle = create_widget("/images/avatar.png");
        assert_eq!(
            cropped_image_data_uri(handle).unwrap_or_default(),
            "/images/avatar.png"
        );

        assert!(dispatch_cropped_image(handle, "data:image/png;base64,SGVsbG8=").is_ok());
        assert_eq!(
            cropped_image_data_uri(handle).unwrap_or_default(),
            "data:image/png;base64,SGVsbG8="
        );
        assert_eq!(cropped_image_bytes(handle).unwrap_or_default(), b"Hello");
    }

    #[test]
    fn typed_dispatch_rejects_stale_handles() {
        assert!(dispatch_cropped_image(usize::MAX, "data:image/png;base64,QQ==").is_err());
    }
}
