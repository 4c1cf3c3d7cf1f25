use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use image_crop_protocol::event::{CROPPED_IMAGE_EVENT, CroppedImage};
use image_crop_protocol::props;
use image_crop_protocol::types::Crop;

use crate::bridge::{InMemoryBridge, PropUpdate, StateBridge};
use crate::data_uri::{self, DecodeError};

/// CSS class applied when the image should fill the viewport height.
const IMG_FULL_HEIGHT_CLASS: &str = "img-full-height";

/// A displayable image reference: a source plus optional alt text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    pub src: String,
    pub alt: Option<String>,
}

impl Image {
    pub fn new(src: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            alt: None,
        }
    }

    pub fn with_alt(src: impl Into<String>, alt: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            alt: Some(alt.into()),
        }
    }
}

/// A client-originated event envelope: DOM event name plus JSON detail.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientEvent {
    pub name: String,
    pub detail: Value,
}

impl ClientEvent {
    pub fn new(name: impl Into<String>, detail: Value) -> Self {
        Self {
            name: name.into(),
            detail,
        }
    }
}

/// Server-side image-crop widget.
///
/// Holds the property state pushed to the client crop element and the last
/// data URI the client sent back. Before any crop event arrives the cached
/// data URI is the original image source, so "get the cropped image" always
/// yields something displayable.
#[derive(Debug)]
pub struct ImageCrop {
    bridge: InMemoryBridge,
    cropped_image_data_uri: String,
}

impl ImageCrop {
    /// Create a widget cropping the image at `src`.
    ///
    /// The cropped-image relay is wired here unconditionally: every
    /// `cropped-image` event routed through [`ImageCrop::handle_event`]
    /// replaces the cached data URI. That relay is part of the widget's own
    /// bookkeeping, not a removable subscription.
    pub fn new(src: impl Into<String>) -> Self {
        let src = src.into();
        let mut widget = Self {
            bridge: InMemoryBridge::new(),
            cropped_image_data_uri: src.clone(),
        };
        widget.set_image_src(src);
        widget
    }

    /// Create a widget from an existing image reference, carrying over its
    /// alt text when present.
    pub fn from_image(image: &Image) -> Self {
        let mut widget = Self::new(image.src.clone());
        if let Some(alt) = &image.alt {
            widget.set_image_alt(alt.clone());
        }
        widget
    }

    fn set_state<T: Serialize>(&mut self, key: &str, value: T) {
        let value = serde_json::to_value(value).unwrap_or(Value::Null);
        self.bridge.set_raw(key, value);
    }

    fn get_state<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = self.bridge.get_raw(key)?.clone();
        serde_json::from_value(value).ok()
    }

    pub fn set_image_src(&mut self, src: impl Into<String>) {
        self.set_state(props::IMG_SRC, src.into());
    }

    pub fn image_src(&self) -> String {
        self.get_state(props::IMG_SRC).unwrap_or_default()
    }

    pub fn set_image_alt(&mut self, alt: impl Into<String>) {
        self.set_state(props::IMG_ALT, alt.into());
    }

    pub fn image_alt(&self) -> Option<String> {
        self.get_state(props::IMG_ALT)
    }

    /// Set the crop rectangle. Geometry is not checked against the image
    /// bounds; whatever the caller passes is pushed to the client as-is.
    pub fn set_crop(&mut self, crop: Crop) {
        self.set_state(props::CROP, crop);
    }

    pub fn crop(&self) -> Option<Crop> {
        self.get_state(props::CROP)
    }

    /// Lock the selection to an aspect ratio, e.g. `1.0` for a square or
    /// `16.0 / 9.0` for landscape.
    pub fn set_aspect(&mut self, aspect: f64) {
        self.set_state(props::ASPECT, aspect);
    }

    /// The locked aspect ratio, or `None` for free-form aspect. An explicit
    /// aspect of `0.0` is distinct from never having set one.
    pub fn aspect(&self) -> Option<f64> {
        self.get_state(props::ASPECT)
    }

    /// Render the selection as a circle (an oval when aspect is not 1).
    pub fn set_circular_crop(&mut self, circular: bool) {
        self.set_state(props::CIRCULAR_CROP, circular);
    }

    pub fn is_circular_crop(&self) -> bool {
        self.get_state(props::CIRCULAR_CROP).unwrap_or(false)
    }

    /// Keep the selection when the user clicks outside it.
    pub fn set_keep_selection(&mut self, keep: bool) {
        self.set_state(props::KEEP_SELECTION, keep);
    }

    pub fn is_keep_selection(&self) -> bool {
        self.get_state(props::KEEP_SELECTION).unwrap_or(false)
    }

    /// Disable resizing and drawing of new selections.
    pub fn set_disabled(&mut self, disabled: bool) {
        self.set_state(props::DISABLED, disabled);
    }

    pub fn is_disabled(&self) -> bool {
        self.get_state(props::DISABLED).unwrap_or(false)
    }

    /// Allow dragging the existing selection but no resize or redraw.
    pub fn set_locked(&mut self, locked: bool) {
        self.set_state(props::LOCKED, locked);
    }

    pub fn is_locked(&self) -> bool {
        self.get_state(props::LOCKED).unwrap_or(false)
    }

    /// Minimum selection width in pixels; `None` removes the bound.
    pub fn set_crop_min_width(&mut self, min_width: Option<u32>) {
        self.set_state(props::MIN_WIDTH, min_width);
    }

    pub fn crop_min_width(&self) -> Option<u32> {
        self.get_state(props::MIN_WIDTH)
    }

    /// Minimum selection height in pixels; `None` removes the bound.
    pub fn set_crop_min_height(&mut self, min_height: Option<u32>) {
        self.set_state(props::MIN_HEIGHT, min_height);
    }

    pub fn crop_min_height(&self) -> Option<u32> {
        self.get_state(props::MIN_HEIGHT)
    }

    /// Maximum selection width in pixels; `None` removes the bound.
    pub fn set_crop_max_width(&mut self, max_width: Option<u32>) {
        self.set_state(props::MAX_WIDTH, max_width);
    }

    pub fn crop_max_width(&self) -> Option<u32> {
        self.get_state(props::MAX_WIDTH)
    }

    /// Maximum selection height in pixels; `None` removes the bound.
    pub fn set_crop_max_height(&mut self, max_height: Option<u32>) {
        self.set_state(props::MAX_HEIGHT, max_height);
    }

    pub fn crop_max_height(&self) -> Option<u32> {
        self.get_state(props::MAX_HEIGHT)
    }

    /// Show rule-of-thirds composition lines over the selection.
    pub fn set_rule_of_thirds(&mut self, rule_of_thirds: bool) {
        self.set_state(props::RULE_OF_THIRDS, rule_of_thirds);
    }

    pub fn is_rule_of_thirds(&self) -> bool {
        self.get_state(props::RULE_OF_THIRDS).unwrap_or(false)
    }

    /// Make the image fill the viewport height. Presentation only: toggles
    /// a CSS class on the element, no property state involved.
    pub fn set_image_full_height(&mut self, full_height: bool) {
        if full_height {
            self.bridge.add_class(IMG_FULL_HEIGHT_CLASS);
        } else {
            self.bridge.remove_class(IMG_FULL_HEIGHT_CLASS);
        }
    }

    pub fn is_image_full_height(&self) -> bool {
        self.bridge.has_class(IMG_FULL_HEIGHT_CLASS)
    }

    /// Route a client event to the widget. Returns `true` when the event
    /// was recognized and applied.
    ///
    /// Events are applied in receipt order, last write wins; no coalescing
    /// happens here even if the client fires bursts. A malformed or missing
    /// detail counts as an empty payload — problems only surface later, at
    /// decode time.
    pub fn handle_event(&mut self, event: &ClientEvent) -> bool {
        if event.name != CROPPED_IMAGE_EVENT {
            log::warn!("ignoring unknown client event {:?}", event.name);
            return false;
        }
        let payload: CroppedImage =
            serde_json::from_value(event.detail.clone()).unwrap_or_default();
        self.update_cropped_image(&payload);
        true
    }

    fn update_cropped_image(&mut self, event: &CroppedImage) {
        log::debug!(
            "cropped-image event: {} chars of data uri",
            event.cropped_image_data_uri.len()
        );
        self.cropped_image_data_uri = event.cropped_image_data_uri.clone();
    }

    /// The last cropped image as a data URI. Until the first crop event this
    /// is the original image source.
    pub fn cropped_image_data_uri(&self) -> &str {
        &self.cropped_image_data_uri
    }

    /// Decode the cached data URI into raw image bytes.
    ///
    /// `Ok(None)` when nothing has been cropped or uploaded yet (blank
    /// cache); a malformed payload is an error, reported with the decode
    /// cause so callers can log or prompt a re-upload.
    pub fn cropped_image_base64(&self) -> Result<Option<Vec<u8>>, DecodeError> {
        data_uri::decode(&self.cropped_image_data_uri)
    }

    /// Drain pending property changes for the host to push to the client.
    pub fn take_updates(&mut self) -> Vec<PropUpdate> {
        self.bridge.take_updates()
    }

    pub fn bridge(&self) -> &InMemoryBridge {
        &self.bridge
    }

    /// Mutable access to the bridge, for hosts that write raw properties.
    pub fn bridge_mut(&mut self) -> &mut InMemoryBridge {
        &mut self.bridge
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image_crop_protocol::types::CropUnit;
    use serde_json::json;

    fn cropped_event(uri: &str) -> ClientEvent {
        ClientEvent::new(
            CROPPED_IMAGE_EVENT,
            json!({ "croppedImageDataUri": uri }),
        )
    }

    #[test]
    fn construction_seeds_cached_uri_with_source() {
        let widget = ImageCrop::new("/images/plant.png");
        assert_eq!(widget.cropped_image_data_uri(), "/images/plant.png");
        assert_eq!(widget.image_src(), "/images/plant.png");
    }

    #[test]
    fn from_image_copies_alt_text() {
        let widget = ImageCrop::from_image(&Image::with_alt("/a.png", "photo"));
        assert_eq!(widget.image_alt().as_deref(), Some("photo"));

        let widget = ImageCrop::from_image(&Image::new("/a.png"));
        assert_eq!(widget.image_alt(), None);
        assert_eq!(widget.image_src(), "/a.png");
    }

    #[test]
    fn string_and_bool_props_round_trip() {
        let mut widget = ImageCrop::new("/a.png");
        widget.set_image_alt("an image");
        assert_eq!(widget.image_alt().as_deref(), Some("an image"));

        assert!(!widget.is_circular_crop());
        widget.set_circular_crop(true);
        assert!(widget.is_circular_crop());

        widget.set_keep_selection(true);
        widget.set_disabled(true);
        widget.set_locked(true);
        widget.set_rule_of_thirds(true);
        assert!(widget.is_keep_selection());
        assert!(widget.is_disabled());
        assert!(widget.is_locked());
        assert!(widget.is_rule_of_thirds());
    }

    #[test]
    fn crop_prop_round_trips() {
        let mut widget = ImageCrop::new("/a.png");
        assert_eq!(widget.crop(), None);
        let crop = Crop::new(CropUnit::Percent, 25.0, 25.0, 50.0, 50.0);
        widget.set_crop(crop);
        assert_eq!(widget.crop(), Some(crop));
    }

    #[test]
    fn aspect_unset_is_distinct_from_zero() {
        let mut widget = ImageCrop::new("/a.png");
        assert_eq!(widget.aspect(), None);
        widget.set_aspect(0.0);
        assert_eq!(widget.aspect(), Some(0.0));
        widget.set_aspect(16.0 / 9.0);
        assert_eq!(widget.aspect(), Some(16.0 / 9.0));
    }

    #[test]
    fn bounds_default_to_unbounded() {
        let mut widget = ImageCrop::new("/a.png");
        assert_eq!(widget.crop_min_width(), None);
        widget.set_crop_min_width(Some(64));
        widget.set_crop_min_height(Some(64));
        widget.set_crop_max_width(Some(512));
        widget.set_crop_max_height(Some(512));
        assert_eq!(widget.crop_min_width(), Some(64));
        assert_eq!(widget.crop_max_height(), Some(512));
        widget.set_crop_max_width(None);
        assert_eq!(widget.crop_max_width(), None);
    }

    #[test]
    fn out_of_range_geometry_is_accepted() {
        let mut widget = ImageCrop::new("/a.png");
        let nonsense = Crop::new(CropUnit::Percent, -40.0, 900.0, -1.0, 0.0);
        widget.set_crop(nonsense);
        assert_eq!(widget.crop(), Some(nonsense));
    }

    #[test]
    fn cropped_image_event_overwrites_cache() {
        let mut widget = ImageCrop::new("/original.png");
        assert!(widget.handle_event(&cropped_event("data:image/png;base64,SGVsbG8=")));
        assert_eq!(
            widget.cropped_image_data_uri(),
            "data:image/png;base64,SGVsbG8="
        );

        // Last write wins, including an empty payload.
        assert!(widget.handle_event(&cropped_event("")));
        assert_eq!(widget.cropped_image_data_uri(), "");
    }

    #[test]
    fn event_with_missing_detail_counts_as_empty() {
        let mut widget = ImageCrop::new("/original.png");
        assert!(widget.handle_event(&ClientEvent::new(CROPPED_IMAGE_EVENT, json!({}))));
        assert_eq!(widget.cropped_image_data_uri(), "");
    }

    #[test]
    fn unknown_events_are_not_handled() {
        let mut widget = ImageCrop::new("/original.png");
        let event = ClientEvent::new("selection-changed", json!({}));
        assert!(!widget.handle_event(&event));
        assert_eq!(widget.cropped_image_data_uri(), "/original.png");
    }

    #[test]
    fn decode_of_blank_cache_is_empty_case() {
        let mut widget = ImageCrop::new("/original.png");
        assert!(widget.handle_event(&cropped_event("")));
        assert!(matches!(widget.cropped_image_base64(), Ok(None)));
    }

    #[test]
    fn decode_surfaces_malformed_payloads() {
        let mut widget = ImageCrop::new("/original.png");
        assert!(widget.handle_event(&cropped_event("data:image/png;base64,!!!not-base64!!!")));
        assert!(widget.cropped_image_base64().is_err());
    }

    #[test]
    fn full_height_toggle_is_class_only() {
        let mut widget = ImageCrop::new("/a.png");
        widget.take_updates();
        widget.set_image_full_height(true);
        assert!(widget.is_image_full_height());
        // No property traffic from the class toggle.
        assert!(widget.take_updates().is_empty());
        widget.set_image_full_height(false);
        assert!(!widget.is_image_full_height());
    }

    #[test]
    fn updates_reflect_setter_calls() {
        let mut widget = ImageCrop::new("/a.png");
        widget.set_aspect(1.0);
        widget.set_circular_crop(true);
        let updates = widget.take_updates();
        let keys: Vec<&str> = updates.iter().map(|u| u.key.as_str()).collect();
        assert_eq!(keys, ["imgSrc", "aspect", "circularCrop"]);
    }
}
