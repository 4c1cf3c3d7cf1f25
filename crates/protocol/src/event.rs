use serde::{Deserialize, Serialize};

/// DOM event name the client element fires after encoding a crop.
pub const CROPPED_IMAGE_EVENT: &str = "cropped-image";

/// Payload of the `cropped-image` event.
///
/// The client encodes the selected pixels to a PNG data URI and sends it
/// here. Degenerate clients may send a bare base64 payload or an empty
/// string; both are stored verbatim and only inspected at decode time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CroppedImage {
    #[serde(rename = "croppedImageDataUri", default)]
    pub cropped_image_data_uri: String,
}
