pub mod event;
pub mod props;
pub mod types;

pub use event::{CROPPED_IMAGE_EVENT, CroppedImage};
pub use types::{Crop, CropUnit};
