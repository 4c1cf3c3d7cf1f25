pub mod bridge;
pub mod data_uri;
pub mod widget;

pub use bridge::{InMemoryBridge, PropUpdate, StateBridge};
pub use data_uri::DecodeError;
pub use widget::{ClientEvent, Image, ImageCrop};
