pub mod upload;
pub mod version;
pub mod websocket;

pub use upload::ImageUploader;
