pub mod client;
pub mod image;
pub mod types;
pub mod vision;

pub use image::GeminiImageClient;
pub use vision::GeminiDescriptionClient;
