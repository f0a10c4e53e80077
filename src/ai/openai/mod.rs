pub mod client;
pub mod image;
pub mod types;
pub mod vision;

pub use image::OpenAiImageClient;
pub use vision::OpenAiDescriptionClient;
