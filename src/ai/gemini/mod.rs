pub mod caption;
pub mod client;
pub mod types;

pub use caption::GeminiCaptionClient;
pub use client::GeminiHttpClient;
