//! AI service integration for caption generation
//!
//! Provides the [`CaptionService`] seam, the Gemini implementation used in
//! production, and a scripted mock for tests.

pub mod gemini;
pub mod mock;

pub use gemini::GeminiCaptionClient;
pub use mock::MockCaptionClient;

use crate::Result;
use async_trait::async_trait;

/// Caption shown when the upstream answered but produced no text.
pub const FALLBACK_CAPTION: &str = "Couldn't generate a caption. Try again!";

#[async_trait]
pub trait CaptionService: Send + Sync {
    /// Generate a caption for a photo description.
    ///
    /// `Ok(None)` means the provider answered without usable text; `Err` means
    /// the provider could not be reached or its answer could not be decoded.
    async fn generate_caption(&self, description: &str) -> Result<Option<String>>;
}
