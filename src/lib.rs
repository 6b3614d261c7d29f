//! Caption proxy - keeps a Gemini API key server-side and turns a photo
//! description into a short social media caption.
//!
//! A single POST endpoint validates the caller's payload, builds a fixed prompt,
//! makes one `generateContent` call, and unwraps the generated text.

pub mod ai;
pub mod error;
pub mod models;
pub mod prompts;
pub mod server;

pub use error::{Error, Result};
