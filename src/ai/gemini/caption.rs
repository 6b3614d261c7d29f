use super::client::GeminiHttpClient;
use super::types::{Content, GenerateContentRequest, GenerateContentResponse};
use crate::ai::CaptionService;
use crate::models::ApiKey;
use crate::{prompts, Result};
use async_trait::async_trait;

/// Gemini implementation of [`CaptionService`].
pub struct GeminiCaptionClient {
    http: GeminiHttpClient,
}

impl GeminiCaptionClient {
    pub fn new(api_key: ApiKey, model: String, base_url: String) -> Self {
        Self::new_with_client(api_key, model, base_url, reqwest::Client::new())
    }

    pub fn new_with_client(
        api_key: ApiKey,
        model: String,
        base_url: String,
        client: reqwest::Client,
    ) -> Self {
        Self {
            http: GeminiHttpClient::new_with_client(api_key, model, base_url, client),
        }
    }

    pub fn model(&self) -> &str {
        self.http.model()
    }

    /// System instruction plus one user turn carrying the description.
    pub fn build_request(description: &str) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content::text(prompts::render(
                prompts::CAPTION_USER,
                &[("description", description)],
            ))],
            system_instruction: Some(Content::text(prompts::CAPTION_SYSTEM)),
        }
    }
}

#[async_trait]
impl CaptionService for GeminiCaptionClient {
    async fn generate_caption(&self, description: &str) -> Result<Option<String>> {
        let request = Self::build_request(description);

        let response: GenerateContentResponse = self.http.generate_content(&request).await?;

        Ok(response.first_text().map(str::to_string))
    }
}
