use crate::models::ApiKey;
use crate::{Error, Result};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Lightweight Gemini REST client.
pub struct GeminiHttpClient {
    client: Client,
    api_key: ApiKey,
    model: String,
    base_url: String,
}

impl GeminiHttpClient {
    /// Construct a Gemini client.
    ///
    /// `model` should be the bare model ID (for example `gemini-2.5-flash`),
    /// a `models/...`-prefixed value is accepted and stripped.
    pub fn new(api_key: ApiKey, model: String, base_url: String) -> Self {
        Self::new_with_client(api_key, model, base_url, Client::new())
    }

    pub fn new_with_client(
        api_key: ApiKey,
        model: String,
        base_url: String,
        client: Client,
    ) -> Self {
        let model = model.strip_prefix("models/").unwrap_or(&model).to_string();
        let base_url = base_url.trim_end_matches('/').to_string();

        Self {
            client,
            api_key,
            model,
            base_url,
        }
    }

    /// Returns the configured model ID without the `models/` prefix.
    pub fn model(&self) -> &str {
        &self.model
    }

    fn generate_content_url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }

    /// Calls Gemini's `generateContent` endpoint.
    ///
    /// The key travels as the `key` query parameter; it is never part of a
    /// log line or an error message. A non-2xx reply is decoded like any other:
    /// only an unreachable server or a body that is not valid JSON is an error.
    pub async fn generate_content<Req: Serialize, Resp: DeserializeOwned>(
        &self,
        request: &Req,
    ) -> Result<Resp> {
        let response = self
            .client
            .post(self.generate_content_url())
            .query(&[("key", self.api_key.expose())])
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| {
                let e = e.without_url();
                tracing::error!("Failed to send request to Gemini: {}", e);
                Error::Http(e)
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| e.without_url())?;

        if !status.is_success() {
            tracing::warn!("Gemini API returned status {}: {}", status, body);
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                "Failed to parse Gemini response (status {}): {}\nBody: {}",
                status,
                e,
                body
            );
            Error::AiProvider(format!(
                "Failed to parse Gemini response (status {}): {}",
                status, e
            ))
        })
    }
}
