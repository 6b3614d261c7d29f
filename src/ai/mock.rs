use super::CaptionService;
use crate::{Error, Result};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

/// Scripted outcome for one mock call.
#[derive(Debug, Clone)]
enum MockOutcome {
    Caption(String),
    Empty,
    Failure(String),
}

pub struct MockCaptionClient {
    outcomes: Arc<Mutex<Vec<MockOutcome>>>,
    descriptions: Arc<Mutex<Vec<String>>>,
    call_count: Arc<Mutex<usize>>,
}

impl MockCaptionClient {
    pub fn new() -> Self {
        Self {
            outcomes: Arc::new(Mutex::new(Vec::new())),
            descriptions: Arc::new(Mutex::new(Vec::new())),
            call_count: Arc::new(Mutex::new(0)),
        }
    }

    pub fn with_caption_response(self, caption: String) -> Self {
        self.outcomes
            .lock()
            .unwrap()
            .push(MockOutcome::Caption(caption));
        self
    }

    /// Queue an answer that carries no text.
    pub fn with_empty_response(self) -> Self {
        self.outcomes.lock().unwrap().push(MockOutcome::Empty);
        self
    }

    pub fn with_failure(self, message: String) -> Self {
        self.outcomes
            .lock()
            .unwrap()
            .push(MockOutcome::Failure(message));
        self
    }

    pub fn get_call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    /// Descriptions received so far, in call order.
    pub fn descriptions(&self) -> Vec<String> {
        self.descriptions.lock().unwrap().clone()
    }
}

impl Default for MockCaptionClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CaptionService for MockCaptionClient {
    async fn generate_caption(&self, description: &str) -> Result<Option<String>> {
        let mut count = self.call_count.lock().unwrap();
        *count += 1;

        self.descriptions
            .lock()
            .unwrap()
            .push(description.to_string());

        let outcomes = self.outcomes.lock().unwrap();
        if outcomes.is_empty() {
            return Ok(Some(format!("Pixie dust over {} ✨", description)));
        }

        let index = (*count - 1) % outcomes.len();
        match &outcomes[index] {
            MockOutcome::Caption(caption) => Ok(Some(caption.clone())),
            MockOutcome::Empty => Ok(None),
            MockOutcome::Failure(message) => Err(Error::AiProvider(message.clone())),
        }
    }
}
