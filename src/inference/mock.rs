use async_trait::async_trait;
use std::sync::Mutex;
use std::time::Duration;

use super::InferenceBackend;

type Responder = Box<dyn Fn(&str) -> String + Send + Sync>;

/// Scripted backend for unit tests.
pub(crate) struct MockBackend {
    available: bool,
    delay: Option<Duration>,
    responder: Responder,
    prompts: Mutex<Vec<String>>,
    image_counts: Mutex<Vec<usize>>,
}

impl MockBackend {
    pub fn replying(response: &str) -> Self {
        let response = response.to_string();
        Self::with(move |_| response.clone())
    }

    pub fn with(responder: impl Fn(&str) -> String + Send + Sync + 'static) -> Self {
        Self {
            available: true,
            delay: None,
            responder: Box::new(responder),
            prompts: Mutex::new(Vec::new()),
            image_counts: Mutex::new(Vec::new()),
        }
    }

    pub fn unavailable() -> Self {
        Self {
            available: false,
            ..Self::replying("")
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn image_counts(&self) -> Vec<usize> {
        self.image_counts.lock().unwrap().clone()
    }
}

#[async_trait]
impl InferenceBackend for MockBackend {
    async fn generate(&self, prompt: &str, images: &[Vec<u8>]) -> String {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.image_counts.lock().unwrap().push(images.len());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        (self.responder)(prompt)
    }

    async fn is_available(&self) -> bool {
        self.available
    }
}
