//! Mock provider for testing.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use spacedeck_core::traits::{HintProvider, HintRequest};

/// A scripted hint provider that never touches the network.
pub struct MockProvider {
    response: Result<String, String>,
    delay: Option<Duration>,
    call_count: AtomicU32,
    last_request: Mutex<Option<HintRequest>>,
}

impl MockProvider {
    /// Always answer with `text`.
    pub fn with_fixed_response(text: &str) -> Self {
        Self {
            response: Ok(text.to_string()),
            delay: None,
            call_count: AtomicU32::new(0),
            last_request: Mutex::new(None),
        }
    }

    /// Always fail with `message`.
    pub fn failing(message: &str) -> Self {
        Self {
            response: Err(message.to_string()),
            ..Self::with_fixed_response("")
        }
    }

    /// Sleep before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }

    pub fn last_request(&self) -> Option<HintRequest> {
        self.last_request
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

#[async_trait]
impl HintProvider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn hint(&self, request: &HintRequest) -> anyhow::Result<String> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        *self.last_request.lock().unwrap_or_else(|e| e.into_inner()) = Some(request.clone());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        self.response.clone().map_err(|message| anyhow::anyhow!(message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fixed_response() {
        let provider = MockProvider::with_fixed_response("a hint");
        let request = HintRequest::WordExample {
            word: "house".into(),
            translation: "casa".into(),
        };

        assert_eq!(provider.hint(&request).await.unwrap(), "a hint");
        assert_eq!(provider.call_count(), 1);
        assert_eq!(provider.last_request(), Some(request));
    }

    #[tokio::test]
    async fn failing_response() {
        let provider = MockProvider::failing("boom");
        let request = HintRequest::SentenceTip {
            sentence: "I am".into(),
            translation: "Eu sou".into(),
        };
        let err = provider.hint(&request).await.unwrap_err();
        assert_eq!(err.to_string(), "boom");
    }
}
