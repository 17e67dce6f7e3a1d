//! Timeout and fallback wrapper around any [`HintProvider`].
//!
//! Hints never block or alter scheduling, so every failure is turned into a
//! message the learner can read instead of an error.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use spacedeck_core::traits::{HintProvider, HintRequest};

/// Shown when the provider fails or takes too long.
pub const FALLBACK_MESSAGE: &str = "Could not load a hint. Check your API key configuration.";

/// Result of a hint fetch, always displayable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HintOutcome {
    pub text: String,
    /// `true` when `text` is [`FALLBACK_MESSAGE`] rather than a real hint.
    pub fallback: bool,
}

impl HintOutcome {
    fn fallback() -> Self {
        Self {
            text: FALLBACK_MESSAGE.to_string(),
            fallback: true,
        }
    }
}

/// Ask `provider` for a hint, giving up after `timeout`.
pub async fn fetch_hint(
    provider: &dyn HintProvider,
    request: &HintRequest,
    timeout: Duration,
) -> HintOutcome {
    match tokio::time::timeout(timeout, provider.hint(request)).await {
        Ok(Ok(text)) => HintOutcome {
            text,
            fallback: false,
        },
        Ok(Err(e)) => {
            tracing::warn!(provider = provider.name(), "hint request failed: {e:#}");
            HintOutcome::fallback()
        }
        Err(_) => {
            tracing::warn!(
                provider = provider.name(),
                "hint request timed out after {}s",
                timeout.as_secs()
            );
            HintOutcome::fallback()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockProvider;

    fn request() -> HintRequest {
        HintRequest::WordExample {
            word: "house".into(),
            translation: "casa".into(),
        }
    }

    #[tokio::test]
    async fn passes_through_success() {
        let provider = MockProvider::with_fixed_response("use it in a sentence");
        let outcome = fetch_hint(&provider, &request(), Duration::from_secs(5)).await;
        assert_eq!(outcome.text, "use it in a sentence");
        assert!(!outcome.fallback);
    }

    #[tokio::test]
    async fn failure_becomes_fallback() {
        let provider = MockProvider::failing("network down");
        let outcome = fetch_hint(&provider, &request(), Duration::from_secs(5)).await;
        assert!(outcome.fallback);
        assert_eq!(outcome.text, FALLBACK_MESSAGE);
    }

    #[tokio::test(start_paused = true)]
    async fn slow_provider_times_out() {
        let provider =
            MockProvider::with_fixed_response("too late").with_delay(Duration::from_secs(60));
        let outcome = fetch_hint(&provider, &request(), Duration::from_secs(2)).await;
        assert!(outcome.fallback);
        assert_eq!(provider.call_count(), 1);
    }
}
