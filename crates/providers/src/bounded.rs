//! Time-boxing for any generator.
//!
//! Wraps a [`Generator`] so that a call which overruns its budget is dropped
//! (cancelling the in-flight future) and reported as
//! [`GenerationErrorKind::Timeout`], whatever the inner backend does.

use async_trait::async_trait;
use lifexia_core::generation::{GenerationErrorKind, GenerationRequest, GenerationResult, Generator};
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

pub struct BoundedGenerator {
    inner: Arc<dyn Generator>,
    timeout: Duration,
    health_timeout: Duration,
}

impl BoundedGenerator {
    pub fn new(inner: Arc<dyn Generator>, timeout: Duration) -> Self {
        Self {
            inner,
            timeout,
            health_timeout: Duration::from_secs(5),
        }
    }

    pub fn with_health_timeout(mut self, health_timeout: Duration) -> Self {
        self.health_timeout = health_timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[async_trait]
impl Generator for BoundedGenerator {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn generate(&self, request: GenerationRequest) -> GenerationResult {
        match tokio::time::timeout(self.timeout, self.inner.generate(request)).await {
            Ok(result) => result,
            Err(_) => {
                warn!(
                    backend = %self.inner.name(),
                    timeout_secs = self.timeout.as_secs(),
                    "Generation timed out"
                );
                GenerationResult::failure(GenerationErrorKind::Timeout)
            }
        }
    }

    async fn check_health(&self) -> bool {
        tokio::time::timeout(self.health_timeout, self.inner.check_health())
            .await
            .unwrap_or(false)
    }

    async fn list_models(&self) -> Vec<String> {
        tokio::time::timeout(self.health_timeout, self.inner.list_models())
            .await
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Sleepy {
        delay: Duration,
    }

    #[async_trait]
    impl Generator for Sleepy {
        fn name(&self) -> &str {
            "sleepy"
        }

        async fn generate(&self, _request: GenerationRequest) -> GenerationResult {
            tokio::time::sleep(self.delay).await;
            GenerationResult::success("finally")
        }

        async fn check_health(&self) -> bool {
            tokio::time::sleep(self.delay).await;
            true
        }
    }

    #[tokio::test(start_paused = true)]
    async fn overrun_becomes_timeout() {
        let bounded = BoundedGenerator::new(
            Arc::new(Sleepy { delay: Duration::from_secs(120) }),
            Duration::from_secs(60),
        );
        let result = bounded.generate(GenerationRequest::default()).await;
        assert_eq!(result.error_kind, Some(GenerationErrorKind::Timeout));
        assert_eq!(result.text, GenerationErrorKind::Timeout.fallback_text());
    }

    #[tokio::test(start_paused = true)]
    async fn fast_call_passes_through() {
        let bounded = BoundedGenerator::new(
            Arc::new(Sleepy { delay: Duration::from_secs(1) }),
            Duration::from_secs(60),
        );
        let result = bounded.generate(GenerationRequest::default()).await;
        assert!(result.succeeded);
        assert_eq!(result.text, "finally");
    }

    #[tokio::test(start_paused = true)]
    async fn slow_health_probe_is_unhealthy() {
        let bounded = BoundedGenerator::new(
            Arc::new(Sleepy { delay: Duration::from_secs(30) }),
            Duration::from_secs(60),
        );
        assert!(!bounded.check_health().await);
        assert_eq!(bounded.name(), "sleepy");
    }
}
