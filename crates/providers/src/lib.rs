//! Text-generation backends for Lifexia.

pub mod bounded;
pub mod classify;
pub mod ollama;

pub use bounded::BoundedGenerator;
pub use ollama::{OllamaGenerator, OllamaSettings};

use lifexia_config::GenerationConfig;
use lifexia_core::error::GenerationError;
use lifexia_core::Generator;
use std::sync::Arc;
use std::time::Duration;

/// Build the configured backend, time-boxed by the configured timeout.
pub fn from_config(config: &GenerationConfig) -> Result<Arc<dyn Generator>, GenerationError> {
    let inner: Arc<dyn Generator> = match config.backend.as_str() {
        "ollama" => Arc::new(OllamaGenerator::from_config(config)?),
        other => {
            return Err(GenerationError::unknown(format!(
                "unsupported generation backend '{other}'"
            )));
        }
    };

    Ok(Arc::new(
        BoundedGenerator::new(inner, Duration::from_secs(config.timeout_secs))
            .with_health_timeout(Duration::from_secs(config.health_timeout_secs)),
    ))
}
