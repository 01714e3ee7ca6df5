//! Failure classification: maps transport errors, HTTP statuses and
//! provider error messages onto the fixed [`GenerationErrorKind`] set.

use lifexia_core::GenerationErrorKind;

/// Classify a transport-level failure.
pub fn classify_transport(err: &reqwest::Error) -> GenerationErrorKind {
    if err.is_timeout() {
        GenerationErrorKind::Timeout
    } else if err.is_connect() {
        GenerationErrorKind::ConnectionFailure
    } else if let Some(kind) = classify_message(&err.to_string()) {
        kind
    } else {
        GenerationErrorKind::Unknown
    }
}

/// Classify a non-success HTTP response. Only 429 and quota/safety error
/// text are recognised; every other status is `Unknown`.
pub fn classify_status(status: u16, body: &str) -> GenerationErrorKind {
    match status {
        429 => GenerationErrorKind::QuotaExceeded,
        _ => classify_message(body).unwrap_or(GenerationErrorKind::Unknown),
    }
}

/// Recognise quota and safety failures from a provider's error text.
pub fn classify_message(message: &str) -> Option<GenerationErrorKind> {
    const QUOTA: &[&str] = &["quota", "rate limit", "rate-limit", "too many requests"];
    const SAFETY: &[&str] = &["safety", "blocked", "content policy", "content_filter"];

    let lower = message.to_lowercase();
    if QUOTA.iter().any(|needle| lower.contains(needle)) {
        Some(GenerationErrorKind::QuotaExceeded)
    } else if SAFETY.iter().any(|needle| lower.contains(needle)) {
        Some(GenerationErrorKind::SafetyFiltered)
    } else {
        None
    }
}
