use thiserror::Error;

/// Unified error type for the entire cashflow-metrics-core library.
///
/// The metrics engine itself never fails; errors only come from the
/// surfaces around it (date coercion, movement sources, export).
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Input coercion ──────────────────────────────────────────────
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Validation failed: {0}")]
    ValidationError(String),

    // ── Movement source ─────────────────────────────────────────────
    #[error("Movement source error ({source_name}): {message}")]
    Source {
        source_name: String,
        message: String,
    },

    // ── Export ──────────────────────────────────────────────────────
    #[error("Serialization error: {0}")]
    Serialization(String),
}

// ── Conversion helpers (From impls) ─────────────────────────────────

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::Serialization(e.to_string())
    }
}
