use thiserror::Error;

/// Failures inside the skill. None of these reach the dialogue: every one is
/// recovered where it happens (defaults, fresh payload, skipped message).
#[derive(Debug, Error)]
pub enum SkillError {
    #[error("configuration error: {0}")]
    Config(#[from] ::config::ConfigError),

    #[error("invalid configuration value for {key}: {reason}")]
    InvalidValue { key: &'static str, reason: String },

    #[error("unreadable custom data: {0}")]
    Payload(#[source] serde_json::Error),

    #[error("malformed hermes message: {0}")]
    Wire(#[source] serde_json::Error),
}
