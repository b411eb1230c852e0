use thiserror::Error;

/// Main error type for the scheduler
#[derive(Error, Debug)]
pub enum StewardError {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    // Agent listing errors (the only cycle-level failure)
    #[error("Agent directory error: {0}")]
    AgentDirectory(String),

    // Collaborator errors surfaced per agent
    #[error("Token discovery failed: {0}")]
    Discovery(String),

    #[error("Balance read failed: {0}")]
    Balance(String),

    #[error("Holdings read failed: {0}")]
    Holdings(String),

    #[error("Capital store error: {0}")]
    CapitalStore(String),

    #[error("Strategy evaluation failed: {0}")]
    Evaluation(String),

    #[error("Risk check failed: {0}")]
    RiskCheck(String),

    // Trade execution errors
    #[error("Trade execution failed: {0}")]
    Execution(String),

    #[error("Trade execution timed out after {elapsed_secs}s")]
    ExecutionTimeout { elapsed_secs: u64 },

    #[error("Proposal store error: {0}")]
    ProposalStore(String),

    // Serialization errors
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    // Generic errors
    #[error("Internal error: {0}")]
    Internal(String),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

/// Result type alias for StewardError
pub type Result<T> = std::result::Result<T, StewardError>;
