//! Error types for the swap submitter

/// An error returned by the swap submitter
#[derive(Debug, Clone, thiserror::Error)]
pub enum SwapSubmitterError {
    /// An error with the CLI configuration
    #[error("config error: {0}")]
    Config(String),
    /// An error applying an update to the standby ledger
    #[error("ledger error: {0}")]
    Ledger(String),
    /// An error interacting with the chain
    #[error("on-chain error: {0}")]
    OnChain(String),
    /// An error parsing a value
    #[error("parse error: {0}")]
    Parse(String),
    /// An error resolving a token's cached balance
    #[error("token error: {0}")]
    Token(String),
    /// An error validating a swap before submission
    #[error("validation error: {0}")]
    Validation(String),
}

impl SwapSubmitterError {
    /// Create a new config error
    #[allow(clippy::needless_pass_by_value)]
    pub fn config<T: ToString>(e: T) -> Self {
        SwapSubmitterError::Config(e.to_string())
    }

    /// Create a new ledger error
    #[allow(clippy::needless_pass_by_value)]
    pub fn ledger<T: ToString>(e: T) -> Self {
        SwapSubmitterError::Ledger(e.to_string())
    }

    /// Create a new onchain error
    #[allow(clippy::needless_pass_by_value)]
    pub fn onchain<T: ToString>(e: T) -> Self {
        SwapSubmitterError::OnChain(e.to_string())
    }

    /// Create a new parse error
    #[allow(clippy::needless_pass_by_value)]
    pub fn parse<T: ToString>(e: T) -> Self {
        SwapSubmitterError::Parse(e.to_string())
    }

    /// Create a new token error
    #[allow(clippy::needless_pass_by_value)]
    pub fn token<T: ToString>(e: T) -> Self {
        SwapSubmitterError::Token(e.to_string())
    }

    /// Create a new validation error
    #[allow(clippy::needless_pass_by_value)]
    pub fn validation<T: ToString>(e: T) -> Self {
        SwapSubmitterError::Validation(e.to_string())
    }
}

impl SwapSubmitterError {
    /// The underlying message, without the error kind prefix
    pub fn message(&self) -> &str {
        match self {
            SwapSubmitterError::Config(msg)
            | SwapSubmitterError::Ledger(msg)
            | SwapSubmitterError::OnChain(msg)
            | SwapSubmitterError::Parse(msg)
            | SwapSubmitterError::Token(msg)
            | SwapSubmitterError::Validation(msg) => msg.as_str(),
        }
    }
}

impl From<serde_json::Error> for SwapSubmitterError {
    fn from(e: serde_json::Error) -> Self {
        SwapSubmitterError::parse(e)
    }
}
