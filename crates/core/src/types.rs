use thiserror::Error;

/// The main error type for Testbed operations
#[derive(Debug, Error)]
pub enum TestbedError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Execution error: {0}")]
    Execution(String),

    #[error("Timeout error: {0}")]
    Timeout(String),
}

/// Result type alias for Testbed operations
pub type TestbedResult<T> = Result<T, TestbedError>;
