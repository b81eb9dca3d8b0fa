//! Domain error types.
//!
//! Expected edge cases (short series, zero loss, flat equity) are never errors;
//! these variants cover malformed caller input and adapter failures.

/// Top-level error type for quantkit.
#[derive(Debug, thiserror::Error)]
pub enum QuantError {
    #[error("invalid period {name}={value}: must be at least 1")]
    InvalidPeriod { name: &'static str, value: usize },

    #[error("invalid parameter {name}: {reason}")]
    InvalidParameter { name: String, reason: String },

    #[error("empty input: {context}")]
    EmptyInput { context: &'static str },

    #[error("timestamp {0} is out of range")]
    InvalidTimestamp(i64),

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("data error: {reason}")]
    Data { reason: String },

    #[error("no data for {symbol}")]
    NoData { symbol: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl QuantError {
    pub fn invalid_parameter(name: impl Into<String>, reason: impl Into<String>) -> Self {
        QuantError::InvalidParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

/// Reject a zero period before it reaches an indicator loop.
pub fn ensure_period(name: &'static str, value: usize) -> Result<(), QuantError> {
    if value == 0 {
        return Err(QuantError::InvalidPeriod { name, value });
    }
    Ok(())
}

impl From<&QuantError> for std::process::ExitCode {
    fn from(err: &QuantError) -> Self {
        let code: u8 = match err {
            QuantError::Io(_) => 1,
            QuantError::ConfigParse { .. }
            | QuantError::ConfigMissing { .. }
            | QuantError::ConfigInvalid { .. } => 2,
            QuantError::Data { .. } | QuantError::NoData { .. } => 3,
            QuantError::InvalidPeriod { .. }
            | QuantError::InvalidParameter { .. }
            | QuantError::EmptyInput { .. }
            | QuantError::InvalidTimestamp(_) => 4,
        };
        std::process::ExitCode::from(code)
    }
}
