use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Invalid group size: {value} (allowed {min}..={max})")]
    InvalidGroupSize { value: u32, min: u32, max: u32 },

    #[error("Invalid tick interval: {0} ms")]
    InvalidInterval(u64),

    #[error("Group size cannot change while the simulation is running")]
    GroupSizeLocked,

    #[error("Group size mismatch: accumulator expects {expected}, outcome has {found}")]
    GroupSizeMismatch { expected: u32, found: u32 },

    #[error("Invalid range: {from}..={to}")]
    InvalidRange { from: u32, to: u32 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl CoreError {
    /// Whether the caller can fix the input and try again.
    pub fn is_recoverable(&self) -> bool {
        match self {
            CoreError::InvalidGroupSize { .. } => true,
            CoreError::InvalidInterval(_) => true,
            CoreError::GroupSizeLocked => true, // stop first
            CoreError::InvalidRange { .. } => true,
            CoreError::Io(_) => true,
            CoreError::GroupSizeMismatch { .. } => false,
            CoreError::Parse(_) => false,
            CoreError::Serialization(_) => false,
        }
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_data() || err.is_syntax() || err.is_eof() {
            CoreError::Parse(err.to_string())
        } else {
            CoreError::Serialization(err.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;
