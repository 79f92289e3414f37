use thiserror::Error;

/// The central error type for studydesk.
///
/// Backend failures during a study-buddy exchange never reach this level —
/// the session converts them into formatted error answers. Everything that
/// should abort a one-shot command flows through here so the process exit
/// code reflects the failure class.
#[derive(Error, Debug)]
pub enum StudydeskError {
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    #[error("History store error: {0}")]
    Store(#[from] StoreError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Could not connect to the server: {0}")]
    Connect(String),

    #[error("{0}")]
    Backend(String),

    #[error("Backend returned status {status}: {message}")]
    HttpStatus { status: u16, message: String },

    #[error("Failed to parse backend response: {0}")]
    Parse(String),
}

impl ApiError {
    /// True when the request never produced a usable response (as opposed
    /// to the backend answering with an application-level failure).
    pub fn is_connectivity(&self) -> bool {
        matches!(self, ApiError::Connect(_))
    }
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Storage failure for key '{key}': {message}")]
    Storage { key: String, message: String },

    #[error("Persisted history is corrupt: {0}")]
    Corrupted(String),
}

pub type Result<T> = std::result::Result<T, StudydeskError>;

pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_ERROR: u8 = 1;
pub const EXIT_CONFIG_ERROR: u8 = 2;
pub const EXIT_API_ERROR: u8 = 4;

/// Determine the appropriate process exit code for an error.
pub fn get_exit_code(e: &anyhow::Error) -> u8 {
    if let Some(err) = e.downcast_ref::<StudydeskError>() {
        return match err {
            StudydeskError::Config(_) => EXIT_CONFIG_ERROR,
            StudydeskError::Api(_) => EXIT_API_ERROR,
            _ => EXIT_ERROR,
        };
    }
    if e.downcast_ref::<ApiError>().is_some() {
        return EXIT_API_ERROR;
    }
    EXIT_ERROR
}
