use thiserror::Error;

#[derive(Error, Debug)]
pub enum VitrineError {
    #[error("Config error: {0}")]
    Config(String),
    #[error("Store error: {0}")]
    Store(String),
    #[error("No object found with ID {id}")]
    NotFound { id: String },
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Join error: {0}")]
    Join(String),
    #[error("IO error: {0}")]
    Io(String),
}

pub type Result<T> = std::result::Result<T, VitrineError>;

// Helper conversions
impl From<rusqlite::Error> for VitrineError {
    fn from(e: rusqlite::Error) -> Self { Self::Store(e.to_string()) }
}

impl From<std::io::Error> for VitrineError {
    fn from(e: std::io::Error) -> Self { Self::Io(e.to_string()) }
}

impl From<config::ConfigError> for VitrineError {
    fn from(e: config::ConfigError) -> Self { Self::Config(e.to_string()) }
}
