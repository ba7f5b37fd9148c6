use crate::error::AppError;

#[derive(Debug, thiserror::Error)]
pub enum TtsServiceError {
    #[error("{0}")]
    Configuration(String),
    #[error("format '{0}' is not supported")]
    UnsupportedFormat(String),
    #[error("{0}")]
    Dependency(String),
    #[error("{0}")]
    Archive(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<zip::result::ZipError> for TtsServiceError {
    fn from(err: zip::result::ZipError) -> Self {
        TtsServiceError::Archive(format!("Failed to build archive: {}", err))
    }
}

impl From<std::io::Error> for TtsServiceError {
    fn from(err: std::io::Error) -> Self {
        TtsServiceError::Archive(format!("Failed to build archive: {}", err))
    }
}

impl From<TtsServiceError> for AppError {
    fn from(err: TtsServiceError) -> Self {
        match err {
            TtsServiceError::Configuration(msg) => AppError::Configuration(msg),
            TtsServiceError::UnsupportedFormat(format) => {
                AppError::UnsupportedFormat(format!("'{}' (expected 'file' or 'url')", format))
            }
            TtsServiceError::Dependency(msg) => AppError::ExternalService(msg),
            TtsServiceError::Archive(msg) => AppError::Internal(msg),
            TtsServiceError::Other(e) => AppError::Internal(e.to_string()),
        }
    }
}
