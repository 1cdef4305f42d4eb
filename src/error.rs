//! Error handling for the resume screener

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScreenerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF extraction error: {0}")]
    PdfExtraction(String),

    #[error("Text processing error: {0}")]
    TextProcessing(String),

    #[error("Embedding generation error: {0}")]
    Embedding(String),

    #[error("Model loading error: {0}")]
    ModelLoading(String),

    #[error("Model error: {0}")]
    ModelError(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("File format not supported: {0}")]
    UnsupportedFormat(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Feature vector has {actual} values, scorer expects {expected}")]
    FeatureShape { expected: usize, actual: usize },

    #[error("Processing error: {0}")]
    Processing(String),

    #[error("Output formatting error: {0}")]
    OutputFormatting(String),
}

pub type Result<T> = std::result::Result<T, ScreenerError>;

impl ScreenerError {
    /// Contract violations are fatal for the resume being scored; everything
    /// else raised by the model collaborators degrades to fallback scoring.
    pub fn is_contract_violation(&self) -> bool {
        matches!(self, ScreenerError::FeatureShape { .. })
    }
}

/// Convert anyhow errors (the model2vec loader reports through anyhow)
impl From<anyhow::Error> for ScreenerError {
    fn from(err: anyhow::Error) -> Self {
        ScreenerError::ModelLoading(err.to_string())
    }
}

/// Convert candle core errors to our custom error type
impl From<candle_core::Error> for ScreenerError {
    fn from(err: candle_core::Error) -> Self {
        ScreenerError::ModelError(err.to_string())
    }
}
