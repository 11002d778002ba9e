use thiserror::Error;

pub type Result<T> = std::result::Result<T, GenomeViewerError>;

#[derive(Debug, Error)]
pub enum GenomeViewerError {
    /// The stream could not be read as GenBank at all.
    #[error("Error reading GenBank file: {0}")]
    Format(String),

    #[error("no records found")]
    EmptyInput,

    /// Circular projection needs a non-zero genome length.
    #[error("invalid genome length {0} for circular projection")]
    InvalidGenomeLength(usize),

    #[error("unknown feature type '{0}'")]
    UnknownFeatureType(String),

    #[error("unknown table format '{0}'")]
    UnknownTableFormat(String),

    #[error("invalid settings: {0}")]
    Settings(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

