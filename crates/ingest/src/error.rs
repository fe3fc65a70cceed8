use thiserror::Error;

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("Failed to access file: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Required column '{0}' is missing from the input header")]
    MissingColumn(String),

    #[error("Amount overflow while summing {0}")]
    Overflow(String),

    #[error("No usable rows were found in the input")]
    Empty,
}
