use thiserror::Error;

#[derive(Debug, Error)]
pub enum HydroError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error for file '{0}': {1}")]
    FileIO(String, #[source] std::io::Error),

    #[error("Failed to parse YAML from '{0}': {1}")]
    YamlParsing(String, #[source] serde_yaml::Error),

    #[error("Failed to process CSV file '{0}': {1}")]
    CsvError(String, #[source] csv::Error),
}
