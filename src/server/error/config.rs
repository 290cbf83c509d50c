use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    /// Configuration file could not be read.
    ///
    /// The path comes from `TURTLE_CONFIG` or defaults to `./ginconfig.json`.
    #[error("Failed to read config file '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Configuration file is not valid JSON or has fields of the wrong type.
    #[error("Failed to parse config file '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// A field that has no default is empty.
    #[error("Missing required config field: {0}")]
    MissingField(String),
}
