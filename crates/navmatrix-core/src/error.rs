pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Unsupported matrix domain: {domain}")]
    UnsupportedDomain { domain: String },

    #[error("Unsupported length unit: {unit}")]
    UnsupportedUnit { unit: String },

    #[error("Matrix catalog has no entry for domain: {domain}")]
    MissingDomain { domain: String },

    #[error("Invalid export config: {message}")]
    InvalidConfig { message: String },

    #[error("Invalid layer: {message}")]
    InvalidLayer { message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON5 error: {message}")]
    Json5 { message: String },

    #[error("I/O error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
