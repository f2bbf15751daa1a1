use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read sources file {path}: {source}")]
    SourcesFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse sources file: {0}")]
    SourcesFileParse(#[from] serde_yaml::Error),

    #[error("sources validation failed: {0}")]
    Validation(String),
}

/// Violations of the domain invariants enforced by the core constructors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("invalid date window: start {start} is after end {end}")]
    InvalidWindow { start: String, end: String },

    #[error("signal from '{source_id}' has empty text")]
    EmptySignalText { source_id: String },

    #[error("theme cluster '{name}' has no pain points")]
    EmptyPainPoints { name: String },

    #[error("unknown {kind} value: {value}")]
    UnknownVariant { kind: &'static str, value: String },
}
