use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModularError {
    // Metadata errors
    #[error("Failed to load module metadata for repository \"{repo_id}\": {source}")]
    MetadataParse {
        repo_id: String,
        #[source]
        source: serde_json::Error,
    },

    // Module state errors
    #[error("Invalid module state: {0}")]
    InvalidModuleState(String),

    // System state errors
    #[error("Failed to load system state: {0}")]
    StateLoad(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ModularError>;
