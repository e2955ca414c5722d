#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    #[error("Config directory not found")]
    NoConfigDir,

    #[error("Data directory not found")]
    NoDataDir,

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Catalog API returned HTTP {0}")]
    HttpStatus(u16),

    #[error("Malformed catalog response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("GraphQL error: {0}")]
    GraphQl(String),

    #[error("Opener not found: {0}")]
    OpenerNotFound(String),

    #[error("Failed to launch opener: {0}")]
    OpenerLaunch(String),
}

pub type Result<T> = std::result::Result<T, Error>;
