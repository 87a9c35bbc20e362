use thiserror::Error;

pub type Result<T> = std::result::Result<T, MonitorError>;

#[derive(Error, Debug)]
pub enum MonitorError {
    #[error("JDK tools error: {0}")]
    JdkTools(#[from] crate::jvm::jdk_tools::JdkToolsError),

    #[error("JVM connection error: {0}")]
    Connection(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration file: {0}")]
    ConfigFormat(#[from] toml::de::Error),

    #[error("Unknown listener: {0}")]
    UnknownListener(u64),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
