use thiserror::Error;

#[derive(Error, Debug)]
pub enum PostquillError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Introspection error: {0}")]
    Introspection(String),

    #[error("Schema generation error: {0}")]
    SchemaGeneration(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<toml::de::Error> for PostquillError {
    fn from(err: toml::de::Error) -> Self {
        PostquillError::Config(format!("TOML parse error: {}", err))
    }
}

impl From<toml::ser::Error> for PostquillError {
    fn from(err: toml::ser::Error) -> Self {
        PostquillError::Serialization(format!("TOML serialization error: {}", err))
    }
}

pub type Result<T> = std::result::Result<T, PostquillError>;
