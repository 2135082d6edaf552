//! Error types for the testing harness

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TestingError {
    #[error("server failed to start: {0}")]
    ServerStartup(String),

    #[error("redirect chain exceeded {limit} hops (last target: {target})")]
    TooManyRedirects { limit: usize, target: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config parse error: {0}")]
    Config(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, TestingError>;
