use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid scroll mapping: {0}")]
    InvalidMapping(String),

    #[error("Invalid storyboard: {0}")]
    InvalidStoryboard(String),
}

pub type Result<T> = std::result::Result<T, Error>;
