use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("invalid object: {0}")]
    ObjectConversion(String),
}

pub type Result<T> = std::result::Result<T, CoreError>;
