pub type PyroResult<T> = Result<T, PyroError>;

#[derive(thiserror::Error, Debug)]
pub enum PyroError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("capacity error: {0}")]
    Capacity(String),

    #[error("document error: {0}")]
    Document(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PyroError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn capacity(msg: impl Into<String>) -> Self {
        Self::Capacity(msg.into())
    }

    pub fn document(msg: impl Into<String>) -> Self {
        Self::Document(msg.into())
    }
}
